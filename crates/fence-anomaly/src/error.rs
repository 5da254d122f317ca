use thiserror::Error;

/// Errors from the anomaly engine boundary and its supporting layers.
///
/// The detection pipeline itself never fails: degenerate numeric cases
/// degrade to non-anomalous verdicts. These variants cover input
/// validation, configuration, routing and export.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("non-finite reading: {field} = {value}")]
    NonFiniteReading { field: &'static str, value: f64 },

    #[error("invalid configuration: {field} -- {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("configuration load failed: {0}")]
    ConfigLoad(String),

    #[error("no engine registered for entity: {0}")]
    UnknownEntity(String),

    #[error("engine already registered for entity: {0}")]
    DuplicateEntity(String),

    #[error("engine lock poisoned")]
    LockPoisoned,

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::ConfigLoad(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialization(e.to_string())
    }
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = EngineError::NonFiniteReading {
            field: "current",
            value: f64::NAN,
        };
        assert!(e.to_string().contains("current"));
        assert!(e.to_string().contains("NaN"));

        let e = EngineError::InvalidConfig {
            field: "learning_window".into(),
            reason: "must be positive".into(),
        };
        assert_eq!(
            e.to_string(),
            "invalid configuration: learning_window -- must be positive"
        );
    }

    #[test]
    fn routing_error_variants_display() {
        let e = EngineError::UnknownEntity("KSEB001".into());
        assert!(e.to_string().contains("KSEB001"));

        let e = EngineError::DuplicateEntity("KSEB002".into());
        assert!(e.to_string().contains("KSEB002"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read denied");
        let err: EngineError = io_err.into();
        assert!(matches!(err, EngineError::ConfigLoad(_)));
        assert!(err.to_string().contains("read denied"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn result_type_works() {
        let ok: EngineResult<u32> = Ok(7);
        assert_eq!(ok.unwrap(), 7);

        let err: EngineResult<u32> = Err(EngineError::LockPoisoned);
        assert!(err.is_err());
    }
}
