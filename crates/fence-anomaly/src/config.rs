//! Engine and monitor configuration.
//!
//! Every tuning constant of the detection pipeline lives in [`EngineConfig`].
//! [`MonitorConfig`] adds the dashboard status thresholds and can be loaded
//! from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::status::StatusThresholds;

/// Tuning for a single [`AnomalyEngine`](crate::AnomalyEngine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Readings needed before the engine leaves its learning phase.
    /// The window store holds at most twice this many readings.
    pub learning_window: usize,
    /// Minimum average confidence of the triggered detectors for a positive verdict.
    pub confidence_threshold: f64,
    /// Z-score threshold, also the `k` in `mean ± k·std` bounds.
    pub z_score_threshold: f64,
    /// IQR fence multiplier.
    pub iqr_multiplier: f64,
    /// Absolute current ceiling that classifies as a critical overload.
    pub safety_ceiling_amps: f64,
    /// Maximum positive verdicts retained in the anomaly log.
    pub max_logged_anomalies: usize,
    /// Readings required before statistics are computed.
    pub min_statistics_samples: usize,
    /// Readings required before any detector runs.
    pub min_detection_samples: usize,
    /// Readings in the pattern detector's recency window.
    pub pattern_window: usize,
    /// Pattern threshold in local standard deviations.
    pub pattern_sigma: f64,
    /// Minimum pattern threshold in amperes.
    pub pattern_floor_amps: f64,
    /// Rate-of-change threshold as a multiple of the average step.
    pub rate_multiplier: f64,
    /// Minimum rate-of-change threshold in amperes per reading.
    pub rate_floor_amps: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            learning_window: crate::DEFAULT_LEARNING_WINDOW,
            confidence_threshold: crate::DEFAULT_CONFIDENCE_THRESHOLD,
            z_score_threshold: crate::anomaly::DEFAULT_Z_SCORE_THRESHOLD,
            iqr_multiplier: crate::anomaly::DEFAULT_IQR_MULTIPLIER,
            safety_ceiling_amps: crate::anomaly::DEFAULT_SAFETY_CEILING_AMPS,
            max_logged_anomalies: crate::journal::MAX_LOGGED_ANOMALIES,
            min_statistics_samples: crate::baseline::MIN_STATISTICS_SAMPLES,
            min_detection_samples: crate::anomaly::MIN_DETECTION_SAMPLES,
            pattern_window: crate::anomaly::DEFAULT_PATTERN_WINDOW,
            pattern_sigma: 3.0,
            pattern_floor_amps: 1.5,
            rate_multiplier: 4.0,
            rate_floor_amps: 2.0,
        }
    }
}

impl EngineConfig {
    /// Hard cap on the window store length.
    pub fn window_capacity(&self) -> usize {
        self.learning_window * 2
    }

    /// Check that every parameter is inside its usable domain.
    pub fn validate(&self) -> EngineResult<()> {
        fn invalid(field: &str, reason: &str) -> EngineResult<()> {
            Err(EngineError::InvalidConfig {
                field: field.to_string(),
                reason: reason.to_string(),
            })
        }

        if self.learning_window == 0 {
            return invalid("learning_window", "must be positive");
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return invalid("confidence_threshold", "must be within [0, 1]");
        }
        let positive = [
            ("z_score_threshold", self.z_score_threshold),
            ("iqr_multiplier", self.iqr_multiplier),
            ("safety_ceiling_amps", self.safety_ceiling_amps),
            ("pattern_sigma", self.pattern_sigma),
            ("pattern_floor_amps", self.pattern_floor_amps),
            ("rate_multiplier", self.rate_multiplier),
            ("rate_floor_amps", self.rate_floor_amps),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return invalid(field, "must be a positive finite number");
            }
        }
        if self.max_logged_anomalies == 0 {
            return invalid("max_logged_anomalies", "must be positive");
        }
        if self.min_statistics_samples < 2 {
            return invalid("min_statistics_samples", "sample std needs at least 2 readings");
        }
        if self.min_detection_samples < self.min_statistics_samples {
            return invalid(
                "min_detection_samples",
                "must not be below min_statistics_samples",
            );
        }
        if self.pattern_window == 0 || self.pattern_window >= self.learning_window {
            return invalid(
                "pattern_window",
                "must be positive and smaller than learning_window",
            );
        }
        if self.window_capacity() < self.min_detection_samples {
            return invalid(
                "learning_window",
                "window capacity (2 x learning_window) must reach min_detection_samples",
            );
        }
        Ok(())
    }
}

/// Top-level configuration file for a monitoring deployment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Engine tuning shared by every fence.
    pub engine: EngineConfig,
    /// Dashboard status thresholds.
    pub status: StatusThresholds,
}

impl MonitorConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing path or missing file yields the defaults. A file that
    /// exists but does not parse or validate is an error.
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let config = match path {
            Some(p) if p.exists() => {
                let contents = std::fs::read_to_string(p)?;
                Self::from_toml_str(&contents)?
            }
            _ => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> EngineResult<Self> {
        toml::from_str(contents).map_err(|e| EngineError::ConfigLoad(e.to_string()))
    }

    pub fn validate(&self) -> EngineResult<()> {
        self.engine.validate()?;
        self.status.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_config_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.learning_window, 50);
        assert_eq!(cfg.window_capacity(), 100);
        assert!((cfg.confidence_threshold - 0.7).abs() < f64::EPSILON);
        assert!((cfg.z_score_threshold - 2.5).abs() < f64::EPSILON);
        assert!((cfg.iqr_multiplier - 1.5).abs() < f64::EPSILON);
        assert!((cfg.safety_ceiling_amps - 13.0).abs() < f64::EPSILON);
        assert_eq!(cfg.max_logged_anomalies, 20);
        assert_eq!(cfg.min_statistics_samples, 10);
        assert_eq!(cfg.min_detection_samples, 20);
        assert_eq!(cfg.pattern_window, 10);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_learning_window() {
        let cfg = EngineConfig {
            learning_window: 0,
            ..EngineConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("learning_window"));
    }

    #[test]
    fn validate_rejects_window_that_never_reaches_detection_floor() {
        // capacity 18 < 20: every reading would stay insufficient_data
        let cfg = EngineConfig {
            learning_window: 9,
            pattern_window: 5,
            ..EngineConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidConfig { ref field, .. } if field == "learning_window"
        ));

        let cfg = EngineConfig {
            learning_window: 10,
            pattern_window: 5,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_confidence_out_of_range() {
        let cfg = EngineConfig {
            confidence_threshold: 1.5,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_positive_thresholds() {
        let cfg = EngineConfig {
            z_score_threshold: 0.0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = EngineConfig {
            rate_floor_amps: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_pattern_window() {
        let cfg = EngineConfig {
            learning_window: 5,
            pattern_window: 10,
            ..EngineConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("pattern_window"));
    }

    #[test]
    fn toml_partial_override_keeps_defaults() {
        let cfg = MonitorConfig::from_toml_str(
            r#"
            [engine]
            learning_window = 30
            confidence_threshold = 0.6

            [status]
            warning_amps = 10.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.engine.learning_window, 30);
        assert!((cfg.engine.confidence_threshold - 0.6).abs() < f64::EPSILON);
        assert!((cfg.engine.z_score_threshold - 2.5).abs() < f64::EPSILON);
        assert!((cfg.status.warning_amps - 10.5).abs() < f64::EPSILON);
        assert!((cfg.status.alert_amps - 13.0).abs() < f64::EPSILON);
    }

    #[test]
    fn toml_malformed_is_config_load_error() {
        let err = MonitorConfig::from_toml_str("[engine\nlearning_window = ").unwrap_err();
        assert!(matches!(err, EngineError::ConfigLoad(_)));
    }

    #[test]
    fn load_missing_file_returns_defaults() {
        let cfg = MonitorConfig::load(Some(Path::new("/nonexistent/fence/monitor.toml"))).unwrap();
        assert_eq!(cfg, MonitorConfig::default());

        let cfg = MonitorConfig::load(None).unwrap();
        assert_eq!(cfg.engine.learning_window, 50);
    }

    #[test]
    fn load_from_file_validates() {
        let dir = std::env::temp_dir().join(format!("fence_cfg_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("monitor.toml");

        std::fs::write(&path, "[engine]\nlearning_window = 40\n").unwrap();
        let cfg = MonitorConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.engine.learning_window, 40);

        std::fs::write(&path, "[engine]\nmax_logged_anomalies = 0\n").unwrap();
        let err = MonitorConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
