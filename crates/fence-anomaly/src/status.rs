//! Operational status of a fence, derived from its latest reading and verdict.

use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyType, EnsembleVerdict};
use crate::error::{EngineError, EngineResult};

/// Current thresholds for dashboard status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    /// Above this the fence is critical regardless of the verdict.
    pub alert_amps: f64,
    /// Above this the fence needs attention.
    pub warning_amps: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            alert_amps: 13.0,
            warning_amps: 11.0,
        }
    }
}

impl StatusThresholds {
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.warning_amps.is_finite() && self.alert_amps.is_finite()) {
            return Err(EngineError::InvalidConfig {
                field: "status".into(),
                reason: "thresholds must be finite".into(),
            });
        }
        if self.warning_amps > self.alert_amps {
            return Err(EngineError::InvalidConfig {
                field: "status.warning_amps".into(),
                reason: "must not exceed alert_amps".into(),
            });
        }
        Ok(())
    }
}

/// Status shown for a fence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FenceStatus {
    Normal,
    Warning,
    Critical,
}

impl FenceStatus {
    /// Classify from the raw current and the engine's verdict.
    pub fn classify(current: f64, verdict: &EnsembleVerdict, thresholds: &StatusThresholds) -> Self {
        if current > thresholds.alert_amps
            || verdict.anomaly_type == AnomalyType::CriticalOverload
        {
            FenceStatus::Critical
        } else if current > thresholds.warning_amps || verdict.is_anomaly {
            FenceStatus::Warning
        } else {
            FenceStatus::Normal
        }
    }
}

impl std::fmt::Display for FenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(anomaly_type: AnomalyType, is_anomaly: bool) -> EnsembleVerdict {
        EnsembleVerdict {
            is_anomaly,
            confidence: if is_anomaly { 0.9 } else { 0.0 },
            anomaly_type,
            reason: None,
            methods_triggered: Vec::new(),
            details: Vec::new(),
        }
    }

    #[test]
    fn over_alert_threshold_is_critical() {
        let t = StatusThresholds::default();
        let s = FenceStatus::classify(13.5, &EnsembleVerdict::normal(), &t);
        assert_eq!(s, FenceStatus::Critical);
    }

    #[test]
    fn critical_overload_type_is_critical_even_if_not_confident() {
        let t = StatusThresholds::default();
        let v = verdict(AnomalyType::CriticalOverload, false);
        assert_eq!(FenceStatus::classify(12.9, &v, &t), FenceStatus::Critical);
    }

    #[test]
    fn warning_from_current_or_anomaly() {
        let t = StatusThresholds::default();
        assert_eq!(
            FenceStatus::classify(11.5, &EnsembleVerdict::normal(), &t),
            FenceStatus::Warning
        );
        let v = verdict(AnomalyType::LowCurrentAnomaly, true);
        assert_eq!(FenceStatus::classify(6.0, &v, &t), FenceStatus::Warning);
    }

    #[test]
    fn quiet_fence_is_normal() {
        let t = StatusThresholds::default();
        assert_eq!(
            FenceStatus::classify(10.2, &EnsembleVerdict::normal(), &t),
            FenceStatus::Normal
        );
        assert_eq!(FenceStatus::Normal.to_string(), "normal");
    }

    #[test]
    fn thresholds_validation() {
        assert!(StatusThresholds::default().validate().is_ok());
        let bad = StatusThresholds {
            alert_amps: 10.0,
            warning_amps: 12.0,
        };
        assert!(bad.validate().is_err());
    }
}
