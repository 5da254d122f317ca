//! Ensemble fusion: many detector verdicts in, one classified verdict out.

use crate::baseline::Statistics;
use crate::window::Reading;

use super::types::{AnomalyType, DetectionMethod, DetectorVerdict, EnsembleVerdict};

/// Fuses per-method verdicts into an [`EnsembleVerdict`].
///
/// Classification runs in a fixed priority order: the absolute safety
/// ceiling first, then the statistical bounds, then the method that
/// produced the strongest signal. Reordering changes the outcome for
/// boundary readings.
#[derive(Clone, Debug)]
pub struct EnsembleFusion {
    /// Minimum average confidence for a positive verdict.
    pub confidence_threshold: f64,
    /// Absolute current ceiling in amperes.
    pub safety_ceiling: f64,
}

impl EnsembleFusion {
    pub fn new(confidence_threshold: f64, safety_ceiling: f64) -> Self {
        Self {
            confidence_threshold,
            safety_ceiling,
        }
    }

    /// Fuse verdicts given in evaluation order.
    pub fn fuse(
        &self,
        verdicts: Vec<DetectorVerdict>,
        reading: &Reading,
        statistics: &Statistics,
    ) -> EnsembleVerdict {
        let triggered: Vec<DetectorVerdict> =
            verdicts.into_iter().filter(|v| v.is_anomaly).collect();

        // First encountered wins ties.
        let Some(strongest) = triggered.iter().reduce(|best, v| {
            if v.confidence > best.confidence {
                v
            } else {
                best
            }
        }) else {
            return EnsembleVerdict::normal();
        };

        let avg_confidence =
            triggered.iter().map(|v| v.confidence).sum::<f64>() / triggered.len() as f64;

        let current = reading.current;
        let (anomaly_type, reason) = if current > self.safety_ceiling {
            (
                AnomalyType::CriticalOverload,
                Some(format!(
                    "Critical: Current {}A exceeds safety threshold ({}A)",
                    current, self.safety_ceiling
                )),
            )
        } else {
            let anomaly_type = if current > statistics.upper_bound {
                AnomalyType::HighCurrentAnomaly
            } else if current < statistics.lower_bound {
                AnomalyType::LowCurrentAnomaly
            } else {
                match strongest.method {
                    DetectionMethod::RateChange => AnomalyType::RapidFluctuation,
                    DetectionMethod::Pattern => AnomalyType::PatternDeviation,
                    _ => AnomalyType::Unknown,
                }
            };
            (anomaly_type, strongest.reason.clone())
        };

        EnsembleVerdict {
            is_anomaly: avg_confidence >= self.confidence_threshold,
            confidence: avg_confidence.clamp(0.0, 1.0),
            anomaly_type,
            reason,
            methods_triggered: triggered.iter().map(|v| v.method).collect(),
            details: triggered,
        }
    }
}
