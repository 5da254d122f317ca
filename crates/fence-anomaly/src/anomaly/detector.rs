//! Detection algorithms.
//!
//! Provides:
//! - `AnomalyAlgorithm` trait for pluggable detection
//! - 4 built-in algorithms: Z-score, IQR, Pattern (recent window), Rate of change
//!
//! Every algorithm sees the same [`DetectionContext`]: the window store
//! (already holding the new reading), the freshly recomputed statistics,
//! and the new reading itself.

use crate::baseline::Statistics;
use crate::config::EngineConfig;
use crate::window::{Reading, WindowStore};

use super::types::{DetectionMethod, DetectorVerdict, Diagnostics};

// ── Trait ────────────────────────────────────────────────────────────────

/// Shared, read-only input for every detection method.
#[derive(Clone, Copy, Debug)]
pub struct DetectionContext<'a> {
    pub window: &'a WindowStore,
    pub statistics: &'a Statistics,
    pub reading: &'a Reading,
}

/// Pluggable anomaly detection method.
pub trait AnomalyAlgorithm: Send {
    /// Evaluate the new reading against the window.
    fn evaluate(&self, ctx: &DetectionContext<'_>) -> DetectorVerdict;

    /// Which method this is (for provenance in the ensemble verdict).
    fn method(&self) -> DetectionMethod;
}

/// The four built-in algorithms in evaluation order.
pub fn default_algorithms(config: &EngineConfig) -> Vec<Box<dyn AnomalyAlgorithm>> {
    vec![
        Box::new(ZScoreAnomaly::new(config.z_score_threshold)),
        Box::new(IqrAnomaly::new(config.iqr_multiplier)),
        Box::new(PatternAnomaly::new(
            config.pattern_window,
            config.pattern_sigma,
            config.pattern_floor_amps,
        )),
        Box::new(RateOfChangeAnomaly::new(
            config.rate_multiplier,
            config.rate_floor_amps,
        )),
    ]
}

/// `ratio` clamped into `[0, 1]`; a zero or non-finite ratio maps to 0.
fn bounded_confidence(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// ── 1. Z-Score ───────────────────────────────────────────────────────────

/// Flags readings more than `threshold` standard deviations from the window mean.
///
/// A window std below `f64::EPSILON` counts as zero spread and keeps the method quiet.
pub struct ZScoreAnomaly {
    pub threshold: f64,
}

impl ZScoreAnomaly {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl AnomalyAlgorithm for ZScoreAnomaly {
    fn evaluate(&self, ctx: &DetectionContext<'_>) -> DetectorVerdict {
        let stats = ctx.statistics;
        if stats.std < f64::EPSILON {
            return DetectorVerdict::quiet(self.method());
        }

        let current = ctx.reading.current;
        let z = (current - stats.mean).abs() / stats.std;
        let is_anomaly = z > self.threshold;

        DetectorVerdict {
            method: self.method(),
            is_anomaly,
            confidence: bounded_confidence(z / self.threshold),
            diagnostics: Diagnostics::ZScore { score: z },
            reason: is_anomaly.then(|| {
                format!(
                    "Current {}A deviates {:.2} standard deviations from normal range",
                    current, z
                )
            }),
        }
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::ZScore
    }
}

// ── 2. Interquartile Range ──────────────────────────────────────────────

/// Flags readings outside `[q1 - m·iqr, q3 + m·iqr]` of the window.
pub struct IqrAnomaly {
    pub multiplier: f64,
}

impl IqrAnomaly {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl AnomalyAlgorithm for IqrAnomaly {
    fn evaluate(&self, ctx: &DetectionContext<'_>) -> DetectorVerdict {
        let mut sorted = ctx.window.currents();
        if sorted.is_empty() {
            return DetectorVerdict::quiet(self.method());
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = sorted.len();
        let q1 = sorted[n / 4];
        let q3 = sorted[(3 * n / 4).min(n - 1)];
        let iqr = q3 - q1;

        let lower = q1 - self.multiplier * iqr;
        let upper = q3 + self.multiplier * iqr;

        let current = ctx.reading.current;
        let is_anomaly = current < lower || current > upper;
        let distance = (lower - current).max(current - upper).max(0.0);
        // Zero spread: the bounds test still applies, confidence does not.
        let confidence = if iqr > 0.0 {
            bounded_confidence(distance / iqr)
        } else {
            0.0
        };

        DetectorVerdict {
            method: self.method(),
            is_anomaly,
            confidence,
            diagnostics: Diagnostics::Iqr { lower, upper },
            reason: is_anomaly.then(|| {
                format!(
                    "Current {}A is outside IQR bounds [{:.1}, {:.1}]",
                    current, lower, upper
                )
            }),
        }
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Iqr
    }
}

// ── 3. Pattern (recent window) ──────────────────────────────────────────

/// Sudden spike/drop detection against the readings just before this one.
///
/// Uses its own local mean and population standard deviation over the
/// last `window` readings preceding the new one. The threshold never falls
/// below `floor` amperes so a very quiet window does not turn hypersensitive.
pub struct PatternAnomaly {
    pub window: usize,
    pub sigma: f64,
    pub floor: f64,
}

impl PatternAnomaly {
    pub fn new(window: usize, sigma: f64, floor: f64) -> Self {
        Self {
            window,
            sigma,
            floor,
        }
    }
}

impl AnomalyAlgorithm for PatternAnomaly {
    fn evaluate(&self, ctx: &DetectionContext<'_>) -> DetectorVerdict {
        let recent: Vec<f64> = ctx.window.preceding(self.window).map(|r| r.current).collect();
        if recent.is_empty() {
            return DetectorVerdict::quiet(self.method());
        }

        let recent_mean = mean(&recent);
        let recent_std = (recent
            .iter()
            .map(|v| (v - recent_mean).powi(2))
            .sum::<f64>()
            / recent.len() as f64)
            .sqrt();

        let current = ctx.reading.current;
        let deviation = (current - recent_mean).abs();
        let threshold = (recent_std * self.sigma).max(self.floor);
        let is_anomaly = deviation > threshold;

        DetectorVerdict {
            method: self.method(),
            is_anomaly,
            confidence: bounded_confidence(deviation / threshold),
            diagnostics: Diagnostics::Pattern {
                deviation,
                recent_mean,
                threshold,
            },
            reason: is_anomaly.then(|| {
                let kind = if current > recent_mean { "spike" } else { "drop" };
                format!(
                    "Sudden {} detected: {:.1}A deviation from recent pattern",
                    kind, deviation
                )
            }),
        }
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::Pattern
    }
}

// ── 4. Rate of Change ───────────────────────────────────────────────────

/// Flags a jump from the previous reading that dwarfs the usual step size.
///
/// The baseline step is the mean absolute difference over every adjacent
/// pair stored before the new reading.
pub struct RateOfChangeAnomaly {
    pub multiplier: f64,
    pub floor: f64,
}

impl RateOfChangeAnomaly {
    pub fn new(multiplier: f64, floor: f64) -> Self {
        Self { multiplier, floor }
    }
}

impl AnomalyAlgorithm for RateOfChangeAnomaly {
    fn evaluate(&self, ctx: &DetectionContext<'_>) -> DetectorVerdict {
        let n = ctx.window.len();
        let previous = match ctx.window.previous() {
            Some(previous) if n >= 3 => previous,
            _ => return DetectorVerdict::quiet(self.method()),
        };

        let current = ctx.reading.current;
        let rate = (current - previous.current).abs();

        let history: Vec<f64> = ctx.window.snapshot().take(n - 1).map(|r| r.current).collect();
        let steps: Vec<f64> = history
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .collect();
        let average_rate = mean(&steps);
        let threshold = (average_rate * self.multiplier).max(self.floor);
        let is_anomaly = rate > threshold;

        DetectorVerdict {
            method: self.method(),
            is_anomaly,
            confidence: bounded_confidence(rate / threshold),
            diagnostics: Diagnostics::RateChange {
                rate,
                average_rate,
                threshold,
            },
            reason: is_anomaly.then(|| {
                format!(
                    "Rapid current change: {:.1}A/reading (normal: {:.1}A/reading)",
                    rate, average_rate
                )
            }),
        }
    }

    fn method(&self) -> DetectionMethod {
        DetectionMethod::RateChange
    }
}
