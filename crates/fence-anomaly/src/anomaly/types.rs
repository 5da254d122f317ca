//! Anomaly detection type definitions.
//!
//! Per-method [`DetectorVerdict`]s are fused into a single
//! [`EnsembleVerdict`] carrying an [`AnomalyType`] classification.

use serde::{Deserialize, Serialize};

// ── Detection Method ────────────────────────────────────────────────────

/// Names of the detection methods, in evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DetectionMethod {
    #[serde(rename = "zscore")]
    ZScore,
    #[serde(rename = "iqr")]
    Iqr,
    #[serde(rename = "pattern")]
    Pattern,
    #[serde(rename = "rate_change")]
    RateChange,
}

impl DetectionMethod {
    /// All methods in the fixed evaluation order.
    pub const ALL: [DetectionMethod; 4] = [
        DetectionMethod::ZScore,
        DetectionMethod::Iqr,
        DetectionMethod::Pattern,
        DetectionMethod::RateChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZScore => "zscore",
            Self::Iqr => "iqr",
            Self::Pattern => "pattern",
            Self::RateChange => "rate_change",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Detector Verdict (pre-fusion) ───────────────────────────────────────

/// Method-specific diagnostic values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostics {
    /// The method did not compute anything (degenerate or too little data).
    None,
    ZScore { score: f64 },
    Iqr { lower: f64, upper: f64 },
    Pattern { deviation: f64, recent_mean: f64, threshold: f64 },
    RateChange { rate: f64, average_rate: f64, threshold: f64 },
}

/// Output of a single detection method for one reading.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectorVerdict {
    pub method: DetectionMethod,
    pub is_anomaly: bool,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f64,
    pub diagnostics: Diagnostics,
    /// Human-readable justification, present only when anomalous.
    pub reason: Option<String>,
}

impl DetectorVerdict {
    /// A non-anomalous, zero-confidence verdict with no diagnostics.
    pub fn quiet(method: DetectionMethod) -> Self {
        Self {
            method,
            is_anomaly: false,
            confidence: 0.0,
            diagnostics: Diagnostics::None,
            reason: None,
        }
    }
}

// ── Anomaly Type ────────────────────────────────────────────────────────

/// Classification of an ensemble verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// No detector fired.
    Normal,
    /// Too few readings to run the detectors.
    InsufficientData,
    /// Current above the absolute safety ceiling.
    CriticalOverload,
    /// Current above the statistical upper bound.
    HighCurrentAnomaly,
    /// Current below the statistical lower bound.
    LowCurrentAnomaly,
    /// Strongest signal came from the rate-of-change detector.
    RapidFluctuation,
    /// Strongest signal came from the pattern detector.
    PatternDeviation,
    Unknown,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::InsufficientData => "insufficient_data",
            Self::CriticalOverload => "critical_overload",
            Self::HighCurrentAnomaly => "high_current_anomaly",
            Self::LowCurrentAnomaly => "low_current_anomaly",
            Self::RapidFluctuation => "rapid_fluctuation",
            Self::PatternDeviation => "pattern_deviation",
            Self::Unknown => "unknown",
        }
    }

    /// Title-cased label for dashboards, e.g. "Critical Overload".
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Ensemble Verdict (final output) ─────────────────────────────────────

/// The fused verdict returned to the caller for each reading.
///
/// `anomaly_type` and `reason` are populated whenever at least one detector
/// fired, even if the averaged confidence stays below the threshold. Check
/// `is_anomaly`, not the type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnsembleVerdict {
    pub is_anomaly: bool,
    /// Mean confidence of the triggered detectors, in `[0, 1]`.
    pub confidence: f64,
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub reason: Option<String>,
    /// Triggered methods in evaluation order.
    pub methods_triggered: Vec<DetectionMethod>,
    /// Triggered verdicts in evaluation order.
    pub details: Vec<DetectorVerdict>,
}

impl EnsembleVerdict {
    fn empty(anomaly_type: AnomalyType) -> Self {
        Self {
            is_anomaly: false,
            confidence: 0.0,
            anomaly_type,
            reason: None,
            methods_triggered: Vec::new(),
            details: Vec::new(),
        }
    }

    /// Verdict when no detector fired.
    pub fn normal() -> Self {
        Self::empty(AnomalyType::Normal)
    }

    /// Verdict while the window is below the detection floor.
    pub fn insufficient_data() -> Self {
        Self::empty(AnomalyType::InsufficientData)
    }
}
