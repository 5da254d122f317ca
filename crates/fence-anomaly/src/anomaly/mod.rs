//! Anomaly detection: four independent methods fused into one verdict.
//!
//! ## Architecture
//!
//! ```text
//!   Reading + WindowStore + Statistics
//!       │
//!       ├──► ZScoreAnomaly        (distance from window mean)
//!       ├──► IqrAnomaly           (outside quartile fences)
//!       ├──► PatternAnomaly       (spike/drop vs recent readings)
//!       └──► RateOfChangeAnomaly  (jump vs usual step)
//!             │
//!             ▼
//!       EnsembleFusion (average confidence + priority classification) ──► EnsembleVerdict
//! ```

pub mod detector;
pub mod fusion;
pub mod types;

pub use detector::{
    default_algorithms, AnomalyAlgorithm, DetectionContext, IqrAnomaly, PatternAnomaly,
    RateOfChangeAnomaly, ZScoreAnomaly,
};
pub use fusion::EnsembleFusion;
pub use types::{AnomalyType, DetectionMethod, DetectorVerdict, Diagnostics, EnsembleVerdict};

/// Readings required before any detector runs.
pub const MIN_DETECTION_SAMPLES: usize = 20;

/// Default z-score threshold (also the statistical bound multiplier).
pub const DEFAULT_Z_SCORE_THRESHOLD: f64 = 2.5;

/// Default IQR fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default absolute safety ceiling in amperes.
pub const DEFAULT_SAFETY_CEILING_AMPS: f64 = 13.0;

/// Default pattern detector recency window.
pub const DEFAULT_PATTERN_WINDOW: usize = 10;
