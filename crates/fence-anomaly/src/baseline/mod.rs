//! Statistics estimator: the learned notion of "normal" for one fence.
//!
//! Recomputed wholesale from the window store on every ingestion once the
//! store holds enough readings. This is O(window) per reading rather than
//! an incremental (Welford) update; the window never exceeds a few hundred
//! readings.
//!
//! ## Architecture
//!
//! ```text
//!   WindowStore ──► StatisticsEstimator ──► Statistics { mean, std, bounds }
//!                        │
//!                        └── learning → monitoring (one-way)
//! ```

pub mod estimator;
pub mod types;

pub use estimator::StatisticsEstimator;
pub use types::{LearningStatus, Statistics};

/// Readings required before statistics are recomputed.
pub const MIN_STATISTICS_SAMPLES: usize = 10;
