//! # fence-anomaly
//!
//! Streaming ensemble anomaly detection for electric fence current readings.
//!
//! Each monitored fence owns one [`AnomalyEngine`]. The engine learns what
//! "normal" looks like from a bounded window of recent readings and runs
//! four independent statistical detectors against every new reading. Their
//! verdicts are fused into one classified result with a confidence score
//! and a human-readable reason. No labelled data is needed.
//!
//! ## Architecture
//!
//! ```text
//!   analyze(current, voltage, ts)
//!            │
//!            ▼
//!   ┌──────────────────┐      ┌──────────────────────┐
//!   │  WindowStore     │─────▶│  StatisticsEstimator │  mean / std / bounds
//!   │  (≤ 2×learning)  │      │  learning→monitoring │
//!   └────────┬─────────┘      └──────────┬───────────┘
//!            │      DetectionContext     │
//!            ▼                           ▼
//!   ┌─────────────────────────────────────────────┐
//!   │ zscore │ iqr │ pattern │ rate_change        │  Box<dyn AnomalyAlgorithm>
//!   └─────────────────────┬───────────────────────┘
//!                         ▼
//!                ┌─────────────────┐
//!                │ EnsembleFusion  │  safety ceiling → bounds → strongest
//!                └────────┬────────┘
//!                         ▼
//!                ┌─────────────────┐       insights() / export()
//!                │  AnomalyLog     │──────▶ InsightsSnapshot / ExportSnapshot
//!                │  (≤ 20 entries) │
//!                └─────────────────┘
//! ```
//!
//! [`FleetMonitor`] routes readings for many fences, one engine each.
//!
//! ## Quick Start
//!
//! ```rust
//! use fence_anomaly::{AnomalyEngine, AnomalyType};
//!
//! let mut engine = AnomalyEngine::with_defaults();
//! for i in 0..60 {
//!     engine.analyze(10.0 + 0.5 * (i % 5) as f64, 8.5, None);
//! }
//!
//! let verdict = engine.analyze(20.0, 8.5, None);
//! assert!(verdict.is_anomaly);
//! assert_eq!(verdict.anomaly_type, AnomalyType::CriticalOverload);
//!
//! let insights = engine.insights();
//! assert_eq!(insights.total_anomalies, 1);
//! ```
//!
//! Numeric behaviour is undefined for non-finite input. Use
//! [`AnomalyEngine::try_analyze`] or [`FleetMonitor::analyze`] to have
//! readings checked at the boundary.

#![deny(unsafe_code)]

pub mod anomaly;
pub mod baseline;
pub mod config;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod insights;
pub mod journal;
pub mod status;
pub mod window;

// ── Re-exports ──────────────────────────────────────────────────────────

pub use anomaly::{
    AnomalyAlgorithm, AnomalyType, DetectionContext, DetectionMethod, DetectorVerdict,
    Diagnostics, EnsembleFusion, EnsembleVerdict,
};
pub use baseline::{LearningStatus, Statistics, StatisticsEstimator};
pub use config::{EngineConfig, MonitorConfig};
pub use engine::AnomalyEngine;
pub use error::{EngineError, EngineResult};
pub use fleet::{FenceId, FenceReport, FleetMonitor, FleetSummary};
pub use insights::{ExportSnapshot, InsightsSnapshot};
pub use journal::{AnomalyId, AnomalyLog, AnomalyLogEntry};
pub use status::{FenceStatus, StatusThresholds};
pub use window::{Reading, WindowStore};

/// Readings before the engine leaves the learning phase.
pub const DEFAULT_LEARNING_WINDOW: usize = 50;

/// Minimum average confidence of triggered methods for a positive verdict.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.7;
