//! The per-entity anomaly engine.
//!
//! One `AnomalyEngine` owns the window, statistics, detectors and anomaly
//! log for a single monitored entity. `analyze` is synchronous and
//! run-to-completion: append, recompute, detect, fuse, log, return.
//! Callers sharing one engine across threads must hold a lock around the
//! whole call (see [`FleetMonitor`](crate::FleetMonitor)).

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::anomaly::{
    default_algorithms, AnomalyAlgorithm, AnomalyType, DetectionContext, EnsembleFusion,
    EnsembleVerdict,
};
use crate::baseline::{LearningStatus, Statistics, StatisticsEstimator};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::insights::{ExportSnapshot, InsightsSnapshot};
use crate::journal::AnomalyLog;
use crate::window::types::validate_finite;
use crate::window::{Reading, WindowStore};

/// Streaming ensemble anomaly detector for one reading stream.
pub struct AnomalyEngine {
    config: EngineConfig,
    window: WindowStore,
    estimator: StatisticsEstimator,
    algorithms: Vec<Box<dyn AnomalyAlgorithm>>,
    fusion: EnsembleFusion,
    log: AnomalyLog,
}

impl AnomalyEngine {
    /// Create an engine with the four built-in detectors.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let algorithms = default_algorithms(&config);
        Ok(Self::build(config, algorithms))
    }

    /// Create an engine with default configuration.
    pub fn with_defaults() -> Self {
        let config = EngineConfig::default();
        let algorithms = default_algorithms(&config);
        Self::build(config, algorithms)
    }

    /// Create with custom detectors, evaluated in the given order.
    pub fn with_algorithms(
        config: EngineConfig,
        algorithms: Vec<Box<dyn AnomalyAlgorithm>>,
    ) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::build(config, algorithms))
    }

    fn build(config: EngineConfig, algorithms: Vec<Box<dyn AnomalyAlgorithm>>) -> Self {
        Self {
            window: WindowStore::new(config.window_capacity()),
            estimator: StatisticsEstimator::new(
                config.z_score_threshold,
                config.min_statistics_samples,
                config.learning_window,
            ),
            fusion: EnsembleFusion::new(config.confidence_threshold, config.safety_ceiling_amps),
            log: AnomalyLog::new(config.max_logged_anomalies),
            algorithms,
            config,
        }
    }

    /// Ingest one reading and return the fused verdict.
    ///
    /// `timestamp` defaults to the wall clock. Inputs must be finite; use
    /// [`try_analyze`](Self::try_analyze) to have that checked.
    pub fn analyze(
        &mut self,
        current: f64,
        voltage: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> EnsembleVerdict {
        let reading = Reading::new(current, voltage, timestamp.unwrap_or_else(Utc::now));
        self.window.append(reading.clone());
        self.estimator.update(&self.window);

        if self.window.len() < self.config.min_detection_samples {
            return EnsembleVerdict::insufficient_data();
        }

        let statistics = *self.estimator.statistics();
        let ctx = DetectionContext {
            window: &self.window,
            statistics: &statistics,
            reading: &reading,
        };
        let verdicts = self.algorithms.iter().map(|a| a.evaluate(&ctx)).collect();
        let verdict = self.fusion.fuse(verdicts, &reading, &statistics);

        if let Some(entry) = self.log.record(&reading, &verdict) {
            if entry.anomaly_type == AnomalyType::CriticalOverload {
                warn!(
                    current = reading.current,
                    confidence = verdict.confidence,
                    "critical overload detected"
                );
            } else {
                info!(
                    anomaly_type = %verdict.anomaly_type,
                    current = reading.current,
                    confidence = verdict.confidence,
                    methods = verdict.methods_triggered.len(),
                    "anomaly detected"
                );
            }
        }

        verdict
    }

    /// Like [`analyze`](Self::analyze), but rejects non-finite input
    /// before any state changes.
    pub fn try_analyze(
        &mut self,
        current: f64,
        voltage: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> EngineResult<EnsembleVerdict> {
        validate_finite(current, voltage)?;
        Ok(self.analyze(current, voltage, timestamp))
    }

    /// Read-only summary for dashboards and reporting.
    pub fn insights(&self) -> InsightsSnapshot {
        InsightsSnapshot::collect(
            &self.window,
            &self.log,
            self.estimator.statistics(),
            self.estimator.status(),
        )
    }

    /// Full dump of history, log and statistics.
    pub fn export(&self) -> ExportSnapshot {
        ExportSnapshot::collect(&self.window, &self.log, self.estimator.statistics())
    }

    /// Clear window, log and learning state.
    pub fn reset(&mut self) {
        self.window.clear();
        self.log.clear();
        self.estimator.reset();
        debug!("anomaly engine reset");
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn statistics(&self) -> &Statistics {
        self.estimator.statistics()
    }

    pub fn learning_status(&self) -> LearningStatus {
        self.estimator.status()
    }

    /// Number of registered detection algorithms.
    pub fn algorithm_count(&self) -> usize {
        self.algorithms.len()
    }
}

impl Default for AnomalyEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
