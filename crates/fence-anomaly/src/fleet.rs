//! Per-fence routing.
//!
//! Each fence owns an independent [`AnomalyEngine`] behind its own mutex.
//! One `analyze` call is one critical section on that fence only; fences
//! never contend with each other. Registration needs `&mut self`, so the
//! fleet is typically built up front and then shared.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::anomaly::{AnomalyType, EnsembleVerdict};
use crate::config::{EngineConfig, MonitorConfig};
use crate::engine::AnomalyEngine;
use crate::error::{EngineError, EngineResult};
use crate::insights::{ExportSnapshot, InsightsSnapshot};
use crate::status::{FenceStatus, StatusThresholds};
use crate::window::types::validate_finite;

/// Identifier of one monitored fence.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FenceId(pub String);

impl FenceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FenceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Result of routing one reading to a fence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FenceReport {
    pub fence: FenceId,
    pub verdict: EnsembleVerdict,
    pub status: FenceStatus,
}

/// Totals across every registered fence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub total_anomalies: usize,
    pub learning_fences: usize,
    pub monitoring_fences: usize,
    /// Sum of each fence's recent-window type tally.
    pub anomaly_types: BTreeMap<AnomalyType, usize>,
    pub most_common_anomaly: Option<AnomalyType>,
}

struct FenceSlot {
    engine: AnomalyEngine,
    last_status: FenceStatus,
}

/// Routes readings to one engine per fence.
pub struct FleetMonitor {
    fences: BTreeMap<FenceId, Mutex<FenceSlot>>,
    engine_config: EngineConfig,
    thresholds: StatusThresholds,
}

impl FleetMonitor {
    /// Create an empty fleet; new fences use `config.engine`.
    pub fn new(config: MonitorConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            fences: BTreeMap::new(),
            engine_config: config.engine,
            thresholds: config.status,
        })
    }

    /// Register a fence with the fleet's engine configuration.
    pub fn register(&mut self, id: impl Into<FenceId>) -> EngineResult<()> {
        let config = self.engine_config.clone();
        self.register_with_config(id, config)
    }

    /// Register a fence with its own engine configuration.
    pub fn register_with_config(
        &mut self,
        id: impl Into<FenceId>,
        config: EngineConfig,
    ) -> EngineResult<()> {
        let id = id.into();
        if self.fences.contains_key(&id) {
            return Err(EngineError::DuplicateEntity(id.0));
        }
        let engine = AnomalyEngine::new(config)?;
        debug!(fence = %id, "fence registered");
        self.fences.insert(
            id,
            Mutex::new(FenceSlot {
                engine,
                last_status: FenceStatus::Normal,
            }),
        );
        Ok(())
    }

    fn slot(&self, id: &FenceId) -> EngineResult<MutexGuard<'_, FenceSlot>> {
        let slot = self
            .fences
            .get(id)
            .ok_or_else(|| EngineError::UnknownEntity(id.0.clone()))?;
        slot.lock().map_err(|_| EngineError::LockPoisoned)
    }

    /// Analyze one reading for `id` and classify the fence status.
    pub fn analyze(
        &self,
        id: &FenceId,
        current: f64,
        voltage: f64,
        timestamp: Option<DateTime<Utc>>,
    ) -> EngineResult<FenceReport> {
        validate_finite(current, voltage)?;
        let mut slot = self.slot(id)?;

        let verdict = slot.engine.analyze(current, voltage, timestamp);
        let status = FenceStatus::classify(current, &verdict, &self.thresholds);
        if status == FenceStatus::Critical && slot.last_status != FenceStatus::Critical {
            warn!(fence = %id, current, anomaly_type = %verdict.anomaly_type, "fence critical");
        }
        slot.last_status = status;

        Ok(FenceReport {
            fence: id.clone(),
            verdict,
            status,
        })
    }

    pub fn insights(&self, id: &FenceId) -> EngineResult<InsightsSnapshot> {
        Ok(self.slot(id)?.engine.insights())
    }

    pub fn export(&self, id: &FenceId) -> EngineResult<ExportSnapshot> {
        Ok(self.slot(id)?.engine.export())
    }

    /// Reset one fence's engine back to learning.
    pub fn reset(&self, id: &FenceId) -> EngineResult<()> {
        let mut slot = self.slot(id)?;
        slot.engine.reset();
        slot.last_status = FenceStatus::Normal;
        Ok(())
    }

    /// Registered fences in key order.
    pub fn fence_ids(&self) -> Vec<FenceId> {
        self.fences.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.fences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }

    pub fn thresholds(&self) -> &StatusThresholds {
        &self.thresholds
    }

    /// Aggregate insights across the fleet.
    pub fn summary(&self) -> EngineResult<FleetSummary> {
        let mut summary = FleetSummary::default();
        for id in self.fences.keys() {
            let insights = self.insights(id)?;
            summary.total_anomalies += insights.total_anomalies;
            if insights.is_learning() {
                summary.learning_fences += 1;
            } else {
                summary.monitoring_fences += 1;
            }
            for (anomaly_type, count) in insights.anomaly_types {
                *summary.anomaly_types.entry(anomaly_type).or_insert(0) += count;
            }
        }

        // BTreeMap iterates in declaration order; strict > keeps the first on ties.
        let mut best: Option<(AnomalyType, usize)> = None;
        for (&anomaly_type, &count) in &summary.anomaly_types {
            if best.map_or(true, |(_, c)| count > c) {
                best = Some((anomaly_type, count));
            }
        }
        summary.most_common_anomaly = best.map(|(t, _)| t);

        Ok(summary)
    }
}
