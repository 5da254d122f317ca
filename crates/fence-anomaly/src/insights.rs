//! Read-only reporting surface: insights summary and full export dump.
//!
//! Dashboards and reporting collaborators read engine state only through
//! these snapshots, never through the window store or the log directly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::anomaly::AnomalyType;
use crate::baseline::{LearningStatus, Statistics};
use crate::error::EngineResult;
use crate::journal::{AnomalyLog, AnomalyLogEntry};
use crate::window::{Reading, WindowStore};

/// Log entries considered "recent" for counts and type tallies.
pub const RECENT_ANOMALY_WINDOW: usize = 10;

/// Log entries included verbatim in the insights snapshot.
pub const RECENT_ANOMALY_LIST: usize = 5;

/// Point-in-time summary of one engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InsightsSnapshot {
    /// Entries currently in the anomaly log.
    pub total_anomalies: usize,
    /// Entries among the most recent ten.
    pub recent_anomalies: usize,
    pub learning_status: LearningStatus,
    /// Readings currently in the window store.
    pub data_points: usize,
    /// Type tally over the most recent ten entries.
    pub anomaly_types: BTreeMap<AnomalyType, usize>,
    pub statistics: Statistics,
    /// The most recent five entries, oldest first.
    pub recent_anomalies_list: Vec<AnomalyLogEntry>,
}

impl InsightsSnapshot {
    pub(crate) fn collect(
        window: &WindowStore,
        log: &AnomalyLog,
        statistics: &Statistics,
        learning_status: LearningStatus,
    ) -> Self {
        let mut anomaly_types = BTreeMap::new();
        let mut recent_anomalies = 0;
        for entry in log.recent(RECENT_ANOMALY_WINDOW) {
            *anomaly_types.entry(entry.anomaly_type).or_insert(0) += 1;
            recent_anomalies += 1;
        }

        Self {
            total_anomalies: log.len(),
            recent_anomalies,
            learning_status,
            data_points: window.len(),
            anomaly_types,
            statistics: *statistics,
            recent_anomalies_list: log.recent(RECENT_ANOMALY_LIST).cloned().collect(),
        }
    }

    pub fn is_learning(&self) -> bool {
        self.learning_status.is_learning()
    }
}

/// Full read-only dump of one engine for external persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub history: Vec<Reading>,
    pub anomalies: Vec<AnomalyLogEntry>,
    pub statistics: Statistics,
    pub exported_at: DateTime<Utc>,
}

impl ExportSnapshot {
    pub(crate) fn collect(window: &WindowStore, log: &AnomalyLog, statistics: &Statistics) -> Self {
        Self {
            history: window.to_vec(),
            anomalies: log.to_vec(),
            statistics: *statistics,
            exported_at: Utc::now(),
        }
    }

    /// Pretty-printed JSON; where it goes is the caller's concern.
    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
