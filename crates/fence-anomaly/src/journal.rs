//! Anomaly log: bounded record of positive verdicts for reporting.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyType, EnsembleVerdict};
use crate::window::Reading;

/// Maximum retained log entries (memory bound).
pub const MAX_LOGGED_ANOMALIES: usize = 20;

/// Unique identifier for a logged anomaly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnomalyId(pub String);

impl AnomalyId {
    /// Generate a new unique anomaly ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for AnomalyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnomalyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anomaly:{}", self.0)
    }
}

/// A reading flattened together with the verdict that flagged it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyLogEntry {
    pub id: AnomalyId,
    #[serde(flatten)]
    pub reading: Reading,
    pub anomaly_type: AnomalyType,
    pub confidence: f64,
    pub reason: Option<String>,
}

/// FIFO log of the most recent positive verdicts.
#[derive(Clone, Debug)]
pub struct AnomalyLog {
    entries: VecDeque<AnomalyLogEntry>,
    capacity: usize,
}

impl AnomalyLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a verdict. Only positive verdicts are kept; returns the new
    /// entry when one was written.
    pub fn record(
        &mut self,
        reading: &Reading,
        verdict: &EnsembleVerdict,
    ) -> Option<&AnomalyLogEntry> {
        if !verdict.is_anomaly {
            return None;
        }
        self.entries.push_back(AnomalyLogEntry {
            id: AnomalyId::new(),
            reading: reading.clone(),
            anomaly_type: verdict.anomaly_type,
            confidence: verdict.confidence,
            reason: verdict.reason.clone(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.entries.back()
    }

    /// Up to `count` most recent entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &AnomalyLogEntry> {
        let start = self.entries.len().saturating_sub(count);
        self.entries.range(start..)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_vec(&self) -> Vec<AnomalyLogEntry> {
        self.entries.iter().cloned().collect()
    }
}
