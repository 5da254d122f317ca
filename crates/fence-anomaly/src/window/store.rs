//! Bounded FIFO window of recent readings.

use std::collections::VecDeque;

use super::types::Reading;

/// Ordered, size-bounded sequence of the most recent readings.
///
/// Oldest readings are evicted first once the length exceeds `capacity`.
/// Only the owning engine mutates the store; everything downstream reads it.
#[derive(Clone, Debug)]
pub struct WindowStore {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl WindowStore {
    /// Create an empty store holding at most `capacity` readings.
    pub fn new(capacity: usize) -> Self {
        Self {
            readings: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest if the bound is exceeded.
    pub fn append(&mut self, reading: Reading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    /// All stored readings, oldest first.
    pub fn snapshot(&self) -> impl DoubleEndedIterator<Item = &Reading> + ExactSizeIterator {
        self.readings.iter()
    }

    /// Current values of all stored readings, oldest first.
    pub fn currents(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.current).collect()
    }

    /// The reading stored just before the latest one.
    pub fn previous(&self) -> Option<&Reading> {
        let n = self.readings.len();
        if n < 2 {
            return None;
        }
        self.readings.get(n - 2)
    }

    /// Up to `count` readings immediately preceding the latest one, oldest first.
    pub fn preceding(&self, count: usize) -> impl Iterator<Item = &Reading> {
        let n = self.readings.len().saturating_sub(1);
        let start = n.saturating_sub(count);
        self.readings.range(start..n)
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }

    /// Owned copy of the history, for export.
    pub fn to_vec(&self) -> Vec<Reading> {
        self.readings.iter().cloned().collect()
    }
}
