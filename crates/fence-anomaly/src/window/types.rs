//! Reading type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One ingested sample.
///
/// Immutable after construction; `combined_score` is derived once here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Current in amperes.
    pub current: f64,
    /// Voltage in volts.
    pub voltage: f64,
    /// Caller-supplied instant, or wall clock at ingestion.
    pub timestamp: DateTime<Utc>,
    /// `0.8 * current + 0.2 * voltage`.
    pub combined_score: f64,
}

impl Reading {
    /// Build a reading. Values are assumed finite; see [`Reading::checked`].
    pub fn new(current: f64, voltage: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            current,
            voltage,
            timestamp,
            combined_score: Self::combined_score(current, voltage),
        }
    }

    /// Build a reading, rejecting NaN and infinite values.
    pub fn checked(current: f64, voltage: f64, timestamp: DateTime<Utc>) -> EngineResult<Self> {
        validate_finite(current, voltage)?;
        Ok(Self::new(current, voltage, timestamp))
    }

    /// Weighted combination favouring the current, which drives safety.
    pub fn combined_score(current: f64, voltage: f64) -> f64 {
        current * super::CURRENT_WEIGHT + voltage * super::VOLTAGE_WEIGHT
    }
}

/// Reject non-finite inputs; the detectors' arithmetic is undefined for them.
pub(crate) fn validate_finite(current: f64, voltage: f64) -> EngineResult<()> {
    if !current.is_finite() {
        return Err(EngineError::NonFiniteReading {
            field: "current",
            value: current,
        });
    }
    if !voltage.is_finite() {
        return Err(EngineError::NonFiniteReading {
            field: "voltage",
            value: voltage,
        });
    }
    Ok(())
}
