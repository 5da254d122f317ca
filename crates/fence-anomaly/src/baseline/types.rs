//! Statistics and learning-phase type definitions.

use serde::{Deserialize, Serialize};

/// Summary of the current window's `current` values.
///
/// `std` is the sample standard deviation (divisor `n - 1`).
/// Bounds are `mean ± k·std` with `k` the z-score threshold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub std: f64,
    pub upper_bound: f64,
    pub lower_bound: f64,
}

impl Statistics {
    /// Compute statistics over `values` with bound multiplier `k`.
    ///
    /// Returns `None` for fewer than two values.
    pub fn from_values(values: &[f64], k: f64) -> Option<Self> {
        let n = values.len();
        if n < 2 {
            return None;
        }
        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let std = variance.sqrt();
        Some(Self {
            mean,
            std,
            upper_bound: mean + k * std,
            lower_bound: mean - k * std,
        })
    }
}

/// Whether bounds are still provisional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningStatus {
    Learning,
    Monitoring,
}

impl LearningStatus {
    pub fn is_learning(&self) -> bool {
        matches!(self, Self::Learning)
    }
}

impl std::fmt::Display for LearningStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Learning => write!(f, "Learning"),
            Self::Monitoring => write!(f, "Monitoring"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_default_is_zeroed() {
        let s = Statistics::default();
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.std, 0.0);
        assert_eq!(s.upper_bound, 0.0);
        assert_eq!(s.lower_bound, 0.0);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        // mean 5, squared deviations sum to 32, n - 1 = 7
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let s = Statistics::from_values(&values, 2.5).unwrap();
        assert!((s.mean - 5.0).abs() < 1e-12);
        assert!((s.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((s.upper_bound - (s.mean + 2.5 * s.std)).abs() < 1e-12);
        assert!((s.lower_bound - (s.mean - 2.5 * s.std)).abs() < 1e-12);
    }

    #[test]
    fn constant_values_have_zero_std() {
        let s = Statistics::from_values(&[10.0; 25], 2.5).unwrap();
        assert_eq!(s.std, 0.0);
        assert_eq!(s.upper_bound, s.mean);
    }

    #[test]
    fn too_few_values() {
        assert!(Statistics::from_values(&[1.0], 2.5).is_none());
        assert!(Statistics::from_values(&[], 2.5).is_none());
    }

    #[test]
    fn learning_status_display_and_serde() {
        assert_eq!(LearningStatus::Learning.to_string(), "Learning");
        assert_eq!(LearningStatus::Monitoring.to_string(), "Monitoring");
        let json = serde_json::to_string(&LearningStatus::Monitoring).unwrap();
        assert_eq!(json, "\"Monitoring\"");
        assert!(LearningStatus::Learning.is_learning());
    }
}
