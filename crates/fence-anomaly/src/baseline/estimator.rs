//! Statistics estimator: full recompute over the window store.

use tracing::debug;

use crate::window::WindowStore;

use super::types::{LearningStatus, Statistics};

/// Tracks window statistics and the one-way learning → monitoring switch.
#[derive(Clone, Debug)]
pub struct StatisticsEstimator {
    statistics: Statistics,
    status: LearningStatus,
    bound_multiplier: f64,
    min_samples: usize,
    learning_window: usize,
}

impl StatisticsEstimator {
    /// Create an estimator in the learning phase with zeroed statistics.
    pub fn new(bound_multiplier: f64, min_samples: usize, learning_window: usize) -> Self {
        Self {
            statistics: Statistics::default(),
            status: LearningStatus::Learning,
            bound_multiplier,
            min_samples,
            learning_window,
        }
    }

    /// Recompute statistics from the store.
    ///
    /// Statistics are left untouched below `min_samples`. Independently of
    /// that floor, the learning phase ends permanently once the store
    /// reaches `learning_window` readings.
    pub fn update(&mut self, store: &WindowStore) {
        if store.len() >= self.min_samples {
            if let Some(stats) = Statistics::from_values(&store.currents(), self.bound_multiplier)
            {
                self.statistics = stats;
            }
        }

        if self.status.is_learning() && store.len() >= self.learning_window {
            self.status = LearningStatus::Monitoring;
            debug!(
                samples = store.len(),
                mean = self.statistics.mean,
                std = self.statistics.std,
                "learning phase complete"
            );
        }
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn status(&self) -> LearningStatus {
        self.status
    }

    pub fn is_learning(&self) -> bool {
        self.status.is_learning()
    }

    /// Back to zeroed statistics and the learning phase.
    pub fn reset(&mut self) {
        self.statistics = Statistics::default();
        self.status = LearningStatus::Learning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Reading;
    use chrono::Utc;

    fn store_with(values: &[f64], capacity: usize) -> WindowStore {
        let mut store = WindowStore::new(capacity);
        for &v in values {
            store.append(Reading::new(v, 8.5, Utc::now()));
        }
        store
    }

    #[test]
    fn update_is_noop_below_min_samples() {
        let mut est = StatisticsEstimator::new(2.5, 10, 50);
        let store = store_with(&[5.0; 9], 100);
        est.update(&store);
        assert_eq!(*est.statistics(), Statistics::default());
        assert!(est.is_learning());
    }

    #[test]
    fn update_retains_previous_statistics_below_min_samples() {
        let mut est = StatisticsEstimator::new(2.5, 10, 50);
        est.update(&store_with(&[5.0; 12], 100));
        let before = *est.statistics();

        est.update(&store_with(&[1.0, 2.0], 100));
        assert_eq!(*est.statistics(), before);
    }

    #[test]
    fn update_computes_over_window() {
        let mut est = StatisticsEstimator::new(2.5, 10, 50);
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        est.update(&store_with(&values, 100));
        assert!((est.statistics().mean - 4.5).abs() < 1e-12);
        assert!(est.statistics().std > 0.0);
    }

    #[test]
    fn learning_ends_at_learning_window() {
        let mut est = StatisticsEstimator::new(2.5, 10, 50);
        est.update(&store_with(&[5.0; 49], 100));
        assert!(est.is_learning());
        est.update(&store_with(&[5.0; 50], 100));
        assert_eq!(est.status(), LearningStatus::Monitoring);
    }

    #[test]
    fn learning_ends_even_below_statistics_floor() {
        let mut est = StatisticsEstimator::new(2.5, 10, 6);
        est.update(&store_with(&[5.0; 5], 100));
        assert!(est.is_learning());
        est.update(&store_with(&[5.0; 6], 100));
        assert_eq!(est.status(), LearningStatus::Monitoring);
        // statistics still wait for the sample floor
        assert_eq!(*est.statistics(), Statistics::default());
    }

    #[test]
    fn monitoring_never_reverts() {
        let mut est = StatisticsEstimator::new(2.5, 10, 50);
        est.update(&store_with(&[5.0; 60], 100));
        assert!(!est.is_learning());
        est.update(&store_with(&[5.0; 12], 100));
        assert!(!est.is_learning());
    }

    #[test]
    fn reset_restores_learning() {
        let mut est = StatisticsEstimator::new(2.5, 10, 50);
        est.update(&store_with(&[5.0, 6.0].repeat(30), 100));
        est.reset();
        assert!(est.is_learning());
        assert_eq!(*est.statistics(), Statistics::default());
    }
}
