//! Property tests for the engine's streaming invariants.

use fence_anomaly::*;
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Arbitrary current sequences, including wild outliers.
fn arb_currents(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            8 => 9.0f64..13.0,
            1 => 0.0f64..30.0,
            1 => -100.0f64..1000.0,
        ],
        0..max_len,
    )
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The window never holds more than twice the learning window.
    #[test]
    fn window_never_exceeds_capacity(currents in arb_currents(260)) {
        let mut engine = AnomalyEngine::with_defaults();
        for c in currents {
            engine.analyze(c, 8.5, None);
            prop_assert!(engine.insights().data_points <= 100);
        }
    }

    /// Learning ends exactly when the 50th reading arrives and never resumes.
    #[test]
    fn learning_ends_once(currents in arb_currents(200)) {
        let mut engine = AnomalyEngine::with_defaults();
        for (i, c) in currents.into_iter().enumerate() {
            engine.analyze(c, 8.5, None);
            prop_assert_eq!(engine.learning_status().is_learning(), i < 49);
        }
    }

    /// Fewer than 20 stored readings always gives insufficient data.
    #[test]
    fn insufficient_data_below_floor(currents in arb_currents(19)) {
        let mut engine = AnomalyEngine::with_defaults();
        for c in currents {
            let v = engine.analyze(c, 8.5, None);
            prop_assert_eq!(v.anomaly_type, AnomalyType::InsufficientData);
            prop_assert!(!v.is_anomaly);
        }
    }

    /// Ensemble and per-method confidences stay in [0, 1].
    #[test]
    fn confidence_always_bounded(currents in arb_currents(150)) {
        let mut engine = AnomalyEngine::with_defaults();
        for c in currents {
            let v = engine.analyze(c, 8.5, None);
            prop_assert!((0.0..=1.0).contains(&v.confidence));
            for d in &v.details {
                prop_assert!((0.0..=1.0).contains(&d.confidence));
            }
        }
    }

    /// A positive verdict over the safety ceiling is always a critical overload.
    #[test]
    fn overload_has_top_priority(currents in arb_currents(150)) {
        let mut engine = AnomalyEngine::with_defaults();
        for c in currents {
            let v = engine.analyze(c, 8.5, None);
            if v.is_anomaly && c > 13.0 {
                prop_assert_eq!(v.anomaly_type, AnomalyType::CriticalOverload);
            }
        }
    }

    /// The anomaly log holds at most 20 entries.
    #[test]
    fn log_is_bounded(currents in arb_currents(260)) {
        let mut engine = AnomalyEngine::with_defaults();
        for c in currents {
            engine.analyze(c, 8.5, None);
            prop_assert!(engine.insights().total_anomalies <= 20);
        }
        prop_assert!(engine.export().anomalies.len() <= 20);
    }

    /// Constant input never triggers the z-score method.
    #[test]
    fn constant_input_never_triggers_zscore(value in 0.0f64..30.0, n in 20usize..120) {
        let mut engine = AnomalyEngine::with_defaults();
        for _ in 0..n {
            let v = engine.analyze(value, 8.5, None);
            prop_assert!(!v.methods_triggered.contains(&DetectionMethod::ZScore));
        }
    }
}
