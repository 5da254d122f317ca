//! Window store: the bounded, FIFO-evicted history of recent readings.
//!
//! ```text
//!   analyze(current, voltage) ──► Reading ──► WindowStore (≤ 2 × learning_window)
//!                                                │
//!                                                └── read-only to baseline + detectors
//! ```

pub mod store;
pub mod types;

pub use store::WindowStore;
pub use types::Reading;

/// Weight of the current in the combined score.
pub const CURRENT_WEIGHT: f64 = 0.8;

/// Weight of the voltage in the combined score.
pub const VOLTAGE_WEIGHT: f64 = 0.2;
