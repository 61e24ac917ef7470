//! Estimator Error Types

use thiserror::Error;

/// Errors raised by the windowed estimators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    /// Cycle length too short for a meaningful one-cycle window
    #[error("Invalid window size {0}: at least 2 samples per cycle are required")]
    InvalidWindowSize(usize),

    /// No samples to estimate over
    #[error("Empty input: cannot estimate over a sequence with no samples")]
    EmptyInput,

    /// Sample rate is not an integer multiple of the nominal frequency
    #[error("Sample rate {sample_rate_hz} Hz is not an integer multiple of {nominal_hz} Hz")]
    NonIntegralCycle { sample_rate_hz: f64, nominal_hz: f64 },
}
