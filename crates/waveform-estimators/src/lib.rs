//! Waveform Estimators
//!
//! Per-sample fundamental phasor (one-cycle DFT) and true-RMS estimates over
//! sampled power-system waveforms. Both estimators return one entry per input
//! sample; entries without a full one-cycle window behind them are `None`.

mod basis;
mod error;
mod phasor;
mod rms;

pub use basis::{samples_per_cycle, DftBasis};
pub use error::EstimatorError;
pub use phasor::{dft, MagnitudeScaling, Phasor, PhasorEstimator};
pub use rms::{true_rms, RmsEstimator};
