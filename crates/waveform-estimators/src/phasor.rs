//! One-Cycle DFT Phasor Estimation
//!
//! Correlates each trailing one-cycle window against cosine and sine
//! references at the nominal frequency. Over exactly one cycle this rejects
//! DC and every integer harmonic, leaving the fundamental's phasor.
//!
//! The window sum is kept with a fixed-reference accumulator: each sample is
//! weighted by the reference at its absolute position modulo N, so moving the
//! window costs one multiply-add per component. The accumulated sum is then
//! rotated back so the reference starts at the oldest sample in the window.
//! The sum is rebuilt from the window itself whenever its largest or a
//! non-finite sample leaves, so every output depends only on its own window.

use crate::basis::{check_window, DftBasis, WindowPeak, RESYNC_CYCLES};
use crate::error::EstimatorError;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};
use std::sync::Arc;

/// Scaling applied to the phasor magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnitudeScaling {
    /// Peak amplitude of the fundamental (`2/N` normalization)
    #[default]
    Peak,
    /// RMS value of the fundamental (peak divided by √2)
    Rms,
}

impl MagnitudeScaling {
    /// Normalization applied to the raw correlation sums for window size `n`
    pub fn factor(&self, n: usize) -> f64 {
        match self {
            MagnitudeScaling::Peak => 2.0 / n as f64,
            MagnitudeScaling::Rms => SQRT_2 / n as f64,
        }
    }
}

/// Fundamental-frequency phasor for one window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Phasor {
    re: f64,
    im: f64,
}

impl Phasor {
    /// Create from the cosine (`re`) and sine (`im`) correlation components
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Cosine-reference component
    pub fn re(&self) -> f64 {
        self.re
    }

    /// Sine-reference component
    pub fn im(&self) -> f64 {
        self.im
    }

    pub fn magnitude(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// `atan2(im, re)` in radians, within (-π, π]
    pub fn phase(&self) -> f64 {
        let phase = self.im.atan2(self.re);
        if phase <= -PI {
            phase + 2.0 * PI
        } else {
            phase
        }
    }

    pub fn phase_degrees(&self) -> f64 {
        self.phase().to_degrees()
    }

    pub fn as_complex(&self) -> Complex<f64> {
        Complex::new(self.re, self.im)
    }
}

impl From<Phasor> for Complex<f64> {
    fn from(phasor: Phasor) -> Self {
        phasor.as_complex()
    }
}

/// Sliding one-cycle DFT phasor estimator
#[derive(Debug, Clone)]
pub struct PhasorEstimator {
    basis: Arc<DftBasis>,
    scaling: MagnitudeScaling,
}

impl PhasorEstimator {
    /// Create an estimator for `n` samples per cycle with peak scaling
    pub fn new(n: usize) -> Result<Self, EstimatorError> {
        Self::with_scaling(n, MagnitudeScaling::default())
    }

    /// Create an estimator with an explicit magnitude convention
    pub fn with_scaling(n: usize, scaling: MagnitudeScaling) -> Result<Self, EstimatorError> {
        check_window(n)?;
        Ok(Self {
            basis: DftBasis::shared(n)?,
            scaling,
        })
    }

    /// Samples per cycle
    pub fn window(&self) -> usize {
        self.basis.len()
    }

    pub fn scaling(&self) -> MagnitudeScaling {
        self.scaling
    }

    /// Estimate the phasor at every index of `x`.
    ///
    /// Index `i` is `None` until a full window `x[i-N+1..=i]` exists, i.e.
    /// for the first N-1 samples. The output has the same length as `x`.
    pub fn estimate(&self, x: &[f64]) -> Result<Vec<Option<Phasor>>, EstimatorError> {
        if x.is_empty() {
            return Err(EstimatorError::EmptyInput);
        }

        let n = self.window();
        let mut estimates = vec![None; x.len()];
        if x.len() < n {
            return Ok(estimates);
        }

        let cos = self.basis.cos();
        let sin = self.basis.sin();
        let factor = self.scaling.factor(n);
        let resync_every = n * RESYNC_CYCLES;

        let (mut acc_re, mut acc_im) = self.basis.correlate(&x[..n], 0);
        let mut peak = WindowPeak::scan(&x[..n], 0);
        for i in (n - 1)..x.len() {
            let start = i + 1 - n;
            if start > 0 {
                let leaving = i - n;
                // A non-finite or dominant sample leaving would poison the running sum
                if !x[leaving].is_finite() || peak.index() == leaving || start % resync_every == 0 {
                    let window = &x[start..=i];
                    (acc_re, acc_im) = self.basis.correlate(window, start % n);
                    peak = WindowPeak::scan(window, start);
                } else {
                    let k = i % n;
                    let delta = x[i] - x[leaving];
                    acc_re += delta * cos[k];
                    acc_im += delta * sin[k];
                    peak.admit(i, x[i]);
                }
            }

            // Rotate so the reference starts at the oldest sample
            let k0 = start % n;
            let re = factor * (acc_re * cos[k0] + acc_im * sin[k0]);
            let im = factor * (acc_im * cos[k0] - acc_re * sin[k0]);
            estimates[i] = Some(Phasor::new(re, im));
        }

        Ok(estimates)
    }

    /// Phasor of the single window ending at `index`, summed directly.
    ///
    /// Returns `None` if the window does not fit inside `x`.
    pub(crate) fn phasor_at(&self, x: &[f64], index: usize) -> Result<Option<Phasor>, EstimatorError> {
        if x.is_empty() {
            return Err(EstimatorError::EmptyInput);
        }

        let n = self.window();
        if index + 1 < n || index >= x.len() {
            return Ok(None);
        }

        let factor = self.scaling.factor(n);
        let (re, im) = self.basis.correlate(&x[index + 1 - n..=index], 0);
        Ok(Some(Phasor::new(factor * re, factor * im)))
    }
}

/// One-cycle DFT phasors of `x` with peak scaling
pub fn dft(x: &[f64], n: usize) -> Result<Vec<Option<Phasor>>, EstimatorError> {
    PhasorEstimator::new(n)?.estimate(x)
}
