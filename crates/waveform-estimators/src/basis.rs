//! One-Cycle Fourier Reference Basis

use crate::error::EstimatorError;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

/// Sliding accumulators re-sum their window from scratch at least once every
/// this many cycles, even while the window peak keeps being replaced.
pub(crate) const RESYNC_CYCLES: usize = 64;

/// Relative tolerance when deriving samples per cycle from two frequencies
const CYCLE_TOLERANCE: f64 = 1e-6;

/// Process-wide cache of bases keyed by samples per cycle
static BASIS_CACHE: OnceLock<RwLock<HashMap<usize, Arc<DftBasis>>>> = OnceLock::new();

/// Cosine and sine reference tables for a one-cycle correlation over N samples.
///
/// Immutable once built. Entry `k` holds `cos(2πk/N)` and `sin(2πk/N)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DftBasis {
    cos: Box<[f64]>,
    sin: Box<[f64]>,
}

impl DftBasis {
    /// Build the tables for `n` samples per cycle
    pub fn new(n: usize) -> Result<Self, EstimatorError> {
        check_window(n)?;
        let step = 2.0 * PI / n as f64;
        let (cos, sin): (Vec<f64>, Vec<f64>) = (0..n)
            .map(|k| {
                let angle = step * k as f64;
                (angle.cos(), angle.sin())
            })
            .unzip();

        Ok(Self {
            cos: cos.into_boxed_slice(),
            sin: sin.into_boxed_slice(),
        })
    }

    /// Fetch the cached basis for `n`, building it on first use
    pub fn shared(n: usize) -> Result<Arc<Self>, EstimatorError> {
        check_window(n)?;
        let cache = BASIS_CACHE.get_or_init(|| RwLock::new(HashMap::new()));

        if let Some(basis) = cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&n)
        {
            return Ok(Arc::clone(basis));
        }

        let built = Arc::new(Self::new(n)?);
        let mut entries = cache.write().unwrap_or_else(PoisonError::into_inner);
        let basis = entries.entry(n).or_insert_with(|| {
            debug!("Built DFT basis for N={}", n);
            built
        });
        Ok(Arc::clone(basis))
    }

    /// Samples per cycle
    pub fn len(&self) -> usize {
        self.cos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cos.is_empty()
    }

    pub fn cos(&self) -> &[f64] {
        &self.cos
    }

    pub fn sin(&self) -> &[f64] {
        &self.sin
    }

    /// Correlate `samples` against the basis, starting the reference at
    /// table position `offset`. Returns the unscaled (cosine, sine) sums.
    pub(crate) fn correlate(&self, samples: &[f64], offset: usize) -> (f64, f64) {
        let n = self.len();
        samples
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(re, im), (k, &x)| {
                let idx = (offset + k) % n;
                (re + x * self.cos[idx], im + x * self.sin[idx])
            })
    }
}

/// Samples per nominal cycle for a recorder running at `sample_rate_hz`
pub fn samples_per_cycle(sample_rate_hz: f64, nominal_hz: f64) -> Result<usize, EstimatorError> {
    let non_integral = EstimatorError::NonIntegralCycle {
        sample_rate_hz,
        nominal_hz,
    };
    if !(sample_rate_hz.is_finite() && nominal_hz.is_finite() && nominal_hz > 0.0) {
        return Err(non_integral);
    }

    let exact = sample_rate_hz / nominal_hz;
    let rounded = exact.round();
    if rounded < 0.0 || (exact - rounded).abs() > CYCLE_TOLERANCE * exact.abs().max(1.0) {
        return Err(non_integral);
    }

    let n = rounded as usize;
    check_window(n)?;
    Ok(n)
}

/// Largest-magnitude sample of a sliding window, newest on ties.
///
/// Sliding sums re-sum their window once this sample leaves, so the
/// cancellation error it caused never outlives it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowPeak {
    index: usize,
    magnitude: f64,
}

impl WindowPeak {
    /// Scan `window`, whose first sample sits at absolute index `start`
    pub(crate) fn scan(window: &[f64], start: usize) -> Self {
        let mut peak = Self {
            index: start,
            magnitude: f64::NEG_INFINITY,
        };
        for (k, &v) in window.iter().enumerate() {
            peak.admit(start + k, v);
        }
        peak
    }

    /// Account for the sample entering at `index`. NaN never becomes the peak.
    pub(crate) fn admit(&mut self, index: usize, value: f64) {
        if value.abs() >= self.magnitude {
            self.index = index;
            self.magnitude = value.abs();
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

pub(crate) fn check_window(n: usize) -> Result<(), EstimatorError> {
    if n < 2 {
        Err(EstimatorError::InvalidWindowSize(n))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_values() {
        let basis = DftBasis::new(4).unwrap();
        assert_eq!(basis.len(), 4);
        let expected_cos = [1.0, 0.0, -1.0, 0.0];
        let expected_sin = [0.0, 1.0, 0.0, -1.0];
        for k in 0..4 {
            assert!((basis.cos()[k] - expected_cos[k]).abs() < 1e-12);
            assert!((basis.sin()[k] - expected_sin[k]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_short_window() {
        assert_eq!(DftBasis::new(0).unwrap_err(), EstimatorError::InvalidWindowSize(0));
        assert_eq!(DftBasis::shared(1).unwrap_err(), EstimatorError::InvalidWindowSize(1));
    }

    #[test]
    fn test_shared_basis_is_reused() {
        let a = DftBasis::shared(24).unwrap();
        let b = DftBasis::shared(24).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, DftBasis::new(24).unwrap());
    }

    #[test]
    fn test_shared_basis_across_threads() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| DftBasis::shared(48).unwrap()))
            .collect();
        let bases: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for basis in &bases[1..] {
            assert!(Arc::ptr_eq(&bases[0], basis));
        }
    }

    #[test]
    fn test_correlate_wraps_offset() {
        let basis = DftBasis::new(4).unwrap();
        // Offset 1 starts the reference at 90 degrees
        let (re, im) = basis.correlate(&[1.0, 0.0, 0.0, 0.0], 1);
        assert!(re.abs() < 1e-12);
        assert!((im - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_peak_prefers_newest_and_skips_nan() {
        let peak = WindowPeak::scan(&[1.0, -3.0, f64::NAN, 3.0, 2.0], 10);
        assert_eq!(peak.index(), 13);

        let mut peak = WindowPeak::scan(&[f64::NAN, f64::NAN], 4);
        assert_eq!(peak.index(), 4);
        peak.admit(6, 0.0);
        assert_eq!(peak.index(), 6);
        peak.admit(7, f64::INFINITY);
        peak.admit(8, 1.0e300);
        assert_eq!(peak.index(), 7);
    }

    #[test]
    fn test_samples_per_cycle() {
        assert_eq!(samples_per_cycle(1920.0, 60.0).unwrap(), 32);
        assert_eq!(samples_per_cycle(4000.0, 50.0).unwrap(), 80);
        assert!(matches!(
            samples_per_cycle(1000.0, 60.0),
            Err(EstimatorError::NonIntegralCycle { .. })
        ));
        assert_eq!(
            samples_per_cycle(50.0, 50.0).unwrap_err(),
            EstimatorError::InvalidWindowSize(1)
        );
        assert!(samples_per_cycle(1000.0, 0.0).is_err());
    }
}
