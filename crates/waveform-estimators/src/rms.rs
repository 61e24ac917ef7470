//! True RMS Estimation

use crate::basis::{check_window, WindowPeak, RESYNC_CYCLES};
use crate::error::EstimatorError;

/// Sliding true-RMS estimator over a one-cycle window.
///
/// Squares every sample, harmonics and DC included, so the result is the
/// heating-equivalent value rather than the fundamental alone.
#[derive(Debug, Clone, Copy)]
pub struct RmsEstimator {
    window: usize,
}

impl RmsEstimator {
    /// Create an estimator for `n` samples per cycle
    pub fn new(n: usize) -> Result<Self, EstimatorError> {
        check_window(n)?;
        Ok(Self { window: n })
    }

    /// Samples per cycle
    pub fn window(&self) -> usize {
        self.window
    }

    /// Estimate the RMS value at every index of `x`.
    ///
    /// The first N-1 entries are `None`. A running sum of squares is updated
    /// as the window moves. It is re-summed every few cycles and whenever the
    /// largest sample or a sample with a non-finite square leaves the window,
    /// so a NaN or overflow only affects the windows that contain it.
    pub fn estimate(&self, x: &[f64]) -> Result<Vec<Option<f64>>, EstimatorError> {
        if x.is_empty() {
            return Err(EstimatorError::EmptyInput);
        }

        let n = self.window;
        let mut estimates = vec![None; x.len()];
        if x.len() < n {
            return Ok(estimates);
        }

        let resync_every = n * RESYNC_CYCLES;
        let mut sum_sq = sum_of_squares(&x[..n]);
        let mut peak = WindowPeak::scan(&x[..n], 0);
        for i in (n - 1)..x.len() {
            let start = i + 1 - n;
            if start > 0 {
                let leaving = i - n;
                let leaving_sq = x[leaving] * x[leaving];
                if !leaving_sq.is_finite() || peak.index() == leaving || start % resync_every == 0 {
                    let window = &x[start..=i];
                    sum_sq = sum_of_squares(window);
                    peak = WindowPeak::scan(window, start);
                } else {
                    sum_sq += x[i] * x[i] - leaving_sq;
                    peak.admit(i, x[i]);
                }
            }
            // Cancellation can leave a tiny negative residue. NaN passes through.
            let clamped = if sum_sq < 0.0 { 0.0 } else { sum_sq };
            estimates[i] = Some((clamped / n as f64).sqrt());
        }

        Ok(estimates)
    }

    /// RMS of the single window ending at `index`, summed directly.
    ///
    /// Returns `None` if the window does not fit inside `x`.
    pub(crate) fn rms_at(&self, x: &[f64], index: usize) -> Result<Option<f64>, EstimatorError> {
        if x.is_empty() {
            return Err(EstimatorError::EmptyInput);
        }

        let n = self.window;
        if index + 1 < n || index >= x.len() {
            return Ok(None);
        }
        Ok(Some((sum_of_squares(&x[index + 1 - n..=index]) / n as f64).sqrt()))
    }
}

fn sum_of_squares(window: &[f64]) -> f64 {
    window.iter().map(|v| v * v).sum()
}

/// True RMS of `x` over one-cycle windows of `n` samples
pub fn true_rms(x: &[f64], n: usize) -> Result<Vec<Option<f64>>, EstimatorError> {
    RmsEstimator::new(n)?.estimate(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phasor::dft;
    use proptest::prelude::*;
    use std::f64::consts::{PI, SQRT_2};

    fn tone(amplitude: f64, harmonic: f64, phase: f64, n: usize, len: usize) -> Vec<f64> {
        (0..len)
            .map(|k| amplitude * (2.0 * PI * harmonic * k as f64 / n as f64 + phase).sin())
            .collect()
    }

    #[test]
    fn test_sine_rms() {
        let n = 32;
        let x = tone(230.0, 1.0, 0.7, n, 8 * n);
        let rms = true_rms(&x, n).unwrap();

        assert_eq!(rms.len(), x.len());
        for value in rms.iter().skip(n - 1) {
            assert!((value.unwrap() - 230.0 / SQRT_2).abs() < 1e-9);
        }
    }

    #[test]
    fn test_constant_signal() {
        let rms = true_rms(&[-3.0; 10], 4).unwrap();
        assert!(rms[..3].iter().all(Option::is_none));
        for value in rms.iter().skip(3) {
            assert!((value.unwrap() - 3.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_harmonics_raise_rms_but_not_phasor() {
        let n = 64;
        let (a, b) = (100.0, 30.0);
        let fundamental = tone(a, 1.0, 0.2, n, 4 * n);
        let third = tone(b, 3.0, -0.5, n, 4 * n);
        let x: Vec<f64> = fundamental.iter().zip(&third).map(|(f, h)| f + h).collect();

        let expected_rms = ((a / SQRT_2).powi(2) + (b / SQRT_2).powi(2)).sqrt();
        let rms = true_rms(&x, n).unwrap();
        let phasors = dft(&x, n).unwrap();
        for i in (n - 1)..x.len() {
            assert!((rms[i].unwrap() - expected_rms).abs() < 1e-9);
            assert!((phasors[i].unwrap().magnitude() - a).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rejects_bad_window_and_empty_input() {
        assert_eq!(RmsEstimator::new(0).unwrap_err(), EstimatorError::InvalidWindowSize(0));
        assert_eq!(true_rms(&[1.0], 1).unwrap_err(), EstimatorError::InvalidWindowSize(1));
        assert_eq!(true_rms(&[], 2).unwrap_err(), EstimatorError::EmptyInput);
    }

    #[test]
    fn test_step_after_large_transient() {
        // Fault-level samples followed by a quiet tail must settle back to zero
        let n = 8;
        let mut x = vec![1.0e6; n * 2];
        x.extend(std::iter::repeat(0.0).take(n * RESYNC_CYCLES * 2));
        let rms = true_rms(&x, n).unwrap();
        assert_eq!(rms.last().copied().flatten(), Some(0.0));
        assert_eq!(rms[3 * n - 1], Some(0.0));
    }

    #[test]
    fn test_recovers_after_nan_leaves_window() {
        let n = 4;
        let mut x = vec![1.0; 40];
        x[2] = f64::NAN;
        let rms = true_rms(&x, n).unwrap();

        for value in &rms[3..=5] {
            assert!(value.unwrap().is_nan());
        }
        for value in &rms[6..] {
            assert_eq!(*value, Some(1.0));
        }
    }

    #[test]
    fn test_sliding_matches_direct_sum_around_extreme_samples() {
        let n = 8;
        let mut x = tone(3.0, 1.0, 0.7, n, n * RESYNC_CYCLES + 50);
        x[20] = f64::NAN;
        x[60] = f64::NEG_INFINITY;
        x[100] = 1.0e200;
        x[140] = 1.0e150;
        x[141] = -1.0e150;

        let estimator = RmsEstimator::new(n).unwrap();
        let sliding = estimator.estimate(&x).unwrap();
        for i in (n - 1)..x.len() {
            let direct = estimator.rms_at(&x, i).unwrap().unwrap();
            let slid = sliding[i].unwrap();
            if direct.is_nan() {
                assert!(slid.is_nan(), "expected NaN at {}, got {}", i, slid);
            } else if direct.is_infinite() {
                assert_eq!(slid, direct, "overflow mismatch at {}", i);
            } else {
                let scale = x[i + 1 - n..=i].iter().fold(1.0f64, |m, v| m.max(v.abs()));
                assert!((direct - slid).abs() <= 1e-9 * scale, "mismatch at {}", i);
            }
        }
    }

    #[test]
    fn test_sliding_matches_direct_sum() {
        let n = 5;
        let x: Vec<f64> = (0..(n * RESYNC_CYCLES * 2 + 7))
            .map(|k| ((k * 31) % 17) as f64 - 8.0)
            .collect();
        let estimator = RmsEstimator::new(n).unwrap();
        let sliding = estimator.estimate(&x).unwrap();
        for i in 0..x.len() {
            match (sliding[i], estimator.rms_at(&x, i).unwrap()) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-9, "mismatch at {}", i),
                (None, None) => assert!(i < n - 1),
                other => panic!("definedness differs at {}: {:?}", i, other),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_sine_rms(
            amplitude in 0.1f64..1.0e4,
            phase in -PI..PI,
            n in 3usize..128,
        ) {
            let x = tone(amplitude, 1.0, phase, n, 3 * n);
            let rms = true_rms(&x, n).unwrap();
            let expected = amplitude / SQRT_2;
            prop_assert!(rms[..n - 1].iter().all(Option::is_none));
            for value in rms.iter().skip(n - 1) {
                prop_assert!((value.unwrap() - expected).abs() <= 1e-9 * expected.max(1.0));
            }
        }

        #[test]
        fn prop_rms_is_non_negative_and_deterministic(
            x in prop::collection::vec(-1.0e4f64..1.0e4, 1..300),
            n in 2usize..50,
        ) {
            let first = true_rms(&x, n).unwrap();
            let second = true_rms(&x, n).unwrap();
            prop_assert_eq!(first.len(), x.len());
            for (a, b) in first.iter().zip(&second) {
                prop_assert_eq!(a.map(f64::to_bits), b.map(f64::to_bits));
                if let Some(v) = a {
                    prop_assert!(*v >= 0.0);
                }
            }
        }
    }
}
