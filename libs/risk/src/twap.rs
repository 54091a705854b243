//! Rolling equal-weight TWAP over a fixed number of samples

use crate::error::{Result, RiskError};
use std::collections::VecDeque;
use tracing::warn;

/// Default number of samples kept by the oracle
pub const DEFAULT_TWAP_WINDOW: usize = 20;

/// Fixed-window rolling mean of reference prices.
///
/// `push` and `value` are O(1) in steady state: a running sum is kept
/// alongside the FIFO and the evicted sample is subtracted once the window
/// is full. Not thread-safe; callers serialize access.
#[derive(Debug, Clone)]
pub struct TwapOracle {
    window: usize,
    samples: VecDeque<f64>,
    sum: f64,
}

impl TwapOracle {
    /// Create an empty oracle holding up to `window` samples
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(RiskError::InvalidWindow(window));
        }

        Ok(Self {
            window,
            samples: VecDeque::with_capacity(window),
            sum: 0.0,
        })
    }

    /// Append a sample, evicting the oldest when the window is full.
    ///
    /// Non-finite samples are dropped: a NaN or infinity in the running sum
    /// would survive its own eviction. The sum is rebuilt from the window
    /// when an eviction would leave it overflowed or imprecise.
    pub fn push(&mut self, price: f64) {
        if !price.is_finite() {
            warn!(price, "Dropping non-finite TWAP sample");
            return;
        }

        let mut rebuild = false;
        if self.samples.len() == self.window {
            if let Some(oldest) = self.samples.pop_front() {
                // Subtracting a sample that dominates the sum (or an
                // overflowed sum) cancels most of its precision
                if self.sum.is_finite() && oldest.abs() <= 0.5 * self.sum.abs() {
                    self.sum -= oldest;
                } else {
                    rebuild = true;
                }
            }
        }
        self.samples.push_back(price);

        if rebuild {
            self.sum = self.samples.iter().sum();
        } else {
            self.sum += price;
        }
    }

    /// Push a sequence of samples in order
    pub fn warm<I>(&mut self, prices: I)
    where
        I: IntoIterator<Item = f64>,
    {
        for price in prices {
            self.push(price);
        }
    }

    /// Mean of the samples in the window; 0 when empty
    pub fn value(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True once the window is full
    pub fn is_warm(&self) -> bool {
        self.samples.len() == self.window
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }
}

impl Default for TwapOracle {
    fn default() -> Self {
        Self {
            window: DEFAULT_TWAP_WINDOW,
            samples: VecDeque::with_capacity(DEFAULT_TWAP_WINDOW),
            sum: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_window_rejected() {
        assert_eq!(TwapOracle::new(0).unwrap_err(), RiskError::InvalidWindow(0));
    }

    #[test]
    fn test_empty_value_is_zero() {
        let oracle = TwapOracle::new(5).unwrap();
        assert_eq!(oracle.value(), 0.0);
        assert!(oracle.is_empty());
        assert_eq!(oracle.latest(), None);
    }

    #[test]
    fn test_warm_with_constant_is_exact() {
        let mut oracle = TwapOracle::new(8).unwrap();
        oracle.warm([125.0; 8]);

        assert_eq!(oracle.value(), 125.0);
        assert!(oracle.is_warm());
    }

    #[test]
    fn test_partial_window_averages_what_it_has() {
        let mut oracle = TwapOracle::new(4).unwrap();
        oracle.push(1.0);
        oracle.push(3.0);

        assert_eq!(oracle.value(), 2.0);
        assert!(!oracle.is_warm());
    }

    #[test]
    fn test_oldest_sample_is_evicted() {
        let mut oracle = TwapOracle::new(3).unwrap();
        oracle.warm([1.0, 2.0, 3.0, 4.0]);

        assert_eq!(oracle.len(), 3);
        assert_eq!(oracle.value(), 3.0);
        assert_eq!(oracle.latest(), Some(4.0));
    }

    #[test]
    fn test_constant_stream_converges() {
        let mut oracle = TwapOracle::new(5).unwrap();
        oracle.warm([10.0, 50.0, 90.0]);
        oracle.warm(std::iter::repeat(42.0).take(5));

        assert!((oracle.value() - 42.0).abs() < 1e-12);
    }

    #[test]
    fn test_non_finite_samples_are_dropped() {
        let mut oracle = TwapOracle::new(4).unwrap();
        oracle.push(f64::NAN);
        oracle.push(f64::INFINITY);
        oracle.push(f64::NEG_INFINITY);

        assert!(oracle.is_empty());
        assert_eq!(oracle.value(), 0.0);

        oracle.warm([125.0; 8]);
        oracle.push(f64::NAN);
        assert_eq!(oracle.value(), 125.0);
        assert_eq!(oracle.latest(), Some(125.0));
    }

    #[test]
    fn test_overflowed_sum_recovers_after_eviction() {
        let mut oracle = TwapOracle::new(2).unwrap();
        oracle.warm([f64::MAX, f64::MAX]);
        assert!(oracle.value().is_infinite());

        oracle.warm([125.0, 125.0]);
        assert_eq!(oracle.value(), 125.0);
    }

    #[test]
    fn test_default_window() {
        assert_eq!(TwapOracle::default().window(), DEFAULT_TWAP_WINDOW);
    }
}
