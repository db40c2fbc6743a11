//! Numerically stable accumulation and error measures.
//!
//! # Algorithms
//!
//! - **Summation**: Neumaier's improved Kahan summation, used by the series
//!   estimators so that rounding error stays O(ε) however many terms are
//!   added.
//!   Reference: Neumaier (1974), *Zeitschrift für Angewandte Mathematik und
//!   Mechanik* 54(1), pp. 39–51.
//! - **Spread**: Welford's online mean/variance, used by the harness to
//!   summarize repeated runs.
//!   Reference: Welford (1962), *Technometrics* 4(3), pp. 419–420.

use std::f64::consts::PI;

/// Relative error of `estimate` against π: `|estimate − π| / π`.
///
/// # Examples
/// ```
/// use pi_calculator::stats::relative_error;
/// assert_eq!(relative_error(std::f64::consts::PI), 0.0);
/// assert!((relative_error(3.0) - 0.04507034144862795).abs() < 1e-15);
/// ```
pub fn relative_error(estimate: f64) -> f64 {
    (estimate - PI).abs() / PI
}

/// Absolute error of `estimate` against π.
pub fn absolute_error(estimate: f64) -> f64 {
    (estimate - PI).abs()
}

// ---------------------------------------------------------------------------
// Neumaier compensated sum
// ---------------------------------------------------------------------------

/// Streaming Neumaier accumulator.
///
/// Keeps a running compensation term that captures the low-order bits lost
/// when adding operands of different magnitude. Unlike plain Kahan summation
/// it stays correct when the addend is larger than the running sum.
///
/// # Examples
/// ```
/// use pi_calculator::stats::NeumaierSum;
/// let mut acc = NeumaierSum::new();
/// for x in [1.0, 1e100, 1.0, -1e100] {
///     acc.add(x);
/// }
/// assert_eq!(acc.total(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the accumulator at `value`.
    pub fn starting_at(value: f64) -> Self {
        Self {
            sum: value,
            compensation: 0.0,
        }
    }

    #[inline]
    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Compensated total of everything added so far.
    pub fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Neumaier-compensated sum of a slice.
pub fn neumaier_sum(data: &[f64]) -> f64 {
    let mut acc = NeumaierSum::new();
    for &x in data {
        acc.add(x);
    }
    acc.total()
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming mean/variance/min/max in a single pass.
///
/// # Examples
/// ```
/// use pi_calculator::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct WelfordAccumulator {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl WelfordAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);

        if self.count == 1 {
            self.mean = value;
            return;
        }

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, or `None` before the first sample.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample variance (n − 1 denominator), or `None` with fewer than 2
    /// samples.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn sample_std_dev(&self) -> Option<f64> {
        self.sample_variance().map(f64::sqrt)
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

impl Default for WelfordAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn welford_variance_non_negative(
            data in proptest::collection::vec(-1e6_f64..1e6, 2..100),
        ) {
            let mut acc = WelfordAccumulator::new();
            for &x in &data {
                acc.update(x);
            }
            prop_assert!(acc.sample_variance().unwrap() >= 0.0);
        }

        #[test]
        fn welford_mean_within_bounds(
            data in proptest::collection::vec(-1e6_f64..1e6, 1..100),
        ) {
            let mut acc = WelfordAccumulator::new();
            for &x in &data {
                acc.update(x);
            }
            let m = acc.mean().unwrap();
            prop_assert!(m >= acc.min().unwrap() - 1e-9);
            prop_assert!(m <= acc.max().unwrap() + 1e-9);
        }

        #[test]
        fn neumaier_matches_naive_on_same_sign_integers(
            data in proptest::collection::vec(0_u32..1000, 0..200),
        ) {
            let floats: Vec<f64> = data.iter().map(|&x| x as f64).collect();
            let exact: u64 = data.iter().map(|&x| x as u64).sum();
            prop_assert_eq!(neumaier_sum(&floats), exact as f64);
        }
    }
}
