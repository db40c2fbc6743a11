//! Truncated infinite-series estimators.
//!
//! | Series | Partial sum | Truncation error |
//! |---|---|---|
//! | Leibniz | 4·Σ (−1)ᵏ/(2k+1) | < 4/(2n+1), O(1/n) |
//! | Nilakantha | 3 + Σ ±4/(i(i+1)(i+2)), i = 2, 4, … | O(1/n³) |
//!
//! Both series alternate, so partial sums oscillate around π and the error
//! is bounded by the magnitude of the first omitted term. Terms are
//! accumulated with [`NeumaierSum`] so that rounding error stays far below
//! truncation error even at millions of terms.

use tracing::trace;

use crate::cancel::CancelToken;
use crate::error::{require_positive, EstimateResult};
use crate::estimate::Method;
use crate::stats::NeumaierSum;

/// Leibniz series: π = 4·(1 − 1/3 + 1/5 − 1/7 + …), truncated to `terms`
/// terms.
///
/// # Errors
/// `InvalidArgument` if `terms == 0`.
///
/// # Examples
/// ```
/// use pi_calculator::series::leibniz;
/// assert_eq!(leibniz(1).unwrap(), 4.0);
/// let pi = leibniz(1_000_000).unwrap();
/// assert!((pi - std::f64::consts::PI).abs() < 1e-5);
/// ```
pub fn leibniz(terms: u64) -> EstimateResult<f64> {
    leibniz_with_cancel(terms, &CancelToken::new())
}

/// [`leibniz`] with cooperative cancellation.
pub fn leibniz_with_cancel(terms: u64, cancel: &CancelToken) -> EstimateResult<f64> {
    require_positive("terms", terms)?;
    trace!(terms, "leibniz");

    let mut acc = NeumaierSum::new();
    for k in 0..terms {
        cancel.poll(k, Method::Leibniz)?;
        let term = 1.0 / (2 * k + 1) as f64;
        if k % 2 == 0 {
            acc.add(term);
        } else {
            acc.add(-term);
        }
    }
    Ok(4.0 * acc.total())
}

/// Nilakantha series: π = 3 + 4/(2·3·4) − 4/(4·5·6) + 4/(6·7·8) − …,
/// truncated to `terms` correction terms.
///
/// # Errors
/// `InvalidArgument` if `terms == 0`.
///
/// # Examples
/// ```
/// use pi_calculator::series::nilakantha;
/// let pi = nilakantha(1_000).unwrap();
/// assert!((pi - std::f64::consts::PI).abs() < 1e-9);
/// ```
pub fn nilakantha(terms: u64) -> EstimateResult<f64> {
    nilakantha_with_cancel(terms, &CancelToken::new())
}

/// [`nilakantha`] with cooperative cancellation.
pub fn nilakantha_with_cancel(terms: u64, cancel: &CancelToken) -> EstimateResult<f64> {
    require_positive("terms", terms)?;
    trace!(terms, "nilakantha");

    let mut acc = NeumaierSum::starting_at(3.0);
    for step in 0..terms {
        cancel.poll(step, Method::Nilakantha)?;
        let i = (2 * step + 2) as f64;
        let term = 4.0 / (i * (i + 1.0) * (i + 2.0));
        if step % 2 == 0 {
            acc.add(term);
        } else {
            acc.add(-term);
        }
    }
    Ok(acc.total())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimateError;
    use crate::stats::absolute_error;

    #[test]
    fn test_leibniz_first_partial_sums() {
        assert_eq!(leibniz(1).unwrap(), 4.0);
        assert!((leibniz(2).unwrap() - 4.0 * (1.0 - 1.0 / 3.0)).abs() < 1e-15);
        assert!((leibniz(3).unwrap() - 4.0 * (1.0 - 1.0 / 3.0 + 1.0 / 5.0)).abs() < 1e-15);
    }

    #[test]
    fn test_leibniz_million_terms() {
        let pi = leibniz(1_000_000).unwrap();
        assert!(absolute_error(pi) < 1e-3);
        // Even term counts undershoot.
        assert!(pi < std::f64::consts::PI);
    }

    #[test]
    fn test_leibniz_error_decreases_across_magnitudes() {
        let errors: Vec<f64> = [1_000, 10_000, 100_000, 1_000_000]
            .iter()
            .map(|&n| absolute_error(leibniz(n).unwrap()))
            .collect();
        for pair in errors.windows(2) {
            assert!(pair[1] < pair[0], "errors not decreasing: {errors:?}");
        }
    }

    #[test]
    fn test_leibniz_zero_terms() {
        assert!(matches!(
            leibniz(0),
            Err(EstimateError::InvalidArgument {
                parameter: "terms",
                ..
            })
        ));
    }

    #[test]
    fn test_nilakantha_first_term() {
        assert!((nilakantha(1).unwrap() - (3.0 + 4.0 / 24.0)).abs() < 1e-15);
        assert!((nilakantha(2).unwrap() - (3.0 + 4.0 / 24.0 - 4.0 / 120.0)).abs() < 1e-15);
    }

    #[test]
    fn test_nilakantha_beats_leibniz_at_1000_terms() {
        let l = absolute_error(leibniz(1_000).unwrap());
        let n = absolute_error(nilakantha(1_000).unwrap());
        assert!(n < l, "nilakantha {n} should beat leibniz {l}");
    }

    #[test]
    fn test_nilakantha_large_terms_stays_accurate() {
        let pi = nilakantha(1_000_000).unwrap();
        assert!(absolute_error(pi) < 1e-14);
    }

    #[test]
    fn test_nilakantha_zero_terms() {
        assert!(matches!(
            nilakantha(0),
            Err(EstimateError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_cancelled_series() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(
            nilakantha_with_cancel(10, &token),
            Err(EstimateError::Cancelled {
                method: Method::Nilakantha
            })
        );
    }
}
