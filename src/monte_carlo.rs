//! Monte Carlo estimation of π by sampling the unit square.
//!
//! Points are drawn uniformly from `[-1, 1]²`. The fraction landing inside the
//! inscribed unit circle approaches π/4, so
//!
//! ```text
//! π ≈ 4 · inside / samples
//! ```
//!
//! # Accuracy
//!
//! The count of points inside is binomial with p = π/4, so the standard
//! error of the estimate is `4·√(p(1−p)/n) ≈ 1.64/√n`. A single run carries
//! no convergence guarantee, only the expected error shrinking as 1/√n.
//!
//! # Determinism
//!
//! A seeded run is bit-reproducible on the same platform. An unseeded run
//! draws fresh OS entropy and returns a different value on every call. That
//! is the intended behaviour of an unseeded run.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cancel::CancelToken;
use crate::error::{require_positive, EstimateResult};
use crate::estimate::Method;
use crate::random::{point_in_square, sampling_rng};

/// Estimates π from `samples` random points.
///
/// `seed = None` uses OS entropy, so repeated calls differ.
///
/// # Errors
/// `InvalidArgument` if `samples == 0`.
///
/// # Examples
/// ```
/// use pi_calculator::monte_carlo::monte_carlo;
/// let a = monte_carlo(100_000, Some(42)).unwrap();
/// let b = monte_carlo(100_000, Some(42)).unwrap();
/// assert_eq!(a.to_bits(), b.to_bits());
/// assert!((a - std::f64::consts::PI).abs() < 0.05);
/// ```
pub fn monte_carlo(samples: u64, seed: Option<u64>) -> EstimateResult<f64> {
    let mut rng = sampling_rng(seed);
    monte_carlo_with_rng(samples, &mut rng, &CancelToken::new())
}

/// Estimates π with a caller-supplied random source.
pub fn monte_carlo_with_rng<R: Rng + ?Sized>(
    samples: u64,
    rng: &mut R,
    cancel: &CancelToken,
) -> EstimateResult<f64> {
    require_positive("samples", samples)?;
    trace!(samples, "monte carlo");
    let inside = count_inside(samples, rng, cancel)?;
    Ok(4.0 * inside as f64 / samples as f64)
}

fn count_inside<R: Rng + ?Sized>(
    samples: u64,
    rng: &mut R,
    cancel: &CancelToken,
) -> EstimateResult<u64> {
    let mut inside = 0_u64;
    for n in 0..samples {
        cancel.poll(n, Method::MonteCarlo)?;
        let (x, y) = point_in_square(rng);
        if x * x + y * y <= 1.0 {
            inside += 1;
        }
    }
    Ok(inside)
}

// ---------------------------------------------------------------------------
// Convergence trace
// ---------------------------------------------------------------------------

/// Running state after one frame of a [`convergence_trace`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    /// Zero-based frame index.
    pub frame: u64,
    /// Points drawn so far, across all frames.
    pub total_points: u64,
    /// Points inside the circle so far.
    pub inside: u64,
    /// `4 · inside / total_points`.
    pub estimate: f64,
}

/// Draws `frames` batches of `points_per_frame` points and records the
/// cumulative estimate after each batch.
///
/// This is the series a sampling animation plots: frame `i` reflects
/// `(i + 1) · points_per_frame` points in total.
///
/// # Errors
/// `InvalidArgument` if either count is zero.
///
/// # Examples
/// ```
/// use pi_calculator::monte_carlo::convergence_trace;
/// use pi_calculator::random::create_rng;
///
/// let mut rng = create_rng(7);
/// let trace = convergence_trace(1_000, 10, &mut rng).unwrap();
/// assert_eq!(trace.len(), 10);
/// assert_eq!(trace[9].total_points, 10_000);
/// ```
pub fn convergence_trace<R: Rng + ?Sized>(
    points_per_frame: u64,
    frames: u64,
    rng: &mut R,
) -> EstimateResult<Vec<TraceFrame>> {
    convergence_trace_with_cancel(points_per_frame, frames, rng, &CancelToken::new())
}

/// [`convergence_trace`] with cooperative cancellation.
pub fn convergence_trace_with_cancel<R: Rng + ?Sized>(
    points_per_frame: u64,
    frames: u64,
    rng: &mut R,
    cancel: &CancelToken,
) -> EstimateResult<Vec<TraceFrame>> {
    require_positive("points_per_frame", points_per_frame)?;
    require_positive("frames", frames)?;

    let mut trace = Vec::with_capacity(frames as usize);
    let mut inside = 0_u64;
    for frame in 0..frames {
        inside += count_inside(points_per_frame, rng, cancel)?;
        let total_points = (frame + 1) * points_per_frame;
        trace.push(TraceFrame {
            frame,
            total_points,
            inside,
            estimate: 4.0 * inside as f64 / total_points as f64,
        });
    }
    Ok(trace)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimateError;
    use crate::random::{create_rng, stream_seeds};
    use crate::stats::WelfordAccumulator;

    #[test]
    fn test_seeded_runs_are_bit_identical() {
        let a = monte_carlo(50_000, Some(42)).unwrap();
        let b = monte_carlo(50_000, Some(42)).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = monte_carlo(1_000_000, Some(1)).unwrap();
        let b = monte_carlo(1_000_000, Some(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_million_samples_close_to_pi() {
        let pi = monte_carlo(1_000_000, Some(42)).unwrap();
        // ~6 standard errors.
        assert!((pi - std::f64::consts::PI).abs() < 0.01, "got {pi}");
    }

    #[test]
    fn test_unseeded_runs_spread_below_bound() {
        let mut acc = WelfordAccumulator::new();
        for _ in 0..5 {
            acc.update(monte_carlo(100_000, None).unwrap());
        }
        let sd = acc.sample_std_dev().unwrap();
        assert!(sd < 0.01, "std dev {sd}");
    }

    #[test]
    fn test_result_is_multiple_of_four_over_n() {
        let n = 1_000;
        let pi = monte_carlo(n, Some(9)).unwrap();
        let inside = pi * n as f64 / 4.0;
        assert_eq!(inside, inside.round());
        assert!((0.0..=4.0).contains(&pi));
    }

    #[test]
    fn test_zero_samples() {
        assert!(matches!(
            monte_carlo(0, Some(1)),
            Err(EstimateError::InvalidArgument {
                parameter: "samples",
                ..
            })
        ));
    }

    #[test]
    fn test_borrowed_rng_advances() {
        let mut rng = create_rng(5);
        let token = CancelToken::new();
        let a = monte_carlo_with_rng(500_000, &mut rng, &token).unwrap();
        let b = monte_carlo_with_rng(500_000, &mut rng, &token).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_independent_streams() {
        let firsts: Vec<(f64, f64)> = stream_seeds(42, 4)
            .into_iter()
            .map(|seed| point_in_square(&mut create_rng(seed)))
            .collect();
        for (i, a) in firsts.iter().enumerate() {
            for b in &firsts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_trace_matches_single_run() {
        // Same seed, same points: the last frame equals one large run.
        let mut rng = create_rng(11);
        let trace = convergence_trace(2_500, 4, &mut rng).unwrap();
        let whole = monte_carlo(10_000, Some(11)).unwrap();
        assert_eq!(trace[3].estimate, whole);
    }

    #[test]
    fn test_trace_is_cumulative() {
        let mut rng = create_rng(3);
        let trace = convergence_trace(500, 20, &mut rng).unwrap();
        for (i, frame) in trace.iter().enumerate() {
            assert_eq!(frame.frame, i as u64);
            assert_eq!(frame.total_points, 500 * (i as u64 + 1));
            assert!(frame.inside <= frame.total_points);
        }
        for pair in trace.windows(2) {
            assert!(pair[1].inside >= pair[0].inside);
            assert!(pair[1].inside - pair[0].inside <= 500);
        }
    }

    #[test]
    fn test_trace_rejects_zero_counts() {
        let mut rng = create_rng(0);
        assert!(convergence_trace(0, 10, &mut rng).is_err());
        assert!(convergence_trace(10, 0, &mut rng).is_err());
    }

    #[test]
    fn test_trace_frame_serializes() {
        let frame = TraceFrame {
            frame: 0,
            total_points: 4,
            inside: 3,
            estimate: 3.0,
        };
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json["total_points"], 4);
        assert_eq!(json["estimate"], 3.0);
    }
}
