//! Gauss–Legendre arithmetic-geometric-mean iteration.
//!
//! Starting from `(a, b, t, p) = (1, 1/√2, 1/4, 1)`, each round applies
//!
//! ```text
//! a' = (a + b) / 2
//! b' = √(a·b)
//! t' = t − p·(a − a')²
//! p' = 2p
//! ```
//!
//! and π ≈ (a + b)² / (4t). Convergence is quadratic: the number of correct
//! digits roughly doubles per round, so double precision is exhausted after
//! about four rounds.
//!
//! Reference: Salamin (1976), "Computation of π Using Arithmetic-Geometric
//! Mean", *Mathematics of Computation* 30(135).

/// Carried state of the iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AgmState {
    a: f64,
    b: f64,
    t: f64,
    p: f64,
}

impl AgmState {
    fn initial() -> Self {
        Self {
            a: 1.0,
            b: std::f64::consts::FRAC_1_SQRT_2,
            t: 0.25,
            p: 1.0,
        }
    }

    fn step(self) -> Self {
        let a = (self.a + self.b) / 2.0;
        let b = (self.a * self.b).sqrt();
        let d = self.a - a;
        Self {
            a,
            b,
            t: self.t - self.p * d * d,
            p: 2.0 * self.p,
        }
    }

    /// `a` and `b` agree to the last bit of precision.
    fn converged(&self) -> bool {
        (self.a - self.b).abs() <= f64::EPSILON * self.a
    }

    fn pi(&self) -> f64 {
        let s = self.a + self.b;
        s * s / (4.0 * self.t)
    }
}

/// Runs `iterations` Gauss–Legendre rounds and returns the π estimate.
///
/// Zero rounds is allowed and evaluates the initial state. Once `a` and `b`
/// agree to machine precision the remaining rounds are skipped: they cannot
/// change the estimate, and `p` would otherwise overflow after ~1000 rounds.
///
/// # Examples
/// ```
/// use pi_calculator::iterative::gauss_legendre;
/// assert!((gauss_legendre(5) - std::f64::consts::PI).abs() < 1e-10);
/// ```
pub fn gauss_legendre(iterations: u32) -> f64 {
    let mut state = AgmState::initial();
    for round in 0..iterations {
        state = state.step();
        if state.converged() {
            tracing::trace!(round, "gauss-legendre converged");
            break;
        }
    }
    state.pi()
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn converged_beyond_four_rounds(iterations in 4_u32..10_000) {
            prop_assert!((gauss_legendre(iterations) - std::f64::consts::PI).abs() < 1e-14);
        }
    }
}
