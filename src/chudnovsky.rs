//! Arbitrary-precision π via the Chudnovsky series.
//!
//! ```text
//! 426880·√10005 / π = Σₖ Mₖ·Lₖ / Xₖ
//! ```
//!
//! with the integer recurrences
//!
//! ```text
//! M₀ = 1,        Mₖ = Mₖ₋₁·(Kₖ₋₁³ − 16·Kₖ₋₁) / k³
//! L₀ = 13591409, Lₖ = Lₖ₋₁ + 545140134
//! X₀ = 1,        Xₖ = Xₖ₋₁ · (−262537412640768000)
//! K₀ = 6,        Kₖ = Kₖ₋₁ + 12
//! ```
//!
//! Each term adds roughly 14 correct decimal digits.
//!
//! # Precision bookkeeping
//!
//! All arithmetic is fixed-point over [`BigInt`], scaled by
//! `10^(digits + guard_digits)`. The scale lives in a [`PrecisionContext`]
//! value created per call, so two computations at different precisions never
//! share state. M, L, X and K are unbounded integers and cannot overflow.
//!
//! Every truncating division loses at most one unit in the last working
//! place. The guard digits absorb that loss before the final half-up rounding
//! to `digits` significant digits.

use std::fmt;

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use tracing::trace;

use crate::cancel::CancelToken;
use crate::error::{require_positive, EstimateError, EstimateResult};
use crate::estimate::Method;

/// π to 100 decimal places.
pub const PI_DIGITS: &str = "3.\
    1415926535897932384626433832795028841971693993751058209749445923\
    078164062862089986280348253421170679";

/// Extra working digits carried beyond the requested precision.
pub const DEFAULT_GUARD_DIGITS: u32 = 10;

/// Decimal digits contributed by each Chudnovsky term (log₁₀ 151931373056000).
const DIGITS_PER_TERM: f64 = 14.181_647_462_725_477;

/// How many series terms to evaluate for a requested precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TermSchedule {
    /// `digits − 1` recurrence steps. Far more terms than the precision
    /// needs, but it is the historical behaviour of this estimator.
    #[default]
    PerDigit,
    /// `⌈digits / 14.18⌉ + 1` recurrence steps, the smallest count that
    /// reaches the requested precision.
    Convergent,
}

impl TermSchedule {
    /// Number of recurrence steps (terms after the first) for `digits`.
    pub fn steps(self, digits: u32) -> u64 {
        match self {
            TermSchedule::PerDigit => u64::from(digits.saturating_sub(1)),
            TermSchedule::Convergent => (f64::from(digits) / DIGITS_PER_TERM).ceil() as u64 + 1,
        }
    }
}

/// Working precision for one Chudnovsky evaluation.
///
/// This is an ordinary value: it is created for a call, borrowed by the
/// computation and dropped afterwards. Nothing process-wide is read or
/// written, so concurrent computations at different precisions cannot
/// interfere.
///
/// # Examples
/// ```
/// use pi_calculator::chudnovsky::{chudnovsky_in, PrecisionContext, TermSchedule};
/// use pi_calculator::cancel::CancelToken;
///
/// let ctx = PrecisionContext::new(30)
///     .unwrap()
///     .with_schedule(TermSchedule::Convergent);
/// let pi = chudnovsky_in(&ctx, &CancelToken::new()).unwrap();
/// assert_eq!(pi.to_string(), "3.14159265358979323846264338328");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecisionContext {
    digits: u32,
    guard_digits: u32,
    schedule: TermSchedule,
}

impl PrecisionContext {
    /// Context for `digits` significant digits with default guard digits and
    /// the [`TermSchedule::PerDigit`] schedule.
    ///
    /// # Errors
    /// `InvalidArgument` if `digits == 0` or exceeds `u32::MAX`.
    pub fn new(digits: u64) -> EstimateResult<Self> {
        require_positive("precision_digits", digits)?;
        let digits = u32::try_from(digits).map_err(|_| EstimateError::InvalidArgument {
            parameter: "precision_digits",
            value: digits.into(),
            reason: "must fit in 32 bits",
        })?;
        Ok(Self {
            digits,
            guard_digits: DEFAULT_GUARD_DIGITS,
            schedule: TermSchedule::default(),
        })
    }

    pub fn with_guard_digits(mut self, guard_digits: u32) -> Self {
        self.guard_digits = guard_digits;
        self
    }

    pub fn with_schedule(mut self, schedule: TermSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn digits(&self) -> u32 {
        self.digits
    }

    pub fn guard_digits(&self) -> u32 {
        self.guard_digits
    }

    pub fn schedule(&self) -> TermSchedule {
        self.schedule
    }

    /// Decimal places carried during the computation.
    pub fn working_scale(&self) -> u32 {
        self.digits + self.guard_digits
    }

    /// Recurrence steps this context will run.
    pub fn steps(&self) -> u64 {
        self.schedule.steps(self.digits)
    }

    /// The fixed-point representation of 1.
    fn unit(&self) -> BigInt {
        pow10(self.working_scale())
    }
}

/// A decimal number stored as `mantissa · 10^(−scale)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDecimal {
    mantissa: BigInt,
    scale: u32,
}

impl FixedDecimal {
    pub fn new(mantissa: BigInt, scale: u32) -> Self {
        Self { mantissa, scale }
    }

    pub fn mantissa(&self) -> &BigInt {
        &self.mantissa
    }

    /// Digits after the decimal point.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Nearest `f64`, obtained by parsing the decimal expansion.
    pub fn to_f64(&self) -> f64 {
        self.to_string().parse().unwrap_or(f64::NAN)
    }

    /// Number of leading characters (digits and the decimal point) shared with
    /// `reference`.
    ///
    /// # Examples
    /// ```
    /// use pi_calculator::chudnovsky::{chudnovsky, PI_DIGITS};
    /// let pi = chudnovsky(20).unwrap();
    /// assert!(pi.matching_digits(PI_DIGITS) >= 16);
    /// ```
    pub fn matching_digits(&self, reference: &str) -> usize {
        self.to_string()
            .chars()
            .zip(reference.chars())
            .take_while(|(a, b)| a == b)
            .filter(|(c, _)| c.is_ascii_digit())
            .count()
    }

    /// Rounds half away from zero to `scale` decimals. A larger `scale` than
    /// the current one returns the value unchanged.
    pub fn round_to_scale(&self, scale: u32) -> FixedDecimal {
        if scale >= self.scale {
            return self.clone();
        }
        let divisor = pow10(self.scale - scale);
        let half = &divisor / 2u32;
        let magnitude = (self.mantissa.abs() + half) / divisor;
        let mantissa = if self.mantissa.is_negative() {
            -magnitude
        } else {
            magnitude
        };
        FixedDecimal { mantissa, scale }
    }
}

impl fmt::Display for FixedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.abs().to_string();
        let sign = if self.mantissa.is_negative() { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{int_part}.{frac_part}")
    }
}

fn pow10(exp: u32) -> BigInt {
    BigInt::from(10u32).pow(exp)
}

/// Computes π to `precision_digits` significant digits.
///
/// # Errors
/// `InvalidArgument` if `precision_digits == 0`.
///
/// # Examples
/// ```
/// use pi_calculator::chudnovsky::chudnovsky;
/// assert_eq!(chudnovsky(1).unwrap().to_string(), "3");
/// assert_eq!(chudnovsky(6).unwrap().to_string(), "3.14159");
/// ```
pub fn chudnovsky(precision_digits: u64) -> EstimateResult<FixedDecimal> {
    let ctx = PrecisionContext::new(precision_digits)?;
    chudnovsky_in(&ctx, &CancelToken::new())
}

/// Evaluates the series at the precision held by `ctx`, polling `cancel`
/// once per term.
pub fn chudnovsky_in(ctx: &PrecisionContext, cancel: &CancelToken) -> EstimateResult<FixedDecimal> {
    let unit = ctx.unit();
    let steps = ctx.steps();
    trace!(
        digits = ctx.digits(),
        working_scale = ctx.working_scale(),
        steps,
        "chudnovsky"
    );

    // 426880·√10005, scaled by `unit`.
    let c = (BigInt::from(10_005u32) * &unit * &unit).sqrt() * 426_880u32;

    let mut m = BigInt::from(1u32);
    let mut l = BigInt::from(13_591_409u32);
    let mut x = BigInt::from(1u32);
    let mut k = BigInt::from(6u32);
    let mut sum = &l * &unit;

    for i in 1..=steps {
        cancel.check(Method::Chudnovsky)?;
        let i = BigInt::from(i);
        m = m * (&k * &k * &k - &k * 16u32) / (&i * &i * &i);
        l += 545_140_134u32;
        x *= -262_537_412_640_768_000i64;
        let term = &m * &l * &unit / &x;
        if term.is_zero() && matches!(ctx.schedule(), TermSchedule::Convergent) {
            break;
        }
        sum += term;
        k += 12u32;
    }

    let pi = FixedDecimal::new(c * &unit / sum, ctx.working_scale());
    Ok(pi.round_to_scale(ctx.digits() - 1))
}

// ============================================================================
// Tests
// ============================================================================


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(40))]

        #[test]
        fn every_digit_matches_reference(digits in 2_u64..=100) {
            let ctx = PrecisionContext::new(digits)
                .unwrap()
                .with_schedule(TermSchedule::Convergent);
            let pi = chudnovsky_in(&ctx, &CancelToken::new()).unwrap();
            prop_assert_eq!(pi.to_string().len() as u64, digits + 1);
            // Rounding leaves the result at the truncated reference or one
            // unit in the last place above it.
            let truncated: BigInt = PI_DIGITS.replace('.', "")[..digits as usize]
                .parse()
                .unwrap();
            let diff = pi.mantissa() - truncated;
            prop_assert!(diff == BigInt::from(0) || diff == BigInt::from(1), "diff = {}", diff);
        }
    }
}
