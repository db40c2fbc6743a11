//! Method identifiers, the estimate tagged union, and runnable method specs.
//!
//! Float-valued methods and the arbitrary-precision method return different
//! payloads. [`EstimateValue`] carries either, so the harness handles every
//! method uniformly through [`Estimate::as_f64`] without inspecting types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::chudnovsky::{chudnovsky_in, FixedDecimal, PrecisionContext};
use crate::error::{require_positive, EstimateError, EstimateResult};
use crate::iterative::gauss_legendre;
use crate::monte_carlo::monte_carlo_with_rng;
use crate::random::sampling_rng;
use crate::series::{leibniz_with_cancel, nilakantha_with_cancel};
use crate::stats::relative_error;

/// The fixed set of estimation methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Leibniz,
    Nilakantha,
    GaussLegendre,
    Chudnovsky,
    MonteCarlo,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Leibniz,
        Method::Nilakantha,
        Method::GaussLegendre,
        Method::Chudnovsky,
        Method::MonteCarlo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Method::Leibniz => "leibniz",
            Method::Nilakantha => "nilakantha",
            Method::GaussLegendre => "gauss_legendre",
            Method::Chudnovsky => "chudnovsky",
            Method::MonteCarlo => "monte_carlo",
        }
    }

    /// What the integer parameter counts for this method.
    pub fn parameter_name(self) -> &'static str {
        match self {
            Method::Leibniz | Method::Nilakantha => "terms",
            Method::GaussLegendre => "iterations",
            Method::Chudnovsky => "precision_digits",
            Method::MonteCarlo => "samples",
        }
    }

    /// Only the Monte Carlo method consumes a seed.
    pub fn is_stochastic(self) -> bool {
        matches!(self, Method::MonteCarlo)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Method {
    type Err = EstimateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Method::ALL
            .into_iter()
            .find(|m| m.name() == normalized)
            .ok_or_else(|| EstimateError::UnknownMethod(s.to_string()))
    }
}

/// Numeric payload of an estimate, at the precision the method produces.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimateValue {
    Float(f64),
    Decimal(FixedDecimal),
}

impl EstimateValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            EstimateValue::Float(v) => *v,
            EstimateValue::Decimal(d) => d.to_f64(),
        }
    }
}

impl fmt::Display for EstimateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateValue::Float(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            EstimateValue::Decimal(d) => write!(f, "{d}"),
        }
    }
}

/// A computed approximation of π tagged with the method that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub method: Method,
    pub value: EstimateValue,
}

impl Estimate {
    pub fn as_f64(&self) -> f64 {
        self.value.as_f64()
    }

    pub fn relative_error(&self) -> f64 {
        relative_error(self.as_f64())
    }
}

/// One method with its parameter, ready to run.
///
/// `parameter` is the term, iteration, digit or sample count depending on
/// [`Method::parameter_name`]. `seed` is only read by stochastic methods;
/// leaving it `None` makes every run draw fresh entropy.
///
/// # Examples
/// ```
/// use pi_calculator::estimate::{Method, MethodSpec};
///
/// let spec = MethodSpec::gauss_legendre(5);
/// let estimate = spec.run().unwrap();
/// assert_eq!(estimate.method, Method::GaussLegendre);
/// assert!(estimate.relative_error() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub method: Method,
    pub parameter: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl MethodSpec {
    pub fn new(method: Method, parameter: u64) -> Self {
        Self {
            method,
            parameter,
            seed: None,
        }
    }

    pub fn leibniz(terms: u64) -> Self {
        Self::new(Method::Leibniz, terms)
    }

    pub fn nilakantha(terms: u64) -> Self {
        Self::new(Method::Nilakantha, terms)
    }

    pub fn gauss_legendre(iterations: u64) -> Self {
        Self::new(Method::GaussLegendre, iterations)
    }

    pub fn chudnovsky(precision_digits: u64) -> Self {
        Self::new(Method::Chudnovsky, precision_digits)
    }

    pub fn monte_carlo(samples: u64, seed: Option<u64>) -> Self {
        Self {
            method: Method::MonteCarlo,
            parameter: samples,
            seed,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn run(&self) -> EstimateResult<Estimate> {
        self.run_with_cancel(&CancelToken::new())
    }

    /// Runs the method, polling `cancel` between iterations.
    pub fn run_with_cancel(&self, cancel: &CancelToken) -> EstimateResult<Estimate> {
        let value = match self.method {
            Method::Leibniz => EstimateValue::Float(leibniz_with_cancel(self.parameter, cancel)?),
            Method::Nilakantha => {
                EstimateValue::Float(nilakantha_with_cancel(self.parameter, cancel)?)
            }
            Method::GaussLegendre => {
                require_positive("iterations", self.parameter)?;
                let iterations = u32::try_from(self.parameter).map_err(|_| {
                    EstimateError::InvalidArgument {
                        parameter: "iterations",
                        value: self.parameter.into(),
                        reason: "must fit in 32 bits",
                    }
                })?;
                EstimateValue::Float(gauss_legendre(iterations))
            }
            Method::Chudnovsky => {
                let ctx = PrecisionContext::new(self.parameter)?;
                EstimateValue::Decimal(chudnovsky_in(&ctx, cancel)?)
            }
            Method::MonteCarlo => {
                let mut rng = sampling_rng(self.seed);
                EstimateValue::Float(monte_carlo_with_rng(self.parameter, &mut rng, cancel)?)
            }
        };
        Ok(Estimate {
            method: self.method,
            value,
        })
    }
}

impl fmt::Display for MethodSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}={}",
            self.method,
            self.method.parameter_name(),
            self.parameter
        )?;
        if let (true, Some(seed)) = (self.method.is_stochastic(), self.seed) {
            write!(f, ", seed={seed}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_names_round_trip() {
        for m in Method::ALL {
            assert_eq!(m.name().parse::<Method>().unwrap(), m);
        }
    }

    #[test]
    fn test_method_parse_accepts_hyphens_and_case() {
        assert_eq!("Monte-Carlo".parse::<Method>(), Ok(Method::MonteCarlo));
        assert_eq!(" gauss-legendre ".parse::<Method>(), Ok(Method::GaussLegendre));
    }

    #[test]
    fn test_method_parse_unknown() {
        assert_eq!(
            "wallis".parse::<Method>(),
            Err(EstimateError::UnknownMethod("wallis".into()))
        );
    }

    #[test]
    fn test_method_serde_is_snake_case() {
        let json = serde_json::to_string(&Method::GaussLegendre).unwrap();
        assert_eq!(json, "\"gauss_legendre\"");
    }

    #[test]
    fn test_spec_display() {
        assert_eq!(MethodSpec::leibniz(1000).to_string(), "leibniz(terms=1000)");
        assert_eq!(
            MethodSpec::monte_carlo(10, Some(42)).to_string(),
            "monte_carlo(samples=10, seed=42)"
        );
        assert_eq!(
            MethodSpec::chudnovsky(50).with_seed(Some(1)).to_string(),
            "chudnovsky(precision_digits=50)"
        );
    }

    #[test]
    fn test_every_method_runs() {
        let specs = [
            MethodSpec::leibniz(10_000),
            MethodSpec::nilakantha(1_000),
            MethodSpec::gauss_legendre(4),
            MethodSpec::chudnovsky(30),
            MethodSpec::monte_carlo(10_000, Some(3)),
        ];
        for spec in specs {
            let est = spec.run().unwrap();
            assert_eq!(est.method, spec.method);
            assert!(est.relative_error() < 0.05, "{spec}: {}", est.value);
        }
    }

    #[test]
    fn test_zero_parameter_rejected_for_every_method() {
        for m in Method::ALL {
            let err = MethodSpec::new(m, 0).run().unwrap_err();
            assert!(
                matches!(err, EstimateError::InvalidArgument { .. }),
                "{m}: {err:?}"
            );
        }
    }

    #[test]
    fn test_decimal_payload_for_chudnovsky() {
        let est = MethodSpec::chudnovsky(10).run().unwrap();
        match &est.value {
            EstimateValue::Decimal(d) => assert_eq!(d.to_string(), "3.141592654"),
            other => panic!("expected decimal payload, got {other:?}"),
        }
        assert_eq!(est.value.to_string(), "3.141592654");
    }

    #[test]
    fn test_float_display_honours_precision() {
        let v = EstimateValue::Float(std::f64::consts::PI);
        assert_eq!(format!("{v:.4}"), "3.1416");
    }

    #[test]
    fn test_cancelled_spec() {
        let token = CancelToken::new();
        token.cancel();
        let err = MethodSpec::monte_carlo(100, Some(1))
            .run_with_cancel(&token)
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::Cancelled {
                method: Method::MonteCarlo
            }
        );
    }
}
