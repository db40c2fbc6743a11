//! Comparison harness: runs estimators, times them, and scores their error.
//!
//! Each spec is run in caller order and yields a [`ComparisonRecord`]:
//!
//! ```text
//! start clock → run spec → stop clock → relative_error = |est − π| / π
//! ```
//!
//! Failures never retry. Whether the first failure aborts the whole
//! comparison or is recorded and skipped is chosen explicitly with
//! [`ErrorPolicy`].

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::cancel::CancelToken;
use crate::error::{require_positive, EstimateError, EstimateResult};
use crate::estimate::{EstimateValue, Method, MethodSpec};
use crate::random::stream_seeds;
use crate::stats::WelfordAccumulator;

/// What the harness does when an estimator returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Propagate the first error and skip the remaining specs.
    #[default]
    Halt,
    /// Record the failure in the report and keep going.
    Continue,
}

/// Outcome of one timed estimator invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub method: Method,
    pub parameter: u64,
    /// The estimate as `f64`.
    pub value: f64,
    /// Wall-clock time of the estimator call, in seconds.
    pub elapsed_secs: f64,
    /// `|value − π| / π`.
    pub relative_error: f64,
    /// Full decimal expansion, present only for arbitrary-precision methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal: Option<String>,
}

/// A spec that failed while the harness ran with [`ErrorPolicy::Continue`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFailure {
    pub method: Method,
    pub parameter: u64,
    pub error: String,
}

/// Ordered results of [`Harness::compare`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Successful runs, in invocation order.
    pub records: Vec<ComparisonRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ComparisonFailure>,
}

impl ComparisonReport {
    /// First record produced by `method`.
    pub fn get(&self, method: Method) -> Option<&ComparisonRecord> {
        self.records.iter().find(|r| r.method == method)
    }

    /// Record with the smallest relative error.
    pub fn most_accurate(&self) -> Option<&ComparisonRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.relative_error.total_cmp(&b.relative_error))
    }

    /// Record with the shortest elapsed time.
    pub fn fastest(&self) -> Option<&ComparisonRecord> {
        self.records
            .iter()
            .min_by(|a, b| a.elapsed_secs.total_cmp(&b.elapsed_secs))
    }
}

/// One method evaluated across a parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepSeries {
    pub method: Method,
    pub points: Vec<ComparisonRecord>,
}

/// Spread of repeated runs of a single spec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dispersion {
    pub method: Method,
    pub parameter: u64,
    pub runs: u64,
    pub mean: f64,
    /// Sample standard deviation; 0 for a single run.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Times and scores estimators.
///
/// # Examples
/// ```
/// use pi_calculator::estimate::{Method, MethodSpec};
/// use pi_calculator::harness::Harness;
///
/// let report = Harness::new()
///     .compare(&[MethodSpec::leibniz(10_000), MethodSpec::gauss_legendre(5)])
///     .unwrap();
/// assert_eq!(report.records.len(), 2);
/// assert_eq!(report.records[0].method, Method::Leibniz);
/// assert!(report.get(Method::GaussLegendre).unwrap().relative_error < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harness {
    policy: ErrorPolicy,
    cancel: CancelToken,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shares `cancel` with every estimator this harness runs.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// Runs and times one spec.
    pub fn run_one(&self, spec: &MethodSpec) -> EstimateResult<ComparisonRecord> {
        let _span = debug_span!("estimate", method = %spec.method, parameter = spec.parameter)
            .entered();

        let start = Instant::now();
        let estimate = spec.run_with_cancel(&self.cancel)?;
        let elapsed = start.elapsed();

        let decimal = match &estimate.value {
            EstimateValue::Decimal(d) => Some(d.to_string()),
            EstimateValue::Float(_) => None,
        };
        let record = ComparisonRecord {
            method: spec.method,
            parameter: spec.parameter,
            value: estimate.as_f64(),
            elapsed_secs: elapsed.as_secs_f64(),
            relative_error: estimate.relative_error(),
            decimal,
        };
        debug!(
            value = record.value,
            elapsed_secs = record.elapsed_secs,
            relative_error = record.relative_error,
            "estimate complete"
        );
        Ok(record)
    }

    /// Runs every spec in order.
    ///
    /// # Errors
    /// With [`ErrorPolicy::Halt`], the first estimator error. Cancellation
    /// always halts, whatever the policy.
    pub fn compare(&self, specs: &[MethodSpec]) -> EstimateResult<ComparisonReport> {
        let mut report = ComparisonReport::default();
        for spec in specs {
            match self.run_one(spec) {
                Ok(record) => report.records.push(record),
                Err(err @ EstimateError::Cancelled { .. }) => return Err(err),
                Err(err) => match self.policy {
                    ErrorPolicy::Halt => return Err(err),
                    ErrorPolicy::Continue => {
                        warn!(%spec, error = %err, "estimator failed, continuing");
                        report.failures.push(ComparisonFailure {
                            method: spec.method,
                            parameter: spec.parameter,
                            error: err.to_string(),
                        });
                    }
                },
            }
        }
        Ok(report)
    }

    /// Evaluates each method at `step, 2·step, …` up to and including `max`.
    ///
    /// Stochastic methods get a distinct seed per sweep point, derived from
    /// `seed` with [`stream_seeds`]; with `seed = None` each point is
    /// unseeded.
    ///
    /// # Errors
    /// `InvalidArgument` if `step == 0` or `max < step`; otherwise the first
    /// estimator error, as in [`ErrorPolicy::Halt`].
    pub fn sweep(
        &self,
        methods: &[Method],
        max: u64,
        step: u64,
        seed: Option<u64>,
    ) -> EstimateResult<Vec<SweepSeries>> {
        require_positive("step", step)?;
        if max < step {
            return Err(EstimateError::InvalidArgument {
                parameter: "max",
                value: max.into(),
                reason: "must be at least one step",
            });
        }
        let parameters: Vec<u64> = (1..=max / step).map(|i| i * step).collect();
        let seeds = seed.map(|s| stream_seeds(s, parameters.len()));

        let mut series: Vec<SweepSeries> = methods
            .iter()
            .map(|&method| SweepSeries {
                method,
                points: Vec::with_capacity(parameters.len()),
            })
            .collect();

        // Parameter-major so that every method sees the same n before moving on.
        for (i, &n) in parameters.iter().enumerate() {
            for s in &mut series {
                let point_seed = seeds.as_ref().map(|seeds| seeds[i]);
                let spec = MethodSpec::new(s.method, n).with_seed(point_seed);
                s.points.push(self.run_one(&spec)?);
            }
        }
        Ok(series)
    }

    /// Runs `spec` `runs` times and summarizes the spread of the estimates.
    ///
    /// A seeded stochastic spec gets independent per-run seeds derived from
    /// its seed, so the runs are reproducible but not identical.
    pub fn dispersion(&self, spec: &MethodSpec, runs: u64) -> EstimateResult<Dispersion> {
        require_positive("runs", runs)?;
        let seeds = spec.seed.map(|s| stream_seeds(s, runs as usize));

        let mut acc = WelfordAccumulator::new();
        for run in 0..runs as usize {
            let run_spec = spec.with_seed(seeds.as_ref().map(|seeds| seeds[run]));
            acc.update(self.run_one(&run_spec)?.value);
        }

        Ok(Dispersion {
            method: spec.method,
            parameter: spec.parameter,
            runs,
            mean: acc.mean().unwrap_or(f64::NAN),
            std_dev: acc.sample_std_dev().unwrap_or(0.0),
            min: acc.min().unwrap_or(f64::NAN),
            max: acc.max().unwrap_or(f64::NAN),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
