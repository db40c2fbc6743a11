//! # pi-calculator
//!
//! Independent numerical estimators for π and a harness that times and
//! scores them against the reference constant.
//!
//! ## Modules
//!
//! - [`series`]: Leibniz and Nilakantha partial sums
//! - [`iterative`]: Gauss–Legendre AGM iteration
//! - [`chudnovsky`]: arbitrary-precision Chudnovsky series with a scoped
//!   [`PrecisionContext`](chudnovsky::PrecisionContext)
//! - [`monte_carlo`]: seeded random sampling and the convergence trace
//! - [`harness`]: ordered, timed [`ComparisonRecord`](harness::ComparisonRecord)s,
//!   parameter sweeps and dispersion summaries
//! - [`estimate`]: method identifiers and the [`Estimate`](estimate::Estimate)
//!   tagged union
//! - [`config`]: TOML run configuration
//! - [`random`], [`stats`], [`cancel`], [`error`]: supporting pieces
//!
//! ## Design Philosophy
//!
//! - **No hidden global state**: random sources and working precision are
//!   values passed into each call
//! - **Numerical stability**: Neumaier summation for the series, unbounded
//!   integers for the Chudnovsky recurrences
//! - **Property-based testing**: convergence bounds verified via proptest
//!
//! ## Example
//!
//! ```
//! use pi_calculator::estimate::{Method, MethodSpec};
//! use pi_calculator::harness::Harness;
//!
//! let report = Harness::new()
//!     .compare(&[
//!         MethodSpec::leibniz(100_000),
//!         MethodSpec::monte_carlo(100_000, Some(42)),
//!     ])
//!     .unwrap();
//! assert_eq!(report.records[0].method, Method::Leibniz);
//! assert_eq!(report.records[1].method, Method::MonteCarlo);
//! ```

pub mod cancel;
pub mod chudnovsky;
pub mod config;
pub mod error;
pub mod estimate;
pub mod harness;
pub mod iterative;
pub mod monte_carlo;
pub mod random;
pub mod series;
pub mod stats;

pub use error::{EstimateError, EstimateResult};
pub use estimate::{Estimate, EstimateValue, Method, MethodSpec};
pub use harness::{ComparisonRecord, ComparisonReport, ErrorPolicy, Harness};
