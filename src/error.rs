//! Error types shared by every estimator and the comparison harness.

use std::path::PathBuf;

use crate::estimate::Method;

/// Result alias for estimator and harness operations.
pub type EstimateResult<T> = Result<T, EstimateError>;

/// Errors produced while estimating π.
///
/// Every variant is surfaced synchronously to the immediate caller; nothing
/// is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    /// A term/iteration/sample/digit count is zero, negative, or otherwise
    /// outside the domain of the method.
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidArgument {
        parameter: &'static str,
        value: i128,
        reason: &'static str,
    },

    /// A method name did not match any known estimator.
    #[error("unknown estimation method `{0}`")]
    UnknownMethod(String),

    /// The run was stopped through its [`CancelToken`](crate::cancel::CancelToken).
    #[error("{method} estimation was cancelled")]
    Cancelled { method: Method },
}

impl EstimateError {
    pub(crate) fn non_positive(parameter: &'static str, value: impl Into<i128>) -> Self {
        EstimateError::InvalidArgument {
            parameter,
            value: value.into(),
            reason: "must be a positive integer",
        }
    }
}

/// Errors produced while loading a [`Config`](crate::config::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configured value is out of domain for its method.
    #[error(transparent)]
    Invalid(#[from] EstimateError),
}

/// Converts a signed count coming from an outer caller into the unsigned
/// count the estimators take.
///
/// # Returns
/// - `Err(InvalidArgument)` if `value <= 0`.
///
/// # Examples
/// ```
/// use pi_calculator::error::validate_count;
/// assert_eq!(validate_count("terms", 10).unwrap(), 10);
/// assert!(validate_count("terms", 0).is_err());
/// assert!(validate_count("terms", -3).is_err());
/// ```
pub fn validate_count(parameter: &'static str, value: i64) -> EstimateResult<u64> {
    if value <= 0 {
        return Err(EstimateError::non_positive(parameter, value));
    }
    Ok(value as u64)
}

/// Rejects a zero count.
pub(crate) fn require_positive(parameter: &'static str, value: u64) -> EstimateResult<u64> {
    if value == 0 {
        return Err(EstimateError::non_positive(parameter, value));
    }
    Ok(value)
}
