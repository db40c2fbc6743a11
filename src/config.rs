//! Run configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) is a
//! valid configuration. Example:
//!
//! ```toml
//! terms = 1_000_000
//! samples = 1_000_000
//! seed = 42
//! iterations = 10
//! precision_digits = 50
//! error_policy = "continue"
//! methods = ["leibniz", "monte_carlo"]
//!
//! [sweep]
//! max = 1_000_000
//! step = 100_000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{require_positive, ConfigError};
use crate::estimate::{Method, MethodSpec};
use crate::harness::ErrorPolicy;

pub const DEFAULT_TERMS: u64 = 1_000_000;
pub const DEFAULT_SAMPLES: u64 = 1_000_000;
pub const DEFAULT_ITERATIONS: u64 = 10;
pub const DEFAULT_PRECISION_DIGITS: u64 = 50;

/// Parameters for [`Harness::sweep`](crate::harness::Harness::sweep).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub max: u64,
    pub step: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            max: 1_000_000,
            step: 100_000,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Term count for the series methods.
    pub terms: u64,
    /// Sample count for Monte Carlo.
    pub samples: u64,
    /// Seed for Monte Carlo; unseeded when absent.
    pub seed: Option<u64>,
    /// Gauss–Legendre rounds.
    pub iterations: u64,
    /// Chudnovsky significant digits.
    pub precision_digits: u64,
    pub error_policy: ErrorPolicy,
    /// Methods run by a comparison, in order.
    pub methods: Vec<Method>,
    pub sweep: SweepConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terms: DEFAULT_TERMS,
            samples: DEFAULT_SAMPLES,
            seed: None,
            iterations: DEFAULT_ITERATIONS,
            precision_digits: DEFAULT_PRECISION_DIGITS,
            error_policy: ErrorPolicy::default(),
            methods: Method::ALL.to_vec(),
            sweep: SweepConfig::default(),
        }
    }
}

impl Config {
    /// Reads and validates a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Rejects zero counts before anything runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("terms", self.terms)?;
        require_positive("samples", self.samples)?;
        require_positive("iterations", self.iterations)?;
        require_positive("precision_digits", self.precision_digits)?;
        require_positive("sweep.step", self.sweep.step)?;
        Ok(())
    }

    /// The configured parameter for `method`.
    pub fn parameter_for(&self, method: Method) -> u64 {
        match method {
            Method::Leibniz | Method::Nilakantha => self.terms,
            Method::GaussLegendre => self.iterations,
            Method::Chudnovsky => self.precision_digits,
            Method::MonteCarlo => self.samples,
        }
    }

    pub fn spec_for(&self, method: Method) -> MethodSpec {
        let spec = MethodSpec::new(method, self.parameter_for(method));
        if method.is_stochastic() {
            spec.with_seed(self.seed)
        } else {
            spec
        }
    }

    /// One spec per configured method, in configured order.
    pub fn method_specs(&self) -> Vec<MethodSpec> {
        self.methods.iter().map(|&m| self.spec_for(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            samples = 5000
            seed = 42
            methods = ["monte_carlo", "leibniz"]

            [sweep]
            step = 250
            "#,
        )
        .unwrap();
        assert_eq!(config.samples, 5_000);
        assert_eq!(config.terms, DEFAULT_TERMS);
        assert_eq!(config.sweep.step, 250);
        assert_eq!(config.sweep.max, 1_000_000);
        assert_eq!(
            config.method_specs(),
            vec![
                MethodSpec::monte_carlo(5_000, Some(42)),
                MethodSpec::leibniz(DEFAULT_TERMS),
            ]
        );
    }

    #[test]
    fn test_seed_only_applies_to_stochastic_methods() {
        let config = Config {
            seed: Some(7),
            ..Config::default()
        };
        assert_eq!(config.spec_for(Method::Chudnovsky).seed, None);
        assert_eq!(config.spec_for(Method::MonteCarlo).seed, Some(7));
    }

    #[test]
    fn test_error_policy_parses() {
        let config: Config = toml::from_str(r#"error_policy = "continue""#).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Continue);
    }

    #[test]
    fn test_unknown_method_rejected() {
        assert!(toml::from_str::<Config>(r#"methods = ["wallis"]"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "terms = 1234\nprecision_digits = 30").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.terms, 1_234);
        assert_eq!(config.precision_digits, 30);
    }

    #[test]
    fn test_load_rejects_zero_counts() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "samples = 0").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "terms = \"many\"").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
