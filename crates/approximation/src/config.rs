// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Layered configuration for the approximation algorithms.
//!
//! Values come from the built-in defaults, then an optional YAML file, then
//! environment variables prefixed with `ARBPREC_`. Nested keys are separated by a
//! double underscore, so `ARBPREC_BISECTION__ACCURACY=80` sets `bisection.accuracy`.

use crate::bisection;
use crate::context::{PrecisionContext, Rounding, DEFAULT_PRECISION};
use crate::newton;
use crate::quick_range;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "ARBPREC_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Could not parse configuration: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        ConfigError::Figment(Box::new(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproximationConfig {
    /// Significant digits of the default precision context
    pub precision: u64,
    pub rounding: Rounding,
    pub bisection: BisectionConfig,
    pub newton: NewtonConfig,
    pub regula_falsi: RegulaFalsiConfig,
    pub quick_range: QuickRangeConfig,
}

impl Default for ApproximationConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            rounding: Rounding::default(),
            bisection: BisectionConfig::default(),
            newton: NewtonConfig::default(),
            regula_falsi: RegulaFalsiConfig::default(),
            quick_range: QuickRangeConfig::default(),
        }
    }
}

impl ApproximationConfig {
    pub fn precision_context(&self) -> PrecisionContext {
        PrecisionContext::new(self.precision).with_rounding(self.rounding)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BisectionConfig {
    pub max_iterations: usize,
    pub accuracy: u64,
    pub iterate_close_without_convergence: bool,
}

impl Default for BisectionConfig {
    fn default() -> Self {
        Self {
            max_iterations: bisection::MAX_ITERATIONS,
            accuracy: bisection::DEFAULT_ACCURACY,
            iterate_close_without_convergence: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    pub max_iterations: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: newton::DEFAULT_MAX_ITERATIONS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulaFalsiConfig {
    /// Use the Pegasus-damped variant
    pub extended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickRangeConfig {
    pub tries: usize,
}

impl Default for QuickRangeConfig {
    fn default() -> Self {
        Self {
            tries: quick_range::DEFAULT_TRIES,
        }
    }
}

/// Loads the configuration, reading `path` when given.
///
/// An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<ApproximationConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(ApproximationConfig::default()));
    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Yaml::file(path));
    }
    let config: ApproximationConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    debug!(?config, "loaded approximation configuration");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_| {
            let config = load_config(None).map_err(|e| e.to_string())?;
            assert_eq!(config, ApproximationConfig::default());
            assert_eq!(config.bisection.accuracy, 300);
            assert_eq!(config.newton.max_iterations, 100);
            assert_eq!(config.quick_range.tries, 10);
            assert!(!config.regula_falsi.extended);
            assert_eq!(config.precision_context(), PrecisionContext::new(64));
            Ok(())
        });
    }

    #[test]
    fn test_yaml_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "arbprec.yaml",
                r#"
precision: 32
rounding: half_even
bisection:
  accuracy: 40
regula_falsi:
  extended: true
"#,
            )?;
            let config =
                load_config(Some(Path::new("arbprec.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.precision, 32);
            assert_eq!(config.rounding, Rounding::HalfEven);
            assert_eq!(config.bisection.accuracy, 40);
            assert_eq!(config.bisection.max_iterations, 2000);
            assert!(config.regula_falsi.extended);

            let ctx = config.precision_context();
            assert_eq!(ctx.precision(), 32);
            assert_eq!(ctx.rounding(), Rounding::HalfEven);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("arbprec.yaml", "bisection:\n  accuracy: 40\n")?;
            jail.set_env("ARBPREC_BISECTION__ACCURACY", "80");
            jail.set_env("ARBPREC_BISECTION__ITERATE_CLOSE_WITHOUT_CONVERGENCE", "true");
            jail.set_env("ARBPREC_QUICK_RANGE__TRIES", "4");
            let config =
                load_config(Some(Path::new("arbprec.yaml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.bisection.accuracy, 80);
            assert!(config.bisection.iterate_close_without_convergence);
            assert_eq!(config.quick_range.tries, 4);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let Err(err) = load_config(Some(Path::new("/nope/arbprec.yaml"))) else {
            panic!("error expected");
        };
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_invalid_value() {
        Jail::expect_with(|jail| {
            jail.create_file("arbprec.yaml", "precision: lots\n")?;
            let result = load_config(Some(Path::new("arbprec.yaml")));
            assert!(matches!(result, Err(ConfigError::Figment(_))));
            Ok(())
        });
    }
}
