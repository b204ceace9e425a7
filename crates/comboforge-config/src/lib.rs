//! Configuration system for ComboForge.
//!
//! Load solver and bandit settings from TOML or YAML to tune the repair
//! search and the posterior prior without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use comboforge_config::{ComboConfig, PosteriorConfig, RepairPolicy};
//!
//! let config = ComboConfig::from_toml_str(r#"
//!     random_seed = 42
//!
//!     [solver]
//!     restarts = 3
//!     repair_policy = "lowest_path"
//!
//!     [bandit]
//!     arm_limit = 100
//!     [bandit.posterior]
//!     type = "normal"
//!     prior_weight = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(42));
//! assert_eq!(config.solver.repair_policy, RepairPolicy::LowestPath);
//! assert_eq!(config.solver.repair_step_limit(50), 500);
//! assert!(matches!(config.bandit.posterior, PosteriorConfig::Normal(_)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use comboforge_config::ComboConfig;
//!
//! let config = ComboConfig::load("combo.toml").unwrap_or_default();
//! assert_eq!(config.bandit.arm_limit, 500);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ComboConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Local search solver settings.
    #[serde(default)]
    pub solver: SolverConfig,

    /// Bandit settings.
    #[serde(default)]
    pub bandit: BanditConfig,
}

impl ComboConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML or YAML file, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, doesn't parse or fails
    /// [`ComboConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses and validates configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Replaces the solver settings.
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Replaces the bandit settings.
    pub fn with_bandit(mut self, bandit: BanditConfig) -> Self {
        self.bandit = bandit;
        self
    }

    /// Rejects values the solver or bandit cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver.validate()?;
        self.bandit.validate()
    }
}

/// Settings for the repair-based local search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    /// Number of independent attempts before giving up.
    pub restarts: u32,

    /// How the variable to flip is picked among candidates.
    pub repair_policy: RepairPolicy,

    /// Explicit bound on repair flips per attempt.
    pub max_repair_steps: Option<u64>,

    /// Flips allowed per model variable when no explicit bound is set.
    pub repair_steps_per_variable: u64,

    /// Lower bound on the derived flip limit.
    pub min_repair_steps: u64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            restarts: 5,
            repair_policy: RepairPolicy::Random,
            max_repair_steps: None,
            repair_steps_per_variable: 10,
            min_repair_steps: 100,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_restarts(mut self, restarts: u32) -> Self {
        self.restarts = restarts;
        self
    }

    pub fn with_repair_policy(mut self, policy: RepairPolicy) -> Self {
        self.repair_policy = policy;
        self
    }

    pub fn with_max_repair_steps(mut self, steps: u64) -> Self {
        self.max_repair_steps = Some(steps);
        self
    }

    /// Returns the flip limit for one attempt on a model of
    /// `variable_count` variables.
    ///
    /// # Examples
    ///
    /// ```
    /// use comboforge_config::SolverConfig;
    ///
    /// let config = SolverConfig::default();
    /// assert_eq!(config.repair_step_limit(3), 100);
    /// assert_eq!(config.repair_step_limit(40), 400);
    /// assert_eq!(config.with_max_repair_steps(7).repair_step_limit(40), 7);
    /// ```
    pub fn repair_step_limit(&self, variable_count: usize) -> u64 {
        self.max_repair_steps.unwrap_or_else(|| {
            self.repair_steps_per_variable
                .saturating_mul(variable_count as u64)
                .max(self.min_repair_steps)
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.restarts == 0 {
            return Err(ConfigError::Invalid("solver.restarts must be positive".into()));
        }
        if self.max_repair_steps == Some(0) {
            return Err(ConfigError::Invalid(
                "solver.max_repair_steps must be positive".into(),
            ));
        }
        if self.max_repair_steps.is_none() && self.min_repair_steps == 0 {
            return Err(ConfigError::Invalid(
                "solver.min_repair_steps must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Candidate selection during a repair step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairPolicy {
    /// Uniformly random among flippable selected variables.
    #[default]
    Random,

    /// The flippable selected variable declared first.
    LowestPath,
}

/// Settings for `ModelBandit`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BanditConfig {
    /// Number of distinct arms generated when none are supplied.
    pub arm_limit: usize,

    /// Prefer high rewards (`true`) or low rewards (`false`).
    pub maximize: bool,

    /// Posterior family and prior.
    pub posterior: PosteriorConfig,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            arm_limit: 500,
            maximize: true,
            posterior: PosteriorConfig::default(),
        }
    }
}

impl BanditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arm_limit(mut self, limit: usize) -> Self {
        self.arm_limit = limit;
        self
    }

    pub fn with_maximize(mut self, maximize: bool) -> Self {
        self.maximize = maximize;
        self
    }

    pub fn with_posterior(mut self, posterior: PosteriorConfig) -> Self {
        self.posterior = posterior;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arm_limit == 0 {
            return Err(ConfigError::Invalid("bandit.arm_limit must be positive".into()));
        }
        self.posterior.validate()
    }
}

/// Posterior family.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PosteriorConfig {
    /// Normal-Gamma posterior for real-valued rewards.
    Normal(NormalPriorConfig),

    /// Beta posterior for rewards in `[0, 1]`.
    Binomial(BinomialPriorConfig),
}

impl Default for PosteriorConfig {
    fn default() -> Self {
        PosteriorConfig::Normal(NormalPriorConfig::default())
    }
}

impl PosteriorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PosteriorConfig::Normal(prior) => {
                check_weight(prior.prior_weight)?;
                if !prior.prior_mean.is_finite() {
                    return Err(ConfigError::Invalid("prior_mean must be finite".into()));
                }
                if !(prior.prior_squared_deviations.is_finite()
                    && prior.prior_squared_deviations > 0.0)
                {
                    return Err(ConfigError::Invalid(
                        "prior_squared_deviations must be positive".into(),
                    ));
                }
                Ok(())
            }
            PosteriorConfig::Binomial(prior) => {
                check_weight(prior.prior_weight)?;
                if !(prior.prior_mean > 0.0 && prior.prior_mean < 1.0) {
                    return Err(ConfigError::Invalid(
                        "binomial prior_mean must lie in (0, 1)".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn check_weight(weight: f64) -> Result<(), ConfigError> {
    if weight.is_finite() && weight > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid("prior_weight must be positive".into()))
    }
}

/// Prior pseudo-observations for the normal posterior.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct NormalPriorConfig {
    pub prior_mean: f64,
    pub prior_squared_deviations: f64,
    pub prior_weight: f64,
}

impl Default for NormalPriorConfig {
    fn default() -> Self {
        Self {
            prior_mean: 0.0,
            prior_squared_deviations: 0.02,
            prior_weight: 0.02,
        }
    }
}

/// Prior pseudo-observations for the binomial posterior.
///
/// The default is one success and one failure, a uniform Beta(1, 1).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BinomialPriorConfig {
    pub prior_mean: f64,
    pub prior_weight: f64,
}

impl Default for BinomialPriorConfig {
    fn default() -> Self {
        Self {
            prior_mean: 0.5,
            prior_weight: 2.0,
        }
    }
}

#[cfg(test)]
mod tests;
