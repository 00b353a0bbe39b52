//! Configuration system for InferForge.
//!
//! Load sampler and learner configuration from TOML or YAML files to control
//! seeding, sweep counts, the acceptance policy and the SampleRank update rule
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use inferforge_config::{PolicyConfig, SamplerConfig, UpdateRuleConfig};
//!
//! let config = SamplerConfig::from_toml_str(r#"
//!     random_seed = 7
//!     sweeps = 50
//!
//!     [policy]
//!     type = "sample_rank"
//!     acceptance = "greedy_max"
//!
//!     [policy.update]
//!     type = "mira"
//!     max_step = 0.5
//! "#).unwrap();
//!
//! assert_eq!(config.sweeps(), 50);
//! let PolicyConfig::SampleRank(learner) = &config.policy else { panic!() };
//! assert!(matches!(learner.update, UpdateRuleConfig::Mira(_)));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use inferforge_config::SamplerConfig;
//!
//! let config = SamplerConfig::load("sampler.toml").unwrap_or_default();
//! assert_eq!(config.block_limit(), 1024);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of sweeps when none is configured.
pub const DEFAULT_SWEEPS: u64 = 10;

/// Default upper bound on block cross-product enumeration.
pub const DEFAULT_BLOCK_LIMIT: usize = 1024;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 1.0;

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

/// Main sampler configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SamplerConfig {
    /// Random seed for reproducible results.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Number of passes over the proposal contexts.
    #[serde(default)]
    pub sweeps: Option<u64>,

    /// Largest block cross product a block proposer may enumerate.
    #[serde(default)]
    pub block_limit: Option<usize>,

    /// Acceptance policy.
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl SamplerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
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

    /// Parses configuration from a YAML string.
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

    /// Sets the number of sweeps.
    pub fn with_sweeps(mut self, sweeps: u64) -> Self {
        self.sweeps = Some(sweeps);
        self
    }

    /// Sets the block enumeration limit.
    pub fn with_block_limit(mut self, limit: usize) -> Self {
        self.block_limit = Some(limit);
        self
    }

    /// Sets the acceptance policy.
    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = policy;
        self
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps.unwrap_or(DEFAULT_SWEEPS)
    }

    pub fn block_limit(&self) -> usize {
        self.block_limit.unwrap_or(DEFAULT_BLOCK_LIMIT)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_limit == Some(0) {
            return Err(ConfigError::Invalid("block_limit must be positive".into()));
        }
        match &self.policy {
            PolicyConfig::MetropolisHastings(mh) => check_temperature(mh.temperature),
            PolicyConfig::GreedyMax => Ok(()),
            PolicyConfig::SampleRank(sr) => {
                check_temperature(sr.temperature)?;
                sr.update.validate()
            }
        }
    }
}

fn check_temperature(temperature: Option<f64>) -> Result<(), ConfigError> {
    match temperature {
        Some(t) if t.is_nan() || t < 0.0 => Err(ConfigError::Invalid(format!(
            "temperature must be non-negative, got {t}"
        ))),
        _ => Ok(()),
    }
}

fn check_positive(name: &str, value: Option<f64>) -> Result<(), ConfigError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => Err(ConfigError::Invalid(format!(
            "{name} must be positive and finite, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Acceptance policy configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Metropolis-Hastings with a fixed temperature.
    MetropolisHastings(MetropolisHastingsConfig),

    /// Evaluate every candidate, keep the best.
    GreedyMax,

    /// SampleRank training.
    SampleRank(SampleRankConfig),
}

impl Default for PolicyConfig {
    fn default() -> Self {
        PolicyConfig::MetropolisHastings(MetropolisHastingsConfig::default())
    }
}

/// Metropolis-Hastings configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MetropolisHastingsConfig {
    /// Sampling temperature.
    pub temperature: Option<f64>,
}

/// SampleRank configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SampleRankConfig {
    /// How the realised transition is chosen.
    #[serde(default)]
    pub acceptance: AcceptanceType,

    /// Temperature used when `acceptance` is Metropolis-Hastings.
    pub temperature: Option<f64>,

    /// Weight update rule.
    #[serde(default)]
    pub update: UpdateRuleConfig,
}

/// Transition choice used while learning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceType {
    #[default]
    MetropolisHastings,
    GreedyMax,
}

/// Weight update rule configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpdateRuleConfig {
    /// Fixed-rate perceptron.
    Perceptron(PerceptronConfig),

    /// Passive-aggressive (MIRA) with step clipping.
    Mira(MiraConfig),

    /// Adaptive regularisation of weights.
    Arow(ArowConfig),
}

impl Default for UpdateRuleConfig {
    fn default() -> Self {
        UpdateRuleConfig::Perceptron(PerceptronConfig::default())
    }
}

impl UpdateRuleConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            UpdateRuleConfig::Perceptron(p) => check_positive("learning_rate", p.learning_rate),
            UpdateRuleConfig::Mira(m) => check_positive("max_step", m.max_step),
            UpdateRuleConfig::Arow(a) => check_positive("r", a.r),
        }
    }
}

/// Perceptron configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PerceptronConfig {
    pub learning_rate: Option<f64>,
}

/// MIRA configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MiraConfig {
    /// Upper bound on the step size (the aggressiveness parameter C).
    pub max_step: Option<f64>,
}

/// AROW configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ArowConfig {
    /// Regularisation parameter.
    pub r: Option<f64>,
}

#[cfg(test)]
mod tests;
