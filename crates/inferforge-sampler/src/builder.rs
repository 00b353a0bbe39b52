//! Builder module for constructing sampler components from configuration
//!
//! This module provides the wiring between configuration types and
//! the actual sampler implementation.

use std::sync::Arc;

use inferforge_config::{
    AcceptanceType, PolicyConfig, SamplerConfig, UpdateRuleConfig, DEFAULT_TEMPERATURE,
};
use inferforge_scoring::{Model, Objective};
use tracing::warn;

use crate::acceptance::{Acceptance, Policy};
use crate::error::SamplerError;
use crate::learning::{Arow, Mira, Perceptron, SampleRank, UpdateRule};
use crate::proposer::Proposer;
use crate::sampler::Sampler;

/// Builder for constructing update rules from configuration.
pub struct UpdateRuleBuilder;

impl UpdateRuleBuilder {
    /// Builds an update rule; unset or out-of-range parameters fall back to 1.0.
    pub fn build(config: &UpdateRuleConfig) -> Box<dyn UpdateRule> {
        match config {
            UpdateRuleConfig::Perceptron(p) => {
                Box::new(Perceptron::new(positive("learning_rate", p.learning_rate)))
            }
            UpdateRuleConfig::Mira(m) => Box::new(Mira::new(positive("max_step", m.max_step))),
            UpdateRuleConfig::Arow(a) => Box::new(Arow::new(positive("r", a.r))),
        }
    }
}

/// Builder for constructing policies from configuration.
pub struct PolicyBuilder;

impl PolicyBuilder {
    /// Builds a policy.
    ///
    /// `objective` is required by the SampleRank policy and ignored by the
    /// others.
    ///
    /// # Errors
    ///
    /// Fails when a SampleRank policy is configured without an objective.
    pub fn build(
        config: &PolicyConfig,
        objective: Option<Arc<dyn Objective>>,
    ) -> Result<Policy, SamplerError> {
        match config {
            PolicyConfig::MetropolisHastings(mh) => Ok(Policy::MetropolisHastings {
                temperature: temperature(mh.temperature),
            }),

            PolicyConfig::GreedyMax => Ok(Policy::GreedyMax),

            PolicyConfig::SampleRank(sr) => {
                let Some(objective) = objective else {
                    return Err(SamplerError::Config(
                        "sample_rank policy requires a training objective".to_string(),
                    ));
                };
                let acceptance = match sr.acceptance {
                    AcceptanceType::MetropolisHastings => Acceptance::MetropolisHastings {
                        temperature: temperature(sr.temperature),
                    },
                    AcceptanceType::GreedyMax => {
                        if sr.temperature.is_some() {
                            warn!("Temperature is not used by greedy_max acceptance, ignoring it");
                        }
                        Acceptance::GreedyMax
                    }
                };
                let rule = UpdateRuleBuilder::build(&sr.update);
                Ok(Policy::SampleRankGuided(
                    SampleRank::from_parts(objective, rule).with_acceptance(acceptance),
                ))
            }
        }
    }

    /// Builds a sampler with the configured policy and seed.
    pub fn build_sampler<P: Proposer>(
        config: &SamplerConfig,
        model: Model,
        proposer: P,
        objective: Option<Arc<dyn Objective>>,
    ) -> Result<Sampler<P>, SamplerError> {
        let policy = Self::build(&config.policy, objective)?;
        let sampler = Sampler::new(model, proposer, policy);
        Ok(match config.random_seed {
            Some(seed) => sampler.with_seed(seed),
            None => sampler,
        })
    }
}

fn temperature(configured: Option<f64>) -> f64 {
    match configured {
        Some(t) if t.is_nan() || t < 0.0 => {
            warn!(
                temperature = t,
                "Temperature must be non-negative, using {}",
                DEFAULT_TEMPERATURE
            );
            DEFAULT_TEMPERATURE
        }
        Some(t) => t,
        None => DEFAULT_TEMPERATURE,
    }
}

fn positive(name: &str, configured: Option<f64>) -> f64 {
    match configured {
        Some(v) if v.is_finite() && v > 0.0 => v,
        Some(v) => {
            warn!(parameter = name, value = v, "Parameter must be positive, using 1.0");
            1.0
        }
        None => 1.0,
    }
}
