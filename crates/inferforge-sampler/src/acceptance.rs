//! Acceptance rules for proposed transitions.
//!
//! A positive score delta means the model prefers the proposed state.

use rand::{Rng, RngCore};

use crate::error::SamplerError;
use crate::learning::SampleRank;

/// Probability of accepting a transition with score change `delta` at
/// `temperature`.
///
/// Non-negative deltas are always accepted. A temperature of zero accepts
/// only those; an infinite temperature accepts everything.
///
/// ```
/// use inferforge_sampler::acceptance_probability;
///
/// assert_eq!(acceptance_probability(0.5, 1.0), 1.0);
/// assert_eq!(acceptance_probability(-1.0, 0.0), 0.0);
/// assert_eq!(acceptance_probability(-1.0, f64::INFINITY), 1.0);
/// assert!((acceptance_probability(-1.0, 1.0) - (-1.0f64).exp()).abs() < 1e-12);
/// ```
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta >= 0.0 {
        1.0
    } else if temperature <= 0.0 {
        0.0
    } else {
        (delta / temperature).exp()
    }
}

/// Draws the Metropolis-Hastings decision for `delta`.
///
/// Consumes a random number only when the outcome is not certain.
pub fn metropolis_accepts(delta: f64, temperature: f64, rng: &mut dyn RngCore) -> bool {
    let p = acceptance_probability(delta, temperature);
    if p >= 1.0 {
        true
    } else if p <= 0.0 || p.is_nan() {
        false
    } else {
        rng.random::<f64>() < p
    }
}

fn check_temperature(temperature: f64) -> Result<f64, SamplerError> {
    if temperature.is_nan() || temperature < 0.0 {
        Err(SamplerError::InvalidTemperature(temperature))
    } else {
        Ok(temperature)
    }
}

/// How the sampler turns a set of candidates into one transition.
#[derive(Debug)]
pub enum Policy {
    /// Materialise one uniformly drawn candidate and accept it with probability
    /// `min(1, exp(delta / temperature))`.
    MetropolisHastings { temperature: f64 },

    /// Materialise every candidate and keep the one with the highest model
    /// delta. Ties keep the current state, otherwise the first candidate.
    GreedyMax,

    /// Learn from every candidate with SampleRank, then transition by the
    /// learner's own acceptance rule.
    SampleRankGuided(SampleRank),
}

impl Policy {
    /// Metropolis-Hastings at `temperature`.
    ///
    /// # Errors
    ///
    /// Rejects negative and NaN temperatures.
    pub fn metropolis_hastings(temperature: f64) -> Result<Self, SamplerError> {
        Ok(Policy::MetropolisHastings {
            temperature: check_temperature(temperature)?,
        })
    }

    pub fn greedy_max() -> Self {
        Policy::GreedyMax
    }

    pub fn sample_rank(learner: SampleRank) -> Self {
        Policy::SampleRankGuided(learner)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::MetropolisHastings { .. } => "MetropolisHastings",
            Policy::GreedyMax => "GreedyMax",
            Policy::SampleRankGuided(_) => "SampleRank",
        }
    }

    /// Returns the learner when this policy trains weights.
    pub fn learner(&self) -> Option<&SampleRank> {
        match self {
            Policy::SampleRankGuided(learner) => Some(learner),
            _ => None,
        }
    }

    pub fn learner_mut(&mut self) -> Option<&mut SampleRank> {
        match self {
            Policy::SampleRankGuided(learner) => Some(learner),
            _ => None,
        }
    }
}

/// Transition rule used by SampleRank after learning from a context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Acceptance {
    /// Pick one non-trivial candidate uniformly, accept it by the
    /// Metropolis-Hastings rule on its model delta.
    MetropolisHastings { temperature: f64 },

    /// Move to the candidate with the highest model delta.
    GreedyMax,
}

impl Acceptance {
    /// Metropolis-Hastings at `temperature`.
    ///
    /// # Errors
    ///
    /// Rejects negative and NaN temperatures.
    pub fn metropolis_hastings(temperature: f64) -> Result<Self, SamplerError> {
        Ok(Acceptance::MetropolisHastings {
            temperature: check_temperature(temperature)?,
        })
    }
}

impl Default for Acceptance {
    fn default() -> Self {
        Acceptance::MetropolisHastings { temperature: 1.0 }
    }
}
