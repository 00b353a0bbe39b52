//! Training entry point that hides the configuration wiring.

use std::sync::Arc;

use inferforge_config::SamplerConfig;
use inferforge_core::Assignment;
use inferforge_sampler::{PolicyBuilder, Proposer, SamplerError, Trainer, TrainingSummary};
use inferforge_scoring::{Model, Objective};
use tracing::info;

use crate::console;

/// Result of [`run_training`]: the trained model and the run's counts.
#[derive(Debug)]
pub struct TrainingRun {
    pub model: Model,
    pub summary: TrainingSummary,
}

/// Trains `model` over `contexts` as described by `config`.
///
/// Sets up log output, builds the policy (SampleRank needs `objective`),
/// seeds the sampler and runs the configured number of sweeps.
pub fn run_training<P: Proposer>(
    config: &SamplerConfig,
    model: Model,
    proposer: P,
    objective: Option<Arc<dyn Objective>>,
    assignment: &mut Assignment,
    contexts: &[P::Context],
) -> Result<TrainingRun, SamplerError> {
    console::init();

    let mut sampler = PolicyBuilder::build_sampler(config, model, proposer, objective)?;
    info!(
        event = "training_configured",
        policy = sampler.policy().name(),
        sweeps = config.sweeps(),
        seed = ?config.random_seed,
    );

    let summary = Trainer::from_config(config).train(&mut sampler, assignment, contexts)?;
    Ok(TrainingRun {
        model: sampler.into_model(),
        summary,
    })
}
