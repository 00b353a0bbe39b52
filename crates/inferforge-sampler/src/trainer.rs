//! Sweep-based training.
//!
//! A sweep processes every context once. Training runs a fixed number of
//! sweeps; there is no convergence test.

use std::time::{Duration, Instant};

use inferforge_config::SamplerConfig;
use inferforge_core::Assignment;
use inferforge_scoring::ModelWeights;
use rayon::prelude::*;
use tracing::info;

use crate::error::SamplerError;
use crate::proposer::Proposer;
use crate::sampler::Sampler;
use crate::statistics::SamplerStatistics;

/// Counts for a finished training run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrainingSummary {
    pub sweeps: u64,
    pub statistics: SamplerStatistics,
    pub duration: Duration,
}

/// One independent unit of parallel training.
///
/// Jobs own disjoint assignments; their samplers start from copies of the
/// same model.
pub struct TrainingJob<P: Proposer> {
    pub sampler: Sampler<P>,
    pub assignment: Assignment,
    pub contexts: Vec<P::Context>,
}

impl<P: Proposer> TrainingJob<P> {
    pub fn new(sampler: Sampler<P>, assignment: Assignment, contexts: Vec<P::Context>) -> Self {
        Self {
            sampler,
            assignment,
            contexts,
        }
    }
}

/// Runs sweeps of a sampler over a set of contexts.
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    sweeps: u64,
}

impl Trainer {
    pub fn new(sweeps: u64) -> Self {
        Self { sweeps }
    }

    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.sweeps())
    }

    pub fn sweeps(&self) -> u64 {
        self.sweeps
    }

    /// Processes every context once per sweep.
    ///
    /// # Errors
    ///
    /// Stops at the first proposer failure. Transitions made before the
    /// failure stay applied.
    pub fn train<P: Proposer>(
        &self,
        sampler: &mut Sampler<P>,
        assignment: &mut Assignment,
        contexts: &[P::Context],
    ) -> Result<TrainingSummary, SamplerError> {
        let start = Instant::now();
        let mut statistics = SamplerStatistics::new();

        info!(
            event = "train_start",
            sweeps = self.sweeps,
            contexts = contexts.len(),
            policy = sampler.policy().name(),
        );

        for sweep in 0..self.sweeps {
            let pass = sampler.process_all(contexts, assignment)?;
            statistics.merge(&pass);
            info!(
                event = "sweep_end",
                sweep,
                accepted = pass.proposals_accepted,
                updates = pass.weight_updates,
                acceptance_rate = pass.acceptance_rate(),
            );
        }

        let duration = start.elapsed();
        info!(
            event = "train_end",
            sweeps = self.sweeps,
            updates = statistics.weight_updates,
            duration_ms = duration.as_millis() as u64,
        );
        Ok(TrainingSummary {
            sweeps: self.sweeps,
            statistics,
            duration,
        })
    }

    /// Trains every job on a rayon worker and averages the final weights.
    ///
    /// Returns `None` when `jobs` is empty.
    ///
    /// # Errors
    ///
    /// Fails if any job fails, or if the jobs' models have different shapes.
    pub fn train_parallel<P>(
        &self,
        jobs: Vec<TrainingJob<P>>,
    ) -> Result<Option<ModelWeights>, SamplerError>
    where
        P: Proposer,
        P::Context: Send + Sync,
    {
        let workers = jobs.len();
        let snapshots = jobs
            .into_par_iter()
            .map(|mut job| -> Result<ModelWeights, SamplerError> {
                self.train(&mut job.sampler, &mut job.assignment, &job.contexts)?;
                Ok(job.sampler.model().weights())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let averaged = ModelWeights::average(&snapshots)?;
        info!(event = "train_parallel_end", workers);
        Ok(averaged)
    }
}
