//! The sampler: one context in, one realised transition out.

use std::time::Instant;

use inferforge_core::{Assignment, DiffList};
use inferforge_scoring::Model;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::acceptance::{metropolis_accepts, Policy};
use crate::error::SamplerError;
use crate::proposer::Proposer;
use crate::settings::SettingIterator;
use crate::statistics::SamplerStatistics;

/// Drives a [`Proposer`] and a [`Policy`] over a [`Model`].
///
/// Each call to [`process`](Self::process) asks the proposer for the
/// candidates of one context, scores them by their local score delta and
/// leaves exactly one of them (possibly the empty transition) applied.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain};
/// use inferforge_sampler::{Policy, Sampler, VariableProposer};
/// use inferforge_scoring::{Factor, FnTemplate, Model, SparseVector};
///
/// let domain = Domain::new("tri", 3);
/// let mut assignment = Assignment::new();
/// let x = assignment.add_variable(&domain, 0).unwrap();
///
/// let mut model = Model::new().with_template(FnTemplate::new(
///     "bias",
///     3,
///     |v, _: &Assignment, out: &mut Vec<Factor>| out.push(Factor::unary(v)),
///     |f: &Factor, a: &Assignment| SparseVector::one_hot(a.value(f.variable(0)).index()),
/// ));
/// model.template_mut(0).weights_mut().set(2, 1.0);
///
/// let mut sampler = Sampler::new(model, VariableProposer, Policy::GreedyMax).with_seed(42);
/// let diff = sampler.process(&x, &mut assignment).unwrap();
/// assert_eq!(diff.len(), 1);
/// assert_eq!(assignment.value(x).index(), 2);
/// ```
#[derive(Debug)]
pub struct Sampler<P: Proposer> {
    model: Model,
    proposer: P,
    policy: Policy,
    rng: ChaCha8Rng,
    statistics: SamplerStatistics,
}

impl<P: Proposer> Sampler<P> {
    /// Creates a sampler seeded from the thread-local generator.
    pub fn new(model: Model, proposer: P, policy: Policy) -> Self {
        Self {
            model,
            proposer,
            policy,
            rng: ChaCha8Rng::seed_from_u64(rand::random()),
            statistics: SamplerStatistics::new(),
        }
    }

    /// Reseeds for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut Policy {
        &mut self.policy
    }

    pub fn proposer(&self) -> &P {
        &self.proposer
    }

    pub fn proposer_mut(&mut self) -> &mut P {
        &mut self.proposer
    }

    pub fn statistics(&self) -> &SamplerStatistics {
        &self.statistics
    }

    /// Processes one context.
    ///
    /// Returns the transition left applied to `assignment`, empty when the
    /// proposal was rejected or there was nothing to propose. Rejected
    /// candidates are always undone.
    ///
    /// # Errors
    ///
    /// Propagates failures of the proposer, such as an oversized block.
    pub fn process(
        &mut self,
        context: &P::Context,
        assignment: &mut Assignment,
    ) -> Result<DiffList, SamplerError> {
        let mut settings = self.proposer.settings(context, assignment, &mut self.rng)?;

        let (realized, evaluated, updated) = match &mut self.policy {
            Policy::MetropolisHastings { temperature } => {
                let (diff, evaluated) = metropolis_step(
                    &self.model,
                    settings.as_mut(),
                    assignment,
                    *temperature,
                    &mut self.rng,
                );
                (diff, evaluated, false)
            }
            Policy::GreedyMax => {
                let (diff, evaluated) = greedy_step(&self.model, settings.as_mut(), assignment);
                (diff, evaluated, false)
            }
            Policy::SampleRankGuided(learner) => {
                let step = learner.learn(
                    &mut self.model,
                    settings.as_mut(),
                    assignment,
                    &mut self.rng,
                );
                (step.realized, step.evaluated, step.updated)
            }
        };

        self.statistics
            .record_context(evaluated, !realized.is_empty(), updated);
        Ok(realized)
    }

    /// Processes each context once, in order.
    ///
    /// Returns the counts for this pass.
    pub fn process_all<'a, I>(
        &mut self,
        contexts: I,
        assignment: &mut Assignment,
    ) -> Result<SamplerStatistics, SamplerError>
    where
        I: IntoIterator<Item = &'a P::Context>,
        P::Context: 'a,
    {
        let start = Instant::now();
        let before = self.statistics;
        for context in contexts {
            self.process(context, assignment)?;
        }
        let pass = self.statistics.since(&before);

        info!(
            event = "process_all_end",
            policy = self.policy.name(),
            contexts = pass.contexts_processed,
            evaluated = pass.proposals_evaluated,
            accepted = pass.proposals_accepted,
            updates = pass.weight_updates,
            duration_ms = start.elapsed().as_millis() as u64,
        );
        Ok(pass)
    }

    /// Processes the same context `times` times.
    pub fn process_repeated(
        &mut self,
        context: &P::Context,
        assignment: &mut Assignment,
        times: usize,
    ) -> Result<SamplerStatistics, SamplerError> {
        let before = self.statistics;
        for _ in 0..times {
            self.process(context, assignment)?;
        }
        Ok(self.statistics.since(&before))
    }
}

/// Draws one candidate uniformly from the pass and keeps it by the
/// Metropolis-Hastings rule.
fn metropolis_step(
    model: &Model,
    settings: &mut dyn SettingIterator,
    assignment: &mut Assignment,
    temperature: f64,
    rng: &mut dyn RngCore,
) -> (DiffList, u64) {
    let Some(diff) = draw_candidate(settings, assignment, rng) else {
        return (DiffList::new(), 0);
    };
    if diff.is_empty() {
        return (diff, 1);
    }
    let delta = model.score_delta(assignment, &diff);
    trace!(event = "candidate", delta, changes = diff.len());

    if metropolis_accepts(delta, temperature, rng) {
        debug!(event = "accept", delta, changes = diff.len());
        (diff, 1)
    } else {
        diff.undo_all(assignment);
        (DiffList::new(), 1)
    }
}

/// Leaves one uniformly drawn candidate applied and returns its journal.
///
/// Iterators that know their size are skipped forward to the drawn index.
/// Others are walked once, undoing each candidate, and the drawn one is
/// re-applied.
fn draw_candidate(
    settings: &mut dyn SettingIterator,
    assignment: &mut Assignment,
    rng: &mut dyn RngCore,
) -> Option<DiffList> {
    match settings.setting_count() {
        Some(0) => None,
        Some(count) => {
            settings.reset();
            let pick = rng.random_range(0..count);
            for _ in 0..pick {
                if !settings.has_next() {
                    return None;
                }
                settings.next_setting(assignment).undo_all(assignment);
            }
            settings.has_next().then(|| settings.next_setting(assignment))
        }
        None => {
            let mut candidates = Vec::new();
            while settings.has_next() {
                let diff = settings.next_setting(assignment);
                diff.undo_all(assignment);
                candidates.push(diff);
            }
            if candidates.is_empty() {
                return None;
            }
            let diff = candidates.swap_remove(rng.random_range(0..candidates.len()));
            diff.redo_all(assignment);
            Some(diff)
        }
    }
}

/// Scores every candidate and keeps the one with the highest delta.
///
/// Ties go to the current state, then to the earliest candidate.
fn greedy_step(
    model: &Model,
    settings: &mut dyn SettingIterator,
    assignment: &mut Assignment,
) -> (DiffList, u64) {
    let mut evaluated = 0;
    let mut best: Option<(f64, DiffList)> = None;
    while settings.has_next() {
        let diff = settings.next_setting(assignment);
        let delta = model.score_delta(assignment, &diff);
        diff.undo_all(assignment);
        evaluated += 1;
        trace!(event = "candidate", delta, changes = diff.len());

        let better = match &best {
            None => true,
            Some((b, _)) => delta > *b || (delta == *b && diff.is_empty()),
        };
        if better {
            best = Some((delta, diff));
        }
    }

    match best {
        Some((delta, diff)) => {
            diff.redo_all(assignment);
            if !diff.is_empty() {
                debug!(event = "accept", delta, changes = diff.len());
            }
            (diff, evaluated)
        }
        None => (DiffList::new(), evaluated),
    }
}
