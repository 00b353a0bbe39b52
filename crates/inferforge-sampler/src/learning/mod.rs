//! SampleRank online learning.
//!
//! For each proposal context the learner scores every candidate transition
//! under both the model and the training objective. When the objective
//! strictly prefers a candidate that the model ranks no higher than its own
//! favourite, the update rule adjusts the weights toward the objective's
//! ranking. The realised transition is then chosen independently of the
//! update, from the deltas measured before it.

mod update;

use std::sync::Arc;

use inferforge_core::{Assignment, DiffList};
use inferforge_scoring::{Model, ModelStatistics, Objective};
use rand::{Rng, RngCore};
use tracing::{debug, trace};

use crate::acceptance::{metropolis_accepts, Acceptance};
use crate::settings::SettingIterator;

pub use update::{Arow, Mira, Perceptron, Ranking, UpdateRule};

/// One scored candidate; all deltas are relative to the pre-context state.
#[derive(Debug)]
struct Candidate {
    diff: DiffList,
    statistics: ModelStatistics,
    model_delta: f64,
    truth_delta: f64,
}

impl Candidate {
    /// The "stay put" candidate.
    fn current(template_count: usize) -> Self {
        Self {
            diff: DiffList::new(),
            statistics: ModelStatistics::zeros(template_count),
            model_delta: 0.0,
            truth_delta: 0.0,
        }
    }
}

/// Outcome of one SampleRank context.
#[derive(Debug, Default)]
pub struct SampleRankStep {
    /// The transition left applied to the assignment.
    pub realized: DiffList,
    /// Non-trivial candidates scored.
    pub evaluated: u64,
    /// Whether the weights changed.
    pub updated: bool,
}

/// SampleRank learner: an objective, an update rule and a transition rule.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain};
/// use inferforge_sampler::{Perceptron, SampleRank};
/// use inferforge_scoring::HammingObjective;
///
/// let domain = Domain::new("bool", 2);
/// let mut assignment = Assignment::new();
/// assignment.add_variable(&domain, 1).unwrap();
///
/// let learner = SampleRank::new(HammingObjective::from_assignment(&assignment), Perceptron::new(0.1));
/// assert_eq!(learner.update_count(), 0);
/// ```
#[derive(Debug)]
pub struct SampleRank {
    objective: Arc<dyn Objective>,
    rule: Box<dyn UpdateRule>,
    acceptance: Acceptance,
    updates: u64,
}

impl SampleRank {
    pub fn new(objective: impl Objective + 'static, rule: impl UpdateRule + 'static) -> Self {
        Self::from_parts(Arc::new(objective), Box::new(rule))
    }

    pub fn from_parts(objective: Arc<dyn Objective>, rule: Box<dyn UpdateRule>) -> Self {
        Self {
            objective,
            rule,
            acceptance: Acceptance::default(),
            updates: 0,
        }
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn objective(&self) -> &dyn Objective {
        self.objective.as_ref()
    }

    pub fn rule(&self) -> &dyn UpdateRule {
        self.rule.as_ref()
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    /// Number of weight updates applied so far.
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Learns from one context and applies the chosen transition.
    ///
    /// Every candidate from `settings` is applied, scored and undone. The
    /// current state takes part as a candidate with zero deltas, so a
    /// context with no candidates leaves everything unchanged.
    pub fn learn(
        &mut self,
        model: &mut Model,
        settings: &mut dyn SettingIterator,
        assignment: &mut Assignment,
        rng: &mut dyn RngCore,
    ) -> SampleRankStep {
        let mut candidates = vec![Candidate::current(model.template_count())];
        while settings.has_next() {
            let diff = settings.next_setting(assignment);
            if diff.is_empty() {
                continue;
            }
            let statistics = model.statistics_delta(assignment, &diff);
            let model_delta = model.dot(&statistics);
            let truth_delta = self.objective.score_delta(assignment, &diff);
            diff.undo_all(assignment);
            trace!(
                event = "candidate",
                model_delta,
                truth_delta,
                changes = diff.len(),
            );
            candidates.push(Candidate {
                diff,
                statistics,
                model_delta,
                truth_delta,
            });
        }
        let evaluated = (candidates.len() - 1) as u64;

        let model_best = model_best(&candidates);
        let truth_best = truth_best(&candidates);
        let updated = self.update(model, &candidates[truth_best], &candidates[model_best]);

        let chosen = match self.acceptance {
            Acceptance::GreedyMax => model_best,
            Acceptance::MetropolisHastings { temperature } => {
                if candidates.len() < 2 {
                    0
                } else {
                    let pick = rng.random_range(1..candidates.len());
                    if metropolis_accepts(candidates[pick].model_delta, temperature, rng) {
                        pick
                    } else {
                        0
                    }
                }
            }
        };

        let realized = std::mem::take(&mut candidates[chosen].diff);
        realized.redo_all(assignment);
        SampleRankStep {
            realized,
            evaluated,
            updated,
        }
    }

    fn update(&mut self, model: &mut Model, truth: &Candidate, best: &Candidate) -> bool {
        if truth.truth_delta <= best.truth_delta || truth.model_delta > best.model_delta {
            return false;
        }
        let ranking = Ranking {
            preferred: &truth.statistics,
            rejected: &best.statistics,
            model_margin: truth.model_delta - best.model_delta,
            truth_margin: truth.truth_delta - best.truth_delta,
        };
        let mut delta = self.rule.weight_delta(&ranking);
        delta.prune();
        model.apply_delta(&delta);
        self.updates += 1;
        debug!(
            event = "weight_update",
            rule = self.rule.name(),
            model_margin = ranking.model_margin,
            truth_margin = ranking.truth_margin,
            updates = self.updates,
        );
        true
    }
}

/// Index of the highest model delta, first on ties.
fn model_best(candidates: &[Candidate]) -> usize {
    let mut best = 0;
    for (i, c) in candidates.iter().enumerate().skip(1) {
        if c.model_delta > candidates[best].model_delta {
            best = i;
        }
    }
    best
}

/// Index of the highest truth delta; ties go to the higher model delta, then
/// to the first.
fn truth_best(candidates: &[Candidate]) -> usize {
    let mut best = 0;
    for (i, c) in candidates.iter().enumerate().skip(1) {
        let b = &candidates[best];
        if c.truth_delta > b.truth_delta
            || (c.truth_delta == b.truth_delta && c.model_delta > b.model_delta)
        {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests;
