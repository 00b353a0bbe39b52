//! Weight update rules.
//!
//! An update rule turns one ranking disagreement into a weight delta. The
//! learner applies the delta to the model; rules only see statistics.

use std::fmt::Debug;

use inferforge_scoring::{ModelStatistics, SparseVector};

/// A ranking disagreement between two candidates.
///
/// The objective strictly prefers `preferred`, yet the model scores it no
/// higher than `rejected`. Statistics are relative to the same base state.
#[derive(Debug, Clone, Copy)]
pub struct Ranking<'a> {
    pub preferred: &'a ModelStatistics,
    pub rejected: &'a ModelStatistics,
    /// `model(preferred) - model(rejected)`, never positive.
    pub model_margin: f64,
    /// `truth(preferred) - truth(rejected)`, always positive.
    pub truth_margin: f64,
}

impl Ranking<'_> {
    /// Statistics of the preferred candidate minus the rejected one.
    pub fn direction(&self) -> ModelStatistics {
        self.preferred.difference(self.rejected)
    }

    /// How far the model is from ranking the pair like the objective.
    pub fn loss(&self) -> f64 {
        self.truth_margin - self.model_margin
    }
}

/// Computes the weight change for a ranking disagreement.
pub trait UpdateRule: Send + Debug {
    fn name(&self) -> &'static str;

    /// Returns the delta to add to the model weights.
    fn weight_delta(&mut self, ranking: &Ranking<'_>) -> ModelStatistics;
}

/// Fixed-rate perceptron: moves the weights along the ranking direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perceptron {
    learning_rate: f64,
}

impl Perceptron {
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

impl Default for Perceptron {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl UpdateRule for Perceptron {
    fn name(&self) -> &'static str {
        "Perceptron"
    }

    fn weight_delta(&mut self, ranking: &Ranking<'_>) -> ModelStatistics {
        ranking.direction().scaled(self.learning_rate)
    }
}

/// One-best MIRA (passive-aggressive) update.
///
/// Takes the smallest step that makes the model margin equal the truth
/// margin, clipped to `max_step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mira {
    max_step: f64,
}

impl Mira {
    pub fn new(max_step: f64) -> Self {
        Self { max_step }
    }

    pub fn max_step(&self) -> f64 {
        self.max_step
    }
}

impl Default for Mira {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl UpdateRule for Mira {
    fn name(&self) -> &'static str {
        "Mira"
    }

    fn weight_delta(&mut self, ranking: &Ranking<'_>) -> ModelStatistics {
        let direction = ranking.direction();
        let norm = direction.norm_squared();
        if norm == 0.0 {
            return ModelStatistics::zeros(direction.template_count());
        }
        let step = (ranking.loss() / norm).min(self.max_step);
        direction.scaled(step)
    }
}

/// Adaptive regularisation of weights.
///
/// Keeps a diagonal variance per weight, starting at 1. Weights that have
/// been updated often get smaller steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Arow {
    r: f64,
    variance: Vec<Vec<f64>>,
}

impl Arow {
    pub fn new(r: f64) -> Self {
        Self {
            r,
            variance: Vec::new(),
        }
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    /// Current variance of weight `index` in `template`.
    pub fn variance(&self, template: usize, index: usize) -> f64 {
        self.variance
            .get(template)
            .and_then(|v| v.get(index))
            .copied()
            .unwrap_or(1.0)
    }

    fn variance_mut(&mut self, template: usize, index: usize) -> &mut f64 {
        if self.variance.len() <= template {
            self.variance.resize(template + 1, Vec::new());
        }
        let row = &mut self.variance[template];
        if row.len() <= index {
            row.resize(index + 1, 1.0);
        }
        &mut row[index]
    }
}

impl Default for Arow {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl UpdateRule for Arow {
    fn name(&self) -> &'static str {
        "Arow"
    }

    fn weight_delta(&mut self, ranking: &Ranking<'_>) -> ModelStatistics {
        let direction = ranking.direction();
        let mut delta = ModelStatistics::zeros(direction.template_count());

        let confidence: f64 = direction
            .iter()
            .enumerate()
            .flat_map(|(t, stats)| stats.iter().map(move |(i, x)| (t, i, x)))
            .map(|(t, i, x)| self.variance(t, i) * x * x)
            .sum();
        let loss = ranking.loss();
        if confidence == 0.0 || loss <= 0.0 {
            return delta;
        }

        let beta = 1.0 / (confidence + self.r);
        let alpha = loss * beta;
        for (t, stats) in direction.iter().enumerate() {
            let out: &mut SparseVector = delta.template_mut(t);
            for (i, x) in stats.iter() {
                let sigma = self.variance_mut(t, i);
                out.increment(i, alpha * *sigma * x);
                *sigma -= beta * *sigma * *sigma * x * x;
            }
        }
        delta
    }
}
