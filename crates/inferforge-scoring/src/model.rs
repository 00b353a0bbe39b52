//! Model scoring.
//!
//! The model never rescans the graph to score a proposal. For a
//! [`DiffList`] it unrolls only the factors reachable from the variables the
//! list touches, once in the proposed state and once in the original state,
//! and subtracts. Per-proposal cost therefore depends on the size of the
//! touched neighbourhood, not on the size of the assignment.

use std::collections::HashSet;

use inferforge_core::{Assignment, DiffList, VariableId};

use crate::error::ScoringError;
use crate::statistics::ModelStatistics;
use crate::template::{Factor, FactorTemplate, Template};
use crate::weights::{ModelWeights, Weights};

/// Ordered collection of weighted templates.
#[derive(Debug, Clone, Default)]
pub struct Model {
    templates: Vec<Template>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template with zero weights and returns its index.
    pub fn add_template(&mut self, rule: impl FactorTemplate + 'static) -> usize {
        self.push_template(Template::new(rule))
    }

    pub fn push_template(&mut self, template: Template) -> usize {
        self.templates.push(template);
        self.templates.len() - 1
    }

    pub fn with_template(mut self, rule: impl FactorTemplate + 'static) -> Self {
        self.add_template(rule);
        self
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn template(&self, index: usize) -> &Template {
        &self.templates[index]
    }

    pub fn template_mut(&mut self, index: usize) -> &mut Template {
        &mut self.templates[index]
    }

    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Distinct factors touching any of `variables`, grouped by template.
    pub fn unroll(&self, variables: &[VariableId], assignment: &Assignment) -> Vec<Vec<Factor>> {
        let mut buffer = Vec::new();
        self.templates
            .iter()
            .map(|template| {
                buffer.clear();
                for &variable in variables {
                    template.unroll(variable, assignment, &mut buffer);
                }
                let mut seen = HashSet::with_capacity(buffer.len());
                buffer
                    .drain(..)
                    .filter(|factor| seen.insert(factor.clone()))
                    .collect()
            })
            .collect()
    }

    fn score_factors(&self, factors: &[Vec<Factor>], assignment: &Assignment) -> f64 {
        self.templates
            .iter()
            .zip(factors)
            .map(|(template, factors)| {
                factors
                    .iter()
                    .map(|factor| template.factor_score(factor, assignment))
                    .sum::<f64>()
            })
            .sum()
    }

    fn statistics_of(&self, factors: &[Vec<Factor>], assignment: &Assignment) -> ModelStatistics {
        let mut stats = ModelStatistics::zeros(self.templates.len());
        for (i, (template, factors)) in self.templates.iter().zip(factors).enumerate() {
            let acc = stats.template_mut(i);
            for factor in factors {
                acc.add_scaled(&template.statistics(factor, assignment), 1.0);
            }
        }
        stats
    }

    /// Scores the whole assignment: every distinct factor reachable from
    /// any variable, summed over templates.
    pub fn score(&self, assignment: &Assignment) -> f64 {
        let all: Vec<VariableId> = assignment.ids().collect();
        self.score_factors(&self.unroll(&all, assignment), assignment)
    }

    /// Sufficient statistics of the whole assignment.
    pub fn statistics(&self, assignment: &Assignment) -> ModelStatistics {
        let all: Vec<VariableId> = assignment.ids().collect();
        self.statistics_of(&self.unroll(&all, assignment), assignment)
    }

    /// Score change caused by `diff`, which must currently be applied.
    ///
    /// The assignment is left in the applied state on return.
    pub fn score_delta(&self, assignment: &mut Assignment, diff: &DiffList) -> f64 {
        if diff.is_empty() {
            return 0.0;
        }
        let touched = diff.variables();
        let after = self.score_factors(&self.unroll(&touched, assignment), assignment);
        diff.undo_all(assignment);
        let before = self.score_factors(&self.unroll(&touched, assignment), assignment);
        diff.redo_all(assignment);
        after - before
    }

    /// Statistics change caused by `diff`, which must currently be applied.
    ///
    /// `self.weights()` dotted with the result equals [`score_delta`](Self::score_delta).
    pub fn statistics_delta(&self, assignment: &mut Assignment, diff: &DiffList) -> ModelStatistics {
        if diff.is_empty() {
            return ModelStatistics::zeros(self.templates.len());
        }
        let touched = diff.variables();
        let after = self.statistics_of(&self.unroll(&touched, assignment), assignment);
        diff.undo_all(assignment);
        let before = self.statistics_of(&self.unroll(&touched, assignment), assignment);
        diff.redo_all(assignment);
        after.difference(&before)
    }

    /// Weighted sum of `statistics` under the current weights.
    pub fn dot(&self, statistics: &ModelStatistics) -> f64 {
        self.templates
            .iter()
            .enumerate()
            .map(|(i, template)| template.weights().dot(statistics.template(i)))
            .sum()
    }

    /// Adds `delta` to the weights, template by template.
    pub fn apply_delta(&mut self, delta: &ModelStatistics) {
        for (i, template) in self.templates.iter_mut().enumerate() {
            template.weights_mut().add_scaled(delta.template(i), 1.0);
        }
    }

    /// Copies the current weights into a snapshot.
    pub fn weights(&self) -> ModelWeights {
        ModelWeights::new(
            self.templates
                .iter()
                .map(|t| t.weights().as_slice().to_vec())
                .collect(),
        )
    }

    /// Replaces all weights with `snapshot`.
    ///
    /// # Errors
    ///
    /// Fails without modifying the model if the snapshot's shape differs.
    pub fn set_weights(&mut self, snapshot: &ModelWeights) -> Result<(), ScoringError> {
        if snapshot.template_count() != self.templates.len() {
            return Err(ScoringError::TemplateCount {
                expected: self.templates.len(),
                found: snapshot.template_count(),
            });
        }
        for (i, template) in self.templates.iter().enumerate() {
            let found = snapshot.template(i).len();
            if found != template.weights().dimension() {
                return Err(ScoringError::Dimension {
                    template: template.name().to_string(),
                    expected: template.weights().dimension(),
                    found,
                });
            }
        }
        for (i, template) in self.templates.iter_mut().enumerate() {
            *template.weights_mut() = Weights::from_vec(snapshot.template(i).to_vec());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
