//! Error types for model scoring.

use thiserror::Error;

/// Errors raised when loading or merging weights.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The weight snapshot has a different number of templates than the model.
    #[error("weight snapshot has {found} templates, model has {expected}")]
    TemplateCount { expected: usize, found: usize },

    /// A template's weight vector has the wrong length.
    #[error("template '{template}' expects {expected} weights, got {found}")]
    Dimension {
        template: String,
        expected: usize,
        found: usize,
    },
}
