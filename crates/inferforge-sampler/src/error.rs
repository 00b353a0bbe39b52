//! Error types for sampling and learning.

use inferforge_core::{DomainError, UnsupportedEnumerationError};
use inferforge_scoring::ScoringError;
use thiserror::Error;

/// Errors raised while building proposals, sampling or training.
///
/// Rejecting a proposal is a normal outcome and never produces an error.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("{0}")]
    UnsupportedEnumeration(#[from] UnsupportedEnumerationError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Invalid temperature {0}: must be non-negative")]
    InvalidTemperature(f64),

    #[error("Configuration error: {0}")]
    Config(String),
}
