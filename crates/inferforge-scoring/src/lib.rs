//! Locality-scoped scoring for InferForge factor graphs.
//!
//! This crate provides:
//! - Sparse sufficient statistics ([`SparseVector`], [`ModelStatistics`])
//! - Dense per-template weights ([`Weights`], [`ModelWeights`])
//! - The template SPI ([`FactorTemplate`], [`FnTemplate`]) and [`Factor`]
//! - [`Model`], which scores full assignments and, more importantly, the
//!   delta of a [`DiffList`](inferforge_core::DiffList) by unrolling only the
//!   factors around the variables it touches
//! - Training objectives ([`Objective`], [`HammingObjective`])

pub mod error;
pub mod model;
pub mod objective;
pub mod statistics;
pub mod template;
pub mod weights;

pub use error::ScoringError;
pub use model::Model;
pub use objective::{FnObjective, HammingObjective, Objective};
pub use statistics::{ModelStatistics, SparseVector};
pub use template::{Factor, FactorTemplate, FnTemplate, Template};
pub use weights::{ModelWeights, Weights};
