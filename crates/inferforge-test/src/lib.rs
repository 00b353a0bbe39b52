//! Shared test fixtures for InferForge crates.
//!
//! - [`ring`] - Four boolean variables on a cycle with an agreement template
//!   and an objective that rewards disagreeing neighbours
//! - [`chain`] - Labelled chain with observations and gold labels
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! inferforge-test = { workspace = true }
//! ```

pub mod chain;
pub mod ring;

pub use chain::{chain_model, LabelChain, CHAIN_LABELS};
pub use ring::{ring_model, ring_objective, Ring, RING_SIZE};
