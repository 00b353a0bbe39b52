//! InferForge sampling engine
//!
//! This crate provides stochastic local search over discrete factor graphs
//! and online learning of the model weights:
//! - Setting iterators that enumerate candidate transitions as diff lists
//! - Proposers mapping a context to a setting iterator (move generators)
//! - The sampler with Metropolis-Hastings and greedy policies
//! - SampleRank with pluggable update rules
//! - A sweep-based trainer, sequential or partitioned over rayon workers
//! - Configuration wiring (builder module)

pub mod acceptance;
pub mod builder;
pub mod error;
pub mod learning;
pub mod proposer;
pub mod sampler;
pub mod settings;
pub mod statistics;
pub mod trainer;

pub use acceptance::{acceptance_probability, metropolis_accepts, Acceptance, Policy};
pub use builder::{PolicyBuilder, UpdateRuleBuilder};
pub use error::SamplerError;
pub use learning::{Arow, Mira, Perceptron, Ranking, SampleRank, SampleRankStep, UpdateRule};
pub use proposer::{
    BlockProposer, FnProposer, Proposer, RandomBlockProposer, RandomValueProposer,
    VariableProposer,
};
pub use sampler::Sampler;
pub use settings::{BlockSettings, MoveSettings, SettingIterator, VariableSettings};
pub use statistics::SamplerStatistics;
pub use trainer::{Trainer, TrainingJob, TrainingSummary};
