//! InferForge - SampleRank inference and learning over factor graphs
//!
//! Build an [`Assignment`] of discrete variables, describe the model with
//! factor templates, and let a [`Sampler`] walk the state space one proposal
//! at a time. With a [`SampleRank`] policy the same walk trains the model
//! weights against a training objective.
//!
//! # Example
//!
//! ```rust
//! use inferforge::prelude::*;
//!
//! let domain = Domain::with_labels("tag", ["O", "B", "I"]);
//! let mut assignment = Assignment::new();
//! let x = assignment.add_variable(&domain, 0).unwrap();
//!
//! let mut diff = DiffList::new();
//! assignment.set_journaled(x, domain.value_of("B").unwrap(), &mut diff);
//! diff.undo_all(&mut assignment);
//! assert_eq!(domain.label(assignment.value(x)), Some("O"));
//! ```

// Variables, domains and the mutation journal
pub use inferforge_core::{
    Assignment, Diff, DiffList, Domain, DomainError, DomainId, SettingCount,
    UnsupportedEnumerationError, Value, Variable, VariableId,
};

// Templates, statistics and objectives
pub use inferforge_scoring::{
    Factor, FactorTemplate, FnObjective, FnTemplate, HammingObjective, Model, ModelStatistics,
    ModelWeights, Objective, ScoringError, SparseVector, Template, Weights,
};

// Sampling and learning
pub use inferforge_sampler::{
    Acceptance, Arow, BlockProposer, BlockSettings, FnProposer, Mira, MoveSettings, Perceptron,
    Policy, PolicyBuilder, Proposer, RandomBlockProposer, RandomValueProposer, Ranking,
    SampleRank, Sampler, SamplerError, SamplerStatistics, SettingIterator, Trainer, TrainingJob,
    TrainingSummary, UpdateRule, UpdateRuleBuilder, VariableProposer, VariableSettings,
};

// Configuration
pub use inferforge_config::{ConfigError, PolicyConfig, SamplerConfig, UpdateRuleConfig};

pub mod console;

mod train;
pub use train::{run_training, TrainingRun};

pub mod prelude {
    pub use super::{Assignment, DiffList, Domain, Value, VariableId};
    pub use super::{Factor, FactorTemplate, FnTemplate, Model, Objective, SparseVector};
    pub use super::{
        Acceptance, Perceptron, Policy, Proposer, SampleRank, Sampler, SettingIterator,
        Trainer, VariableProposer,
    };
    pub use super::SamplerConfig;
}
