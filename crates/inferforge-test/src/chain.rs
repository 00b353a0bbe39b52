//! Labelled chain fixture.
//!
//! Each position carries an observation id and a gold label. The emission
//! template pairs observations with labels; the transition template scores
//! neighbouring label pairs. Gold labels are a function of the observation,
//! so a model can learn to label every position correctly.

use std::sync::Arc;

use inferforge_core::{Assignment, Domain, VariableId};
use inferforge_scoring::{Factor, FactorTemplate, FnTemplate, HammingObjective, Model, SparseVector};

/// Label set used by [`LabelChain`].
pub const CHAIN_LABELS: [&str; 3] = ["O", "B", "I"];

/// A chain of label variables with observations and gold labels.
#[derive(Debug, Clone)]
pub struct LabelChain {
    pub domain: Arc<Domain>,
    pub assignment: Assignment,
    pub variables: Vec<VariableId>,
    pub observations: Vec<usize>,
    pub gold: HammingObjective,
}

impl LabelChain {
    /// Builds a chain whose gold label at each position is
    /// `observations[i] % 3`. Every variable starts at label `"O"`.
    pub fn new(observations: &[usize]) -> Self {
        let domain = Domain::with_labels("label", CHAIN_LABELS);
        let mut assignment = Assignment::with_capacity(observations.len());
        let mut gold = HammingObjective::new();
        let variables = observations
            .iter()
            .map(|&obs| {
                let id = assignment
                    .add_variable(&domain, 0)
                    .expect("index 0 is a valid label");
                let label = domain
                    .value(obs % CHAIN_LABELS.len())
                    .expect("label index is reduced modulo the label count");
                gold.set_gold(id, label);
                id
            })
            .collect();
        Self {
            domain,
            assignment,
            variables,
            observations: observations.to_vec(),
            gold,
        }
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Current labels, one per position.
    pub fn labels(&self) -> Vec<&str> {
        self.variables
            .iter()
            .map(|&id| {
                self.domain
                    .label(self.assignment.value(id))
                    .unwrap_or("?")
            })
            .collect()
    }
}

/// Observation/label indicator: statistic `obs * labels + label`.
pub fn emission_template(observations: Vec<usize>, observation_count: usize) -> impl FactorTemplate {
    let labels = CHAIN_LABELS.len();
    FnTemplate::new(
        "emission",
        observation_count * labels,
        move |v: VariableId, _: &Assignment, out: &mut Vec<Factor>| {
            if let Some(&obs) = observations.get(v.index()) {
                out.push(Factor::with_key([v], obs as u64));
            }
        },
        move |f: &Factor, a: &Assignment| {
            let label = a.value(f.variable(0)).index();
            SparseVector::one_hot(f.key() as usize * labels + label)
        },
    )
}

/// Label bigram indicator between neighbouring positions.
pub fn transition_template(len: usize) -> impl FactorTemplate {
    let labels = CHAIN_LABELS.len();
    FnTemplate::new(
        "transition",
        labels * labels,
        move |v: VariableId, _: &Assignment, out: &mut Vec<Factor>| {
            let i = v.index();
            if i > 0 {
                out.push(Factor::pair(VariableId::from_index(i - 1), v));
            }
            if i + 1 < len {
                out.push(Factor::pair(v, VariableId::from_index(i + 1)));
            }
        },
        move |f: &Factor, a: &Assignment| {
            let left = a.value(f.variable(0)).index();
            let right = a.value(f.variable(1)).index();
            SparseVector::one_hot(left * labels + right)
        },
    )
}

/// Emission and transition templates for `chain`, with zero weights.
pub fn chain_model(chain: &LabelChain) -> Model {
    let observation_count = chain.observations.iter().max().map_or(0, |m| m + 1);
    Model::new()
        .with_template(emission_template(chain.observations.clone(), observation_count))
        .with_template(transition_template(chain.len()))
}
