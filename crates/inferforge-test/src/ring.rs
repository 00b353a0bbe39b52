//! Boolean ring fixture.
//!
//! Four boolean variables connected in a cycle `0-1-2-3-0`. Adjacency is an
//! index table. The ring template fires statistic 0 for an agreeing edge and
//! statistic 1 for a disagreeing edge. The ring objective scores -1 per
//! agreeing edge and +1 per disagreeing edge, so the alternating states are
//! the best ones.
//!
//! # Example
//!
//! ```
//! use inferforge_scoring::Objective;
//! use inferforge_test::ring::{ring_objective, Ring};
//!
//! let mut ring = Ring::new();
//! assert_eq!(ring_objective().score(&ring.assignment), -4.0);
//!
//! ring.set_state(0b0101);
//! assert_eq!(ring_objective().score(&ring.assignment), 4.0);
//! ```

use std::sync::Arc;

use inferforge_core::{Assignment, Domain, VariableId};
use inferforge_scoring::{
    Factor, FactorTemplate, FnObjective, FnTemplate, Model, Objective, SparseVector,
};

/// Number of variables on the ring.
pub const RING_SIZE: usize = 4;

/// `NEIGHBOURS[i]` holds the previous and next variable of `i`.
pub const NEIGHBOURS: [[usize; 2]; RING_SIZE] = [[3, 1], [0, 2], [1, 3], [2, 0]];

/// Number of distinct ring states.
pub const STATE_COUNT: usize = 1 << RING_SIZE;

/// The four ring edges as `(low, high)` index pairs.
pub fn edges() -> impl Iterator<Item = (usize, usize)> {
    (0..RING_SIZE).map(|i| {
        let next = NEIGHBOURS[i][1];
        (i.min(next), i.max(next))
    })
}

/// A ring instance with every variable starting at `false`.
#[derive(Debug, Clone)]
pub struct Ring {
    pub domain: Arc<Domain>,
    pub assignment: Assignment,
    pub variables: Vec<VariableId>,
}

impl Ring {
    pub fn new() -> Self {
        let domain = Domain::with_labels("bool", ["false", "true"]);
        let mut assignment = Assignment::with_capacity(RING_SIZE);
        let variables = (0..RING_SIZE)
            .map(|_| {
                assignment
                    .add_variable(&domain, 0)
                    .expect("index 0 is in a boolean domain")
            })
            .collect();
        Self {
            domain,
            assignment,
            variables,
        }
    }

    /// Sets variable `i` to bit `i` of `state` without journaling.
    pub fn set_state(&mut self, state: usize) {
        for (i, &id) in self.variables.iter().enumerate() {
            let value = self
                .domain
                .value((state >> i) & 1)
                .expect("a bit is in a boolean domain");
            self.assignment.set(id, value);
        }
    }

    /// Encodes the current assignment as a bit mask.
    pub fn state(&self) -> usize {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, &id)| self.assignment.value(id).index() << i)
            .sum()
    }
}

impl Default for Ring {
    fn default() -> Self {
        Self::new()
    }
}

/// Agreement template over the ring edges.
pub fn ring_template() -> impl FactorTemplate {
    FnTemplate::new(
        "ring",
        2,
        |v: VariableId, _: &Assignment, out: &mut Vec<Factor>| {
            let i = v.index();
            for &j in &NEIGHBOURS[i] {
                let (low, high) = (i.min(j), i.max(j));
                out.push(Factor::pair(
                    VariableId::from_index(low),
                    VariableId::from_index(high),
                ));
            }
        },
        |f: &Factor, a: &Assignment| {
            let same = a.value(f.variable(0)) == a.value(f.variable(1));
            SparseVector::one_hot(if same { 0 } else { 1 })
        },
    )
}

/// A model holding only [`ring_template`], with zero weights.
pub fn ring_model() -> Model {
    Model::new().with_template(ring_template())
}

fn ring_truth(assignment: &Assignment) -> f64 {
    edges()
        .map(|(a, b)| {
            let same = assignment.value(VariableId::from_index(a))
                == assignment.value(VariableId::from_index(b));
            if same {
                -1.0
            } else {
                1.0
            }
        })
        .sum()
}

/// -1 per agreeing edge, +1 per disagreeing edge.
pub fn ring_objective() -> impl Objective {
    FnObjective::new("ring", ring_truth as fn(&Assignment) -> f64)
}
