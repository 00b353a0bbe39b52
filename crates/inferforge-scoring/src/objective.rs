//! Training objectives.
//!
//! An objective scores assignments by how close they are to the truth.
//! SampleRank compares objective rankings with model rankings; higher is
//! better for both.

use std::fmt::{self, Debug};

use inferforge_core::{Assignment, DiffList, Value, VariableId};

/// Application-supplied scorer over the same variables as the model.
pub trait Objective: Send + Sync + Debug {
    /// Scores the full assignment.
    fn score(&self, assignment: &Assignment) -> f64;

    /// Score change caused by `diff`, which must currently be applied.
    ///
    /// The default rescores the full assignment on both sides of the diff;
    /// objectives that decompose over variables should override it.
    fn score_delta(&self, assignment: &mut Assignment, diff: &DiffList) -> f64 {
        if diff.is_empty() {
            return 0.0;
        }
        let after = self.score(assignment);
        diff.undo_all(assignment);
        let before = self.score(assignment);
        diff.redo_all(assignment);
        after - before
    }
}

/// Counts variables holding their gold value.
///
/// Variables without a gold value never contribute.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain};
/// use inferforge_scoring::{HammingObjective, Objective};
///
/// let domain = Domain::new("bool", 2);
/// let mut assignment = Assignment::new();
/// let x = assignment.add_variable(&domain, 0).unwrap();
/// let y = assignment.add_variable(&domain, 0).unwrap();
///
/// let mut truth = HammingObjective::new();
/// truth.set_gold(x, domain.value(0).unwrap());
/// truth.set_gold(y, domain.value(1).unwrap());
/// assert_eq!(truth.score(&assignment), 1.0);
/// assert_eq!(truth.accuracy(&assignment), 0.5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HammingObjective {
    gold: Vec<Option<Value>>,
}

impl HammingObjective {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the current values of `assignment` as gold labels.
    pub fn from_assignment(assignment: &Assignment) -> Self {
        Self {
            gold: assignment.ids().map(|id| Some(assignment.value(id))).collect(),
        }
    }

    pub fn set_gold(&mut self, variable: VariableId, value: Value) {
        let index = variable.index();
        if self.gold.len() <= index {
            self.gold.resize(index + 1, None);
        }
        self.gold[index] = Some(value);
    }

    pub fn gold(&self, variable: VariableId) -> Option<Value> {
        self.gold.get(variable.index()).copied().flatten()
    }

    fn is_correct(&self, variable: VariableId, value: Value) -> bool {
        self.gold(variable) == Some(value)
    }

    /// Fraction of labelled variables holding their gold value.
    pub fn accuracy(&self, assignment: &Assignment) -> f64 {
        let labelled = self.gold.iter().filter(|g| g.is_some()).count();
        if labelled == 0 {
            0.0
        } else {
            self.score(assignment) / labelled as f64
        }
    }
}

impl Objective for HammingObjective {
    fn score(&self, assignment: &Assignment) -> f64 {
        assignment
            .ids()
            .filter(|&id| self.is_correct(id, assignment.value(id)))
            .count() as f64
    }

    fn score_delta(&self, assignment: &mut Assignment, diff: &DiffList) -> f64 {
        let mut delta = 0.0;
        for variable in diff.variables() {
            // The first write to a variable holds its pre-transition value.
            let Some(first) = diff.iter().find(|d| d.variable() == variable) else {
                continue;
            };
            if self.is_correct(variable, assignment.value(variable)) {
                delta += 1.0;
            }
            if self.is_correct(variable, first.old_value()) {
                delta -= 1.0;
            }
        }
        delta
    }
}

/// An [`Objective`] backed by a closure over the full assignment.
pub struct FnObjective<F> {
    name: String,
    score: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&Assignment) -> f64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, score: F) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

impl<F> Debug for FnObjective<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObjective").field("name", &self.name).finish()
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&Assignment) -> f64 + Send + Sync,
{
    fn score(&self, assignment: &Assignment) -> f64 {
        (self.score)(assignment)
    }
}
