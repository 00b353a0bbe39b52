//! Reversible mutation journal.
//!
//! A `DiffList` records every journaled write made while building one
//! candidate transition:
//!
//! ```text
//! let mut diff = DiffList::new();
//! assignment.set_journaled(x, v, &mut diff);   // records (x, old, v)
//! let delta = model.score_delta(&mut assignment, &diff);
//! diff.undo_all(&mut assignment);              // restores in reverse order
//! ```
//!
//! Undo runs newest-first so that several writes to the same variable unwind
//! back to the value it held before the first write.

use crate::domain::Value;
use crate::variable::{Assignment, VariableId};

/// One recorded write: `variable` went from `old` to `new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diff {
    variable: VariableId,
    old: Value,
    new: Value,
}

impl Diff {
    pub fn new(variable: VariableId, old: Value, new: Value) -> Self {
        Self { variable, old, new }
    }

    pub fn variable(&self) -> VariableId {
        self.variable
    }

    pub fn old_value(&self) -> Value {
        self.old
    }

    pub fn new_value(&self) -> Value {
        self.new
    }

    /// Re-applies the recorded transition.
    pub fn redo(&self, assignment: &mut Assignment) {
        assignment.write(self.variable, self.new);
    }

    /// Reverts the recorded transition.
    pub fn undo(&self, assignment: &mut Assignment) {
        assignment.write(self.variable, self.old);
    }
}

/// Ordered record of the writes making up one hypothetical transition.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, DiffList, Domain};
///
/// let domain = Domain::new("tri", 3);
/// let mut assignment = Assignment::new();
/// let x = assignment.add_variable(&domain, 0).unwrap();
///
/// let mut diff = DiffList::new();
/// assignment.set_journaled(x, domain.value(1).unwrap(), &mut diff);
/// assignment.set_journaled(x, domain.value(2).unwrap(), &mut diff);
///
/// diff.undo_all(&mut assignment);
/// assert_eq!(assignment.value(x).index(), 0);
///
/// diff.redo_all(&mut assignment);
/// assert_eq!(assignment.value(x).index(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffList {
    diffs: Vec<Diff>,
}

impl DiffList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            diffs: Vec::with_capacity(capacity),
        }
    }

    /// Appends a diff whose write has already been applied.
    pub fn append(&mut self, diff: Diff) {
        self.diffs.push(diff);
    }

    /// Reverts every diff, newest first.
    pub fn undo_all(&self, assignment: &mut Assignment) {
        for diff in self.diffs.iter().rev() {
            diff.undo(assignment);
        }
    }

    /// Re-applies every diff, oldest first.
    pub fn redo_all(&self, assignment: &mut Assignment) {
        for diff in &self.diffs {
            diff.redo(assignment);
        }
    }

    pub fn len(&self) -> usize {
        self.diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diff> {
        self.diffs.iter()
    }

    /// Distinct variables touched by this list, in first-touch order.
    pub fn variables(&self) -> Vec<VariableId> {
        let mut seen = Vec::with_capacity(self.diffs.len());
        for diff in &self.diffs {
            if !seen.contains(&diff.variable) {
                seen.push(diff.variable);
            }
        }
        seen
    }

    pub fn clear(&mut self) {
        self.diffs.clear();
    }
}

impl<'a> IntoIterator for &'a DiffList {
    type Item = &'a Diff;
    type IntoIter = std::slice::Iter<'a, Diff>;

    fn into_iter(self) -> Self::IntoIter {
        self.diffs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Domain;

    #[test]
    fn test_undo_is_lifo_over_overlapping_writes() {
        let domain = Domain::new("five", 5);
        let mut assignment = Assignment::new();
        let x = assignment.add_variable(&domain, 4).unwrap();
        let y = assignment.add_variable(&domain, 3).unwrap();

        let mut diff = DiffList::new();
        for index in [0, 1, 2] {
            assignment.set_journaled(x, domain.value(index).unwrap(), &mut diff);
            assignment.set_journaled(y, domain.value(index).unwrap(), &mut diff);
        }
        assert_eq!(diff.len(), 6);
        assert_eq!(diff.variables(), vec![x, y]);

        diff.undo_all(&mut assignment);
        assert_eq!(assignment.indices(), vec![4, 3]);
    }

    #[test]
    fn test_redo_restores_final_state() {
        let domain = Domain::new("five", 5);
        let mut assignment = Assignment::new();
        let x = assignment.add_variable(&domain, 0).unwrap();

        let mut diff = DiffList::new();
        assignment.set_journaled(x, domain.value(3).unwrap(), &mut diff);
        assignment.set_journaled(x, domain.value(1).unwrap(), &mut diff);
        diff.undo_all(&mut assignment);
        diff.redo_all(&mut assignment);
        assert_eq!(assignment.value(x).index(), 1);
    }

    #[test]
    fn test_single_diff_undo_redo() {
        let domain = Domain::new("bool", 2);
        let mut assignment = Assignment::new();
        let x = assignment.add_variable(&domain, 0).unwrap();
        let d = Diff::new(x, domain.value(0).unwrap(), domain.value(1).unwrap());

        d.redo(&mut assignment);
        assert_eq!(assignment.value(x).index(), 1);
        d.undo(&mut assignment);
        assert_eq!(assignment.value(x).index(), 0);
    }

    #[test]
    fn test_empty_list_is_noop() {
        let domain = Domain::new("bool", 2);
        let mut assignment = Assignment::new();
        assignment.add_variable(&domain, 1).unwrap();
        let diff = DiffList::new();
        diff.undo_all(&mut assignment);
        diff.redo_all(&mut assignment);
        assert_eq!(assignment.indices(), vec![1]);
    }
}
