//! Enumeration of every value of one variable.

use inferforge_core::{Assignment, DiffList, Value, VariableId};

use super::SettingIterator;

/// Visits each value of a single variable's domain once per pass, in index
/// order.
///
/// The variable's current value is one of the settings and yields an empty
/// [`DiffList`].
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain};
/// use inferforge_sampler::{SettingIterator, VariableSettings};
///
/// let domain = Domain::new("tri", 3);
/// let mut assignment = Assignment::new();
/// let x = assignment.add_variable(&domain, 0).unwrap();
///
/// let mut settings = VariableSettings::new(x, &assignment);
/// let mut seen = Vec::new();
/// while settings.has_next() {
///     let diff = settings.next_setting(&mut assignment);
///     seen.push(assignment.value(x).index());
///     diff.undo_all(&mut assignment);
/// }
/// assert_eq!(seen, vec![0, 1, 2]);
/// assert_eq!(assignment.value(x).index(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct VariableSettings {
    variable: VariableId,
    values: Vec<Value>,
    position: usize,
}

impl VariableSettings {
    pub fn new(variable: VariableId, assignment: &Assignment) -> Self {
        Self {
            variable,
            values: assignment.domain(variable).values().collect(),
            position: 0,
        }
    }

    pub fn variable(&self) -> VariableId {
        self.variable
    }
}

impl SettingIterator for VariableSettings {
    fn has_next(&self) -> bool {
        self.position < self.values.len()
    }

    fn next_into(&mut self, assignment: &mut Assignment, diff: &mut DiffList) {
        let Some(&value) = self.values.get(self.position) else {
            return;
        };
        self.position += 1;
        assignment.set_journaled(self.variable, value, diff);
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn setting_count(&self) -> Option<usize> {
        Some(self.values.len())
    }
}
