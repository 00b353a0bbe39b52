//! Discrete variables and the assignment that owns them.
//!
//! Variables live in an [`Assignment`] arena and are addressed by a stable
//! [`VariableId`]. Structure between variables (chains, rings, clusters) is
//! expressed by ids held in application tables, never by references between
//! variables.

use std::sync::Arc;

use rand::Rng;

use crate::diff::{Diff, DiffList};
use crate::domain::{Domain, Value};
use crate::error::DomainError;

/// Stable handle of a variable inside its [`Assignment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(usize);

impl VariableId {
    /// Creates an id from its position in the assignment.
    pub fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Returns the position of the variable in its assignment.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A mutable cell holding the current value of one discrete variable.
#[derive(Debug, Clone)]
pub struct Variable {
    domain: Arc<Domain>,
    value: Value,
    name: Option<String>,
}

impl Variable {
    pub fn domain(&self) -> &Arc<Domain> {
        &self.domain
    }

    #[inline]
    pub fn value(&self) -> Value {
        self.value
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// The variables of one problem instance and their current values.
///
/// Mutation comes in two flavours:
/// - [`set`](Self::set) writes directly and cannot be rolled back; use it for
///   initialisation.
/// - [`set_journaled`](Self::set_journaled) records a [`Diff`] in the given
///   [`DiffList`] so the change can be undone.
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
/// assignment.set_journaled(x, domain.value(2).unwrap(), &mut diff);
/// assert_eq!(assignment.value(x).index(), 2);
///
/// diff.undo_all(&mut assignment);
/// assert_eq!(assignment.value(x).index(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    variables: Vec<Variable>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            variables: Vec::with_capacity(capacity),
        }
    }

    /// Adds a variable of `domain` initialised to the value at `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IndexOutOfRange`] if `initial` is not a valid index.
    pub fn add_variable(
        &mut self,
        domain: &Arc<Domain>,
        initial: usize,
    ) -> Result<VariableId, DomainError> {
        self.push(domain, initial, None)
    }

    /// Adds a named variable; the name only serves diagnostics.
    pub fn add_named_variable(
        &mut self,
        name: impl Into<String>,
        domain: &Arc<Domain>,
        initial: usize,
    ) -> Result<VariableId, DomainError> {
        self.push(domain, initial, Some(name.into()))
    }

    fn push(
        &mut self,
        domain: &Arc<Domain>,
        initial: usize,
        name: Option<String>,
    ) -> Result<VariableId, DomainError> {
        let value = domain.value(initial)?;
        let id = VariableId(self.variables.len());
        self.variables.push(Variable {
            domain: Arc::clone(domain),
            value,
            name,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates all variable ids in insertion order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = VariableId> {
        (0..self.variables.len()).map(VariableId)
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }

    #[inline]
    pub fn value(&self, id: VariableId) -> Value {
        self.variables[id.0].value
    }

    pub fn domain(&self, id: VariableId) -> &Arc<Domain> {
        &self.variables[id.0].domain
    }

    /// Current value indices of all variables, in id order.
    pub fn indices(&self) -> Vec<usize> {
        self.variables.iter().map(|v| v.value.index()).collect()
    }

    /// Sets `id` to `value` without recording a diff.
    ///
    /// # Panics
    ///
    /// Panics if `value` belongs to a different domain than the variable.
    pub fn set(&mut self, id: VariableId, value: Value) {
        self.write(id, value);
    }

    /// Sets `id` to the value at `index` of its own domain, without a diff.
    pub fn set_index(&mut self, id: VariableId, index: usize) -> Result<(), DomainError> {
        let value = self.variables[id.0].domain.value(index)?;
        self.write(id, value);
        Ok(())
    }

    /// Sets `id` to `value`, appending a [`Diff`] to `diff`.
    ///
    /// Returns false and records nothing when `value` is already current.
    ///
    /// # Panics
    ///
    /// Panics if `value` belongs to a different domain than the variable.
    pub fn set_journaled(&mut self, id: VariableId, value: Value, diff: &mut DiffList) -> bool {
        let old = self.value(id);
        if old == value {
            return false;
        }
        self.write(id, value);
        diff.append(Diff::new(id, old, value));
        true
    }

    /// Draws a uniformly random value for `id` and writes it without a diff.
    pub fn set_randomly<R: Rng + ?Sized>(&mut self, id: VariableId, rng: &mut R) {
        let value = self.random_value(id, rng);
        self.write(id, value);
    }

    /// Draws a uniformly random value for `id`, journaling the change.
    pub fn set_randomly_journaled<R: Rng + ?Sized>(
        &mut self,
        id: VariableId,
        rng: &mut R,
        diff: &mut DiffList,
    ) -> bool {
        let value = self.random_value(id, rng);
        self.set_journaled(id, value, diff)
    }

    fn random_value<R: Rng + ?Sized>(&self, id: VariableId, rng: &mut R) -> Value {
        let domain = &self.variables[id.0].domain;
        assert!(domain.size() > 0, "cannot draw from empty domain '{}'", domain.name());
        // Index drawn from [0, size) is always valid.
        Value::from_parts(domain.id(), rng.random_range(0..domain.size()))
    }

    pub(crate) fn write(&mut self, id: VariableId, value: Value) {
        let slot = &mut self.variables[id.0];
        assert!(
            slot.domain.contains(value),
            "value {:?} does not belong to domain '{}' of variable {}",
            value,
            slot.domain.name(),
            id.0
        );
        slot.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tri() -> (Arc<Domain>, Assignment, VariableId) {
        let domain = Domain::new("tri", 3);
        let mut assignment = Assignment::new();
        let x = assignment.add_variable(&domain, 0).unwrap();
        (domain, assignment, x)
    }

    #[test]
    fn test_add_variable_rejects_bad_initial() {
        let domain = Domain::new("bool", 2);
        let mut assignment = Assignment::new();
        assert!(assignment.add_variable(&domain, 5).is_err());
        assert!(assignment.is_empty());
    }

    #[test]
    fn test_set_direct() {
        let (domain, mut assignment, x) = tri();
        assignment.set(x, domain.value(2).unwrap());
        assert_eq!(assignment.value(x).index(), 2);
    }

    #[test]
    fn test_set_journaled_records_diff() {
        let (domain, mut assignment, x) = tri();
        let mut diff = DiffList::new();
        assert!(assignment.set_journaled(x, domain.value(1).unwrap(), &mut diff));
        assert_eq!(diff.len(), 1);
        assert_eq!(assignment.value(x).index(), 1);
    }

    #[test]
    fn test_set_current_value_is_noop() {
        let (domain, mut assignment, x) = tri();
        let mut diff = DiffList::new();
        assert!(!assignment.set_journaled(x, domain.value(0).unwrap(), &mut diff));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_rollback_for_every_value() {
        let (domain, mut assignment, x) = tri();
        for start in domain.values() {
            for target in domain.values() {
                assignment.set(x, start);
                let mut diff = DiffList::new();
                assignment.set_journaled(x, target, &mut diff);
                diff.undo_all(&mut assignment);
                assert_eq!(assignment.value(x), start);
            }
        }
    }

    #[test]
    #[should_panic(expected = "does not belong to domain")]
    fn test_foreign_domain_panics() {
        let (_, mut assignment, x) = tri();
        let other = Domain::new("tri", 3);
        assignment.set(x, other.value(1).unwrap());
    }

    #[test]
    fn test_set_randomly_stays_in_domain() {
        let (_, mut assignment, x) = tri();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let mut diff = DiffList::new();
            assignment.set_randomly_journaled(x, &mut rng, &mut diff);
            assert!(assignment.value(x).index() < 3);
            assert!(diff.len() <= 1);
        }
    }

    #[test]
    fn test_named_variable() {
        let domain = Domain::new("bool", 2);
        let mut assignment = Assignment::new();
        let x = assignment.add_named_variable("x0", &domain, 1).unwrap();
        assert_eq!(assignment.variable(x).name(), Some("x0"));
        assert_eq!(assignment.indices(), vec![1]);
    }
}
