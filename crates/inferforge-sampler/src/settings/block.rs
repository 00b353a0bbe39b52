//! Bounded joint enumeration over a block of variables.

use inferforge_core::{
    Assignment, DiffList, SettingCount, UnsupportedEnumerationError, Value, VariableId,
};

use super::SettingIterator;

/// Enumerates the cross product of several variables' domains.
///
/// Settings come in mixed-radix order with the last variable varying
/// fastest. Construction refuses blocks whose cross product exceeds the
/// given limit; larger blocks have to be explored with a move generator.
///
/// # Example
///
/// ```
/// use inferforge_core::{Assignment, Domain};
/// use inferforge_sampler::{BlockSettings, SettingIterator};
///
/// let domain = Domain::new("bool", 2);
/// let mut assignment = Assignment::new();
/// let a = assignment.add_variable(&domain, 0).unwrap();
/// let b = assignment.add_variable(&domain, 0).unwrap();
///
/// let settings = BlockSettings::new(vec![a, b], &assignment, 1024).unwrap();
/// assert_eq!(settings.setting_count(), Some(4));
///
/// assert!(BlockSettings::new(vec![a, b], &assignment, 3).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct BlockSettings {
    variables: Vec<VariableId>,
    values: Vec<Vec<Value>>,
    digits: Vec<usize>,
    emitted: usize,
    total: usize,
}

impl BlockSettings {
    /// Creates the enumeration for `variables`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedEnumerationError`] when the product of the domain
    /// sizes is larger than `limit` or does not fit in a `usize`.
    pub fn new(
        variables: Vec<VariableId>,
        assignment: &Assignment,
        limit: usize,
    ) -> Result<Self, UnsupportedEnumerationError> {
        let total = variables
            .iter()
            .try_fold(1usize, |acc, &id| acc.checked_mul(assignment.domain(id).size()));
        let total = match total {
            Some(n) if n <= limit => n,
            Some(n) => {
                return Err(UnsupportedEnumerationError {
                    settings: SettingCount::Exact(n),
                    limit,
                })
            }
            None => {
                return Err(UnsupportedEnumerationError {
                    settings: SettingCount::Overflow,
                    limit,
                })
            }
        };
        let values = variables
            .iter()
            .map(|&id| assignment.domain(id).values().collect())
            .collect();

        Ok(Self {
            digits: vec![0; variables.len()],
            variables,
            values,
            emitted: 0,
            total,
        })
    }

    pub fn variables(&self) -> &[VariableId] {
        &self.variables
    }

    fn advance(&mut self) {
        for position in (0..self.digits.len()).rev() {
            self.digits[position] += 1;
            if self.digits[position] < self.values[position].len() {
                return;
            }
            self.digits[position] = 0;
        }
    }
}

impl SettingIterator for BlockSettings {
    fn has_next(&self) -> bool {
        self.emitted < self.total
    }

    fn next_into(&mut self, assignment: &mut Assignment, diff: &mut DiffList) {
        if !self.has_next() {
            return;
        }
        for (position, &variable) in self.variables.iter().enumerate() {
            let value = self.values[position][self.digits[position]];
            assignment.set_journaled(variable, value, diff);
        }
        self.emitted += 1;
        self.advance();
    }

    fn reset(&mut self) {
        self.emitted = 0;
        self.digits.iter_mut().for_each(|d| *d = 0);
    }

    fn setting_count(&self) -> Option<usize> {
        Some(self.total)
    }
}
