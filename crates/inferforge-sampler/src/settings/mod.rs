//! Setting iterators.
//!
//! A setting iterator enumerates the candidate transitions for one
//! proposal context. Each call to [`SettingIterator::next_setting`] writes
//! one candidate into the assignment through the journaled mutator and
//! returns the resulting [`DiffList`]; the caller scores the candidate and
//! undoes it before asking for the next one.

mod block;
mod moves;
mod variable;

use std::fmt::Debug;

use inferforge_core::{Assignment, DiffList};

pub use block::BlockSettings;
pub use moves::MoveSettings;
pub use variable::VariableSettings;

/// Enumerates candidate transitions for a single proposal context.
pub trait SettingIterator: Send + Debug {
    /// Returns true if another candidate is available in this pass.
    fn has_next(&self) -> bool;

    /// Applies the next candidate, journaling every write into `diff`.
    ///
    /// Does nothing once the pass is exhausted.
    fn next_into(&mut self, assignment: &mut Assignment, diff: &mut DiffList);

    /// Restarts the enumeration from the first candidate.
    fn reset(&mut self);

    /// Number of candidates per pass, when known up front.
    fn setting_count(&self) -> Option<usize> {
        None
    }

    /// Applies the next candidate and returns its journal.
    fn next_setting(&mut self, assignment: &mut Assignment) -> DiffList {
        let mut diff = DiffList::new();
        self.next_into(assignment, &mut diff);
        diff
    }
}
