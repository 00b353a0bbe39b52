//! Explicit move lists supplied by a move generator.

use inferforge_core::{Assignment, DiffList, Value, VariableId};
use smallvec::SmallVec;

use super::SettingIterator;

/// A joint write applied as one candidate.
type Move = SmallVec<[(VariableId, Value); 4]>;

/// Enumerates a restricted set of moves, each applied as one candidate.
///
/// Move generators use this for blocks whose full cross product is too
/// large to enumerate.
#[derive(Debug, Clone, Default)]
pub struct MoveSettings {
    moves: Vec<Move>,
    position: usize,
}

impl MoveSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the iterator over `moves`.
    pub fn from_moves<I, M>(moves: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: IntoIterator<Item = (VariableId, Value)>,
    {
        Self {
            moves: moves.into_iter().map(|m| m.into_iter().collect()).collect(),
            position: 0,
        }
    }

    /// Appends a move to the end of the enumeration.
    pub fn push_move<M: IntoIterator<Item = (VariableId, Value)>>(&mut self, writes: M) {
        self.moves.push(writes.into_iter().collect());
    }

    pub fn with_move<M: IntoIterator<Item = (VariableId, Value)>>(mut self, writes: M) -> Self {
        self.push_move(writes);
        self
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl SettingIterator for MoveSettings {
    fn has_next(&self) -> bool {
        self.position < self.moves.len()
    }

    fn next_into(&mut self, assignment: &mut Assignment, diff: &mut DiffList) {
        let Some(writes) = self.moves.get(self.position) else {
            return;
        };
        self.position += 1;
        for &(variable, value) in writes {
            assignment.set_journaled(variable, value, diff);
        }
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn setting_count(&self) -> Option<usize> {
        Some(self.moves.len())
    }
}
