//! Bounded undo/redo history over whole-trip snapshots
//!
//! Every entry is an independent deep copy of the trip (`Trip: Clone`
//! clones the full owned structure), so replaying a snapshot can never
//! alias the live document. Only direct user edits are recorded here;
//! conversation-driven replacements are forward-only and bypass history.

use tracing::debug;

use crate::domain::Trip;

/// Maximum retained undo entries; the oldest is dropped beyond this
const MAX_HISTORY: usize = 20;

/// Undo/redo stacks of pre-mutation trip snapshots
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Trip>,
    redo_stack: Vec<Trip>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pre-mutation state of a user edit.
    ///
    /// Discards any redo branch: once a new edit lands after an undo, the
    /// abandoned future is unreachable.
    pub fn push(&mut self, pre_mutation: &Trip) {
        self.redo_stack.clear();
        self.undo_stack.push(pre_mutation.clone());
        if self.undo_stack.len() > MAX_HISTORY {
            self.undo_stack.remove(0);
        }
        debug!(depth = self.undo_stack.len(), "history: snapshot pushed");
    }

    /// Step back: returns the snapshot to restore, parking `current` for redo
    pub fn undo(&mut self, current: &Trip) -> Option<Trip> {
        let restored = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history: undo"
        );
        Some(restored)
    }

    /// Step forward again after an undo
    pub fn redo(&mut self, current: &Trip) -> Option<Trip> {
        let restored = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "history: redo"
        );
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of retained undo entries
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}
