//! Reversible change log.
//!
//! # Responsibility
//! - Record one self-contained [`change::ListChange`] per user action.
//! - Replay them in either direction against the canonical list.
//!
//! # Invariants
//! - Pushing a change discards every undone-but-not-redone entry.
//! - Replay reproduces the exact prior sequence: ordering and child
//!   attachment are part of the reversible state, not just item sets.

pub mod change;

use crate::list::sorted_list::SortedItemList;
use change::ListChange;

/// Linear two-stack undo/redo log.
///
/// Owns no domain data beyond the recorded change payloads; all replay goes
/// through the list's force primitives so the active policy cannot second-
/// guess a restored arrangement.
#[derive(Default)]
pub struct ChangeHistory {
    undo_stack: Vec<ListChange>,
    redo_stack: Vec<ListChange>,
}

impl ChangeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a change and invalidates the redo stack.
    pub fn push(&mut self, change: ListChange) {
        self.undo_stack.push(change);
        self.redo_stack.clear();
    }

    /// Reverses the most recent change. No-op returning `false` when there
    /// is nothing to undo.
    pub fn undo(&mut self, list: &mut SortedItemList) -> bool {
        let Some(change) = self.undo_stack.pop() else {
            return false;
        };
        change.revert(list);
        self.redo_stack.push(change);
        true
    }

    /// Reapplies the most recently undone change. No-op returning `false`
    /// when there is nothing to redo.
    pub fn redo(&mut self, list: &mut SortedItemList) -> bool {
        let Some(change) = self.redo_stack.pop() else {
            return false;
        };
        change.apply(list);
        self.undo_stack.push(change);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// The change `undo` would reverse next.
    pub fn peek_undo(&self) -> Option<&ListChange> {
        self.undo_stack.last()
    }

    /// Clears both stacks without touching list content (initial load,
    /// policy swap).
    pub fn reset(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
