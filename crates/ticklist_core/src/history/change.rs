//! Reversible change records.
//!
//! # Responsibility
//! - Describe every undoable user action as one tagged variant carrying
//!   exactly the positions, flags and cloned item snapshots needed to replay
//!   it in either direction.
//!
//! # Invariants
//! - A change is only ever replayed against the list state it was recorded
//!   from (or the state its own replay produces); the manager guarantees
//!   this by resetting history whenever the arrangement is rebuilt outside
//!   the log.
//! - Replay uses force primitives exclusively — the policy already had its
//!   say when the change was recorded.

use crate::list::sorted_list::SortedItemList;
use crate::model::item::ListItem;

/// One undoable user action.
#[derive(Debug, Clone)]
pub enum ListChange {
    /// A block (item plus children) was inserted with its head at
    /// `position`.
    Add { position: usize, block: ListItem },
    /// A block was removed from `position`; `block` carries the children
    /// needed to restore the exact subtree.
    Delete { position: usize, block: ListItem },
    /// The body text at `position` was replaced.
    Edit {
        position: usize,
        before: String,
        after: String,
    },
    /// A checked toggle. `before` holds the prior flag of every entry of
    /// the affected block (head first); the whole block was set to
    /// `checked` and its head moved from `from` to `to` (`from == to` when
    /// the policy kept it in place or a lone child was toggled).
    Checked {
        from: usize,
        to: usize,
        before: Vec<bool>,
        checked: bool,
    },
    /// A promote/demote. The flag at `position` became `is_child`; when a
    /// promotion left the new block in the wrong segment it was relocated
    /// to `moved_to` (`count` entries including adopted children).
    IsChild {
        position: usize,
        count: usize,
        moved_to: Option<usize>,
        is_child: bool,
    },
    /// A committed move (single intent or a whole coalesced drag gesture).
    ///
    /// `count` entries travelled from `from` to `to`; a single row may have
    /// been relabelled from `was_child` to `is_child_after` at the
    /// destination and then nudged to `fixed_to` by the partition rules.
    Move {
        from: usize,
        to: usize,
        count: usize,
        was_child: bool,
        is_child_after: bool,
        fixed_to: Option<usize>,
    },
    /// Bulk check/uncheck: full sequence snapshots on both sides.
    CheckedForAll {
        before: Vec<ListItem>,
        after: Vec<ListItem>,
    },
    /// Bulk removal of checked items: full sequence snapshots on both
    /// sides.
    DeleteChecked {
        before: Vec<ListItem>,
        after: Vec<ListItem>,
    },
}

impl ListChange {
    /// Stable tag for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Delete { .. } => "delete",
            Self::Edit { .. } => "edit",
            Self::Checked { .. } => "checked",
            Self::IsChild { .. } => "is_child",
            Self::Move { .. } => "move",
            Self::CheckedForAll { .. } => "checked_for_all",
            Self::DeleteChecked { .. } => "delete_checked",
        }
    }

    /// Reapplies the forward operation (redo path).
    pub fn apply(&self, list: &mut SortedItemList) {
        match self {
            Self::Add { position, block } => {
                list.force_insert_flat(*position, block.clone().into_flat());
            }
            Self::Delete { position, block } => {
                list.force_remove_range(*position, block.item_count());
            }
            Self::Edit {
                position, after, ..
            } => {
                list.set_body(*position, after.clone());
            }
            Self::Checked {
                from,
                to,
                before,
                checked,
            } => {
                list.set_checked_range(*from, before.len(), *checked);
                if to != from {
                    list.force_move_range(*from, before.len(), *to);
                }
            }
            Self::IsChild {
                position,
                count,
                moved_to,
                is_child,
            } => {
                list.set_is_child(*position, *is_child);
                if let Some(target) = moved_to {
                    list.force_move_range(*position, *count, *target);
                }
            }
            Self::Move {
                from,
                to,
                count,
                was_child,
                is_child_after,
                fixed_to,
            } => {
                list.force_move_range(*from, *count, *to);
                if is_child_after != was_child {
                    list.set_is_child(*to, *is_child_after);
                }
                if let Some(target) = fixed_to {
                    list.force_move_range(*to, *count, *target);
                }
            }
            Self::CheckedForAll { after, .. } | Self::DeleteChecked { after, .. } => {
                list.replace_all(after.clone());
            }
        }
    }

    /// Applies the reverse operation (undo path), restoring the exact prior
    /// ordering and child attachment.
    pub fn revert(&self, list: &mut SortedItemList) {
        match self {
            Self::Add { position, block } => {
                list.force_remove_range(*position, block.item_count());
            }
            Self::Delete { position, block } => {
                list.force_insert_flat(*position, block.clone().into_flat());
            }
            Self::Edit {
                position, before, ..
            } => {
                list.set_body(*position, before.clone());
            }
            Self::Checked {
                from, to, before, ..
            } => {
                if to != from {
                    list.force_move_range(*to, before.len(), *from);
                }
                list.restore_checked(*from, before);
            }
            Self::IsChild {
                position,
                count,
                moved_to,
                is_child,
            } => {
                if let Some(target) = moved_to {
                    list.force_move_range(*target, *count, *position);
                }
                list.set_is_child(*position, !is_child);
            }
            Self::Move {
                from,
                to,
                count,
                was_child,
                is_child_after,
                fixed_to,
            } => {
                if let Some(target) = fixed_to {
                    list.force_move_range(*target, *count, *to);
                }
                if is_child_after != was_child {
                    list.set_is_child(*to, *was_child);
                }
                list.force_move_range(*to, *count, *from);
            }
            Self::CheckedForAll { before, .. } | Self::DeleteChecked { before, .. } => {
                list.replace_all(before.clone());
            }
        }
    }
}
