//! Checklist editing facade.
//!
//! # Responsibility
//! - Act as the sole mutation entry point for user-facing edits.
//! - Compose the canonical list, the active policy and the change history:
//!   one call, one user intent, one pushed change.
//! - Coalesce drag gestures into a single undoable change.
//!
//! # Invariants
//! - Failed operations leave both the list and the history untouched.
//! - Positions are resolved once against the entry state of each call; all
//!   sub-steps work from that snapshot.
//! - Tentative drag moves never touch the history; `finish_move` commits at
//!   most one change per gesture and `abort_move` leaves no residue.

use crate::history::change::ListChange;
use crate::history::ChangeHistory;
use crate::list::events::ListEvent;
use crate::list::policy::{self, SortPolicy};
use crate::list::sorted_list::{ListError, ListResult, SortedItemList};
use crate::model::item::ListItem;
use log::{debug, info};

/// State latched on the first tentative move of a drag gesture.
///
/// The block size is pinned at drag start so mid-gesture regrouping (a row
/// sliding through a foreign child run) can never grow the moving unit.
struct DragState {
    origin: usize,
    current: usize,
    count: usize,
    item: ListItem,
}

/// Orchestrates every user-facing edit of one checklist document.
pub struct ListManager {
    list: SortedItemList,
    history: ChangeHistory,
    drag: Option<DragState>,
}

impl ListManager {
    /// Creates a manager for an empty list under `policy`.
    pub fn new(policy: SortPolicy) -> Self {
        Self {
            list: SortedItemList::new(policy),
            history: ChangeHistory::new(),
            drag: None,
        }
    }

    /// Loads a persisted sequence: arranges it by order hints under the
    /// active policy and clears the history (loading is not undoable).
    ///
    /// Accepts either an already-flat sequence (child-flagged entries
    /// present, caches treated as stale) or nested subtrees (no child
    /// entries; parents carry their children), which are flattened first.
    pub fn init_list(&mut self, items: Vec<ListItem>) {
        let flat: Vec<ListItem> = if items.iter().any(|item| item.is_child) {
            items
        } else {
            items.into_iter().flat_map(ListItem::into_flat).collect()
        };
        let arranged = policy::arrange(flat, self.list.policy());
        info!(
            "event=list_init module=service status=ok policy={:?} count={}",
            self.list.policy(),
            arranged.len()
        );
        self.list.replace_all(arranged);
        self.history.reset();
        self.drag = None;
    }

    /// Swaps the placement policy and re-partitions the live sequence,
    /// keeping the arrangement the user currently sees within each segment.
    ///
    /// Recorded positions are meaningless under the new arrangement, so the
    /// history is cleared.
    pub fn set_policy(&mut self, policy: SortPolicy) {
        if policy == self.list.policy() {
            return;
        }
        info!(
            "event=list_policy_swap module=service status=ok from={:?} to={:?}",
            self.list.policy(),
            policy
        );
        self.list.set_policy(policy);
        let repartitioned = policy::repartition(self.list.items().to_vec(), policy);
        self.list.replace_all(repartitioned);
        self.history.reset();
    }

    pub fn policy(&self) -> SortPolicy {
        self.list.policy()
    }

    /// Registers a change-notification observer on the underlying list.
    pub fn on_event(&mut self, observer: impl FnMut(ListEvent) + 'static) {
        self.list.observe(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn items(&self) -> &[ListItem] {
        self.list.items()
    }

    pub fn get_item(&self, position: usize) -> ListResult<&ListItem> {
        self.list.require(position)
    }

    /// Current sequence with positions stamped into `order`, for the
    /// persistence layer.
    pub fn snapshot(&self) -> Vec<ListItem> {
        self.list.snapshot()
    }

    /// Inserts an item (default: empty unchecked text at the list end).
    ///
    /// An item carrying children is inserted as one atomic subtree. Returns
    /// the applied head position, which may differ from the requested one
    /// under sort-by-checked.
    pub fn add(
        &mut self,
        position: Option<usize>,
        item: Option<ListItem>,
        push_change: bool,
    ) -> ListResult<usize> {
        let position = position.unwrap_or_else(|| self.list.len());
        let item = item.unwrap_or_else(|| ListItem::new(""));
        let applied = self.list.insert(position, item.clone())?;
        debug!(
            "event=list_add module=service status=ok position={applied} count={}",
            item.item_count()
        );
        if push_change {
            self.history.push(ListChange::Add {
                position: applied,
                block: item,
            });
        }
        Ok(applied)
    }

    /// Deletes the item at `position`.
    ///
    /// A non-child that owns children is removed together with them as one
    /// atomic change, but only when `allow_delete_children` permits it.
    /// Returns the removed block (parent carrying its children).
    pub fn delete(
        &mut self,
        position: usize,
        allow_delete_children: bool,
        push_change: bool,
    ) -> ListResult<ListItem> {
        let child_count = {
            let item = self.list.require(position)?;
            if item.is_child {
                0
            } else {
                item.children.len()
            }
        };
        if child_count > 0 && !allow_delete_children {
            return Err(ListError::InvalidOperation {
                reason: format!("item at position {position} still owns {child_count} child items"),
            });
        }
        let mut removed = self.list.force_remove_range(position, 1 + child_count);
        let block = removed.swap_remove(0);
        debug!(
            "event=list_delete module=service status=ok position={position} count={}",
            1 + child_count
        );
        if push_change {
            self.history.push(ListChange::Delete {
                position,
                block: block.clone(),
            });
        }
        Ok(block)
    }

    /// Replaces the body text at `position`.
    pub fn change_text(
        &mut self,
        position: usize,
        body: impl Into<String>,
        push_change: bool,
    ) -> ListResult<()> {
        let before = self.list.require(position)?.body.clone();
        let after: String = body.into();
        if before == after {
            return Ok(());
        }
        self.list.set_body(position, after.clone());
        if push_change {
            self.history.push(ListChange::Edit {
                position,
                before,
                after,
            });
        }
        Ok(())
    }

    /// Toggles the checked state at `position`.
    ///
    /// Toggling a non-child applies the flag to its whole block and, under
    /// sort-by-checked, relocates the block to the partition boundary.
    /// Toggling a child changes only that one flag. Returns the applied
    /// head position.
    pub fn change_checked(
        &mut self,
        position: usize,
        checked: bool,
        push_change: bool,
    ) -> ListResult<usize> {
        let (is_child, was_checked, child_count) = {
            let item = self.list.require(position)?;
            (item.is_child, item.checked, item.children.len())
        };
        if was_checked == checked {
            return Ok(position);
        }
        let count = if is_child { 1 } else { 1 + child_count };
        let before: Vec<bool> = self.list.items()[position..position + count]
            .iter()
            .map(|item| item.checked)
            .collect();
        self.list.set_checked_range(position, count, checked);
        let mut to = position;
        if !is_child && self.list.policy() == SortPolicy::SortByChecked {
            let target = self.list.partition_boundary_excluding(position, count);
            if target != position {
                self.list.force_move_range(position, count, target);
            }
            to = target;
        }
        debug!(
            "event=list_change_checked module=service status=ok from={position} to={to} checked={checked}"
        );
        if push_change {
            self.history.push(ListChange::Checked {
                from: position,
                to,
                before,
                checked,
            });
        }
        Ok(to)
    }

    /// Applies one checked state to every item as a single undoable change.
    ///
    /// Under sort-by-checked the whole sequence is re-arranged by the
    /// persisted order hints in the same step (a full re-partition, not N
    /// single toggles).
    pub fn change_checked_for_all(&mut self, checked: bool) {
        let before = self.list.items().to_vec();
        if before.iter().all(|item| item.checked == checked) {
            return;
        }
        let mut after: Vec<ListItem> = before
            .iter()
            .cloned()
            .map(|mut item| {
                item.checked = checked;
                item
            })
            .collect();
        if self.list.policy() == SortPolicy::SortByChecked {
            after = policy::arrange(after, SortPolicy::SortByChecked);
        }
        self.list.replace_all(after.clone());
        debug!(
            "event=list_check_all module=service status=ok checked={checked} count={}",
            after.len()
        );
        self.history.push(ListChange::CheckedForAll { before, after });
    }

    /// Promotes or demotes the item at `position`.
    ///
    /// Demoting merges the item (and, by adjacency, its former children)
    /// into the preceding block. Promoting makes the following ex-siblings
    /// its children; under sort-by-checked a promoted block landing in the
    /// wrong segment is relocated within the same change. Returns the
    /// applied head position.
    pub fn change_is_child(
        &mut self,
        position: usize,
        is_child: bool,
        push_change: bool,
    ) -> ListResult<usize> {
        let current = self.list.require(position)?.is_child;
        if current == is_child {
            return Ok(position);
        }
        if is_child && position == 0 {
            return Err(ListError::InvalidOperation {
                reason: "the list head cannot become a child".to_string(),
            });
        }
        self.list.set_is_child(position, is_child);
        let (count, moved_to) = if is_child {
            (1, None)
        } else {
            let count = self.list.block_len(position);
            (count, self.ensure_block_segment(position, count))
        };
        debug!(
            "event=list_change_is_child module=service status=ok position={position} is_child={is_child}"
        );
        if push_change {
            self.history.push(ListChange::IsChild {
                position,
                count,
                moved_to,
                is_child,
            });
        }
        Ok(moved_to.unwrap_or(position))
    }

    /// Removes every checked block and every checked child of a kept
    /// parent as one atomic change. Returns the number of removed entries.
    pub fn delete_checked_items(&mut self) -> usize {
        let before = self.list.items().to_vec();
        let mut after: Vec<ListItem> = Vec::new();
        let mut removed = 0usize;
        let mut index = 0;
        while index < before.len() {
            let parent = &before[index];
            let block_len = 1 + parent.children.len();
            if parent.checked {
                removed += block_len;
            } else {
                after.push(parent.clone());
                for child in &before[index + 1..index + block_len] {
                    if child.checked {
                        removed += 1;
                    } else {
                        after.push(child.clone());
                    }
                }
            }
            index += block_len;
        }
        if removed == 0 {
            return 0;
        }
        self.list.replace_all(after.clone());
        info!("event=list_delete_checked module=service status=ok removed={removed}");
        self.history.push(ListChange::DeleteChecked { before, after });
        removed
    }

    /// Relocates one item or block.
    ///
    /// Returns `None` (and mutates nothing) for identical positions, bounds
    /// problems, or a policy veto — the drag driver contract. With
    /// `is_drag` the move is tentative: it updates the live list for visual
    /// feedback and pushes nothing until [`finish_move`](Self::finish_move).
    /// `update_children` lets a non-drag move carry the item's children;
    /// `update_is_child` relabels a lone row by where it lands.
    pub fn move_item(
        &mut self,
        from: usize,
        to: usize,
        update_is_child: bool,
        update_children: bool,
        is_drag: bool,
    ) -> Option<usize> {
        let len = self.list.len();
        if from >= len || to >= len || from == to {
            return None;
        }
        if is_drag {
            return self.tentative_move(from, to);
        }
        let (was_child, child_count) = {
            let item = &self.list.items()[from];
            (item.is_child, item.children.len())
        };
        let count = if update_children && !was_child {
            1 + child_count
        } else {
            1
        };
        let applied = self.list.move_block(from, count, to)?;
        let (is_child_after, fixed_to) = if update_is_child && count == 1 && child_count == 0 {
            self.relabel_after_move(applied, was_child)
        } else {
            (was_child, None)
        };
        debug!(
            "event=list_move module=service status=ok from={from} to={} count={count}",
            fixed_to.unwrap_or(applied)
        );
        self.history.push(ListChange::Move {
            from,
            to: applied,
            count,
            was_child,
            is_child_after,
            fixed_to,
        });
        Some(fixed_to.unwrap_or(applied))
    }

    /// Commits an active drag gesture as one undoable change.
    ///
    /// Must be called exactly once when the gesture ends; returns the final
    /// head position, or `None` when no net movement happened (nothing is
    /// pushed in that case).
    pub fn finish_move(&mut self, update_is_child: bool, push_change: bool) -> Option<usize> {
        let drag = self.drag.take()?;
        if drag.current == drag.origin {
            return None;
        }
        let was_child = drag.item.is_child;
        let (is_child_after, fixed_to) =
            if update_is_child && drag.count == 1 && drag.item.children.is_empty() {
                self.relabel_after_move(drag.current, was_child)
            } else {
                (was_child, None)
            };
        info!(
            "event=list_drag_commit module=service status=ok from={} to={} count={}",
            drag.origin,
            fixed_to.unwrap_or(drag.current),
            drag.count
        );
        if push_change {
            self.history.push(ListChange::Move {
                from: drag.origin,
                to: drag.current,
                count: drag.count,
                was_child,
                is_child_after,
                fixed_to,
            });
        }
        Some(fixed_to.unwrap_or(drag.current))
    }

    /// Discards an active drag gesture, restoring the pre-drag arrangement
    /// without touching the history — as if no tentative move had happened.
    pub fn abort_move(&mut self) {
        if let Some(drag) = self.drag.take() {
            if drag.current != drag.origin {
                self.list.force_move_range(drag.current, drag.count, drag.origin);
            }
            info!(
                "event=list_drag_abort module=service status=ok origin={}",
                drag.origin
            );
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Reverses the most recent change; `false` when the log is empty.
    pub fn undo(&mut self) -> bool {
        let kind = self.history.peek_undo().map(ListChange::kind);
        let done = self.history.undo(&mut self.list);
        if done {
            debug!(
                "event=list_undo module=service status=ok kind={}",
                kind.unwrap_or("none")
            );
        }
        done
    }

    /// Reapplies the most recently undone change; `false` when nothing can
    /// be redone.
    pub fn redo(&mut self) -> bool {
        let done = self.history.redo(&mut self.list);
        if done {
            debug!("event=list_redo module=service status=ok");
        }
        done
    }

    /// Clears the undo/redo log without touching list content.
    pub fn reset_history(&mut self) {
        self.history.reset();
    }

    fn tentative_move(&mut self, from: usize, to: usize) -> Option<usize> {
        if self.drag.is_none() {
            let item = self.list.items()[from].clone();
            let count = if item.is_child {
                1
            } else {
                1 + item.children.len()
            };
            self.drag = Some(DragState {
                origin: from,
                current: from,
                count,
                item,
            });
        }
        let count = self.drag.as_ref().map_or(1, |drag| drag.count);
        let applied = self.list.move_block(from, count, to);
        if let (Some(position), Some(drag)) = (applied, self.drag.as_mut()) {
            drag.current = position;
        }
        applied
    }

    /// Relabels a lone row after it landed at `position`: it becomes a
    /// child when it sits inside or directly after a child run, and a
    /// non-child when it sits between blocks. A promotion that leaves the
    /// row in the wrong partition segment is nudged to the boundary.
    fn relabel_after_move(&mut self, position: usize, was_child: bool) -> (bool, Option<usize>) {
        let items = self.list.items();
        let prev_is_child = position > 0 && items[position - 1].is_child;
        let next_is_child = position + 1 < items.len() && items[position + 1].is_child;
        let new_child = position > 0 && (prev_is_child || next_is_child);
        if new_child == was_child {
            return (was_child, None);
        }
        self.list.set_is_child(position, new_child);
        let fixed_to = if new_child {
            None
        } else {
            self.ensure_block_segment(position, 1)
        };
        (new_child, fixed_to)
    }

    /// Moves the block at `position` to the partition boundary when the
    /// active policy forbids its current segment. Returns the new head
    /// position when a relocation happened.
    fn ensure_block_segment(&mut self, position: usize, count: usize) -> Option<usize> {
        if self.list.policy() != SortPolicy::SortByChecked {
            return None;
        }
        let checked = self.list.items()[position].checked;
        let boundary = self.list.partition_boundary_excluding(position, count);
        let target = if checked {
            position.max(boundary)
        } else {
            position.min(boundary)
        };
        let target = target.min(self.list.len() - count);
        if target == position {
            return None;
        }
        self.list.force_move_range(position, count, target);
        Some(target)
    }
}
