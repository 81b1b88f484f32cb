//! Canonical flat sequence with policy-driven placement.
//!
//! # Responsibility
//! - Own every item and keep the derived child caches exact after each
//!   mutation (run-local rebuilds, no full rescans on single edits).
//! - Clamp caller positions through the active [`SortPolicy`].
//! - Emit [`ListEvent`]s once the sequence is consistent again.
//!
//! # Invariants
//! - A child entry never sits at position 0.
//! - Every maximal child run immediately follows a non-child entry whose
//!   `children` cache equals the run.
//! - Under sort-by-checked, unchecked blocks strictly precede checked ones.
//!
//! The `force_*` primitives bypass the policy on purpose: undo/redo replay
//! must land items exactly where the recorded change says, not where the
//! policy would put them today.

use crate::list::events::{ListEvent, ListObserver};
use crate::list::policy::SortPolicy;
use crate::model::item::{rebuild_children, ListItem};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type for list and manager operations.
pub type ListResult<T> = Result<T, ListError>;

/// Error surface of the engine.
///
/// Both kinds signal caller mistakes; the list and the change history are
/// left untouched when one is returned.
#[derive(Debug)]
pub enum ListError {
    /// Position outside the valid range for the attempted operation.
    IndexOutOfRange { position: usize, len: usize },
    /// Structurally disallowed edit.
    InvalidOperation { reason: String },
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfRange { position, len } => {
                write!(f, "position {position} out of range for list of length {len}")
            }
            Self::InvalidOperation { reason } => write!(f, "invalid list operation: {reason}"),
        }
    }
}

impl Error for ListError {}

/// The canonical ordered sequence of checklist items.
pub struct SortedItemList {
    items: Vec<ListItem>,
    policy: SortPolicy,
    observers: Vec<ListObserver>,
}

impl SortedItemList {
    /// Creates an empty list under `policy`.
    pub fn new(policy: SortPolicy) -> Self {
        Self {
            items: Vec::new(),
            policy,
            observers: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn get(&self, position: usize) -> Option<&ListItem> {
        self.items.get(position)
    }

    /// Like [`get`](Self::get) but with the engine's error semantics.
    pub fn require(&self, position: usize) -> ListResult<&ListItem> {
        self.items.get(position).ok_or(ListError::IndexOutOfRange {
            position,
            len: self.items.len(),
        })
    }

    pub fn policy(&self) -> SortPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: SortPolicy) {
        self.policy = policy;
    }

    /// Registers a change-notification observer.
    pub fn observe(&mut self, observer: ListObserver) {
        self.observers.push(observer);
    }

    /// Returns the current sequence with positions stamped into `order`,
    /// ready for the persistence layer.
    pub fn snapshot(&self) -> Vec<ListItem> {
        let mut items = self.items.clone();
        for (position, item) in items.iter_mut().enumerate() {
            item.order = Some(position as i64);
        }
        rebuild_children(&mut items);
        items
    }

    /// Start of the block containing `position` (the nearest non-child at
    /// or before it).
    pub fn block_start(&self, position: usize) -> usize {
        let mut start = position;
        while start > 0 && self.items[start].is_child {
            start -= 1;
        }
        start
    }

    /// Flat size of the block starting at `start`.
    pub fn block_len(&self, start: usize) -> usize {
        let mut len = 1;
        while start + len < self.items.len() && self.items[start + len].is_child {
            len += 1;
        }
        len
    }

    /// First index belonging to a checked block; `len` when none exists.
    pub fn partition_boundary(&self) -> usize {
        self.partition_boundary_excluding(0, 0)
    }

    /// Partition boundary of the sequence as it would be with the range
    /// `[from, from + count)` removed, expressed as a post-removal index.
    pub(crate) fn partition_boundary_excluding(&self, from: usize, count: usize) -> usize {
        let mut boundary = 0;
        let mut in_checked_block = false;
        for (index, item) in self.items.iter().enumerate() {
            if index >= from && index < from + count {
                continue;
            }
            if !item.is_child {
                in_checked_block = item.checked;
            }
            if in_checked_block {
                return boundary;
            }
            boundary += 1;
        }
        boundary
    }

    /// Inserts an item block, letting the policy adjust the position.
    ///
    /// Returns the applied position of the block head, which may differ from
    /// the requested one under sort-by-checked.
    pub(crate) fn insert(&mut self, position: usize, item: ListItem) -> ListResult<usize> {
        let len = self.items.len();
        if position > len {
            return Err(ListError::IndexOutOfRange { position, len });
        }
        if item.is_child && position == 0 {
            return Err(ListError::InvalidOperation {
                reason: "a child item cannot sit at the list head".to_string(),
            });
        }
        let mut target = position;
        if self.policy == SortPolicy::SortByChecked && !item.is_child {
            let boundary = self.partition_boundary();
            target = if item.checked {
                target.max(boundary)
            } else {
                target.min(boundary)
            };
        }
        let flat = item.into_flat();
        self.force_insert_flat(target, flat);
        Ok(target)
    }

    /// Moves the `count`-entry block starting at `from` so its head lands at
    /// `min(to, len - count)`, clamped further by the policy.
    ///
    /// Returns the applied head position, or `None` when the move is a no-op
    /// or vetoed: identical positions, out-of-bounds indices, a move that
    /// would strand a child at the list head, or a destination the policy
    /// rejects with no legal alternative.
    pub(crate) fn move_block(&mut self, from: usize, count: usize, to: usize) -> Option<usize> {
        let len = self.items.len();
        if count == 0 || from >= len || to >= len || from + count > len || from == to {
            return None;
        }
        // the head block may only leave position 0 as a whole
        if from == 0 && count < self.block_len(0) {
            return None;
        }
        let mut target = to.min(len - count);
        if self.items[from].is_child && target == 0 {
            target = 1;
        }
        if self.policy == SortPolicy::SortByChecked && !self.items[from].is_child {
            let boundary = self.partition_boundary_excluding(from, count);
            target = if self.items[from].checked {
                target.max(boundary)
            } else {
                target.min(boundary)
            };
            target = target.min(len - count);
        }
        if target == from {
            return None;
        }
        self.force_move_range(from, count, target);
        Some(target)
    }

    /// Splices pre-flattened entries in at exactly `position`.
    pub(crate) fn force_insert_flat(&mut self, position: usize, flat: Vec<ListItem>) {
        let count = flat.len();
        if count == 0 {
            return;
        }
        self.items.splice(position..position, flat);
        self.sync_range(position.saturating_sub(1), position + count);
        self.emit(ListEvent::Inserted { position, count });
    }

    /// Removes `count` entries starting at `position` and returns them.
    ///
    /// Callers must not leave a child run at the list head; every public
    /// operation removes whole blocks or re-attachable runs only.
    pub(crate) fn force_remove_range(&mut self, position: usize, count: usize) -> Vec<ListItem> {
        let removed: Vec<ListItem> = self
            .items
            .splice(position..position + count, std::iter::empty())
            .collect();
        self.sync_range(position.saturating_sub(1), position);
        self.emit(ListEvent::Removed { position, count });
        removed
    }

    /// Relocates a contiguous range; `to` is the head position after the
    /// move completes.
    pub(crate) fn force_move_range(&mut self, from: usize, count: usize, to: usize) {
        if from == to || count == 0 {
            return;
        }
        let block: Vec<ListItem> = self
            .items
            .splice(from..from + count, std::iter::empty())
            .collect();
        self.items.splice(to..to, block);
        let low = from.min(to).saturating_sub(1);
        let high = from.max(to) + count;
        self.sync_range(low, high);
        self.emit(ListEvent::Moved { from, to, count });
    }

    pub(crate) fn set_body(&mut self, position: usize, body: String) {
        self.items[position].body = body;
        self.sync_range(position, position);
        self.emit(ListEvent::Changed { position, count: 1 });
    }

    /// Applies one checked value to `count` entries starting at `position`.
    pub(crate) fn set_checked_range(&mut self, position: usize, count: usize, checked: bool) {
        for item in self.items.iter_mut().skip(position).take(count) {
            item.checked = checked;
        }
        self.sync_range(position, position + count - 1);
        self.emit(ListEvent::Changed { position, count });
    }

    /// Restores individually recorded checked flags (undo path).
    pub(crate) fn restore_checked(&mut self, position: usize, flags: &[bool]) {
        for (offset, &flag) in flags.iter().enumerate() {
            self.items[position + offset].checked = flag;
        }
        self.sync_range(position, position + flags.len().saturating_sub(1));
        self.emit(ListEvent::Changed {
            position,
            count: flags.len(),
        });
    }

    pub(crate) fn set_is_child(&mut self, position: usize, is_child: bool) {
        self.items[position].is_child = is_child;
        if is_child {
            self.items[position].children.clear();
        }
        self.sync_range(position.saturating_sub(1), position);
        self.emit(ListEvent::Changed { position, count: 1 });
    }

    /// Replaces the entire sequence (bulk edits, initial load, snapshot
    /// undo). Child caches are rebuilt in full here — the only place a
    /// whole-list pass is acceptable.
    pub(crate) fn replace_all(&mut self, mut items: Vec<ListItem>) {
        let old_len = self.items.len();
        rebuild_children(&mut items);
        let new_len = items.len();
        self.items = items;
        self.emit(ListEvent::Removed {
            position: 0,
            count: old_len,
        });
        self.emit(ListEvent::Inserted {
            position: 0,
            count: new_len,
        });
    }

    fn emit(&mut self, event: ListEvent) {
        for observer in &mut self.observers {
            observer(event);
        }
    }

    /// Rebuilds child caches for every block overlapping `[low, high]`.
    ///
    /// Cost is proportional to the touched runs, not the list length.
    fn sync_range(&mut self, low: usize, high: usize) {
        if self.items.is_empty() {
            return;
        }
        let low = low.min(self.items.len() - 1);
        let mut index = self.block_start(low);
        while index < self.items.len() {
            if self.items[index].is_child {
                // transient orphan (only reachable mid-replacement); keep
                // its cache empty and move on
                self.items[index].children.clear();
                index += 1;
                continue;
            }
            let block_len = self.block_len(index);
            let run: Vec<ListItem> = self.items[index + 1..index + block_len]
                .iter()
                .map(|child| {
                    let mut child = child.clone();
                    child.children.clear();
                    child
                })
                .collect();
            self.items[index].children = run;
            for child in self.items.iter_mut().take(index + block_len).skip(index + 1) {
                child.children.clear();
            }
            index += block_len;
            if index > high {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ListError, SortedItemList};
    use crate::list::policy::SortPolicy;
    use crate::model::item::ListItem;

    fn seeded(policy: SortPolicy) -> SortedItemList {
        let mut list = SortedItemList::new(policy);
        for body in ["a", "b", "c"] {
            list.insert(list.len(), ListItem::new(body)).unwrap();
        }
        list
    }

    #[test]
    fn insert_past_end_is_rejected() {
        let mut list = seeded(SortPolicy::NoSort);
        let err = list.insert(7, ListItem::new("x")).unwrap_err();
        assert!(matches!(err, ListError::IndexOutOfRange { position: 7, len: 3 }));
    }

    #[test]
    fn insert_child_at_head_is_rejected() {
        let mut list = SortedItemList::new(SortPolicy::NoSort);
        let err = list.insert(0, ListItem::child("stray")).unwrap_err();
        assert!(matches!(err, ListError::InvalidOperation { .. }));
    }

    #[test]
    fn checked_insert_sinks_below_boundary() {
        let mut list = seeded(SortPolicy::SortByChecked);
        let mut done = ListItem::new("done");
        done.checked = true;
        let applied = list.insert(0, done).unwrap();
        assert_eq!(applied, 3);
        assert_eq!(list.items()[3].body, "done");
    }

    #[test]
    fn move_block_keeps_partition() {
        let mut list = seeded(SortPolicy::SortByChecked);
        let mut done = ListItem::new("done");
        done.checked = true;
        list.insert(3, done).unwrap();
        // unchecked "a" cannot cross below the boundary
        let applied = list.move_block(0, 1, 3).unwrap();
        assert_eq!(applied, 2);
        let bodies: Vec<&str> = list.items().iter().map(|it| it.body.as_str()).collect();
        assert_eq!(bodies, ["b", "c", "a", "done"]);
    }

    #[test]
    fn move_block_refuses_to_strand_head_children() {
        let mut list = SortedItemList::new(SortPolicy::NoSort);
        list.insert(0, ListItem::with_children("p", vec![ListItem::child("c")]))
            .unwrap();
        list.insert(2, ListItem::new("q")).unwrap();
        assert_eq!(list.move_block(0, 1, 2), None);
        assert_eq!(list.move_block(0, 2, 2), Some(1));
    }

    #[test]
    fn child_caches_follow_mutations() {
        let mut list = SortedItemList::new(SortPolicy::NoSort);
        list.insert(0, ListItem::with_children("p", vec![ListItem::child("c1")]))
            .unwrap();
        list.insert(2, ListItem::new("q")).unwrap();
        // inserting a parent between p and its child re-homes the run
        list.insert(1, ListItem::new("r")).unwrap();
        assert!(list.items()[0].children.is_empty());
        assert_eq!(list.items()[1].body, "r");
        assert_eq!(list.items()[1].children.len(), 1);
        assert_eq!(list.items()[1].children[0].body, "c1");
    }
}
