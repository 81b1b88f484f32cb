//! Ordering policies for item placement.
//!
//! # Responsibility
//! - Name the two placement strategies selectable from preferences.
//! - Provide the block arithmetic shared by initial-load arrangement and
//!   bulk re-partitioning.
//!
//! # Invariants
//! - Arrangement operates on whole blocks; a parent and its children are
//!   never separated.
//! - Under [`SortPolicy::SortByChecked`] every unchecked block precedes
//!   every checked block; the segment of a block is governed by its parent's
//!   flag only.

use crate::model::item::ListItem;
use serde::{Deserialize, Serialize};

/// Placement strategy applied by the list on inserts and state changes.
///
/// Selected by an external preference; may differ between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortPolicy {
    /// Placement is exactly the caller-specified position.
    #[default]
    NoSort,
    /// Unchecked blocks first, checked blocks last.
    SortByChecked,
}

/// Sort key for a block's persisted placement hint.
///
/// Missing hints sort last and keep their relative order (stable sorts
/// only).
pub(crate) fn order_key(item: &ListItem) -> i64 {
    item.order.unwrap_or(i64::MAX)
}

/// Splits a flat sequence into blocks: each block starts with a non-child
/// item followed by its child run.
///
/// A leading child (invalid input, e.g. from a corrupted save) is promoted
/// to non-child so the first block always has a parent.
pub(crate) fn split_blocks(mut items: Vec<ListItem>) -> Vec<Vec<ListItem>> {
    if let Some(first) = items.first_mut() {
        if first.is_child {
            first.is_child = false;
        }
    }
    let mut blocks: Vec<Vec<ListItem>> = Vec::new();
    for item in items {
        if item.is_child {
            // first block is guaranteed to exist after head promotion
            blocks
                .last_mut()
                .expect("child runs always follow a block head")
                .push(item);
        } else {
            blocks.push(vec![item]);
        }
    }
    blocks
}

/// Arranges a flat sequence for initial load under `policy`.
///
/// Blocks are stable-sorted by their persisted `order` hint; under
/// sort-by-checked the unchecked segment additionally precedes the checked
/// one.
pub(crate) fn arrange(items: Vec<ListItem>, policy: SortPolicy) -> Vec<ListItem> {
    let mut blocks = split_blocks(items);
    match policy {
        SortPolicy::NoSort => blocks.sort_by_key(|block| order_key(&block[0])),
        SortPolicy::SortByChecked => {
            blocks.sort_by_key(|block| (block[0].checked, order_key(&block[0])));
        }
    }
    blocks.into_iter().flatten().collect()
}

/// Re-partitions a live sequence after a policy swap.
///
/// Keeps the relative order the user currently sees; only the
/// checked/unchecked partition is enforced. No-sort needs no re-layout.
pub(crate) fn repartition(items: Vec<ListItem>, policy: SortPolicy) -> Vec<ListItem> {
    match policy {
        SortPolicy::NoSort => items,
        SortPolicy::SortByChecked => {
            let mut blocks = split_blocks(items);
            blocks.sort_by_key(|block| block[0].checked);
            blocks.into_iter().flatten().collect()
        }
    }
}
