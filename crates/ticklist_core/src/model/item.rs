//! Checklist item domain model.
//!
//! # Responsibility
//! - Define the atomic checklist entity and its block helpers.
//! - Provide the child-cache rebuild pass shared by list mutations and
//!   snapshotting.
//!
//! # Invariants
//! - `children` is a derived cache: the flat sequence is the source of
//!   truth, and a parent's cache always equals the run of child-flagged
//!   entries immediately following it.
//! - An item with `is_child == true` keeps an empty `children` cache.
//! - `order` is a placement hint consumed on initial load and by bulk
//!   re-partitioning; live edits never consult it for single-item placement.

use serde::{Deserialize, Serialize};

/// One checklist entry.
///
/// A non-child item together with the contiguous run of child items behind
/// it forms a *block*; blocks are the unit of relocation for the
/// sort-by-checked policy, drag gestures and whole-block deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Plain text body.
    pub body: String,
    /// Checked-off state.
    pub checked: bool,
    /// Whether this entry belongs to the preceding non-child item.
    pub is_child: bool,
    /// Persisted placement hint; `None` for items never saved.
    pub order: Option<i64>,
    /// Derived cache of the child entries owned by this item.
    #[serde(default)]
    pub children: Vec<ListItem>,
}

impl ListItem {
    /// Creates an unchecked non-child item.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            checked: false,
            is_child: false,
            order: None,
            children: Vec::new(),
        }
    }

    /// Creates an unchecked child item.
    pub fn child(body: impl Into<String>) -> Self {
        Self {
            is_child: true,
            ..Self::new(body)
        }
    }

    /// Creates a non-child item that already owns child entries.
    ///
    /// Child flags on the provided entries are forced; nested caches are
    /// cleared so the block flattens cleanly.
    pub fn with_children(body: impl Into<String>, children: Vec<ListItem>) -> Self {
        let children = children
            .into_iter()
            .map(|mut child| {
                child.is_child = true;
                child.children.clear();
                child
            })
            .collect();
        Self {
            children,
            ..Self::new(body)
        }
    }

    /// Number of flat entries this item occupies: itself plus its children.
    pub fn item_count(&self) -> usize {
        if self.is_child {
            1
        } else {
            1 + self.children.len()
        }
    }

    /// Flattens this item into the entries it contributes to the sequence.
    ///
    /// The parent keeps its cache (the list rebuilds it after insertion);
    /// children are emitted as flat child entries with empty caches.
    pub(crate) fn into_flat(mut self) -> Vec<ListItem> {
        if self.is_child {
            self.children.clear();
            return vec![self];
        }
        let children = std::mem::take(&mut self.children);
        let mut flat = Vec::with_capacity(1 + children.len());
        flat.push(self);
        for mut child in children {
            child.is_child = true;
            child.children.clear();
            flat.push(child);
        }
        flat
    }
}

/// Rebuilds every child cache in `items` from the flat flags.
///
/// Full-sequence pass used by bulk replacement and snapshotting; incremental
/// maintenance inside the list uses run-local rebuilds instead.
pub(crate) fn rebuild_children(items: &mut [ListItem]) {
    let len = items.len();
    let mut i = 0;
    while i < len {
        if items[i].is_child {
            items[i].children.clear();
            i += 1;
            continue;
        }
        let mut run_end = i + 1;
        while run_end < len && items[run_end].is_child {
            run_end += 1;
        }
        let run: Vec<ListItem> = items[i + 1..run_end]
            .iter()
            .map(|child| {
                let mut child = child.clone();
                child.children.clear();
                child
            })
            .collect();
        items[i].children = run;
        for child in items.iter_mut().take(run_end).skip(i + 1) {
            child.children.clear();
        }
        i = run_end;
    }
}
