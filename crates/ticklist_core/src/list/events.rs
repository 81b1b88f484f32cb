//! Change-notification events consumed by the view layer.
//!
//! Events describe completed mutations as index ranges so rendered rows can
//! be updated incrementally instead of rebinding the whole list.

/// One fine-grained list mutation, emitted after the list is consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// `count` entries were inserted starting at `position`.
    Inserted { position: usize, count: usize },
    /// `count` entries were removed starting at `position`.
    Removed { position: usize, count: usize },
    /// A contiguous range of `count` entries moved from `from` to `to`.
    ///
    /// Both indices are block-start positions; `to` is valid in the list as
    /// it exists after the move.
    Moved { from: usize, to: usize, count: usize },
    /// `count` entries starting at `position` changed in place.
    Changed { position: usize, count: usize },
}

/// Observer callback registered on the list.
pub type ListObserver = Box<dyn FnMut(ListEvent)>;
