//! In-memory occurrence search over item bodies.
//!
//! # Responsibility
//! - Locate every case-insensitive occurrence of a query across the
//!   current sequence, in list order.
//! - Return typed hits with byte ranges usable for highlight spans.
//!
//! # Invariants
//! - Blank queries return no hits.
//! - Hit ranges are byte offsets into the item body, safe to slice.

use crate::model::item::ListItem;
use regex::RegexBuilder;

/// One occurrence of the query inside an item body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Position of the item in the flat sequence.
    pub position: usize,
    /// Byte offset where the occurrence starts.
    pub start: usize,
    /// Byte offset one past the occurrence end.
    pub end: usize,
}

/// Scans `items` for case-insensitive occurrences of `query`.
///
/// Hits are ordered by item position, then by offset within the body.
pub fn search_items(items: &[ListItem], query: &str) -> Vec<SearchHit> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    let matcher = RegexBuilder::new(&regex::escape(trimmed))
        .case_insensitive(true)
        .build()
        .expect("escaped literal is always a valid pattern");

    let mut hits = Vec::new();
    for (position, item) in items.iter().enumerate() {
        for found in matcher.find_iter(&item.body) {
            hits.push(SearchHit {
                position,
                start: found.start(),
                end: found.end(),
            });
        }
    }
    hits
}
