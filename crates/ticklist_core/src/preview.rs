//! Plain-text preview derivation for checklist notes.
//!
//! The surrounding app's note grid shows a few leading items of a list
//! note; this module derives that projection from the live sequence.

use crate::model::item::ListItem;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const PREVIEW_MAX_ITEMS: usize = 4;
const PREVIEW_MAX_LINE_CHARS: usize = 80;

/// Derives a multi-line text preview from the leading items.
///
/// Rules:
/// - At most [`PREVIEW_MAX_ITEMS`] items are rendered, one line each, as
///   `[x] body` / `[ ] body`; children are indented two spaces.
/// - Bodies are whitespace-normalized and capped at
///   [`PREVIEW_MAX_LINE_CHARS`] chars with an ellipsis.
/// - Returns `None` for an empty list.
pub fn derive_list_preview(items: &[ListItem]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(PREVIEW_MAX_ITEMS);
    for item in items.iter().take(PREVIEW_MAX_ITEMS) {
        let marker = if item.checked { "[x]" } else { "[ ]" };
        let indent = if item.is_child { "  " } else { "" };
        let body = WHITESPACE_RE.replace_all(item.body.trim(), " ");
        let mut line = format!("{indent}{marker} {body}");
        if line.chars().count() > PREVIEW_MAX_LINE_CHARS {
            line = line.chars().take(PREVIEW_MAX_LINE_CHARS).collect();
            line.push('…');
        }
        lines.push(line);
    }
    if items.len() > PREVIEW_MAX_ITEMS {
        lines.push(format!("… {} more", items.len() - PREVIEW_MAX_ITEMS));
    }
    Some(lines.join("\n"))
}
