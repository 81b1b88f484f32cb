#![allow(dead_code)]

use ticklist_core::{ListItem, ListManager, SortPolicy};

/// Manager loaded with the canonical six-item fixture `A..F`, all unchecked
/// non-children with persisted order hints `0..5`.
pub fn seeded(policy: SortPolicy) -> ListManager {
    let mut manager = ListManager::new(policy);
    let items = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .enumerate()
        .map(|(index, body)| {
            let mut item = ListItem::new(*body);
            item.order = Some(index as i64);
            item
        })
        .collect();
    manager.init_list(items);
    manager
}

pub fn bodies(manager: &ListManager) -> Vec<String> {
    manager
        .items()
        .iter()
        .map(|item| item.body.clone())
        .collect()
}

pub fn checked_flags(manager: &ListManager) -> Vec<bool> {
    manager.items().iter().map(|item| item.checked).collect()
}

pub fn assert_order(manager: &ListManager, expected: &[&str]) {
    assert_eq!(bodies(manager), expected, "unexpected item order");
}

pub fn assert_checked(manager: &ListManager, expected: &[bool]) {
    assert_eq!(checked_flags(manager), expected, "unexpected checked flags");
}

/// Asserts the children cache of the item with body `parent` by child
/// bodies.
pub fn assert_children(manager: &ListManager, parent: &str, expected: &[&str]) {
    let item = manager
        .items()
        .iter()
        .find(|item| item.body == parent)
        .unwrap_or_else(|| panic!("no item with body `{parent}`"));
    let children: Vec<&str> = item
        .children
        .iter()
        .map(|child| child.body.as_str())
        .collect();
    assert_eq!(children, expected, "unexpected children of `{parent}`");
}

pub fn undo_all(manager: &mut ListManager) {
    while manager.can_undo() {
        assert!(manager.undo());
    }
}

pub fn redo_all(manager: &mut ListManager) {
    while manager.can_redo() {
        assert!(manager.redo());
    }
}

/// Structural health check run after operations in scenario tests:
/// child-run contiguity, cache equality, head rule, and (under
/// sort-by-checked) the partition invariant.
pub fn assert_invariants(manager: &ListManager) {
    let items = manager.items();
    if let Some(first) = items.first() {
        assert!(!first.is_child, "child item at the list head");
    }
    let mut index = 0;
    let mut seen_checked_block = false;
    while index < items.len() {
        let parent = &items[index];
        assert!(!parent.is_child, "expected block head at {index}");
        let mut run_end = index + 1;
        while run_end < items.len() && items[run_end].is_child {
            run_end += 1;
        }
        assert_eq!(
            parent.children.as_slice(),
            &items[index + 1..run_end],
            "children cache of `{}` does not match its run",
            parent.body
        );
        for child in &items[index + 1..run_end] {
            assert!(
                child.children.is_empty(),
                "child `{}` owns a non-empty cache",
                child.body
            );
        }
        if manager.policy() == SortPolicy::SortByChecked {
            if parent.checked {
                seen_checked_block = true;
            } else {
                assert!(
                    !seen_checked_block,
                    "unchecked block `{}` after the partition boundary",
                    parent.body
                );
            }
        }
        index = run_end;
    }
}
