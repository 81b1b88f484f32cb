//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive a small deterministic edit session to verify core crate wiring.
//! - Keep output stable for quick local sanity checks.

use ticklist_core::{derive_list_preview, ListItem, ListManager, SortPolicy};

fn print_list(label: &str, manager: &ListManager) {
    println!("{label}:");
    for item in manager.items() {
        let marker = if item.checked { "x" } else { " " };
        let indent = if item.is_child { "  " } else { "" };
        println!("  {indent}[{marker}] {}", item.body);
    }
}

fn main() {
    println!("ticklist_core version={}", ticklist_core::core_version());

    let mut manager = ListManager::new(SortPolicy::SortByChecked);
    manager.init_list(vec![
        ListItem::new("pack bags"),
        ListItem::with_children(
            "book travel",
            vec![ListItem::child("train tickets"), ListItem::child("hotel")],
        ),
        ListItem::new("water plants"),
    ]);
    print_list("loaded", &manager);

    manager
        .change_checked(1, true, true)
        .expect("position 1 exists");
    print_list("after checking the travel block", &manager);

    manager.change_checked_for_all(true);
    print_list("after check-all", &manager);

    while manager.can_undo() {
        manager.undo();
    }
    print_list("after undo-all", &manager);

    if let Some(preview) = derive_list_preview(manager.items()) {
        println!("preview:\n{preview}");
    }
}
