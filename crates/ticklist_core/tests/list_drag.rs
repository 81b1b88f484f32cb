mod common;

use common::{assert_children, assert_invariants, assert_order, seeded};
use ticklist_core::{ListItem, ListManager, SortPolicy};

#[test]
fn a_whole_gesture_collapses_into_one_change() {
    let mut manager = seeded(SortPolicy::NoSort);
    assert_eq!(manager.move_item(0, 1, false, false, true), Some(1));
    assert_eq!(manager.move_item(1, 2, false, false, true), Some(2));
    assert_eq!(manager.move_item(2, 3, false, false, true), Some(3));
    assert_invariants(&manager);
    assert!(!manager.can_undo(), "tentative moves must not touch history");

    let finished = manager.finish_move(true, true);
    assert_eq!(finished, Some(3));
    assert_order(&manager, &["B", "C", "D", "A", "E", "F"]);

    assert!(manager.undo());
    assert_order(&manager, &["A", "B", "C", "D", "E", "F"]);
    assert!(!manager.can_undo());

    assert!(manager.redo());
    assert_order(&manager, &["B", "C", "D", "A", "E", "F"]);
}

#[test]
fn aborting_a_gesture_leaves_no_residue() {
    let mut manager = seeded(SortPolicy::NoSort);
    manager.move_item(1, 3, false, false, true).unwrap();
    manager.move_item(3, 4, false, false, true).unwrap();
    manager.abort_move();

    assert_order(&manager, &["A", "B", "C", "D", "E", "F"]);
    assert!(!manager.can_undo());
    assert_eq!(manager.finish_move(true, true), None);
}

#[test]
fn a_gesture_with_no_net_movement_commits_nothing() {
    let mut manager = seeded(SortPolicy::NoSort);
    manager.move_item(2, 3, false, false, true).unwrap();
    manager.move_item(3, 2, false, false, true).unwrap();
    assert_eq!(manager.finish_move(true, true), None);
    assert!(!manager.can_undo());
    assert_order(&manager, &["A", "B", "C", "D", "E", "F"]);
}

#[test]
fn dragging_a_parent_carries_its_pinned_block() {
    let mut manager = seeded(SortPolicy::NoSort);
    manager.change_is_child(1, true, true).unwrap();
    manager.change_is_child(2, true, true).unwrap();
    manager.reset_history();

    assert_eq!(manager.move_item(0, 3, false, false, true), Some(3));
    assert_order(&manager, &["D", "E", "F", "A", "B", "C"]);
    assert_children(&manager, "A", &["B", "C"]);
    assert_invariants(&manager);

    assert_eq!(manager.finish_move(true, true), Some(3));
    assert!(manager.undo());
    assert_order(&manager, &["A", "B", "C", "D", "E", "F"]);
    assert_children(&manager, "A", &["B", "C"]);
}

#[test]
fn a_dropped_row_joins_the_family_it_lands_in() {
    let mut manager = ListManager::new(SortPolicy::NoSort);
    manager.init_list(vec![
        ListItem::with_children("P", vec![ListItem::child("c1")]),
        ListItem::new("Q"),
    ]);

    // Q dragged between P and c1
    assert_eq!(manager.move_item(2, 1, false, false, true), Some(1));
    assert_eq!(manager.finish_move(true, true), Some(1));
    assert!(manager.get_item(1).unwrap().is_child);
    assert_children(&manager, "P", &["Q", "c1"]);
    assert_invariants(&manager);

    assert!(manager.undo());
    assert_order(&manager, &["P", "c1", "Q"]);
    assert!(!manager.get_item(2).unwrap().is_child);
    assert_children(&manager, "P", &["c1"]);
}

#[test]
fn a_child_dropped_between_blocks_is_promoted() {
    let mut manager = ListManager::new(SortPolicy::NoSort);
    manager.init_list(vec![
        ListItem::with_children("P", vec![ListItem::child("c1"), ListItem::child("c2")]),
        ListItem::new("Q"),
    ]);

    // c1 dragged below Q
    assert_eq!(manager.move_item(1, 3, false, false, true), Some(3));
    assert_eq!(manager.finish_move(true, true), Some(3));
    assert_order(&manager, &["P", "c2", "Q", "c1"]);
    assert!(!manager.get_item(3).unwrap().is_child);
    assert_invariants(&manager);

    assert!(manager.undo());
    assert_order(&manager, &["P", "c1", "c2", "Q"]);
    assert_children(&manager, "P", &["c1", "c2"]);
}

#[test]
fn tentative_moves_respect_the_partition_boundary() {
    let mut manager = seeded(SortPolicy::SortByChecked);
    manager.change_checked(5, true, true).unwrap();
    manager.reset_history();

    // A cannot be dragged past the checked segment
    assert_eq!(manager.move_item(0, 5, false, false, true), Some(4));
    assert_order(&manager, &["B", "C", "D", "E", "A", "F"]);
    assert_invariants(&manager);

    manager.abort_move();
    assert_order(&manager, &["A", "B", "C", "D", "E", "F"]);
}
