#![cfg(feature = "ordered")]
//! Unit tests for InsertionOrderedSet.

use std::collections::HashMap;

use rstest::rstest;
use uniset::{InsertionOrderedSet, SetError};

// =============================================================================
// Order Preservation
// =============================================================================

#[rstest]
fn test_keys_follow_first_insertion() {
    let mut set = InsertionOrderedSet::new();
    for element in [3, 1, 3, 2, 1] {
        set.insert(element);
    }
    assert_eq!(set.keys(), &[3, 1, 2]);
}

#[rstest]
fn test_delete_keeps_relative_order() {
    let mut set: InsertionOrderedSet<i32> = [1, 2, 3, 4].into();
    assert!(set.delete(&3));
    assert_eq!(set.keys(), &[1, 2, 4]);
}

#[rstest]
fn test_reinsert_after_delete_moves_to_end() {
    let mut set: InsertionOrderedSet<i32> = [1, 2, 3].into();
    set.delete(&1);
    set.insert(1);
    assert_eq!(set.keys(), &[2, 3, 1]);
}

#[rstest]
fn test_duplicate_insert_keeps_position() {
    let mut set: InsertionOrderedSet<&str> = ["a", "b"].into();
    assert!(!set.insert("a"));
    assert_eq!(set.keys(), &["a", "b"]);
}

#[rstest]
#[case(&[], None, None)]
#[case(&[9], Some(9), Some(9))]
#[case(&[4, 5, 6], Some(4), Some(6))]
fn test_first_and_last(
    #[case] elements: &[i32],
    #[case] first: Option<i32>,
    #[case] last: Option<i32>,
) {
    let set = InsertionOrderedSet::from_slice(elements);
    assert_eq!(set.first().copied(), first);
    assert_eq!(set.last().copied(), last);
}

#[rstest]
fn test_position_of() {
    let set: InsertionOrderedSet<i32> = [10, 20, 30].into();
    assert_eq!(set.position_of(&20), Some(1));
    assert_eq!(set.position_of(&40), None);
}

#[rstest]
fn test_iter_is_double_ended() {
    let set: InsertionOrderedSet<i32> = [1, 2, 3].into();
    let reversed: Vec<i32> = set.iter().rev().copied().collect();
    assert_eq!(reversed, vec![3, 2, 1]);
}

// =============================================================================
// Construction
// =============================================================================

#[rstest]
fn test_with_capacity_rejects_negative() {
    assert!(matches!(
        InsertionOrderedSet::<i32>::with_capacity(-1),
        Err(SetError::InvalidArgument(_))
    ));
}

#[rstest]
fn test_with_capacity_zero() {
    let set = InsertionOrderedSet::<i32>::with_capacity(0).unwrap();
    assert!(set.is_empty());
}

#[rstest]
fn test_from_map_contains_every_key() {
    let map = HashMap::from([("a", 1), ("b", 2)]);
    let set: InsertionOrderedSet<&str> = InsertionOrderedSet::from_map(&map);
    assert_eq!(set.len(), 2);
    assert!(set.contains(&"a"));
    assert!(set.contains(&"b"));
}

#[rstest]
fn test_from_slice_round_trip_without_duplicates() {
    let elements = [5, 3, 8];
    let set = InsertionOrderedSet::from_slice(&elements);
    assert_eq!(set.keys(), &elements);
}

// =============================================================================
// Bulk Mutation
// =============================================================================

#[rstest]
fn test_insert_all_appends_new_elements() {
    let mut set: InsertionOrderedSet<i32> = [1, 2].into();
    assert_eq!(set.insert_all([2, 3, 1, 4]), 2);
    assert_eq!(set.keys(), &[1, 2, 3, 4]);
}

#[rstest]
fn test_replace_with_uses_new_order() {
    let mut set: InsertionOrderedSet<i32> = [1, 2, 3].into();
    set.replace_with([3, 3, 9]);
    assert_eq!(set.keys(), &[3, 9]);
}

#[rstest]
fn test_clear_empties_both_views() {
    let mut set: InsertionOrderedSet<i32> = [1, 2].into();
    set.clear();
    assert!(set.keys().is_empty());
    assert!(!set.contains(&1));
}

// =============================================================================
// Equality, Cloning and Formatting
// =============================================================================

#[rstest]
fn test_equality_is_order_sensitive() {
    let forward: InsertionOrderedSet<i32> = [1, 2].into();
    let backward: InsertionOrderedSet<i32> = [2, 1].into();
    assert_ne!(forward, backward);
}

#[rstest]
fn test_clone_is_independent() {
    let original: InsertionOrderedSet<i32> = [1, 2].into();
    let mut copy = original.clone();
    copy.insert(3);
    assert_eq!(original.keys(), &[1, 2]);
    assert_eq!(copy.keys(), &[1, 2, 3]);
}

#[rstest]
fn test_display_follows_insertion_order() {
    let set: InsertionOrderedSet<i32> = [3, 1, 2].into();
    assert_eq!(set.to_string(), "{3, 1, 2}");
    assert_eq!(format!("{set:?}"), "{3, 1, 2}");
}
