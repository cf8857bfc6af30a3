mod common;

use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rbtree::rbtree_set::{IntoIter, Iter};
use rbtree::{RbTreeSet, TreeError};

use common::{DropTracker, init_logging};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Take(i64),
    Contains(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random sequence of operations on both RbTreeSet and BTreeSet and asserts
    /// identical results and intact red-black invariants at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        init_logging();
        let mut rb_set: RbTreeSet<i64> = RbTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(rb_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rb_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(rb_set.take(v), bt_set.take(v), "take({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rb_set.contains(v), bt_set.contains(v), "contains({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(rb_set.first(), bt_set.first());
                }
                SetOp::Last => {
                    prop_assert_eq!(rb_set.last(), bt_set.last());
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first());
                }
                SetOp::PopLast => {
                    prop_assert_eq!(rb_set.pop_last(), bt_set.pop_last());
                }
            }
            prop_assert!(rb_set.validate().is_ok(), "invariants broken after {:?}", op);
            prop_assert_eq!(rb_set.len(), bt_set.len());
        }
        prop_assert!(rb_set.iter().eq(bt_set.iter()));
    }

    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RbTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        prop_assert!(rb_set.iter().eq(bt_set.iter()));
        prop_assert!(rb_set.iter().rev().eq(bt_set.iter().rev()));
        prop_assert_eq!(rb_set.iter().len(), bt_set.len());
        prop_assert!(rb_set.into_iter().eq(bt_set.into_iter()));
    }

    #[test]
    fn positions_match_btreeset_order(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RbTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        let mut walked = Vec::new();
        let mut at = rb_set.begin();
        while !at.is_end() {
            walked.push(*rb_set.get_at(at)?);
            at = rb_set.next_position(at)?;
        }
        prop_assert!(walked.iter().eq(bt_set.iter()));

        // One more step from the end wraps around to the smallest value.
        let wrapped = rb_set.next_position(rb_set.end())?;
        prop_assert_eq!(rb_set.get_at(wrapped).ok(), bt_set.first());
        let wrapped = rb_set.prev_position(rb_set.end())?;
        prop_assert_eq!(rb_set.get_at(wrapped).ok(), bt_set.last());
    }

    #[test]
    fn bounds_match_btreeset_ranges(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        lookups in proptest::collection::vec(value_strategy(), 100),
    ) {
        let rb_set: RbTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        for needle in lookups {
            prop_assert_eq!(rb_set.get_at(rb_set.lower_bound(&needle)).ok(), bt_set.range(needle..).next());
            prop_assert_eq!(rb_set.get_at(rb_set.upper_bound(&needle)).ok(), bt_set.range(needle + 1..).next());
            prop_assert_eq!(rb_set.get_at(rb_set.find(&needle)).ok(), bt_set.get(&needle));
        }
    }

    #[test]
    fn merge_matches_union(
        a in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        b in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        init_logging();
        let mut rb_a: RbTreeSet<i64> = a.iter().copied().collect();
        let mut rb_b: RbTreeSet<i64> = b.iter().copied().collect();
        let bt_a: BTreeSet<i64> = a.iter().copied().collect();
        let bt_b: BTreeSet<i64> = b.iter().copied().collect();

        rb_a.merge(&mut rb_b);

        prop_assert!(rb_a.iter().eq(bt_a.union(&bt_b)));
        prop_assert!(rb_b.iter().eq(bt_a.intersection(&bt_b)));
        prop_assert!(rb_a.validate().is_ok());
        prop_assert!(rb_b.validate().is_ok());
    }

    #[test]
    fn remove_at_empties_the_set(values in proptest::collection::vec(value_strategy(), TEST_SIZE / 4)) {
        let mut rb_set: RbTreeSet<i64> = values.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = values.iter().copied().collect();

        for v in &values {
            let position = rb_set.find(v);
            if bt_set.remove(v) {
                prop_assert_eq!(rb_set.remove_at(position), Ok(*v));
            } else {
                prop_assert_eq!(rb_set.remove_at(position), Err(TreeError::EndPosition));
            }
            prop_assert!(rb_set.validate().is_ok());
        }
        prop_assert!(rb_set.is_empty());
    }

    #[test]
    fn extend_and_clone_match_btreeset(
        initial in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        extra in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let mut rb_set: RbTreeSet<i64> = initial.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = initial.iter().copied().collect();
        rb_set.extend(&extra);
        bt_set.extend(&extra);

        let copy = rb_set.clone();
        prop_assert_eq!(&copy, &rb_set);
        prop_assert!(copy.validate().is_ok());
        prop_assert!(copy.iter().eq(bt_set.iter()));
    }

    #[test]
    fn insert_many_matches_btreeset(
        initial in proptest::collection::vec(value_strategy(), TEST_SIZE / 4),
        batch in proptest::collection::vec(value_strategy(), TEST_SIZE / 4),
    ) {
        let mut rb_set: RbTreeSet<i64> = initial.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = initial.iter().copied().collect();
        let outcome = rb_set.insert_many(batch.iter().copied());
        prop_assert_eq!(outcome.len(), batch.len());
        for (value, &(position, inserted)) in batch.iter().zip(&outcome) {
            prop_assert_eq!(inserted, bt_set.insert(*value));
            prop_assert_eq!(rb_set.get_at(position), Ok(value));
        }
        prop_assert!(rb_set.iter().eq(bt_set.iter()));
        prop_assert!(rb_set.validate().is_ok());
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn reverse_inserts_stay_balanced() {
    init_logging();
    let mut set = RbTreeSet::new();
    for v in (0..1024).rev() {
        assert!(set.insert(v));
    }
    let black_height = set.validate().expect("balanced after descending inserts");
    // n nodes allow a black height of at most log2(n + 1).
    assert!(black_height <= 11, "black height {black_height}");
    assert_eq!(set.first(), Some(&0));
    assert_eq!(set.last(), Some(&1023));
}

#[test]
fn positions_report_misuse() {
    let mut set = RbTreeSet::from([1, 2, 3]);
    let one = set.find(&1);
    assert_eq!(set.get_at(set.end()), Err(TreeError::EndPosition));

    assert!(!set.insert(1));
    assert_eq!(set.get_at(one), Ok(&1));

    assert!(set.remove(&3));
    assert_eq!(set.get_at(one), Err(TreeError::StalePosition));
    assert_eq!(set.prev_position(one), Err(TreeError::StalePosition));
    assert_eq!(TreeError::StalePosition.to_string(), "position refers to an outdated tree");
}

#[test]
fn positions_are_bound_to_their_set() {
    let mut left = RbTreeSet::from([1, 2, 3]);
    let mut right = RbTreeSet::from([4, 5, 6]);
    let two = left.find(&2);
    assert_eq!(right.get_at(two), Err(TreeError::ForeignPosition));
    assert_eq!(right.remove_at(two), Err(TreeError::ForeignPosition));
    assert_eq!(right.len(), 3);

    left.merge(&mut right);
    assert_eq!(right.get_at(left.begin()), Err(TreeError::ForeignPosition));
    assert_eq!(left.get_at(left.find(&5)), Ok(&5));
}

#[test]
fn values_are_dropped_exactly_once() {
    #[derive(Debug)]
    struct Keyed(u32, common::Tracked);

    impl PartialEq for Keyed {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for Keyed {}
    impl PartialOrd for Keyed {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Keyed {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    let tracker = DropTracker::default();
    let mut set = RbTreeSet::new();
    for k in 0..100 {
        set.insert(Keyed(k, tracker.value()));
    }
    assert!(!set.insert(Keyed(5, tracker.value())));
    assert_eq!(tracker.drops(), 1);

    let taken = set.take(&Keyed(7, tracker.value()));
    assert_eq!(tracker.drops(), 2);
    assert_eq!(taken.map(|k| k.0), Some(7));
    assert_eq!(tracker.drops(), 3);

    drop(set);
    assert_eq!(tracker.drops(), 102);
}

// ─── Traits ──────────────────────────────────────────────────────────────────

#[test]
fn iterator_trait_impls() {
    let set = RbTreeSet::from([3, 1, 2]);

    let iter = set.iter();
    assert_eq!(iter.len(), 3);
    assert_eq!(format!("{:?}", iter.clone()), "[1, 2, 3]");
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");

    let mut iter = set.iter();
    assert_eq!(iter.next_back(), Some(&3));
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);

    let empty: Iter<'_, u8> = Default::default();
    assert_eq!(empty.len(), 0);
    let empty: IntoIter<u8> = Default::default();
    assert_eq!(empty.len(), 0);

    let mut into = set.clone().into_iter();
    assert_eq!(into.next_back(), Some(3));
    assert_eq!(format!("{into:?}"), "[1, 2]");

    let doubled: Vec<i32> = (&set).into_iter().map(|v| v * 2).collect();
    assert_eq!(doubled, [2, 4, 6]);
}

#[test]
fn capacity_is_reserved_up_front() {
    let set: RbTreeSet<u8> = RbTreeSet::with_capacity(10);
    assert!(set.capacity() >= 10);
    assert!(set.is_empty());
}
