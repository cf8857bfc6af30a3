use log::trace;

use super::handle::Handle;
use super::node::{Color, Side};
use super::raw_rb_tree::RawRbTree;

impl<K, V> RawRbTree<K, V> {
    /// Removes the entry stored at `target` and rebalances, returning that entry.
    ///
    /// When `target` has two children its in-order successor is the node physically unlinked:
    /// the successor's entry moves into `target` and `target`'s original entry is returned.
    /// Handles to every other node stay valid; the in-order sequence of the remaining entries
    /// is unchanged.
    pub(crate) fn remove_node(&mut self, target: Handle) -> (K, V) {
        self.note_removed();

        let doomed = match (self.node(target).left(), self.node(target).right()) {
            (Some(_), Some(right)) => self.leftmost(right),
            _ => target,
        };

        // `doomed` has at most one child; splice it out.
        let parent = self.node(doomed).parent();
        let child = self.node(doomed).left().or(self.node(doomed).right());
        let side = parent.map(|parent| self.side_of(doomed, parent));
        self.replace_child(parent, doomed, child);
        if let Some(child) = child {
            self.node_mut(child).set_parent(parent);
        }

        let removed = self.nodes_mut().take(doomed);
        let removed_color = removed.color();
        let (mut key, mut value) = removed.into_entry();
        if doomed != target {
            (key, value) = self.node_mut(target).replace_entry(key, value);
        }

        if removed_color == Color::Black {
            match child {
                Some(child) if self.node(child).is_red() => {
                    trace!("remove at {doomed:?}: red replacement absorbs the missing black");
                    self.set_color(child, Color::Black);
                }
                _ => {
                    if let (Some(parent), Some(side)) = (parent, side) {
                        self.remove_fix_up(parent, side);
                    }
                }
            }
        }

        self.force_black_root();
        (key, value)
    }

    /// Repairs a black-height deficit on the `side` child position of `parent`.
    fn remove_fix_up(&mut self, mut parent: Handle, mut side: Side) {
        loop {
            // The deficient position had a black ancestor chain, so its sibling exists.
            let Some(mut sibling) = self.node(parent).child(side.opposite()) else {
                break;
            };

            if self.node(sibling).is_red() {
                trace!("remove fix-up under {parent:?}: red sibling, rotating {side:?}");
                self.rotate(parent, side);
                self.set_color(sibling, Color::Black);
                self.set_color(parent, Color::Red);
                continue;
            }

            let far = self.node(sibling).child(side.opposite());
            let near = self.node(sibling).child(side);

            if !self.is_red(far) && !self.is_red(near) {
                self.set_color(sibling, Color::Red);
                if self.node(parent).is_red() {
                    trace!("remove fix-up under {parent:?}: red parent absorbs the deficit");
                    self.set_color(parent, Color::Black);
                    break;
                }
                let Some(grand) = self.node(parent).parent() else {
                    trace!("remove fix-up: deficit reached the root");
                    break;
                };
                trace!("remove fix-up under {parent:?}: black sibling family, moving up to {grand:?}");
                side = self.side_of(parent, grand);
                parent = grand;
                continue;
            }

            if !self.is_red(far) {
                if let Some(near) = near {
                    trace!("remove fix-up under {parent:?}: near red nephew, turning it outward");
                    self.rotate(sibling, side.opposite());
                    sibling = near;
                }
            }

            trace!("remove fix-up under {parent:?}: far red nephew, rotating {side:?}");
            let parent_color = self.node(parent).color();
            self.rotate(parent, side);
            self.set_color(sibling, parent_color);
            self.set_color(parent, Color::Black);
            if let Some(far) = self.node(sibling).child(side.opposite()) {
                self.set_color(far, Color::Black);
            }
            break;
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    fn tree_of(keys: &[i32]) -> RawRbTree<i32, i32> {
        let mut tree = RawRbTree::new();
        for &key in keys {
            tree.insert(key, -key);
        }
        tree
    }

    fn keys(tree: &RawRbTree<i32, i32>) -> Vec<i32> {
        tree.in_order_handles().into_iter().map(|h| *tree.node(h).key()).collect()
    }

    #[test]
    fn removing_two_child_root_promotes_successor() {
        let mut tree = tree_of(&[5, 3, 8]);
        let root = tree.root().expect("non-empty");
        assert_eq!(*tree.node(root).key(), 5);

        assert_eq!(tree.remove(&5), Some((5, -5)));
        let root = tree.root().expect("two nodes remain");
        assert_eq!(*tree.node(root).key(), 8);
        assert_eq!(*tree.node(root).value(), -8);
        assert!(tree.validate().is_ok());
        assert_eq!(keys(&tree), [3, 8]);
    }

    #[test]
    fn removing_last_node_empties_tree() {
        let mut tree = tree_of(&[1]);
        assert_eq!(tree.remove(&1), Some((1, -1)));
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);
        assert_eq!(tree.nodes().len(), 0);
    }

    #[test]
    fn removing_missing_key_is_none() {
        let mut tree = tree_of(&[1, 2, 3]);
        assert_eq!(tree.remove(&4), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn removing_everything_one_by_one_keeps_invariants() {
        let inserted = [10, 15, 5, 3, 4, 17, 19, 16, 2, 1, 20];
        let mut tree = tree_of(&inserted);
        let mut remaining = keys(&tree);
        for key in inserted {
            assert_eq!(tree.remove(&key), Some((key, -key)));
            remaining.retain(|&k| k != key);
            assert!(tree.validate().is_ok(), "invalid after removing {key}");
            assert_eq!(keys(&tree), remaining);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn other_handles_survive_successor_promotion() {
        let mut tree = tree_of(&(0..64).collect::<Vec<_>>());
        let handles: Vec<_> = (0..64).map(|key| tree.search(&key).expect("present")).collect();
        let root = tree.root().expect("non-empty");
        let root_key = *tree.node(root).key();
        let successor = tree.successor(root).expect("root has a right subtree");

        assert_eq!(tree.remove(&root_key), Some((root_key, -root_key)));
        assert_eq!(*tree.node(root).key(), root_key + 1);
        assert!(tree.nodes().try_get(successor).is_none());
        for (key, handle) in (0..64).zip(handles) {
            if handle == root || handle == successor {
                continue;
            }
            assert_eq!(*tree.node(handle).key(), key);
        }
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn duplicate_removal_is_fifo() {
        let mut tree = RawRbTree::new();
        for order in 0..6 {
            tree.insert(1, order);
            tree.insert(0, order);
        }
        for expected in 0..6 {
            assert_eq!(tree.remove(&1), Some((1, expected)));
            assert!(tree.validate().is_ok());
        }
        assert_eq!(tree.count(&0), 6);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i16),
        Remove(i16),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (-64i16..64).prop_map(Op::Insert),
            2 => (-64i16..64).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn random_mutations_keep_invariants(ops in prop::collection::vec(op_strategy(), 0..600)) {
            let mut tree = RawRbTree::new();
            let mut model: Vec<i16> = Vec::new();
            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key, ());
                        let at = model.partition_point(|&k| k <= key);
                        model.insert(at, key);
                    }
                    Op::Remove(key) => {
                        let removed = tree.remove(&key).map(|(k, ())| k);
                        let expected = model.iter().position(|&k| k == key).map(|at| model.remove(at));
                        prop_assert_eq!(removed, expected);
                    }
                }
                prop_assert!(tree.validate().is_ok());
                prop_assert_eq!(tree.len(), model.len());
                let seen: Vec<i16> = tree.in_order_handles().into_iter().map(|h| *tree.node(h).key()).collect();
                prop_assert_eq!(&seen, &model);
            }
        }
    }
}
