//! In-order stepping over parent links. No auxiliary stack is kept: a step is a descent to
//! the nearest extreme of a subtree or a climb to the first ancestor on the other side.

use alloc::vec::Vec;
use core::iter::FusedIterator;

use super::handle::Handle;
use super::node::{Node, Side};
use super::raw_rb_tree::RawRbTree;

impl<K, V> RawRbTree<K, V> {
    /// Walks from `handle` down the `side` links as far as they go.
    fn extreme(&self, mut handle: Handle, side: Side) -> Handle {
        while let Some(next) = self.node(handle).child(side) {
            handle = next;
        }
        handle
    }

    #[inline]
    pub(crate) fn leftmost(&self, handle: Handle) -> Handle {
        self.extreme(handle, Side::Left)
    }

    #[inline]
    pub(crate) fn rightmost(&self, handle: Handle) -> Handle {
        self.extreme(handle, Side::Right)
    }

    pub(crate) fn first(&self) -> Option<Handle> {
        self.root().map(|root| self.leftmost(root))
    }

    pub(crate) fn last(&self) -> Option<Handle> {
        self.root().map(|root| self.rightmost(root))
    }

    /// Neighbour of `handle` in the direction `side` (right is the successor).
    fn neighbour(&self, handle: Handle, side: Side) -> Option<Handle> {
        if let Some(child) = self.node(handle).child(side) {
            return Some(self.extreme(child, side.opposite()));
        }
        let mut current = handle;
        let mut parent = self.node(current).parent();
        while let Some(up) = parent {
            if self.node(up).child(side) != Some(current) {
                break;
            }
            current = up;
            parent = self.node(up).parent();
        }
        parent
    }

    #[inline]
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        self.neighbour(handle, Side::Right)
    }

    #[inline]
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        self.neighbour(handle, Side::Left)
    }

    /// Forward step of a position. Stepping from the end wraps to the first node.
    pub(crate) fn step_forward(&self, at: Option<Handle>) -> Option<Handle> {
        match at {
            Some(handle) => self.successor(handle),
            None => self.first(),
        }
    }

    /// Backward step of a position. Stepping from the end wraps to the last node.
    pub(crate) fn step_backward(&self, at: Option<Handle>) -> Option<Handle> {
        match at {
            Some(handle) => self.predecessor(handle),
            None => self.last(),
        }
    }

    pub(crate) fn iter(&self) -> RawIter<'_, K, V> {
        RawIter {
            tree: Some(self),
            front: self.first(),
            back: self.last(),
            remaining: self.len(),
        }
    }

    /// Every entry in key order, with mutable access to the values.
    pub(crate) fn entries_mut(&mut self) -> Vec<(&K, &mut V)> {
        let order = self.in_order_handles();
        let mut slots = self.nodes_mut().slots_mut();
        order.into_iter().filter_map(|handle| slots[handle.to_index()].take()).map(Node::entry_mut).collect()
    }
}

/// Borrowing double-ended walk over a tree's entries in key order.
pub(crate) struct RawIter<'a, K, V> {
    tree: Option<&'a RawRbTree<K, V>>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

impl<K, V> RawIter<'_, K, V> {
    /// An iterator that yields nothing and borrows no tree.
    pub(crate) const fn empty() -> Self {
        RawIter {
            tree: None,
            front: None,
            back: None,
            remaining: 0,
        }
    }
}

impl<K, V> Clone for RawIter<'_, K, V> {
    fn clone(&self) -> Self {
        RawIter {
            tree: self.tree,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for RawIter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let handle = self.front?;
        self.remaining -= 1;
        self.front = tree.successor(handle);
        let node = tree.node(handle);
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for RawIter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let tree = self.tree?;
        let handle = self.back?;
        self.remaining -= 1;
        self.back = tree.predecessor(handle);
        let node = tree.node(handle);
        Some((node.key(), node.value()))
    }
}

impl<K, V> ExactSizeIterator for RawIter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for RawIter<'_, K, V> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> RawRbTree<i32, ()> {
        let mut tree = RawRbTree::new();
        for key in keys {
            tree.insert(key, ());
        }
        tree
    }

    fn key(tree: &RawRbTree<i32, ()>, handle: Option<Handle>) -> Option<i32> {
        handle.map(|h| *tree.node(h).key())
    }

    #[test]
    fn empty_tree_has_no_extremes() {
        let tree = tree_of([]);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.last(), None);
        assert_eq!(tree.step_forward(None), None);
        assert_eq!(tree.step_backward(None), None);
        assert_eq!(tree.iter().next(), None);
    }

    #[test]
    fn stepping_from_end_wraps() {
        let tree = tree_of([10, 15, 5, 3, 4, 17, 19, 16, 2, 1, 20]);
        assert_eq!(key(&tree, tree.step_forward(None)), Some(1));
        assert_eq!(key(&tree, tree.step_backward(None)), Some(20));
        assert_eq!(tree.step_forward(tree.last()), None);
        assert_eq!(tree.step_backward(tree.first()), None);
    }

    #[test]
    fn forward_walk_is_sorted() {
        let tree = tree_of([10, 15, 5, 3, 4, 17, 19, 16, 2, 1, 20]);
        let keys: Vec<i32> = tree.iter().map(|(k, ())| *k).collect();
        assert_eq!(keys, [1, 2, 3, 4, 5, 10, 15, 16, 17, 19, 20]);
        let backwards: Vec<i32> = tree.iter().rev().map(|(k, ())| *k).collect();
        assert_eq!(backwards, [20, 19, 17, 16, 15, 10, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn iterator_meets_in_the_middle() {
        let tree = tree_of(1..=5);
        let mut iter = tree.iter();
        assert_eq!(iter.next().map(|(k, ())| *k), Some(1));
        assert_eq!(iter.next_back().map(|(k, ())| *k), Some(5));
        assert_eq!(iter.len(), 3);
        let rest: Vec<i32> = iter.map(|(k, ())| *k).collect();
        assert_eq!(rest, [2, 3, 4]);
    }

    #[test]
    fn entries_mut_visits_in_key_order() {
        let mut tree = RawRbTree::new();
        for key in [3, 1, 2] {
            tree.insert(key, key * 10);
        }
        for (key, value) in tree.entries_mut() {
            *value += *key;
        }
        let seen: Vec<(i32, i32)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(seen, [(1, 11), (2, 22), (3, 33)]);
    }

    proptest! {
        #[test]
        fn stepping_forward_then_back_returns_home(
            keys in prop::collection::vec(-1000i32..1000, 1..200),
            start in any::<prop::sample::Index>(),
            steps in any::<prop::sample::Index>(),
        ) {
            let tree = tree_of(keys.iter().copied());
            let order = tree.in_order_handles();
            let origin = start.index(order.len());
            let steps = steps.index(order.len() + 1);

            let mut at = Some(order[origin]);
            for _ in 0..steps {
                at = tree.step_forward(at);
            }
            for _ in 0..steps {
                at = tree.step_backward(at);
            }
            prop_assert_eq!(at, Some(order[origin]));
        }
    }
}
