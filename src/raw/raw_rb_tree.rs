use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use log::debug;

use super::arena::Arena;
use super::epoch::{Epoch, Provenance};
use super::handle::Handle;
use super::node::{Color, Node, Side};
use crate::error::TreeError;
use crate::position::Position;

/// The red-black tree engine behind every collection in this crate.
///
/// Owns the node arena, the root link and the structural epoch. Nothing outside this type
/// allocates or frees a node.
pub(crate) struct RawRbTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// Number of live nodes.
    len: usize,
    /// Advanced on every structural mutation.
    epoch: Epoch,
}

impl<K, V> RawRbTree<K, V> {
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            epoch: Epoch::ZERO,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            epoch: Epoch::ZERO,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    #[inline]
    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    pub(crate) fn nodes(&self) -> &Arena<Node<K, V>> {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Arena<Node<K, V>> {
        &mut self.nodes
    }

    /// Frees every node. Values are dropped exactly once, in slot order.
    pub(crate) fn clear(&mut self) {
        if self.len > 0 {
            debug!("clearing tree of {} nodes", self.len);
        }
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        self.epoch.advance();
    }

    // ─── Structural bookkeeping shared by the engines ───────────────────────

    /// Registers a freshly allocated node and bumps the epoch.
    pub(crate) fn note_inserted(&mut self) {
        self.len += 1;
        self.epoch.advance();
    }

    pub(crate) fn note_removed(&mut self) {
        self.len -= 1;
        self.epoch.advance();
    }

    pub(crate) fn set_root(&mut self, root: Option<Handle>) {
        self.root = root;
    }

    /// Colors of absent links count as black.
    #[inline]
    pub(crate) fn is_red(&self, handle: Option<Handle>) -> bool {
        handle.is_some_and(|h| self.node(h).is_red())
    }

    #[inline]
    pub(crate) fn set_color(&mut self, handle: Handle, color: Color) {
        self.node_mut(handle).set_color(color);
    }

    /// Which side of `parent` holds `child`.
    #[inline]
    pub(crate) fn side_of(&self, child: Handle, parent: Handle) -> Side {
        if self.node(parent).left() == Some(child) { Side::Left } else { Side::Right }
    }

    /// Points whatever referenced `old` (a parent's child link or the root) at `new`.
    /// The caller fixes `new`'s parent link.
    pub(crate) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                self.node_mut(parent).set_child(side, new);
            }
        }
    }

    pub(crate) fn force_black_root(&mut self) {
        if let Some(root) = self.root {
            self.set_color(root, Color::Black);
        }
    }

    // ─── Positions ──────────────────────────────────────────────────────────

    pub(crate) fn position(&self, node: Option<Handle>) -> Position {
        Position::new(node, self.epoch)
    }

    /// Validates a position against this tree and its current epoch. `Ok(None)` is the end
    /// sentinel.
    pub(crate) fn resolve(&self, position: Position) -> Result<Option<Handle>, TreeError> {
        match self.epoch.check(position.epoch()) {
            Provenance::Current => {}
            Provenance::Outdated => {
                debug!("rejecting position {position:?}: tree epoch is {:?}", self.epoch);
                return Err(TreeError::StalePosition);
            }
            Provenance::Foreign => {
                debug!("rejecting position {position:?}: taken from another tree");
                return Err(TreeError::ForeignPosition);
            }
        }
        match position.node() {
            Some(handle) if self.nodes.try_get(handle).is_none() => {
                debug!("rejecting position {position:?}: slot is vacant");
                Err(TreeError::StalePosition)
            }
            node => Ok(node),
        }
    }

    /// Like [`resolve`](Self::resolve) but refuses the end sentinel.
    pub(crate) fn resolve_node(&self, position: Position) -> Result<Handle, TreeError> {
        self.resolve(position)?.ok_or_else(|| {
            debug!("rejecting end position");
            TreeError::EndPosition
        })
    }

    // ─── Whole-tree lifecycle ───────────────────────────────────────────────

    /// Moves every entry out in ascending order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let order = self.in_order_handles();
        let mut entries = Vec::with_capacity(order.len());
        for handle in order {
            entries.push(self.nodes.take(handle).into_entry());
        }
        self.clear();
        entries
    }

    /// Handles of all nodes in ascending key order.
    pub(crate) fn in_order_handles(&self) -> Vec<Handle> {
        let mut order = Vec::with_capacity(self.len);
        let mut current = self.first();
        while let Some(handle) = current {
            order.push(handle);
            current = self.successor(handle);
        }
        order
    }
}

impl<K: Clone, V: Clone> RawRbTree<K, V> {
    /// Deep-copies the subtree at `source` into `into`, preserving shape and colors.
    fn copy_subtree(&self, source: Handle, parent: Option<Handle>, into: &mut Arena<Node<K, V>>) -> Handle {
        let node = self.node(source);
        let copy = into.alloc(node.clone_detached());
        into.get_mut(copy).set_parent(parent);
        for side in [Side::Left, Side::Right] {
            if let Some(child) = node.child(side) {
                let child_copy = self.copy_subtree(child, Some(copy), into);
                into.get_mut(copy).set_child(side, Some(child_copy));
            }
        }
        copy
    }
}

impl<K: Clone, V: Clone> Clone for RawRbTree<K, V> {
    fn clone(&self) -> Self {
        let mut nodes = Arena::with_capacity(self.len);
        let root = self.root.map(|root| self.copy_subtree(root, None, &mut nodes));
        Self {
            nodes,
            root,
            len: self.len,
            epoch: Epoch::fresh(),
        }
    }
}

impl<K: Ord, V> RawRbTree<K, V> {
    /// Finds the leftmost node whose key equals `key`.
    ///
    /// With duplicates present this is the earliest-inserted one.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        let mut found = None;
        while let Some(handle) = current {
            let node = self.node(handle);
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => {
                    found = Some(handle);
                    node.left()
                }
            };
        }
        found
    }

    /// First node whose key is not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound(|node_key| Borrow::<Q>::borrow(node_key) >= key)
    }

    /// First node whose key is greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.bound(|node_key| Borrow::<Q>::borrow(node_key) > key)
    }

    /// Leftmost node satisfying a predicate that is monotone over the in-order sequence.
    fn bound(&self, mut is_past: impl FnMut(&K) -> bool) -> Option<Handle> {
        let mut current = self.root;
        let mut candidate = None;
        while let Some(handle) = current {
            let node = self.node(handle);
            if is_past(node.key()) {
                candidate = Some(handle);
                current = node.left();
            } else {
                current = node.right();
            }
        }
        candidate
    }

    /// Number of nodes whose key equals `key`.
    pub(crate) fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut count = 0;
        let mut current = self.search(key);
        while let Some(handle) = current {
            if Borrow::<Q>::borrow(self.node(handle).key()) != key {
                break;
            }
            count += 1;
            current = self.successor(handle);
        }
        count
    }

    /// Removes the leftmost entry with key `key`, if any.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.search(key)?;
        Some(self.remove_node(handle))
    }
}
