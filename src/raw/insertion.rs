use core::mem;

use log::trace;

use super::handle::Handle;
use super::node::{Color, Node, Side};
use super::raw_rb_tree::RawRbTree;

impl<K: Ord, V> RawRbTree<K, V> {
    /// Inserts `key` as a new node and rebalances. Never checks for an existing equal key;
    /// equal keys descend right, so a duplicate lands after the ones already present.
    ///
    /// The node is allocated before any link is touched, so a failed allocation leaves the
    /// tree as it was. Returns the new node, which keeps its handle through rebalancing.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Handle {
        let handle = self.nodes_mut().alloc(Node::new(key, value));
        self.note_inserted();

        let Some(mut current) = self.root() else {
            self.set_color(handle, Color::Black);
            self.set_root(Some(handle));
            return handle;
        };

        let side = loop {
            let node = self.node(current);
            let side = if self.node(handle).key() < node.key() { Side::Left } else { Side::Right };
            match node.child(side) {
                Some(child) => current = child,
                None => break side,
            }
        };
        self.node_mut(current).set_child(side, Some(handle));
        self.node_mut(handle).set_parent(Some(current));

        self.insert_fix_up(handle);
        self.force_black_root();
        handle
    }

    /// Restores "no red node has a red child" upward from the freshly linked red `node`.
    fn insert_fix_up(&mut self, mut node: Handle) {
        while let Some(mut parent) = self.node(node).parent().filter(|&p| self.node(p).is_red()) {
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = self.node(parent).parent() else {
                break;
            };
            let side = self.side_of(parent, grand);
            let uncle = self.node(grand).child(side.opposite());

            if let Some(uncle) = uncle.filter(|&u| self.node(u).is_red()) {
                trace!("insert fix-up at {node:?}: red uncle, pushing red up to {grand:?}");
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                node = grand;
                continue;
            }

            if self.node(parent).child(side.opposite()) == Some(node) {
                trace!("insert fix-up at {node:?}: straightening zig-zag under {parent:?}");
                self.rotate(parent, side);
                mem::swap(&mut node, &mut parent);
            }
            trace!("insert fix-up at {node:?}: black uncle, rotating {grand:?}");
            self.rotate(grand, side.opposite());
            self.set_color(parent, Color::Black);
            self.set_color(grand, Color::Red);
            break;
        }
    }
}
