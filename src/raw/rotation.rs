use super::handle::Handle;
use super::node::Side;
use super::raw_rb_tree::RawRbTree;

impl<K, V> RawRbTree<K, V> {
    /// Rotates the subtree rooted at `pivot` so that `pivot` moves down toward `toward`.
    ///
    /// `rotate(p, Side::Left)` is the classic left rotation: `p`'s right child rises into
    /// `p`'s place, `p` becomes its left child and the riser's former inner subtree is
    /// re-hung as `p`'s right subtree. The grandparent link (or the root) is updated to the
    /// riser. The in-order sequence of the subtree is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `pivot` has no child on the rising side.
    pub(crate) fn rotate(&mut self, pivot: Handle, toward: Side) {
        let rising_side = toward.opposite();
        let riser = self.node(pivot).child(rising_side).expect("rotation needs a child on the rising side");
        let inner = self.node(riser).child(toward);
        let above = self.node(pivot).parent();

        self.node_mut(pivot).set_child(rising_side, inner);
        if let Some(inner) = inner {
            self.node_mut(inner).set_parent(Some(pivot));
        }

        self.replace_child(above, pivot, Some(riser));
        self.node_mut(riser).set_parent(above);

        self.node_mut(riser).set_child(toward, Some(pivot));
        self.node_mut(pivot).set_parent(Some(riser));
    }
}
