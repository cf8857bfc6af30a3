use crate::error::InvariantViolation;

use super::handle::Handle;
use super::node::Color;
use super::raw_rb_tree::RawRbTree;

impl<K: Ord, V> RawRbTree<K, V> {
    /// Checks every structural invariant and returns the black height.
    ///
    /// An absent link counts zero, so an empty tree has black height 0 and a lone black root
    /// has black height 1.
    pub(crate) fn validate(&self) -> Result<usize, InvariantViolation> {
        let Some(root) = self.root() else {
            return if self.len() == 0 && self.nodes().is_empty() {
                Ok(0)
            } else {
                Err(InvariantViolation::LengthMismatch {
                    expected: self.len(),
                    found: 0,
                })
            };
        };
        if self.node(root).parent().is_some() {
            return Err(InvariantViolation::RootHasParent);
        }
        if self.node(root).is_red() {
            return Err(InvariantViolation::RedRoot);
        }

        let mut count = 0;
        let black_height = self.check_subtree(root, &mut count)?;
        if count != self.len() || count != self.nodes().len() {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len(),
                found: count,
            });
        }

        let mut previous = self.first();
        let mut current = previous.and_then(|h| self.successor(h));
        while let (Some(before), Some(after)) = (previous, current) {
            if self.node(before).key() > self.node(after).key() {
                return Err(InvariantViolation::OutOfOrder);
            }
            previous = current;
            current = self.successor(after);
        }

        Ok(black_height)
    }

    /// Black height of the subtree at `handle`, counting visited nodes into `count`.
    fn check_subtree(&self, handle: Handle, count: &mut usize) -> Result<usize, InvariantViolation> {
        *count += 1;
        let node = self.node(handle);
        let mut heights = [0; 2];
        for (height, child) in heights.iter_mut().zip([node.left(), node.right()]) {
            let Some(child) = child else {
                continue;
            };
            if self.node(child).parent() != Some(handle) {
                return Err(InvariantViolation::BrokenParentLink);
            }
            if node.is_red() && self.node(child).is_red() {
                return Err(InvariantViolation::RedRedEdge);
            }
            *height = self.check_subtree(child, count)?;
        }
        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { left, right });
        }
        Ok(left + usize::from(node.color() == Color::Black))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::node::Side;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> RawRbTree<i32, ()> {
        let mut tree = RawRbTree::new();
        for key in keys {
            tree.insert(key, ());
        }
        tree
    }

    #[test]
    fn single_black_root_has_height_one() {
        assert_eq!(tree_of([1]).validate(), Ok(1));
    }

    #[test]
    fn red_root_is_reported() {
        let mut tree = tree_of([1, 2, 3]);
        let root = tree.root().expect("non-empty");
        tree.set_color(root, Color::Red);
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    fn red_red_edge_is_reported() {
        // 2 is black over black 1 and 3; 0 hangs red under 1.
        let mut tree = tree_of([2, 1, 3, 0]);
        let root = tree.root().expect("non-empty");
        let left = tree.node(root).left().expect("two children");
        assert_eq!(tree.node(left).color(), Color::Black);
        tree.set_color(left, Color::Red);
        assert_eq!(tree.validate(), Err(InvariantViolation::RedRedEdge));
    }

    #[test]
    fn uneven_black_height_is_reported() {
        let mut tree = tree_of([2, 1, 3]);
        let root = tree.root().expect("non-empty");
        let left = tree.node(root).left().expect("two children");
        tree.set_color(left, Color::Black);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::BlackHeightMismatch { left: 1, right: 0 })
        );
    }

    #[test]
    fn broken_parent_link_is_reported() {
        let mut tree = tree_of([2, 1, 3]);
        let root = tree.root().expect("non-empty");
        let right = tree.node(root).right().expect("two children");
        let left = tree.node(root).left().expect("two children");
        tree.node_mut(right).set_parent(Some(left));
        assert_eq!(tree.validate(), Err(InvariantViolation::BrokenParentLink));
    }

    #[test]
    fn out_of_order_keys_are_reported() {
        let mut tree = tree_of([2, 1, 3]);
        let root = tree.root().expect("non-empty");
        let left = tree.node(root).left().expect("two children");
        tree.node_mut(left).replace_entry(5, ());
        assert_eq!(tree.validate(), Err(InvariantViolation::OutOfOrder));
    }

    #[test]
    fn detached_node_is_a_length_mismatch() {
        let mut tree = tree_of([2, 1, 3]);
        let root = tree.root().expect("non-empty");
        tree.node_mut(root).set_child(Side::Right, None);
        assert_eq!(
            tree.validate(),
            Err(InvariantViolation::LengthMismatch { expected: 3, found: 2 })
        );
    }
}
