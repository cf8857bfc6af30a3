use super::RbTreeSet;
use crate::raw::RawRbTree;

impl<T> RbTreeSet<T> {
    /// Creates an empty set whose node arena has room for at least `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let set: RbTreeSet<i32> = RbTreeSet::with_capacity(32);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RbTreeSet {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of elements the set can hold without reallocating its node arena.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
