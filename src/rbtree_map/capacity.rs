use super::RbTreeMap;
use crate::raw::RawRbTree;

impl<K, V> RbTreeMap<K, V> {
    /// Creates an empty map whose node arena has room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map: RbTreeMap<i32, i32> = RbTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RbTreeMap {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of entries the map can hold without reallocating its node arena.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map: RbTreeMap<i32, i32> = RbTreeMap::with_capacity(32);
    /// assert!(map.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
