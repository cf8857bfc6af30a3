use core::fmt;
use core::mem;

use crate::raw::{Handle, RawRbTree};

/// The slot for one key of an [`RbTreeMap`](crate::RbTreeMap), found by
/// [`entry`](crate::RbTreeMap::entry) with a single descent.
///
/// A vacant entry remembers the key; an occupied one remembers the node holding it, so
/// reading, overwriting or removing it does not search again.
///
/// # Examples
///
/// ```
/// use rbtree::RbTreeMap;
/// use rbtree::rbtree_map::Entry;
///
/// let mut stock = RbTreeMap::new();
/// for item in ["bolt", "nut", "bolt"] {
///     match stock.entry(item) {
///         Entry::Vacant(slot) => {
///             slot.insert(1);
///         }
///         Entry::Occupied(mut slot) => *slot.get_mut() += 1,
///     }
/// }
/// assert_eq!(stock["bolt"], 2);
/// assert_eq!(stock["nut"], 1);
/// ```
pub enum Entry<'a, K: 'a, V: 'a> {
    /// The key is absent.
    Vacant(VacantEntry<'a, K, V>),

    /// The key is present.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Vacant(v) => f.debug_tuple("Entry").field(v).finish(),
            Entry::Occupied(o) => f.debug_tuple("Entry").field(o).finish(),
        }
    }
}

/// An [`Entry`] whose key is not in the map yet.
pub struct VacantEntry<'a, K, V> {
    pub(crate) key: K,
    pub(crate) tree: &'a mut RawRbTree<K, V>,
}

impl<K: fmt::Debug, V> fmt::Debug for VacantEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VacantEntry").field("key", &self.key).finish()
    }
}

/// An [`Entry`] whose key is already stored, pinned to its node.
pub struct OccupiedEntry<'a, K, V> {
    pub(crate) handle: Handle,
    pub(crate) tree: &'a mut RawRbTree<K, V>,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OccupiedEntry<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupiedEntry").field("key", self.key()).field("value", self.get()).finish()
    }
}

impl<'a, K: Ord, V> Entry<'a, K, V> {
    /// Returns the stored value, first inserting `default` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut limits: RbTreeMap<&str, u32> = RbTreeMap::new();
    /// *limits.entry("disk").or_insert(10) += 5;
    /// limits.entry("disk").or_insert(99);
    /// assert_eq!(limits["disk"], 15);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default),
        }
    }

    /// Like [`or_insert`](Self::or_insert), but only builds the value when the key is absent.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut names: RbTreeMap<u8, String> = RbTreeMap::new();
    /// names.entry(7).or_insert_with(|| "seven".to_owned());
    /// names.entry(7).or_insert_with(|| unreachable!());
    /// assert_eq!(names[&7], "seven");
    /// ```
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(default()),
        }
    }

    /// The key this entry was looked up with, or the stored key when occupied.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(o) => o.key(),
            Entry::Vacant(v) => v.key(),
        }
    }

    /// Applies `f` to the stored value if there is one, and hands the entry back.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut hits: RbTreeMap<&str, u32> = RbTreeMap::new();
    /// for page in ["/", "/about", "/"] {
    ///     hits.entry(page).and_modify(|n| *n += 1).or_insert(1);
    /// }
    /// assert_eq!(hits["/"], 2);
    /// assert_eq!(hits["/about"], 1);
    /// ```
    #[allow(clippy::return_self_not_must_use)]
    pub fn and_modify<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        if let Entry::Occupied(ref mut o) = self {
            f(o.get_mut());
        }
        self
    }
}

impl<'a, K: Ord, V: Default> Entry<'a, K, V> {
    /// Returns the stored value, first inserting `V::default()` if the key is absent.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut groups: RbTreeMap<char, Vec<&str>> = RbTreeMap::new();
    /// for word in ["apple", "avocado", "banana"] {
    ///     groups.entry(word.chars().next().unwrap()).or_default().push(word);
    /// }
    /// assert_eq!(groups[&'a'], ["apple", "avocado"]);
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn or_default(self) -> &'a mut V {
        match self {
            Entry::Occupied(o) => o.into_mut(),
            Entry::Vacant(v) => v.insert(V::default()),
        }
    }
}

impl<'a, K: Ord, V> VacantEntry<'a, K, V> {
    /// The key that [`insert`](Self::insert) will store.
    #[allow(clippy::must_use_candidate)]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Gives the key back without touching the map.
    #[allow(clippy::must_use_candidate)]
    pub fn into_key(self) -> K {
        self.key
    }

    /// Stores `value` under this entry's key and returns it for further editing.
    ///
    /// The new node is linked in and the tree rebalanced, so positions previously taken from
    /// the map become stale.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(self, value: V) -> &'a mut V {
        let handle = self.tree.insert(self.key, value);
        self.tree.node_mut(handle).value_mut()
    }
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    #[must_use]
    pub fn key(&self) -> &K {
        self.tree.node(self.handle).key()
    }

    #[must_use]
    pub fn get(&self) -> &V {
        self.tree.node(self.handle).value()
    }

    /// Borrows the stored value mutably for as long as the entry is borrowed.
    ///
    /// Use [`into_mut`](Self::into_mut) to get a reference tied to the map instead.
    pub fn get_mut(&mut self) -> &mut V {
        self.tree.node_mut(self.handle).value_mut()
    }

    /// Consumes the entry, returning a reference to the value that lives as long as the map
    /// borrow.
    #[must_use = "`self` will be dropped if the result is not used"]
    pub fn into_mut(self) -> &'a mut V {
        self.tree.node_mut(self.handle).value_mut()
    }
}

impl<K: Ord, V> OccupiedEntry<'_, K, V> {
    /// Unlinks the node and returns the stored key and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    /// use rbtree::rbtree_map::Entry;
    ///
    /// let mut sessions = RbTreeMap::from([(17, "alice"), (23, "bob")]);
    /// if let Entry::Occupied(session) = sessions.entry(17) {
    ///     assert_eq!(session.remove_entry(), (17, "alice"));
    /// }
    /// assert!(!sessions.contains_key(&17));
    /// assert!(sessions.validate().is_ok());
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn remove_entry(self) -> (K, V) {
        self.tree.remove_node(self.handle)
    }

    /// Overwrites the stored value in place and returns the previous one.
    ///
    /// The tree shape is untouched, so existing positions stay valid.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    /// use rbtree::rbtree_map::Entry;
    ///
    /// let mut map = RbTreeMap::from([("mode", "fast")]);
    /// let at = map.find("mode");
    /// if let Entry::Occupied(mut slot) = map.entry("mode") {
    ///     assert_eq!(slot.insert("safe"), "fast");
    /// }
    /// assert_eq!(map.value_at(at), Ok(&"safe"));
    /// ```
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(self.get_mut(), value)
    }

    /// Unlinks the node and returns only the value.
    #[allow(clippy::must_use_candidate)]
    pub fn remove(self) -> V {
        self.remove_entry().1
    }
}
