use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;

use log::debug;

use crate::error::{InvariantViolation, TreeError};
use crate::position::Position;
use crate::raw::{RawIter, RawRbTree};

mod capacity;
mod entry;

pub use entry::{Entry, OccupiedEntry, VacantEntry};

/// An ordered map based on a [red-black tree].
///
/// Keys are kept sorted by their [`Ord`] implementation. Each entry owns one tree node,
/// colored red or black; the coloring rules (black root, no red node under a red parent,
/// equal black counts on every downward path) bound the height by twice the logarithm of
/// the size, so lookup, insertion and removal are O(log n) in the worst case.
///
/// Unlike `std::collections::BTreeMap`, [`insert`] keeps an existing value and reports whether
/// it inserted; use [`insert_or_assign`] to overwrite. Building a map from pairs (`from`,
/// `collect`, `extend`) follows [`insert`], so the first pair for a key wins.
///
/// Besides borrowing iterators the map hands out detached [`Position`]s, which can be stepped
/// in both directions and are checked against later modifications of the map.
///
/// Changing a key's ordering while it is stored (through [`Cell`], [`RefCell`] and the like)
/// is a logic error. The map stays memory safe but may then miss entries, return them out of
/// order, or fail [`validate`].
///
/// # Examples
///
/// ```
/// use rbtree::RbTreeMap;
///
/// let mut ports = RbTreeMap::new();
/// ports.insert(443, "https");
/// ports.insert(22, "ssh");
/// ports.insert(80, "http");
///
/// // the first registration of a port wins...
/// assert!(!ports.insert(80, "http-alt"));
/// assert_eq!(ports[&80], "http");
///
/// // ...unless it is explicitly replaced.
/// ports.insert_or_assign(80, "http-alt");
/// assert_eq!(ports.get(&80), Some(&"http-alt"));
///
/// ports.remove(&22);
/// assert_eq!(ports.get(&22), None);
///
/// let listing: Vec<String> = ports.iter().map(|(port, name)| format!("{port}/{name}")).collect();
/// assert_eq!(listing, ["80/http-alt", "443/https"]);
/// ```
///
/// An `RbTreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use rbtree::RbTreeMap;
///
/// let solar_distance = RbTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// assert_eq!(solar_distance.first_key_value(), Some((&"Earth", &1.0)));
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [`insert`]: RbTreeMap::insert
/// [`insert_or_assign`]: RbTreeMap::insert_or_assign
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
/// [`validate`]: RbTreeMap::validate
pub struct RbTreeMap<K, V> {
    raw: RawRbTree<K, V>,
}

/// An iterator over the entries of a `RbTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use rbtree::RbTreeMap;
///
/// let map = RbTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RbTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    inner: RawIter<'a, K, V>,
}

/// A mutable iterator over the entries of a `RbTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// [`iter_mut`]: RbTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    inner: alloc::vec::IntoIter<(&'a K, &'a mut V)>,
}

/// An owning iterator over the entries of a `RbTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RbTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `RbTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// [`keys`]: RbTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RbTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// [`values`]: RbTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `RbTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`RbTreeMap`]. See its
/// documentation for more.
///
/// [`values_mut`]: RbTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<K, V> RbTreeMap<K, V> {
    /// Makes a new, empty `RbTreeMap`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut map: RbTreeMap<u32, &str> = RbTreeMap::new();
    /// assert!(map.validate().is_ok());
    /// ```
    #[must_use]
    pub const fn new() -> RbTreeMap<K, V> {
        RbTreeMap {
            raw: RawRbTree::new(),
        }
    }

    /// Clears the map, removing all elements.
    ///
    /// Every position previously taken from the map becomes stale.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Number of entries, kept as a counter rather than counted.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::from([(1, 'x')]);
    /// map.insert(1, 'y');
    /// assert_eq!(map.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The entry with the smallest key, found by walking the left spine.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut deadlines = RbTreeMap::new();
    /// assert_eq!(deadlines.first_key_value(), None);
    /// deadlines.insert(20, "report");
    /// deadlines.insert(5, "invoice");
    /// assert_eq!(deadlines.first_key_value(), Some((&5, &"invoice")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|handle| {
            let node = self.raw.node(handle);
            (node.key(), node.value())
        })
    }

    /// The entry with the largest key.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let versions = RbTreeMap::from([((1, 2), "old"), ((1, 10), "new")]);
    /// assert_eq!(versions.last_key_value(), Some((&(1, 10), &"new")));
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|handle| {
            let node = self.raw.node(handle);
            (node.key(), node.value())
        })
    }

    /// Unlinks and returns the entry with the smallest key.
    ///
    /// Draining a map this way visits its keys in ascending order:
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut queue = RbTreeMap::from([(3, "c"), (1, "a"), (2, "b")]);
    /// let mut order = Vec::new();
    /// while let Some((priority, _)) = queue.pop_first() {
    ///     order.push(priority);
    /// }
    /// assert_eq!(order, [1, 2, 3]);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.raw.first()?;
        Some(self.raw.remove_node(first))
    }

    /// Unlinks and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.raw.last()?;
        Some(self.raw.remove_node(last))
    }

    /// Borrowing iterator over the entries in ascending key order.
    ///
    /// Each step follows parent links to the in-order neighbour, so no stack is kept. The
    /// iterator is double-ended and knows its exact length.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([('c', 3), ('a', 1), ('b', 2)]);
    /// let mut iter = map.iter();
    /// assert_eq!(iter.len(), 3);
    /// assert_eq!(iter.next(), Some((&'a', &1)));
    /// assert_eq!(iter.next_back(), Some((&'c', &3)));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// Iterator over the entries in ascending key order, with mutable access to the values.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut prices = RbTreeMap::from([("apple", 100), ("pear", 80)]);
    /// for (fruit, price) in prices.iter_mut() {
    ///     if fruit.starts_with('p') {
    ///         *price /= 2;
    ///     }
    /// }
    /// assert_eq!(prices["pear"], 40);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to set up, then O(1) per item.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.raw.entries_mut().into_iter(),
        }
    }

    /// The keys in ascending order.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(2, ()), (9, ()), (4, ())]);
    /// assert!(map.keys().copied().eq([2, 4, 9]));
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// The values, ordered by their keys.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// The values, ordered by their keys, for in-place editing.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut lines = RbTreeMap::from([(1, String::from("fn main()")), (2, String::from("{}"))]);
    /// for line in lines.values_mut() {
    ///     line.insert_str(0, "> ");
    /// }
    /// assert_eq!(lines[&1], "> fn main()");
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns a position at the first entry, or the end position if the map is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.first())
    }

    /// Returns the end position, one past the last entry.
    #[must_use]
    pub fn end(&self) -> Position {
        self.raw.position(None)
    }

    /// Steps `position` to the next entry in key order.
    ///
    /// The last entry steps to the end; the end wraps around to the first entry.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StalePosition`] if the map changed since `position` was taken.
    /// A position handed out by another collection is refused with
    /// [`TreeError::ForeignPosition`].
    pub fn next_position(&self, position: Position) -> Result<Position, TreeError> {
        let at = self.raw.resolve(position)?;
        Ok(self.raw.position(self.raw.step_forward(at)))
    }

    /// Steps `position` to the previous entry in key order.
    ///
    /// The first entry steps to the end; the end wraps around to the last entry.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StalePosition`] if the map changed since `position` was taken.
    /// A position handed out by another collection is refused with
    /// [`TreeError::ForeignPosition`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(1, 'a'), (2, 'b')]);
    /// let last = map.prev_position(map.end())?;
    /// assert_eq!(map.entry_at(last)?, (&2, &'b'));
    /// let first = map.prev_position(last)?;
    /// assert_eq!(map.prev_position(first)?, map.end());
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn prev_position(&self, position: Position) -> Result<Position, TreeError> {
        let at = self.raw.resolve(position)?;
        Ok(self.raw.position(self.raw.step_backward(at)))
    }

    /// Returns the key at `position`.
    ///
    /// # Errors
    ///
    /// [`TreeError::StalePosition`] for a position taken before the map last changed shape,
    /// [`TreeError::ForeignPosition`] for a position from another collection and
    /// [`TreeError::EndPosition`] for the end position.
    pub fn key_at(&self, position: Position) -> Result<&K, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.node(handle).key())
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// As for [`key_at`](Self::key_at).
    pub fn value_at(&self, position: Position) -> Result<&V, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.node(handle).value())
    }

    /// Returns the value at `position` for in-place modification.
    ///
    /// Updating a value does not change the shape of the map, so positions stay valid.
    ///
    /// # Errors
    ///
    /// As for [`key_at`](Self::key_at).
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::from([(1, 10)]);
    /// let position = map.find(&1);
    /// *map.value_at_mut(position)? += 5;
    /// assert_eq!(map.value_at(position)?, &15);
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn value_at_mut(&mut self, position: Position) -> Result<&mut V, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.node_mut(handle).value_mut())
    }

    /// Returns the key-value pair at `position`.
    ///
    /// # Errors
    ///
    /// As for [`key_at`](Self::key_at).
    pub fn entry_at(&self, position: Position) -> Result<(&K, &V), TreeError> {
        let handle = self.raw.resolve_node(position)?;
        let node = self.raw.node(handle);
        Ok((node.key(), node.value()))
    }

    /// Removes the entry at `position` and returns it.
    ///
    /// # Errors
    ///
    /// As for [`key_at`](Self::key_at); the map is left untouched on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::{RbTreeMap, TreeError};
    ///
    /// let mut map = RbTreeMap::from([(1, "a"), (2, "b")]);
    /// let position = map.find(&1);
    /// assert_eq!(map.remove_at(position), Ok((1, "a")));
    /// assert_eq!(map.remove_at(position), Err(TreeError::StalePosition));
    /// assert_eq!(map.remove_at(map.end()), Err(TreeError::EndPosition));
    /// ```
    pub fn remove_at(&mut self, position: Position) -> Result<(K, V), TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.remove_node(handle))
    }
}

impl<K: Ord, V> RbTreeMap<K, V> {
    /// Looks up the value stored under `key`.
    ///
    /// `key` can be any borrowed form of `K` (`&str` for `String` keys, say) as long as it
    /// orders the same way.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let hosts = RbTreeMap::from([(String::from("db"), 5432), (String::from("web"), 80)]);
    /// assert_eq!(hosts.get("db"), Some(&5432));
    /// assert_eq!(hosts.get("cache"), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).map(|handle| self.raw.node(handle).value())
    }

    /// Like [`get`](Self::get), but also returns the stored key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).map(|handle| {
            let node = self.raw.node(handle);
            (node.key(), node.value())
        })
    }

    /// Looks up the value stored under `key` for in-place editing.
    ///
    /// Editing a value does not change the tree, so positions stay valid.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut balances = RbTreeMap::from([("alice", 10), ("bob", 3)]);
    /// let bob = balances.find("bob");
    /// if let Some(balance) = balances.get_mut("bob") {
    ///     *balance += 7;
    /// }
    /// assert_eq!(balances.value_at(bob), Ok(&10));
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.search(key)?;
        Some(self.raw.node_mut(handle).value_mut())
    }

    /// Whether an entry with `key` is stored.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(key).is_some()
    }

    /// Returns the value for `key`, or [`TreeError::KeyNotFound`].
    ///
    /// # Errors
    ///
    /// Fails when no entry has the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::{RbTreeMap, TreeError};
    ///
    /// let map = RbTreeMap::from([("a", 1)]);
    /// assert_eq!(map.at("a"), Ok(&1));
    /// assert_eq!(map.at("b"), Err(TreeError::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).ok_or(TreeError::KeyNotFound)
    }

    /// Mutable counterpart of [`at`](Self::at).
    ///
    /// # Errors
    ///
    /// Fails when no entry has the key.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, TreeError>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_mut(key).ok_or(TreeError::KeyNotFound)
    }

    /// Inserts a key-value pair into the map if the key is not already present.
    ///
    /// Returns `true` if the pair was inserted. If the map already had this key, the map is
    /// left unchanged and `value` is dropped.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map[&37], "a");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.raw.search(&key).is_some() {
            return false;
        }
        self.raw.insert(key, value);
        true
    }

    /// Inserts a key-value pair, overwriting the value in place if the key is present.
    ///
    /// Returns `true` if a new entry was created. Overwriting keeps the stored key and does
    /// not change the shape of the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut map = RbTreeMap::new();
    /// assert!(map.insert_or_assign(37, "a"));
    /// assert!(!map.insert_or_assign(37, "b"));
    /// assert_eq!(map[&37], "b");
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> bool {
        match self.raw.search(&key) {
            Some(handle) => {
                *self.raw.node_mut(handle).value_mut() = value;
                false
            }
            None => {
                self.raw.insert(key, value);
                true
            }
        }
    }

    /// Inserts each pair as [`insert`](Self::insert) would and reports, per pair, where its
    /// key now lives and whether the pair was inserted.
    ///
    /// A rejected pair's position names the entry that kept its key. Every returned position is
    /// valid until the map is next changed.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut routes = RbTreeMap::from([("/", "index")]);
    /// let outcome = routes.insert_many([("/login", "auth"), ("/", "home"), ("/login", "sso")]);
    ///
    /// let inserted: Vec<bool> = outcome.iter().map(|&(_, inserted)| inserted).collect();
    /// assert_eq!(inserted, [true, false, false]);
    /// assert_eq!(routes.entry_at(outcome[1].0)?, (&"/", &"index"));
    /// assert_eq!(routes.value_at(outcome[2].0)?, &"auth");
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn insert_many<I>(&mut self, entries: I) -> Vec<(Position, bool)>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let entries = entries.into_iter();
        let mut placed = Vec::with_capacity(entries.size_hint().0);
        for (key, value) in entries {
            placed.push(match self.raw.search(&key) {
                Some(handle) => (handle, false),
                None => (self.raw.insert(key, value), true),
            });
        }
        // Insertion relinks nodes but never moves an entry, so every handle is still current.
        placed
            .into_iter()
            .map(|(handle, inserted)| (self.raw.position(Some(handle)), inserted))
            .collect()
    }

    /// Returns the value for `key`, inserting `V::default()` first if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut counts: RbTreeMap<&str, u32> = RbTreeMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_default(word) += 1;
    /// }
    /// assert_eq!(counts[&"a"], 2);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Unlinks the entry for `key`, rebalances, and returns its value.
    ///
    /// Removing an absent key is a no-op that returns `None`.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut leases = RbTreeMap::from([(7, "host-a"), (9, "host-b")]);
    /// assert_eq!(leases.remove(&7), Some("host-a"));
    /// assert_eq!(leases.remove(&7), None);
    /// assert!(leases.validate().is_ok());
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).map(|(_, value)| value)
    }

    /// Like [`remove`](Self::remove), but also hands back the stored key.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Moves every entry of `other` whose key is absent from `self` into `self`.
    ///
    /// Entries whose key `self` already has stay in `other`. Positions into either map are
    /// invalidated.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut a = RbTreeMap::from([(1, "a"), (2, "b")]);
    /// let mut b = RbTreeMap::from([(2, "x"), (3, "c")]);
    /// a.merge(&mut b);
    ///
    /// assert_eq!(a.into_iter().collect::<Vec<_>>(), [(1, "a"), (2, "b"), (3, "c")]);
    /// assert_eq!(b.into_iter().collect::<Vec<_>>(), [(2, "x")]);
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        debug!("merging {} entries into a map of {}", other.len(), self.len());
        for (key, value) in other.raw.drain_to_vec() {
            if self.raw.search(&key).is_some() {
                other.raw.insert(key, value);
            } else {
                self.raw.insert(key, value);
            }
        }
    }

    /// Finds the slot for `key` once, for a later read, insert, overwrite or removal.
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let mut letters: RbTreeMap<char, usize> = RbTreeMap::new();
    /// for c in "abracadabra".chars() {
    ///     *letters.entry(c).or_insert(0) += 1;
    /// }
    /// assert_eq!(letters[&'a'], 5);
    /// assert_eq!(letters[&'r'], 2);
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        match self.raw.search(&key) {
            Some(handle) => Entry::Occupied(OccupiedEntry {
                handle,
                tree: &mut self.raw,
            }),
            None => Entry::Vacant(VacantEntry {
                key,
                tree: &mut self.raw,
            }),
        }
    }

    /// Returns a position at the entry for `key`, or the end position if there is none.
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.search(key))
    }

    /// Returns a position at the first entry whose key is not less than `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(10, 'a'), (20, 'b')]);
    /// assert_eq!(map.key_at(map.lower_bound(&15))?, &20);
    /// assert_eq!(map.key_at(map.lower_bound(&20))?, &20);
    /// assert!(map.lower_bound(&21).is_end());
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.lower_bound(key))
    }

    /// Returns a position at the first entry whose key is greater than `key`.
    pub fn upper_bound<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.upper_bound(key))
    }

    /// Checks the red-black invariants of the underlying tree and returns its black height.
    ///
    /// This walks the whole tree and is meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant found.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map: RbTreeMap<_, _> = (1..=7).map(|k| (k, ())).collect();
    /// assert_eq!(map.validate(), Ok(2));
    /// ```
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        self.raw.validate()
    }
}

impl<K: Clone, V: Clone> Clone for RbTreeMap<K, V> {
    fn clone(&self) -> Self {
        RbTreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for RbTreeMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RbTreeMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RbTreeMap<K, V> {}

impl<K: PartialOrd, V: PartialOrd> PartialOrd for RbTreeMap<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord> Ord for RbTreeMap<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RbTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RbTreeMap<K, V> {
    fn default() -> Self {
        RbTreeMap::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for RbTreeMap<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RbTreeMap::new();
        map.extend(iter);
        map
    }
}

/// Pairs go through [`insert`](RbTreeMap::insert): a key already present, in the map or
/// earlier in `iter`, keeps its value and the later pair is dropped.
impl<K: Ord, V> Extend<(K, V)> for RbTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Ord + Copy, V: Copy> Extend<(&'a K, &'a V)> for RbTreeMap<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a RbTreeMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut RbTreeMap<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for RbTreeMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMap;
    ///
    /// let map = RbTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for RbTreeMap<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `RbTreeMap`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RbTreeMap<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `rbtree_map::Iter`.
    ///
    /// ```
    /// # use rbtree::rbtree_map;
    /// let iter: rbtree_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            inner: RawIter::empty(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.inner.len()).finish()
    }
}

impl<K, V> Default for IterMut<'_, K, V> {
    /// Creates an empty `rbtree_map::IterMut`.
    ///
    /// ```
    /// # use rbtree::rbtree_map;
    /// let iter: rbtree_map::IterMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            inner: Vec::new().into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    fn default() -> Self {
        IntoIter {
            inner: Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    fn default() -> Self {
        Keys {
            inner: Iter::default(),
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for Values<'_, K, V> {
    fn default() -> Self {
        Values {
            inner: Iter::default(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.len()).finish()
    }
}

impl<K, V> Default for ValuesMut<'_, K, V> {
    fn default() -> Self {
        ValuesMut {
            inner: IterMut::default(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn remove_at_promotes_successor_without_disturbing_neighbours() {
        let mut map: RbTreeMap<i32, i32> = (0..32).map(|k| (k, k * 100)).collect();
        let root = map.raw.root().expect("non-empty");
        let root_key = *map.raw.node(root).key();
        let position = map.raw.position(Some(root));

        assert_eq!(map.remove_at(position), Ok((root_key, root_key * 100)));
        assert_eq!(map.get(&(root_key + 1)), Some(&((root_key + 1) * 100)));
        assert_eq!(map.validate().map(|_| ()), Ok(()));
        assert_eq!(map.len(), 31);
    }

    #[test]
    fn iter_mut_reaches_every_value_once() {
        let mut map: RbTreeMap<i32, i32> = (0..100).map(|k| (k, 0)).collect();
        for (_, value) in &mut map {
            *value += 1;
        }
        assert!(map.values().all(|&v| v == 1));
        assert_eq!(map.iter_mut().rev().map(|(k, _)| *k).next(), Some(99));
    }

    #[test]
    fn merge_leaves_clashing_entries_behind() {
        let mut a: RbTreeMap<i32, char> = RbTreeMap::from([(1, 'a'), (3, 'a')]);
        let mut b: RbTreeMap<i32, char> = RbTreeMap::from([(1, 'b'), (2, 'b'), (3, 'b'), (4, 'b')]);
        a.merge(&mut b);
        assert_eq!(a.iter().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), [(1, 'a'), (2, 'b'), (3, 'a'), (4, 'b')]);
        assert_eq!(b.keys().copied().collect::<Vec<_>>(), [1, 3]);
        assert!(a.validate().is_ok());
        assert!(b.validate().is_ok());
    }
}
