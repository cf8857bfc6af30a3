use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;

use log::debug;

use crate::error::{InvariantViolation, TreeError};
use crate::position::Position;
use crate::raw::{RawIter, RawRbTree};

mod capacity;

/// An ordered set based on a red-black tree.
///
/// Each value occupies one node of the same tree [`RbTreeMap`] uses, with no value payload.
/// Inserting a value that is already present leaves the stored one in place. Positions work
/// as for the map: [`find`](RbTreeSet::find), [`begin`](RbTreeSet::begin) and the bounds
/// return a [`Position`] that goes stale once the set changes shape.
///
/// Changing a value's ordering while it is stored (through [`Cell`], [`RefCell`] and the
/// like) is a logic error. The set stays memory safe but its answers are unspecified.
///
/// # Examples
///
/// ```
/// use rbtree::RbTreeSet;
///
/// let mut tags = RbTreeSet::new();
/// for tag in ["rust", "tree", "rust", "alloc"] {
///     tags.insert(tag);
/// }
/// assert_eq!(tags.len(), 3);
/// assert!(tags.contains("tree"));
///
/// assert!(tags.remove("tree"));
/// assert_eq!(tags.iter().copied().collect::<Vec<_>>(), ["alloc", "rust"]);
///
/// let fixed = RbTreeSet::from([3, 1, 2]);
/// assert_eq!(fixed.first(), Some(&1));
/// ```
///
/// [`RbTreeMap`]: crate::RbTreeMap
/// [`Cell`]: core::cell::Cell
/// [`RefCell`]: core::cell::RefCell
pub struct RbTreeSet<T> {
    raw: RawRbTree<T, ()>,
}

/// An iterator over the items of a `RbTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeSet`].
/// See its documentation for more.
///
/// [`iter`]: RbTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: RawIter<'a, T, ()>,
}

/// An owning iterator over the items of a `RbTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RbTreeSet`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// [`into_iter`]: RbTreeSet#method.into_iter
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<(T, ())>,
}

impl<T> RbTreeSet<T> {
    /// An empty set. The node arena allocates on the first insert.
    #[must_use]
    pub const fn new() -> RbTreeSet<T> {
        RbTreeSet {
            raw: RawRbTree::new(),
        }
    }

    /// Drops every element and invalidates all positions.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Whether the set has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The smallest element.
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let mut ids: RbTreeSet<u32> = RbTreeSet::new();
    /// assert_eq!(ids.first(), None);
    /// ids.extend([40, 12, 77]);
    /// assert_eq!(ids.first(), Some(&12));
    /// assert_eq!(ids.last(), Some(&77));
    /// ```
    #[allow(clippy::must_use_candidate)]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.node(handle).key())
    }

    /// The largest element.
    #[allow(clippy::must_use_candidate)]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.node(handle).key())
    }

    /// Unlinks and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<T> {
        let first = self.raw.first()?;
        Some(self.raw.remove_node(first).0)
    }

    /// Unlinks and returns the largest element.
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let mut stack = RbTreeSet::from(['a', 'q', 'm']);
    /// assert_eq!(stack.pop_last(), Some('q'));
    /// assert_eq!(stack.pop_last(), Some('m'));
    /// assert_eq!(stack.len(), 1);
    /// ```
    pub fn pop_last(&mut self) -> Option<T> {
        let last = self.raw.last()?;
        Some(self.raw.remove_node(last).0)
    }

    /// Borrowing iterator in ascending order, double-ended.
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let primes = RbTreeSet::from([7, 2, 5, 3]);
    /// assert!(primes.iter().copied().eq([2, 3, 5, 7]));
    /// assert_eq!(primes.iter().next_back(), Some(&7));
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    /// Returns a position at the smallest element, or the end position if the set is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.first())
    }

    /// Returns the end position, one past the largest element.
    #[must_use]
    pub fn end(&self) -> Position {
        self.raw.position(None)
    }

    /// Steps `position` to the next element; the end wraps around to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StalePosition`] if the set changed since `position` was taken.
    /// A position handed out by another collection is refused with
    /// [`TreeError::ForeignPosition`].
    pub fn next_position(&self, position: Position) -> Result<Position, TreeError> {
        let at = self.raw.resolve(position)?;
        Ok(self.raw.position(self.raw.step_forward(at)))
    }

    /// Steps `position` to the previous element; the end wraps around to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StalePosition`] if the set changed since `position` was taken.
    /// A position handed out by another collection is refused with
    /// [`TreeError::ForeignPosition`].
    pub fn prev_position(&self, position: Position) -> Result<Position, TreeError> {
        let at = self.raw.resolve(position)?;
        Ok(self.raw.position(self.raw.step_backward(at)))
    }

    /// Returns the element at `position`.
    ///
    /// # Errors
    ///
    /// [`TreeError::StalePosition`] for a position taken before the set last changed,
    /// [`TreeError::ForeignPosition`] for a position from another collection and
    /// [`TreeError::EndPosition`] for the end position.
    pub fn get_at(&self, position: Position) -> Result<&T, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.node(handle).key())
    }

    /// Removes the element at `position` and returns it.
    ///
    /// # Errors
    ///
    /// As for [`get_at`](Self::get_at); the set is left untouched on error.
    pub fn remove_at(&mut self, position: Position) -> Result<T, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.remove_node(handle).0)
    }
}

impl<T: Ord> RbTreeSet<T> {
    /// Whether an element equal to `value` is stored. `value` may be a borrowed form of `T`.
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let users = RbTreeSet::from([String::from("ann"), String::from("joe")]);
    /// assert!(users.contains("ann"));
    /// assert!(!users.contains("bea"));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).is_some()
    }

    /// The stored element equal to `value`.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).map(|handle| self.raw.node(handle).key())
    }

    /// Links `value` into the tree unless an equal element is already stored.
    ///
    /// Returns `false` and drops `value` when an equal element exists; the stored element
    /// and every position stay as they were.
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let mut seen = RbTreeSet::new();
    /// assert!(seen.insert("GET /"));
    /// let at = seen.find("GET /");
    /// assert!(!seen.insert("GET /"));
    /// assert_eq!(seen.get_at(at), Ok(&"GET /"));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        if self.raw.search(&value).is_some() {
            return false;
        }
        self.raw.insert(value, ());
        true
    }

    /// Inserts each value as [`insert`](Self::insert) would, returning for every value the
    /// position of the element that now represents it and whether it was newly inserted.
    ///
    /// Positions stay valid until the set is next changed.
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let mut ports = RbTreeSet::from([443]);
    /// let outcome = ports.insert_many([80, 443, 80]);
    /// assert_eq!(outcome.iter().map(|&(_, new)| new).collect::<Vec<_>>(), [true, false, false]);
    /// assert_eq!(outcome[0].0, outcome[2].0);
    /// assert_eq!(ports.get_at(outcome[1].0), Ok(&443));
    /// ```
    pub fn insert_many<I>(&mut self, values: I) -> Vec<(Position, bool)>
    where
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter();
        let mut placed = Vec::with_capacity(values.size_hint().0);
        for value in values {
            placed.push(match self.raw.search(&value) {
                Some(handle) => (handle, false),
                None => (self.raw.insert(value, ()), true),
            });
        }
        placed
            .into_iter()
            .map(|(handle, inserted)| (self.raw.position(Some(handle)), inserted))
            .collect()
    }

    /// Unlinks and drops the element equal to `value`, reporting whether there was one.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to
    /// the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let mut set = RbTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value).map(|(value, ())| value)
    }

    /// Moves every element of `other` that `self` does not already contain into `self`.
    ///
    /// Elements already present in `self` stay in `other`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let mut a = RbTreeSet::from([1, 2]);
    /// let mut b = RbTreeSet::from([2, 3]);
    /// a.merge(&mut b);
    /// assert_eq!(a.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(b.iter().copied().collect::<Vec<_>>(), [2]);
    /// ```
    pub fn merge(&mut self, other: &mut Self) {
        debug!("merging {} values into a set of {}", other.len(), self.len());
        for (value, ()) in other.raw.drain_to_vec() {
            if self.raw.search(&value).is_some() {
                other.raw.insert(value, ());
            } else {
                self.raw.insert(value, ());
            }
        }
    }

    /// Returns a position at the element equal to `value`, or the end position.
    pub fn find<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.search(value))
    }

    /// Returns a position at the first element not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.lower_bound(value))
    }

    /// Returns a position at the first element greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.upper_bound(value))
    }

    /// Checks the red-black invariants of the underlying tree and returns its black height.
    ///
    /// # Errors
    ///
    /// Returns the first broken invariant found.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        self.raw.validate()
    }
}

impl<T: Clone> Clone for RbTreeSet<T> {
    fn clone(&self) -> Self {
        RbTreeSet {
            raw: self.raw.clone(),
        }
    }
}

impl<T: Hash> Hash for RbTreeSet<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for RbTreeSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RbTreeSet<T> {}

impl<T: PartialOrd> PartialOrd for RbTreeSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RbTreeSet<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for RbTreeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> Default for RbTreeSet<T> {
    fn default() -> Self {
        RbTreeSet::new()
    }
}

impl<T: Ord> FromIterator<T> for RbTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RbTreeSet::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RbTreeSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for RbTreeSet<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &item in iter {
            self.insert(item);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbTreeSet<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a RbTreeSet<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for RbTreeSet<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RbTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let set = RbTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(item, ())| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(item, ())| item)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<T> Default for Iter<'_, T> {
    /// Creates an empty `rbtree_set::Iter`.
    ///
    /// ```
    /// # use rbtree::rbtree_set;
    /// let iter: rbtree_set::Iter<'_, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            inner: RawIter::empty(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next().map(|(item, ())| item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(item, ())| item)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice().iter().map(|(item, ())| item)).finish()
    }
}

impl<T> Default for IntoIter<T> {
    fn default() -> Self {
        IntoIter {
            inner: Vec::new().into_iter(),
        }
    }
}
