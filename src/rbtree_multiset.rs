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

/// An ordered multiset based on a red-black tree.
///
/// Like [`RbTreeSet`], but equal values may be stored any number of times. Equal values are
/// kept in insertion order: a newly inserted value lands after every equal value already in
/// the multiset, and [`find`], [`remove_one`] and iteration all see the earliest-inserted
/// one first.
///
/// # Examples
///
/// ```
/// use rbtree::RbTreeMultiset;
///
/// let mut rolls = RbTreeMultiset::new();
/// for roll in [3, 6, 1, 6, 6, 2] {
///     rolls.insert(roll);
/// }
///
/// assert_eq!(rolls.len(), 6);
/// assert_eq!(rolls.count(&6), 3);
/// assert_eq!(rolls.remove_all(&6), 3);
/// assert_eq!(rolls.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
/// ```
///
/// Values that compare equal but are distinguishable come back out in insertion order:
///
/// ```
/// use core::cmp::Ordering;
/// use rbtree::RbTreeMultiset;
///
/// #[derive(Debug, PartialEq, Eq)]
/// struct Job { priority: u8, name: &'static str }
///
/// impl Ord for Job {
///     fn cmp(&self, other: &Self) -> Ordering {
///         self.priority.cmp(&other.priority)
///     }
/// }
///
/// impl PartialOrd for Job {
///     fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
///         Some(self.cmp(other))
///     }
/// }
///
/// let mut queue = RbTreeMultiset::new();
/// queue.insert(Job { priority: 1, name: "first" });
/// queue.insert(Job { priority: 0, name: "urgent" });
/// queue.insert(Job { priority: 1, name: "second" });
///
/// let names: Vec<_> = queue.into_iter().map(|job| job.name).collect();
/// assert_eq!(names, ["urgent", "first", "second"]);
/// ```
///
/// [`RbTreeSet`]: crate::RbTreeSet
/// [`find`]: RbTreeMultiset::find
/// [`remove_one`]: RbTreeMultiset::remove_one
pub struct RbTreeMultiset<T> {
    raw: RawRbTree<T, ()>,
}

/// An iterator over the values of a `RbTreeMultiset`.
///
/// This `struct` is created by the [`iter`] method on [`RbTreeMultiset`].
///
/// [`iter`]: RbTreeMultiset::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: RawIter<'a, T, ()>,
}

/// An owning iterator over the values of a `RbTreeMultiset` in ascending order.
pub struct IntoIter<T> {
    inner: alloc::vec::IntoIter<(T, ())>,
}

impl<T> RbTreeMultiset<T> {
    /// Makes a new, empty `RbTreeMultiset`.
    #[must_use]
    pub const fn new() -> RbTreeMultiset<T> {
        RbTreeMultiset {
            raw: RawRbTree::new(),
        }
    }

    /// Creates an empty multiset whose node arena has room for at least `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RbTreeMultiset {
            raw: RawRbTree::with_capacity(capacity),
        }
    }

    /// Returns the number of values the multiset can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Clears the multiset, removing all values.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the number of values, counting repeats.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Returns the smallest value (the earliest-inserted of equal smallest values).
    #[allow(clippy::must_use_candidate)]
    pub fn first(&self) -> Option<&T> {
        self.raw.first().map(|handle| self.raw.node(handle).key())
    }

    /// Returns the largest value (the latest-inserted of equal largest values).
    #[allow(clippy::must_use_candidate)]
    pub fn last(&self) -> Option<&T> {
        self.raw.last().map(|handle| self.raw.node(handle).key())
    }

    /// Gets an iterator over all values in ascending order, equal values in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.raw.iter(),
        }
    }

    #[must_use]
    pub fn begin(&self) -> Position {
        self.raw.position(self.raw.first())
    }

    #[must_use]
    pub fn end(&self) -> Position {
        self.raw.position(None)
    }

    /// Steps `position` to the next value; the end wraps around to the first value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StalePosition`] if the multiset changed since `position` was taken.
    /// A position handed out by another collection is refused with
    /// [`TreeError::ForeignPosition`].
    pub fn next_position(&self, position: Position) -> Result<Position, TreeError> {
        let at = self.raw.resolve(position)?;
        Ok(self.raw.position(self.raw.step_forward(at)))
    }

    /// Steps `position` to the previous value; the end wraps around to the last value.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StalePosition`] if the multiset changed since `position` was taken.
    /// A position handed out by another collection is refused with
    /// [`TreeError::ForeignPosition`].
    pub fn prev_position(&self, position: Position) -> Result<Position, TreeError> {
        let at = self.raw.resolve(position)?;
        Ok(self.raw.position(self.raw.step_backward(at)))
    }

    /// Returns the value at `position`.
    ///
    /// # Errors
    ///
    /// [`TreeError::StalePosition`] for a position taken before the multiset last changed,
    /// [`TreeError::ForeignPosition`] for a position from another collection and
    /// [`TreeError::EndPosition`] for the end position.
    pub fn get_at(&self, position: Position) -> Result<&T, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.node(handle).key())
    }

    /// Removes exactly the value at `position`, leaving equal values in place.
    ///
    /// # Errors
    ///
    /// As for [`get_at`](Self::get_at); the multiset is left untouched on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMultiset;
    ///
    /// let mut set = RbTreeMultiset::from([1, 1, 1, 4]);
    /// while !set.find(&1).is_end() {
    ///     set.remove_at(set.find(&1))?;
    /// }
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [4]);
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn remove_at(&mut self, position: Position) -> Result<T, TreeError> {
        let handle = self.raw.resolve_node(position)?;
        Ok(self.raw.remove_node(handle).0)
    }
}

impl<T: Ord> RbTreeMultiset<T> {
    /// Adds a value, even if equal values are already present, and returns its position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMultiset;
    ///
    /// let mut set = RbTreeMultiset::new();
    /// set.insert(5);
    /// let second = set.insert(5);
    /// assert_eq!(set.next_position(set.find(&5))?, second);
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn insert(&mut self, value: T) -> Position {
        let handle = self.raw.insert(value, ());
        self.raw.position(Some(handle))
    }

    /// Adds every value in turn, each after the equal values already present, and returns
    /// their positions in input order.
    ///
    /// The returned positions stay valid until the multiset is next changed.
    ///
    /// ```
    /// use rbtree::RbTreeMultiset;
    ///
    /// let mut readings = RbTreeMultiset::from([20]);
    /// let placed = readings.insert_many([20, 18, 20]);
    /// assert_eq!(readings.count(&20), 3);
    /// assert_eq!(readings.prev_position(placed[0])?, readings.find(&20));
    /// assert_eq!(readings.next_position(placed[0])?, placed[2]);
    /// assert_eq!(readings.begin(), placed[1]);
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn insert_many<I>(&mut self, values: I) -> Vec<Position>
    where
        I: IntoIterator<Item = T>,
    {
        let handles: Vec<_> = values.into_iter().map(|value| self.raw.insert(value, ())).collect();
        handles.into_iter().map(|handle| self.raw.position(Some(handle))).collect()
    }

    /// Whether at least one value equal to `value` is stored.
    ///
    /// ```
    /// use rbtree::RbTreeMultiset;
    ///
    /// let mut queue = RbTreeMultiset::from([2, 2]);
    /// queue.remove_one(&2);
    /// assert!(queue.contains(&2));
    /// queue.remove_one(&2);
    /// assert!(!queue.contains(&2));
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.search(value).is_some()
    }

    /// Returns how many stored values are equal to `value`.
    ///
    /// # Complexity
    ///
    /// O(log n + k) for k matching values.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.count(value)
    }

    /// Returns a position at the earliest-inserted value equal to `value`, or the end position.
    pub fn find<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.search(value))
    }

    /// Returns a position at the first value not less than `value`.
    pub fn lower_bound<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.lower_bound(value))
    }

    /// Returns a position at the first value greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Position
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.position(self.raw.upper_bound(value))
    }

    /// Returns the half-open run of positions holding values equal to `value`.
    ///
    /// Both positions are equal when no value matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeMultiset;
    ///
    /// let set = RbTreeMultiset::from([1, 2, 2, 3]);
    /// let (mut at, end) = set.equal_range(&2);
    /// let mut run = 0;
    /// while at != end {
    ///     assert_eq!(set.get_at(at)?, &2);
    ///     run += 1;
    ///     at = set.next_position(at)?;
    /// }
    /// assert_eq!(run, 2);
    /// # Ok::<(), rbtree::TreeError>(())
    /// ```
    pub fn equal_range<Q>(&self, value: &Q) -> (Position, Position)
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        (self.lower_bound(value), self.upper_bound(value))
    }

    /// Removes the earliest-inserted value equal to `value` and returns it.
    pub fn remove_one<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(value).map(|(value, ())| value)
    }

    /// Removes every value equal to `value` and returns how many there were.
    pub fn remove_all<Q>(&mut self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut removed = 0;
        while self.raw.remove(value).is_some() {
            removed += 1;
        }
        removed
    }

    /// Moves every value of `other` into `self`, leaving `other` empty.
    ///
    /// Values from `other` are placed after the equal values already in `self`.
    pub fn merge(&mut self, other: &mut Self) {
        debug!("merging {} values into a multiset of {}", other.len(), self.len());
        for (value, ()) in other.raw.drain_to_vec() {
            self.raw.insert(value, ());
        }
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

impl<T: Clone> Clone for RbTreeMultiset<T> {
    fn clone(&self) -> Self {
        RbTreeMultiset {
            raw: self.raw.clone(),
        }
    }
}

impl<T: Hash> Hash for RbTreeMultiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

impl<T: PartialEq> PartialEq for RbTreeMultiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for RbTreeMultiset<T> {}

impl<T: PartialOrd> PartialOrd for RbTreeMultiset<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RbTreeMultiset<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for RbTreeMultiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for RbTreeMultiset<T> {
    fn default() -> Self {
        RbTreeMultiset::new()
    }
}

impl<T: Ord> FromIterator<T> for RbTreeMultiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RbTreeMultiset::new();
        set.extend(iter);
        set
    }
}

impl<T: Ord> Extend<T> for RbTreeMultiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.insert(item);
        }
    }
}

impl<'a, T: 'a + Ord + Copy> Extend<&'a T> for RbTreeMultiset<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &item in iter {
            self.insert(item);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbTreeMultiset<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a RbTreeMultiset<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for RbTreeMultiset<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

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
