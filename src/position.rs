use core::fmt;
use core::hash::{Hash, Hasher};

use crate::raw::{Epoch, Handle};

/// A detached cursor into one of this crate's collections.
///
/// A position names either an entry or the end sentinel, which sits one past the last entry
/// and one before the first. It borrows nothing, so the collection stays freely usable while
/// positions are held, and it is checked on every use: once the collection is modified
/// structurally (insert, remove, clear, merge) every older position is refused with
/// [`TreeError::StalePosition`](crate::TreeError::StalePosition).
/// A position is only meaningful to the collection that produced it; any other collection
/// refuses it with [`TreeError::ForeignPosition`](crate::TreeError::ForeignPosition).
///
/// Positions compare equal when they name the same entry (or are both the end).
///
/// # Examples
///
/// ```
/// use rbtree::{RbTreeMap, TreeError};
///
/// let mut map = RbTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
///
/// let mut position = map.begin();
/// let mut keys = Vec::new();
/// while position != map.end() {
///     keys.push(*map.key_at(position)?);
///     position = map.next_position(position)?;
/// }
/// assert_eq!(keys, [1, 2, 3]);
///
/// // Stepping forward from the end wraps around to the first entry.
/// assert_eq!(map.next_position(map.end())?, map.begin());
///
/// // Any insertion or removal invalidates positions taken earlier.
/// let two = map.find(&2);
/// map.insert(4, "d");
/// assert_eq!(map.key_at(two), Err(TreeError::StalePosition));
/// # Ok::<(), TreeError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Position {
    node: Option<Handle>,
    epoch: Epoch,
}

impl Position {
    pub(crate) const fn new(node: Option<Handle>, epoch: Epoch) -> Self {
        Self { node, epoch }
    }

    pub(crate) const fn node(self) -> Option<Handle> {
        self.node
    }

    pub(crate) const fn epoch(self) -> Epoch {
        self.epoch
    }

    /// Returns `true` if this is an end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use rbtree::RbTreeSet;
    ///
    /// let set = RbTreeSet::from([1]);
    /// assert!(!set.begin().is_end());
    /// assert!(set.end().is_end());
    /// assert!(set.find(&2).is_end());
    /// ```
    #[must_use]
    pub const fn is_end(self) -> bool {
        self.node.is_none()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.node {
            Some(node) => write!(f, "Position({node:?} @ {})", self.epoch.get()),
            None => write!(f, "Position(end @ {})", self.epoch.get()),
        }
    }
}
