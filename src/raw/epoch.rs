use core::sync::atomic::{AtomicU64, Ordering};

/// Source of tree identities. Zero is reserved for trees that were never modified.
static NEXT_TREE: AtomicU64 = AtomicU64::new(1);

fn next_tree() -> u64 {
    NEXT_TREE.fetch_add(1, Ordering::Relaxed)
}

/// Identity and structural-mutation counter of a tree.
///
/// Every insert, removal or clear advances the generation; a [`Position`](crate::Position)
/// captured under an older epoch is refused instead of being followed into a recycled slot.
///
/// The tree identity is drawn on the first mutation (so that `new` can stay `const`), which
/// means an identity of zero always belongs to an empty, untouched tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub(crate) struct Epoch {
    tree: u64,
    generation: u64,
}

/// How a position's epoch relates to the tree it is presented to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Provenance {
    Current,
    Outdated,
    Foreign,
}

impl Epoch {
    pub(crate) const ZERO: Self = Self { tree: 0, generation: 0 };

    /// An epoch with its own identity, for a tree that starts out populated.
    pub(crate) fn fresh() -> Self {
        Self {
            tree: next_tree(),
            generation: 0,
        }
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.tree == 0 {
            self.tree = next_tree();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    #[inline]
    pub(crate) const fn get(self) -> u64 {
        self.generation
    }

    /// Classifies `captured`, an epoch a position was stamped with, against this one.
    pub(crate) fn check(self, captured: Self) -> Provenance {
        if captured.tree == self.tree {
            if captured.generation == self.generation { Provenance::Current } else { Provenance::Outdated }
        } else if captured.tree == 0 {
            // Taken before the first mutation, from this tree or another untouched one.
            Provenance::Outdated
        } else {
            Provenance::Foreign
        }
    }
}
