use core::fmt;

/// Failure of a key- or position-based access.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TreeError {
    /// The requested key is not present.
    KeyNotFound,
    /// The position was taken before the tree last changed shape.
    ///
    /// Inserting, removing, clearing or merging invalidates every position previously handed
    /// out by that collection, including its end position.
    StalePosition,
    /// The position was handed out by a different collection.
    ForeignPosition,
    /// The end position does not refer to an entry.
    EndPosition,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::KeyNotFound => "key not found",
            Self::StalePosition => "position refers to an outdated tree",
            Self::ForeignPosition => "position belongs to a different tree",
            Self::EndPosition => "the end position does not refer to an entry",
        })
    }
}

impl core::error::Error for TreeError {}

/// A broken red-black invariant, as reported by `validate`.
///
/// A correctly functioning collection never produces one of these.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum InvariantViolation {
    /// The root is red.
    RedRoot,
    /// The root has a parent link.
    RootHasParent,
    /// A red node has a red child.
    RedRedEdge,
    /// The two subtrees of some node have different black heights.
    BlackHeightMismatch { left: usize, right: usize },
    /// A child's parent link does not point back at its parent.
    BrokenParentLink,
    /// An in-order neighbour pair is out of order.
    OutOfOrder,
    /// The number of reachable nodes differs from the recorded length.
    LengthMismatch { expected: usize, found: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => f.write_str("root is red"),
            Self::RootHasParent => f.write_str("root has a parent"),
            Self::RedRedEdge => f.write_str("red node has a red child"),
            Self::BlackHeightMismatch { left, right } => {
                write!(f, "black heights differ: left {left}, right {right}")
            }
            Self::BrokenParentLink => f.write_str("child does not link back to its parent"),
            Self::OutOfOrder => f.write_str("keys are out of order"),
            Self::LengthMismatch { expected, found } => {
                write!(f, "expected {expected} nodes, found {found}")
            }
        }
    }
}

impl core::error::Error for InvariantViolation {}
