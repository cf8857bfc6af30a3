//! Red-black tree collections for Rust.
//!
//! This crate provides [`RbTreeMap`], [`RbTreeSet`] and [`RbTreeMultiset`], ordered
//! collections backed by a red-black tree with worst-case O(log n) lookup, insertion and
//! removal:
//!
//! - [`RbTreeMap`] - unique keys mapped to values, with an entry API
//! - [`RbTreeSet`] - unique values
//! - [`RbTreeMultiset`] - repeatable values, equal values kept in insertion order
//!
//! Besides ordinary borrowing iterators, every collection hands out [`Position`]s: detached
//! cursors that step forwards and backwards (wrapping through the end position) and are
//! checked against later modification instead of dangling.
//!
//! # Example
//!
//! ```
//! use rbtree::{RbTreeMap, TreeError};
//!
//! let mut scores = RbTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! assert_eq!(scores.get("Bob"), Some(&85));
//! assert_eq!(scores.at("Dave"), Err(TreeError::KeyNotFound));
//!
//! // Walk backwards from the end position.
//! let last = scores.prev_position(scores.end())?;
//! assert_eq!(scores.entry_at(last)?, (&"Carol", &92));
//!
//! // The tree keeps its balance invariants; its black height is reported on success.
//! assert!(scores.validate().is_ok());
//! # Ok::<(), TreeError>(())
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **No unsafe code** - Nodes live in an index arena, parent links are plain indices
//! - **Checked positions** - Stale cursors are reported as [`TreeError::StalePosition`], cursors
//!   from another collection as [`TreeError::ForeignPosition`]
//!
//! # Logging
//!
//! Rebalancing steps are reported through the [`log`] facade at `trace` level; rejected
//! positions, clears and merges at `debug` level. No logger is installed by this crate.
//!
//! # Implementation
//!
//! Nodes are stored in a slot arena and linked by non-zero indices, so a missing child is a
//! free `None`. Insertion rebalances upward with recoloring and at most two rotations;
//! removal reduces the two-children case to its in-order successor and then repairs the
//! resulting black-height deficit.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod error;
mod position;
mod raw;

pub mod rbtree_map;
pub mod rbtree_multiset;
pub mod rbtree_set;

pub use error::{InvariantViolation, TreeError};
pub use position::Position;
pub use rbtree_map::RbTreeMap;
pub use rbtree_multiset::RbTreeMultiset;
pub use rbtree_set::RbTreeSet;
