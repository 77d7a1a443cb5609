//! This crate contains array-backed segment trees for answering aggregate queries over
//! intervals of a fixed-size array while the array is being modified.
//!
//! The [`LazySegmentTree`] data structure allows interval updates, point updates and
//! interval queries in logarithmic time. Interval updates add a delta to every element
//! in the interval and are stored lazily in the tree until a later call needs to look
//! below the node that received them.
//!
//! The [`SegmentTree`] data structure is the plain variant without interval updates.
//! It is the data structure traditionally used for the [range minimum query][1] problem.
//!
//! Both trees are parameterized by an operation from [`ops`]. The crate ships [`Add`],
//! [`Min`] and [`Max`] for every primitive number type, and the runtime selector
//! [`Aggregation`] for when the operation is only known at runtime.
//!
//! # Example
//!
//! ```
//! use lazy_segtree::{LazySegmentTree, ops::Min};
//!
//! let mut tree = LazySegmentTree::build(&[5, 1, 4, 2, 8], Min).unwrap();
//! tree.range_update(0, 4, -3);
//! assert_eq!(tree.range_query(0, 4), -2);
//! assert_eq!(tree.range_query(2, 4), -1);
//!
//! // bounds are clamped to the array
//! assert_eq!(tree.range_query(-10, 10), -2);
//! // and an empty interval yields the identity
//! assert_eq!(tree.range_query(5, 2), i32::MAX);
//! ```
//!
//! [1]: https://en.wikipedia.org/wiki/Range_minimum_query
//! [`Add`]: ops::Add
//! [`Min`]: ops::Min
//! [`Max`]: ops::Max
//! [`Aggregation`]: ops::Aggregation
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(nonstandard_style, missing_docs)]
#![forbid(unsafe_code)]

#[cfg(not(feature = "std"))]
extern crate alloc;

/// Error type returned by fallible tree operations
pub mod error;
/// Module of operations that can be performed in a segment tree
pub mod ops;

mod lazy;
mod point;
mod range;

pub use error::Error;
pub use lazy::LazySegmentTree;
pub use point::SegmentTree;
