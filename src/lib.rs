//! # rbset
//!
//! An ordered set of unique keys stored in a red-black tree.
//!
//! Nodes live in an arena owned by the tree and refer to each other by index,
//! so child links own and parent links only point back. Insertion, lookup and
//! removal are `O(log n)`.
//!
//! ## Example
//!
//! ```rust
//! use rbset::{Error, RbTree};
//!
//! let mut tree: RbTree<u32> = RbTree::new();
//! for k in [5, 7, 9, 8, 2] {
//!     tree.insert(k).unwrap();
//! }
//!
//! assert_eq!(tree.find(&9).map(|n| *n.key()), Some(9));
//! assert!(tree.root().unwrap().is_black());
//! assert_eq!(tree.insert(8), Err(Error::DuplicateKey));
//!
//! assert_eq!(tree.remove(&7), Ok(7));
//! assert_eq!(tree.remove(&7), Err(Error::KeyNotFound));
//! ```
//!
//! A custom order is any `Fn(&K, &K) -> bool` strict less-than:
//!
//! ```rust
//! use rbset::RbTree;
//!
//! let mut tree = RbTree::with_compare(|a: &i32, b: &i32| a.abs() < b.abs());
//! tree.insert(-3).unwrap();
//! assert!(tree.insert(3).is_err());
//! assert!(tree.contains(&3));
//! ```

#![forbid(unsafe_code)]

mod compare;
mod error;
mod node;
mod observer;
mod tree;
mod validate;

pub use compare::{Compare, Natural};
pub use error::{Error, InvariantViolation, StructureError};
pub use node::{Color, Side};
pub use observer::{DotDumper, TreeEvent, TreeObserver};
pub use tree::{NodeRef, RbTree};

#[cfg(test)]
mod proptests;
