//! Interval collections backed by an augmented red-black tree.
//!
//! Every node of [`IntervalTree`] caches the outer bound of all intervals in
//! its subtree, so overlap queries skip any subtree whose bound cannot meet
//! the query. Insertion and deletion keep the tree balanced, giving
//! `O(log n)` updates and `O(log n + k)` queries.
//!
//! ```
//! use augmented_intervals::{Interval, IntervalTree};
//!
//! let mut tree = IntervalTree::new();
//! assert!(tree.put(1..=2, "a"));
//! assert!(tree.put(2..=3, "b"));
//! assert!(!tree.put(1..=2, "c"));
//!
//! assert_eq!(tree.bounds(), Some(&Interval::new(1, 3)));
//! assert_eq!(tree.query_all(3..=8).len(), 1);
//! assert!(tree.delete(1..=2));
//! assert_eq!(tree.len(), 1);
//! ```

mod interval;
pub use interval::Interval;

pub mod collections;
pub use collections::{Entry, IntervalSet, IntervalTree};
