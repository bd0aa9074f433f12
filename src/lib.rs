//! Randomized Meldable Heap for Rust
//!
//! This crate provides a randomized meldable heap: a heap-ordered binary tree
//! whose shape is steered by coin flips instead of a balancing rule, with
//! handle-based removal of arbitrary nodes.
//!
//! # Features
//!
//! - **Meldable Heap**: O(log n) expected insert, merge, pop and remove of any
//!   node by handle; O(1) peek
//! - **Pluggable ordering**: min-heap by default, max-heap or custom orders
//!   through [`Comparator`]; orders that can fail (floats) report
//!   [`HeapError::Incomparable`]
//! - **Checked handles**: stale and foreign handles are rejected with an error
//! - **Tree rotations**: a small companion module restructuring one binary
//!   search tree into the shape of another using single rotations
//!
//! # Example
//!
//! ```rust
//! use meldable_heap::MeldableHeap;
//!
//! let mut heap = MeldableHeap::with_seed(7);
//! let handle = heap.insert(5).unwrap();
//! heap.insert(3).unwrap();
//! heap.insert(8).unwrap();
//!
//! heap.remove(handle).unwrap();
//! assert_eq!(heap.peek(), Some(&3));
//! ```

pub mod meldable;
pub mod rotation;
pub mod traits;

// Re-export the main types for convenience
pub use meldable::{MeldableHeap, NodeHandle};
pub use traits::{Comparator, HeapError, Natural};
