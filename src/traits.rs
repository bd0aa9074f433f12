//! Error type and ordering seam shared by the heap
//!
//! The heap never calls `Ord` directly. Every comparison goes through a
//! [`Comparator`], which may decline to order two values (for example
//! `f64::NAN` under [`PartialNatural`]). A declined comparison surfaces as
//! [`HeapError::Incomparable`] instead of silently corrupting heap order.

use std::cmp::Ordering;
use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The handle's node is no longer in the heap (it was removed or popped)
    InvalidHandle,
    /// The handle was issued by a different heap
    ForeignHandle,
    /// The comparator could not establish an order between two values
    Incomparable,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (node was removed)")
            }
            HeapError::ForeignHandle => {
                write!(f, "handle belongs to a different heap")
            }
            HeapError::Incomparable => {
                write!(f, "values cannot be ordered by the heap's comparator")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// Ordering strategy used by [`MeldableHeap`](crate::meldable::MeldableHeap)
///
/// Returning `None` means the two values have no defined order. The heap
/// treats that as a failed precondition and reports
/// [`HeapError::Incomparable`].
///
/// # Example
///
/// ```rust
/// use meldable_heap::traits::{Comparator, Natural, PartialNatural};
/// use std::cmp::Ordering;
///
/// assert_eq!(Natural.compare(&1, &2), Some(Ordering::Less));
/// assert_eq!(PartialNatural.compare(&1.0, &f64::NAN), None);
/// ```
pub trait Comparator<T> {
    /// Compares `a` with `b`, or returns `None` when no order exists
    fn compare(&self, a: &T, b: &T) -> Option<Ordering>;
}

/// Total order from `Ord`. Never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Natural;

impl<T: Ord> Comparator<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        Some(a.cmp(b))
    }
}

/// Partial order from `PartialOrd`, e.g. for floating point values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialNatural;

impl<T: PartialOrd> Comparator<T> for PartialNatural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        a.partial_cmp(b)
    }
}

/// Inverts another comparator, turning the min-heap into a max-heap
///
/// # Example
///
/// ```rust
/// use meldable_heap::meldable::MeldableHeap;
/// use meldable_heap::traits::{Natural, ReverseOrder};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut heap = MeldableHeap::with_comparator(ReverseOrder(Natural), StdRng::seed_from_u64(7));
/// heap.insert(1).unwrap();
/// heap.insert(9).unwrap();
/// assert_eq!(heap.peek(), Some(&9));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReverseOrder<C>(pub C);

impl<T, C: Comparator<T>> Comparator<T> for ReverseOrder<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        self.0.compare(b, a)
    }
}

/// Adapts a closure into a [`Comparator`]
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<F> fmt::Debug for FnComparator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnComparator").finish_non_exhaustive()
    }
}

impl<T, F> Comparator<T> for FnComparator<F>
where
    F: Fn(&T, &T) -> Option<Ordering>,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Option<Ordering> {
        (self.0)(a, b)
    }
}
