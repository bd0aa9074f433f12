//! Stress tests that push the heap through large operation counts
//!
//! These tests perform large numbers of operations in various patterns
//! to catch edge cases and verify correctness under load.

use meldable_heap::{MeldableHeap, NodeHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Test massive numbers of inserts and pops
#[test]
fn test_massive_operations() {
    let mut heap = MeldableHeap::with_seed(1);

    for i in 0..10_000 {
        heap.insert(i).unwrap();
    }
    assert_eq!(heap.len(), 10_000);
    assert!(heap.check_invariants());

    for i in 0..10_000 {
        assert_eq!(heap.pop(), Ok(Some(i)));
    }
    assert!(heap.is_empty());
}

/// Test alternating insert and pop
#[test]
fn test_alternating_ops() {
    let mut heap = MeldableHeap::with_seed(2);

    for i in 0..2_000 {
        heap.insert(i * 2).unwrap();
        heap.insert(i * 2 + 1).unwrap();
        assert!(heap.pop().unwrap().is_some());
    }

    assert_eq!(heap.len(), 2_000);
    assert!(heap.check_invariants());
}

/// Test meld with large heaps
#[test]
fn test_large_meld() {
    let mut a = MeldableHeap::with_seed(3);
    let mut b = MeldableHeap::with_seed(4);

    for i in 0..5_000 {
        a.insert(i * 2).unwrap();
        b.insert(i * 2 + 1).unwrap();
    }

    a.meld(b).unwrap();
    assert_eq!(a.len(), 10_000);
    assert!(a.check_invariants());

    for i in 0..10_000 {
        assert_eq!(a.pop(), Ok(Some(i)));
    }
}

/// Random removals by handle interleaved with inserts
#[test]
fn test_random_handle_churn() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut heap = MeldableHeap::with_seed(6);
    let mut live: Vec<(NodeHandle, u32)> = Vec::new();

    for round in 0..20_000 {
        if live.is_empty() || rng.gen_bool(0.6) {
            let value = rng.gen_range(0..1_000);
            live.push((heap.insert(value).unwrap(), value));
        } else {
            let index = rng.gen_range(0..live.len());
            let (handle, value) = live.swap_remove(index);
            assert_eq!(heap.remove(handle), Ok(value));
        }

        if round % 1_000 == 0 {
            assert!(heap.check_invariants());
            assert_eq!(heap.peek().copied(), live.iter().map(|&(_, v)| v).min());
        }
    }

    assert_eq!(heap.len(), live.len());
    for (handle, value) in &live {
        assert_eq!(heap.get(handle), Some(value));
    }
}

/// Random values keep the tree shallow
#[test]
fn test_depth_stays_logarithmic_for_random_values() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut heap = MeldableHeap::with_seed(8);

    for _ in 0..10_000 {
        heap.insert(rng.gen::<u32>()).unwrap();
    }

    // log2(10_000) is about 13; a fair coin keeps paths within a small multiple
    let depth = heap.depth();
    assert!(depth < 100, "depth {} far above the logarithmic expectation", depth);
}

/// Descending input degenerates the shape to a path, never the running time
#[test]
fn test_descending_path_shape() {
    let mut heap = MeldableHeap::with_seed(9);
    let handles: Vec<_> = (0..10_000).rev().map(|v| heap.insert(v).unwrap()).collect();

    assert_eq!(heap.depth(), 10_000);

    // Remove from the middle of the path
    for handle in handles.iter().skip(2_500).take(5_000) {
        heap.remove(*handle).unwrap();
    }
    assert_eq!(heap.len(), 5_000);
    assert!(heap.check_invariants());
    assert_eq!(heap.peek(), Some(&0));
}

/// Test with very large values
#[test]
fn test_large_values() {
    let mut heap = MeldableHeap::with_seed(10);

    heap.insert(1_000_000_000i64).unwrap();
    heap.insert(-1_000_000_000).unwrap();
    heap.insert(i64::MAX).unwrap();
    heap.insert(i64::MIN).unwrap();

    assert_eq!(heap.pop(), Ok(Some(i64::MIN)));
    assert_eq!(heap.pop(), Ok(Some(-1_000_000_000)));
    assert_eq!(heap.pop(), Ok(Some(1_000_000_000)));
    assert_eq!(heap.pop(), Ok(Some(i64::MAX)));
}
