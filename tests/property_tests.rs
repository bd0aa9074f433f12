//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify the heap
//! against a reference multiset after every step.

use meldable_heap::{MeldableHeap, NodeHandle};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    Remove(usize),
    Pop,
    Update(usize, i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (-100i32..100).prop_map(Op::Insert),
        2 => any::<usize>().prop_map(Op::Remove),
        1 => Just(Op::Pop),
        1 => (any::<usize>(), -100i32..100).prop_map(|(i, v)| Op::Update(i, v)),
    ]
}

/// Checks the heap against the live (handle, value) list
fn check_against_reference(
    heap: &MeldableHeap<i32>,
    live: &[(NodeHandle, i32)],
) -> Result<(), TestCaseError> {
    prop_assert!(heap.check_invariants(), "structural invariant violated");
    prop_assert_eq!(heap.len(), live.len());
    prop_assert_eq!(heap.is_empty(), live.is_empty());
    prop_assert_eq!(heap.peek().copied(), live.iter().map(|&(_, v)| v).min());

    for (handle, value) in live {
        prop_assert_eq!(heap.get(handle), Some(value));
    }

    let mut actual: Vec<i32> = heap.iter().copied().collect();
    let mut expected: Vec<i32> = live.iter().map(|&(_, v)| v).collect();
    actual.sort_unstable();
    expected.sort_unstable();
    prop_assert_eq!(actual, expected);
    Ok(())
}

/// Random interleavings of insert, remove, pop and update
fn test_operation_sequence(seed: u64, ops: Vec<Op>) -> Result<(), TestCaseError> {
    let mut heap = MeldableHeap::with_seed(seed);
    let mut live: Vec<(NodeHandle, i32)> = Vec::new();

    for op in ops {
        match op {
            Op::Insert(value) => {
                let handle = heap.insert(value).unwrap();
                live.push((handle, value));
            }
            Op::Remove(index) if !live.is_empty() => {
                let (handle, value) = live.swap_remove(index % live.len());
                prop_assert_eq!(heap.remove(handle), Ok(value));
                prop_assert!(!heap.contains(&handle));
            }
            Op::Pop => {
                let expected = live.iter().map(|&(_, v)| v).min();
                let popped = heap.pop().unwrap();
                prop_assert_eq!(popped, expected);
                // Drop whichever handle the root belonged to
                live.retain(|(handle, _)| heap.contains(handle));
            }
            Op::Update(index, value) if !live.is_empty() => {
                let slot = index % live.len();
                let (handle, old) = live[slot];
                prop_assert_eq!(heap.update(&handle, value), Ok(old));
                live[slot].1 = value;
            }
            Op::Remove(_) | Op::Update(..) => {}
        }

        check_against_reference(&heap, &live)?;
    }

    Ok(())
}

/// Size after k inserts and j removes is k - j
fn test_size_conservation(seed: u64, values: Vec<i32>, removals: Vec<usize>) -> Result<(), TestCaseError> {
    let mut heap = MeldableHeap::with_seed(seed);
    let mut handles: Vec<NodeHandle> = values.iter().map(|&v| heap.insert(v).unwrap()).collect();
    let inserted = handles.len();

    let mut removed = 0;
    for index in removals {
        if handles.is_empty() {
            break;
        }
        let handle = handles.swap_remove(index % handles.len());
        prop_assert!(heap.remove(handle).is_ok());
        removed += 1;
        prop_assert_eq!(heap.len(), inserted - removed);
    }

    prop_assert!(heap.check_invariants());
    Ok(())
}

/// Melding keeps the union and the global minimum
fn test_meld_union(seed: u64, left: Vec<i32>, right: Vec<i32>) -> Result<(), TestCaseError> {
    let mut a = MeldableHeap::with_seed(seed);
    let mut b = MeldableHeap::with_seed(seed ^ 0x5555);
    for &v in &left {
        a.insert(v).unwrap();
    }
    for &v in &right {
        b.insert(v).unwrap();
    }

    a.meld(b).unwrap();

    let mut expected: Vec<i32> = left.iter().chain(right.iter()).copied().collect();
    expected.sort_unstable();
    let mut actual: Vec<i32> = a.iter().copied().collect();
    actual.sort_unstable();

    prop_assert_eq!(a.peek().copied(), expected.first().copied());
    prop_assert_eq!(actual, expected);
    prop_assert!(a.check_invariants());
    Ok(())
}

/// Melding with an empty heap leaves the other operand as it was
fn test_meld_identity(seed: u64, values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut a = MeldableHeap::with_seed(seed);
    for &v in &values {
        a.insert(v).unwrap();
    }
    let shape: Vec<i32> = a.iter().copied().collect();

    a.meld(MeldableHeap::with_seed(seed)).unwrap();
    prop_assert_eq!(a.iter().copied().collect::<Vec<_>>(), shape.clone());

    let mut empty = MeldableHeap::with_seed(seed);
    empty.meld(a).unwrap();
    prop_assert_eq!(empty.iter().copied().collect::<Vec<_>>(), shape);
    Ok(())
}

proptest! {
    #[test]
    fn test_random_operation_sequences(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 0..150)
    ) {
        test_operation_sequence(seed, ops)?;
    }

    #[test]
    fn test_size_conservation_holds(
        seed in any::<u64>(),
        values in prop::collection::vec(-1000i32..1000, 0..100),
        removals in prop::collection::vec(any::<usize>(), 0..100)
    ) {
        test_size_conservation(seed, values, removals)?;
    }

    #[test]
    fn test_meld_keeps_union(
        seed in any::<u64>(),
        left in prop::collection::vec(-100i32..100, 0..50),
        right in prop::collection::vec(-100i32..100, 0..50)
    ) {
        test_meld_union(seed, left, right)?;
    }

    #[test]
    fn test_meld_with_empty_is_identity(
        seed in any::<u64>(),
        values in prop::collection::vec(-100i32..100, 0..50)
    ) {
        test_meld_identity(seed, values)?;
    }
}
