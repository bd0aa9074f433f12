//! Walks through arbitrary-node removal on a small heap
//!
//! ## Running
//!
//! ```bash
//! cargo run --example meldable_demo
//! ```

use meldable_heap::{HeapError, MeldableHeap, NodeHandle};
use rustc_hash::FxHashMap;

fn main() -> Result<(), HeapError> {
    let mut heap = MeldableHeap::with_seed(272);
    // Remember the nodes by value
    let mut refs: FxHashMap<i32, NodeHandle> = FxHashMap::default();

    for v in [5, 3, 8, 1, 6, 4, 7] {
        refs.insert(v, heap.insert(v)?);
    }

    println!("Before removal (pre-order): {:?}", heap.iter().collect::<Vec<_>>());

    if let Some(&three) = refs.get(&3) {
        heap.remove(three)?;
    }

    println!("After removal of 3:         {:?}", heap.iter().collect::<Vec<_>>());
    println!("Minimum: {:?}, depth: {}", heap.peek(), heap.depth());
    Ok(())
}
