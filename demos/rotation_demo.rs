//! Transforms one binary search tree into another using single rotations
//!
//! ## Running
//!
//! ```bash
//! cargo run --example rotation_demo
//! ```

use meldable_heap::rotation::{preorder, transform, BstNode, RotationError};

fn main() -> Result<(), RotationError<i32>> {
    let mut t1 = Some(BstNode::new(
        4,
        Some(BstNode::new(2, Some(BstNode::leaf(1)), Some(BstNode::leaf(3)))),
        Some(BstNode::leaf(5)),
    ));

    // Same keys, different shape
    let t2 = Some(BstNode::new(
        2,
        Some(BstNode::leaf(1)),
        Some(BstNode::new(4, Some(BstNode::leaf(3)), Some(BstNode::leaf(5)))),
    ));

    println!("Preorder T1 before:  {:?}", preorder(&t1));
    let rotations = transform(&mut t1, &t2)?;
    println!("Preorder of T2:      {:?}", preorder(&t2));
    println!("Preorder T1 after:   {:?} ({} rotations)", preorder(&t1), rotations);
    Ok(())
}
