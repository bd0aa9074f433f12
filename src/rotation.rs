//! Binary search tree shape transformation by single rotations
//!
//! [`transform`] restructures one binary search tree into the exact shape of
//! another tree over the same keys. It only ever applies single left or right
//! rotations, so the tree is a valid binary search tree after every step.
//!
//! The procedure works top-down: rotate the target root's key up to the top of
//! the source tree, then recurse into both subtrees. Each key climbs at most
//! the height of its current subtree, giving O(n²) rotations in the worst case.
//!
//! # Example
//!
//! ```rust
//! use meldable_heap::rotation::{preorder, transform, BstNode};
//!
//! let mut t1 = Some(BstNode::new(
//!     4,
//!     Some(BstNode::new(2, Some(BstNode::leaf(1)), Some(BstNode::leaf(3)))),
//!     Some(BstNode::leaf(5)),
//! ));
//! let t2 = Some(BstNode::new(
//!     2,
//!     Some(BstNode::leaf(1)),
//!     Some(BstNode::new(4, Some(BstNode::leaf(3)), Some(BstNode::leaf(5)))),
//! ));
//!
//! transform(&mut t1, &t2).unwrap();
//! assert_eq!(preorder(&t1), preorder(&t2));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::mem;
use tracing::trace;

/// Optional owned subtree
pub type Tree<K> = Option<Box<BstNode<K>>>;

/// Binary search tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BstNode<K> {
    pub key: K,
    pub left: Tree<K>,
    pub right: Tree<K>,
}

impl<K> BstNode<K> {
    /// Creates a node with the given subtrees
    pub fn new(key: K, left: Tree<K>, right: Tree<K>) -> Box<Self> {
        Box::new(BstNode { key, left, right })
    }

    /// Creates a node without children
    pub fn leaf(key: K) -> Box<Self> {
        Self::new(key, None, None)
    }
}

/// Error type for rotation operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotationError<K> {
    /// The rotation needs a child that is absent
    MissingChild,
    /// No node holds the requested key
    KeyNotFound(K),
    /// The two trees do not hold the same keys, or one is not a search tree
    KeyMismatch,
}

impl<K: fmt::Debug> fmt::Display for RotationError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RotationError::MissingChild => write!(f, "rotation requires a missing child"),
            RotationError::KeyNotFound(key) => write!(f, "key {:?} not found in tree", key),
            RotationError::KeyMismatch => write!(f, "trees are not search trees over the same keys"),
        }
    }
}

impl<K: fmt::Debug> std::error::Error for RotationError<K> {}

/// Rotates right around `root`: its left child becomes the subtree root
///
/// ```text
///       y            x
///      / \          / \
///     x   C  ==>   A   y
///    / \              / \
///   A   B            B   C
/// ```
///
/// # Errors
/// `RotationError::MissingChild` if `root` has no left child; the tree is
/// left untouched.
pub fn rotate_right<K>(root: &mut Box<BstNode<K>>) -> Result<(), RotationError<K>> {
    let mut x = root.left.take().ok_or(RotationError::MissingChild)?;
    root.left = x.right.take();
    mem::swap(root, &mut x);
    root.right = Some(x);
    Ok(())
}

/// Rotates left around `root`: its right child becomes the subtree root
///
/// # Errors
/// `RotationError::MissingChild` if `root` has no right child; the tree is
/// left untouched.
pub fn rotate_left<K>(root: &mut Box<BstNode<K>>) -> Result<(), RotationError<K>> {
    let mut y = root.right.take().ok_or(RotationError::MissingChild)?;
    root.right = y.left.take();
    mem::swap(root, &mut y);
    root.left = Some(y);
    Ok(())
}

/// Rotates the node holding `key` up to the root of this subtree
///
/// Returns the number of rotations performed.
///
/// # Errors
/// `RotationError::KeyNotFound` if no node holds `key`. Rotations happen on
/// the way back up, so a failed search leaves the tree untouched.
pub fn move_up<K: Ord + Clone>(
    root: &mut Box<BstNode<K>>,
    key: &K,
) -> Result<usize, RotationError<K>> {
    match key.cmp(&root.key) {
        Ordering::Equal => Ok(0),
        Ordering::Less => {
            let child = root
                .left
                .as_mut()
                .ok_or_else(|| RotationError::KeyNotFound(key.clone()))?;
            let rotations = move_up(child, key)?;
            rotate_right(root)?;
            Ok(rotations + 1)
        }
        Ordering::Greater => {
            let child = root
                .right
                .as_mut()
                .ok_or_else(|| RotationError::KeyNotFound(key.clone()))?;
            let rotations = move_up(child, key)?;
            rotate_left(root)?;
            Ok(rotations + 1)
        }
    }
}

/// Restructures `source` into the shape of `target`
///
/// Both trees must be binary search trees over exactly the same keys.
/// Returns the number of rotations performed.
///
/// # Errors
/// `RotationError::KeyMismatch` if the key sets differ or either tree breaks
/// search order; `source` is left untouched.
pub fn transform<K: Ord + Clone>(
    source: &mut Tree<K>,
    target: &Tree<K>,
) -> Result<usize, RotationError<K>> {
    if !is_bst(source) || !is_bst(target) || inorder(source) != inorder(target) {
        return Err(RotationError::KeyMismatch);
    }
    let rotations = transform_subtree(source, target)?;
    trace!(rotations, "transformed tree");
    Ok(rotations)
}

fn transform_subtree<K: Ord + Clone>(
    source: &mut Tree<K>,
    target: &Tree<K>,
) -> Result<usize, RotationError<K>> {
    match (source.as_mut(), target) {
        (None, None) => Ok(0),
        (Some(node), Some(goal)) => {
            let mut rotations = move_up(node, &goal.key)?;
            rotations += transform_subtree(&mut node.left, &goal.left)?;
            rotations += transform_subtree(&mut node.right, &goal.right)?;
            Ok(rotations)
        }
        _ => Err(RotationError::KeyMismatch),
    }
}

/// Keys in pre-order: node, left subtree, right subtree
pub fn preorder<K: Clone>(tree: &Tree<K>) -> Vec<K> {
    let mut keys = Vec::new();
    let mut stack: Vec<&BstNode<K>> = tree.as_deref().into_iter().collect();
    while let Some(node) = stack.pop() {
        keys.push(node.key.clone());
        stack.extend(node.right.as_deref());
        stack.extend(node.left.as_deref());
    }
    keys
}

/// Keys in in-order; sorted for a valid binary search tree
pub fn inorder<K: Clone>(tree: &Tree<K>) -> Vec<K> {
    fn walk<K: Clone>(tree: &Tree<K>, keys: &mut Vec<K>) {
        if let Some(node) = tree {
            walk(&node.left, keys);
            keys.push(node.key.clone());
            walk(&node.right, keys);
        }
    }

    let mut keys = Vec::new();
    walk(tree, &mut keys);
    keys
}

/// Returns true if in-order keys are strictly increasing
pub fn is_bst<K: Ord + Clone>(tree: &Tree<K>) -> bool {
    inorder(tree).windows(2).all(|w| w[0] < w[1])
}

/// Returns true if both trees have the same shape and keys
pub fn same_shape<K: PartialEq>(a: &Tree<K>, b: &Tree<K>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => {
            x.key == y.key && same_shape(&x.left, &y.left) && same_shape(&x.right, &y.right)
        }
        _ => false,
    }
}
