//! Randomized Meldable Heap implementation
//!
//! A randomized meldable heap is a heap-ordered binary tree with no shape
//! invariant at all. Its single structural primitive is `merge`: the root with
//! the smaller value survives, and the other tree is merged into one of its two
//! children picked by a fair coin flip.
//!
//! - O(log n) expected insert, merge, pop and arbitrary-node remove
//! - O(1) peek
//!
//! The bound comes from the random walk, not from the shape: the expected
//! length of a random root-to-empty walk in *any* binary tree with n nodes is
//! at most log(n + 1). A tree built from descending insertions is a path, yet
//! every operation on it still terminates after a couple of steps on average.
//!
//! # Storage
//!
//! Nodes live in a [`slotmap::SlotMap`] arena. The `left` and `right` keys are
//! owning relations, `parent` is a lookup-only back-reference used by
//! [`MeldableHeap::remove`] to find the splice point without searching from
//! the root. Merging only rewires keys, so a node's slot (and therefore its
//! [`NodeHandle`]) never moves.
//!
//! # Randomness
//!
//! The coin is drawn from a random source owned by the heap and supplied at
//! construction. A seeded source replays the exact same tree shapes.
//!
//! # Example
//!
//! ```rust
//! use meldable_heap::meldable::MeldableHeap;
//!
//! let mut heap = MeldableHeap::with_seed(42);
//! let five = heap.insert(5).unwrap();
//! heap.insert(3).unwrap();
//! heap.insert(8).unwrap();
//!
//! assert_eq!(heap.peek(), Some(&3));
//! assert_eq!(heap.remove(five), Ok(5));
//! assert_eq!(heap.pop(), Ok(Some(3)));
//! assert_eq!(heap.len(), 1);
//! ```

use crate::traits::{Comparator, HeapError, Natural};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::{new_key_type, SecondaryMap, SlotMap};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;
use std::sync::atomic::{self, AtomicU64};
use tracing::{debug, trace};

new_key_type! {
    struct NodeKey;
}

static NEXT_HEAP_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies the heap that issued a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HeapId(u64);

impl HeapId {
    fn next() -> Self {
        HeapId(NEXT_HEAP_ID.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

/// Handle to a node in a [`MeldableHeap`]
///
/// A handle names a node's identity, not its value: two nodes holding equal
/// values have distinct handles. It stays valid across any number of
/// operations on other nodes, until the node itself is removed or popped.
///
/// Handles are tagged with the heap that issued them. Passing a handle to the
/// wrong heap yields [`HeapError::ForeignHandle`]; passing one whose node is
/// gone yields [`HeapError::InvalidHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    heap: HeapId,
    key: NodeKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

struct Node<T> {
    value: T,
    left: Option<NodeKey>,
    right: Option<NodeKey>,
    parent: Option<NodeKey>, // non-owning
}

impl<T> Node<T> {
    fn singleton(value: T) -> Self {
        Node {
            value,
            left: None,
            right: None,
            parent: None,
        }
    }

    #[inline]
    fn child(&self, side: Side) -> Option<NodeKey> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Option<NodeKey> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Randomized Meldable Heap
///
/// `C` decides the order (min-heap under [`Natural`]), `R` supplies the coin
/// flips that steer every merge.
///
/// # Example
///
/// ```rust
/// use meldable_heap::meldable::MeldableHeap;
///
/// let mut heap = MeldableHeap::with_seed(1);
/// let handles: Vec<_> = [5, 3, 8, 1].iter().map(|&v| heap.insert(v).unwrap()).collect();
///
/// // Remove an interior node by handle, not by value.
/// heap.remove(handles[1]).unwrap();
///
/// assert_eq!(heap.peek(), Some(&1));
/// assert!(heap.check_invariants());
/// ```
pub struct MeldableHeap<T, C = Natural, R = StdRng> {
    nodes: SlotMap<NodeKey, Node<T>>,
    root: Option<NodeKey>,
    comparator: C,
    rng: R,
    id: HeapId,
}

impl<T: Ord> MeldableHeap<T> {
    /// Creates an empty min-heap with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty min-heap whose coin flips replay from `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<T: Ord> Default for MeldableHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord, R: Rng> MeldableHeap<T, Natural, R> {
    /// Creates an empty min-heap drawing coin flips from `rng`
    pub fn with_rng(rng: R) -> Self {
        Self::with_comparator(Natural, rng)
    }
}

impl<T, C, R> MeldableHeap<T, C, R> {
    /// Returns the number of nodes in the heap
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the minimum value without removing it
    ///
    /// # Time Complexity
    /// O(1): the root holds the minimum by heap order.
    pub fn peek(&self) -> Option<&T> {
        self.root.map(|root| &self.nodes[root].value)
    }

    /// Returns the value held by the node behind `handle`
    ///
    /// Returns `None` for stale or foreign handles.
    pub fn get(&self, handle: &NodeHandle) -> Option<&T> {
        if handle.heap != self.id {
            return None;
        }
        self.nodes.get(handle.key).map(|node| &node.value)
    }

    /// Returns true if `handle` names a live node of this heap
    pub fn contains(&self, handle: &NodeHandle) -> bool {
        handle.heap == self.id && self.nodes.contains_key(handle.key)
    }

    /// Removes every node. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Pre-order traversal of the values: root, left subtree, right subtree
    ///
    /// Intended for inspection and testing; the order says nothing beyond
    /// "every value comes before its descendants".
    pub fn iter(&self) -> Iter<'_, T> {
        let mut stack = SmallVec::new();
        stack.extend(self.root);
        Iter {
            nodes: &self.nodes,
            stack,
        }
    }

    /// Returns the height of the tree (0 for an empty heap)
    pub fn depth(&self) -> usize {
        let mut stack: SmallVec<[(NodeKey, usize); 32]> = SmallVec::new();
        stack.extend(self.root.map(|root| (root, 1)));
        let mut max = 0;
        while let Some((key, depth)) = stack.pop() {
            max = max.max(depth);
            let node = &self.nodes[key];
            stack.extend(
                [node.left, node.right]
                    .into_iter()
                    .flatten()
                    .map(|child| (child, depth + 1)),
            );
        }
        max
    }

    fn handle(&self, key: NodeKey) -> NodeHandle {
        NodeHandle { heap: self.id, key }
    }

    fn resolve(&self, handle: &NodeHandle) -> Result<NodeKey, HeapError> {
        if handle.heap != self.id {
            debug!(heap = self.id.0, owner = handle.heap.0, "rejected foreign handle");
            return Err(HeapError::ForeignHandle);
        }
        if !self.nodes.contains_key(handle.key) {
            debug!(heap = self.id.0, "rejected stale handle");
            return Err(HeapError::InvalidHandle);
        }
        Ok(handle.key)
    }

    // Relation helpers. Every rewrite of left/right/parent goes through these.

    fn set_parent(&mut self, child: Option<NodeKey>, parent: Option<NodeKey>) {
        if let Some(child) = child {
            self.nodes[child].parent = parent;
        }
    }

    fn set_child(&mut self, parent: NodeKey, side: Side, child: Option<NodeKey>) {
        *self.nodes[parent].child_mut(side) = child;
        self.set_parent(child, Some(parent));

        debug_assert_eq!(self.nodes[parent].child(side), child);
        debug_assert!(child.map_or(true, |c| self.nodes[c].parent == Some(parent)));
    }

    fn set_root(&mut self, root: Option<NodeKey>) {
        self.root = root;
        self.set_parent(root, None);

        debug_assert!(root.map_or(true, |r| self.nodes[r].parent.is_none()));
    }

    /// Puts `new` wherever `old` hung: under `parent`, or at the root
    fn replace_child(&mut self, parent: Option<NodeKey>, old: NodeKey, new: Option<NodeKey>) {
        match parent {
            None => self.set_root(new),
            Some(parent) => {
                let side = if self.nodes[parent].left == Some(old) {
                    Side::Left
                } else {
                    debug_assert_eq!(self.nodes[parent].right, Some(old));
                    Side::Right
                };
                self.set_child(parent, side, new);
            }
        }
    }
}

impl<T, C: Comparator<T>, R: Rng> MeldableHeap<T, C, R> {
    /// Creates an empty heap ordered by `comparator`, drawing coin flips from `rng`
    pub fn with_comparator(comparator: C, rng: R) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            comparator,
            rng,
            id: HeapId::next(),
        }
    }

    /// Inserts a value, returning a handle to its node
    ///
    /// The handle names the new node, which is not necessarily the root.
    ///
    /// # Errors
    /// Returns `HeapError::Incomparable` if the comparator cannot order the
    /// value against the nodes on its merge path. The heap is left unchanged.
    ///
    /// # Time Complexity
    /// O(log n) expected.
    pub fn insert(&mut self, value: T) -> Result<NodeHandle, HeapError> {
        let key = self.nodes.insert(Node::singleton(value));
        let root = self.root;
        match self.merge(root, Some(key)) {
            Ok(merged) => {
                self.set_root(merged);
                trace!(heap = self.id.0, len = self.len(), "inserted node");
                Ok(self.handle(key))
            }
            Err(err) => {
                self.nodes.remove(key);
                Err(err)
            }
        }
    }

    /// Removes the node behind `handle` and returns its value
    ///
    /// The node's two subtrees are merged and spliced into its former
    /// position, found through its parent back-reference. Every other handle
    /// keeps pointing at the same value.
    ///
    /// # Errors
    /// - `HeapError::ForeignHandle` if the handle came from another heap
    /// - `HeapError::InvalidHandle` if the node was already removed
    /// - `HeapError::Incomparable` if the two subtrees cannot be merged; the
    ///   heap is left unchanged
    ///
    /// # Time Complexity
    /// O(log n) expected.
    pub fn remove(&mut self, handle: NodeHandle) -> Result<T, HeapError> {
        let key = self.resolve(&handle)?;
        self.unlink(key)?;
        trace!(heap = self.id.0, len = self.len() - 1, "removed node");
        self.nodes
            .remove(key)
            .map(|node| node.value)
            .ok_or(HeapError::InvalidHandle)
    }

    /// Removes and returns the minimum value
    ///
    /// Returns `Ok(None)` on an empty heap.
    pub fn pop(&mut self) -> Result<Option<T>, HeapError> {
        let Some(root) = self.root else {
            return Ok(None);
        };
        self.unlink(root)?;
        Ok(self.nodes.remove(root).map(|node| node.value))
    }

    /// Replaces the value of the node behind `handle`, returning the old value
    ///
    /// The node is unlinked, given the new value and merged back in from the
    /// root, so its handle stays valid.
    ///
    /// A sole node is never compared, matching [`insert`](Self::insert) into
    /// an empty heap.
    ///
    /// # Errors
    /// Handle errors as for [`remove`](Self::remove). `HeapError::Incomparable`
    /// when the new value cannot be ordered against the old one leaves the heap
    /// unchanged; if a comparison fails later, while merging the node back in,
    /// the node is dropped and its handle becomes invalid.
    pub fn update(&mut self, handle: &NodeHandle, value: T) -> Result<T, HeapError> {
        let key = self.resolve(handle)?;
        if self.len() > 1 {
            self.compare(&value, &self.nodes[key].value)?;
        }
        self.unlink(key)?;

        let old = mem::replace(&mut self.nodes[key].value, value);
        let root = self.root;
        match self.merge(root, Some(key)) {
            Ok(merged) => {
                self.set_root(merged);
                trace!(heap = self.id.0, "updated node");
                Ok(old)
            }
            Err(err) => {
                self.nodes.remove(key);
                debug!(heap = self.id.0, "dropped node after failed re-merge");
                Err(err)
            }
        }
    }

    /// Merges another heap into this one, consuming it
    ///
    /// If this heap is empty it takes over `other` as is, and handles issued
    /// by `other` remain valid here. Otherwise `other`'s nodes are moved into
    /// this heap's arena and its handles become foreign.
    ///
    /// # Errors
    /// `HeapError::Incomparable` if the two roots' merge path hits values the
    /// comparator cannot order. `other`'s values are discarded and this heap
    /// is left as it was.
    ///
    /// # Time Complexity
    /// O(1) into an empty heap, otherwise O(m) to move `other`'s m nodes plus
    /// O(log n) expected for the merge itself.
    pub fn meld(&mut self, mut other: Self) -> Result<(), HeapError> {
        if other.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            self.nodes = mem::take(&mut other.nodes);
            self.root = other.root.take();
            self.id = other.id;
            trace!(heap = self.id.0, len = self.len(), "adopted melded heap");
            return Ok(());
        }

        let mut moved: SecondaryMap<NodeKey, NodeKey> = SecondaryMap::with_capacity(other.len());
        for (old, node) in other.nodes.drain() {
            moved.insert(old, self.nodes.insert(node));
        }
        for &key in moved.values() {
            let node = &mut self.nodes[key];
            node.left = node.left.map(|k| moved[k]);
            node.right = node.right.map(|k| moved[k]);
            node.parent = node.parent.map(|k| moved[k]);
        }

        let root = self.root;
        let other_root = other.root.map(|k| moved[k]);
        match self.merge(root, other_root) {
            Ok(merged) => {
                self.set_root(merged);
                trace!(heap = self.id.0, len = self.len(), "melded heaps");
                Ok(())
            }
            Err(err) => {
                for &key in moved.values() {
                    self.nodes.remove(key);
                }
                Err(err)
            }
        }
    }

    /// Verifies the structural invariants of the whole tree
    ///
    /// - the root has no parent, and an empty root means no nodes
    /// - every child's parent points back at the node holding it
    /// - every parent names the child in its `left` or `right`
    /// - heap order: no child compares less than its parent
    /// - every node is reachable from the root exactly once
    pub fn check_invariants(&self) -> bool {
        let Some(root) = self.root else {
            return self.nodes.is_empty();
        };
        match self.nodes.get(root) {
            Some(node) if node.parent.is_none() => {}
            _ => return false,
        }

        for (key, node) in &self.nodes {
            for child in [node.left, node.right].into_iter().flatten() {
                let Some(child_node) = self.nodes.get(child) else {
                    return false;
                };
                if child_node.parent != Some(key) {
                    return false;
                }
                match self.comparator.compare(&node.value, &child_node.value) {
                    Some(Ordering::Less | Ordering::Equal) => {}
                    _ => return false,
                }
            }
            if let Some(parent) = node.parent {
                match self.nodes.get(parent) {
                    Some(p) if p.left == Some(key) || p.right == Some(key) => {}
                    _ => return false,
                }
            }
        }

        self.iter().count() == self.nodes.len()
    }

    /// Merges two heap-ordered subtrees and returns the new subtree root
    ///
    /// Only relations are rewired; no node is created or destroyed. The
    /// returned root's own parent is left for the caller to set. Relations
    /// are written only after the recursive merge below succeeds, so an
    /// `Incomparable` error leaves both subtrees exactly as they were.
    fn merge(
        &mut self,
        a: Option<NodeKey>,
        b: Option<NodeKey>,
    ) -> Result<Option<NodeKey>, HeapError> {
        let (a, b) = match (a, b) {
            (None, h) | (h, None) => return Ok(h),
            (Some(a), Some(b)) => (a, b),
        };

        let (lo, hi) = match self.compare(&self.nodes[a].value, &self.nodes[b].value)? {
            Ordering::Greater => (b, a),
            Ordering::Less | Ordering::Equal => (a, b),
        };

        let side = self.coin_flip();
        let child = self.nodes[lo].child(side);
        let merged = self.merge(child, Some(hi))?;
        self.set_child(lo, side, merged);
        Ok(Some(lo))
    }

    /// Detaches a node, splicing the merge of its children into its place
    fn unlink(&mut self, key: NodeKey) -> Result<(), HeapError> {
        let node = &self.nodes[key];
        let (left, right, parent) = (node.left, node.right, node.parent);

        let merged = self.merge(left, right)?;
        self.replace_child(parent, key, merged);

        let node = &mut self.nodes[key];
        node.left = None;
        node.right = None;
        node.parent = None;
        Ok(())
    }

    fn compare(&self, a: &T, b: &T) -> Result<Ordering, HeapError> {
        self.comparator.compare(a, b).ok_or(HeapError::Incomparable)
    }

    #[inline]
    fn coin_flip(&mut self) -> Side {
        if self.rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl<T: fmt::Debug, C, R> fmt::Debug for MeldableHeap<T, C, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeldableHeap")
            .field("len", &self.len())
            .field("preorder", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Pre-order iterator over the values of a [`MeldableHeap`]
pub struct Iter<'a, T> {
    nodes: &'a SlotMap<NodeKey, Node<T>>,
    stack: SmallVec<[NodeKey; 32]>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let key = self.stack.pop()?;
        let nodes = self.nodes;
        let node = &nodes[key];
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(&node.value)
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<'a, T, C, R> IntoIterator for &'a MeldableHeap<T, C, R> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
