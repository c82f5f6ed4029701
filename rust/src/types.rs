//! Core types and data structures for the ordered index.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree implementation, together with the
//! tuning constants shared by the hash indexes.

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasherDefault;

use crate::arena::Arena;
pub use crate::arena::{NodeId, NULL_NODE};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default maximum number of children of a branch node.
pub const DEFAULT_FANOUT: usize = 5;

/// Smallest fanout that still leaves both halves of a split non-empty.
pub const MIN_FANOUT: usize = 3;

/// Number of key/value slots per hash bucket.
pub const SLOTS: usize = 4;

/// Linear hashing splits once `pairs / size()` exceeds this ratio.
pub const LOAD_FACTOR: f64 = 0.75;

/// Default number of initial buckets for the hash indexes.
pub const DEFAULT_BUCKETS: usize = 4;

/// Hasher used by the hash indexes unless the caller supplies one. Unseeded,
/// so bucket layouts are reproducible across runs.
pub type DefaultHashBuilder = BuildHasherDefault<DefaultHasher>;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// Multi-level ordered index (B+ tree) with sibling-linked leaves.
///
/// All values live in leaves; branches only route. Leaves are chained in
/// ascending key order, which drives full scans, range maps and `size()`.
///
/// # Examples
///
/// ```
/// use relmap::OrderedIndex;
///
/// let mut index = OrderedIndex::new(5).unwrap();
/// index.put(1, "one");
/// index.put(2, "two");
/// index.put(3, "three");
///
/// assert_eq!(index.get(&2), Some(&"two"));
/// assert_eq!(index.size(), 3);
///
/// let head: Vec<_> = index.head_map(&3).into_iter().collect();
/// assert_eq!(head, vec![(1, "one"), (2, "two")]);
/// ```
///
/// # Fanout
///
/// - A branch holds at most `fanout - 1` keys and `fanout` children.
/// - A leaf holds at most `fanout - 1` entries plus its sibling link.
/// - Minimum fanout: 3 (enforced). Default: 5.
#[derive(Debug)]
pub struct OrderedIndex<K, V> {
    /// Maximum number of children per branch.
    pub(crate) fanout: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: Arena<LeafNode<K, V>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: Arena<BranchNode<K>>,
    /// Nodes visited by lookups and inserts (diagnostics only).
    pub(crate) accesses: Cell<u64>,
}

/// Leaf node containing key-value pairs.
#[derive(Debug, Clone)]
pub struct LeafNode<K, V> {
    /// Maximum number of keys this node can hold.
    pub(crate) capacity: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// List of values corresponding to keys.
    pub(crate) values: Vec<V>,
    /// Next leaf node in the linked list (for scans).
    pub(crate) next: NodeId,
}

/// Internal (branch) node containing separator keys and child pointers.
#[derive(Debug, Clone)]
pub struct BranchNode<K> {
    /// Maximum number of keys this node can hold.
    pub(crate) capacity: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child nodes, always one more than keys.
    pub(crate) children: Vec<NodeRef>,
}

// ============================================================================
// ENUMS AND RESULT TYPES
// ============================================================================

/// Node reference that can be either a leaf or branch node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// Result of inserting into a leaf.
pub(crate) enum LeafInsert<K, V> {
    /// Stored in place. Contains the old value if the key existed.
    Updated(Option<V>),
    /// The leaf overflowed; the new right sibling must be allocated and its
    /// first key promoted.
    Split(LeafNode<K, V>),
}

/// One step of the descent recorded for the ascent after a split.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathStep {
    pub(crate) branch: NodeId,
    pub(crate) child_index: usize,
}
