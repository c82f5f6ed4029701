//! Construction and initialization logic for the ordered index and its nodes.
//!
//! This module contains fanout validation, arena initialization, and default
//! implementations.

use std::cell::Cell;

use crate::arena::Arena;
use crate::error::{IndexError, InitResult};
use crate::types::{
    BranchNode, LeafNode, NodeRef, OrderedIndex, DEFAULT_FANOUT, MIN_FANOUT, NULL_NODE,
};

impl<K, V> OrderedIndex<K, V> {
    /// Create an empty ordered index with the given fanout.
    ///
    /// # Arguments
    ///
    /// * `fanout` - Maximum number of children per branch (minimum 3)
    ///
    /// # Examples
    ///
    /// ```
    /// use relmap::OrderedIndex;
    ///
    /// let index = OrderedIndex::<i32, String>::new(5).unwrap();
    /// assert!(index.is_empty());
    /// assert!(OrderedIndex::<i32, String>::new(2).is_err());
    /// ```
    pub fn new(fanout: usize) -> InitResult<Self> {
        validation::validate_fanout(fanout)?;
        Ok(Self::with_checked_fanout(fanout))
    }

    /// Create an ordered index with [`DEFAULT_FANOUT`].
    pub fn with_default_fanout() -> Self {
        Self::with_checked_fanout(DEFAULT_FANOUT)
    }

    fn with_checked_fanout(fanout: usize) -> Self {
        let mut leaf_arena = Arena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(fanout - 1));

        Self {
            fanout,
            root: NodeRef::Leaf(root_id),
            leaf_arena,
            branch_arena: Arena::new(),
            accesses: Cell::new(0),
        }
    }

    /// Maximum number of children per branch.
    pub fn fanout(&self) -> usize {
        self.fanout
    }
}

impl<K, V> LeafNode<K, V> {
    /// Creates an empty leaf holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        // One spare slot: a full leaf briefly holds capacity + 1 entries while splitting.
        Self {
            capacity,
            keys: Vec::with_capacity(capacity + 1),
            values: Vec::with_capacity(capacity + 1),
            next: NULL_NODE,
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates an empty branch for the given fanout.
    pub fn new(fanout: usize) -> Self {
        Self {
            capacity: fanout - 1,
            keys: Vec::with_capacity(fanout),
            children: Vec::with_capacity(fanout + 1),
        }
    }
}

impl<K, V> Default for OrderedIndex<K, V> {
    fn default() -> Self {
        Self::with_default_fanout()
    }
}

/// Validation utilities for construction
pub mod validation {
    use super::*;

    /// Validate that a fanout is large enough to split nodes.
    pub fn validate_fanout(fanout: usize) -> InitResult<()> {
        if fanout < MIN_FANOUT {
            Err(IndexError::InvalidFanout {
                fanout,
                min: MIN_FANOUT,
            })
        } else {
            Ok(())
        }
    }

    /// Validate an initial bucket count for the hash indexes.
    pub fn validate_bucket_count(buckets: usize) -> InitResult<()> {
        if buckets.is_power_of_two() {
            Ok(())
        } else {
            Err(IndexError::InvalidBucketCount(buckets))
        }
    }
}
