//! Node implementations for the ordered index.
//!
//! Leaf and branch level insertion and splitting. Nodes know nothing about the
//! arenas they live in; linking a freshly split node into the tree is the
//! caller's job.

use crate::types::{BranchNode, LeafInsert, LeafNode, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord, V> LeafNode<K, V> {
    /// Get a value by key from this leaf node.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.keys
            .binary_search(key)
            .ok()
            .map(|index| &self.values[index])
    }

    /// Returns the number of key-value pairs in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Insert a key-value pair, splitting if the leaf overflows.
    ///
    /// An existing equal key has its value replaced and never causes a split.
    pub(crate) fn insert(&mut self, key: K, value: V) -> LeafInsert<K, V> {
        match self.keys.binary_search(&key) {
            Ok(index) => {
                let old_value = std::mem::replace(&mut self.values[index], value);
                LeafInsert::Updated(Some(old_value))
            }
            Err(index) => {
                self.keys.insert(index, key);
                self.values.insert(index, value);
                if self.keys.len() <= self.capacity {
                    LeafInsert::Updated(None)
                } else {
                    LeafInsert::Split(self.split())
                }
            }
        }
    }

    /// Split an overflowing leaf, returning the new right node.
    ///
    /// The left half keeps `floor(fanout / 2)` entries, the rest move right.
    /// The right node inherits
    /// this leaf's sibling link; the caller points `self.next` at the right
    /// node once it has an id.
    fn split(&mut self) -> LeafNode<K, V> {
        let mid = (self.capacity + 1) / 2;

        let right_keys = self.keys.split_off(mid);
        let right_values = self.values.split_off(mid);

        let new_right = LeafNode {
            capacity: self.capacity,
            keys: right_keys,
            values: right_values,
            next: self.next,
        };
        self.next = NULL_NODE;

        new_right
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord> BranchNode<K> {
    /// Find the index of the child covering `key`.
    ///
    /// First child when `key` is below the first separator, last child when it
    /// is at or above the last one, otherwise the child between the two
    /// bracketing separators.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1,
            Err(index) => index,
        }
    }

    /// Get the child node for a given key.
    pub fn get_child(&self, key: &K) -> Option<&NodeRef> {
        self.children.get(self.find_child_index(key))
    }

    /// Returns the number of keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Insert a separator and the child to its right, after the child at
    /// `child_index` that just split.
    ///
    /// Returns `Some((right, promoted))` when the branch overflowed and split;
    /// `promoted` no longer lives in either half.
    pub(crate) fn insert_child(
        &mut self,
        child_index: usize,
        separator: K,
        new_child: NodeRef,
    ) -> Option<(BranchNode<K>, K)> {
        self.keys.insert(child_index, separator);
        self.children.insert(child_index + 1, new_child);

        if self.keys.len() <= self.capacity {
            None
        } else {
            Some(self.split())
        }
    }

    /// Split an overflowing branch: the left half keeps `floor(fanout / 2)`
    /// keys, the next key moves up, the remainder goes right.
    fn split(&mut self) -> (BranchNode<K>, K) {
        let mid = (self.capacity + 1) / 2;

        let right_keys = self.keys.split_off(mid + 1);
        let right_children = self.children.split_off(mid + 1);
        let promoted = self.keys.remove(mid);

        let new_right = BranchNode {
            capacity: self.capacity,
            keys: right_keys,
            children: right_children,
        };

        (new_right, promoted)
    }
}
