//! GET operations for the ordered index.
//!
//! Point lookups, size accounting over the leaf chain, and the arena accessors
//! the rest of the tree code goes through.

use crate::types::{BranchNode, LeafNode, NodeId, NodeRef, OrderedIndex, NULL_NODE};

impl<K: Ord, V> OrderedIndex<K, V> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Get a reference to the value associated with a key.
    ///
    /// # Examples
    ///
    /// ```
    /// use relmap::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(5).unwrap();
    /// index.put(1, "one");
    /// assert_eq!(index.get(&1), Some(&"one"));
    /// assert_eq!(index.get(&2), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut current = self.root;
        loop {
            self.record_access();
            match current {
                NodeRef::Leaf(id) => return self.get_leaf(id).and_then(|leaf| leaf.get(key)),
                NodeRef::Branch(id) => {
                    current = *self.get_branch(id)?.get_child(key)?;
                }
            }
        }
    }

    /// Check if key exists in the index.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries, summed over the leaf chain.
    pub fn size(&self) -> usize {
        self.leaves().map(LeafNode::len).sum()
    }

    /// Alias for [`size`](Self::size).
    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves().all(LeafNode::is_empty)
    }
}

impl<K, V> OrderedIndex<K, V> {
    // ============================================================================
    // DIAGNOSTICS
    // ============================================================================

    /// Nodes visited by `get` and `put` since construction or the last reset.
    pub fn accesses(&self) -> u64 {
        self.accesses.get()
    }

    pub fn reset_accesses(&self) {
        self.accesses.set(0);
    }

    #[inline]
    pub(crate) fn record_access(&self) {
        self.accesses.set(self.accesses.get() + 1);
    }

    // ============================================================================
    // LEAF CHAIN
    // ============================================================================

    /// Get the ID of the first (leftmost) leaf in the tree.
    pub(crate) fn first_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => match self.get_branch(id).and_then(|b| b.children.first()) {
                    Some(child) => current = *child,
                    None => return NULL_NODE,
                },
            }
        }
    }

    /// Leaves in key order, following the sibling chain from the head.
    pub(crate) fn leaves(&self) -> LeafChain<'_, K, V> {
        LeafChain {
            index: self,
            next: self.first_leaf_id(),
        }
    }

    // ============================================================================
    // ARENA ACCESS METHODS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K, V>> {
        self.leaf_arena.get(id)
    }

    #[cfg(test)]
    pub(crate) fn get_leaf_mut(&mut self, id: NodeId) -> Option<&mut LeafNode<K, V>> {
        self.leaf_arena.get_mut(id)
    }

    /// Get a reference to a branch node in the arena.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }

    #[cfg(test)]
    pub(crate) fn get_branch_mut(&mut self, id: NodeId) -> Option<&mut BranchNode<K>> {
        self.branch_arena.get_mut(id)
    }
}

/// Iterator over the leaves of an ordered index along the sibling chain.
pub(crate) struct LeafChain<'a, K, V> {
    index: &'a OrderedIndex<K, V>,
    next: NodeId,
}

impl<'a, K, V> Iterator for LeafChain<'a, K, V> {
    type Item = &'a LeafNode<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let leaf = self.index.get_leaf(self.next)?;
        self.next = leaf.next;
        Some(leaf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_on_empty_index() {
        let index: OrderedIndex<i32, i32> = OrderedIndex::new(5).unwrap();
        assert_eq!(index.get(&1), None);
        assert_eq!(index.size(), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn test_get_across_levels() {
        let mut index = OrderedIndex::new(3).unwrap();
        for i in 0..200 {
            index.put(i, i * 2);
        }
        assert!(!index.root.is_leaf());
        for i in 0..200 {
            assert_eq!(index.get(&i), Some(&(i * 2)));
        }
        assert_eq!(index.get(&200), None);
        assert_eq!(index.get(&-1), None);
    }

    #[test]
    fn test_size_counts_distinct_keys() {
        let mut index = OrderedIndex::new(5).unwrap();
        for i in 0..50 {
            index.put(i % 20, i);
        }
        assert_eq!(index.size(), 20);
        assert_eq!(index.len(), 20);
    }

    #[test]
    fn test_access_counter_tracks_depth() {
        let mut index = OrderedIndex::new(3).unwrap();
        for i in 0..100 {
            index.put(i, ());
        }
        index.reset_accesses();
        index.get(&50);
        assert_eq!(index.accesses(), index.height() as u64);
    }
}
