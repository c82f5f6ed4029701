//! Iterator implementations for the ordered index.
//!
//! Every iterator walks the leaf sibling chain; none of them holds a live view
//! on the tree, so each call starts a fresh, finite, ascending scan.

use std::ops::Bound;

use crate::types::{LeafNode, OrderedIndex};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over key-value pairs in ascending key order.
pub struct ItemIterator<'a, K, V> {
    index: &'a OrderedIndex<K, V>,
    leaf: Option<&'a LeafNode<K, V>>,
    position: usize,
    end: Bound<K>,
}

// ============================================================================
// INDEX ITERATOR METHODS
// ============================================================================

impl<K: Ord, V> OrderedIndex<K, V> {
    /// Returns an iterator over all key-value pairs in sorted order.
    pub fn entries(&self) -> ItemIterator<'_, K, V> {
        let head = self.get_leaf(self.first_leaf_id());
        ItemIterator::new(self, head, 0, Bound::Unbounded)
    }

    /// Returns an iterator over all keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries().map(|(k, _)| k)
    }

    /// Returns an iterator over all values in key order.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries().map(|(_, v)| v)
    }
}

// ============================================================================
// ITEMITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord, V> ItemIterator<'a, K, V> {
    pub(crate) fn new(
        index: &'a OrderedIndex<K, V>,
        leaf: Option<&'a LeafNode<K, V>>,
        position: usize,
        end: Bound<K>,
    ) -> Self {
        Self {
            index,
            leaf,
            position,
            end,
        }
    }

    fn beyond_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        }
    }
}

impl<'a, K: Ord, V> Iterator for ItemIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.leaf?;

            if self.position < leaf.keys.len() {
                let key = &leaf.keys[self.position];
                if self.beyond_end(key) {
                    self.leaf = None;
                    return None;
                }
                let value = &leaf.values[self.position];
                self.position += 1;
                return Some((key, value));
            }

            self.leaf = self.index.get_leaf(leaf.next);
            self.position = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_crosses_leaves_in_order() {
        let mut index = OrderedIndex::new(4).unwrap();
        for i in (0..20).rev() {
            index.put(i, i * 100);
        }
        assert!(index.leaf_count() > 1);

        let items: Vec<_> = index.entries().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = (0..20).map(|i| (i, i * 100)).collect();
        assert_eq!(items, expected);
    }

    #[test]
    fn test_iteration_is_restartable() {
        let mut index = OrderedIndex::new(5).unwrap();
        for i in 0..30 {
            index.put(i, ());
        }
        assert_eq!(index.entries().count(), 30);
        assert_eq!(index.entries().count(), 30);
        assert_eq!(index.keys().nth(10), Some(&10));
        assert_eq!(index.values().count(), 30);
    }

    #[test]
    fn test_empty_iteration() {
        let index: OrderedIndex<u8, u8> = OrderedIndex::default();
        assert_eq!(index.entries().next(), None);
    }
}
