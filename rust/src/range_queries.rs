//! Range query operations for the ordered index.
//!
//! The `*_map` operations materialize a sorted map from one left-to-right scan
//! of the leaf chain. [`OrderedIndex::range`] is the lazy counterpart: it
//! descends once to the first qualifying leaf and continues along the chain.

use std::collections::BTreeMap;
use std::ops::{Bound, RangeBounds};

use crate::iteration::ItemIterator;
use crate::types::{NodeRef, OrderedIndex};

impl<K: Ord + Clone, V: Clone> OrderedIndex<K, V> {
    /// Entries with `key < to`.
    pub fn head_map(&self, to: &K) -> BTreeMap<K, V> {
        self.entries()
            .take_while(|(k, _)| *k < to)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Entries with `from <= key`.
    pub fn tail_map(&self, from: &K) -> BTreeMap<K, V> {
        self.entries()
            .skip_while(|(k, _)| *k < from)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Entries with `from <= key < to`; empty when `from >= to`.
    ///
    /// # Examples
    ///
    /// ```
    /// use relmap::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(5).unwrap();
    /// for i in 0..10 {
    ///     index.put(i, i * i);
    /// }
    /// let sub: Vec<_> = index.sub_map(&3, &6).into_iter().collect();
    /// assert_eq!(sub, vec![(3, 9), (4, 16), (5, 25)]);
    /// ```
    pub fn sub_map(&self, from: &K, to: &K) -> BTreeMap<K, V> {
        self.entries()
            .skip_while(|(k, _)| *k < from)
            .take_while(|(k, _)| *k < to)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Returns a lazy iterator over key-value pairs in a range.
    ///
    /// # Examples
    ///
    /// ```
    /// use relmap::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(4).unwrap();
    /// for i in 0..10 {
    ///     index.put(i, format!("value{}", i));
    /// }
    ///
    /// let keys: Vec<_> = index.range(3..7).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5, 6]);
    ///
    /// let keys: Vec<_> = index.range(3..=7).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![3, 4, 5, 6, 7]);
    ///
    /// let keys: Vec<_> = index.range(..2).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, vec![0, 1]);
    /// ```
    pub fn range<R>(&self, range: R) -> ItemIterator<'_, K, V>
    where
        R: RangeBounds<K>,
    {
        let end = match range.end_bound() {
            Bound::Included(key) => Bound::Included(key.clone()),
            Bound::Excluded(key) => Bound::Excluded(key.clone()),
            Bound::Unbounded => Bound::Unbounded,
        };

        let (leaf_id, position) = match range.start_bound() {
            Bound::Included(key) => self.find_range_start(key, false),
            Bound::Excluded(key) => self.find_range_start(key, true),
            Bound::Unbounded => (self.first_leaf_id(), 0),
        };

        ItemIterator::new(self, self.get_leaf(leaf_id), position, end)
    }

    /// Leaf and slot of the first key at (or, with `exclusive`, after) `start`.
    ///
    /// The slot may be one past the leaf's last key; the iterator then moves on
    /// to the next leaf.
    fn find_range_start(&self, start: &K, exclusive: bool) -> (u32, usize) {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => {
                    let keys = &self.leaf_arena[id].keys;
                    let position = if exclusive {
                        keys.partition_point(|k| k <= start)
                    } else {
                        keys.partition_point(|k| k < start)
                    };
                    return (id, position);
                }
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    current = branch.children[branch.find_child_index(start)];
                }
            }
        }
    }
}

impl<K: Ord, V> OrderedIndex<K, V> {
    /// Smallest key, taken from the head of the leaf chain.
    pub fn first_key(&self) -> Option<&K> {
        self.keys().next()
    }

    /// Largest key, found by scanning the leaf chain to its end.
    pub fn last_key(&self) -> Option<&K> {
        self.keys().last()
    }
}
