//! The associative index contract and name-based index selection.
//!
//! Every structure in the crate answers the same four questions (get, put,
//! size, entries), so a relational layer can pick one by name and hold it as
//! a trait object.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

use crate::error::{IndexError, IndexResult};
use crate::ext_hash::ExtendableHashIndex;
use crate::key::{CompositeKey, Tuple};
use crate::lin_hash::LinearHashIndex;
use crate::types::OrderedIndex;

/// Operations shared by every associative index.
pub trait AssociativeIndex<K, V> {
    /// Value bound to `key`, if any.
    fn get(&self, key: &K) -> Option<&V>;

    /// Bind `value` to `key`, returning the value it replaced.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// The structure's own notion of size. For the linear hash this is its
    /// nominal capacity; everywhere else it equals [`len`](Self::len).
    fn size(&self) -> usize;

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries, in the structure's iteration order.
    fn entries(&self) -> Vec<(&K, &V)>;

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn kind(&self) -> IndexKind;

    /// Nodes or buckets touched by `get` and `put` so far.
    fn accesses(&self) -> u64;
}

// ============================================================================
// INDEX KIND
// ============================================================================

/// The available index structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    Ordered,
    ExtendableHash,
    LinearHash,
    SortedBaseline,
}

impl IndexKind {
    pub const ALL: [IndexKind; 4] = [
        IndexKind::Ordered,
        IndexKind::ExtendableHash,
        IndexKind::LinearHash,
        IndexKind::SortedBaseline,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Ordered => "ordered",
            IndexKind::ExtendableHash => "extendable_hash",
            IndexKind::LinearHash => "linear_hash",
            IndexKind::SortedBaseline => "baseline",
        }
    }

    /// Name the relational layer uses for this structure.
    pub fn map_name(&self) -> &'static str {
        match self {
            IndexKind::Ordered => "BpTreeMap",
            IndexKind::ExtendableHash => "ExtHashMap",
            IndexKind::LinearHash => "LinHashMap",
            IndexKind::SortedBaseline => "TreeMap",
        }
    }

    /// Whether `entries()` comes back in ascending key order.
    pub fn is_ordered(&self) -> bool {
        matches!(self, IndexKind::Ordered | IndexKind::SortedBaseline)
    }

    /// Build an empty index of this kind over composite keys and tuples.
    ///
    /// `initial_capacity` is the initial bucket count of the hash indexes and
    /// must be a power of two for them; the tree and the baseline ignore it.
    pub fn build(
        &self,
        initial_capacity: usize,
    ) -> IndexResult<Box<dyn AssociativeIndex<CompositeKey, Tuple>>> {
        let index: Box<dyn AssociativeIndex<CompositeKey, Tuple>> = match self {
            IndexKind::Ordered => Box::new(OrderedIndex::<CompositeKey, Tuple>::default()),
            IndexKind::ExtendableHash => {
                Box::new(ExtendableHashIndex::<CompositeKey, Tuple>::new(initial_capacity)?)
            }
            IndexKind::LinearHash => {
                Box::new(LinearHashIndex::<CompositeKey, Tuple>::new(initial_capacity)?)
            }
            IndexKind::SortedBaseline => Box::new(SortedBaseline::<CompositeKey, Tuple>::new()),
        };
        Ok(index)
    }
}

impl FromStr for IndexKind {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IndexKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s || kind.map_name() == s)
            .ok_or_else(|| IndexError::UnknownIndexKind(s.to_string()))
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// SORTED BASELINE
// ============================================================================

/// `BTreeMap` behind the index contract, used as a reference structure.
#[derive(Debug, Clone)]
pub struct SortedBaseline<K, V> {
    map: BTreeMap<K, V>,
    accesses: Cell<u64>,
}

impl<K: Ord, V> SortedBaseline<K, V> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
            accesses: Cell::new(0),
        }
    }
}

impl<K: Ord, V> Default for SortedBaseline<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> AssociativeIndex<K, V> for SortedBaseline<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        self.accesses.set(self.accesses.get() + 1);
        self.map.get(key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        self.accesses.set(self.accesses.get() + 1);
        self.map.insert(key, value)
    }

    fn size(&self) -> usize {
        self.map.len()
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        self.map.iter().collect()
    }

    fn kind(&self) -> IndexKind {
        IndexKind::SortedBaseline
    }

    fn accesses(&self) -> u64 {
        self.accesses.get()
    }
}

// ============================================================================
// CONTRACT IMPLEMENTATIONS
// ============================================================================

impl<K: Ord + Clone, V> AssociativeIndex<K, V> for OrderedIndex<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        OrderedIndex::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        OrderedIndex::put(self, key, value)
    }

    fn size(&self) -> usize {
        OrderedIndex::size(self)
    }

    fn len(&self) -> usize {
        OrderedIndex::len(self)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        OrderedIndex::entries(self).collect()
    }

    fn kind(&self) -> IndexKind {
        IndexKind::Ordered
    }

    fn accesses(&self) -> u64 {
        OrderedIndex::accesses(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> AssociativeIndex<K, V> for ExtendableHashIndex<K, V, S> {
    fn get(&self, key: &K) -> Option<&V> {
        ExtendableHashIndex::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        ExtendableHashIndex::put(self, key, value)
    }

    fn size(&self) -> usize {
        ExtendableHashIndex::size(self)
    }

    fn len(&self) -> usize {
        ExtendableHashIndex::len(self)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        ExtendableHashIndex::entries(self).collect()
    }

    fn kind(&self) -> IndexKind {
        IndexKind::ExtendableHash
    }

    fn accesses(&self) -> u64 {
        ExtendableHashIndex::accesses(self)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> AssociativeIndex<K, V> for LinearHashIndex<K, V, S> {
    fn get(&self, key: &K) -> Option<&V> {
        LinearHashIndex::get(self, key)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        LinearHashIndex::put(self, key, value)
    }

    fn size(&self) -> usize {
        LinearHashIndex::size(self)
    }

    fn len(&self) -> usize {
        LinearHashIndex::len(self)
    }

    fn entries(&self) -> Vec<(&K, &V)> {
        LinearHashIndex::entries(self).collect()
    }

    fn kind(&self) -> IndexKind {
        IndexKind::LinearHash
    }

    fn accesses(&self) -> u64 {
        LinearHashIndex::accesses(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Value;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in IndexKind::ALL {
            assert_eq!(kind.name().parse::<IndexKind>(), Ok(kind));
            assert_eq!(kind.map_name().parse::<IndexKind>(), Ok(kind));
        }
        assert_eq!(
            "HashMap".parse::<IndexKind>(),
            Err(IndexError::UnknownIndexKind("HashMap".to_string()))
        );
    }

    #[test]
    fn test_build_every_kind() {
        for kind in IndexKind::ALL {
            let mut index = kind.build(4).unwrap();
            assert_eq!(index.kind(), kind);
            assert!(index.is_empty());

            let key = CompositeKey::from(Value::Integer(1));
            assert_eq!(index.put(key.clone(), vec![Value::from("a")]), None);
            assert_eq!(index.get(&key), Some(&vec![Value::from("a")]));
            assert_eq!(index.len(), 1);
            assert!(index.accesses() > 0);
        }
    }

    #[test]
    fn test_build_rejects_bad_bucket_count() {
        assert!(IndexKind::ExtendableHash.build(3).is_err());
        assert!(IndexKind::LinearHash.build(0).is_err());
        // capacity does not apply to the tree
        assert!(IndexKind::Ordered.build(3).is_ok());
    }

    #[test]
    fn test_linear_hash_size_is_nominal() {
        let mut index = IndexKind::LinearHash.build(4).unwrap();
        index.put(CompositeKey::from(Value::Long(9)), Tuple::new());
        assert_eq!(index.len(), 1);
        assert_eq!(index.size(), 16);
    }
}
