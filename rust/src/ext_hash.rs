//! Extendable hash index.
//!
//! A directory of `2^global_depth` slots points into a physical bucket store.
//! Several slots share a bucket until it overflows; the bucket then splits on
//! its next hash bit, doubling the directory first when the bucket already
//! distinguishes as many bits as the directory does.

use std::cell::Cell;
use std::fmt::{Debug, Write};
use std::hash::{BuildHasher, Hash};

use log::{debug, trace, warn};

use crate::arena::Arena;
use crate::bucket::Bucket;
use crate::construction::validation::validate_bucket_count;
use crate::error::InitResult;
use crate::types::{DefaultHashBuilder, NodeId, DEFAULT_BUCKETS, SLOTS};

/// Directory growth stops here; a bucket that would need more bits overflows.
const MAX_GLOBAL_DEPTH: u32 = 24;

#[derive(Debug, Clone)]
struct DepthBucket<K, V> {
    local_depth: u32,
    slots: Bucket<K, V>,
}

/// Hash index with a doubling directory over shared buckets.
///
/// # Examples
///
/// ```
/// use relmap::ExtendableHashIndex;
///
/// let mut index = ExtendableHashIndex::new(4).unwrap();
/// for i in 0..100 {
///     index.put(i, i * 2);
/// }
/// assert_eq!(index.get(&40), Some(&80));
/// assert_eq!(index.size(), 100);
/// assert_eq!(index.directory_len(), 1 << index.global_depth());
/// ```
#[derive(Debug)]
pub struct ExtendableHashIndex<K, V, S = DefaultHashBuilder> {
    global_depth: u32,
    directory: Vec<NodeId>,
    buckets: Arena<DepthBucket<K, V>>,
    hasher: S,
    accesses: Cell<u64>,
}

impl<K: Hash + Eq, V> ExtendableHashIndex<K, V> {
    /// Create an index with `initial_buckets` buckets, which must be a power of two.
    pub fn new(initial_buckets: usize) -> InitResult<Self> {
        Self::with_hasher(initial_buckets, DefaultHashBuilder::default())
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ExtendableHashIndex<K, V, S> {
    pub fn with_hasher(initial_buckets: usize, hasher: S) -> InitResult<Self> {
        validate_bucket_count(initial_buckets)?;
        Ok(Self::with_checked_buckets(initial_buckets, hasher))
    }

    fn hash_of(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Directory slot for a hash: its low `global_depth` bits.
    fn slot_of(&self, hash: u64) -> usize {
        (hash & ((1u64 << self.global_depth) - 1)) as usize
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let slot = self.slot_of(self.hash_of(key));
        self.accesses.set(self.accesses.get() + 1);
        self.buckets[self.directory[slot]].slots.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key-value pair, overwriting any value already bound to `key`.
    ///
    /// Returns the previous value, if any.
    pub fn put(&mut self, key: K, mut value: V) -> Option<V> {
        let hash = self.hash_of(&key);

        loop {
            let slot = self.slot_of(hash);
            let bucket_id = self.directory[slot];
            self.accesses.set(self.accesses.get() + 1);
            trace!("put into bucket {} via slot {}", bucket_id, slot);

            let bucket = &mut self.buckets[bucket_id];
            value = match bucket.slots.replace(&key, value) {
                Ok(old) => return Some(old),
                Err(value) => value,
            };
            if !bucket.slots.is_full() {
                bucket.slots.push(key, value);
                return None;
            }

            let hasher = &self.hasher;
            let inseparable = bucket.slots.keys().iter().all(|k| hasher.hash_one(k) == hash);
            if inseparable || bucket.local_depth >= MAX_GLOBAL_DEPTH {
                warn!(
                    "bucket {} overflows past {} slots: entries cannot be separated",
                    bucket_id, SLOTS
                );
                bucket.slots.push(key, value);
                return None;
            }

            self.split_bucket(bucket_id);
        }
    }

    /// Split a full bucket on its next hash bit, doubling the directory first
    /// if the bucket is already as deep as the directory.
    fn split_bucket(&mut self, bucket_id: NodeId) {
        let local_depth = self.buckets[bucket_id].local_depth;
        if local_depth == self.global_depth {
            self.directory.extend_from_within(..);
            self.global_depth += 1;
            debug!(
                "directory doubled to {} slots (global depth {})",
                self.directory.len(),
                self.global_depth
            );
        }

        let split_bit = 1u64 << local_depth;
        let new_id = self.buckets.allocate(DepthBucket {
            local_depth: local_depth + 1,
            slots: Bucket::new(),
        });
        let old = &mut self.buckets[bucket_id];
        old.local_depth = local_depth + 1;
        let entries: Vec<_> = old.slots.drain().collect();

        for (slot, target) in self.directory.iter_mut().enumerate() {
            if *target == bucket_id && (slot as u64) & split_bit != 0 {
                *target = new_id;
            }
        }

        for (key, value) in entries {
            let destination = if self.hash_of(&key) & split_bit != 0 {
                new_id
            } else {
                bucket_id
            };
            self.buckets[destination].slots.push(key, value);
        }
        debug!(
            "split bucket {} into {} + {} (local depth {})",
            bucket_id,
            bucket_id,
            new_id,
            local_depth + 1
        );
    }
}

impl<K, V, S> ExtendableHashIndex<K, V, S> {
    /// Populated slots across the bucket store, i.e. the number of entries.
    pub fn size(&self) -> usize {
        self.buckets.iter().map(|b| b.slots.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.size()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.slots.is_empty())
    }

    /// Every entry, bucket by bucket in allocation order.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets.iter().flat_map(|b| b.slots.iter())
    }

    pub fn global_depth(&self) -> u32 {
        self.global_depth
    }

    pub fn directory_len(&self) -> usize {
        self.directory.len()
    }

    /// Number of physical buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Nominal slot capacity of the bucket store.
    pub fn capacity(&self) -> usize {
        SLOTS * self.buckets.len()
    }

    /// Buckets visited by `get` and `put` since construction or the last reset.
    pub fn accesses(&self) -> u64 {
        self.accesses.get()
    }

    pub fn reset_accesses(&self) {
        self.accesses.set(0);
    }
}

impl<K: Debug, V, S> ExtendableHashIndex<K, V, S> {
    /// Render the directory, one slot per line, then the bucket store.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "global depth {}", self.global_depth);
        for (slot, id) in self.directory.iter().enumerate() {
            let _ = writeln!(out, "  [{:b}] -> bucket {}", slot, id);
        }
        for (id, bucket) in self.buckets.iter_with_ids() {
            let _ = writeln!(
                out,
                "bucket {} (local depth {}): {:?}",
                id,
                bucket.local_depth,
                bucket.slots.keys()
            );
        }
        out
    }
}

impl<K, V, S> ExtendableHashIndex<K, V, S> {
    fn with_checked_buckets(initial_buckets: usize, hasher: S) -> Self {
        let global_depth = initial_buckets.trailing_zeros();

        let mut buckets = Arena::with_capacity(initial_buckets);
        let directory = (0..initial_buckets)
            .map(|_| {
                buckets.allocate(DepthBucket {
                    local_depth: global_depth,
                    slots: Bucket::new(),
                })
            })
            .collect();

        Self {
            global_depth,
            directory,
            buckets,
            hasher,
            accesses: Cell::new(0),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> Default for ExtendableHashIndex<K, V, S> {
    fn default() -> Self {
        Self::with_checked_buckets(DEFAULT_BUCKETS, S::default())
    }
}
