//! Linear hash index.
//!
//! Home buckets are split one at a time, round robin, whenever the load
//! factor is exceeded. Keys whose first-resolution address lies behind the
//! split pointer have already been redistributed and are addressed with the
//! doubled modulus instead. Full buckets grow boxed overflow chains.

use std::cell::Cell;
use std::fmt::{Debug, Write};
use std::hash::{BuildHasher, Hash};
use std::iter;

use log::{debug, trace};

use crate::bucket::Bucket;
use crate::construction::validation::validate_bucket_count;
use crate::error::InitResult;
use crate::types::{DefaultHashBuilder, DEFAULT_BUCKETS, LOAD_FACTOR, SLOTS};

/// A home bucket and its overflow buckets.
#[derive(Debug, Clone)]
struct Chain<K, V> {
    bucket: Bucket<K, V>,
    overflow: Option<Box<Chain<K, V>>>,
}

impl<K, V> Chain<K, V> {
    fn new() -> Self {
        Self {
            bucket: Bucket::new(),
            overflow: None,
        }
    }

    fn buckets(&self) -> impl Iterator<Item = &Bucket<K, V>> {
        iter::successors(Some(self), |chain| chain.overflow.as_deref())
            .map(|chain| &chain.bucket)
    }

    /// Store in the first bucket with a free slot, growing the chain if needed.
    fn push(&mut self, key: K, value: V) {
        let mut chain = self;
        while chain.bucket.is_full() {
            chain = &mut **chain.overflow.get_or_insert_with(|| Box::new(Chain::new()));
        }
        chain.bucket.push(key, value);
    }

    /// Move every entry out, leaving a single empty home bucket.
    fn drain(&mut self) -> Vec<(K, V)> {
        let mut entries: Vec<_> = self.bucket.drain().collect();
        let mut next = self.overflow.take();
        while let Some(mut chain) = next {
            entries.extend(chain.bucket.drain());
            next = chain.overflow.take();
        }
        entries
    }
}

impl<K: Eq, V> Chain<K, V> {
    fn replace(&mut self, key: &K, mut value: V) -> Result<V, V> {
        let mut current = Some(self);
        while let Some(chain) = current {
            value = match chain.bucket.replace(key, value) {
                Ok(old) => return Ok(old),
                Err(value) => value,
            };
            current = chain.overflow.as_deref_mut();
        }
        Err(value)
    }
}

/// Hash index that grows one bucket per split, in round-robin order.
///
/// # Examples
///
/// ```
/// use relmap::LinearHashIndex;
///
/// let mut index = LinearHashIndex::new(4).unwrap();
/// for i in 0..100 {
///     index.put(i, i + 1);
/// }
/// assert_eq!(index.get(&99), Some(&100));
/// assert_eq!(index.len(), 100);
///
/// let (mod1, _) = index.moduli();
/// assert_eq!(index.size(), 4 * (mod1 + index.split_pointer()));
/// ```
#[derive(Debug)]
pub struct LinearHashIndex<K, V, S = DefaultHashBuilder> {
    chains: Vec<Chain<K, V>>,
    mod1: usize,
    mod2: usize,
    split: usize,
    pairs: usize,
    hasher: S,
    accesses: Cell<u64>,
}

impl<K: Hash + Eq, V> LinearHashIndex<K, V> {
    /// Create an index with `initial_buckets` home buckets, which must be a power of two.
    pub fn new(initial_buckets: usize) -> InitResult<Self> {
        Self::with_hasher(initial_buckets, DefaultHashBuilder::default())
    }
}

impl<K, V, S> LinearHashIndex<K, V, S> {
    fn with_checked_buckets(initial_buckets: usize, hasher: S) -> Self {
        Self {
            chains: iter::repeat_with(Chain::new).take(initial_buckets).collect(),
            mod1: initial_buckets,
            mod2: 2 * initial_buckets,
            split: 0,
            pairs: 0,
            hasher,
            accesses: Cell::new(0),
        }
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> LinearHashIndex<K, V, S> {
    pub fn with_hasher(initial_buckets: usize, hasher: S) -> InitResult<Self> {
        validate_bucket_count(initial_buckets)?;
        Ok(Self::with_checked_buckets(initial_buckets, hasher))
    }

    /// Home bucket for `key` under the current split state.
    fn address(&self, key: &K) -> usize {
        let hash = self.hasher.hash_one(key);
        let home = (hash % self.mod1 as u64) as usize;
        if home < self.split {
            (hash % self.mod2 as u64) as usize
        } else {
            home
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let chain = &self.chains[self.address(key)];
        for bucket in chain.buckets() {
            self.accesses.set(self.accesses.get() + 1);
            if let Some(value) = bucket.get(key) {
                return Some(value);
            }
        }
        None
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key-value pair, overwriting any value already bound to `key`.
    ///
    /// Returns the previous value, if any. Only a new key counts towards the
    /// load factor, and it triggers at most one split.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let address = self.address(&key);
        self.accesses.set(self.accesses.get() + 1);
        trace!("put into chain {}", address);

        let chain = &mut self.chains[address];
        let value = match chain.replace(&key, value) {
            Ok(old) => return Some(old),
            Err(value) => value,
        };
        chain.push(key, value);
        self.pairs += 1;

        if self.pairs as f64 / self.size() as f64 > LOAD_FACTOR {
            self.split_next();
        }
        None
    }

    /// Split the chain under the split pointer into itself and a new home
    /// bucket at the end of the table.
    fn split_next(&mut self) {
        self.chains.push(Chain::new());
        let target = self.split;
        let entries = self.chains[target].drain();

        self.split += 1;
        if self.split == self.mod1 {
            self.split = 0;
            self.mod1 *= 2;
            self.mod2 *= 2;
            debug!("split round complete, moduli now {} / {}", self.mod1, self.mod2);
        }
        debug!(
            "split chain {} ({} entries), {} home buckets",
            target,
            entries.len(),
            self.chains.len()
        );

        for (key, value) in entries {
            let address = self.address(&key);
            self.chains[address].push(key, value);
        }
    }
}

impl<K, V, S> LinearHashIndex<K, V, S> {
    /// Nominal capacity: `SLOTS * (mod1 + split)`. Use [`len`](Self::len) for
    /// the number of entries.
    pub fn size(&self) -> usize {
        SLOTS * (self.mod1 + self.split)
    }

    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }

    /// Every entry, chain by chain.
    pub fn entries(&self) -> impl Iterator<Item = (&K, &V)> {
        self.chains
            .iter()
            .flat_map(|chain| chain.buckets())
            .flat_map(|bucket| bucket.iter())
    }

    pub fn split_pointer(&self) -> usize {
        self.split
    }

    /// The two moduli `(mod1, mod2)`.
    pub fn moduli(&self) -> (usize, usize) {
        (self.mod1, self.mod2)
    }

    pub fn home_bucket_count(&self) -> usize {
        self.chains.len()
    }

    pub fn overflow_bucket_count(&self) -> usize {
        self.chains.iter().map(|chain| chain.buckets().count() - 1).sum()
    }

    /// Buckets visited by `get` and `put` since construction or the last reset.
    pub fn accesses(&self) -> u64 {
        self.accesses.get()
    }

    pub fn reset_accesses(&self) {
        self.accesses.set(0);
    }
}

impl<K: Debug, V, S> LinearHashIndex<K, V, S> {
    /// Render each chain on one line, overflow buckets separated by `->`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "mod1 {} mod2 {} split {} pairs {}",
            self.mod1, self.mod2, self.split, self.pairs
        );
        for (i, chain) in self.chains.iter().enumerate() {
            let _ = write!(out, "{}:", i);
            for (n, bucket) in chain.buckets().enumerate() {
                if n > 0 {
                    out.push_str(" ->");
                }
                let _ = write!(out, " {:?}", bucket.keys());
            }
            out.push('\n');
        }
        out
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default> Default for LinearHashIndex<K, V, S> {
    fn default() -> Self {
        Self::with_checked_buckets(DEFAULT_BUCKETS, S::default())
    }
}
