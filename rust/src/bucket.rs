//! Fixed-capacity hash bucket shared by both hash indexes.
//!
//! Keys and values sit in parallel vectors, like the tree leaves. A bucket is
//! "full" at [`SLOTS`] entries; `push` itself never refuses, which is how the
//! extendable hash stores entries no split can separate.

use std::mem;

use crate::types::SLOTS;

#[derive(Debug, Clone)]
pub struct Bucket<K, V> {
    keys: Vec<K>,
    values: Vec<V>,
}

impl<K, V> Bucket<K, V> {
    pub fn new() -> Self {
        Self {
            keys: Vec::with_capacity(SLOTS),
            values: Vec::with_capacity(SLOTS),
        }
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.keys.len() >= SLOTS
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Append an entry. The caller has already ruled out an equal key.
    pub fn push(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.keys.iter().zip(self.values.iter())
    }

    /// Remove every entry, leaving the bucket empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (K, V)> {
        let keys = mem::take(&mut self.keys);
        let values = mem::take(&mut self.values);
        keys.into_iter().zip(values)
    }
}

impl<K: Eq, V> Bucket<K, V> {
    fn position(&self, key: &K) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.position(key).map(|i| &self.values[i])
    }

    /// Overwrite the value bound to `key`, handing `value` back when the key
    /// is not in this bucket.
    pub fn replace(&mut self, key: &K, value: V) -> Result<V, V> {
        match self.position(key) {
            Some(i) => Ok(mem::replace(&mut self.values[i], value)),
            None => Err(value),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_hashers {
    use std::hash::{BuildHasherDefault, Hasher};

    /// Hashes an integer key to itself, so tests can place keys in buckets.
    #[derive(Default)]
    pub struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for &byte in bytes {
                self.0 = (self.0 << 8) | u64::from(byte);
            }
        }

        fn write_u64(&mut self, i: u64) {
            self.0 = i;
        }

        fn write_usize(&mut self, i: usize) {
            self.0 = i as u64;
        }
    }

    /// Every key gets the same hash.
    #[derive(Default)]
    pub struct ConstantHasher;

    impl Hasher for ConstantHasher {
        fn finish(&self) -> u64 {
            7
        }

        fn write(&mut self, _bytes: &[u8]) {}
    }

    pub type Identity = BuildHasherDefault<IdentityHasher>;
    pub type Constant = BuildHasherDefault<ConstantHasher>;
}
