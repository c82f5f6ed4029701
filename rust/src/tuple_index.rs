//! Typed index over composite keys and tuples.
//!
//! Wraps any [`AssociativeIndex`] chosen by [`IndexKind`] and checks every key
//! and tuple against the declared [`ElementTypes`] before it reaches the
//! structure, so a rejected call never mutates the index.

use log::trace;

use crate::contract::{AssociativeIndex, IndexKind};
use crate::error::IndexResult;
use crate::key::{CompositeKey, ElementTypes, Tuple};

/// The relational layer's handle on one index.
///
/// # Examples
///
/// ```
/// use relmap::{CompositeKey, ElementTypes, IndexKind, TupleIndex, Value};
///
/// let types = ElementTypes::parse("Integer", "Integer String").unwrap();
/// let kind: IndexKind = "LinHashMap".parse().unwrap();
/// let mut index = TupleIndex::new(types, kind, 4).unwrap();
///
/// let key = CompositeKey::from(Value::Integer(7));
/// index.put(key.clone(), vec![Value::Integer(7), Value::from("seven")]).unwrap();
/// assert_eq!(index.get(&key).unwrap().map(|t| t.len()), Some(2));
///
/// // wrong key domain
/// let bad = CompositeKey::from(Value::Long(7));
/// assert!(index.get(&bad).is_err());
/// ```
pub struct TupleIndex {
    types: ElementTypes,
    kind: IndexKind,
    index: Box<dyn AssociativeIndex<CompositeKey, Tuple>>,
}

impl TupleIndex {
    /// Build an empty index of `kind`; `initial_capacity` is the initial
    /// bucket count for the hash kinds.
    pub fn new(types: ElementTypes, kind: IndexKind, initial_capacity: usize) -> IndexResult<Self> {
        Ok(Self {
            types,
            kind,
            index: kind.build(initial_capacity)?,
        })
    }

    /// Store `tuple` under `key`, returning the tuple it replaced.
    pub fn put(&mut self, key: CompositeKey, tuple: Tuple) -> IndexResult<Option<Tuple>> {
        self.types.check_key(&key)?;
        self.types.check_tuple(&tuple)?;
        trace!("{} put {}", self.kind, key);
        Ok(self.index.put(key, tuple))
    }

    pub fn get(&self, key: &CompositeKey) -> IndexResult<Option<&Tuple>> {
        self.types.check_key(key)?;
        Ok(self.index.get(key))
    }

    pub fn contains_key(&self, key: &CompositeKey) -> IndexResult<bool> {
        self.get(key).map(|tuple| tuple.is_some())
    }

    /// Entries in the backing structure's own order.
    pub fn entries(&self) -> Vec<(&CompositeKey, &Tuple)> {
        self.index.entries()
    }

    /// Entries in ascending key order, whatever the backing structure.
    pub fn sorted_entries(&self) -> Vec<(&CompositeKey, &Tuple)> {
        let mut entries = self.index.entries();
        if !self.kind.is_ordered() {
            entries.sort_by(|a, b| a.0.cmp(b.0));
        }
        entries
    }

    /// The backing structure's `size()`; see [`AssociativeIndex::size`].
    pub fn size(&self) -> usize {
        self.index.size()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    pub fn element_types(&self) -> &ElementTypes {
        &self.types
    }

    pub fn accesses(&self) -> u64 {
        self.index.accesses()
    }
}

impl std::fmt::Debug for TupleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TupleIndex")
            .field("kind", &self.kind)
            .field("types", &self.types)
            .field("len", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::key::{Domain, Value};

    fn course_types() -> ElementTypes {
        ElementTypes::parse("String Integer", "String Integer String").unwrap()
    }

    fn course(id: &str, year: i32, title: &str) -> (CompositeKey, Tuple) {
        let key = CompositeKey::new(vec![Value::from(id), Value::Integer(year)]);
        let tuple = vec![Value::from(id), Value::Integer(year), Value::from(title)];
        (key, tuple)
    }

    #[test]
    fn test_round_trip_every_kind() {
        for kind in IndexKind::ALL {
            let mut index = TupleIndex::new(course_types(), kind, 2).unwrap();
            for year in 2000..2040 {
                let (key, tuple) = course("CS", year, "Databases");
                assert_eq!(index.put(key, tuple).unwrap(), None);
            }
            let (key, tuple) = course("CS", 2010, "Databases");
            assert_eq!(index.get(&key).unwrap(), Some(&tuple));
            assert_eq!(index.len(), 40);

            let keys: Vec<_> = index
                .sorted_entries()
                .into_iter()
                .map(|(k, _)| k.clone())
                .collect();
            let mut expected = keys.clone();
            expected.sort();
            assert_eq!(keys, expected, "{} sorted_entries", kind);
        }
    }

    #[test]
    fn test_overwrite_returns_previous_tuple() {
        let mut index = TupleIndex::new(course_types(), IndexKind::ExtendableHash, 4).unwrap();
        let (key, old) = course("EE", 1999, "Circuits");
        let (_, new) = course("EE", 1999, "Circuits II");
        index.put(key.clone(), old.clone()).unwrap();
        assert_eq!(index.put(key.clone(), new.clone()).unwrap(), Some(old));
        assert_eq!(index.get(&key).unwrap(), Some(&new));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_rejects_mismatched_key_without_mutation() {
        let mut index = TupleIndex::new(course_types(), IndexKind::Ordered, 4).unwrap();
        let bad_key = CompositeKey::new(vec![Value::from("CS"), Value::Long(2001)]);
        let (_, tuple) = course("CS", 2001, "Compilers");

        let err = index.put(bad_key, tuple).unwrap_err();
        assert_eq!(
            err,
            IndexError::TypeMismatch {
                position: 1,
                expected: Domain::Integer,
                found: Domain::Long,
            }
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_rejects_short_tuple() {
        let mut index = TupleIndex::new(course_types(), IndexKind::LinearHash, 4).unwrap();
        let (key, mut tuple) = course("CS", 2001, "Compilers");
        tuple.pop();
        assert_eq!(
            index.put(key.clone(), tuple).unwrap_err(),
            IndexError::ArityMismatch {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(index.contains_key(&key), Ok(false));
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_bad_capacity_is_config_error() {
        let err = TupleIndex::new(course_types(), IndexKind::LinearHash, 5).unwrap_err();
        assert!(err.is_config_error());
    }
}
