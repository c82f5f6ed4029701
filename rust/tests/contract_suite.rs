//! The same behavioral checks, run against every index kind.

use paste::paste;
use relmap::{AssociativeIndex, CompositeKey, IndexKind, Tuple, Value};

fn key(i: i32) -> CompositeKey {
    CompositeKey::new(vec![Value::Integer(i), Value::from(format!("k{}", i % 7).as_str())])
}

fn tuple(i: i32) -> Tuple {
    vec![Value::Integer(i), Value::Double(f64::from(i) / 2.0)]
}

fn loaded(kind: IndexKind, n: i32) -> Box<dyn AssociativeIndex<CompositeKey, Tuple>> {
    let mut index = kind.build(4).unwrap();
    for i in 0..n {
        assert_eq!(index.put(key(i), tuple(i)), None);
    }
    index
}

fn round_trip(kind: IndexKind) {
    let index = loaded(kind, 500);
    for i in 0..500 {
        assert_eq!(index.get(&key(i)), Some(&tuple(i)), "{} key {}", kind, i);
    }
    assert_eq!(index.get(&key(500)), None);
    assert_eq!(index.len(), 500);
    assert!(!index.contains_key(&key(-1)));
}

fn overwrite(kind: IndexKind) {
    let mut index = loaded(kind, 100);
    for i in 0..100 {
        assert_eq!(index.put(key(i), tuple(i + 1)), Some(tuple(i)));
    }
    assert_eq!(index.len(), 100);
    assert_eq!(index.get(&key(42)), Some(&tuple(43)));
}

fn entries_cover_everything(kind: IndexKind) {
    let index = loaded(kind, 300);
    let mut keys: Vec<_> = index.entries().into_iter().map(|(k, _)| k.clone()).collect();
    if kind.is_ordered() {
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
    keys.sort();
    let mut expected: Vec<_> = (0..300).map(key).collect();
    expected.sort();
    assert_eq!(keys, expected);
}

fn size_semantics(kind: IndexKind) {
    let index = loaded(kind, 250);
    match kind {
        // nominal capacity, always enough to hold the entries
        IndexKind::LinearHash => {
            assert_eq!(index.size() % 4, 0);
            assert!(index.size() as f64 * 0.75 >= index.len() as f64);
        }
        _ => assert_eq!(index.size(), index.len()),
    }
}

fn empty_index(kind: IndexKind) {
    let index = kind.build(1).unwrap();
    assert!(index.is_empty());
    assert_eq!(index.get(&key(0)), None);
    assert!(index.entries().is_empty());
}

fn accesses_grow(kind: IndexKind) {
    let index = loaded(kind, 50);
    let before = index.accesses();
    index.get(&key(10));
    assert!(index.accesses() > before);
}

macro_rules! contract_tests {
    ($($kind:ident),* $(,)?) => {
        paste! {
            $(
                #[test]
                fn [<test_ $kind:snake _round_trip>]() {
                    round_trip(IndexKind::$kind);
                }

                #[test]
                fn [<test_ $kind:snake _overwrite>]() {
                    overwrite(IndexKind::$kind);
                }

                #[test]
                fn [<test_ $kind:snake _entries_cover_everything>]() {
                    entries_cover_everything(IndexKind::$kind);
                }

                #[test]
                fn [<test_ $kind:snake _size_semantics>]() {
                    size_semantics(IndexKind::$kind);
                }

                #[test]
                fn [<test_ $kind:snake _empty_index>]() {
                    empty_index(IndexKind::$kind);
                }

                #[test]
                fn [<test_ $kind:snake _accesses_grow>]() {
                    accesses_grow(IndexKind::$kind);
                }
            )*
        }
    };
}

contract_tests!(Ordered, ExtendableHash, LinearHash, SortedBaseline);
