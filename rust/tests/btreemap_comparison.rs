use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relmap::OrderedIndex;
use std::collections::BTreeMap;
use std::ops::Bound;

const KEY_SPACE: i32 = 5000;

fn random_pair(
    fanout: usize,
    ops: usize,
    seed: u64,
) -> (OrderedIndex<i32, i64>, BTreeMap<i32, i64>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut index = OrderedIndex::new(fanout).unwrap();
    let mut oracle = BTreeMap::new();

    for _ in 0..ops {
        let key = rng.gen_range(0..KEY_SPACE);
        let value: i64 = rng.gen();
        assert_eq!(index.put(key, value), oracle.insert(key, value));
    }
    (index, oracle)
}

#[test]
fn test_random_inserts_match_btreemap() {
    for (fanout, seed) in [(3, 1), (4, 2), (5, 3), (8, 4), (32, 5)] {
        let (index, oracle) = random_pair(fanout, 4000, seed);
        index.check_invariants().unwrap();

        assert_eq!(index.size(), oracle.len());
        let ours: Vec<_> = index.entries().collect();
        let expected: Vec<_> = oracle.iter().collect();
        assert_eq!(ours, expected, "fanout {}", fanout);

        for key in -10..KEY_SPACE + 10 {
            assert_eq!(index.get(&key), oracle.get(&key));
        }
    }
}

#[test]
fn test_invariants_hold_after_every_insert() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut index = OrderedIndex::new(3).unwrap();
    for _ in 0..1500 {
        index.put(rng.gen_range(0..KEY_SPACE), ());
        index.check_invariants().unwrap();
    }
}

#[test]
fn test_first_and_last_match_btreemap() {
    let (index, oracle) = random_pair(4, 1000, 7);
    assert_eq!(index.first_key(), oracle.keys().next());
    assert_eq!(index.last_key(), oracle.keys().next_back());
}

#[test]
fn test_range_maps_match_btreemap() {
    let (index, oracle) = random_pair(5, 3000, 11);
    let mut rng = StdRng::seed_from_u64(12);

    for _ in 0..200 {
        let a = rng.gen_range(-100..KEY_SPACE + 100);
        let b = rng.gen_range(-100..KEY_SPACE + 100);

        let head: BTreeMap<_, _> = oracle.range(..a).map(|(k, v)| (*k, *v)).collect();
        assert_eq!(index.head_map(&a), head);

        let tail: BTreeMap<_, _> = oracle.range(a..).map(|(k, v)| (*k, *v)).collect();
        assert_eq!(index.tail_map(&a), tail);

        let sub: BTreeMap<_, _> = if a < b {
            oracle.range(a..b).map(|(k, v)| (*k, *v)).collect()
        } else {
            BTreeMap::new()
        };
        assert_eq!(index.sub_map(&a, &b), sub);
    }
}

#[test]
fn test_lazy_ranges_match_btreemap() {
    let (index, oracle) = random_pair(6, 3000, 21);
    let mut rng = StdRng::seed_from_u64(22);

    for _ in 0..200 {
        let a = rng.gen_range(0..KEY_SPACE);
        let b = rng.gen_range(a..KEY_SPACE + 1);

        let ours: Vec<_> = index.range(a..=b).collect();
        let expected: Vec<_> = oracle.range(a..=b).collect();
        assert_eq!(ours, expected);

        let bounds = (Bound::Excluded(a), Bound::Excluded(b));
        if a < b {
            let ours: Vec<_> = index.range(bounds).collect();
            let expected: Vec<_> = oracle.range(bounds).collect();
            assert_eq!(ours, expected);
        }
    }
}

#[test]
fn test_sequential_and_reverse_loads() {
    let mut ascending = OrderedIndex::new(5).unwrap();
    let mut descending = OrderedIndex::new(5).unwrap();
    for i in 0..2000 {
        ascending.put(i, i);
        descending.put(1999 - i, 1999 - i);
    }
    ascending.check_invariants().unwrap();
    descending.check_invariants().unwrap();

    let a: Vec<_> = ascending.keys().copied().collect();
    let d: Vec<_> = descending.keys().copied().collect();
    assert_eq!(a, d);
    assert_eq!(a, (0..2000).collect::<Vec<_>>());
}
