use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use relmap::{AssociativeIndex, CompositeKey, IndexKind, OrderedIndex, Tuple, Value};

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn random_keys(n: usize) -> Vec<CompositeKey> {
    let mut rng = StdRng::seed_from_u64(0xBEEF);
    (0..n)
        .map(|_| CompositeKey::from(Value::Integer(rng.gen())))
        .collect()
}

fn load(kind: IndexKind, keys: &[CompositeKey]) -> Box<dyn AssociativeIndex<CompositeKey, Tuple>> {
    let mut index = kind.build(4).unwrap();
    for key in keys {
        index.put(key.clone(), vec![Value::Bool(true)]);
    }
    index
}

fn insert_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");
    for size in SIZES {
        let keys = random_keys(size);
        for kind in IndexKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &keys, |b, keys| {
                b.iter(|| black_box(load(kind, keys)))
            });
        }
    }
    group.finish();
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for size in SIZES {
        let keys = random_keys(size);
        for kind in IndexKind::ALL {
            let index = load(kind, &keys);
            group.bench_with_input(BenchmarkId::new(kind.name(), size), &keys, |b, keys| {
                b.iter(|| {
                    for key in keys.iter().step_by(7) {
                        black_box(index.get(key));
                    }
                })
            });
        }
    }
    group.finish();
}

fn range_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_ranges");

    let mut index = OrderedIndex::new(16).unwrap();
    for i in 0..10_000 {
        index.put(i, i * 10);
    }

    group.bench_function("sub_map", |b| {
        b.iter(|| black_box(index.sub_map(&black_box(4500), &black_box(5500))))
    });

    group.bench_function("lazy_range", |b| {
        b.iter(|| {
            let items: Vec<_> = index.range(black_box(4500)..black_box(5500)).collect();
            black_box(items);
        })
    });

    group.bench_function("fanout_5_sub_map", |b| {
        let mut small = OrderedIndex::with_default_fanout();
        for i in 0..10_000 {
            small.put(i, i);
        }
        b.iter(|| black_box(small.sub_map(&black_box(4500), &black_box(5500))))
    });

    group.finish();
}

criterion_group!(benches, insert_benchmark, lookup_benchmark, range_benchmark);
criterion_main!(benches);
