//! Load each index kind with a synthetic `Student` relation and report
//! timings, access counts and structure statistics.
//!
//! Usage:
//!   index_report [KEYS] [KIND ...]
//!
//! Set `RUST_LOG=debug` to see splits and directory doublings.

use clap::Parser;
use relmap::{
    AssociativeIndex, CompositeKey, ExtendableHashIndex, IndexKind, LinearHashIndex, OrderedIndex,
    SortedBaseline, Tuple, Value, DEFAULT_BUCKETS,
};
use std::process;
use std::time::Instant;

const RENDER_LIMIT: usize = 40;

#[derive(Parser, Debug)]
#[command(name = "index_report")]
#[command(about = "Compare the associative index structures on a Student relation")]
#[command(version)]
struct Args {
    /// Number of rows to load
    #[arg(default_value_t = 10_000)]
    keys: usize,

    /// Index kinds to report on (default: all)
    kinds: Vec<IndexKind>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let keys = args.keys;
    let kinds = if args.kinds.is_empty() {
        IndexKind::ALL.to_vec()
    } else {
        args.kinds
    };

    println!("=== Index Report: {} keys ===\n", keys);
    let data = student_rows(keys);

    for kind in kinds {
        match kind {
            IndexKind::Ordered => {
                let mut index: OrderedIndex<CompositeKey, Tuple> =
                    OrderedIndex::with_default_fanout();
                report(kind, &mut index, &data);
                println!(
                    "  height {}, {} leaves, {} branches",
                    index.height(),
                    index.leaf_count(),
                    index.count_nodes_in_tree().1
                );
                if let Err(e) = index.check_invariants() {
                    println!("  INVARIANT VIOLATION: {}", e);
                }
                if keys <= RENDER_LIMIT {
                    print!("{}", index.render());
                }
            }
            IndexKind::ExtendableHash => {
                let mut index: ExtendableHashIndex<CompositeKey, Tuple> =
                    hash_index(ExtendableHashIndex::new(DEFAULT_BUCKETS));
                report(kind, &mut index, &data);
                println!(
                    "  global depth {}, directory {}, {} buckets, capacity {}",
                    index.global_depth(),
                    index.directory_len(),
                    index.bucket_count(),
                    index.capacity()
                );
                if keys <= RENDER_LIMIT {
                    print!("{}", index.render());
                }
            }
            IndexKind::LinearHash => {
                let mut index: LinearHashIndex<CompositeKey, Tuple> =
                    hash_index(LinearHashIndex::new(DEFAULT_BUCKETS));
                report(kind, &mut index, &data);
                let (mod1, mod2) = index.moduli();
                println!(
                    "  mod1 {}, mod2 {}, split {}, {} home + {} overflow buckets",
                    mod1,
                    mod2,
                    index.split_pointer(),
                    index.home_bucket_count(),
                    index.overflow_bucket_count()
                );
                if keys <= RENDER_LIMIT {
                    print!("{}", index.render());
                }
            }
            IndexKind::SortedBaseline => {
                let mut index: SortedBaseline<CompositeKey, Tuple> = SortedBaseline::new();
                report(kind, &mut index, &data);
            }
        }
        println!();
    }
}

fn hash_index<T>(built: relmap::InitResult<T>) -> T {
    match built {
        Ok(index) => index,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

/// Rows of a `Student(id, name, year)` relation keyed on `id`.
fn student_rows(n: usize) -> Vec<(CompositeKey, Tuple)> {
    // multiplicative scramble so keys do not arrive in order
    (0..n as i64)
        .map(|i| {
            let id = (i * 7_919) % 1_000_003;
            let key = CompositeKey::from(Value::Long(id));
            let tuple = vec![
                Value::Long(id),
                Value::from(format!("student{}", id).as_str()),
                Value::Short((id % 4) as i16 + 1),
            ];
            (key, tuple)
        })
        .collect()
}

fn report(
    kind: IndexKind,
    index: &mut dyn AssociativeIndex<CompositeKey, Tuple>,
    data: &[(CompositeKey, Tuple)],
) {
    let start = Instant::now();
    for (key, tuple) in data {
        index.put(key.clone(), tuple.clone());
    }
    let put_time = start.elapsed();
    let put_accesses = index.accesses();

    let start = Instant::now();
    let mut found = 0;
    for (key, _) in data {
        if index.get(key).is_some() {
            found += 1;
        }
    }
    let get_time = start.elapsed();
    let get_accesses = index.accesses() - put_accesses;

    let per = |n: u64| {
        if data.is_empty() {
            0.0
        } else {
            n as f64 / data.len() as f64
        }
    };

    println!("{} ({})", kind, kind.map_name());
    println!(
        "  put: {:?}, {:.2} accesses/put",
        put_time,
        per(put_accesses)
    );
    println!(
        "  get: {:?}, {:.2} accesses/get, {}/{} found",
        get_time,
        per(get_accesses),
        found,
        data.len()
    );
    println!("  len {}, size {}", index.len(), index.size());
}
