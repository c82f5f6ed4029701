//! Associative index structures for a small relational engine.
//!
//! Three interchangeable structures map composite keys to tuples:
//!
//! - [`OrderedIndex`]: a B+ tree with sibling-linked leaves, supporting
//!   ordered scans and range maps.
//! - [`ExtendableHashIndex`]: a directory-doubling hash table.
//! - [`LinearHashIndex`]: a hash table that splits one bucket at a time.
//!
//! All of them implement [`AssociativeIndex`]. [`IndexKind`] picks one by
//! name and [`TupleIndex`] checks keys and tuples against declared element
//! types before they reach the structure.
//!
//! ```
//! use relmap::{AssociativeIndex, IndexKind};
//!
//! for kind in IndexKind::ALL {
//!     let index = kind.build(4).unwrap();
//!     assert!(index.is_empty());
//! }
//! ```

mod arena;
mod bucket;
mod construction;
mod contract;
mod error;
mod ext_hash;
mod get_operations;
mod insert_operations;
mod iteration;
mod key;
mod lin_hash;
mod node;
mod range_queries;
mod tree_structure;
mod tuple_index;
mod types;
mod validation;

pub use arena::{Arena, ArenaStats};
pub use contract::{AssociativeIndex, IndexKind, SortedBaseline};
pub use error::{IndexError, IndexResult, InitResult};
pub use ext_hash::ExtendableHashIndex;
pub use iteration::ItemIterator;
pub use key::{CompositeKey, Domain, ElementTypes, Tuple, Value};
pub use lin_hash::LinearHashIndex;
pub use tuple_index::TupleIndex;
pub use types::{
    BranchNode, DefaultHashBuilder, LeafNode, NodeId, NodeRef, OrderedIndex, DEFAULT_BUCKETS,
    DEFAULT_FANOUT, LOAD_FACTOR, MIN_FANOUT, NULL_NODE, SLOTS,
};
