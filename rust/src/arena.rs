//! Append-only arena addressed by `NodeId`.
//!
//! Indexes never delete, so slots are never freed: an id stays valid for the
//! lifetime of the arena and ids are handed out in allocation order. Tree nodes
//! and the extendable hash's physical bucket store both live in one of these.

use std::convert::TryFrom;
use std::ops::{Index, IndexMut};

pub type NodeId = u32;
pub const NULL_NODE: NodeId = u32::MAX;

/// Statistics for an arena
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaStats {
    pub allocated_count: usize,
    pub total_capacity: usize,
    pub utilization: f64,
}

#[derive(Debug, Clone)]
pub struct Arena<T> {
    storage: Vec<T>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            storage: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a new item in the arena and return its ID
    #[inline]
    pub fn allocate(&mut self, item: T) -> NodeId {
        let index = self.storage.len();
        // NULL_NODE is reserved, so the last representable id is never handed out.
        let id = NodeId::try_from(index)
            .ok()
            .filter(|&id| id != NULL_NODE)
            .unwrap_or_else(|| panic!("arena exhausted after {} allocations", index));
        self.storage.push(item);
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get(usize::try_from(id).ok()?)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        if id == NULL_NODE {
            return None;
        }
        self.storage.get_mut(usize::try_from(id).ok()?)
    }

    /// Items in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.storage.iter()
    }

    /// Items with their ids, in allocation order.
    pub fn iter_with_ids(&self) -> impl Iterator<Item = (NodeId, &T)> {
        (0..).zip(self.storage.iter())
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn stats(&self) -> ArenaStats {
        let allocated_count = self.storage.len();
        let total_capacity = self.storage.capacity();
        let utilization = if total_capacity > 0 {
            allocated_count as f64 / total_capacity as f64
        } else {
            0.0
        };
        ArenaStats {
            allocated_count,
            total_capacity,
            utilization,
        }
    }
}

/// Direct addressing for ids handed out by this arena. Panics on an id the
/// arena never allocated, like slice indexing.
impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.storage[id as usize]
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.storage[id as usize]
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
