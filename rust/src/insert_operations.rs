//! INSERT operations for the ordered index.
//!
//! Insertion descends once, recording the branch and child index taken at
//! every level. After a leaf split the separator climbs that recorded path
//! iteratively, splitting full branches on the way, until a branch has room or
//! the root itself splits and the tree grows by one level.

use log::{debug, trace};

use crate::types::{BranchNode, LeafInsert, NodeId, NodeRef, OrderedIndex, PathStep};

impl<K: Ord + Clone, V> OrderedIndex<K, V> {
    /// Insert a key-value pair, overwriting any value already bound to `key`.
    ///
    /// Returns the previous value, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use relmap::OrderedIndex;
    ///
    /// let mut index = OrderedIndex::new(5).unwrap();
    /// assert_eq!(index.put(1, "one"), None);
    /// assert_eq!(index.put(1, "uno"), Some("one"));
    /// assert_eq!(index.get(&1), Some(&"uno"));
    /// ```
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (leaf_id, path) = self.find_leaf_with_path(&key);
        trace!("put into leaf {} at depth {}", leaf_id, path.len());

        let new_leaf = match self.leaf_arena[leaf_id].insert(key, value) {
            LeafInsert::Updated(old_value) => return old_value,
            LeafInsert::Split(new_leaf) => new_leaf,
        };

        let separator = new_leaf.keys[0].clone();
        let right_id = self.leaf_arena.allocate(new_leaf);
        self.leaf_arena[leaf_id].next = right_id;
        debug!("split leaf {} into {} + {}", leaf_id, leaf_id, right_id);

        self.promote(path, NodeRef::Leaf(leaf_id), separator, NodeRef::Leaf(right_id));
        None
    }

    /// Descend to the leaf covering `key`, recording every branch on the way.
    fn find_leaf_with_path(&self, key: &K) -> (NodeId, Vec<PathStep>) {
        let mut path = Vec::new();
        let mut current = self.root;

        loop {
            self.record_access();
            match current {
                NodeRef::Leaf(id) => return (id, path),
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    let child_index = branch.find_child_index(key);
                    path.push(PathStep {
                        branch: id,
                        child_index,
                    });
                    current = branch.children[child_index];
                }
            }
        }
    }

    /// Push `separator` and its right node up the recorded path.
    fn promote(
        &mut self,
        mut path: Vec<PathStep>,
        mut left: NodeRef,
        mut separator: K,
        mut right: NodeRef,
    ) {
        while let Some(step) = path.pop() {
            let split =
                self.branch_arena[step.branch].insert_child(step.child_index, separator, right);
            let (new_branch, promoted) = match split {
                None => return,
                Some(split) => split,
            };

            let new_id = self.branch_arena.allocate(new_branch);
            debug!("split branch {} into {} + {}", step.branch, step.branch, new_id);

            left = NodeRef::Branch(step.branch);
            separator = promoted;
            right = NodeRef::Branch(new_id);
        }

        self.new_root(left, separator, right);
    }

    /// Grow the tree by one level above the two halves of a split root.
    fn new_root(&mut self, left: NodeRef, separator: K, right: NodeRef) {
        let mut root = BranchNode::new(self.fanout);
        root.keys.push(separator);
        root.children.push(left);
        root.children.push(right);

        let root_id = self.branch_arena.allocate(root);
        self.root = NodeRef::Branch(root_id);
        debug!("new root {} (height {})", root_id, self.height());
    }
}
