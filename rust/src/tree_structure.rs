//! Tree structure queries for the ordered index.
//!
//! Shape statistics and a level-by-level rendering, used by the report binary
//! and by tests that pin down split behavior.

use std::fmt::{Debug, Write};

use crate::arena::ArenaStats;
use crate::types::{NodeRef, OrderedIndex};

impl<K, V> OrderedIndex<K, V> {
    /// Number of levels, counting the leaf level. A single-leaf tree has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Branch(id) = current {
            match self.get_branch(id).and_then(|b| b.children.first()) {
                Some(child) => current = *child,
                None => break,
            }
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn leaf_arena_stats(&self) -> ArenaStats {
        self.leaf_arena.stats()
    }

    pub fn branch_arena_stats(&self) -> ArenaStats {
        self.branch_arena.stats()
    }

    /// Count the leaf and branch nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, node: NodeRef) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_) => (1, 0),
            NodeRef::Branch(id) => match self.get_branch(id) {
                Some(branch) => branch.children.iter().fold((0, 1), |(leaves, branches), child| {
                    let (l, b) = self.count_nodes_recursive(*child);
                    (leaves + l, branches + b)
                }),
                None => (0, 0),
            },
        }
    }
}

impl<K: Debug, V> OrderedIndex<K, V> {
    /// Render the tree one level per line, root first.
    ///
    /// ```text
    /// level 0: [5]
    /// level 1: [1, 3] [5, 7, 9, 11]
    /// ```
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut level = vec![self.root];
        let mut depth = 0;

        while !level.is_empty() {
            let mut next_level = Vec::new();
            let _ = write!(out, "level {}:", depth);
            for node in &level {
                match *node {
                    NodeRef::Leaf(id) => {
                        if let Some(leaf) = self.get_leaf(id) {
                            let _ = write!(out, " {:?}", leaf.keys);
                        }
                    }
                    NodeRef::Branch(id) => {
                        if let Some(branch) = self.get_branch(id) {
                            let _ = write!(out, " {:?}", branch.keys);
                            next_level.extend_from_slice(&branch.children);
                        }
                    }
                }
            }
            out.push('\n');
            level = next_level;
            depth += 1;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::types::OrderedIndex;

    #[test]
    fn test_height_and_counts_grow_with_splits() {
        let mut index = OrderedIndex::new(3).unwrap();
        assert_eq!(index.height(), 1);
        assert_eq!(index.count_nodes_in_tree(), (1, 0));

        // fanout 3 leaves hold two keys
        for i in 0..3 {
            index.put(i, ());
        }
        assert_eq!(index.height(), 2);
        assert_eq!(index.leaf_count(), 2);
        assert_eq!(index.count_nodes_in_tree(), (2, 1));

        for i in 3..100 {
            index.put(i, ());
        }
        let (leaves, branches) = index.count_nodes_in_tree();
        assert_eq!(leaves, index.leaf_count());
        // nothing is ever freed, so every allocated node stays in the tree
        assert_eq!(index.leaf_arena_stats().allocated_count, leaves);
        assert_eq!(index.branch_arena_stats().allocated_count, branches);
        assert!(index.height() > 3);
    }

    #[test]
    fn test_render_levels() {
        let mut index = OrderedIndex::new(5).unwrap();
        for k in [1, 3, 5, 7] {
            index.put(k, ());
        }
        assert_eq!(index.render(), "level 0: [1, 3, 5, 7]\n");

        for k in [9, 11] {
            index.put(k, ());
        }
        assert_eq!(index.render(), "level 0: [5]\nlevel 1: [1, 3] [5, 7, 9, 11]\n");
    }
}
