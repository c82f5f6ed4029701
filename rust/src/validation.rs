//! Invariant checking for the ordered index.
//!
//! Used by the test suites after every mutation burst; nothing on the
//! `get`/`put` path calls into this module.

use crate::error::{IndexError, IndexResult};
use crate::types::{NodeId, NodeRef, OrderedIndex};

/// Key range a subtree must respect: `lower <= key < upper`.
struct Bounds<'a, K> {
    lower: Option<&'a K>,
    upper: Option<&'a K>,
}

impl<'a, K: Ord> Bounds<'a, K> {
    fn contains(&self, key: &K) -> bool {
        self.lower.map_or(true, |lower| key >= lower)
            && self.upper.map_or(true, |upper| key < upper)
    }
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord, V> OrderedIndex<K, V> {
    /// Check every structural invariant of the tree.
    ///
    /// - keys inside each node strictly ascending
    /// - every key of a subtree inside the range its parent separators allow
    /// - branches have exactly one more child than keys
    /// - non-root nodes hold between `ceil(fanout / 2) - 1` and `fanout - 1`
    ///   keys
    /// - all leaves at the same depth
    /// - the sibling chain visits exactly the leaves of the tree, in order
    pub fn check_invariants(&self) -> IndexResult<()> {
        let mut leaf_ids = Vec::new();
        let mut leaf_depth = None;
        let bounds = Bounds {
            lower: None,
            upper: None,
        };
        self.check_node(self.root, &bounds, 0, &mut leaf_depth, &mut leaf_ids)?;
        self.check_leaf_chain(&leaf_ids)
    }

    fn min_occupancy(&self) -> usize {
        (self.fanout + 1) / 2 - 1
    }

    fn check_node(
        &self,
        node: NodeRef,
        bounds: &Bounds<'_, K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        leaf_ids: &mut Vec<NodeId>,
    ) -> IndexResult<()> {
        let is_root = depth == 0;
        match node {
            NodeRef::Leaf(id) => {
                let leaf = self.get_leaf(id).ok_or_else(|| {
                    IndexError::corrupted_tree("Leaf", &format!("dangling leaf id {}", id))
                })?;

                check_sorted(&leaf.keys, "Leaf", id)?;
                if leaf.keys.iter().any(|k| !bounds.contains(k)) {
                    return Err(IndexError::corrupted_tree(
                        "Leaf",
                        &format!("leaf {} holds a key outside its parent's range", id),
                    ));
                }
                if leaf.keys.len() != leaf.values.len() {
                    return Err(IndexError::corrupted_tree(
                        "Leaf",
                        &format!(
                            "leaf {} has {} keys but {} values",
                            id,
                            leaf.keys.len(),
                            leaf.values.len()
                        ),
                    ));
                }
                if leaf.keys.len() > self.fanout - 1
                    || (!is_root && leaf.keys.len() < self.min_occupancy())
                {
                    return Err(IndexError::corrupted_tree(
                        "Leaf",
                        &format!("leaf {} has occupancy {}", id, leaf.keys.len()),
                    ));
                }

                match *leaf_depth {
                    None => *leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(IndexError::corrupted_tree(
                            "Leaf",
                            &format!("leaf {} at depth {}, expected {}", id, depth, expected),
                        ));
                    }
                    Some(_) => {}
                }
                leaf_ids.push(id);
                Ok(())
            }
            NodeRef::Branch(id) => {
                let branch = self.get_branch(id).ok_or_else(|| {
                    IndexError::corrupted_tree("Branch", &format!("dangling branch id {}", id))
                })?;

                check_sorted(&branch.keys, "Branch", id)?;
                if branch.children.len() != branch.keys.len() + 1 {
                    return Err(IndexError::corrupted_tree(
                        "Branch",
                        &format!(
                            "branch {} has {} keys but {} children",
                            id,
                            branch.keys.len(),
                            branch.children.len()
                        ),
                    ));
                }
                let min = if is_root { 1 } else { self.min_occupancy() };
                if branch.keys.len() > self.fanout - 1 || branch.keys.len() < min {
                    return Err(IndexError::corrupted_tree(
                        "Branch",
                        &format!("branch {} has occupancy {}", id, branch.keys.len()),
                    ));
                }
                if branch.keys.iter().any(|k| !bounds.contains(k)) {
                    return Err(IndexError::corrupted_tree(
                        "Branch",
                        &format!("branch {} holds a separator outside its range", id),
                    ));
                }

                for (i, child) in branch.children.iter().enumerate() {
                    let child_bounds = Bounds {
                        lower: if i == 0 { bounds.lower } else { branch.keys.get(i - 1) },
                        upper: branch.keys.get(i).or(bounds.upper),
                    };
                    self.check_node(*child, &child_bounds, depth + 1, leaf_depth, leaf_ids)?;
                }
                Ok(())
            }
        }
    }

    /// The chain must visit the tree's leaves left to right, with keys
    /// ascending across leaf boundaries.
    fn check_leaf_chain(&self, tree_order: &[NodeId]) -> IndexResult<()> {
        let mut chain_ids = Vec::with_capacity(tree_order.len());
        let mut previous: Option<&K> = None;
        let mut current = self.first_leaf_id();

        while let Some(leaf) = self.get_leaf(current) {
            if chain_ids.len() > tree_order.len() {
                return Err(IndexError::corrupted_tree("Leaf chain", "cycle detected"));
            }
            if let (Some(prev), Some(first)) = (previous, leaf.keys.first()) {
                if prev >= first {
                    return Err(IndexError::corrupted_tree(
                        "Leaf chain",
                        &format!("keys descend entering leaf {}", current),
                    ));
                }
            }
            previous = leaf.keys.last().or(previous);
            chain_ids.push(current);
            current = leaf.next;
        }

        if chain_ids != tree_order {
            return Err(IndexError::corrupted_tree(
                "Leaf chain",
                &format!("tree has {:?}, chain has {:?}", tree_order, chain_ids),
            ));
        }
        Ok(())
    }
}

fn check_sorted<K: Ord>(keys: &[K], component: &str, id: NodeId) -> IndexResult<()> {
    if keys.windows(2).all(|pair| pair[0] < pair[1]) {
        Ok(())
    } else {
        Err(IndexError::corrupted_tree(
            component,
            &format!("node {} keys are not strictly ascending", id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{NodeRef, OrderedIndex};

    #[test]
    fn test_valid_trees_pass() {
        for fanout in 3..=8 {
            let mut index = OrderedIndex::new(fanout).unwrap();
            index.check_invariants().unwrap();
            for i in 0..300 {
                index.put((i * 7919) % 1009, i);
            }
            index.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_detects_unsorted_leaf() {
        let mut index = OrderedIndex::new(5).unwrap();
        for i in 0..20 {
            index.put(i, i);
        }
        let first = index.first_leaf_id();
        index.get_leaf_mut(first).unwrap().keys.swap(0, 1);
        assert!(index.check_invariants().is_err());
    }

    #[test]
    fn test_detects_broken_chain() {
        let mut index = OrderedIndex::new(4).unwrap();
        for i in 0..40 {
            index.put(i, i);
        }
        let first = index.first_leaf_id();
        let second = index.get_leaf(first).unwrap().next;
        let third = index.get_leaf(second).unwrap().next;
        index.get_leaf_mut(first).unwrap().next = third;

        let err = index.check_invariants().unwrap_err();
        assert!(err.to_string().contains("Leaf chain"));
    }

    #[test]
    fn test_detects_key_outside_parent_range() {
        let mut index = OrderedIndex::new(5).unwrap();
        for i in 0..30 {
            index.put(i, i);
        }
        let root = match index.root {
            NodeRef::Branch(id) => id,
            NodeRef::Leaf(_) => panic!("expected a branch root"),
        };
        index.get_branch_mut(root).unwrap().keys[0] = -100;
        assert!(index.check_invariants().is_err());
    }
}
