use crate::compare::Compare;
use crate::error::InvariantViolation;
use crate::node::NodeId;
use crate::tree::RbTree;

impl<K, C: Compare<K>> RbTree<K, C> {
    /// Walks the whole tree and checks the search-order and red-black
    /// properties, the parent back-links, and the cached length.
    ///
    /// Returns the number of black nodes on every root-to-nil path.
    pub fn validate(&self) -> Result<usize, InvariantViolation> {
        if self.root.is_nil() {
            if self.len != 0 {
                return Err(InvariantViolation::LenMismatch {
                    reported: self.len,
                    reachable: 0,
                });
            }
            return Ok(0);
        }

        let root = &self.nodes[self.root];
        if !root.parent.is_nil() {
            return Err(InvariantViolation::RootHasParent);
        }
        if root.color.is_red() {
            return Err(InvariantViolation::RedRoot);
        }

        let mut reachable = 0;
        let black_height = self.check_subtree(self.root, 0, None, None, &mut reachable)?;
        if reachable != self.len {
            return Err(InvariantViolation::LenMismatch {
                reported: self.len,
                reachable,
            });
        }
        Ok(black_height)
    }

    /// Black nodes from `id` (inclusive) down to any nil below it.
    fn check_subtree<'a>(
        &'a self,
        id: NodeId,
        depth: usize,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        reachable: &mut usize,
    ) -> Result<usize, InvariantViolation> {
        if id.is_nil() {
            return Ok(0);
        }
        *reachable += 1;

        let node = &self.nodes[id];
        let above_lower = lower.map_or(true, |lo| self.compare.less(lo, &node.key));
        let below_upper = upper.map_or(true, |hi| self.compare.less(&node.key, hi));
        if !above_lower || !below_upper {
            return Err(InvariantViolation::OrderViolation { depth });
        }

        for child in [node.left, node.right] {
            if child.is_nil() {
                continue;
            }
            if self.nodes[child].parent != id {
                return Err(InvariantViolation::BrokenParentLink { depth: depth + 1 });
            }
            if node.color.is_red() && self.nodes.is_red(child) {
                return Err(InvariantViolation::RedRedViolation { depth });
            }
        }

        let left = self.check_subtree(node.left, depth + 1, lower, Some(&node.key), reachable)?;
        let right = self.check_subtree(node.right, depth + 1, Some(&node.key), upper, reachable)?;
        if left != right {
            return Err(InvariantViolation::BlackHeightMismatch { depth, left, right });
        }
        Ok(left + usize::from(node.color.is_black()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Color;

    fn sample() -> RbTree<u32> {
        let mut t = RbTree::new();
        for k in [5, 7, 9, 8, 2] {
            t.insert(k).unwrap();
        }
        t
    }

    #[test]
    fn test_valid_tree() {
        let t = sample();
        // 7B(5B(2R), 9B(8R))
        assert_eq!(t.validate(), Ok(2));
        assert_eq!(RbTree::<u32>::new().validate(), Ok(0));
    }

    #[test]
    fn test_detects_red_root() {
        let mut t = sample();
        let root = t.root;
        t.nodes[root].color = Color::Red;
        assert_eq!(t.validate(), Err(InvariantViolation::RedRoot));
    }

    #[test]
    fn test_detects_red_red() {
        let mut t = sample();
        let five = t.nodes[t.root].left;
        t.nodes[five].color = Color::Red;
        assert_eq!(
            t.validate(),
            Err(InvariantViolation::RedRedViolation { depth: 1 })
        );
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        let mut t = sample();
        let two = t.nodes[t.nodes[t.root].left].left;
        t.nodes[two].color = Color::Black;
        assert!(matches!(
            t.validate(),
            Err(InvariantViolation::BlackHeightMismatch { depth: 1, .. })
        ));
    }

    #[test]
    fn test_detects_order_violation() {
        let mut t = sample();
        let two = t.nodes[t.nodes[t.root].left].left;
        t.nodes[two].key = 6;
        assert_eq!(
            t.validate(),
            Err(InvariantViolation::OrderViolation { depth: 2 })
        );
    }

    #[test]
    fn test_detects_broken_parent_link() {
        let mut t = sample();
        let nine = t.nodes[t.root].right;
        let eight = t.nodes[nine].left;
        t.nodes[eight].parent = t.root;
        assert_eq!(
            t.validate(),
            Err(InvariantViolation::BrokenParentLink { depth: 2 })
        );
    }

    #[test]
    fn test_detects_len_mismatch() {
        let mut t = sample();
        t.len = 4;
        assert_eq!(
            t.validate(),
            Err(InvariantViolation::LenMismatch {
                reported: 4,
                reachable: 5
            })
        );
    }

    #[test]
    fn test_detects_root_parent() {
        let mut t = sample();
        let root = t.root;
        let nine = t.nodes[root].right;
        t.nodes[root].parent = nine;
        assert_eq!(t.validate(), Err(InvariantViolation::RootHasParent));
    }
}
