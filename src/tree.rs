// =============================================================================
// RbTree: insertion, lookup, deletion and the rebalancing primitives
// =============================================================================

use std::cmp::Ordering;
use std::fmt;

use crate::compare::{Compare, Natural};
use crate::error::{Error, StructureError};
use crate::node::{Color, NodeArena, NodeId, Side};
use crate::observer::{TreeEvent, TreeObserver};

/// An ordered set of unique keys kept balanced by red-black coloring.
///
/// Not internally synchronized. Handles returned by [`find`](Self::find) borrow
/// the tree, so they cannot outlive the next mutation.
pub struct RbTree<K, C = Natural> {
    pub(crate) nodes: NodeArena<K>,
    pub(crate) root: NodeId,
    pub(crate) len: usize,
    pub(crate) compare: C,
    observer: Option<Box<dyn TreeObserver<K, C>>>,
}

impl<K: Ord> RbTree<K> {
    pub fn new() -> Self {
        Self::with_compare(Natural)
    }
}

impl<K: Ord> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, C> RbTree<K, C> {
    /// Empty tree ordered by `compare`.
    pub fn with_compare(compare: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: NodeId::NIL,
            len: 0,
            compare,
            observer: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_nil()
    }

    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        NodeRef::wrap(&self.nodes, self.root)
    }

    /// Drops every key. Slots are released, not recycled.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = NodeId::NIL;
        self.len = 0;
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack = Vec::new();
        if !self.root.is_nil() {
            stack.push((self.root, 1));
        }
        while let Some((id, depth)) = stack.pop() {
            max = max.max(depth);
            let node = &self.nodes[id];
            for child in [node.left, node.right] {
                if !child.is_nil() {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }

    /// Attaches a debug observer, replacing any previous one.
    pub fn set_observer<O>(&mut self, observer: O)
    where
        O: TreeObserver<K, C> + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn take_observer(&mut self) -> Option<Box<dyn TreeObserver<K, C>>> {
        self.observer.take()
    }

    fn notify(&mut self, event: TreeEvent, id: NodeId) {
        tracing::trace!(event = event.name(), node = id.index(), "checkpoint");
        if let Some(mut observer) = self.observer.take() {
            observer.notify(event, self, NodeRef::new(&self.nodes, id));
            self.observer = Some(observer);
        }
    }
}

impl<K, C: Compare<K>> RbTree<K, C> {
    pub fn find(&self, key: &K) -> Option<NodeRef<'_, K>> {
        NodeRef::wrap(&self.nodes, self.find_id(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        !self.find_id(key).is_nil()
    }

    fn find_id(&self, key: &K) -> NodeId {
        let mut cur = self.root;
        while !cur.is_nil() {
            let node = &self.nodes[cur];
            cur = match self.compare.compare(key, &node.key) {
                Ordering::Equal => return cur,
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        NodeId::NIL
    }

    /// Adds `key`. Fails without touching the tree if an equal key is present.
    pub fn insert(&mut self, key: K) -> Result<(), Error> {
        let id = self.insert_bst(key)?;
        self.len += 1;
        self.notify(TreeEvent::AfterBstInsert, id);
        if let Err(err) = self.insert_fixup(id) {
            panic!("red-black tree corrupted during insert: {err}");
        }
        self.notify(TreeEvent::AfterInsert, id);
        Ok(())
    }

    /// Removes the key equal to `key` and hands it back.
    pub fn remove(&mut self, key: &K) -> Result<K, Error> {
        let target = self.find_id(key);
        if target.is_nil() {
            tracing::debug!(len = self.len, "remove of absent key rejected");
            return Err(Error::KeyNotFound);
        }
        if let Err(err) = self.splice_out(target) {
            panic!("red-black tree corrupted during remove: {err}");
        }
        self.len -= 1;
        Ok(self.nodes.free(target))
    }

    /// Links a new BLACK leaf below the last node compared against.
    fn insert_bst(&mut self, key: K) -> Result<NodeId, Error> {
        let mut parent = NodeId::NIL;
        let mut side = Side::Left;
        let mut cur = self.root;
        while !cur.is_nil() {
            parent = cur;
            side = match self.compare.compare(&key, &self.nodes[cur].key) {
                Ordering::Equal => {
                    tracing::debug!(len = self.len, "insert of duplicate key rejected");
                    return Err(Error::DuplicateKey);
                }
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            cur = self.nodes.child(cur, side);
        }

        let id = self.nodes.alloc(key);
        if parent.is_nil() {
            self.root = id;
        } else {
            let prev = self.nodes.set_child(parent, side, id);
            debug_assert!(prev.is_none());
        }
        Ok(id)
    }
}

// =============================================================================
// Rebalancing
// =============================================================================

impl<K, C> RbTree<K, C> {
    fn insert_fixup(&mut self, mut nd: NodeId) -> Result<(), StructureError> {
        // A lone root was created BLACK.
        if nd == self.root {
            return Ok(());
        }

        self.nodes.set_red(nd);
        if self.nodes.is_black(self.nodes.parent(nd)) {
            return Ok(());
        }

        while self.nodes.is_red(self.nodes.parent(nd)) {
            // A red parent is never the root, so the grandparent exists.
            let parent = self.nodes.parent(nd);
            let grandparent = self.nodes.parent(parent);
            let side = self.nodes.side_of(grandparent, parent);
            let uncle = self.nodes.child(grandparent, side.opposite());

            if self.nodes.is_red(uncle) {
                self.nodes.set_black(parent);
                self.nodes.set_black(uncle);
                self.nodes.set_red(grandparent);
                nd = grandparent;

                let up = self.nodes.parent(nd);
                if up.is_nil() || self.nodes.is_black(up) {
                    break;
                }
            } else {
                // Straighten a bend so nd, parent and grandparent line up.
                if nd == self.nodes.child(parent, side.opposite()) {
                    nd = parent;
                    self.rotate(nd, side)?;
                }

                let parent = self.nodes.parent(nd);
                let grandparent = self.nodes.parent(parent);
                self.nodes.set_black(parent);
                self.nodes.set_red(grandparent);
                self.rotate(grandparent, side.opposite())?;
            }
        }

        let root = self.root;
        self.nodes.set_black(root);
        Ok(())
    }

    /// Unlinks `target`, leaving its slot allocated for the caller to free.
    fn splice_out(&mut self, target: NodeId) -> Result<(), StructureError> {
        let left = self.nodes[target].left;
        let right = self.nodes[target].right;
        let mut removed_color = self.nodes[target].color;

        // `fix` may be nil; `fix_parent` is where it hangs either way.
        let fix;
        let fix_parent;
        if left.is_nil() {
            fix = right;
            fix_parent = self.nodes.parent(target);
            self.transplant(target, right)?;
        } else if right.is_nil() {
            fix = left;
            fix_parent = self.nodes.parent(target);
            self.transplant(target, left)?;
        } else {
            let succ = self.nodes.leftmost(right);
            removed_color = self.nodes[succ].color;
            fix = self.nodes[succ].right;
            if self.nodes.parent(succ) == target {
                fix_parent = succ;
            } else {
                fix_parent = self.nodes.parent(succ);
                self.transplant(succ, fix)?;
                self.nodes.link(succ, Side::Right, right);
            }
            self.transplant(target, succ)?;
            self.nodes.link(succ, Side::Left, left);
            let color = self.nodes[target].color;
            self.nodes[succ].color = color;
        }

        if removed_color.is_black() {
            self.delete_fixup(fix, fix_parent)?;
        }

        let root = self.root;
        self.nodes.set_black(root);
        Ok(())
    }

    /// Pushes the extra black carried by `cur` up until a red node or the root
    /// absorbs it. `cur` may be nil, in which case `parent` locates it.
    fn delete_fixup(&mut self, mut cur: NodeId, mut parent: NodeId) -> Result<(), StructureError> {
        while cur != self.root && self.nodes.is_black(cur) {
            let side = self.nodes.side_of(parent, cur);
            let mut sibling = self.nodes.child(parent, side.opposite());
            if sibling.is_nil() {
                return Err(StructureError::MissingSibling);
            }

            if self.nodes.is_red(sibling) {
                self.nodes.set_black(sibling);
                self.nodes.set_red(parent);
                self.rotate(parent, side)?;
                sibling = self.nodes.child(parent, side.opposite());
            }

            let near = self.nodes.child(sibling, side);
            let far = self.nodes.child(sibling, side.opposite());
            if self.nodes.is_black(near) && self.nodes.is_black(far) {
                self.nodes.set_red(sibling);
                cur = parent;
                parent = self.nodes.parent(cur);
                continue;
            }

            if self.nodes.is_black(far) {
                self.nodes.set_black(near);
                self.nodes.set_red(sibling);
                self.rotate(sibling, side.opposite())?;
                sibling = self.nodes.child(parent, side.opposite());
            }

            let parent_color = self.nodes[parent].color;
            self.nodes[sibling].color = parent_color;
            self.nodes.set_black(parent);
            let far = self.nodes.child(sibling, side.opposite());
            self.nodes.set_black(far);
            self.rotate(parent, side)?;
            cur = self.root;
        }

        self.nodes.set_black(cur);
        Ok(())
    }

    /// Single rotation at `nd`. `Side::Left` lifts the right child, `Side::Right`
    /// lifts the left child.
    fn rotate(&mut self, nd: NodeId, direction: Side) -> Result<(), StructureError> {
        if nd.is_nil() {
            return Err(StructureError::InvalidArgument);
        }
        let lifted = self.nodes.child(nd, direction.opposite());
        if lifted.is_nil() {
            return Err(StructureError::InvalidRotation { direction });
        }

        let parent = self.nodes.parent(nd);
        let nd_side = (!parent.is_nil()).then(|| self.nodes.side_of(parent, nd));

        // The inner grandchild moves across to `nd`; this also detaches `lifted`.
        let inner = self.nodes.child(lifted, direction);
        self.nodes.set_child(nd, direction.opposite(), inner);
        self.nodes.set_child(lifted, direction, nd);
        match nd_side {
            Some(side) => {
                self.nodes.set_child(parent, side, lifted);
            }
            None => self.root = lifted,
        }

        let event = match direction {
            Side::Left => TreeEvent::AfterLeftRotation,
            Side::Right => TreeEvent::AfterRightRotation,
        };
        self.notify(event, nd);
        Ok(())
    }

    /// Puts `after` (possibly nil) where `before` hangs. Neither node's own
    /// children are touched.
    fn transplant(&mut self, before: NodeId, after: NodeId) -> Result<(), StructureError> {
        if before.is_nil() {
            return Err(StructureError::InvalidArgument);
        }

        let parent = self.nodes.parent(before);
        if parent.is_nil() {
            self.root = after;
            if !after.is_nil() {
                self.nodes[after].parent = NodeId::NIL;
            }
        } else {
            let side = self.nodes.side_of(parent, before);
            self.nodes.link(parent, side, after);
        }
        Ok(())
    }
}

// =============================================================================
// Rendering, Clone, Debug
// =============================================================================

impl<K: fmt::Display, C> RbTree<K, C> {
    /// Graphviz rendering of the current shape.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph rbtree {\n    node [style=filled, fontcolor=white];\n");
        let mut stack = Vec::new();
        if !self.root.is_nil() {
            stack.push(self.root);
        }
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            let fill = match node.color {
                Color::Red => "red",
                Color::Black => "black",
            };
            out.push_str(&format!(
                "    n{} [label=\"{}\", fillcolor={}];\n",
                id.index(),
                node.key,
                fill
            ));
            for (child, label) in [(node.left, "L"), (node.right, "R")] {
                if !child.is_nil() {
                    out.push_str(&format!(
                        "    n{} -> n{} [label=\"{}\"];\n",
                        id.index(),
                        child.index(),
                        label
                    ));
                    stack.push(child);
                }
            }
        }
        out.push_str("}\n");
        out
    }
}

/// The observer is not carried over to the clone.
impl<K: Clone, C: Clone> Clone for RbTree<K, C> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            root: self.root,
            len: self.len,
            compare: self.compare.clone(),
            observer: None,
        }
    }
}

impl<K: fmt::Debug, C> fmt::Debug for RbTree<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree")
            .field("len", &self.len)
            .field("root", &self.root())
            .finish()
    }
}

// =============================================================================
// Read-only node handles
// =============================================================================

/// Borrowed view of one node.
pub struct NodeRef<'a, K> {
    nodes: &'a NodeArena<K>,
    id: NodeId,
}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<'a, K> NodeRef<'a, K> {
    fn new(nodes: &'a NodeArena<K>, id: NodeId) -> Self {
        debug_assert!(nodes.get(id).is_some());
        Self { nodes, id }
    }

    fn wrap(nodes: &'a NodeArena<K>, id: NodeId) -> Option<Self> {
        nodes.get(id).map(|_| Self { nodes, id })
    }

    pub fn key(&self) -> &'a K {
        &self.nodes[self.id].key
    }

    pub fn color(&self) -> Color {
        self.nodes[self.id].color
    }

    pub fn is_red(&self) -> bool {
        self.color().is_red()
    }

    pub fn is_black(&self) -> bool {
        self.color().is_black()
    }

    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        Self::wrap(self.nodes, self.nodes[self.id].left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        Self::wrap(self.nodes, self.nodes[self.id].right)
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K>> {
        Self::wrap(self.nodes, self.nodes[self.id].parent)
    }

    /// False for the root.
    pub fn is_left_child(&self) -> bool {
        self.nodes.is_left_child(self.id)
    }

    pub fn is_root(&self) -> bool {
        self.nodes[self.id].parent.is_nil()
    }
}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", self.key())
            .field("color", &self.color())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
