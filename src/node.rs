// =============================================================================
// Node ids, colors and the node arena
// =============================================================================
//
// Nodes live in a slot vector owned by the tree. Child links are the owning
// relation: a slot is only reachable through its parent's `left`/`right` (or
// the tree's root). `parent` is a back-reference used for relinking and never
// frees anything.

use std::ops::{Index, IndexMut};

/// Index of a node slot inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeId(u32);

impl NodeId {
    /// Absent child, absent parent, or empty root.
    pub(crate) const NIL: NodeId = NodeId(u32::MAX);

    #[inline]
    fn from_index(idx: usize) -> Self {
        debug_assert!(idx < u32::MAX as usize);
        Self(idx as u32)
    }

    #[inline]
    pub(crate) fn is_nil(self) -> bool {
        self == Self::NIL
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        debug_assert!(!self.is_nil());
        self.0 as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self, Color::Red)
    }

    #[inline]
    pub fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

/// Which child slot of a node. Rotations use the same type for direction:
/// rotating `Left` lifts the right child.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    pub(crate) color: Color,
    pub(crate) parent: NodeId,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl<K> Node<K> {
    /// Fresh nodes are detached and BLACK; insertion recolors them.
    fn new(key: K) -> Self {
        Self {
            key,
            color: Color::Black,
            parent: NodeId::NIL,
            left: NodeId::NIL,
            right: NodeId::NIL,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> NodeId {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut NodeId {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Slot storage for tree nodes with a free list of vacated slots.
#[derive(Clone)]
pub(crate) struct NodeArena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
}

impl<K> NodeArena<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Number of slots ever allocated, live or vacant.
    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    pub(crate) fn alloc(&mut self, key: K) -> NodeId {
        let node = Node::new(key);
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.index()].is_none());
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::from_index(self.slots.len());
                self.slots.push(Some(node));
                id
            }
        }
    }

    /// Vacates a slot and returns its key. The node must already be unlinked.
    pub(crate) fn free(&mut self, id: NodeId) -> K {
        let node = self.slots[id.index()]
            .take()
            .expect("freeing a vacant node slot");
        self.free.push(id);
        node.key
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<K>> {
        if id.is_nil() {
            return None;
        }
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    // === Relationship queries (nil-aware) ===

    #[inline]
    pub(crate) fn color(&self, id: NodeId) -> Color {
        if id.is_nil() {
            Color::Black
        } else {
            self[id].color
        }
    }

    #[inline]
    pub(crate) fn is_red(&self, id: NodeId) -> bool {
        self.color(id).is_red()
    }

    #[inline]
    pub(crate) fn is_black(&self, id: NodeId) -> bool {
        self.color(id).is_black()
    }

    #[inline]
    pub(crate) fn set_red(&mut self, id: NodeId) {
        self[id].color = Color::Red;
    }

    #[inline]
    pub(crate) fn set_black(&mut self, id: NodeId) {
        if !id.is_nil() {
            self[id].color = Color::Black;
        }
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self[id].parent
    }

    #[inline]
    pub(crate) fn child(&self, id: NodeId, side: Side) -> NodeId {
        self[id].child(side)
    }

    /// False for the root.
    #[inline]
    pub(crate) fn is_left_child(&self, id: NodeId) -> bool {
        let parent = self[id].parent;
        !parent.is_nil() && self[parent].left == id
    }

    /// Side of `parent` that `child` occupies. `child` may be nil, in which case
    /// the parent's other slot must be occupied.
    #[inline]
    pub(crate) fn side_of(&self, parent: NodeId, child: NodeId) -> Side {
        if self[parent].left == child {
            Side::Left
        } else {
            Side::Right
        }
    }

    // === Child reassignment ===

    /// Makes `child` the `side` child of `id`.
    ///
    /// `child` is detached from its current parent first. The previous occupant
    /// of the slot loses its parent link and is handed back to the caller, who
    /// must re-attach or free it. Returns `None` if the slot was empty or
    /// already held `child`.
    pub(crate) fn set_child(&mut self, id: NodeId, side: Side, child: NodeId) -> Option<NodeId> {
        if self[id].child(side) == child {
            return None;
        }

        if !child.is_nil() {
            let old_parent = self[child].parent;
            if !old_parent.is_nil() {
                let old_side = self.side_of(old_parent, child);
                *self[old_parent].child_mut(old_side) = NodeId::NIL;
            }
            self[child].parent = id;
        }

        let prev = std::mem::replace(self[id].child_mut(side), child);
        if prev.is_nil() {
            return None;
        }
        self[prev].parent = NodeId::NIL;
        Some(prev)
    }

    /// Points `parent`'s `side` slot at `child` and `child` back at `parent`,
    /// leaving any previous occupant's links untouched.
    pub(crate) fn link(&mut self, parent: NodeId, side: Side, child: NodeId) {
        *self[parent].child_mut(side) = child;
        if !child.is_nil() {
            self[child].parent = parent;
        }
    }

    /// Leftmost node of the subtree rooted at `id`.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        loop {
            let left = self[id].left;
            if left.is_nil() {
                return id;
            }
            id = left;
        }
    }
}

impl<K> Index<NodeId> for NodeArena<K> {
    type Output = Node<K>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K> {
        self.slots[id.index()]
            .as_ref()
            .expect("node id refers to a vacant slot")
    }
}

impl<K> IndexMut<NodeId> for NodeArena<K> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.slots[id.index()]
            .as_mut()
            .expect("node id refers to a vacant slot")
    }
}
