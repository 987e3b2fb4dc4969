use crate::node::Side;

/// Ordinary failures of the public operations. The tree is unchanged when one
/// is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("key already present in tree")]
    DuplicateKey,
    #[error("key not present in tree")]
    KeyNotFound,
}

/// A structural primitive was called with arguments no correct fixup produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("cannot rotate {direction:?}: the {:?} child is nil", .direction.opposite())]
    InvalidRotation { direction: Side },
    #[error("nil node passed to a structural primitive")]
    InvalidArgument,
    #[error("node carrying an extra black has no sibling")]
    MissingSibling,
}

/// First red-black or search-tree property found broken by [`RbTree::validate`].
///
/// [`RbTree::validate`]: crate::RbTree::validate
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("root has a parent link")]
    RootHasParent,
    #[error("root is red")]
    RedRoot,
    #[error("red node at depth {depth} has a red child")]
    RedRedViolation { depth: usize },
    #[error("black height {left} on the left differs from {right} on the right at depth {depth}")]
    BlackHeightMismatch {
        depth: usize,
        left: usize,
        right: usize,
    },
    #[error("keys out of order at depth {depth}")]
    OrderViolation { depth: usize },
    #[error("child at depth {depth} does not point back at its parent")]
    BrokenParentLink { depth: usize },
    #[error("tree reports {reported} keys but {reachable} are reachable")]
    LenMismatch { reported: usize, reachable: usize },
}
