//! Debug checkpoints for external visualization tooling.
//!
//! An observer attached with [`RbTree::set_observer`] is called synchronously at
//! four fixed points of a mutation. Nothing it does feeds back into the tree.

use std::fmt::Display;
use std::io::Write;

use crate::tree::{NodeRef, RbTree};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TreeEvent {
    /// The new node is linked in as a leaf, before any recoloring.
    AfterBstInsert,
    /// Insertion fixup finished; the tree is valid again.
    AfterInsert,
    /// The node passed along is the one that moved down.
    AfterLeftRotation,
    AfterRightRotation,
}

impl TreeEvent {
    pub fn name(self) -> &'static str {
        match self {
            TreeEvent::AfterBstInsert => "after-bst-insert",
            TreeEvent::AfterInsert => "after-insert",
            TreeEvent::AfterLeftRotation => "after-left-rotation",
            TreeEvent::AfterRightRotation => "after-right-rotation",
        }
    }
}

pub trait TreeObserver<K, C> {
    fn notify(&mut self, event: TreeEvent, tree: &RbTree<K, C>, node: NodeRef<'_, K>);
}

impl<K, C, F> TreeObserver<K, C> for F
where
    F: FnMut(TreeEvent, &RbTree<K, C>, NodeRef<'_, K>),
{
    fn notify(&mut self, event: TreeEvent, tree: &RbTree<K, C>, node: NodeRef<'_, K>) {
        self(event, tree, node)
    }
}

/// Writes one Graphviz digraph per checkpoint.
///
/// Write failures are logged and counted, never propagated into the tree.
pub struct DotDumper<W> {
    out: W,
    frames: usize,
    failures: usize,
}

impl<W: Write> DotDumper<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            frames: 0,
            failures: 0,
        }
    }

    /// Frames written successfully.
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<K: Display, C, W: Write> TreeObserver<K, C> for DotDumper<W> {
    fn notify(&mut self, event: TreeEvent, tree: &RbTree<K, C>, node: NodeRef<'_, K>) {
        let res = writeln!(
            self.out,
            "// frame {}: {} at {}",
            self.frames,
            event.name(),
            node.key()
        )
        .and_then(|()| self.out.write_all(tree.to_dot().as_bytes()));
        match res {
            Ok(()) => self.frames += 1,
            Err(err) => {
                self.failures += 1;
                tracing::warn!(event = event.name(), %err, "failed to write dot frame");
            }
        }
    }
}
