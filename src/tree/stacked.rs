//! Scoped handles
//!
//!     A `Stacked` owns a detached node while a pass builds or inspects it. It has exactly two
//!     ways out: `commit` hands the node to whoever attaches it, `discard` destroys it. If
//!     neither happens, because a `?` left the scope early for instance, the guard drops and
//!     takes the node with it. A node is therefore never both held by a guard and attached.

use super::node::Node;
use crate::token::Tag;

#[must_use = "a stacked node is destroyed unless it is committed into a tree"]
#[derive(Debug)]
pub struct Stacked {
    node: Node,
    live: bool,
}

impl Stacked {
    pub fn new(node: Node) -> Stacked {
        debug_assert!(node.parent().is_none(), "stacking an attached node");
        Stacked { node, live: true }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    pub fn tag(&self) -> Tag {
        self.node.tag()
    }

    /// Re-tag the held node in place.
    pub fn transform(&mut self, tag: Tag) {
        self.node.retag(tag);
    }

    /// Release the node for attachment.
    pub fn commit(mut self) -> Node {
        self.live = false;
        std::mem::replace(&mut self.node, Node::placeholder())
    }

    /// Destroy the node explicitly.
    pub fn discard(self) {
        drop(self);
    }

    /// Release the children of the held composite, detached, and drop the wrapper.
    pub fn into_children(self) -> Vec<Node> {
        let mut node = self.commit();
        let len = node.len();
        node.detach_range(0..len)
    }
}

impl Drop for Stacked {
    fn drop(&mut self) {
        if self.live {
            log::trace!(
                "dropping uncommitted {} from line {}",
                self.node.tag().label(),
                self.node.location().line
            );
        }
    }
}
