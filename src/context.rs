//! Context stack
//!
//!     A frame records which construct is being recognized and on which node (the anchor).
//!     Frames serve two purposes:
//!
//!         Cursor save/restore   entering a pass composition saves the anchor's cursor and
//!                               resets it; leaving restores it, on success and on error.
//!         Diagnostics           "expected X, got Y, in context Z" names Z from the nearest
//!                               active frame anchored on the node being examined, falling
//!                               back to that node's own tag.
//!
//!     Consume-run operations push a frame too (without touching the cursor) so that a
//!     missing terminator is reported against the construct being built.

use crate::diagnostics::FoldResult;
use crate::token::Tag;
use crate::tree::{Node, NodeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub construct: Tag,
    pub anchor: NodeId,
    saved_cursor: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ContextStack {
    frames: Vec<Frame>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Push a frame for a pass composition on `node` and reset its cursor.
    pub fn enter(&mut self, construct: Tag, node: &mut Node) {
        self.frames.push(Frame {
            construct,
            anchor: node.id(),
            saved_cursor: Some(node.cursor()),
        });
        node.reset_cursor();
    }

    /// Pop the frame anchored on `node` and restore its cursor.
    pub fn leave(&mut self, node: &mut Node) {
        if let Some(frame) = self.frames.pop() {
            debug_assert_eq!(frame.anchor, node.id(), "unbalanced context frames");
            if let Some(cursor) = frame.saved_cursor {
                node.set_cursor(cursor);
            }
        }
    }

    /// Push a frame that only names the construct being built.
    pub fn mark(&mut self, construct: Tag, anchor: NodeId) {
        self.frames.push(Frame {
            construct,
            anchor,
            saved_cursor: None,
        });
    }

    pub fn unmark(&mut self) {
        self.frames.pop();
    }

    /// Run `f` inside a frame for `construct` on `node`, leaving the frame however `f` exits.
    pub fn within<T>(
        &mut self,
        construct: Tag,
        node: &mut Node,
        f: impl FnOnce(&mut ContextStack, &mut Node) -> FoldResult<T>,
    ) -> FoldResult<T> {
        self.enter(construct, node);
        let result = f(self, node);
        self.leave(node);
        result
    }

    /// The construct name to use in a diagnostic about `node`.
    pub fn describe(&self, node: &Node) -> String {
        self.frames
            .iter()
            .rev()
            .find(|frame| frame.anchor == node.id())
            .map(|frame| frame.construct.label().to_string())
            .unwrap_or_else(|| node.tag().label().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::FoldError;
    use crate::token::Location;

    fn node() -> Node {
        let loc = Location::new("t.cf", 1);
        Node::composite(
            Tag::Parens,
            loc.clone(),
            vec![
                Node::terminal(Tag::Identifier, "a", loc.clone()),
                Node::terminal(Tag::Identifier, "b", loc),
            ],
        )
    }

    #[test]
    fn test_within_restores_cursor_on_error() {
        let mut stack = ContextStack::new();
        let mut node = node();
        node.set_cursor(2);
        let result: FoldResult<()> = stack.within(Tag::ParamList, &mut node, |stack, node| {
            assert_eq!(node.cursor(), 0);
            assert_eq!(stack.depth(), 1);
            node.advance();
            Err(FoldError::parse(node.location().clone(), "boom"))
        });
        assert!(result.is_err());
        assert_eq!(node.cursor(), 2);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_describe_uses_anchored_frame() {
        let mut stack = ContextStack::new();
        let mut node = node();
        assert_eq!(stack.describe(&node), "parenthesized group");
        stack.enter(Tag::ParamList, &mut node);
        assert_eq!(stack.describe(&node), "parameter list");
        stack.leave(&mut node);
    }
}
