//! Nodes
//!
//!     A node is either a terminal (tag + source text) or a composite (tag + ordered children +
//!     cursor). Both share the same `Tag` space and the same header: a stable `NodeId`, the
//!     location of the node's first significant byte, and the id of the parent it is attached to.
//!
//! Ownership
//!
//!     Composites own their children by value, so a node is reachable from exactly one place:
//!     a parent's child list, a `Stacked` guard, or a local variable about to be dropped. The
//!     parent back-reference is only an id; it is set when a node is attached and cleared when
//!     it is detached. All attach and detach operations go through the methods below, which are
//!     the sole writers of the parent field.
//!
//! Cursor
//!
//!     Every composite has a cursor: an index into its children used by the consume-run family
//!     (see [cursor](super::cursor)). Removing children before the cursor shifts it back;
//!     inserting at the cursor moves it past the new node.

use super::stacked::Stacked;
use crate::diagnostics::{FoldError, FoldResult};
use crate::token::{Location, Tag, Token};
use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

/// Stable identity of a node; used for parent back-references and context anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn fresh() -> NodeId {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Composite {
    children: Vec<Node>,
    cursor: usize,
    parsed: bool,
}

#[derive(Debug)]
pub enum Payload {
    Terminal { text: String },
    Composite(Composite),
}

#[derive(Debug)]
pub struct Node {
    id: NodeId,
    tag: Tag,
    parent: Option<NodeId>,
    location: Location,
    payload: Payload,
}

impl From<Token> for Node {
    fn from(token: Token) -> Self {
        Node::terminal(token.tag, token.text, token.location)
    }
}

impl Node {
    pub fn terminal(tag: Tag, text: impl Into<String>, location: Location) -> Node {
        Node {
            id: NodeId::fresh(),
            tag,
            parent: None,
            location,
            payload: Payload::Terminal { text: text.into() },
        }
    }

    /// A composite wrapping `children`, located at its first significant child.
    pub fn composite(tag: Tag, fallback: Location, children: Vec<Node>) -> Node {
        let location = children
            .iter()
            .find(|c| !c.tag.is_trivia())
            .or_else(|| children.first())
            .map(|c| c.location.clone())
            .unwrap_or(fallback);
        let mut node = Node {
            id: NodeId::fresh(),
            tag,
            parent: None,
            location,
            payload: Payload::Composite(Composite::default()),
        };
        let id = node.id;
        if let Payload::Composite(composite) = &mut node.payload {
            composite.children = children
                .into_iter()
                .map(|mut child| {
                    debug_assert!(child.parent.is_none(), "wrapping an attached node");
                    child.parent = Some(id);
                    child
                })
                .collect();
        }
        node
    }

    /// An empty composite, used for synthesized nodes that carry no source text.
    pub fn synthetic(tag: Tag, location: Location) -> Node {
        let mut node = Node::composite(tag, location, Vec::new());
        node.mark_parsed();
        node
    }

    pub(super) fn placeholder() -> Node {
        Node {
            id: NodeId(0),
            tag: Tag::Unknown,
            parent: None,
            location: Location::synthetic(),
            payload: Payload::Terminal {
                text: String::new(),
            },
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.payload, Payload::Terminal { .. })
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.payload, Payload::Composite(_))
    }

    pub fn is_trivia(&self) -> bool {
        self.tag.is_trivia()
    }

    /// Source text of a terminal; `None` for composites.
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Terminal { text } => Some(text),
            Payload::Composite(_) => None,
        }
    }

    /// Re-tag this node in place. Only reachable through detached-node operations.
    pub(super) fn retag(&mut self, tag: Tag) {
        self.tag = tag;
    }

    pub fn children(&self) -> &[Node] {
        match &self.payload {
            Payload::Composite(c) => &c.children,
            Payload::Terminal { .. } => &[],
        }
    }

    /// Mutable access to the children for in-place recursion.
    ///
    /// The slice cannot grow or shrink; moving nodes between parents must go through
    /// detach/insert so that parent ids stay correct.
    pub fn children_mut(&mut self) -> &mut [Node] {
        match &mut self.payload {
            Payload::Composite(c) => &mut c.children,
            Payload::Terminal { .. } => &mut [],
        }
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children_mut().get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.children().len()
    }

    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    /// Children that are not trivia.
    pub fn significant(&self) -> impl Iterator<Item = &Node> {
        self.children().iter().filter(|c| !c.is_trivia())
    }

    /// Index of the first non-trivia child at or after `from`.
    pub fn next_significant(&self, from: usize) -> Option<usize> {
        (from..self.len()).find(|&i| !self.children()[i].is_trivia())
    }

    /// Index of the last non-trivia child before `before`.
    pub fn prev_significant(&self, before: usize) -> Option<usize> {
        (0..before.min(self.len()))
            .rev()
            .find(|&i| !self.children()[i].is_trivia())
    }

    pub fn tag_at(&self, index: usize) -> Option<Tag> {
        self.child(index).map(Node::tag)
    }

    pub fn is_parsed(&self) -> bool {
        match &self.payload {
            Payload::Composite(c) => c.parsed,
            Payload::Terminal { .. } => true,
        }
    }

    pub fn mark_parsed(&mut self) {
        if let Payload::Composite(c) = &mut self.payload {
            c.parsed = true;
        }
    }

    // Cursor

    pub fn cursor(&self) -> usize {
        match &self.payload {
            Payload::Composite(c) => c.cursor,
            Payload::Terminal { .. } => 0,
        }
    }

    pub fn set_cursor(&mut self, position: usize) {
        let len = self.len();
        if let Payload::Composite(c) = &mut self.payload {
            c.cursor = position.min(len);
        }
    }

    pub fn reset_cursor(&mut self) {
        self.set_cursor(0);
    }

    pub fn advance(&mut self) {
        let next = self.cursor() + 1;
        self.set_cursor(next);
    }

    pub fn at_cursor(&self) -> Option<&Node> {
        self.child(self.cursor())
    }

    pub fn at_end(&self) -> bool {
        self.cursor() >= self.len()
    }

    /// Move the cursor past any trivia.
    pub fn skip_trivia(&mut self) {
        let next = self.next_significant(self.cursor()).unwrap_or(self.len());
        self.set_cursor(next);
    }

    fn composite_mut(&mut self) -> FoldResult<&mut Composite> {
        let location = self.location.clone();
        let tag = self.tag;
        match &mut self.payload {
            Payload::Composite(c) => Ok(c),
            Payload::Terminal { .. } => Err(FoldError::internal(
                location,
                format!("{} is a terminal and cannot hold children", tag.describe()),
            )),
        }
    }

    // Attach

    /// Attach a detached node at `index`.
    ///
    /// Fails with an internal error if `node` still names a parent or `self` is a terminal.
    pub fn insert(&mut self, index: usize, mut node: Node) -> FoldResult<()> {
        if let Some(parent) = node.parent {
            return Err(FoldError::internal(
                node.location.clone(),
                format!(
                    "{} is still attached to node {} and cannot be inserted",
                    node.tag.describe(),
                    parent.value()
                ),
            ));
        }
        let id = self.id;
        let composite = self.composite_mut()?;
        let index = index.min(composite.children.len());
        node.parent = Some(id);
        composite.children.insert(index, node);
        if composite.cursor > index {
            composite.cursor += 1;
        }
        Ok(())
    }

    pub fn append(&mut self, node: Node) -> FoldResult<()> {
        let end = self.len();
        self.insert(end, node)
    }

    /// Attach at the cursor and move the cursor past the new node.
    pub fn insert_at_cursor(&mut self, node: Node) -> FoldResult<()> {
        let at = self.cursor();
        self.insert(at, node)?;
        self.set_cursor(at + 1);
        Ok(())
    }

    /// Commit a stacked node into this composite at `index`.
    pub fn insert_stacked(&mut self, index: usize, stacked: Stacked) -> FoldResult<()> {
        self.insert(index, stacked.commit())
    }

    pub fn insert_stacked_at_cursor(&mut self, stacked: Stacked) -> FoldResult<()> {
        self.insert_at_cursor(stacked.commit())
    }

    // Detach

    /// Detach the children in `range`, clearing their parent ids.
    pub fn detach_range(&mut self, range: Range<usize>) -> Vec<Node> {
        let Payload::Composite(composite) = &mut self.payload else {
            return Vec::new();
        };
        let end = range.end.min(composite.children.len());
        let start = range.start.min(end);
        let removed: Vec<Node> = composite
            .children
            .drain(start..end)
            .map(|mut child| {
                child.parent = None;
                child
            })
            .collect();
        if composite.cursor >= end {
            composite.cursor -= removed.len();
        } else if composite.cursor > start {
            composite.cursor = start;
        }
        removed
    }

    /// Detach one child into a scoped handle.
    pub fn detach(&mut self, index: usize) -> Option<Stacked> {
        if index >= self.len() {
            return None;
        }
        self.detach_range(index..index + 1)
            .pop()
            .map(Stacked::new)
    }

    /// Detach and destroy one child.
    pub fn delete(&mut self, index: usize) {
        if let Some(stacked) = self.detach(index) {
            stacked.discard();
        }
    }

    /// Detach `range` and wrap it in a new detached composite tagged `wrap`.
    pub fn take_range(&mut self, range: Range<usize>, wrap: Tag) -> Stacked {
        let fallback = self
            .child(range.start)
            .map(|c| c.location.clone())
            .unwrap_or_else(|| self.location.clone());
        let children = self.detach_range(range);
        Stacked::new(Node::composite(wrap, fallback, children))
    }

    /// Wrap `range` in a new composite tagged `wrap` and put it back where the run was.
    pub fn wrap_range(&mut self, range: Range<usize>, wrap: Tag) -> FoldResult<()> {
        let start = range.start;
        let stacked = self.take_range(range, wrap);
        self.insert_stacked(start, stacked)
    }

    /// Re-tag the child at `index` by detaching, transforming and re-inserting it.
    ///
    /// The cursor is left where it was.
    pub fn transform_child(&mut self, index: usize, tag: Tag) -> FoldResult<()> {
        let saved = self.cursor();
        let Some(mut stacked) = self.detach(index) else {
            return Err(FoldError::internal(
                self.location.clone(),
                format!("no child at index {} to transform", index),
            ));
        };
        stacked.transform(tag);
        self.insert_stacked(index, stacked)?;
        self.set_cursor(saved);
        Ok(())
    }

    /// Replace the child at `index` with `node`, dropping the old child.
    pub fn replace(&mut self, index: usize, node: Node) -> FoldResult<()> {
        self.delete(index);
        self.insert(index, node)
    }

    /// Splice the children of a detached composite in at the cursor, discarding the wrapper.
    pub fn collapse_at_cursor(&mut self, stacked: Stacked) -> FoldResult<()> {
        for child in stacked.into_children() {
            self.insert_at_cursor(child)?;
        }
        Ok(())
    }

    /// Replace the composite child at `index` by its own children.
    pub fn collapse_child(&mut self, index: usize) -> FoldResult<()> {
        let Some(stacked) = self.detach(index) else {
            return Ok(());
        };
        let saved = self.cursor();
        self.set_cursor(index);
        self.collapse_at_cursor(stacked)?;
        self.set_cursor(saved.min(self.len()));
        Ok(())
    }

    // Whole-tree helpers

    /// Deep copy with fresh identities. The copy is detached.
    pub fn deep_clone(&self) -> Node {
        match &self.payload {
            Payload::Terminal { text } => Node::terminal(self.tag, text.clone(), self.location.clone()),
            Payload::Composite(c) => {
                let children = c.children.iter().map(Node::deep_clone).collect();
                let mut node = Node::composite(self.tag, self.location.clone(), children);
                node.location = self.location.clone();
                if c.parsed {
                    node.mark_parsed();
                }
                node
            }
        }
    }

    /// Concatenated text of every terminal below this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match &self.payload {
            Payload::Terminal { text } => out.push_str(text),
            Payload::Composite(c) => c.children.iter().for_each(|child| child.write_text(out)),
        }
    }

    /// Concatenated text of non-trivia terminals, separated by single spaces.
    pub fn significant_text(&self) -> String {
        let mut words = Vec::new();
        self.walk(&mut |node, _| {
            if let Some(text) = node.text() {
                if !node.is_trivia() {
                    words.push(text.to_string());
                }
            }
        });
        words.join(" ")
    }

    /// Pre-order traversal with depth.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut dyn FnMut(&'a Node, usize)) {
        visit(self, depth);
        for child in self.children() {
            child.walk_at(depth + 1, visit);
        }
    }

    /// True if any node below (or at) this one has a tag in `tags`.
    pub fn contains_any(&self, tags: &[Tag]) -> bool {
        let mut found = false;
        self.walk(&mut |node, _| found |= tags.contains(&node.tag));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Location {
        Location::new("t.cf", 1)
    }

    fn word(text: &str) -> Node {
        Node::terminal(Tag::Identifier, text, loc())
    }

    fn list(words: &[&str]) -> Node {
        Node::composite(Tag::Block, loc(), words.iter().map(|w| word(w)).collect())
    }

    #[test]
    fn test_composite_sets_parent() {
        let node = list(&["a", "b"]);
        assert!(node.children().iter().all(|c| c.parent() == Some(node.id())));
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn test_insert_rejects_attached_node() {
        let mut node = list(&["a"]);
        let mut other = list(&["x"]);
        let attached = other.detach_range(0..1).pop().unwrap();
        assert!(attached.parent().is_none());
        node.append(attached).unwrap();

        let mut fake = word("y");
        fake.parent = Some(node.id());
        assert!(node.append(fake).is_err());
    }

    #[test]
    fn test_insert_at_cursor_advances() {
        let mut node = list(&["a", "c"]);
        node.set_cursor(1);
        node.insert_at_cursor(word("b")).unwrap();
        assert_eq!(node.cursor(), 2);
        assert_eq!(node.text_content(), "abc");
    }

    #[test]
    fn test_detach_clears_parent_and_shifts_cursor() {
        let mut node = list(&["a", "b", "c", "d"]);
        node.set_cursor(3);
        let removed = node.detach_range(0..2);
        assert!(removed.iter().all(|n| n.parent().is_none()));
        assert_eq!(node.cursor(), 1);
        assert_eq!(node.at_cursor().and_then(Node::text), Some("d"));
    }

    #[test]
    fn test_wrap_range() {
        let mut node = list(&["a", "b", "c"]);
        node.wrap_range(1..3, Tag::Group).unwrap();
        assert_eq!(node.len(), 2);
        let group = node.child(1).unwrap();
        assert_eq!(group.tag(), Tag::Group);
        assert_eq!(group.parent(), Some(node.id()));
        assert_eq!(group.text_content(), "bc");
    }

    #[test]
    fn test_collapse_child() {
        let mut node = list(&["a", "b", "c"]);
        node.wrap_range(0..2, Tag::Group).unwrap();
        node.collapse_child(0).unwrap();
        assert_eq!(node.len(), 3);
        assert!(node.children().iter().all(|c| c.parent() == Some(node.id())));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let mut node = list(&["a", "b"]);
        node.wrap_range(0..2, Tag::Group).unwrap();
        let copy = node.deep_clone();
        assert_ne!(copy.id(), node.id());
        assert_eq!(copy.text_content(), node.text_content());
        assert_eq!(copy.child(0).unwrap().tag(), Tag::Group);
        assert_eq!(copy.child(0).unwrap().parent(), Some(copy.id()));
        assert_ne!(copy.child(0).unwrap().id(), node.child(0).unwrap().id());
    }

    #[test]
    fn test_transform_child() {
        let mut node = list(&["a"]);
        node.wrap_range(0..1, Tag::Parens).unwrap();
        node.transform_child(0, Tag::ParamList).unwrap();
        assert_eq!(node.child(0).unwrap().tag(), Tag::ParamList);
    }

    #[test]
    fn test_transform_child_keeps_cursor() {
        let mut node = list(&["a", "b", "c"]);
        node.wrap_range(1..2, Tag::Parens).unwrap();
        node.set_cursor(2);
        node.transform_child(1, Tag::Condition).unwrap();
        assert_eq!(node.cursor(), 2);
        assert_eq!(node.at_cursor().and_then(Node::text), Some("c"));
    }
}
