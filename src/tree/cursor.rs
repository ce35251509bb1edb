//! Cursor operations: the consume-run family and expectations
//!
//!     These are the building blocks passes use to carve a composite's children into new
//!     composites. All of them work from the node's cursor.
//!
//!         push_until(stops)         detach up to (not including) the first stop tag, or to
//!                                   the end
//!         push_through(stops)       detach up to and including a stop tag; the stop is
//!                                   required
//!         push_count(n)             detach exactly n significant nodes (plus the trivia
//!                                   between them)
//!         reverse_expect(tags)      find the last child tagged one of `tags` and detach
//!                                   everything from the cursor up to it
//!
//!         expect(tag)               the next significant node must have `tag`; consume it
//!         check_or(tags)            the next significant node must have one of `tags`
//!         check_none()              no significant node may remain
//!
//!     Each detached run comes back as a `Stacked` composite tagged with the requested wrap tag.
//!     Violations are parse errors phrased "expected X, got Y, in context Z".

use super::node::Node;
use super::stacked::Stacked;
use crate::context::ContextStack;
use crate::diagnostics::{FoldError, FoldResult};
use crate::token::Tag;

/// Render a tag set for a diagnostic: "`;`" or "one of `;`, `,`".
pub fn describe_tags(tags: &[Tag]) -> String {
    match tags {
        [] => "nothing".to_string(),
        [one] => one.describe(),
        many => format!(
            "one of {}",
            many.iter().map(|t| t.describe()).collect::<Vec<_>>().join(", ")
        ),
    }
}

impl Node {
    /// A parse error at the cursor: "expected X, got Y, in context Z".
    pub fn expectation_error(&self, frames: &ContextStack, expected: &str) -> Box<FoldError> {
        let context = frames.describe(self);
        match self.next_significant(self.cursor()).and_then(|i| self.child(i)) {
            Some(found) => FoldError::parse(
                found.location().clone(),
                format!(
                    "expected {}, got {}, in context {}",
                    expected,
                    describe_found(found),
                    context
                ),
            ),
            None => {
                let location = self
                    .children()
                    .last()
                    .map(|c| c.location().clone())
                    .unwrap_or_else(|| self.location().clone());
                FoldError::parse(
                    location,
                    format!(
                        "expected {}, got end of {}, in context {}",
                        expected,
                        self.tag().label(),
                        context
                    ),
                )
            }
        }
    }

    pub fn push_until(&mut self, stops: &[Tag], wrap: Tag) -> Stacked {
        let start = self.cursor();
        let end = (start..self.len())
            .find(|&i| stops.contains(&self.children()[i].tag()))
            .unwrap_or(self.len());
        self.take_range(start..end, wrap)
    }

    pub fn push_through(
        &mut self,
        frames: &mut ContextStack,
        stops: &[Tag],
        wrap: Tag,
    ) -> FoldResult<Stacked> {
        frames.mark(wrap, self.id());
        let start = self.cursor();
        let stop = (start..self.len()).find(|&i| stops.contains(&self.children()[i].tag()));
        let result = match stop {
            Some(end) => Ok(self.take_range(start..end + 1, wrap)),
            None => {
                self.set_cursor(self.len());
                let err = self.expectation_error(frames, &describe_tags(stops));
                self.set_cursor(start);
                Err(err)
            }
        };
        frames.unmark();
        result
    }

    pub fn push_count(
        &mut self,
        frames: &mut ContextStack,
        count: usize,
        wrap: Tag,
    ) -> FoldResult<Stacked> {
        let start = self.cursor();
        let mut seen = 0;
        let mut end = start;
        while seen < count {
            match self.next_significant(end) {
                Some(i) => {
                    seen += 1;
                    end = i + 1;
                }
                None => {
                    frames.mark(wrap, self.id());
                    self.set_cursor(self.len());
                    let err =
                        self.expectation_error(frames, &format!("{} more item(s)", count - seen));
                    self.set_cursor(start);
                    frames.unmark();
                    return Err(err);
                }
            }
        }
        Ok(self.take_range(start..end, wrap))
    }

    pub fn reverse_expect(
        &mut self,
        frames: &mut ContextStack,
        tags: &[Tag],
        wrap: Tag,
    ) -> FoldResult<Stacked> {
        let start = self.cursor();
        let found = (start..self.len())
            .rev()
            .find(|&i| tags.contains(&self.children()[i].tag()));
        match found {
            Some(at) => Ok(self.take_range(start..at, wrap)),
            None => {
                frames.mark(wrap, self.id());
                let err = self.expectation_error(frames, &describe_tags(tags));
                frames.unmark();
                Err(err)
            }
        }
    }

    pub fn expect(&mut self, frames: &ContextStack, tag: Tag) -> FoldResult<usize> {
        self.check_or(frames, &[tag]).map(|(index, _)| index)
    }

    pub fn check_or(&mut self, frames: &ContextStack, tags: &[Tag]) -> FoldResult<(usize, Tag)> {
        self.skip_trivia();
        match self.at_cursor().map(Node::tag) {
            Some(tag) if tags.contains(&tag) => {
                let index = self.cursor();
                self.advance();
                Ok((index, tag))
            }
            _ => Err(self.expectation_error(frames, &describe_tags(tags))),
        }
    }

    /// Consume the next significant node if it has `tag`.
    pub fn accept(&mut self, tag: Tag) -> Option<usize> {
        let saved = self.cursor();
        self.skip_trivia();
        if self.at_cursor().map(Node::tag) == Some(tag) {
            let index = self.cursor();
            self.advance();
            Some(index)
        } else {
            self.set_cursor(saved);
            None
        }
    }

    pub fn check_none(&mut self, frames: &ContextStack) -> FoldResult<()> {
        self.skip_trivia();
        if self.at_end() {
            Ok(())
        } else {
            Err(self.expectation_error(frames, &format!("end of {}", frames.describe(self))))
        }
    }
}

fn describe_found(node: &Node) -> String {
    match node.text() {
        Some(text) if node.tag().is_name() || node.tag().is_literal() => {
            format!("{} `{}`", node.tag().label(), text)
        }
        _ => node.tag().describe(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Location;

    fn loc(line: u32) -> Location {
        Location::new("t.cf", line)
    }

    /// `int x ; y` with whitespace between words
    fn decl() -> Node {
        let parts = [
            (Tag::Int, "int"),
            (Tag::Whitespace, " "),
            (Tag::Identifier, "x"),
            (Tag::Semicolon, ";"),
            (Tag::Whitespace, " "),
            (Tag::Identifier, "y"),
        ];
        Node::composite(
            Tag::File,
            loc(1),
            parts
                .iter()
                .map(|(tag, text)| Node::terminal(*tag, *text, loc(1)))
                .collect(),
        )
    }

    #[test]
    fn test_push_until_stops_before_terminator() {
        let mut node = decl();
        let run = node.push_until(&[Tag::Semicolon], Tag::Declaration);
        assert_eq!(run.node().text_content(), "int x");
        assert_eq!(node.at_cursor().map(Node::tag), Some(Tag::Semicolon));
        run.discard();
    }

    #[test]
    fn test_push_through_includes_terminator() {
        let mut node = decl();
        let mut frames = ContextStack::new();
        let run = node
            .push_through(&mut frames, &[Tag::Semicolon], Tag::Declaration)
            .unwrap();
        assert_eq!(run.node().text_content(), "int x;");
        node.insert_stacked_at_cursor(run).unwrap();
        assert_eq!(node.child(0).unwrap().tag(), Tag::Declaration);
        assert_eq!(frames.depth(), 0);
    }

    #[test]
    fn test_push_through_missing_terminator() {
        let mut node = decl();
        let mut frames = ContextStack::new();
        node.set_cursor(4);
        let err = node
            .push_through(&mut frames, &[Tag::Semicolon], Tag::Declaration)
            .unwrap_err();
        assert_eq!(
            err.message,
            "expected `;`, got end of file, in context declaration"
        );
        assert_eq!(node.len(), 6);
        assert_eq!(node.cursor(), 4);
    }

    #[test]
    fn test_push_count_counts_significant_nodes() {
        let mut node = decl();
        let mut frames = ContextStack::new();
        let run = node.push_count(&mut frames, 2, Tag::TypeSpec).unwrap();
        assert_eq!(run.node().text_content(), "int x");
        run.discard();
        assert!(node.push_count(&mut frames, 5, Tag::TypeSpec).is_err());
    }

    #[test]
    fn test_reverse_expect_separates_name_from_type() {
        let mut node = decl();
        let mut frames = ContextStack::new();
        node.delete(5);
        node.delete(4);
        node.delete(3);
        let ty = node
            .reverse_expect(&mut frames, &[Tag::Identifier], Tag::TypeSpec)
            .unwrap();
        assert_eq!(ty.node().text_content(), "int ");
        node.insert_stacked_at_cursor(ty).unwrap();
        assert_eq!(node.child(0).unwrap().tag(), Tag::TypeSpec);
        assert_eq!(node.child(1).unwrap().text(), Some("x"));
    }

    #[test]
    fn test_expect_and_check_or() {
        let mut node = decl();
        let frames = ContextStack::new();
        assert_eq!(node.expect(&frames, Tag::Int).unwrap(), 0);
        assert_eq!(node.expect(&frames, Tag::Identifier).unwrap(), 2);
        let err = node.expect(&frames, Tag::Comma).unwrap_err();
        assert_eq!(err.message, "expected `,`, got `;`, in context file");
        assert_eq!(
            node.check_or(&frames, &[Tag::Comma, Tag::Semicolon]).unwrap(),
            (3, Tag::Semicolon)
        );
        let err = node.check_none(&frames).unwrap_err();
        assert_eq!(
            err.message,
            "expected end of file, got identifier `y`, in context file"
        );
    }

    #[test]
    fn test_accept_restores_cursor_on_miss() {
        let mut node = decl();
        assert_eq!(node.accept(Tag::Semicolon), None);
        assert_eq!(node.cursor(), 0);
        assert_eq!(node.accept(Tag::Int), Some(0));
    }
}
