//! Passes and contexts
//!
//!     A pass is a plain function over one composite's direct children. It looks for a tag
//!     pattern, folds every match into a new composite in place, and never descends into
//!     grandchildren. A context is the ordered list of passes for one kind of composite, plus
//!     its PreParse and PostParse hooks and the AllowOnly whitelist checked after the passes.
//!
//!     The helpers below are the shared vocabulary passes are written in:
//!
//!         scan_heads      visit every child carrying one of a set of head tags, with error
//!                         recovery per visit
//!         recognize       run expectations from a head and fold what they consumed
//!         match_at        test a tag pattern against the significant children from an index
//!         next_item       find where the next unclaimed run of children starts

use crate::diagnostics::FoldResult;
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;
use crate::context::ContextStack;

pub type PassFn = fn(&mut Session, &mut Node) -> FoldResult<()>;

#[derive(Clone, Copy)]
pub struct Pass {
    pub name: &'static str,
    pub run: PassFn,
}

impl Pass {
    pub const fn new(name: &'static str, run: PassFn) -> Pass {
        Pass { name, run }
    }
}

/// The parsing recipe for one kind of composite.
pub struct Context {
    pub name: &'static str,
    pub pre_parse: Option<PassFn>,
    pub passes: &'static [Pass],
    /// Non-trivia children that may survive the passes.
    pub allow: fn(Tag) -> bool,
    pub post_parse: Option<PassFn>,
    /// Whether the engine descends into the children afterwards.
    pub recurse: bool,
}

impl Context {
    pub fn allows(&self, tag: Tag) -> bool {
        tag.is_trivia() || tag == Tag::Argument || (self.allow)(tag)
    }
}

pub fn allow_anything(_tag: Tag) -> bool {
    true
}

/// Children no pass has claimed yet: lexer tokens and the bracket groups built by structuring.
pub fn is_raw(tag: Tag) -> bool {
    tag.is_lexical() || matches!(tag, Tag::Parens | Tag::Brackets | Tag::Braces)
}

/// Visit every child tagged with one of `heads`, left to right.
///
/// `build` is called with the head's index and must leave the cursor past the head when it
/// succeeds; a recoverable error is recorded and the scan resumes after the head.
pub fn scan_heads(
    session: &mut Session,
    node: &mut Node,
    heads: &[Tag],
    mut build: impl FnMut(&mut Session, &mut Node, usize) -> FoldResult<()>,
) -> FoldResult<()> {
    node.reset_cursor();
    loop {
        let from = node.cursor();
        let Some(at) = (from..node.len()).find(|&i| heads.contains(&node.children()[i].tag()))
        else {
            return Ok(());
        };
        node.set_cursor(at);
        let result = build(session, node, at);
        session.recover(result)?;
        if node.cursor() <= at {
            node.set_cursor(at + 1);
        }
    }
}

/// Run `expect` from `start` under a frame for `construct`, then fold everything it consumed.
///
/// On success the new composite sits at `start` and the cursor is just past it. On failure
/// nothing is folded.
pub fn recognize(
    session: &mut Session,
    node: &mut Node,
    start: usize,
    construct: Tag,
    expect: impl FnOnce(&ContextStack, &mut Node) -> FoldResult<()>,
) -> FoldResult<()> {
    session.frames.mark(construct, node.id());
    node.set_cursor(start);
    let result = expect(&session.frames, node);
    session.frames.unmark();
    result?;
    let end = node.cursor();
    node.wrap_range(start..end, construct)?;
    node.set_cursor(start + 1);
    Ok(())
}

/// Match `pattern` against the significant children starting at `start`.
///
/// Each pattern element is a set of accepted tags. Returns the index just past the last
/// matched child.
pub fn match_at(node: &Node, start: usize, pattern: &[&[Tag]]) -> Option<usize> {
    let mut at = start;
    for accepted in pattern {
        let index = node.next_significant(at)?;
        if !accepted.contains(&node.children()[index].tag()) {
            return None;
        }
        at = index + 1;
    }
    Some(at)
}

/// Significant tag after `index`, if any.
pub fn next_tag(node: &Node, index: usize) -> Option<Tag> {
    node.next_significant(index + 1).and_then(|i| node.tag_at(i))
}

/// Significant tag before `index`, if any.
pub fn prev_tag(node: &Node, index: usize) -> Option<Tag> {
    node.prev_significant(index).and_then(|i| node.tag_at(i))
}

/// First significant child at or after `from` that does not satisfy `is_boundary`.
pub fn next_item(node: &Node, from: usize, is_boundary: fn(Tag) -> bool) -> Option<usize> {
    (from..node.len()).find(|&i| {
        let child = &node.children()[i];
        !child.is_trivia() && !is_boundary(child.tag())
    })
}

/// Re-tag the first child with `from` after the cursor, if there is one.
pub fn retag_next(node: &mut Node, from: Tag, to: Tag) -> FoldResult<Option<usize>> {
    let start = node.cursor();
    match (start..node.len()).find(|&i| node.tag_at(i) == Some(from)) {
        Some(index) => {
            node.transform_child(index, to)?;
            node.set_cursor(index + 1);
            Ok(Some(index))
        }
        None => Ok(None),
    }
}

/// Index just past the end of the type region: everything before the first `=`.
pub fn type_region_end(node: &Node) -> usize {
    (0..node.len())
        .find(|&i| node.tag_at(i) == Some(Tag::Assign))
        .unwrap_or(node.len())
}

/// Split the children between the brackets of a group at top-level `separator`s, wrapping each
/// non-empty segment, trimmed of surrounding trivia, as `wrap`.
///
/// Returns the number of segments built. With `allow_empty` false, an empty segment next to a
/// separator is an error.
pub fn split_group(
    session: &mut Session,
    node: &mut Node,
    separator: Tag,
    wrap: Tag,
    allow_empty: bool,
) -> FoldResult<usize> {
    let (mut at, close) = inner_bounds(node);
    let mut close = close;
    let mut built = 0;
    let mut segments = 0;
    loop {
        let end = (at..close)
            .find(|&i| node.tag_at(i) == Some(separator))
            .unwrap_or(close);
        let first = (at..end).find(|&i| !node.children()[i].is_trivia());
        segments += 1;
        match first {
            Some(first) if node.tag_at(first) != Some(wrap) => {
                let last = (first..end)
                    .rev()
                    .find(|&i| !node.children()[i].is_trivia())
                    .unwrap_or(first);
                node.wrap_range(first..last + 1, wrap)?;
                let removed = last - first;
                close -= removed;
                at = end - removed;
                built += 1;
            }
            Some(_) => {
                at = end;
                built += 1;
            }
            None => {
                let is_lone_empty = segments == 1 && end == close;
                if !allow_empty && !is_lone_empty {
                    session.frames.mark(wrap, node.id());
                    node.set_cursor(end);
                    let err = node.expectation_error(&session.frames, wrap.label());
                    session.frames.unmark();
                    return Err(err);
                }
                at = end;
            }
        }
        if at >= close {
            return Ok(built);
        }
        // skip the separator
        at += 1;
        if at >= close && !allow_empty {
            session.frames.mark(wrap, node.id());
            node.set_cursor(at);
            let err = node.expectation_error(&session.frames, wrap.label());
            session.frames.unmark();
            return Err(err);
        }
    }
}

/// The index range strictly inside a bracketed composite's opener and closer.
fn inner_bounds(node: &Node) -> (usize, usize) {
    let opens = matches!(
        node.tag_at(0),
        Some(Tag::LParen | Tag::LBracket | Tag::LBrace)
    );
    let len = node.len();
    let closes = len > 0
        && matches!(
            node.tag_at(len - 1),
            Some(Tag::RParen | Tag::RBracket | Tag::RBrace)
        );
    let start = if opens { 1 } else { 0 };
    let end = if closes { len - 1 } else { len };
    (start, end.max(start))
}
