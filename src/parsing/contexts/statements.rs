//! Statements
//!
//!     A block is split into statements left to right. The kind of each statement is decided
//!     by its first significant child:
//!
//!         {...}                               Block
//!         if / while / for / do / switch      the matching statement, nested bodies included
//!         case X: / default:                  CaseLabel
//!         return / break / continue / goto    Jump
//!         expand                              ExpandCall
//!         name :                              Label
//!         a type, or `Name name`              Declaration
//!         anything else                       Statement, up to `;`
//!
//!     The extent of a compound statement is found by walking its nested bodies; a dangling
//!     `else` belongs to the innermost `if` without one. The nested bodies themselves are
//!     folded later, by the head context of the statement that owns them.

use super::{enums, is_type_start, records};
use crate::context::ContextStack;
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{next_item, next_tag, split_group, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub fn is_statement(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::Block
            | Tag::IfStatement
            | Tag::WhileStatement
            | Tag::ForStatement
            | Tag::DoWhileStatement
            | Tag::SwitchStatement
            | Tag::Jump
            | Tag::Label
            | Tag::CaseLabel
            | Tag::ExpandCall
            | Tag::StatementExpansion
            | Tag::Declaration
            | Tag::Statement
    )
}

fn is_block_boundary(tag: Tag) -> bool {
    is_statement(tag) || matches!(tag, Tag::LBrace | Tag::RBrace)
}

/// Tags that cannot continue a simple statement: a missing `;` is reported where one of
/// these starts.
fn ends_run(tag: Tag) -> bool {
    is_block_boundary(tag)
        || matches!(
            tag,
            Tag::If
                | Tag::Else
                | Tag::While
                | Tag::For
                | Tag::Do
                | Tag::Switch
                | Tag::Case
                | Tag::Return
                | Tag::Break
                | Tag::Continue
                | Tag::Goto
        )
}

pub static BLOCK: Context = Context {
    name: "block",
    pre_parse: None,
    passes: &[
        Pass::new("records", records::records),
        Pass::new("enums", enums::enums),
        Pass::new("statements", statements),
    ],
    allow: is_block_boundary,
    post_parse: None,
    recurse: true,
};

fn statements(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut from = 0;
    while let Some(start) = next_item(node, from, is_block_boundary) {
        let result = fold_statement(session, node, start);
        from = match session.recover(result)? {
            Some(()) => start + 1,
            None => (start..node.len())
                .find(|&i| node.tag_at(i) == Some(Tag::Semicolon))
                .map_or(node.len(), |i| i + 1),
        };
    }
    Ok(())
}

/// Fold the statement that starts at `start` into a single child.
fn fold_statement(session: &mut Session, node: &mut Node, start: usize) -> FoldResult<()> {
    let (end, tag) = extent(&mut session.frames, node, start)?;
    match tag {
        Tag::Block => node.transform_child(start, Tag::Block),
        Tag::Label => {
            node.set_cursor(start);
            let label = node.push_count(&mut session.frames, 2, Tag::Label)?;
            node.insert_stacked(start, label)
        }
        _ => node.wrap_range(start..end, tag),
    }
}

fn is_declaration_start(node: &Node, start: usize) -> bool {
    let Some(tag) = node.tag_at(start) else {
        return false;
    };
    if is_type_start(tag) {
        return true;
    }
    if tag != Tag::Identifier {
        return false;
    }
    // Name (:: Name)* followed by another name
    let mut at = start;
    loop {
        match next_tag(node, at) {
            Some(Tag::Identifier) => return true,
            Some(Tag::Scope) => {}
            _ => return false,
        }
        let Some(scope) = node.next_significant(at + 1) else {
            return false;
        };
        let Some(name) = node.next_significant(scope + 1) else {
            return false;
        };
        if node.tag_at(name) != Some(Tag::Identifier) {
            return false;
        }
        at = name;
    }
}

fn statement_tag(node: &Node, start: usize) -> Tag {
    match node.tag_at(start) {
        Some(Tag::Braces) => Tag::Block,
        Some(Tag::If) => Tag::IfStatement,
        Some(Tag::While) => Tag::WhileStatement,
        Some(Tag::For) => Tag::ForStatement,
        Some(Tag::Do) => Tag::DoWhileStatement,
        Some(Tag::Switch) => Tag::SwitchStatement,
        Some(Tag::Case | Tag::Default) => Tag::CaseLabel,
        Some(Tag::Return | Tag::Break | Tag::Continue | Tag::Goto) => Tag::Jump,
        Some(Tag::Expand) => Tag::ExpandCall,
        Some(Tag::Identifier) if next_tag(node, start) == Some(Tag::Colon) => Tag::Label,
        _ if is_declaration_start(node, start) => Tag::Declaration,
        _ => Tag::Statement,
    }
}

/// Where the statement starting at `start` ends (exclusive), and what it is.
fn extent(frames: &mut ContextStack, node: &mut Node, start: usize) -> FoldResult<(usize, Tag)> {
    let tag = statement_tag(node, start);
    frames.mark(tag, node.id());
    let result = measure(frames, node, start, tag);
    frames.unmark();
    result.map(|end| (end, tag))
}

fn measure(frames: &mut ContextStack, node: &mut Node, start: usize, tag: Tag) -> FoldResult<usize> {
    node.set_cursor(start);
    match tag {
        Tag::Block => Ok(start + 1),
        Tag::IfStatement => {
            node.expect(frames, Tag::If)?;
            node.expect(frames, Tag::Parens)?;
            let end = body_end(frames, node)?;
            node.set_cursor(end);
            if node.accept(Tag::Else).is_some() {
                return body_end(frames, node);
            }
            Ok(end)
        }
        Tag::WhileStatement | Tag::SwitchStatement | Tag::ForStatement => {
            node.advance();
            node.expect(frames, Tag::Parens)?;
            body_end(frames, node)
        }
        Tag::DoWhileStatement => {
            node.expect(frames, Tag::Do)?;
            let end = body_end(frames, node)?;
            node.set_cursor(end);
            node.expect(frames, Tag::While)?;
            node.expect(frames, Tag::Parens)?;
            node.expect(frames, Tag::Semicolon)?;
            Ok(node.cursor())
        }
        Tag::Label => {
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Colon)?;
            Ok(node.cursor())
        }
        Tag::CaseLabel => through(frames, node, start, Tag::Colon),
        _ => through(frames, node, start, Tag::Semicolon),
    }
}

/// End of the nested statement at the cursor.
fn body_end(frames: &mut ContextStack, node: &mut Node) -> FoldResult<usize> {
    node.skip_trivia();
    let at = node.cursor();
    match node.tag_at(at) {
        Some(tag) if is_statement(tag) => Ok(at + 1),
        Some(tag) if tag != Tag::RBrace && tag != Tag::Else => {
            extent(frames, node, at).map(|(end, _)| end)
        }
        _ => Err(node.expectation_error(frames, "statement")),
    }
}

/// Index just past the first `stop` after `start`, which must come before anything that
/// ends the run.
fn through(frames: &ContextStack, node: &mut Node, start: usize, stop: Tag) -> FoldResult<usize> {
    if node.tag_at(start) == Some(stop) {
        return Ok(start + 1);
    }
    let found = (start + 1..node.len()).find(|&i| {
        let tag = node.children()[i].tag();
        tag == stop || ends_run(tag)
    });
    match found {
        Some(index) if node.tag_at(index) == Some(stop) => Ok(index + 1),
        other => {
            node.set_cursor(other.unwrap_or(node.len()));
            Err(node.expectation_error(frames, &stop.describe()))
        }
    }
}

/// Fold the statement after `after` unless it is one already. Returns the index past it.
fn fold_body(session: &mut Session, node: &mut Node, after: usize) -> FoldResult<usize> {
    let Some(at) = node.next_significant(after) else {
        node.set_cursor(node.len());
        return Err(node.expectation_error(&session.frames, "statement"));
    };
    if !node.tag_at(at).map_or(false, is_statement) {
        fold_statement(session, node, at)?;
    }
    Ok(at + 1)
}

fn allow_head(tag: Tag) -> bool {
    is_statement(tag)
        || matches!(
            tag,
            Tag::If
                | Tag::Else
                | Tag::While
                | Tag::Do
                | Tag::For
                | Tag::Switch
                | Tag::Condition
                | Tag::ForHeader
                | Tag::Semicolon
        )
}

pub static IF: Context = Context {
    name: "if statement",
    pre_parse: None,
    passes: &[
        Pass::new("condition", condition),
        Pass::new("branches", branches),
    ],
    allow: allow_head,
    post_parse: None,
    recurse: true,
};

pub static LOOP: Context = Context {
    name: "while or switch",
    pre_parse: None,
    passes: &[
        Pass::new("condition", condition),
        Pass::new("body", after_condition),
    ],
    allow: allow_head,
    post_parse: None,
    recurse: true,
};

pub static FOR: Context = Context {
    name: "for loop",
    pre_parse: None,
    passes: &[Pass::new("header", for_header), Pass::new("body", after_header)],
    allow: allow_head,
    post_parse: None,
    recurse: true,
};

pub static DO_WHILE: Context = Context {
    name: "do-while loop",
    pre_parse: None,
    passes: &[Pass::new("body and condition", do_while)],
    allow: allow_head,
    post_parse: None,
    recurse: true,
};

/// The keyword, then its parenthesized condition.
fn condition(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let frames = &session.frames;
    node.check_or(frames, &[Tag::If, Tag::While, Tag::Switch])?;
    let (index, tag) = node.check_or(frames, &[Tag::Parens, Tag::Condition])?;
    if tag == Tag::Parens {
        node.transform_child(index, Tag::Condition)?;
    }
    Ok(())
}

fn find(node: &Node, tag: Tag) -> Option<usize> {
    (0..node.len()).find(|&i| node.tag_at(i) == Some(tag))
}

fn branches(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let Some(condition) = find(node, Tag::Condition) else {
        return Ok(());
    };
    let end = fold_body(session, node, condition + 1)?;
    let otherwise = node
        .next_significant(end)
        .filter(|&i| node.tag_at(i) == Some(Tag::Else));
    if let Some(otherwise) = otherwise {
        fold_body(session, node, otherwise + 1)?;
    }
    Ok(())
}

fn after_condition(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    match find(node, Tag::Condition) {
        Some(condition) => fold_body(session, node, condition + 1).map(|_| ()),
        None => Ok(()),
    }
}

fn for_header(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let frames = &session.frames;
    node.expect(frames, Tag::For)?;
    let (index, tag) = node.check_or(frames, &[Tag::Parens, Tag::ForHeader])?;
    if tag == Tag::Parens {
        node.transform_child(index, Tag::ForHeader)?;
    }
    Ok(())
}

fn after_header(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    match find(node, Tag::ForHeader) {
        Some(header) => fold_body(session, node, header + 1).map(|_| ()),
        None => Ok(()),
    }
}

fn do_while(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let frames = &session.frames;
    let keyword = node.expect(frames, Tag::Do)?;
    let end = fold_body(session, node, keyword + 1)?;
    node.set_cursor(end);
    let frames = &session.frames;
    node.expect(frames, Tag::While)?;
    let (index, tag) = node.check_or(frames, &[Tag::Parens, Tag::Condition])?;
    if tag == Tag::Parens {
        node.transform_child(index, Tag::Condition)?;
    }
    node.expect(frames, Tag::Semicolon)?;
    Ok(())
}

pub static FOR_HEADER: Context = Context {
    name: "for header",
    pre_parse: None,
    passes: &[Pass::new("clauses", clauses)],
    allow: |tag| matches!(tag, Tag::ForClause | Tag::Semicolon | Tag::LParen | Tag::RParen),
    post_parse: None,
    recurse: true,
};

fn clauses(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    split_group(session, node, Tag::Semicolon, Tag::ForClause, true).map(|_| ())
}
