//! Token pasting
//!
//!     `left ## right` joins the text of its two operands into one token, after parameters
//!     have been substituted. Blanks next to `##` are dropped; a newline or a comment is not a
//!     blank and cannot be pasted. An operand that came from an argument must be a single
//!     token. The joined text is lexed again and must come out as exactly one token, whose tag
//!     the result takes: `foo ## bar` is the identifier `foobar`, `1 ## 2` the integer `12`.
//!     A paste is not forced to an identifier. Spelling a keyword gives the keyword of the
//!     current lexing mode, so `whi ## le` is `while` and later passes see a loop head.
//!
//!     Chains paste left to right: `a ## b ## c` is `(ab) ## c`.

use crate::diagnostics::{FoldError, FoldResult};
use crate::lexing::{lex, LexMode};
use crate::token::{Location, Tag};
use crate::tree::Node;

/// Paste every `##` in `node`'s children, descending into groups that have not been parsed.
///
/// Returns the number of pastes made.
pub fn concatenate(node: &mut Node, mode: LexMode) -> FoldResult<usize> {
    let mut pasted = 0;
    let mut index = 0;
    while index < node.len() {
        match node.tag_at(index) {
            Some(Tag::Concat) => {
                index = paste(node, index, mode)?;
                pasted += 1;
            }
            _ => {
                if let Some(child) = node
                    .child_mut(index)
                    .filter(|c| c.is_composite() && !c.is_parsed())
                {
                    pasted += concatenate(child, mode)?;
                }
                index += 1;
            }
        }
    }
    Ok(pasted)
}

enum Side {
    Left,
    Right,
}

/// Index of the operand on one side of the `##` at `at`, skipping blanks.
fn operand(node: &Node, at: usize, side: Side) -> FoldResult<usize> {
    let found = match side {
        Side::Left => (0..at).rev().find(|&i| !node.children()[i].tag().is_blank()),
        Side::Right => (at + 1..node.len()).find(|&i| !node.children()[i].tag().is_blank()),
    };
    let edge = match side {
        Side::Left => "start",
        Side::Right => "end",
    };
    let location = node.children()[at].location().clone();
    let boundary = || {
        FoldError::expansion(
            location.clone(),
            format!("`##` at the {} of a macro body", edge),
        )
    };
    let Some(index) = found else {
        return Err(boundary());
    };
    let tag = node.children()[index].tag();
    if matches!(
        tag,
        Tag::LParen | Tag::RParen | Tag::LBracket | Tag::RBracket | Tag::LBrace | Tag::RBrace
    ) {
        return Err(boundary());
    }
    if tag.is_trivia() {
        return Err(FoldError::expansion(location, "`##` cannot join whitespace"));
    }
    Ok(index)
}

/// The text an operand contributes.
fn operand_text(node: &Node) -> FoldResult<String> {
    if let Some(text) = node.text() {
        return Ok(text.to_string());
    }
    let mut significant = node.significant();
    match (node.tag(), significant.next(), significant.next()) {
        (Tag::Argument, Some(only), None) if only.is_terminal() => {
            Ok(only.text().unwrap_or_default().to_string())
        }
        _ => Err(FoldError::expansion(
            node.location().clone(),
            format!(
                "`##` operand must be a single token, got {} `{}`",
                node.tag().label(),
                node.text_content().trim()
            ),
        )),
    }
}

/// Paste around the `##` at `at`. Returns the index of the pasted token.
fn paste(node: &mut Node, at: usize, mode: LexMode) -> FoldResult<usize> {
    let left = operand(node, at, Side::Left)?;
    let right = operand(node, at, Side::Right)?;
    let joined = format!(
        "{}{}",
        operand_text(&node.children()[left])?,
        operand_text(&node.children()[right])?
    );
    let location = node.children()[left].location().clone();
    let token = relex(&joined, &location, mode)?;
    node.detach_range(left..right + 1);
    node.insert(left, token)?;
    Ok(left)
}

fn relex(text: &str, location: &Location, mode: LexMode) -> FoldResult<Node> {
    let invalid = || {
        FoldError::expansion(
            location.clone(),
            format!("`##` produced `{}`, which is not a single token", text),
        )
    };
    let mut tokens = lex(&location.file, text, mode)
        .map_err(|_| invalid())?
        .into_iter();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => Ok(Node::terminal(token.tag, token.text, location.clone())),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Location;

    fn loc() -> Location {
        Location::new("t.cf", 1)
    }

    fn body(parts: &[(Tag, &str)]) -> Node {
        Node::composite(
            Tag::ItemExpansion,
            loc(),
            parts
                .iter()
                .map(|(tag, text)| Node::terminal(*tag, *text, loc()))
                .collect(),
        )
    }

    fn message(parts: &[(Tag, &str)]) -> String {
        let mut node = body(parts);
        concatenate(&mut node, LexMode::Extended).unwrap_err().message
    }

    #[test]
    fn test_identifiers_and_numbers() {
        let mut node = body(&[
            (Tag::Identifier, "foo"),
            (Tag::Whitespace, " "),
            (Tag::Concat, "##"),
            (Tag::Whitespace, " "),
            (Tag::Identifier, "bar"),
            (Tag::Whitespace, " "),
            (Tag::IntLiteral, "1"),
            (Tag::Concat, "##"),
            (Tag::IntLiteral, "2"),
        ]);
        assert_eq!(concatenate(&mut node, LexMode::Extended).unwrap(), 2);
        assert_eq!(node.text_content(), "foobar 12");
        assert_eq!(node.tag_at(0), Some(Tag::Identifier));
        assert_eq!(node.tag_at(2), Some(Tag::IntLiteral));
    }

    #[test]
    fn test_pasted_keyword_keeps_its_keyword_tag() {
        let mut node = body(&[
            (Tag::Identifier, "whi"),
            (Tag::Concat, "##"),
            (Tag::Identifier, "le"),
            (Tag::Whitespace, " "),
            (Tag::Identifier, "obj"),
            (Tag::Concat, "##"),
            (Tag::Identifier, "ect"),
        ]);
        concatenate(&mut node, LexMode::Extended).unwrap();
        assert_eq!(node.tag_at(0), Some(Tag::While));
        assert_eq!(node.tag_at(2), Some(Tag::Object));

        let mut plain = body(&[
            (Tag::Identifier, "obj"),
            (Tag::Concat, "##"),
            (Tag::Identifier, "ect"),
        ]);
        concatenate(&mut plain, LexMode::Plain).unwrap();
        assert_eq!(plain.tag_at(0), Some(Tag::Identifier));
    }

    #[test]
    fn test_chain() {
        let mut node = body(&[
            (Tag::Identifier, "a"),
            (Tag::Concat, "##"),
            (Tag::Identifier, "b"),
            (Tag::Concat, "##"),
            (Tag::IntLiteral, "3"),
        ]);
        concatenate(&mut node, LexMode::Extended).unwrap();
        assert_eq!(node.text_content(), "ab3");
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_argument_operand_is_unwrapped() {
        let argument = Node::composite(
            Tag::Argument,
            loc(),
            vec![Node::terminal(Tag::Identifier, "x", loc())],
        );
        let mut node = Node::composite(
            Tag::ExpressionExpansion,
            loc(),
            vec![
                Node::terminal(Tag::Identifier, "get_", loc()),
                Node::terminal(Tag::Concat, "##", loc()),
                argument,
            ],
        );
        concatenate(&mut node, LexMode::Extended).unwrap();
        assert_eq!(node.text_content(), "get_x");
        assert!(crate::tree::check_ownership(&node).is_ok());
    }

    #[test]
    fn test_boundaries() {
        assert_eq!(
            message(&[(Tag::Concat, "##"), (Tag::Identifier, "a")]),
            "`##` at the start of a macro body"
        );
        assert_eq!(
            message(&[(Tag::Identifier, "a"), (Tag::Whitespace, " "), (Tag::Concat, "##")]),
            "`##` at the end of a macro body"
        );
        assert_eq!(
            message(&[(Tag::Identifier, "a"), (Tag::Concat, "##"), (Tag::Newline, "\n")]),
            "`##` cannot join whitespace"
        );
    }

    #[test]
    fn test_result_must_be_one_token() {
        assert_eq!(
            message(&[(Tag::Plus, "+"), (Tag::Concat, "##"), (Tag::Minus, "-")]),
            "`##` produced `+-`, which is not a single token"
        );
    }
}
