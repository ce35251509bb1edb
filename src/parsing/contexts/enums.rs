//! Enumerations
//!
//!     enum Color { RED, GREEN = 2, BLUE, }
//!
//!     A trailing comma is accepted. Enumerator values are expressions.

use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::passes::{match_at, retag_next, split_group, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;
use std::collections::HashSet;

/// Fold `enum Name {...}` and `enum {...}`. A bare `enum Name` is a type use and stays put.
pub fn enums(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < node.len() {
        if node.tag_at(index) == Some(Tag::Enum) {
            let end = match_at(node, index, &[&[Tag::Enum], &[Tag::Identifier], &[Tag::Braces]])
                .or_else(|| match_at(node, index, &[&[Tag::Enum], &[Tag::Braces]]));
            if let Some(end) = end {
                node.wrap_range(index..end, Tag::EnumDef)?;
            }
        }
        index += 1;
    }
    Ok(())
}

pub static ENUM: Context = Context {
    name: "enum",
    pre_parse: None,
    passes: &[Pass::new("body", body)],
    allow: |tag| matches!(tag, Tag::Enum | Tag::Identifier | Tag::EnumBody),
    post_parse: None,
    recurse: true,
};

fn body(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Braces, Tag::EnumBody).map(|_| ())
}

pub static ENUM_BODY: Context = Context {
    name: "enum body",
    pre_parse: None,
    passes: &[Pass::new("enumerators", enumerators)],
    allow: |tag| matches!(tag, Tag::Enumerator | Tag::Comma | Tag::LBrace | Tag::RBrace),
    post_parse: Some(duplicate_enumerators),
    recurse: true,
};

fn enumerators(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    split_group(session, node, Tag::Comma, Tag::Enumerator, true).map(|_| ())
}

fn duplicate_enumerators(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut seen = HashSet::new();
    for enumerator in node.children().iter().filter(|c| c.tag() == Tag::Enumerator) {
        let Some(name) = enumerator.significant().next() else {
            continue;
        };
        let Some(text) = name.text().filter(|_| name.tag() == Tag::Identifier) else {
            continue;
        };
        if !seen.insert(text) {
            session.report(FoldError::parse(
                name.location().clone(),
                format!("duplicate enumerator `{}`", text),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;
    use crate::tree::Node;

    fn enumerators(root: &Node) -> Vec<String> {
        let mut names = Vec::new();
        root.walk(&mut |node, _| {
            if node.tag() == Tag::Enumerator {
                names.push(node.text_content());
            }
        });
        names
    }

    #[test]
    fn test_enum_with_values_and_trailing_comma() {
        let (session, root) = parse_source("enum Color { RED, GREEN = 2, BLUE, };\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        assert_eq!(enumerators(&root), vec!["RED", "GREEN = 2", "BLUE"]);
    }

    #[test]
    fn test_anonymous_enum() {
        let (session, root) = parse_source("enum { A, B } flags;\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        assert_eq!(enumerators(&root), vec!["A", "B"]);
    }

    #[test]
    fn test_duplicate_enumerator() {
        let (session, _) = parse_source("enum E { A, B, A };\n");
        let messages: Vec<&str> = session.diagnostics.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["duplicate enumerator `A`"]);
    }
}
