//! Structs and unions
//!
//!     struct Point { int x; int y; }
//!     union { int i; float f; } value;
//!
//!     Only a definition with a body becomes a Record; `struct Point p;` is a plain type use.

use super::enums;
use super::items::fold_terminated;
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{match_at, retag_next, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub fn records(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    const KEYWORDS: &[Tag] = &[Tag::Struct, Tag::Union];
    let mut index = 0;
    while index < node.len() {
        if node.tag_at(index).map_or(false, |tag| KEYWORDS.contains(&tag)) {
            let end = match_at(node, index, &[KEYWORDS, &[Tag::Identifier], &[Tag::Braces]])
                .or_else(|| match_at(node, index, &[KEYWORDS, &[Tag::Braces]]));
            if let Some(end) = end {
                node.wrap_range(index..end, Tag::Record)?;
            }
        }
        index += 1;
    }
    Ok(())
}

pub static RECORD: Context = Context {
    name: "record",
    pre_parse: None,
    passes: &[Pass::new("body", body)],
    allow: |tag| matches!(tag, Tag::Struct | Tag::Union | Tag::Identifier | Tag::RecordBody),
    post_parse: None,
    recurse: true,
};

fn body(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Braces, Tag::RecordBody).map(|_| ())
}

fn is_field(tag: Tag) -> bool {
    matches!(tag, Tag::Declaration | Tag::LBrace | Tag::RBrace)
}

pub static RECORD_BODY: Context = Context {
    name: "record body",
    pre_parse: None,
    passes: &[
        Pass::new("records", records),
        Pass::new("enums", enums::enums),
        Pass::new("fields", fields),
    ],
    allow: is_field,
    post_parse: None,
    recurse: true,
};

fn fields(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_terminated(session, node, is_field, Tag::Declaration)
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;
    use crate::tree::Node;

    #[test]
    fn test_nested_record_and_bit_fields() {
        let (session, root) = parse_source(
            "struct Packet {\n  unsigned kind : 3;\n  union { int i; float f; } value;\n};\n",
        );
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let mut records = 0;
        let mut fields = Vec::new();
        root.walk(&mut |node, _| match node.tag() {
            Tag::Record => records += 1,
            Tag::RecordBody => fields.push(
                node.children()
                    .iter()
                    .filter(|c| c.tag() == Tag::Declaration)
                    .count(),
            ),
            _ => {}
        });
        assert_eq!(records, 2);
        assert_eq!(fields, vec![2, 2]);
    }

    #[test]
    fn test_plain_struct_type_use() {
        let (session, root) = parse_source("struct Point p;\n");
        assert!(session.diagnostics.is_empty());
        let decl = root.significant().next().unwrap();
        let tags: Vec<Tag> = decl.significant().map(Node::tag).collect();
        assert_eq!(
            tags,
            vec![Tag::Struct, Tag::Identifier, Tag::Identifier, Tag::Semicolon]
        );
    }

    #[test]
    fn test_missing_field_terminator() {
        let (session, _) = parse_source("struct S { int a; int b };\n");
        let messages: Vec<&str> = session.diagnostics.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["expected `;`, got `}`, in context declaration"]
        );
    }
}
