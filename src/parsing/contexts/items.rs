//! File-level items
//!
//!     The top level of a source file (and of every item-position macro expansion) is a flat
//!     run of items. The keyword-headed items are recognized first; whatever is left is split
//!     into functions (a run ending in `(...) {...}`) and declarations (a run ending in `;`).

use super::{enums, macros, objects, records, states};
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{next_item, prev_tag, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub fn is_item(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::Preprocessor
            | Tag::MacroDef
            | Tag::ExpandCall
            | Tag::ObjectDef
            | Tag::UserConstruct
            | Tag::StateMachine
            | Tag::Function
            | Tag::Declaration
            | Tag::ItemExpansion
    )
}

pub static ITEMS: Context = Context {
    name: "items",
    pre_parse: None,
    passes: &[
        Pass::new("macro definitions", macros::definitions),
        Pass::new("expand calls", macros::expand_calls),
        Pass::new("objects", objects::objects),
        Pass::new("user constructs", objects::user_constructs),
        Pass::new("state machines", states::state_machines),
        Pass::new("enums", enums::enums),
        Pass::new("records", records::records),
        Pass::new("functions", functions),
        Pass::new("declarations", declarations),
    ],
    allow: is_item,
    post_parse: None,
    recurse: true,
};

fn functions(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_functions(node, is_item)
}

fn declarations(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_terminated(session, node, is_item, Tag::Declaration)
}

/// A `{...}` group that closes a function: it follows a parameter group, which follows a name.
fn is_function_body(node: &Node, index: usize) -> bool {
    let Some(params) = node.prev_significant(index) else {
        return false;
    };
    node.tag_at(params) == Some(Tag::Parens)
        && matches!(
            prev_tag(node, params),
            Some(Tag::Identifier | Tag::ConstructName)
        )
}

/// Fold every unclaimed run that ends in a function body into a `Function`.
pub fn fold_functions(node: &mut Node, is_boundary: fn(Tag) -> bool) -> FoldResult<()> {
    let mut from = 0;
    while let Some(start) = next_item(node, from, is_boundary) {
        let mut index = start;
        let mut body = None;
        while index < node.len() {
            let tag = node.children()[index].tag();
            if tag == Tag::Semicolon || tag == Tag::Assign || is_boundary(tag) {
                break;
            }
            if tag == Tag::Braces && is_function_body(node, index) {
                body = Some(index);
                break;
            }
            index += 1;
        }
        match body {
            Some(end) => {
                node.wrap_range(start..end + 1, Tag::Function)?;
                from = start + 1;
            }
            None => {
                // skip the rest of this run
                from = (index..node.len())
                    .find(|&i| {
                        let tag = node.children()[i].tag();
                        tag == Tag::Semicolon || is_boundary(tag)
                    })
                    .map(|i| i + 1)
                    .unwrap_or(node.len())
                    .max(start + 1);
            }
        }
    }
    Ok(())
}

/// Fold every unclaimed run that ends in `;` into `wrap`, semicolon included.
///
/// A run that reaches a boundary or the end without a `;` is reported and left unfolded.
pub fn fold_terminated(
    session: &mut Session,
    node: &mut Node,
    is_boundary: fn(Tag) -> bool,
    wrap: Tag,
) -> FoldResult<()> {
    let mut from = 0;
    while let Some(start) = next_item(node, from, is_boundary) {
        let stop = (start..node.len()).find(|&i| {
            let tag = node.children()[i].tag();
            tag == Tag::Semicolon || is_boundary(tag)
        });
        match stop {
            Some(semicolon) if node.tag_at(semicolon) == Some(Tag::Semicolon) => {
                node.set_cursor(start);
                let run = node.push_through(&mut session.frames, &[Tag::Semicolon], wrap)?;
                node.insert_stacked(start, run)?;
                from = start + 1;
            }
            other => {
                let stop = other.unwrap_or(node.len());
                session.frames.mark(wrap, node.id());
                node.set_cursor(stop);
                let err = node.expectation_error(&session.frames, &Tag::Semicolon.describe());
                session.frames.unmark();
                session.report(err);
                from = stop.max(start + 1);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;

    #[test]
    fn test_item_kinds() {
        let (session, root) = parse_source(
            "int x;\nvoid f(void) { }\nstruct P { int a; } p;\nobject O { };\n",
        );
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let tags: Vec<Tag> = root.significant().map(|c| c.tag()).collect();
        assert_eq!(
            tags,
            vec![Tag::Declaration, Tag::Function, Tag::Declaration, Tag::ObjectDef]
        );
    }

    #[test]
    fn test_missing_semicolon_is_reported_against_the_declaration() {
        let (session, _) = parse_source("int x = 1;\nint y\n");
        let messages: Vec<String> = session.diagnostics.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec!["t.cf:2: parse error: expected `;`, got end of file, in context declaration"]
        );
    }

    #[test]
    fn test_initializer_braces_are_not_a_function_body() {
        let (session, root) = parse_source("int a[] = { 1, 2 };\n");
        assert!(session.diagnostics.is_empty());
        assert_eq!(root.significant().next().map(|c| c.tag()), Some(Tag::Declaration));
    }

    #[test]
    fn test_declarations_end_at_their_semicolon() {
        let (session, root) = parse_source("int x;\nint y = 2;\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let texts: Vec<String> = root.significant().map(|c| c.text_content()).collect();
        assert_eq!(texts, vec!["int x;", "int y = 2;"]);
    }
}
