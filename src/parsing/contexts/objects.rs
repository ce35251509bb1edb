//! Objects and user constructs
//!
//!     object Shape : Base, Other { public: ... private: ... };
//!     widget Panel { ... }
//!
//!     A registered construct name heads a definition exactly like `object` does, and its body
//!     is parsed with the same member passes. The trailing `;` is optional for both.

use super::items::{fold_functions, fold_terminated};
use super::{enums, macros, records};
use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::passes::{match_at, recognize, scan_heads, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub fn objects(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Object], |session, node, at| {
        definition(session, node, at, Tag::Object, Tag::ObjectDef)
    })
}

/// `widget Name {` or `widget Name :`; anything else headed by a construct name (a return
/// type, a declaration) is left to the later passes.
pub fn user_constructs(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::ConstructName], |session, node, at| {
        let opens = match_at(
            node,
            at,
            &[&[Tag::ConstructName], &[Tag::Identifier], &[Tag::Colon, Tag::Braces]],
        );
        if opens.is_none() {
            return Ok(());
        }
        definition(session, node, at, Tag::ConstructName, Tag::UserConstruct)
    })
}

fn definition(
    session: &mut Session,
    node: &mut Node,
    at: usize,
    head: Tag,
    construct: Tag,
) -> FoldResult<()> {
    recognize(session, node, at, construct, |frames, node| {
        node.expect(frames, head)?;
        node.expect(frames, Tag::Identifier)?;
        if node.accept(Tag::Colon).is_some() {
            let bases = node.cursor();
            if let Some(open) = (bases..node.len())
                .find(|&i| matches!(node.tag_at(i), Some(Tag::Braces | Tag::Semicolon)))
            {
                node.set_cursor(open);
            }
        }
        node.expect(frames, Tag::Braces)?;
        node.accept(Tag::Semicolon);
        Ok(())
    })
}

pub static OBJECT: Context = Context {
    name: "object",
    pre_parse: None,
    passes: &[Pass::new("header", header)],
    allow: |tag| {
        matches!(
            tag,
            Tag::Object
                | Tag::ConstructName
                | Tag::Identifier
                | Tag::BaseList
                | Tag::ObjectBody
                | Tag::Semicolon
        )
    },
    post_parse: None,
    recurse: true,
};

fn header(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let body = |node: &Node| {
        (0..node.len()).find(|&i| matches!(node.tag_at(i), Some(Tag::Braces | Tag::ObjectBody)))
    };
    let Some(open) = body(node) else {
        node.set_cursor(node.len());
        return Err(node.expectation_error(&session.frames, &Tag::Braces.describe()));
    };
    if let Some(colon) = (0..open).find(|&i| node.tag_at(i) == Some(Tag::Colon)) {
        let last = node.prev_significant(open).unwrap_or(colon);
        if last == colon {
            return Err(FoldError::parse(
                node.children()[colon].location().clone(),
                format!("expected a base name after `:` in {}", session.frames.describe(node)),
            ));
        }
        node.wrap_range(colon..last + 1, Tag::BaseList)?;
    }
    if let Some(open) = body(node).filter(|&i| node.tag_at(i) == Some(Tag::Braces)) {
        node.transform_child(open, Tag::ObjectBody)?;
    }
    Ok(())
}

fn is_member(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::VisibilityLabel
            | Tag::ExpandCall
            | Tag::MemberExpansion
            | Tag::Function
            | Tag::Declaration
            | Tag::LBrace
            | Tag::RBrace
    )
}

static MEMBER_PASSES: &[Pass] = &[
    Pass::new("visibility labels", visibility_labels),
    Pass::new("expand calls", macros::expand_calls),
    Pass::new("enums", enums::enums),
    Pass::new("records", records::records),
    Pass::new("methods", methods),
    Pass::new("declarations", declarations),
];

fn allow_member(tag: Tag) -> bool {
    is_member(tag)
}

pub static OBJECT_BODY: Context = Context {
    name: "object body",
    pre_parse: None,
    passes: MEMBER_PASSES,
    allow: allow_member,
    post_parse: Some(visibility),
    recurse: true,
};

/// Members spliced in by an `expand` inside an object body. Labels are checked by the body
/// the expansion sits in, not here.
pub static MEMBER_EXPANSION: Context = Context {
    name: "member expansion",
    pre_parse: None,
    passes: MEMBER_PASSES,
    allow: allow_member,
    post_parse: None,
    recurse: true,
};

fn visibility_labels(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < node.len() {
        let keyword = node.tag_at(index).filter(|tag| tag.is_visibility());
        if let Some(keyword) = keyword {
            if let Some(end) = match_at(node, index, &[&[keyword], &[Tag::Colon]]) {
                node.wrap_range(index..end, Tag::VisibilityLabel)?;
            }
        }
        index += 1;
    }
    Ok(())
}

fn methods(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_functions(node, is_member)
}

fn declarations(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_terminated(session, node, is_member, Tag::Declaration)
}

/// The visibility keyword a member or label starts with, looking through a leading TypeSpec.
fn leading_visibility(member: &Node) -> Option<(Tag, &Node)> {
    let first = member.significant().next()?;
    let first = if first.tag() == Tag::TypeSpec {
        first.significant().next()?
    } else {
        first
    };
    first.tag().is_visibility().then(|| (first.tag(), first))
}

fn visibility(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut current = None;
    let mut index = 0;
    while index < node.len() {
        let Some(child) = node.child(index) else {
            break;
        };
        match child.tag() {
            Tag::VisibilityLabel => {
                current = leading_visibility(child).map(|(tag, _)| tag);
            }
            Tag::Function | Tag::Declaration | Tag::ExpandCall | Tag::MemberExpansion => {
                if current.is_none() {
                    let location = child.location().clone();
                    let mut label = Node::composite(
                        Tag::VisibilityLabel,
                        location.clone(),
                        vec![Node::terminal(Tag::Private, "", location)],
                    );
                    label.mark_parsed();
                    node.insert(index, label)?;
                    current = Some(Tag::Private);
                    index += 1;
                    continue;
                }
                if let (Some(label), Some((inline, keyword))) = (current, leading_visibility(child))
                {
                    if inline != label {
                        let error = FoldError::parse(
                            keyword.location().clone(),
                            format!(
                                "ambiguous visibility: {} member under a {} label",
                                inline.describe(),
                                label.describe()
                            ),
                        );
                        session.report(error);
                    }
                }
            }
            _ => {}
        }
        index += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::lexing::{LexMode, Lexer};
    use crate::parsing::parse_family;
    use crate::parsing::structure::structure;
    use crate::parsing::testing::parse_source;
    use crate::registry::DialectRegistry;
    use crate::session::Session;
    use crate::token::{Location, Tag};
    use crate::tree::Node;
    use std::sync::Arc;

    fn body(root: &Node) -> &Node {
        let object = root
            .children()
            .iter()
            .find(|c| matches!(c.tag(), Tag::ObjectDef | Tag::UserConstruct))
            .unwrap();
        object
            .children()
            .iter()
            .find(|c| c.tag() == Tag::ObjectBody)
            .unwrap()
    }

    fn labels(body: &Node) -> Vec<Option<Tag>> {
        body.children()
            .iter()
            .filter(|c| c.tag() == Tag::VisibilityLabel)
            .map(|c| c.significant().next().map(Node::tag))
            .collect()
    }

    #[test]
    fn test_object_with_bases_and_sections() {
        let (session, root) = parse_source(
            "object Shape : Base, Other {\npublic:\n  int area(void);\n  Shape(void) { }\nprivate:\n  int w;\n};\n",
        );
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let object = root.children().iter().find(|c| c.tag() == Tag::ObjectDef).unwrap();
        let base = object.children().iter().find(|c| c.tag() == Tag::BaseList).unwrap();
        assert_eq!(base.text_content(), ": Base, Other");
        let members: Vec<Tag> = body(&root)
            .significant()
            .map(Node::tag)
            .filter(|t| !matches!(t, Tag::LBrace | Tag::RBrace))
            .collect();
        assert_eq!(
            members,
            vec![
                Tag::VisibilityLabel,
                Tag::Declaration,
                Tag::Function,
                Tag::VisibilityLabel,
                Tag::Declaration,
            ]
        );
    }

    #[test]
    fn test_default_label_is_synthesized() {
        let (session, root) = parse_source("object Point { int x; int y; }\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let body = body(&root);
        assert_eq!(labels(body), vec![Some(Tag::Private)]);
        // the synthesized label carries no source text
        assert_eq!(body.text_content(), "{ int x; int y; }");
    }

    #[test]
    fn test_conflicting_inline_visibility() {
        let (session, _) = parse_source("object P {\nprivate:\n  public int x;\n};\n");
        let messages: Vec<String> = session.diagnostics.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec!["t.cf:3: parse error: ambiguous visibility: `public` member under a `private` label"]
        );
    }

    #[test]
    fn test_registered_construct_parses_like_an_object() {
        let registry = DialectRegistry::with_names(["widget"]);
        let source = "widget Panel { int width; }\nwidget make(void) { }\n";
        let tokens = Lexer::new(LexMode::Extended)
            .with_registry(Arc::new(registry))
            .lex("t.cf", source)
            .unwrap();
        let mut session = Session::for_file("t.cf", LexMode::Extended);
        let mut root = Node::composite(
            Tag::File,
            Location::new("t.cf", 1),
            tokens.into_iter().map(Node::from).collect(),
        );
        structure(
            &mut root,
            &mut session.diagnostics,
            session.config.parsing.max_nesting,
        )
        .unwrap();
        parse_family(&mut session, &mut root).unwrap();
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let items: Vec<Tag> = root.significant().map(Node::tag).collect();
        assert_eq!(items, vec![Tag::UserConstruct, Tag::Function]);
        assert_eq!(labels(body(&root)), vec![Some(Tag::Private)]);
    }

    #[test]
    fn test_object_without_body() {
        let (session, _) = parse_source("object Broken;\n");
        let messages: Vec<&str> = session.diagnostics.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages[0],
            "expected braced group, got `;`, in context object definition"
        );
    }
}
