//! Expressions
//!
//!     Expressions are not given an operator tree. Their groups are folded into the nodes the
//!     rest of the pipeline cares about (calls, macro calls, scoped names) and the operators stay
//!     flat between them.

use super::{macros, types};
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub static EXPRESSION: Context = Context {
    name: "expression",
    pre_parse: None,
    passes: &[
        Pass::new("macro calls", macros::macro_calls),
        Pass::new("scopes", types::scopes),
        Pass::new("calls", calls),
        Pass::new("groups", groups),
        Pass::new("indexes", indexes),
        Pass::new("init lists", init_lists),
    ],
    allow: allow_expression,
    post_parse: None,
    recurse: true,
};

fn allow_expression(tag: Tag) -> bool {
    if tag.is_lexical() {
        return !matches!(
            tag,
            Tag::Directive | Tag::SectionBreak | Tag::Unknown | Tag::Hash | Tag::At | Tag::Concat
        );
    }
    matches!(
        tag,
        Tag::MacroCall
            | Tag::Call
            | Tag::ScopeRef
            | Tag::TemplateRef
            | Tag::Group
            | Tag::Index
            | Tag::InitList
            | Tag::ExpressionExpansion
    )
}

fn is_callee(tag: Tag) -> bool {
    matches!(tag, Tag::Identifier | Tag::ScopeRef | Tag::Call)
}

/// `f(...)`, `ns::f(...)` and chained `f(...)(...)`.
fn calls(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < node.len() {
        let callee = node.tag_at(index).map_or(false, is_callee);
        let arguments = node.next_significant(index + 1).unwrap_or(index + 1);
        if callee && node.tag_at(arguments) == Some(Tag::Parens) {
            node.transform_child(arguments, Tag::Arguments)?;
            node.wrap_range(index..arguments + 1, Tag::Call)?;
            // look again at the same index for a chained call
            continue;
        }
        index += 1;
    }
    Ok(())
}

fn retag_all(node: &mut Node, from: Tag, to: Tag) -> FoldResult<()> {
    for index in 0..node.len() {
        if node.tag_at(index) == Some(from) {
            node.transform_child(index, to)?;
        }
    }
    Ok(())
}

fn groups(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_all(node, Tag::Parens, Tag::Group)
}

fn indexes(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_all(node, Tag::Brackets, Tag::Index)
}

fn init_lists(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_all(node, Tag::Braces, Tag::InitList)
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;
    use crate::tree::Node;

    fn statement(source: &str) -> Node {
        let (session, root) = parse_source(&format!("void f(void) {{ {} }}\n", source));
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let mut found = None;
        root.walk(&mut |node, _| {
            if found.is_none() && node.tag() == Tag::Statement {
                found = Some(node.deep_clone());
            }
        });
        found.unwrap()
    }

    fn shape(node: &Node) -> Vec<Tag> {
        node.significant().map(Node::tag).collect()
    }

    #[test]
    fn test_call_chain() {
        let s = statement("make(1)(2);");
        assert_eq!(shape(&s), vec![Tag::Call, Tag::Semicolon]);
        let outer = s.child(0).unwrap();
        assert_eq!(shape(outer), vec![Tag::Call, Tag::Arguments]);
    }

    #[test]
    fn test_groups_indexes_and_scoped_calls() {
        let s = statement("x = (a + b) * v[2] + ns::g(1);");
        assert_eq!(
            shape(&s),
            vec![
                Tag::Identifier,
                Tag::Assign,
                Tag::Group,
                Tag::Star,
                Tag::Identifier,
                Tag::Index,
                Tag::Plus,
                Tag::Call,
                Tag::Semicolon,
            ]
        );
    }

    #[test]
    fn test_call_arguments_are_expressions() {
        let s = statement("f(g(1), (2));");
        let mut tags = Vec::new();
        s.walk(&mut |node, _| {
            if matches!(node.tag(), Tag::Argument | Tag::Call | Tag::Group) {
                tags.push(node.tag());
            }
        });
        assert_eq!(
            tags,
            vec![Tag::Call, Tag::Argument, Tag::Call, Tag::Argument, Tag::Argument, Tag::Group]
        );
    }

    #[test]
    fn test_stray_at_sign() {
        let (session, _) = parse_source("void f(void) { x = @; }\n");
        let messages: Vec<&str> = session.diagnostics.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages[0], "expected identifier, got `;`, in context macro call");
    }
}
