//! Functions and parameters
//!
//!     A function is `TypeSpec? name ParamList Body`, found from the right: the last group is
//!     the body, the group before it the parameters, the word before that the name, and
//!     whatever precedes the name is the return type.

use super::types;
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{split_group, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub static FUNCTION: Context = Context {
    name: "function",
    pre_parse: None,
    passes: &[
        Pass::new("scopes", types::scopes),
        Pass::new("templates", types::templates),
        Pass::new("bare angles", types::bare_angles),
        Pass::new("pointers", types::pointers),
        Pass::new("signature", signature),
    ],
    allow: |tag| {
        matches!(
            tag,
            Tag::TypeSpec
                | Tag::Identifier
                | Tag::ConstructName
                | Tag::ScopeRef
                | Tag::Tilde
                | Tag::ParamList
                | Tag::Body
        )
    },
    post_parse: None,
    recurse: true,
};

fn signature(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let Some(body) = (0..node.len())
        .rev()
        .find(|&i| matches!(node.tag_at(i), Some(Tag::Braces | Tag::Body)))
    else {
        node.set_cursor(node.len());
        return Err(node.expectation_error(&session.frames, "function body"));
    };
    if node.tag_at(body) == Some(Tag::Body) {
        return Ok(());
    }
    node.transform_child(body, Tag::Body)?;

    let params = node.prev_significant(body);
    match params.and_then(|i| node.tag_at(i)) {
        Some(Tag::Parens) => {}
        _ => {
            node.set_cursor(params.unwrap_or(0));
            return Err(node.expectation_error(&session.frames, "parameter list"));
        }
    }
    let params = params.unwrap_or(0);
    node.transform_child(params, Tag::ParamList)?;

    let Some(name) = node.prev_significant(params) else {
        node.set_cursor(0);
        return Err(node.expectation_error(&session.frames, "function name"));
    };
    let type_end = match node.prev_significant(name) {
        Some(tilde) if node.tag_at(tilde) == Some(Tag::Tilde) => tilde,
        _ => name,
    };
    wrap_type(node, 0, type_end)
}

/// Wrap the significant children in `start..end` as a TypeSpec, trimmed of trivia.
fn wrap_type(node: &mut Node, start: usize, end: usize) -> FoldResult<()> {
    let Some(first) = node.next_significant(start).filter(|&i| i < end) else {
        return Ok(());
    };
    if node.tag_at(first) == Some(Tag::TypeSpec) {
        return Ok(());
    }
    let last = node.prev_significant(end).unwrap_or(first);
    node.wrap_range(first..last + 1, Tag::TypeSpec)
}

pub static PARAM_LIST: Context = Context {
    name: "parameter list",
    pre_parse: None,
    passes: &[Pass::new("parameters", parameters)],
    allow: |tag| matches!(tag, Tag::Param | Tag::Comma | Tag::LParen | Tag::RParen),
    post_parse: None,
    recurse: true,
};

fn parameters(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    split_group(session, node, Tag::Comma, Tag::Param, false).map(|_| ())
}

pub static PARAM: Context = Context {
    name: "parameter",
    pre_parse: None,
    passes: &[
        Pass::new("scopes", types::scopes),
        Pass::new("templates", types::templates),
        Pass::new("bare angles", types::bare_angles),
        Pass::new("pointers", types::pointers),
        Pass::new("default value", default_value),
        Pass::new("type and name", type_and_name),
    ],
    allow: |tag| {
        matches!(
            tag,
            Tag::TypeSpec
                | Tag::Identifier
                | Tag::Brackets
                | Tag::Parens
                | Tag::Initializer
                | Tag::Ellipsis
        )
    },
    post_parse: None,
    recurse: true,
};

fn default_value(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let Some(assign) = (0..node.len()).find(|&i| node.tag_at(i) == Some(Tag::Assign)) else {
        return Ok(());
    };
    node.set_cursor(assign);
    let value = node.push_until(&[], Tag::Initializer);
    node.insert_stacked(assign, value)
}

fn type_and_name(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let end = (0..node.len())
        .find(|&i| node.tag_at(i) == Some(Tag::Initializer))
        .unwrap_or(node.len());
    // step back over array dimensions
    let mut last = node.prev_significant(end);
    while let Some(i) = last.filter(|&i| node.tag_at(i) == Some(Tag::Brackets)) {
        last = node.prev_significant(i);
    }
    let Some(last) = last else {
        return Ok(());
    };
    match node.tag_at(last) {
        Some(Tag::Ellipsis | Tag::TypeSpec) => Ok(()),
        Some(Tag::Identifier) if node.prev_significant(last).is_some() => {
            if node.tag_at(0) == Some(Tag::TypeSpec) {
                return Ok(());
            }
            // the name is the last bare identifier; everything before it is the type
            node.reset_cursor();
            let ty = node.reverse_expect(&mut session.frames, &[Tag::Identifier], Tag::TypeSpec)?;
            node.insert_stacked(0, ty)
        }
        _ => wrap_type(node, 0, last + 1),
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;
    use crate::tree::Node;

    fn function(root: &Node) -> &Node {
        root.children()
            .iter()
            .find(|c| c.tag() == Tag::Function)
            .unwrap()
    }

    #[test]
    fn test_signature_parts() {
        let (session, root) = parse_source("static unsigned long count(const char *s, int n) { }\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let f = function(&root);
        let tags: Vec<Tag> = f.significant().map(Node::tag).collect();
        assert_eq!(
            tags,
            vec![Tag::TypeSpec, Tag::Identifier, Tag::ParamList, Tag::Body]
        );
        let params: Vec<String> = f
            .child(f.len() - 3)
            .unwrap()
            .children()
            .iter()
            .filter(|c| c.tag() == Tag::Param)
            .map(|p| p.text_content())
            .collect();
        assert_eq!(params, vec!["const char *s", "int n"]);
    }

    #[test]
    fn test_param_type_and_name() {
        let (_, root) = parse_source("void f(int values[4], char *name, void) { }\n");
        let f = function(&root);
        let list = f.children().iter().find(|c| c.tag() == Tag::ParamList).unwrap();
        let shapes: Vec<Vec<Tag>> = list
            .children()
            .iter()
            .filter(|c| c.tag() == Tag::Param)
            .map(|p| p.significant().map(Node::tag).collect())
            .collect();
        assert_eq!(
            shapes,
            vec![
                vec![Tag::TypeSpec, Tag::Identifier, Tag::Brackets],
                vec![Tag::TypeSpec, Tag::Identifier],
                vec![Tag::TypeSpec],
            ]
        );
    }

    #[test]
    fn test_scoped_method_definition() {
        let (session, root) = parse_source("int Shape::area(void) { return 0; }\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let f = function(&root);
        assert!(f.children().iter().any(|c| c.tag() == Tag::ScopeRef));
    }

    #[test]
    fn test_param_default_value_and_type() {
        let (session, root) = parse_source("void f(unsigned long n = 4, Point at) { }\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let f = function(&root);
        let list = f.children().iter().find(|c| c.tag() == Tag::ParamList).unwrap();
        let params: Vec<&Node> = list.children().iter().filter(|c| c.tag() == Tag::Param).collect();
        let tags: Vec<Tag> = params[0].significant().map(Node::tag).collect();
        assert_eq!(tags, vec![Tag::TypeSpec, Tag::Identifier, Tag::Initializer]);
        let texts: Vec<String> = params[0]
            .significant()
            .map(|c| c.text_content().trim().to_string())
            .collect();
        assert_eq!(texts, vec!["unsigned long", "n", "= 4"]);
        let tags: Vec<Tag> = params[1].significant().map(Node::tag).collect();
        assert_eq!(tags, vec![Tag::TypeSpec, Tag::Identifier]);
        assert_eq!(params[1].child(0).unwrap().text_content().trim(), "Point");
    }
}
