//! Declarations
//!
//!     `static const char *names[4] = { ... }, *other;`
//!
//!     The type region (everything before the first `=`) gets the type passes; parameter
//!     groups after a name become prototypes; every `= ...` up to the next top-level `,` or
//!     `;` becomes an Initializer, which is parsed as an expression.

use super::{is_type_part, macros, types};
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{prev_tag, type_region_end, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub static DECLARATION: Context = Context {
    name: "declaration",
    pre_parse: None,
    passes: &[
        Pass::new("macro calls", macros::macro_calls),
        Pass::new("scopes", types::scopes),
        Pass::new("templates", types::templates),
        Pass::new("bare angles", types::bare_angles),
        Pass::new("pointers", types::pointers),
        Pass::new("prototypes", prototypes),
        Pass::new("initializers", initializers),
    ],
    allow: |tag| {
        is_type_part(tag)
            || matches!(
                tag,
                Tag::ParamList
                    | Tag::Parens
                    | Tag::Brackets
                    | Tag::Initializer
                    | Tag::Comma
                    | Tag::Semicolon
                    | Tag::Colon
                    | Tag::IntLiteral
                    | Tag::MacroCall
                    | Tag::ExpressionExpansion
                    | Tag::Dialect
            )
    },
    post_parse: Some(types::duplicate_modifiers),
    recurse: true,
};

/// A parameter group opens right after a declared name, unless it is the `(*name)` of a
/// function pointer.
fn prototypes(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let limit = type_region_end(node);
    for index in 0..limit {
        let Some(group) = node.child(index) else {
            break;
        };
        if group.tag() != Tag::Parens {
            continue;
        }
        let inner = group.next_significant(1).and_then(|i| group.tag_at(i));
        let declarator = matches!(inner, Some(Tag::Star | Tag::Caret));
        let after_name = matches!(
            prev_tag(node, index),
            Some(Tag::Identifier | Tag::ScopeRef | Tag::Parens)
        );
        if after_name && !declarator {
            node.transform_child(index, Tag::ParamList)?;
        }
    }
    Ok(())
}

fn initializers(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < node.len() {
        if node.tag_at(index) == Some(Tag::Assign) {
            let stop = (index + 1..node.len())
                .find(|&i| matches!(node.tag_at(i), Some(Tag::Comma | Tag::Semicolon)))
                .unwrap_or(node.len());
            let last = node.prev_significant(stop).unwrap_or(index);
            node.wrap_range(index..last + 1, Tag::Initializer)?;
        }
        index += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;
    use crate::tree::Node;

    fn shape(source: &str) -> Vec<Tag> {
        let (session, root) = parse_source(source);
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let decl = root
            .children()
            .iter()
            .find(|c| c.tag() == Tag::Declaration)
            .unwrap();
        decl.significant().map(Node::tag).collect()
    }

    #[test]
    fn test_initializers_split_at_commas() {
        assert_eq!(
            shape("int a = 1, b = f(2, 3);\n"),
            vec![
                Tag::Int,
                Tag::Identifier,
                Tag::Initializer,
                Tag::Comma,
                Tag::Identifier,
                Tag::Initializer,
                Tag::Semicolon,
            ]
        );
    }

    #[test]
    fn test_prototype() {
        assert_eq!(
            shape("extern int open(const char *path, int flags);\n"),
            vec![
                Tag::Extern,
                Tag::Int,
                Tag::Identifier,
                Tag::ParamList,
                Tag::Semicolon,
            ]
        );
    }

    #[test]
    fn test_function_pointer() {
        assert_eq!(
            shape("int (*handler)(int);\n"),
            vec![Tag::Int, Tag::Parens, Tag::ParamList, Tag::Semicolon]
        );
    }

    #[test]
    fn test_array_with_braced_initializer() {
        assert_eq!(
            shape("static const char *names[2] = { \"a\", \"b\" };\n"),
            vec![
                Tag::Static,
                Tag::Const,
                Tag::Char,
                Tag::PointerType,
                Tag::Identifier,
                Tag::Brackets,
                Tag::Initializer,
                Tag::Semicolon,
            ]
        );
    }
}
