//! Preprocessor lines
//!
//!     Directive lines pass through to the output untouched. The only check made here is that
//!     `#include` names a file, either `"quoted"` or `<angled>`.

use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::passes::{allow_anything, Context};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

pub static PREPROCESSOR: Context = Context {
    name: "preprocessor",
    pre_parse: Some(check_include),
    passes: &[],
    allow: allow_anything,
    post_parse: None,
    recurse: false,
};

/// The directive word with the `#` and any blanks removed: `# include` is `include`.
pub fn directive_name(line: &Node) -> Option<String> {
    let directive = line.children().iter().find(|c| c.tag() == Tag::Directive)?;
    let text = directive.text()?;
    Some(text.trim_start_matches('#').trim().to_string())
}

fn check_include(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    if directive_name(node).as_deref() != Some("include") {
        return Ok(());
    }
    let operands: Vec<Tag> = node
        .significant()
        .map(Node::tag)
        .skip_while(|tag| *tag != Tag::Directive)
        .skip(1)
        .collect();
    let names_file = match operands.first() {
        Some(Tag::StringLiteral) => true,
        Some(Tag::Less) => operands.contains(&Tag::Greater),
        _ => false,
    };
    if names_file {
        return Ok(());
    }
    Err(FoldError::parse(
        node.location().clone(),
        "`#include` expects \"file\" or <file>",
    ))
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;

    #[test]
    fn test_include_forms() {
        let (session, root) =
            parse_source("#include <stdio.h>\n# include \"local.h\"\n#define N 4\nint x;\n");
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let lines = root
            .children()
            .iter()
            .filter(|c| c.tag() == Tag::Preprocessor)
            .count();
        assert_eq!(lines, 3);
    }

    #[test]
    fn test_include_without_file() {
        let (session, _) = parse_source("#include stdio\nint x;\n");
        let messages: Vec<String> = session.diagnostics.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec!["t.cf:1: parse error: `#include` expects \"file\" or <file>"]
        );
    }
}
