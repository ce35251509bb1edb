//! Treeviz formatter
//!
//! One line per node, two spaces of indentation per level, trivia left out:
//!
//!     <indentation><icon> <label>
//!
//! A composite's label is its tag's name, followed by the first identifier among its own
//! children when it has one. A terminal's label is its text. Labels are cut at 30 characters.
//!
//!     ⧉ file
//!       ƒ function definition main
//!         ○ type specification
//!           ◦ int
//!         ◦ main
//!         ...
//!
//! Icons
//!     ⧉ file          # preprocessor line     𝑀 macro definition
//!     @ call site     ⟳ macro expansion       ◆ object or user construct
//!     ƒ function      ≔ declaration-like      ▤ body or block
//!     ▸ statement     ◦ terminal              ○ anything else

use crate::formats::registry::{FormatError, Formatter};
use crate::token::Tag;
use crate::tree::Node;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn icon(tag: Tag) -> &'static str {
    match tag {
        Tag::File | Tag::DialectFile => "⧉",
        Tag::Preprocessor => "#",
        Tag::MacroDef => "𝑀",
        Tag::MacroCall | Tag::ExpandCall => "@",
        Tag::ObjectDef | Tag::UserConstruct | Tag::StateMachine => "◆",
        Tag::Function => "ƒ",
        Tag::Declaration | Tag::Param | Tag::Enumerator | Tag::Entry => "≔",
        Tag::Body
        | Tag::Block
        | Tag::ObjectBody
        | Tag::RecordBody
        | Tag::EnumBody
        | Tag::StateBody
        | Tag::DialectBody => "▤",
        Tag::Statement
        | Tag::IfStatement
        | Tag::WhileStatement
        | Tag::ForStatement
        | Tag::DoWhileStatement
        | Tag::SwitchStatement
        | Tag::Jump
        | Tag::Label
        | Tag::CaseLabel => "▸",
        tag if tag.is_expansion() => "⟳",
        tag if tag.is_lexical() => "◦",
        _ => "○",
    }
}

fn label(node: &Node) -> String {
    if let Some(text) = node.text() {
        return truncate(text, 30);
    }
    let name = node
        .children()
        .iter()
        .find(|c| c.tag() == Tag::Identifier)
        .and_then(Node::text);
    match name {
        Some(name) => truncate(&format!("{} {}", node.tag().label(), name), 30),
        None => node.tag().label().to_string(),
    }
}

fn format_node(node: &Node, depth: usize, output: &mut String) {
    output.push_str(&format!(
        "{}{} {}\n",
        "  ".repeat(depth),
        icon(node.tag()),
        label(node)
    ));
    for child in node.children().iter().filter(|c| !c.is_trivia()) {
        format_node(child, depth + 1, output);
    }
}

pub fn to_treeviz_str(root: &Node) -> String {
    let mut output = String::new();
    format_node(root, 0, &mut output);
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, root: &Node) -> Result<String, FormatError> {
        Ok(to_treeviz_str(root))
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }
}
