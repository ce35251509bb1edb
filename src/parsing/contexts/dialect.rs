//! Dialect files
//!
//!     construct widget;
//!     note Layout { columns = 2; }
//!     map Panel => Frame { title = name; }
//!     %%
//!
//!     A dialect file declares construct kinds (which feed the construct registry used to lex
//!     source files), notes and maps. Everything else at the top level is a declaration.
//!     Note and map entries are kept as flat `Entry` nodes for the code generator to read.

use super::items::fold_terminated;
use crate::diagnostics::FoldResult;
use crate::parsing::passes::{recognize, retag_next, scan_heads, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

fn is_dialect_item(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::Preprocessor
            | Tag::ConstructDecl
            | Tag::NoteDef
            | Tag::MapDef
            | Tag::SectionBreak
            | Tag::Declaration
    )
}

pub static DIALECT_ITEMS: Context = Context {
    name: "dialect items",
    pre_parse: None,
    passes: &[
        Pass::new("construct declarations", construct_declarations),
        Pass::new("notes", notes),
        Pass::new("maps", maps),
        Pass::new("declarations", declarations),
    ],
    allow: is_dialect_item,
    post_parse: None,
    recurse: true,
};

fn construct_declarations(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Construct], |session, node, at| {
        recognize(session, node, at, Tag::ConstructDecl, |frames, node| {
            node.expect(frames, Tag::Construct)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Semicolon)?;
            Ok(())
        })
    })
}

fn notes(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Note], |session, node, at| {
        recognize(session, node, at, Tag::NoteDef, |frames, node| {
            node.expect(frames, Tag::Note)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Braces)?;
            Ok(())
        })
    })
}

fn maps(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Map], |session, node, at| {
        recognize(session, node, at, Tag::MapDef, |frames, node| {
            node.expect(frames, Tag::Map)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::FatArrow)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Braces)?;
            Ok(())
        })
    })
}

fn declarations(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_terminated(session, node, is_dialect_item, Tag::Declaration)
}

pub static DIALECT_SECTION: Context = Context {
    name: "dialect section",
    pre_parse: None,
    passes: &[Pass::new("body", section_body)],
    allow: |tag| {
        matches!(
            tag,
            Tag::Note | Tag::Map | Tag::Identifier | Tag::FatArrow | Tag::DialectBody
        )
    },
    post_parse: None,
    recurse: true,
};

fn section_body(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Braces, Tag::DialectBody).map(|_| ())
}

fn is_entry(tag: Tag) -> bool {
    matches!(tag, Tag::Entry | Tag::LBrace | Tag::RBrace)
}

pub static DIALECT_BODY: Context = Context {
    name: "dialect body",
    pre_parse: None,
    passes: &[Pass::new("entries", entries)],
    allow: is_entry,
    post_parse: None,
    recurse: true,
};

fn entries(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    fold_terminated(session, node, is_entry, Tag::Entry)
}
