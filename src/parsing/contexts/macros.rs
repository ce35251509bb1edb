//! Macro definitions and call sites
//!
//!     macro NAME(a, b) { body }       MacroDef: keyword, name, MacroParams, MacroBody
//!     @NAME(x, y)                     MacroCall, in expression position
//!     expand NAME(x, y);              ExpandCall, in item, member and statement position
//!
//!     A macro body is kept exactly as structuring left it. It is never parsed in place: each
//!     expansion parses its own copy in the context of the call site.

use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::passes::{
    allow_anything, recognize, retag_next, scan_heads, split_group, Context, Pass,
};
use crate::lexing::LexMode;
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;
use std::collections::HashSet;

pub fn definitions(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Macro], |session, node, at| {
        recognize(session, node, at, Tag::MacroDef, |frames, node| {
            node.expect(frames, Tag::Macro)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Parens)?;
            node.expect(frames, Tag::Braces)?;
            Ok(())
        })
    })
}

pub fn expand_calls(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Expand], |session, node, at| {
        recognize(session, node, at, Tag::ExpandCall, |frames, node| {
            node.expect(frames, Tag::Expand)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Parens)?;
            node.expect(frames, Tag::Semicolon)?;
            Ok(())
        })
    })
}

pub fn macro_calls(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    if session.mode != LexMode::Extended {
        return Ok(());
    }
    scan_heads(session, node, &[Tag::At], |session, node, at| {
        recognize(session, node, at, Tag::MacroCall, |frames, node| {
            node.expect(frames, Tag::At)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Parens)?;
            Ok(())
        })
    })
}

pub static MACRO_DEF: Context = Context {
    name: "macro definition",
    pre_parse: None,
    passes: &[Pass::new("signature", signature)],
    allow: |tag| {
        matches!(
            tag,
            Tag::Macro | Tag::Identifier | Tag::MacroParams | Tag::MacroBody
        )
    },
    post_parse: None,
    recurse: true,
};

fn signature(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Parens, Tag::MacroParams)?;
    retag_next(node, Tag::Braces, Tag::MacroBody)?;
    Ok(())
}

pub static MACRO_PARAMS: Context = Context {
    name: "macro parameters",
    pre_parse: None,
    passes: &[Pass::new("parameters", parameters)],
    allow: |tag| {
        matches!(
            tag,
            Tag::Identifier | Tag::Comma | Tag::LParen | Tag::RParen
        )
    },
    post_parse: Some(duplicate_parameters),
    recurse: true,
};

fn parameters(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let frames = &session.frames;
    node.expect(frames, Tag::LParen)?;
    if node.accept(Tag::RParen).is_some() {
        return node.check_none(frames);
    }
    loop {
        node.expect(frames, Tag::Identifier)?;
        let (_, tag) = node.check_or(frames, &[Tag::Comma, Tag::RParen])?;
        if tag == Tag::RParen {
            return node.check_none(frames);
        }
    }
}

fn duplicate_parameters(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut seen = HashSet::new();
    for param in node.significant().filter(|c| c.tag() == Tag::Identifier) {
        let name = param.text().unwrap_or_default();
        if !seen.insert(name) {
            session.report(FoldError::parse(
                param.location().clone(),
                format!("duplicate macro parameter `{}`", name),
            ));
        }
    }
    Ok(())
}

pub static MACRO_BODY: Context = Context {
    name: "macro body",
    pre_parse: None,
    passes: &[],
    allow: allow_anything,
    post_parse: None,
    recurse: false,
};

pub static CALL: Context = Context {
    name: "macro call",
    pre_parse: None,
    passes: &[Pass::new("arguments", arguments)],
    allow: |tag| {
        matches!(
            tag,
            Tag::At | Tag::Expand | Tag::Identifier | Tag::Arguments | Tag::Semicolon
        )
    },
    post_parse: None,
    recurse: true,
};

fn arguments(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Parens, Tag::Arguments).map(|_| ())
}

pub static ARGUMENTS: Context = Context {
    name: "arguments",
    pre_parse: None,
    passes: &[Pass::new("split", split_arguments)],
    allow: |tag| matches!(tag, Tag::Argument | Tag::Comma | Tag::LParen | Tag::RParen),
    post_parse: None,
    recurse: true,
};

fn split_arguments(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    split_group(session, node, Tag::Comma, Tag::Argument, false).map(|_| ())
}
