//! Type positions
//!
//!     Passes that recognize the parts of a type, in the order they must run:
//!
//!         scopes          `a::b::c` and `::c` into ScopeRef
//!         templates       `name<...>` into TemplateRef, splitting `>>` where it closes two
//!                         levels
//!         bare angles     any `<` or `>` still left in a type region is an error
//!         pointers        runs of `*`, `&` and their qualifiers into PointerType
//!
//!     A type region is the part of a node before its first `=`; initializers are expressions
//!     and are left alone.

use super::is_type_part;
use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::passes::{prev_tag, type_region_end, Context};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;
use std::collections::HashSet;

pub fn scopes(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < node.len() {
        let tag = node.tag_at(index);
        let starts = match tag {
            Some(Tag::Identifier) => true,
            Some(Tag::Scope) => !matches!(
                prev_tag(node, index),
                Some(Tag::Identifier | Tag::ScopeRef | Tag::TemplateRef)
            ),
            _ => false,
        };
        if starts {
            let mut end = if tag == Some(Tag::Identifier) {
                index + 1
            } else {
                index
            };
            let mut joined = 0;
            loop {
                let Some(scope) = node.next_significant(end) else {
                    break;
                };
                if node.tag_at(scope) != Some(Tag::Scope) {
                    break;
                }
                let Some(name) = node.next_significant(scope + 1) else {
                    break;
                };
                if node.tag_at(name) != Some(Tag::Identifier) {
                    break;
                }
                end = name + 1;
                joined += 1;
            }
            if joined > 0 {
                node.wrap_range(index..end, Tag::ScopeRef)?;
            }
        }
        index += 1;
    }
    Ok(())
}

fn is_template_argument(tag: Tag) -> bool {
    is_type_part(tag)
        || tag.is_literal()
        || matches!(
            tag,
            Tag::Comma | Tag::Star | Tag::Amp | Tag::Brackets | Tag::Parens
        )
}

/// Fold `name<...>` where `head` is the name. Returns whether a template was folded.
fn fold_template(node: &mut Node, head: usize, limit: &mut usize) -> FoldResult<bool> {
    let Some(less) = node.next_significant(head + 1) else {
        return Ok(false);
    };
    if less >= *limit || node.tag_at(less) != Some(Tag::Less) {
        return Ok(false);
    }
    let mut index = less + 1;
    while index < *limit {
        let Some(child) = node.child(index) else {
            break;
        };
        match child.tag() {
            Tag::Greater => {
                node.wrap_range(head..index + 1, Tag::TemplateRef)?;
                *limit -= index - head;
                return Ok(true);
            }
            Tag::Shr => {
                let location = child.location().clone();
                node.replace(index, Node::terminal(Tag::Greater, ">", location.clone()))?;
                node.insert(index + 1, Node::terminal(Tag::Greater, ">", location))?;
                *limit += 1;
            }
            Tag::Identifier | Tag::ScopeRef
                if node
                    .next_significant(index + 1)
                    .and_then(|i| node.tag_at(i))
                    == Some(Tag::Less) =>
            {
                if !fold_template(node, index, limit)? {
                    return Ok(false);
                }
                index += 1;
            }
            tag if tag.is_trivia() || is_template_argument(tag) => index += 1,
            _ => return Ok(false),
        }
    }
    Ok(false)
}

pub fn templates(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut limit = type_region_end(node);
    let mut index = 0;
    while index < limit {
        if matches!(
            node.tag_at(index),
            Some(Tag::Identifier | Tag::ScopeRef)
        ) {
            fold_template(node, index, &mut limit)?;
        }
        index += 1;
    }
    Ok(())
}

pub fn bare_angles(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let limit = type_region_end(node);
    let stray = node.children()[..limit]
        .iter()
        .find(|c| matches!(c.tag(), Tag::Less | Tag::Greater | Tag::Shl | Tag::Shr));
    match stray {
        Some(child) => Err(FoldError::parse(
            child.location().clone(),
            format!(
                "unexpected {} in {}; template arguments must follow a name",
                child.tag().describe(),
                session.frames.describe(node)
            ),
        )),
        None => Ok(()),
    }
}

pub fn pointers(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut limit = type_region_end(node);
    let mut index = 0;
    while index < limit {
        if matches!(node.tag_at(index), Some(Tag::Star | Tag::Amp | Tag::AndAnd)) {
            let mut end = index + 1;
            while let Some(next) = node.next_significant(end) {
                if next >= limit
                    || !matches!(
                        node.tag_at(next),
                        Some(Tag::Star | Tag::Amp | Tag::Const | Tag::Volatile)
                    )
                {
                    break;
                }
                end = next + 1;
            }
            node.wrap_range(index..end, Tag::PointerType)?;
            limit -= end - index - 1;
        }
        index += 1;
    }
    Ok(())
}

/// Report every modifier that appears twice among a node's direct children.
pub fn duplicate_modifiers(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let limit = type_region_end(node);
    let mut seen = HashSet::new();
    for child in node.children()[..limit].iter() {
        let tag = child.tag();
        if tag.is_modifier() && !seen.insert(tag) {
            session.report(FoldError::parse(
                child.location().clone(),
                format!("duplicate {} in {}", tag.describe(), session.frames.describe(node)),
            ));
        }
    }
    Ok(())
}

pub static TYPE_SPEC: Context = Context {
    name: "type specification",
    pre_parse: None,
    passes: &[],
    allow: |tag| is_type_part(tag) || tag == Tag::Tilde,
    post_parse: Some(duplicate_modifiers),
    recurse: true,
};
