//! Structuring
//!
//!     Runs once on a file's flat child list before any grammar context:
//!
//!     1. Each directive token and the rest of its logical line become one `Preprocessor`
//!        composite. Continuations carry their newline inside them, so a continued directive
//!        stays one line.
//!     2. Every bracket pair becomes a `Parens`, `Brackets` or `Braces` composite holding the
//!        opener, the contents and the closer.
//!
//!     Bracket errors are fatal for the file. A closer that does not match the innermost open
//!     bracket reports the unmatched opener first and then the closer. Opening one bracket more
//!     than `max_nesting` levels deep is a resource error, so no later pass ever walks a tree
//!     deeper than the configured ceiling.

use crate::diagnostics::{Diagnostics, FoldError, FoldResult};
use crate::token::{Location, Tag};
use crate::tree::Node;

pub fn structure(
    root: &mut Node,
    diagnostics: &mut Diagnostics,
    max_nesting: usize,
) -> FoldResult<()> {
    fold_directives(root)?;
    group_brackets(root, diagnostics, max_nesting)
}

/// Fold every directive line into a `Preprocessor` composite.
pub fn fold_directives(root: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < root.len() {
        if root.tag_at(index) == Some(Tag::Directive) {
            let end = (index..root.len())
                .find(|&i| root.tag_at(i) == Some(Tag::Newline))
                .unwrap_or(root.len());
            root.wrap_range(index..end, Tag::Preprocessor)?;
        }
        index += 1;
    }
    Ok(())
}

struct Open {
    opener: Tag,
    location: Location,
    children: Vec<Node>,
}

fn closer_for(opener: Tag) -> Tag {
    match opener {
        Tag::LParen => Tag::RParen,
        Tag::LBracket => Tag::RBracket,
        _ => Tag::RBrace,
    }
}

fn group_for(opener: Tag) -> Tag {
    match opener {
        Tag::LParen => Tag::Parens,
        Tag::LBracket => Tag::Brackets,
        _ => Tag::Braces,
    }
}

/// Rebuild the children of `root` with every bracket pair grouped.
pub fn group_brackets(
    root: &mut Node,
    diagnostics: &mut Diagnostics,
    max_nesting: usize,
) -> FoldResult<()> {
    let flat = root.detach_range(0..root.len());
    let mut top: Vec<Node> = Vec::with_capacity(flat.len());
    let mut open: Vec<Open> = Vec::new();

    for node in flat {
        match node.tag() {
            Tag::LParen | Tag::LBracket | Tag::LBrace => {
                if open.len() >= max_nesting {
                    return Err(FoldError::resource(
                        node.location().clone(),
                        format!("nesting deeper than {} levels", max_nesting),
                    ));
                }
                open.push(Open {
                    opener: node.tag(),
                    location: node.location().clone(),
                    children: vec![node],
                })
            }
            Tag::RParen | Tag::RBracket | Tag::RBrace => {
                let closer = node.tag();
                match open.pop() {
                    Some(mut group) if closer_for(group.opener) == closer => {
                        group.children.push(node);
                        let built = Node::composite(
                            group_for(group.opener),
                            group.location,
                            group.children,
                        );
                        match open.last_mut() {
                            Some(outer) => outer.children.push(built),
                            None => top.push(built),
                        }
                    }
                    Some(group) => {
                        diagnostics.report(*FoldError::structure(
                            group.location.clone(),
                            format!(
                                "unmatched {} before {}",
                                group.opener.describe(),
                                closer.describe()
                            ),
                        ));
                        return Err(FoldError::structure(
                            node.location().clone(),
                            format!(
                                "mismatched {}, expected {}",
                                closer.describe(),
                                closer_for(group.opener).describe()
                            ),
                        ));
                    }
                    None => {
                        return Err(FoldError::structure(
                            node.location().clone(),
                            format!("unmatched {}", closer.describe()),
                        ));
                    }
                }
            }
            _ => match open.last_mut() {
                Some(outer) => outer.children.push(node),
                None => top.push(node),
            },
        }
    }

    if let Some(innermost) = open.pop() {
        for outer in &open {
            diagnostics.report(*FoldError::structure(
                outer.location.clone(),
                format!("unclosed {}", outer.opener.describe()),
            ));
        }
        return Err(FoldError::structure(
            innermost.location,
            format!("unclosed {}", innermost.opener.describe()),
        ));
    }

    for node in top {
        root.append(node)?;
    }
    Ok(())
}
