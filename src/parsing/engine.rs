//! The parse-family recursion
//!
//!     parse_family(node):
//!
//!         PreParse(node)      context hook, e.g. checks on the node as a whole
//!         Parse(node)         the context's passes in order, then its AllowOnly check
//!         PostParse(node)     context hook, e.g. validations over the rebuilt children
//!         for each child:     parse_family(child)
//!
//!     A node is restructured at its own level before anything below it is looked at, so the
//!     tree is built outward-in. Each phase is a recovery boundary: a parse error is recorded
//!     and the remaining phases and children still run. Fatal errors travel all the way up.
//!
//!     Every phase runs inside a context frame anchored on the node, which resets the node's
//!     cursor on entry and restores it on exit.

use super::grammar::context_for;
use super::passes::{Context, PassFn};
use crate::diagnostics::{FoldError, FoldResult};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

/// Parse `node` and everything below it that has not been parsed yet.
pub fn parse_family(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    if node.is_terminal() || node.is_parsed() {
        return Ok(());
    }
    let location = node.location().clone();
    session.nested(&location, |session| parse_node(session, node))
}

fn parse_node(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let context = context_for(node.tag());
    if let Some(context) = context {
        log::trace!("parsing {} with {}", node.tag().label(), context.name);
        if let Some(pre_parse) = context.pre_parse {
            let result = run_phase(session, node, pre_parse);
            session.recover(result)?;
        }
        let result = parse_phase(session, node, context);
        session.recover(result)?;
        if let Some(post_parse) = context.post_parse {
            let result = run_phase(session, node, post_parse);
            session.recover(result)?;
        }
    }
    node.mark_parsed();

    if context.map_or(true, |c| c.recurse) {
        for index in 0..node.len() {
            if let Some(child) = node.child_mut(index) {
                parse_family(session, child)?;
            }
        }
    }
    Ok(())
}

fn run_phase(session: &mut Session, node: &mut Node, phase: PassFn) -> FoldResult<()> {
    session.frames.enter(node.tag(), node);
    let result = phase(session, node);
    session.frames.leave(node);
    result
}

fn parse_phase(session: &mut Session, node: &mut Node, context: &Context) -> FoldResult<()> {
    let before = session.diagnostics.len();
    let result = run_passes(session, node, context);
    let quiet = result.is_err() || session.diagnostics.len() > before;
    enforce_allow_only(session, node, context, quiet)?;
    result
}

/// Run a context's passes, in order, on one node.
pub fn run_passes(session: &mut Session, node: &mut Node, context: &Context) -> FoldResult<()> {
    for pass in context.passes {
        log::trace!("pass {} on {}", pass.name, node.tag().label());
        run_phase(session, node, pass.run)?;
    }
    Ok(())
}

/// Collapse every child the context does not allow back into its parts, and report the
/// terminals that are left over. `quiet` suppresses the report when the passes already
/// explained what went wrong.
pub fn enforce_allow_only(
    session: &mut Session,
    node: &mut Node,
    context: &Context,
    quiet: bool,
) -> FoldResult<()> {
    let mut index = 0;
    let mut reported_run = false;
    while index < node.len() {
        let Some(child) = node.child(index) else {
            break;
        };
        if context.allows(child.tag()) {
            if !child.is_trivia() {
                reported_run = false;
            }
            index += 1;
            continue;
        }
        if child.is_composite() {
            log::debug!(
                "collapsing {} not allowed in {}",
                child.tag().label(),
                node.tag().label()
            );
            node.collapse_child(index)?;
            continue;
        }
        if !quiet && !reported_run {
            let message = format!(
                "unrecognized {} in {}",
                describe_survivor(child),
                session.frames.describe(node)
            );
            session.report(FoldError::parse(child.location().clone(), message));
        }
        reported_run = true;
        index += 1;
    }
    Ok(())
}

fn describe_survivor(node: &Node) -> String {
    match node.text() {
        Some(text) if node.tag().is_name() || node.tag().is_literal() => {
            format!("{} `{}`", node.tag().label(), text)
        }
        _ => node.tag().describe(),
    }
}

/// True if no macro call site is left anywhere in the tree.
pub fn is_fully_expanded(root: &Node) -> bool {
    !root.contains_any(&[Tag::MacroCall, Tag::ExpandCall])
}
