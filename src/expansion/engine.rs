//! The expansion engine
//!
//!     expand_call(site):
//!
//!         expand the call's own arguments
//!         look the macro up by name and arity
//!         one level deeper:
//!             copy the body, substitute arguments, paste `##`
//!             wrap the copy in an expansion node tagged for the call site
//!             parse it with that tag's context
//!             register macros it defines (item position only)
//!             expand the calls it contains
//!         replace the call site with the expansion
//!
//!     A failed expansion is recorded and its call site is removed, so one bad call (an unknown
//!     macro, runaway recursion) costs only itself and the rest of the file still expands.

use super::concat::concatenate;
use super::substitution::substitute;
use super::table::register_all;
use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::parse_family;
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;

/// Expand every call site in the tree. Returns the number of successful expansions.
pub fn expand_all(session: &mut Session, root: &mut Node) -> FoldResult<usize> {
    let registered = register_all(session, root);
    log::debug!("{} macro(s) registered before expansion", registered);
    expand_children(session, root)
}

/// Expand the call sites below `node`, innermost arguments first.
pub fn expand_children(session: &mut Session, node: &mut Node) -> FoldResult<usize> {
    let mut expanded = 0;
    let mut index = 0;
    while index < node.len() {
        let Some(tag) = node.tag_at(index) else {
            break;
        };
        if tag.is_call_site() {
            let result = expand_call(session, node, index);
            match session.recover(result)? {
                Some(nested) => expanded += nested + 1,
                None => {
                    node.delete(index);
                    continue;
                }
            }
        } else if tag != Tag::MacroDef {
            if let Some(child) = node.child_mut(index).filter(|c| c.is_composite()) {
                expanded += expand_children(session, child)?;
            }
        }
        index += 1;
    }
    Ok(expanded)
}

/// The expansion tag for a call site, decided by where the call sits.
pub fn expansion_tag(site: Tag, parent: Tag) -> Tag {
    match (site, parent) {
        (Tag::MacroCall, _) => Tag::ExpressionExpansion,
        (_, Tag::File | Tag::ItemExpansion) => Tag::ItemExpansion,
        (_, Tag::ObjectBody | Tag::MemberExpansion) => Tag::MemberExpansion,
        _ => Tag::StatementExpansion,
    }
}

/// Replace the call site at `index` by its expansion. Returns the number of expansions made
/// inside it.
fn expand_call(session: &mut Session, parent: &mut Node, index: usize) -> FoldResult<usize> {
    let parent_tag = parent.tag();
    let fallback = parent.location().clone();
    let Some(call) = parent.child_mut(index) else {
        return Err(FoldError::internal(
            fallback,
            format!("no call site at index {}", index),
        ));
    };
    let mut inner = expand_children(session, call)?;

    let location = call.location().clone();
    let name = call
        .significant()
        .find(|c| c.tag() == Tag::Identifier)
        .and_then(Node::text)
        .map(str::to_string)
        .ok_or_else(|| FoldError::internal(location.clone(), "call site without a macro name"))?;
    let arguments: Vec<Node> = call
        .children()
        .iter()
        .filter(|c| c.tag() == Tag::Arguments)
        .flat_map(|list| list.children())
        .filter(|c| c.tag() == Tag::Argument)
        .map(Node::deep_clone)
        .collect();
    let tag = expansion_tag(call.tag(), parent_tag);

    let definition = session.macros.lookup(&name, arguments.len(), &location)?;
    let params = definition.params.clone();
    let body = definition.instantiate();

    let what = format!("`{}`", name);
    let expansion = session.deeper(&location, &what, |session| {
        let mut expansion = Node::composite(tag, location.clone(), body);
        substitute(&mut expansion, &params, &arguments)?;
        concatenate(&mut expansion, session.mode)?;
        parse_family(session, &mut expansion)?;
        if tag == Tag::ItemExpansion {
            register_all(session, &expansion);
        }
        inner += expand_children(session, &mut expansion)?;
        Ok(expansion)
    })?;
    log::trace!(
        "expanded {} at line {} into {}",
        what,
        location.line,
        expansion.tag().label()
    );
    parent.replace(index, expansion)?;
    Ok(inner)
}
