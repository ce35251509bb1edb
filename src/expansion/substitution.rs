//! Parameter substitution
//!
//!     Every identifier in a macro body that names a formal parameter is replaced by a copy of
//!     the matching actual argument. A single-token argument is copied as that token, so it can
//!     stand wherever a name is expected. Anything longer is copied as the whole Argument
//!     composite, already parsed, so it keeps its grouping wherever it lands: `a * 2` with `a`
//!     bound to `x + 1` reads as `(x + 1) * 2` to every later pass, even though its text is
//!     `x + 1 * 2`.

use crate::diagnostics::FoldResult;
use crate::token::Tag;
use crate::tree::Node;

/// Replace parameter references in `node`'s children, at any depth.
///
/// `arguments[i]` is bound to `params[i]`. Returns the number of replacements made.
pub fn substitute(node: &mut Node, params: &[String], arguments: &[Node]) -> FoldResult<usize> {
    let mut replaced = 0;
    for index in 0..node.len() {
        let bound = match node.child(index) {
            Some(child) if child.tag() == Tag::Identifier => child
                .text()
                .and_then(|text| params.iter().position(|param| param == text)),
            _ => None,
        };
        match bound {
            Some(position) => {
                if let Some(argument) = arguments.get(position) {
                    node.replace(index, instance(argument))?;
                    replaced += 1;
                }
            }
            None => {
                if let Some(child) = node.child_mut(index).filter(|c| c.is_composite()) {
                    replaced += substitute(child, params, arguments)?;
                }
            }
        }
    }
    Ok(replaced)
}

fn instance(argument: &Node) -> Node {
    let mut significant = argument.significant();
    match (significant.next(), significant.next()) {
        (Some(only), None) if only.is_terminal() && argument.len() == 1 => only.deep_clone(),
        _ => argument.deep_clone(),
    }
}
