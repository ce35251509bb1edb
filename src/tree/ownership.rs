//! Ownership checks
//!
//!     Walks a tree and confirms that every node names its container as parent and that no node
//!     identity appears twice. The pipeline runs this after expansion; tests run it everywhere.

use super::node::{Node, NodeId};
use crate::diagnostics::{FoldError, FoldResult};
use std::collections::HashSet;

pub fn check_ownership(root: &Node) -> FoldResult<()> {
    let mut seen: HashSet<NodeId> = HashSet::new();
    check_node(root, None, &mut seen)
}

fn check_node(node: &Node, parent: Option<NodeId>, seen: &mut HashSet<NodeId>) -> FoldResult<()> {
    if node.parent() != parent {
        return Err(FoldError::internal(
            node.location().clone(),
            format!(
                "{} names parent {:?} but is held by {:?}",
                node.tag().label(),
                node.parent().map(NodeId::value),
                parent.map(NodeId::value)
            ),
        ));
    }
    if !seen.insert(node.id()) {
        return Err(FoldError::internal(
            node.location().clone(),
            format!("node {} is reachable twice", node.id().value()),
        ));
    }
    for child in node.children() {
        check_node(child, Some(node.id()), seen)?;
    }
    Ok(())
}
