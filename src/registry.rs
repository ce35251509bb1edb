//! Construct registry
//!
//!     The lexer asks one question of the outside world: is this word a user-defined construct
//!     kind? Registered construct names are relabeled to ConstructName tokens in extended mode,
//!     which lets the item passes recognize `widget Name { ... }` the way they recognize
//!     `object Name { ... }`.
//!
//!     Construct names normally come from a dialect file. `DialectRegistry` reads the
//!     `construct NAME;` declarations out of a parsed dialect tree.

use crate::token::Tag;
use crate::tree::Node;
use std::collections::BTreeSet;

pub trait ConstructRegistry {
    fn is_construct(&self, name: &str) -> bool;
}

/// A registry that knows no constructs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstructs;

impl ConstructRegistry for NoConstructs {
    fn is_construct(&self, _name: &str) -> bool {
        false
    }
}

/// Construct names loaded from a dialect definition, or listed by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialectRegistry {
    names: BTreeSet<String>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DialectRegistry {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Collect every `construct NAME;` declaration of a parsed dialect file.
    pub fn from_tree(root: &Node) -> Self {
        let mut registry = DialectRegistry::new();
        for decl in root.children().iter().filter(|c| c.tag() == Tag::ConstructDecl) {
            if let Some(name) = decl
                .significant()
                .find(|c| c.tag() == Tag::Identifier)
                .and_then(Node::text)
            {
                registry.register(name);
            }
        }
        registry
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl ConstructRegistry for DialectRegistry {
    fn is_construct(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_constructs() {
        assert!(!NoConstructs.is_construct("widget"));
    }

    #[test]
    fn test_listed_names() {
        let registry = DialectRegistry::with_names(["widget", "panel"]);
        assert!(registry.is_construct("widget"));
        assert!(!registry.is_construct("object"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["panel", "widget"]);
    }
}
