//! The macro table
//!
//!     Macros are keyed by name and arity, so `MAX(a, b)` and `MAX(a, b, c)` are two macros.
//!     Defining a macro again with the same name and arity replaces the earlier definition.

use crate::diagnostics::{FoldError, FoldResult};
use crate::session::Session;
use crate::token::{Location, Tag};
use crate::tree::Node;
use std::collections::HashMap;

/// A registered macro: its formal parameters and a private copy of its body.
#[derive(Debug)]
pub struct MacroDefinition {
    pub name: String,
    pub params: Vec<String>,
    /// The MacroBody composite, braces included.
    pub body: Node,
    pub location: Location,
}

impl MacroDefinition {
    /// Read a parsed MacroDef. Returns `None` for a definition whose signature did not parse;
    /// that failure has already been reported.
    pub fn from_node(def: &Node) -> Option<MacroDefinition> {
        let name = def
            .significant()
            .find(|c| c.tag() == Tag::Identifier)
            .and_then(Node::text)?;
        let params = def.children().iter().find(|c| c.tag() == Tag::MacroParams)?;
        let body = def.children().iter().find(|c| c.tag() == Tag::MacroBody)?;
        Some(MacroDefinition {
            name: name.to_string(),
            params: params
                .significant()
                .filter(|c| c.tag() == Tag::Identifier)
                .filter_map(Node::text)
                .map(str::to_string)
                .collect(),
            body: body.deep_clone(),
            location: def.location().clone(),
        })
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Fresh copies of the body's contents, without the enclosing braces.
    pub fn instantiate(&self) -> Vec<Node> {
        let mut inner = self.body.children();
        if inner.first().map(Node::tag) == Some(Tag::LBrace) {
            inner = &inner[1..];
        }
        if inner.last().map(Node::tag) == Some(Tag::RBrace) {
            inner = &inner[..inner.len() - 1];
        }
        inner.iter().map(Node::deep_clone).collect()
    }
}

#[derive(Debug, Default)]
pub struct MacroTable {
    macros: HashMap<(String, usize), MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.macros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Register `definition`, replacing any macro with the same name and arity.
    pub fn define(&mut self, definition: MacroDefinition) {
        let key = (definition.name.clone(), definition.arity());
        if let Some(previous) = self.macros.get(&key) {
            log::debug!(
                "macro `{}`/{} redefined at line {} (was line {})",
                definition.name,
                definition.arity(),
                definition.location.line,
                previous.location.line
            );
        } else {
            log::debug!("macro `{}`/{} defined", definition.name, definition.arity());
        }
        self.macros.insert(key, definition);
    }

    pub fn get(&self, name: &str, arity: usize) -> Option<&MacroDefinition> {
        self.macros.get(&(name.to_string(), arity))
    }

    /// Find the macro a call site names, or explain why there is none.
    pub fn lookup(
        &self,
        name: &str,
        arity: usize,
        location: &Location,
    ) -> FoldResult<&MacroDefinition> {
        if let Some(definition) = self.get(name, arity) {
            return Ok(definition);
        }
        let mut arities: Vec<usize> = self
            .macros
            .keys()
            .filter(|(other, _)| other == name)
            .map(|(_, n)| *n)
            .collect();
        if !arities.is_empty() {
            arities.sort_unstable();
            let takes = arities
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(FoldError::expansion(
                location.clone(),
                format!(
                    "macro `{}` takes {} argument(s), called with {}",
                    name, takes, arity
                ),
            ));
        }
        let mut message = format!("unknown macro `{}`", name);
        if let Some(close) = self.closest(name) {
            message.push_str(&format!("; did you mean `{}`?", close));
        }
        Err(FoldError::expansion(location.clone(), message))
    }

    /// The defined name nearest to `name`, within two edits.
    fn closest(&self, name: &str) -> Option<&str> {
        self.macros
            .keys()
            .map(|(other, _)| (edit_distance(name, other), other.as_str()))
            .filter(|(distance, _)| *distance <= 2)
            .min()
            .map(|(_, other)| other)
    }
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

/// Register every macro defined directly under `root`. Returns how many were registered.
pub fn register_all(session: &mut Session, root: &Node) -> usize {
    let mut registered = 0;
    for def in root.children().iter().filter(|c| c.tag() == Tag::MacroDef) {
        if let Some(definition) = MacroDefinition::from_node(def) {
            session.macros.define(definition);
            registered += 1;
        }
    }
    registered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::testing::parse_source;

    fn table(source: &str) -> MacroTable {
        let (mut session, root) = parse_source(source);
        register_all(&mut session, &root);
        session.macros
    }

    #[test]
    fn test_definition_is_read_from_the_tree() {
        let table = table("macro ADD(a, b) { a + b }\n");
        let add = table.get("ADD", 2).unwrap();
        assert_eq!(add.params, vec!["a", "b"]);
        let body: String = add.instantiate().iter().map(Node::text_content).collect();
        assert_eq!(body, " a + b ");
    }

    #[test]
    fn test_overloads_by_arity_and_redefinition() {
        let table = table(
            "macro M(a) { 1 }\nmacro M(a, b) { 2 }\nmacro M(x) { 3 }\n",
        );
        assert_eq!(table.len(), 2);
        let body: String = table
            .get("M", 1)
            .unwrap()
            .instantiate()
            .iter()
            .map(Node::text_content)
            .collect();
        assert_eq!(body, " 3 ");
    }

    #[test]
    fn test_lookup_errors() {
        let table = table("macro ADD(a, b) { a + b }\n");
        let at = Location::new("t.cf", 9);
        let arity = table.lookup("ADD", 3, &at).unwrap_err();
        assert_eq!(arity.message, "macro `ADD` takes 2 argument(s), called with 3");
        let unknown = table.lookup("ADDD", 2, &at).unwrap_err();
        assert_eq!(unknown.message, "unknown macro `ADDD`; did you mean `ADD`?");
        let far = table.lookup("SUBTRACT", 2, &at).unwrap_err();
        assert_eq!(far.message, "unknown macro `SUBTRACT`");
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "ab"), 2);
        assert_eq!(edit_distance("same", "same"), 0);
    }
}
