//! Serializable tree snapshots
//!
//! A `TreeSnapshot` is a plain-data copy of a tree: tag, line, text for terminals and
//! children for composites. It exists so trees can be written with serde; trivia is left out
//! unless asked for.

use crate::token::Tag;
use crate::tree::Node;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeSnapshot {
    pub tag: Tag,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

/// Build a snapshot of `node`, keeping trivia terminals only when `include_trivia` is set.
pub fn snapshot(node: &Node, include_trivia: bool) -> TreeSnapshot {
    TreeSnapshot {
        tag: node.tag(),
        line: node.location().line,
        text: node.text().map(str::to_string),
        children: node
            .children()
            .iter()
            .filter(|child| include_trivia || !child.is_trivia())
            .map(|child| snapshot(child, include_trivia))
            .collect(),
    }
}

impl TreeSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Number of nodes in the snapshot, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeSnapshot::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::testing::parse_source;

    #[test]
    fn test_trivia_is_optional() {
        let (_, root) = parse_source("int x;\n");
        let lean = snapshot(&root, false);
        let full = snapshot(&root, true);
        assert!(full.count() > lean.count());
        assert_eq!(lean.children.len(), 1);
        assert_eq!(lean.children[0].tag, Tag::Declaration);
    }

    #[test]
    fn test_json_shape() {
        let (_, root) = parse_source("x;\n");
        let value: serde_json::Value =
            serde_json::from_str(&snapshot(&root, false).to_json().unwrap()).unwrap();
        assert_eq!(value["tag"], "File");
        assert_eq!(value["line"], 1);
        assert!(value.get("text").is_none());
        let leaf = &value["children"][0]["children"][0];
        assert_eq!(leaf["tag"], "Identifier");
        assert_eq!(leaf["text"], "x");
    }

    #[test]
    fn test_yaml_names_tags() {
        let (_, root) = parse_source("int x;\n");
        let yaml = snapshot(&root, false).to_yaml().unwrap();
        assert!(yaml.contains("tag: Declaration"));
    }
}
