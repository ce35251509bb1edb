//! Format registry
//!
//! Tree formats implement [Formatter] and are looked up by name. The defaults are `treeviz`,
//! `json`, `yaml` and `source`.

use crate::formats::detokenizer::detokenize;
use crate::formats::snapshot::snapshot;
use crate::formats::treeviz::TreevizFormatter;
use crate::tree::Node;
use std::collections::HashMap;
use std::fmt;

/// Error that can occur during formatting
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Format not found in registry
    FormatNotFound(String),
    /// Error during serialization
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{name}' not found"),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for FormatError {}

pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn serialize(&self, root: &Node) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, root: &Node) -> Result<String, FormatError> {
        snapshot(root, false)
            .to_json()
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Tree snapshot as JSON, trivia omitted"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, root: &Node) -> Result<String, FormatError> {
        snapshot(root, false)
            .to_yaml()
            .map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "Tree snapshot as YAML, trivia omitted"
    }
}

pub struct SourceFormatter;

impl Formatter for SourceFormatter {
    fn name(&self) -> &str {
        "source"
    }

    fn serialize(&self, root: &Node) -> Result<String, FormatError> {
        Ok(detokenize(root))
    }

    fn description(&self) -> &str {
        "The tree printed back as source text"
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter, replacing any with the same name.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, root: &Node, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(root)
    }

    /// All format names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TreevizFormatter);
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry.register(SourceFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::testing::parse_source;

    #[test]
    fn test_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(
            registry.list_formats(),
            vec!["json", "source", "treeviz", "yaml"]
        );
    }

    #[test]
    fn test_unknown_format() {
        let (_, root) = parse_source("int x;\n");
        let err = FormatRegistry::default().serialize(&root, "xml").unwrap_err();
        assert_eq!(err, FormatError::FormatNotFound("xml".to_string()));
        assert_eq!(err.to_string(), "Format 'xml' not found");
    }

    #[test]
    fn test_source_round_trip() {
        let source = "int x; /* kept */\n";
        let (_, root) = parse_source(source);
        assert_eq!(
            FormatRegistry::default().serialize(&root, "source").unwrap(),
            source
        );
    }
}
