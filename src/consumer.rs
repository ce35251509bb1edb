//! Hand-off to a downstream consumer
//!
//!     A finished tree is given to a consumer node by node, depth first: `enter` before a
//!     node's children, `exit` after them. Only clean trees are handed off. A compilation that
//!     recorded any error, or whose tree still holds a macro call site, is refused, so a
//!     consumer can rely on every node having passed its context's whitelist.

use crate::parsing::is_fully_expanded;
use crate::token::Tag;
use crate::transforms::Compilation;
use crate::tree::Node;
use std::collections::BTreeMap;
use std::fmt;

pub trait TreeConsumer {
    fn enter(&mut self, node: &Node, depth: usize);

    fn exit(&mut self, _node: &Node, _depth: usize) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandOffError {
    /// The compilation recorded this many errors.
    Diagnostics(usize),
    /// A macro call site survived expansion.
    Unexpanded,
}

impl fmt::Display for HandOffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandOffError::Diagnostics(count) => {
                write!(f, "refusing hand-off: {} error(s) recorded", count)
            }
            HandOffError::Unexpanded => write!(f, "refusing hand-off: unexpanded macro call"),
        }
    }
}

impl std::error::Error for HandOffError {}

/// Give the compilation's tree to `consumer`, if it is clean.
pub fn hand_off(
    compilation: &Compilation,
    consumer: &mut dyn TreeConsumer,
) -> Result<(), HandOffError> {
    let errors = compilation.session.diagnostics.len();
    if errors > 0 || compilation.aborted {
        return Err(HandOffError::Diagnostics(errors));
    }
    if !is_fully_expanded(&compilation.root) {
        return Err(HandOffError::Unexpanded);
    }
    visit(&compilation.root, 0, consumer);
    Ok(())
}

fn visit(node: &Node, depth: usize, consumer: &mut dyn TreeConsumer) {
    consumer.enter(node, depth);
    for child in node.children() {
        visit(child, depth + 1, consumer);
    }
    consumer.exit(node, depth);
}

/// Counts the significant nodes of each tag.
#[derive(Debug, Default)]
pub struct TagCensus {
    pub counts: BTreeMap<Tag, usize>,
}

impl TagCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.counts.get(&tag).copied().unwrap_or(0)
    }
}

impl TreeConsumer for TagCensus {
    fn enter(&mut self, node: &Node, _depth: usize) {
        if !node.is_trivia() {
            *self.counts.entry(node.tag()).or_insert(0) += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SourceLoader;

    struct Recorder {
        events: Vec<String>,
    }

    impl TreeConsumer for Recorder {
        fn enter(&mut self, node: &Node, depth: usize) {
            if node.is_composite() {
                self.events.push(format!("{}+{}", depth, node.tag().label()));
            }
        }

        fn exit(&mut self, node: &Node, depth: usize) {
            if node.is_composite() {
                self.events.push(format!("{}-{}", depth, node.tag().label()));
            }
        }
    }

    #[test]
    fn test_enter_and_exit_nest() {
        let compilation = SourceLoader::from_string("t.cf", "int x;\n").compile().unwrap();
        let mut recorder = Recorder { events: Vec::new() };
        hand_off(&compilation, &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec!["0+file", "1+declaration", "1-declaration", "0-file"]
        );
    }

    #[test]
    fn test_refuses_trees_with_errors() {
        let compilation = SourceLoader::from_string("t.cf", "int x = @NOPE();\n")
            .compile()
            .unwrap();
        let err = hand_off(&compilation, &mut TagCensus::new()).unwrap_err();
        assert_eq!(err, HandOffError::Diagnostics(1));
    }

    #[test]
    fn test_refuses_unexpanded_calls() {
        let compilation = SourceLoader::from_string("t.cf", "macro M() { 1 }\nint x = @M();\n")
            .parse()
            .unwrap();
        let err = hand_off(&compilation, &mut TagCensus::new()).unwrap_err();
        assert_eq!(err, HandOffError::Unexpanded);
    }

    #[test]
    fn test_census() {
        let compilation = SourceLoader::from_string("t.cf", "int x;\nint y;\n")
            .compile()
            .unwrap();
        let mut census = TagCensus::new();
        hand_off(&compilation, &mut census).unwrap();
        assert_eq!(census.count(Tag::Declaration), 2);
        assert_eq!(census.count(Tag::Whitespace), 0);
    }
}
