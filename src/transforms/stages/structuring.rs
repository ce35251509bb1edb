//! Structuring stage
//!
//! Builds the file node from the token list and groups directive lines and bracket pairs.
//! A dialect file gets a `DialectFile` root so the dialect item context parses it.

use crate::lexing::LexMode;
use crate::parsing::structure;
use crate::token::Tag;
use crate::transforms::stages::Tokenized;
use crate::transforms::{Compilation, Runnable, TransformError};
use crate::tree::Node;

pub struct Structuring;

impl Structuring {
    pub fn new() -> Self {
        Structuring
    }
}

impl Default for Structuring {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Tokenized, Compilation> for Structuring {
    fn run(&self, input: Tokenized) -> Result<Compilation, TransformError> {
        let root_tag = match input.session.mode {
            LexMode::Dialect => Tag::DialectFile,
            LexMode::Plain | LexMode::Extended => Tag::File,
        };
        let root = Node::composite(
            root_tag,
            input.session.location(1),
            input.tokens.into_iter().map(Node::from).collect(),
        );
        let mut compilation = Compilation {
            session: input.session,
            source: input.source,
            root,
            aborted: input.aborted,
        };
        if compilation.aborted {
            return Ok(compilation);
        }
        let max_nesting = compilation.session.config.parsing.max_nesting;
        if let Err(error) = structure(
            &mut compilation.root,
            &mut compilation.session.diagnostics,
            max_nesting,
        ) {
            compilation.abort("structuring", error);
        }
        Ok(compilation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transforms::stages::{SourceUnit, Tokenization};

    fn structured(file: &str, source: &str) -> Compilation {
        let tokens = Tokenization::new().run(SourceUnit::new(file, source)).unwrap();
        Structuring::new().run(tokens).unwrap()
    }

    #[test]
    fn test_groups_brackets() {
        let out = structured("a.cf", "f(a[1]) { }\n");
        assert!(!out.aborted);
        assert_eq!(out.root.tag(), Tag::File);
        assert_eq!(out.root.tag_at(1), Some(Tag::Parens));
        assert_eq!(out.root.text_content(), "f(a[1]) { }\n");
    }

    #[test]
    fn test_dialect_root() {
        let out = structured("rules.cfd", "construct widget;\n");
        assert_eq!(out.root.tag(), Tag::DialectFile);
    }

    #[test]
    fn test_mismatch_aborts() {
        let out = structured("a.cf", "{ ( } )\n");
        assert!(out.aborted);
        assert!(out.session.diagnostics.has_fatal());
    }
}
