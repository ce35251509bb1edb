//! Lexer
//!
//! This module orchestrates the complete tokenization pipeline.
//!
//! Structure:
//!     Raw tokenization is done by the logos lexer (see [base_tokenization]). The resulting flat
//!     stream then runs through the ordered list of [transformations], each a `TokenMapper`.
//!     The output is fully materialized before any tree rewriting starts.
//!
//! Invariants
//!
//!     - Round trip: the concatenated text of the output equals the source, byte for byte.
//!     - Every token carries the logical file name and the line of its first byte.
//!     - Scanning fails only on unterminated string, character or comment literals.
//!
//! Modes
//!
//!     The same source lexes differently per [LexMode]: keywords of the extended dialect are
//!     ordinary identifiers in plain mode, and the dialect language reserves its own small set.

pub mod base_tokenization;
pub mod common;
pub mod keywords;
pub mod symbols;
pub mod transformations;

pub use base_tokenization::tokenize;
pub use common::{LexError, LexMode, TokenMapper};

use crate::registry::{ConstructRegistry, NoConstructs};
use crate::token::Token;
use std::sync::Arc;
use transformations::{
    CompoundKeywordMapper, DirectiveMapper, ExponentMapper, KeywordRelabelMapper,
    LineContinuationMapper, NumericSuffixMapper, StringMergeMapper, WideStringMapper,
};

/// A configured lexer: a mode plus the construct registry used for relabeling.
#[derive(Clone)]
pub struct Lexer {
    mode: LexMode,
    registry: Arc<dyn ConstructRegistry + Send + Sync>,
}

impl Lexer {
    pub fn new(mode: LexMode) -> Self {
        Lexer {
            mode,
            registry: Arc::new(NoConstructs),
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn ConstructRegistry + Send + Sync>) -> Self {
        self.registry = registry;
        self
    }

    pub fn mode(&self) -> LexMode {
        self.mode
    }

    /// The transformation stages, in the order they must run.
    fn mappers(&self) -> Vec<Box<dyn TokenMapper>> {
        vec![
            Box::new(DirectiveMapper::new()),
            Box::new(StringMergeMapper::new()),
            Box::new(KeywordRelabelMapper::new(self.mode, self.registry.clone())),
            Box::new(NumericSuffixMapper::new()),
            Box::new(LineContinuationMapper::new()),
            Box::new(ExponentMapper::new()),
            Box::new(WideStringMapper::new()),
            Box::new(CompoundKeywordMapper::new(self.mode)),
        ]
    }

    /// Run every transformation over an already tokenized stream.
    pub fn transform(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut tokens = tokens;
        for mut mapper in self.mappers() {
            let before = tokens.len();
            tokens = mapper.map(tokens);
            log::trace!(
                "lexing stage {}: {} -> {} tokens",
                mapper.name(),
                before,
                tokens.len()
            );
        }
        tokens
    }

    /// Tokenize and transform one file.
    pub fn lex(&self, file: &str, source: &str) -> Result<Vec<Token>, LexError> {
        let file: Arc<str> = Arc::from(file);
        let tokens = tokenize(source, &file)?;
        Ok(self.transform(tokens))
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Lexer::new(LexMode::default())
    }
}

/// Lex `source` in `mode` with no registered constructs.
pub fn lex(file: &str, source: &str, mode: LexMode) -> Result<Vec<Token>, LexError> {
    Lexer::new(mode).lex(file, source)
}

/// Concatenate token texts back into source.
pub fn detokenize_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Tag;

    fn tags(source: &str, mode: LexMode) -> Vec<Tag> {
        lex("t.cf", source, mode)
            .unwrap()
            .into_iter()
            .filter(|t| !t.tag.is_trivia())
            .map(|t| t.tag)
            .collect()
    }

    #[test]
    fn test_full_pipeline() {
        assert_eq!(
            tags("#if X\nstatic long n = 1e+5L;\n#endif\n", LexMode::Plain),
            vec![
                Tag::Directive,
                Tag::Identifier,
                Tag::Static,
                Tag::Long,
                Tag::Identifier,
                Tag::Assign,
                Tag::FloatLiteral,
                Tag::Semicolon,
                Tag::Directive,
            ]
        );
    }

    #[test]
    fn test_directive_word_is_not_relabeled() {
        let tokens = lex("t.cf", "#if 1\n#else\n#endif\n", LexMode::Plain).unwrap();
        assert!(tokens.iter().all(|t| t.tag != Tag::If && t.tag != Tag::Else));
    }

    #[test]
    fn test_round_trip_after_transformations() {
        let source = "macro CAT(a, b) { a ## b }\nL\"w\" \"x\"\n  \"y\" 0x1Fu \\\n 1.5e-3f;\n";
        let tokens = lex("t.cf", source, LexMode::Extended).unwrap();
        assert_eq!(detokenize_tokens(&tokens), source);
    }

    #[test]
    fn test_scan_error_is_reported() {
        assert!(lex("t.cf", "/* open", LexMode::Extended).is_err());
    }
}
