//! Preprocessor directive folding
//!
//!     A `#` that is the first non-blank token of a line, followed by optional whitespace and a
//!     word, becomes a single Directive token (`#include`, `# define`, `#if`). The rest of the
//!     directive line is left alone here; structuring groups it later. A `#` anywhere else, or
//!     one followed by something other than a word (`# 12 "file"`), stays a Hash symbol.

use super::{fold_ranges, skip_blanks};
use crate::lexing::common::TokenMapper;
use crate::token::{Tag, Token};

pub struct DirectiveMapper;

impl DirectiveMapper {
    pub fn new() -> Self {
        DirectiveMapper
    }
}

impl Default for DirectiveMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMapper for DirectiveMapper {
    fn name(&self) -> &'static str {
        "directives"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        let mut ranges = Vec::new();
        let mut at_line_start = true;
        let mut i = 0;

        while i < tokens.len() {
            let tag = tokens[i].tag;
            if tag == Tag::Hash && at_line_start {
                let word = skip_blanks(&tokens, i + 1);
                if word < tokens.len() && tokens[word].tag == Tag::Identifier {
                    ranges.push((i, word + 1, Tag::Directive));
                    at_line_start = false;
                    i = word + 1;
                    continue;
                }
            }
            match tag {
                Tag::Newline => at_line_start = true,
                Tag::Whitespace | Tag::BlockComment => {}
                _ => at_line_start = false,
            }
            i += 1;
        }

        fold_ranges(tokens, &ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::base_tokenization::tokenize;
    use std::sync::Arc;

    fn run(source: &str) -> Vec<Token> {
        let tokens = tokenize(source, &Arc::from("t.cf")).unwrap();
        DirectiveMapper::new().map(tokens)
    }

    #[test]
    fn test_folds_hash_and_word() {
        let tokens = run("#include <x.h>\n");
        assert_eq!(tokens[0].tag, Tag::Directive);
        assert_eq!(tokens[0].text, "#include");
    }

    #[test]
    fn test_folds_spaced_directive_after_indent() {
        let tokens = run("int a;\n  #  define X 1\n");
        let directive = tokens.iter().find(|t| t.tag == Tag::Directive).unwrap();
        assert_eq!(directive.text, "#  define");
        assert_eq!(directive.location.line, 2);
    }

    #[test]
    fn test_mid_line_hash_is_not_a_directive() {
        let tokens = run("a # b\n");
        assert!(tokens.iter().all(|t| t.tag != Tag::Directive));
        assert!(tokens.iter().any(|t| t.tag == Tag::Hash));
    }

    #[test]
    fn test_hash_before_number_is_not_a_directive() {
        let tokens = run("# 12 \"f.c\"\n");
        assert_eq!(tokens[0].tag, Tag::Hash);
    }
}
