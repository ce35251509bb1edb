//! Wide and prefixed literal folding
//!
//!     An encoding prefix (`L`, `u`, `U`, `u8`) glued to a string literal yields a
//!     WideStringLiteral; glued to a character literal it yields a CharLiteral.

use super::fold_ranges;
use crate::lexing::common::TokenMapper;
use crate::token::{Tag, Token};

const PREFIXES: &[&str] = &["L", "u", "U", "u8"];

pub struct WideStringMapper;

impl WideStringMapper {
    pub fn new() -> Self {
        WideStringMapper
    }
}

impl Default for WideStringMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMapper for WideStringMapper {
    fn name(&self) -> &'static str {
        "wide_strings"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        let mut ranges = Vec::new();
        let mut i = 0;
        while i + 1 < tokens.len() {
            let prefix = &tokens[i];
            if prefix.tag == Tag::Identifier && PREFIXES.contains(&prefix.text.as_str()) {
                let folded = match tokens[i + 1].tag {
                    Tag::StringLiteral => Some(Tag::WideStringLiteral),
                    Tag::CharLiteral => Some(Tag::CharLiteral),
                    _ => None,
                };
                if let Some(tag) = folded {
                    ranges.push((i, i + 2, tag));
                    i += 2;
                    continue;
                }
            }
            i += 1;
        }
        fold_ranges(tokens, &ranges)
    }
}
