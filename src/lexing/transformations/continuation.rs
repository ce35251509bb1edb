//! Line continuation folding
//!
//!     A backslash followed by optional blanks and a line break becomes one Continuation token.
//!     Continuations are trivia: directive lines extend across them and passes skip them.

use super::fold_ranges;
use crate::lexing::common::TokenMapper;
use crate::token::{Tag, Token};

pub struct LineContinuationMapper;

impl LineContinuationMapper {
    pub fn new() -> Self {
        LineContinuationMapper
    }
}

impl Default for LineContinuationMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMapper for LineContinuationMapper {
    fn name(&self) -> &'static str {
        "continuation"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        let mut ranges = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if tokens[i].tag == Tag::Backslash {
                let mut next = i + 1;
                while next < tokens.len() && tokens[next].tag == Tag::Whitespace {
                    next += 1;
                }
                if next < tokens.len() && tokens[next].tag == Tag::Newline {
                    ranges.push((i, next + 1, Tag::Continuation));
                    i = next + 1;
                    continue;
                }
            }
            i += 1;
        }
        fold_ranges(tokens, &ranges)
    }
}
