//! Adjacent string literal merging
//!
//!     `"abc" "def"` and literals split over several lines become one StringLiteral token whose
//!     text still holds the separating whitespace and newlines. Comments between literals stop
//!     the merge.

use super::fold_ranges;
use crate::lexing::common::TokenMapper;
use crate::token::{Tag, Token};

pub struct StringMergeMapper;

impl StringMergeMapper {
    pub fn new() -> Self {
        StringMergeMapper
    }
}

impl Default for StringMergeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMapper for StringMergeMapper {
    fn name(&self) -> &'static str {
        "string_merge"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        let mut ranges = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            if tokens[i].tag != Tag::StringLiteral {
                i += 1;
                continue;
            }
            let start = i;
            let mut end = i + 1;
            loop {
                let mut next = end;
                while next < tokens.len()
                    && matches!(tokens[next].tag, Tag::Whitespace | Tag::Newline)
                {
                    next += 1;
                }
                if next < tokens.len() && tokens[next].tag == Tag::StringLiteral {
                    end = next + 1;
                } else {
                    break;
                }
            }
            if end - start > 1 {
                ranges.push((start, end, Tag::StringLiteral));
            }
            i = end;
        }

        fold_ranges(tokens, &ranges)
    }
}
