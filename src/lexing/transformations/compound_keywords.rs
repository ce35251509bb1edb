//! Two-token keyword merge
//!
//!     The dialect language separates sections with `%%`. The symbol table has no `%%` entry, so
//!     munch leaves two `%` tokens; in dialect mode they are merged into a SectionBreak here.

use super::fold_ranges;
use crate::lexing::common::{LexMode, TokenMapper};
use crate::token::{Tag, Token};

pub struct CompoundKeywordMapper {
    mode: LexMode,
}

impl CompoundKeywordMapper {
    pub fn new(mode: LexMode) -> Self {
        CompoundKeywordMapper { mode }
    }
}

impl TokenMapper for CompoundKeywordMapper {
    fn name(&self) -> &'static str {
        "compound_keywords"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        if self.mode != LexMode::Dialect {
            return tokens;
        }
        let mut ranges = Vec::new();
        let mut i = 0;
        while i + 1 < tokens.len() {
            if tokens[i].tag == Tag::Percent && tokens[i + 1].tag == Tag::Percent {
                ranges.push((i, i + 2, Tag::SectionBreak));
                i += 2;
            } else {
                i += 1;
            }
        }
        fold_ranges(tokens, &ranges)
    }
}
