//! Numeric literal folding
//!
//!     The scanner stops numbers at the first letter, so `10u`, `0xFFul` and `1e-3f` arrive in
//!     pieces. Two mappers put them back together:
//!
//!         NumericSuffixMapper   literal + suffix word (`u`, `l`, `ul`, `f`, ...) -> literal
//!         ExponentMapper        literal + `e10` / `e` sign digits               -> FloatLiteral
//!
//!     Suffixes attach first so the exponent mapper can take `e` `-` `3f` as one exponent.

use super::fold_ranges;
use crate::lexing::common::TokenMapper;
use crate::token::{Tag, Token};
use once_cell::sync::Lazy;
use regex::Regex;

static SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[uUlLfF]{1,3}$").unwrap());
static GLUED_EXPONENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[eE][0-9]+[fFlL]?$").unwrap());
static BARE_EXPONENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[eE]$").unwrap());
static EXPONENT_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+[fFlL]?$").unwrap());

fn is_number(tag: Tag) -> bool {
    matches!(tag, Tag::IntLiteral | Tag::HexLiteral | Tag::FloatLiteral)
}

pub struct NumericSuffixMapper;

impl NumericSuffixMapper {
    pub fn new() -> Self {
        NumericSuffixMapper
    }
}

impl Default for NumericSuffixMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMapper for NumericSuffixMapper {
    fn name(&self) -> &'static str {
        "numeric_suffix"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        let mut ranges = Vec::new();
        let mut i = 0;
        while i + 1 < tokens.len() {
            let (number, word) = (&tokens[i], &tokens[i + 1]);
            if is_number(number.tag) && word.tag == Tag::Identifier && SUFFIX.is_match(&word.text)
            {
                ranges.push((i, i + 2, number.tag));
                i += 2;
            } else {
                i += 1;
            }
        }
        fold_ranges(tokens, &ranges)
    }
}

pub struct ExponentMapper;

impl ExponentMapper {
    pub fn new() -> Self {
        ExponentMapper
    }
}

impl Default for ExponentMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenMapper for ExponentMapper {
    fn name(&self) -> &'static str {
        "exponent"
    }

    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token> {
        let mut ranges = Vec::new();
        let mut i = 0;
        while i + 1 < tokens.len() {
            let mantissa = &tokens[i];
            if !matches!(mantissa.tag, Tag::IntLiteral | Tag::FloatLiteral) {
                i += 1;
                continue;
            }
            let next = &tokens[i + 1];
            if next.tag == Tag::Identifier && GLUED_EXPONENT.is_match(&next.text) {
                ranges.push((i, i + 2, Tag::FloatLiteral));
                i += 2;
                continue;
            }
            if next.tag == Tag::Identifier
                && BARE_EXPONENT.is_match(&next.text)
                && i + 3 < tokens.len()
                && matches!(tokens[i + 2].tag, Tag::Plus | Tag::Minus)
                && tokens[i + 3].tag == Tag::IntLiteral
                && EXPONENT_DIGITS.is_match(&tokens[i + 3].text)
            {
                ranges.push((i, i + 4, Tag::FloatLiteral));
                i += 4;
                continue;
            }
            i += 1;
        }
        fold_ranges(tokens, &ranges)
    }
}
