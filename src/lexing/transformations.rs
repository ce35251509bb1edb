//! Token stream transformations
//!
//!     Each transformation is a `TokenMapper` that rewrites the flat stream in one left-to-right
//!     sweep. They run in a fixed order after base tokenization:
//!
//!         1. directives           `#` + word at line start  -> Directive
//!         2. string_merge         adjacent string literals  -> one StringLiteral
//!         3. keyword_relabel      identifiers               -> keywords / construct names
//!         4. numeric              literal + type suffix     -> one literal
//!         5. continuation         `\` + newline             -> Continuation
//!         6. numeric (exponent)   literal + exponent        -> FloatLiteral
//!         7. wide_strings         `L"..."`, `u8"..."`       -> WideStringLiteral
//!         8. compound_keywords    `%` `%` in dialect mode   -> SectionBreak
//!
//!     The order matters: directive folding must see `if` and `else` as plain words, so it runs
//!     before keyword relabeling; exponent folding relies on suffixes already being attached.

pub mod compound_keywords;
pub mod continuation;
pub mod directives;
pub mod keyword_relabel;
pub mod numeric;
pub mod string_merge;
pub mod wide_strings;

pub use compound_keywords::CompoundKeywordMapper;
pub use continuation::LineContinuationMapper;
pub use directives::DirectiveMapper;
pub use keyword_relabel::KeywordRelabelMapper;
pub use numeric::{ExponentMapper, NumericSuffixMapper};
pub use string_merge::StringMergeMapper;
pub use wide_strings::WideStringMapper;

use crate::token::{Tag, Token};

/// Index of the first token at or after `from` that is not horizontal whitespace.
pub(crate) fn skip_blanks(tokens: &[Token], from: usize) -> usize {
    let mut i = from;
    while i < tokens.len() && tokens[i].tag.is_blank() {
        i += 1;
    }
    i
}

/// Replace each `(start, end, tag)` range of `tokens` by the merge of that range.
///
/// Ranges must be sorted, non-empty and must not overlap.
pub(crate) fn fold_ranges(tokens: Vec<Token>, ranges: &[(usize, usize, Tag)]) -> Vec<Token> {
    if ranges.is_empty() {
        return tokens;
    }
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending: Vec<Token> = Vec::new();
    let mut ranges = ranges.iter().peekable();

    for (i, token) in tokens.into_iter().enumerate() {
        if let Some(&&(start, end, tag)) = ranges.peek() {
            if i >= start && i < end {
                pending.push(token);
                if i + 1 == end {
                    out.push(Token::merge(&pending, tag));
                    pending.clear();
                    ranges.next();
                }
                continue;
            }
        }
        out.push(token);
    }
    out
}
