//! The operator symbol table and maximal munch
//!
//!     The scanner emits punctuation one character at a time. Runs of adjacent punctuation are
//!     then split here, greedily: take the longest prefix of the run that is a known symbol,
//!     backing off one character at a time until the table recognizes it. The table below is the
//!     single source of truth for which multi-character operators exist, so `a<<=b` yields `<<=`
//!     and `>>>` yields `>>` then `>`.

use crate::token::Tag;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Every symbol the lexer knows, with the tag it produces.
pub static SYMBOLS: &[(&str, Tag)] = &[
    ("...", Tag::Ellipsis),
    ("<<=", Tag::ShlAssign),
    (">>=", Tag::ShrAssign),
    ("::", Tag::Scope),
    ("->", Tag::Arrow),
    ("=>", Tag::FatArrow),
    ("++", Tag::Increment),
    ("--", Tag::Decrement),
    ("<<", Tag::Shl),
    (">>", Tag::Shr),
    ("<=", Tag::LessEq),
    (">=", Tag::GreaterEq),
    ("==", Tag::EqEq),
    ("!=", Tag::NotEq),
    ("&&", Tag::AndAnd),
    ("||", Tag::OrOr),
    ("+=", Tag::PlusAssign),
    ("-=", Tag::MinusAssign),
    ("*=", Tag::StarAssign),
    ("/=", Tag::SlashAssign),
    ("%=", Tag::PercentAssign),
    ("&=", Tag::AmpAssign),
    ("|=", Tag::PipeAssign),
    ("^=", Tag::CaretAssign),
    ("##", Tag::Concat),
    ("+", Tag::Plus),
    ("-", Tag::Minus),
    ("*", Tag::Star),
    ("/", Tag::Slash),
    ("%", Tag::Percent),
    ("=", Tag::Assign),
    ("<", Tag::Less),
    (">", Tag::Greater),
    ("!", Tag::Bang),
    ("~", Tag::Tilde),
    ("&", Tag::Amp),
    ("|", Tag::Pipe),
    ("^", Tag::Caret),
    ("?", Tag::Question),
    (":", Tag::Colon),
    (";", Tag::Semicolon),
    (",", Tag::Comma),
    (".", Tag::Dot),
    ("(", Tag::LParen),
    (")", Tag::RParen),
    ("[", Tag::LBracket),
    ("]", Tag::RBracket),
    ("{", Tag::LBrace),
    ("}", Tag::RBrace),
    ("#", Tag::Hash),
    ("@", Tag::At),
    ("$", Tag::Dollar),
    ("\\", Tag::Backslash),
];

static BY_TEXT: Lazy<HashMap<&'static str, Tag>> =
    Lazy::new(|| SYMBOLS.iter().map(|(text, tag)| (*text, *tag)).collect());

static BY_TAG: Lazy<HashMap<Tag, &'static str>> =
    Lazy::new(|| SYMBOLS.iter().map(|(text, tag)| (*tag, *text)).collect());

static LONGEST: Lazy<usize> =
    Lazy::new(|| SYMBOLS.iter().map(|(text, _)| text.len()).max().unwrap_or(1));

pub fn symbol_tag(text: &str) -> Option<Tag> {
    BY_TEXT.get(text).copied()
}

pub fn symbol_text(tag: Tag) -> Option<&'static str> {
    BY_TAG.get(&tag).copied()
}

/// Split a run of punctuation into symbols by maximal munch.
///
/// # Algorithm
///
///     At each offset, try the longest candidate first (bounded by the longest table entry and
///     the remaining run), shortening one character at a time until the table has it. A single
///     character the table does not know becomes an `Unknown` piece so that no text is lost.
pub fn split_symbols(run: &str) -> Vec<(&str, Tag)> {
    let mut pieces = Vec::new();
    let mut offset = 0;

    while offset < run.len() {
        let rest = &run[offset..];
        let mut width = (*LONGEST).min(rest.len());
        let mut found = None;

        while width > 0 {
            if rest.is_char_boundary(width) {
                if let Some(tag) = symbol_tag(&rest[..width]) {
                    found = Some((width, tag));
                    break;
                }
            }
            width -= 1;
        }

        let (width, tag) = found.unwrap_or_else(|| {
            let width = rest.chars().next().map(char::len_utf8).unwrap_or(1);
            (width, Tag::Unknown)
        });
        pieces.push((&rest[..width], tag));
        offset += width;
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(run: &str) -> Vec<Tag> {
        split_symbols(run).into_iter().map(|(_, tag)| tag).collect()
    }

    #[test]
    fn test_longest_match_wins() {
        assert_eq!(tags("<<="), vec![Tag::ShlAssign]);
        assert_eq!(tags("::"), vec![Tag::Scope]);
        assert_eq!(tags("->"), vec![Tag::Arrow]);
    }

    #[test]
    fn test_backs_off_one_character_at_a_time() {
        assert_eq!(tags(">>>"), vec![Tag::Shr, Tag::Greater]);
        assert_eq!(tags("-->"), vec![Tag::Decrement, Tag::Greater]);
        assert_eq!(tags(".."), vec![Tag::Dot, Tag::Dot]);
        assert_eq!(tags("%%"), vec![Tag::Percent, Tag::Percent]);
    }

    #[test]
    fn test_brackets_never_merge() {
        assert_eq!(
            tags("();"),
            vec![Tag::LParen, Tag::RParen, Tag::Semicolon]
        );
    }

    #[test]
    fn test_pieces_cover_the_run() {
        let run = "<<=>>&&||##";
        let joined: String = split_symbols(run).into_iter().map(|(t, _)| t).collect();
        assert_eq!(joined, run);
    }

    #[test]
    fn test_symbol_lookup_both_ways() {
        assert_eq!(symbol_tag("=="), Some(Tag::EqEq));
        assert_eq!(symbol_text(Tag::Concat), Some("##"));
        assert_eq!(symbol_text(Tag::Identifier), None);
    }
}
