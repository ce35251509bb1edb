//! Reserved words per lexing mode
//!
//!     Each keyword carries the set of modes it is reserved in. `default` is the only word
//!     reserved everywhere: the base language uses it in switch statements and the dialect
//!     language uses it for fallback rules.

use crate::lexing::common::LexMode;
use crate::token::Tag;
use once_cell::sync::Lazy;
use std::collections::HashMap;

const PLAIN: u8 = 0b001;
const EXTENDED: u8 = 0b010;
const DIALECT: u8 = 0b100;
const BASE: u8 = PLAIN | EXTENDED;

pub static KEYWORDS: &[(&str, Tag, u8)] = &[
    ("auto", Tag::Auto, BASE),
    ("break", Tag::Break, BASE),
    ("case", Tag::Case, BASE),
    ("char", Tag::Char, BASE),
    ("const", Tag::Const, BASE),
    ("continue", Tag::Continue, BASE),
    ("default", Tag::Default, BASE | DIALECT),
    ("do", Tag::Do, BASE),
    ("double", Tag::Double, BASE),
    ("else", Tag::Else, BASE),
    ("enum", Tag::Enum, BASE),
    ("extern", Tag::Extern, BASE),
    ("float", Tag::Float, BASE),
    ("for", Tag::For, BASE),
    ("goto", Tag::Goto, BASE),
    ("if", Tag::If, BASE),
    ("inline", Tag::Inline, BASE),
    ("int", Tag::Int, BASE),
    ("long", Tag::Long, BASE),
    ("register", Tag::Register, BASE),
    ("return", Tag::Return, BASE),
    ("short", Tag::Short, BASE),
    ("signed", Tag::Signed, BASE),
    ("sizeof", Tag::Sizeof, BASE),
    ("static", Tag::Static, BASE),
    ("struct", Tag::Struct, BASE),
    ("switch", Tag::Switch, BASE),
    ("typedef", Tag::Typedef, BASE),
    ("union", Tag::Union, BASE),
    ("unsigned", Tag::Unsigned, BASE),
    ("void", Tag::Void, BASE),
    ("volatile", Tag::Volatile, BASE),
    ("while", Tag::While, BASE),
    ("object", Tag::Object, EXTENDED),
    ("state", Tag::State, EXTENDED),
    ("macro", Tag::Macro, EXTENDED),
    ("expand", Tag::Expand, EXTENDED),
    ("public", Tag::Public, EXTENDED),
    ("private", Tag::Private, EXTENDED),
    ("protected", Tag::Protected, EXTENDED),
    ("virtual", Tag::Virtual, EXTENDED),
    ("dialect", Tag::Dialect, DIALECT),
    ("construct", Tag::Construct, DIALECT),
    ("note", Tag::Note, DIALECT),
    ("map", Tag::Map, DIALECT),
];

static BY_TEXT: Lazy<HashMap<&'static str, (Tag, u8)>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .map(|(text, tag, modes)| (*text, (*tag, *modes)))
        .collect()
});

static BY_TAG: Lazy<HashMap<Tag, &'static str>> =
    Lazy::new(|| KEYWORDS.iter().map(|(text, tag, _)| (*tag, *text)).collect());

fn mode_bit(mode: LexMode) -> u8 {
    match mode {
        LexMode::Plain => PLAIN,
        LexMode::Extended => EXTENDED,
        LexMode::Dialect => DIALECT,
    }
}

/// The keyword tag for `text`, if it is reserved in `mode`.
pub fn keyword(text: &str, mode: LexMode) -> Option<Tag> {
    BY_TEXT
        .get(text)
        .filter(|(_, modes)| modes & mode_bit(mode) != 0)
        .map(|(tag, _)| *tag)
}

pub fn keyword_text(tag: Tag) -> Option<&'static str> {
    BY_TAG.get(&tag).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_keywords_in_both_source_modes() {
        assert_eq!(keyword("while", LexMode::Plain), Some(Tag::While));
        assert_eq!(keyword("while", LexMode::Extended), Some(Tag::While));
        assert_eq!(keyword("while", LexMode::Dialect), None);
    }

    #[test]
    fn test_extension_keywords_only_in_extended_mode() {
        assert_eq!(keyword("object", LexMode::Extended), Some(Tag::Object));
        assert_eq!(keyword("object", LexMode::Plain), None);
        assert_eq!(keyword("macro", LexMode::Dialect), None);
    }

    #[test]
    fn test_dialect_keywords() {
        assert_eq!(keyword("note", LexMode::Dialect), Some(Tag::Note));
        assert_eq!(keyword("note", LexMode::Extended), None);
        assert_eq!(keyword("default", LexMode::Dialect), Some(Tag::Default));
    }

    #[test]
    fn test_keyword_text() {
        assert_eq!(keyword_text(Tag::Typedef), Some("typedef"));
        assert_eq!(keyword_text(Tag::Semicolon), None);
    }
}
