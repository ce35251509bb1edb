//! Base tokenization
//!
//! This module provides the raw tokenization using the logos lexer library. This is the entry
//! point where source strings become token streams; everything after it is a transformation of
//! the stream.
//!
//! Recognition order
//!
//!     Overlapping patterns resolve by longest match, which gives the required precedence:
//!     newline, block comment, line comment, quoted literals, whitespace runs, punctuation,
//!     hexadecimal, decimal and floating literals, identifiers. Punctuation is scanned one
//!     character at a time so that comment openers always win; adjacent punctuation is then
//!     re-joined and split by maximal munch against the symbol table.
//!
//!     Characters no pattern accepts become `Unknown` tokens. The only scan failures are quoted
//!     literals and block comments that never close.

use crate::lexing::common::LexError;
use crate::lexing::symbols::split_symbols;
use crate::token::{Location, Tag, Token};
use logos::Logos;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScanFailure {
    #[default]
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedCharacter,
    UnterminatedComment,
}

/// Raw tokens as produced by logos, before symbol splitting.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = ScanFailure)]
pub enum RawToken {
    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[token("\"", string_literal)]
    StringLiteral,

    #[token("'", char_literal)]
    CharLiteral,

    #[regex(r"[ \t\x0B\x0C]+")]
    Whitespace,

    #[regex(r"[!%&*+\-/<=>?^|~.,:;()\[\]{}#@$\\]")]
    Punct,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    Hex,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]*|\.[0-9]+")]
    Float,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
}

impl RawToken {
    fn tag(self) -> Tag {
        match self {
            RawToken::Newline => Tag::Newline,
            RawToken::BlockComment => Tag::BlockComment,
            RawToken::LineComment => Tag::LineComment,
            RawToken::StringLiteral => Tag::StringLiteral,
            RawToken::CharLiteral => Tag::CharLiteral,
            RawToken::Whitespace => Tag::Whitespace,
            RawToken::Punct => Tag::Unknown,
            RawToken::Hex => Tag::HexLiteral,
            RawToken::Integer => Tag::IntLiteral,
            RawToken::Float => Tag::FloatLiteral,
            RawToken::Identifier => Tag::Identifier,
        }
    }
}

fn block_comment(lex: &mut logos::Lexer<RawToken>) -> Result<(), ScanFailure> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => Err(ScanFailure::UnterminatedComment),
    }
}

fn string_literal(lex: &mut logos::Lexer<RawToken>) -> Result<(), ScanFailure> {
    quoted(lex, '"', ScanFailure::UnterminatedString)
}

fn char_literal(lex: &mut logos::Lexer<RawToken>) -> Result<(), ScanFailure> {
    quoted(lex, '\'', ScanFailure::UnterminatedCharacter)
}

/// Scan to the closing quote. A backslash escapes the next character, including a line break,
/// so continued literals stay one token; an unescaped line break ends the search.
fn quoted(
    lex: &mut logos::Lexer<RawToken>,
    quote: char,
    failure: ScanFailure,
) -> Result<(), ScanFailure> {
    let mut chars = lex.remainder().char_indices().peekable();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                if let Some((_, '\r')) = chars.next() {
                    chars.next_if(|(_, c)| *c == '\n');
                }
            }
            '\n' | '\r' => return Err(failure),
            c if c == quote => {
                lex.bump(offset + c.len_utf8());
                return Ok(());
            }
            _ => {}
        }
    }
    Err(failure)
}

/// Number of line breaks in `text`, counting `\r\n` once.
pub fn line_breaks(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut count = 0;
    for (i, b) in bytes.iter().enumerate() {
        match b {
            b'\n' => count += 1,
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => count += 1,
            _ => {}
        }
    }
    count
}

/// Tokenize source code with location information
///
/// Every byte of `source` ends up in exactly one token, so concatenating the token texts gives
/// the source back. Each token is stamped with `file` and the line its first byte is on.
pub fn tokenize(source: &str, file: &Arc<str>) -> Result<Vec<Token>, LexError> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut line: u32 = 1;
    let mut punct_run: Option<(usize, usize)> = None;
    let mut unknown_run: Option<(usize, usize)> = None;

    while let Some(result) = lexer.next() {
        let span = lexer.span();

        match result {
            Ok(RawToken::Punct) => {
                flush_unknown(source, &mut unknown_run, file, line, &mut tokens);
                punct_run = match punct_run {
                    Some((start, _)) => Some((start, span.end)),
                    None => Some((span.start, span.end)),
                };
                continue;
            }
            Err(ScanFailure::UnexpectedCharacter) => {
                flush_punct(source, &mut punct_run, file, line, &mut tokens);
                unknown_run = match unknown_run {
                    Some((start, _)) => Some((start, span.end)),
                    None => Some((span.start, span.end)),
                };
                continue;
            }
            _ => {}
        }

        flush_punct(source, &mut punct_run, file, line, &mut tokens);
        flush_unknown(source, &mut unknown_run, file, line, &mut tokens);
        let location = Location {
            file: file.clone(),
            line,
        };

        match result {
            Ok(raw) => {
                let text = &source[span];
                tokens.push(Token::new(raw.tag(), text, location));
                line += line_breaks(text);
            }
            Err(ScanFailure::UnterminatedString) => {
                return Err(LexError::UnterminatedString { location })
            }
            Err(ScanFailure::UnterminatedCharacter) => {
                return Err(LexError::UnterminatedCharacter { location })
            }
            Err(_) => return Err(LexError::UnterminatedComment { location }),
        }
    }

    flush_punct(source, &mut punct_run, file, line, &mut tokens);
    flush_unknown(source, &mut unknown_run, file, line, &mut tokens);
    Ok(tokens)
}

fn flush_punct(
    source: &str,
    run: &mut Option<(usize, usize)>,
    file: &Arc<str>,
    line: u32,
    tokens: &mut Vec<Token>,
) {
    if let Some((start, end)) = run.take() {
        for (text, tag) in split_symbols(&source[start..end]) {
            tokens.push(Token::new(tag, text, Location::new(file.clone(), line)));
        }
    }
}

fn flush_unknown(
    source: &str,
    run: &mut Option<(usize, usize)>,
    file: &Arc<str>,
    line: u32,
    tokens: &mut Vec<Token>,
) {
    if let Some((start, end)) = run.take() {
        for c in source[start..end].chars() {
            tokens.push(Token::new(
                Tag::Unknown,
                c.to_string(),
                Location::new(file.clone(), line),
            ));
        }
    }
}
