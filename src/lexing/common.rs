//! Common lexer types: errors, modes and the token mapper interface.

use crate::diagnostics::{ErrorKind, FoldError};
use crate::token::{Location, Token};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Errors that can occur during lexing
///
/// Scanning only fails on literals and comments that run off the end of their line or file.
/// Anything else the scanner does not recognize becomes an `Unknown` token instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnterminatedString { location: Location },
    UnterminatedCharacter { location: Location },
    UnterminatedComment { location: Location },
}

impl LexError {
    pub fn location(&self) -> &Location {
        match self {
            LexError::UnterminatedString { location }
            | LexError::UnterminatedCharacter { location }
            | LexError::UnterminatedComment { location } => location,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedString { location } => {
                write!(f, "{}: unterminated string literal", location)
            }
            LexError::UnterminatedCharacter { location } => {
                write!(f, "{}: unterminated character literal", location)
            }
            LexError::UnterminatedComment { location } => {
                write!(f, "{}: unterminated block comment", location)
            }
        }
    }
}

impl std::error::Error for LexError {}

impl From<LexError> for FoldError {
    fn from(err: LexError) -> Self {
        let message = match &err {
            LexError::UnterminatedString { .. } => "unterminated string literal",
            LexError::UnterminatedCharacter { .. } => "unterminated character literal",
            LexError::UnterminatedComment { .. } => "unterminated block comment",
        };
        FoldError::new(ErrorKind::Scan, err.location().clone(), message)
    }
}

/// Which keyword set is reserved.
///
///     plain       the base language
///     extended    base language plus the object/state/macro extensions and registered
///                 construct names
///     dialect     the code-generation rule language; base keywords are ordinary words there
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LexMode {
    Plain,
    #[default]
    Extended,
    Dialect,
}

impl LexMode {
    /// Picks a mode from a file extension: `.cf` is extended, `.cfd` is dialect.
    pub fn from_path(path: &Path) -> LexMode {
        match path.extension().and_then(|e| e.to_str()) {
            Some("cf") => LexMode::Extended,
            Some("cfd") => LexMode::Dialect,
            _ => LexMode::Plain,
        }
    }

    pub fn parse(name: &str) -> Option<LexMode> {
        match name {
            "plain" => Some(LexMode::Plain),
            "extended" => Some(LexMode::Extended),
            "dialect" => Some(LexMode::Dialect),
            _ => None,
        }
    }
}

impl fmt::Display for LexMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LexMode::Plain => "plain",
            LexMode::Extended => "extended",
            LexMode::Dialect => "dialect",
        };
        f.write_str(name)
    }
}

/// A token-stream transformation.
///
/// Mappers run in a fixed order after base tokenization. Each one folds, relabels or merges
/// tokens, and never drops text.
pub trait TokenMapper {
    fn name(&self) -> &'static str;
    fn map(&mut self, tokens: Vec<Token>) -> Vec<Token>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_path() {
        assert_eq!(LexMode::from_path(Path::new("a/b.cf")), LexMode::Extended);
        assert_eq!(LexMode::from_path(Path::new("rules.cfd")), LexMode::Dialect);
        assert_eq!(LexMode::from_path(Path::new("legacy.c")), LexMode::Plain);
        assert_eq!(LexMode::from_path(Path::new("Makefile")), LexMode::Plain);
    }

    #[test]
    fn test_lex_error_into_fold_error() {
        let err = LexError::UnterminatedComment {
            location: Location::new("a.cf", 7),
        };
        let fold: FoldError = err.into();
        assert_eq!(fold.kind, ErrorKind::Scan);
        assert_eq!(fold.location.line, 7);
        assert!(fold.is_fatal());
    }
}
