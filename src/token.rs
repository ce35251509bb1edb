//! Token types shared by the lexer and the tree.
//!
//!     A token is the lexer's view of a terminal: a tag, the exact source text it covers and the
//!     location of its first byte. Tokens never lose text. Every lexer transformation that folds
//!     several tokens into one concatenates their text, so the flat stream always prints back to
//!     the original source byte for byte.

pub mod location;
pub mod tag;

pub use location::Location;
pub use tag::Tag;

/// A lexical terminal before it becomes a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub tag: Tag,
    pub text: String,
    pub location: Location,
}

impl Token {
    pub fn new(tag: Tag, text: impl Into<String>, location: Location) -> Self {
        Token {
            tag,
            text: text.into(),
            location,
        }
    }

    /// Fold a run of tokens into one token carrying all of their text.
    ///
    /// The merged token takes the location of the first token of the run. An empty run yields
    /// an empty token at a synthetic location.
    pub fn merge(run: &[Token], tag: Tag) -> Token {
        let location = run
            .first()
            .map(|t| t.location.clone())
            .unwrap_or_else(Location::synthetic);
        let text: String = run.iter().map(|t| t.text.as_str()).collect();
        Token::new(tag, text, location)
    }
}
