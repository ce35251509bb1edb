//! Keyword relabeling
//!
//!     Identifiers that are reserved in the current lexing mode take their keyword tag. In
//!     extended mode, identifiers the construct registry knows become ConstructName tokens.
//!     Keywords win over construct names.

use crate::lexing::common::{LexMode, TokenMapper};
use crate::lexing::keywords::keyword;
use crate::registry::ConstructRegistry;
use crate::token::{Tag, Token};
use std::sync::Arc;

pub struct KeywordRelabelMapper {
    mode: LexMode,
    registry: Arc<dyn ConstructRegistry + Send + Sync>,
}

impl KeywordRelabelMapper {
    pub fn new(mode: LexMode, registry: Arc<dyn ConstructRegistry + Send + Sync>) -> Self {
        KeywordRelabelMapper { mode, registry }
    }
}

impl TokenMapper for KeywordRelabelMapper {
    fn name(&self) -> &'static str {
        "keyword_relabel"
    }

    fn map(&mut self, mut tokens: Vec<Token>) -> Vec<Token> {
        for token in tokens.iter_mut().filter(|t| t.tag == Tag::Identifier) {
            if let Some(tag) = keyword(&token.text, self.mode) {
                token.tag = tag;
            } else if self.mode == LexMode::Extended && self.registry.is_construct(&token.text) {
                token.tag = Tag::ConstructName;
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::base_tokenization::tokenize;
    use crate::registry::{DialectRegistry, NoConstructs};

    fn run(source: &str, mode: LexMode, registry: Arc<dyn ConstructRegistry + Send + Sync>) -> Vec<Tag> {
        let tokens = tokenize(source, &Arc::from("t.cf")).unwrap();
        KeywordRelabelMapper::new(mode, registry)
            .map(tokens)
            .into_iter()
            .filter(|t| !t.tag.is_trivia())
            .map(|t| t.tag)
            .collect()
    }

    #[test]
    fn test_mode_sensitive_keywords() {
        let none: Arc<dyn ConstructRegistry + Send + Sync> = Arc::new(NoConstructs);
        assert_eq!(
            run("object while note", LexMode::Extended, none.clone()),
            vec![Tag::Object, Tag::While, Tag::Identifier]
        );
        assert_eq!(
            run("object while note", LexMode::Plain, none.clone()),
            vec![Tag::Identifier, Tag::While, Tag::Identifier]
        );
        assert_eq!(
            run("object while note", LexMode::Dialect, none),
            vec![Tag::Identifier, Tag::Identifier, Tag::Note]
        );
    }

    #[test]
    fn test_construct_names_only_in_extended_mode() {
        let registry: Arc<dyn ConstructRegistry + Send + Sync> =
            Arc::new(DialectRegistry::with_names(["widget"]));
        assert_eq!(
            run("widget w", LexMode::Extended, registry.clone()),
            vec![Tag::ConstructName, Tag::Identifier]
        );
        assert_eq!(
            run("widget w", LexMode::Plain, registry),
            vec![Tag::Identifier, Tag::Identifier]
        );
    }
}
