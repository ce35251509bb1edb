//! Tokenization stage
//!
//! Opens the file's session and lexes its text. A scan error is fatal: it is recorded and the
//! file continues down the chain as an aborted compilation with no tokens.

use crate::config::FoldConfig;
use crate::diagnostics::FoldError;
use crate::lexing::{LexMode, Lexer};
use crate::registry::{ConstructRegistry, NoConstructs};
use crate::session::Session;
use crate::token::Token;
use crate::transforms::{Runnable, TransformError};
use std::path::Path;
use std::sync::Arc;

/// One input file: its logical name, its text and how to read it.
#[derive(Clone)]
pub struct SourceUnit {
    pub file: Arc<str>,
    pub text: String,
    /// Forced mode; otherwise the configuration and the file extension decide.
    pub mode: Option<LexMode>,
    pub config: Arc<FoldConfig>,
    pub registry: Arc<dyn ConstructRegistry + Send + Sync>,
}

impl SourceUnit {
    pub fn new(file: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        SourceUnit {
            file: file.into(),
            text: text.into(),
            mode: None,
            config: Arc::new(FoldConfig::default()),
            registry: Arc::new(NoConstructs),
        }
    }

    pub fn with_mode(mut self, mode: LexMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_config(mut self, config: Arc<FoldConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn ConstructRegistry + Send + Sync>) -> Self {
        self.registry = registry;
        self
    }

    pub fn mode(&self) -> LexMode {
        self.mode
            .unwrap_or_else(|| self.config.mode_for(Path::new(&*self.file)))
    }
}

/// A lexed file, before structuring.
#[derive(Debug)]
pub struct Tokenized {
    pub session: Session,
    pub source: String,
    pub tokens: Vec<Token>,
    pub aborted: bool,
}

pub struct Tokenization;

impl Tokenization {
    pub fn new() -> Self {
        Tokenization
    }
}

impl Default for Tokenization {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<SourceUnit, Tokenized> for Tokenization {
    fn run(&self, unit: SourceUnit) -> Result<Tokenized, TransformError> {
        let mode = unit.mode();
        let mut session = Session::new(unit.file.clone(), mode, unit.config.clone());
        let lexer = Lexer::new(mode).with_registry(unit.registry.clone());
        let (tokens, aborted) = match lexer.lex(&unit.file, &unit.text) {
            Ok(tokens) => {
                log::debug!("{}: {} tokens ({} mode)", unit.file, tokens.len(), mode);
                (tokens, false)
            }
            Err(err) => {
                log::warn!("{}: tokenization aborted: {}", unit.file, err);
                session.report(Box::new(FoldError::from(err)));
                (Vec::new(), true)
            }
        };
        Ok(Tokenized {
            session,
            source: unit.text,
            tokens,
            aborted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    #[test]
    fn test_mode_follows_extension() {
        assert_eq!(SourceUnit::new("a.cf", "").mode(), LexMode::Extended);
        assert_eq!(SourceUnit::new("a.cfd", "").mode(), LexMode::Dialect);
        assert_eq!(SourceUnit::new("a.c", "").mode(), LexMode::Plain);
        assert_eq!(
            SourceUnit::new("a.c", "").with_mode(LexMode::Extended).mode(),
            LexMode::Extended
        );
    }

    #[test]
    fn test_tokens_keep_the_source() {
        let out = Tokenization::new()
            .run(SourceUnit::new("a.cf", "int x;\n"))
            .unwrap();
        assert!(!out.aborted);
        let text: String = out.tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, "int x;\n");
    }

    #[test]
    fn test_scan_error_aborts() {
        let out = Tokenization::new()
            .run(SourceUnit::new("a.cf", "int x; /* open"))
            .unwrap();
        assert!(out.aborted);
        assert!(out.tokens.is_empty());
        let errors: Vec<_> = out.session.diagnostics.iter().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Scan);
    }
}
