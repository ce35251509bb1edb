//! Source loading
//!
//! `SourceLoader` reads one input, from a file or a string, and runs the standard transforms
//! on it. It is used by the command line driver and by the integration tests.
//!
//! ```rust,ignore
//! use cfold::loader::SourceLoader;
//!
//! let compilation = SourceLoader::from_path("widgets.cf")?.compile()?;
//! let tokens = SourceLoader::from_string("t.cf", "int x;\n").tokenize()?;
//! ```

use crate::config::FoldConfig;
use crate::lexing::LexMode;
use crate::registry::ConstructRegistry;
use crate::token::Token;
use crate::transforms::stages::{SourceUnit, Structuring, Tokenization};
use crate::transforms::standard::{pipeline_for, FRONT_END, TOKENS};
use crate::transforms::{Compilation, Runnable, Transform, TransformError};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Error that can occur when loading sources
#[derive(Debug, Clone)]
pub enum LoaderError {
    /// IO error when reading file
    IoError(String),
    /// Transform error
    TransformError(TransformError),
}

impl std::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderError::IoError(msg) => write!(f, "IO error: {}", msg),
            LoaderError::TransformError(err) => write!(f, "Transform error: {}", err),
        }
    }
}

impl std::error::Error for LoaderError {}

impl From<std::io::Error> for LoaderError {
    fn from(err: std::io::Error) -> Self {
        LoaderError::IoError(err.to_string())
    }
}

impl From<TransformError> for LoaderError {
    fn from(err: TransformError) -> Self {
        LoaderError::TransformError(err)
    }
}

/// One loaded source plus the settings it will be compiled with.
pub struct SourceLoader {
    unit: SourceUnit,
}

impl SourceLoader {
    /// Load from a file path; the path is also the logical file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| LoaderError::IoError(format!("{}: {}", path.display(), e)))?;
        Ok(SourceLoader {
            unit: SourceUnit::new(path.display().to_string(), text),
        })
    }

    pub fn from_string(file: &str, source: impl Into<String>) -> Self {
        SourceLoader {
            unit: SourceUnit::new(file, source),
        }
    }

    pub fn with_mode(mut self, mode: LexMode) -> Self {
        self.unit = self.unit.with_mode(mode);
        self
    }

    pub fn with_config(mut self, config: Arc<FoldConfig>) -> Self {
        self.unit = self.unit.with_config(config);
        self
    }

    pub fn with_registry(mut self, registry: Arc<dyn ConstructRegistry + Send + Sync>) -> Self {
        self.unit = self.unit.with_registry(registry);
        self
    }

    pub fn mode(&self) -> LexMode {
        self.unit.mode()
    }

    pub fn source(&self) -> &str {
        &self.unit.text
    }

    /// Run a custom transform on the source
    pub fn with<O: 'static>(&self, transform: &Transform<SourceUnit, O>) -> Result<O, LoaderError> {
        Ok(transform.run(self.unit.clone())?)
    }

    /// The lexed token list.
    pub fn tokenize(&self) -> Result<Vec<Token>, LoaderError> {
        self.with(&TOKENS)
    }

    /// Tokenized and structured, nothing parsed yet.
    pub fn structure(&self) -> Result<Compilation, LoaderError> {
        let tokenized = Tokenization::new().run(self.unit.clone())?;
        Ok(Structuring::new().run(tokenized)?)
    }

    /// Parsed, with macro call sites still in place.
    pub fn parse(&self) -> Result<Compilation, LoaderError> {
        self.with(&FRONT_END)
    }

    /// The full pipeline for the source's mode.
    pub fn compile(&self) -> Result<Compilation, LoaderError> {
        self.with(pipeline_for(self.mode()))
    }
}
