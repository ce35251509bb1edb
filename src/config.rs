//! Configuration
//!
//! `defaults/cfold.default.yaml` is embedded into the binary so that documentation and runtime
//! behavior stay in sync. Callers layer user files and single-key overrides on top of those
//! defaults via [`ConfigLoader`] before deserializing into [`FoldConfig`].

use crate::lexing::LexMode;
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use ::config::ConfigError;

const DEFAULT_YAML: &str = include_str!("../defaults/cfold.default.yaml");

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldConfig {
    pub lexing: LexingConfig,
    pub parsing: ParsingConfig,
    pub expansion: ExpansionConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexingConfig {
    /// Forced lexing mode; `None` picks by file extension.
    pub mode: Option<LexMode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsingConfig {
    pub max_nesting: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionConfig {
    pub max_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    pub max_errors: usize,
    pub show_source: bool,
}

impl FoldConfig {
    /// The lexing mode for `path`: the configured one, or the one its extension implies.
    pub fn mode_for(&self, path: &Path) -> LexMode {
        self.lexing.mode.unwrap_or_else(|| LexMode::from_path(path))
    }
}

impl Default for FoldConfig {
    fn default() -> Self {
        FoldConfig {
            lexing: LexingConfig { mode: None },
            parsing: ParsingConfig { max_nesting: 256 },
            expansion: ExpansionConfig { max_depth: 64 },
            diagnostics: DiagnosticsConfig {
                max_errors: 0,
                show_source: false,
            },
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
}

impl ConfigLoader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_YAML, FileFormat::Yaml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Yaml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Yaml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer configuration text directly.
    pub fn with_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Apply a single dotted key override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<FoldConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<FoldConfig, ConfigError> {
    ConfigLoader::new().build()
}
