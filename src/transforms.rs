//! Transform pipeline infrastructure
//!
//! A file goes through the compiler as a chain of stages, each a [Runnable] from one value to
//! the next:
//!
//! ```text
//! SourceUnit -> Tokenization -> Tokenized -> Structuring -> Compilation
//!            -> ParseFamily -> MacroExpansion -> PostOperations -> Compilation
//! ```
//!
//! Stages are composed with [Transform::then]; the compiler checks that each stage's input type
//! is the previous stage's output type. The usual chains are pre-built as statics in
//! [standard].
//!
//! ## Errors
//!
//! Diagnostics about the source never travel as `Err`: every stage records them in the
//! compilation's session and, when one is fatal, marks the compilation aborted so later stages
//! pass it through untouched. [TransformError] is reserved for a chain that cannot produce its
//! output type at all, such as a token listing of a file that does not scan.

pub mod stages;
pub mod standard;

use crate::diagnostics::{format_source_context, FoldError};
use crate::session::Session;
use crate::tree::Node;
use std::fmt;

/// Error that can occur during transformation
#[derive(Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Generic error with message
    Error(String),
    /// Stage failed with specific error
    StageFailed { stage: String, message: String },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::Error(msg) => write!(f, "{}", msg),
            TransformError::StageFailed { stage, message } => {
                write!(f, "Stage '{}' failed: {}", stage, message)
            }
        }
    }
}

impl std::error::Error for TransformError {}

impl From<String> for TransformError {
    fn from(s: String) -> Self {
        TransformError::Error(s)
    }
}

impl From<&str> for TransformError {
    fn from(s: &str) -> Self {
        TransformError::Error(s.to_string())
    }
}

/// Anything that turns an `I` into an `O`; implemented by every stage.
pub trait Runnable<I, O> {
    fn run(&self, input: I) -> Result<O, TransformError>;
}

/// A composable chain of stages from `I` to `O`.
pub struct Transform<I, O> {
    run_fn: Box<dyn Fn(I) -> Result<O, TransformError> + Send + Sync>,
}

impl<I, O> Transform<I, O> {
    /// Create a transform from a function
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(I) -> Result<O, TransformError> + Send + Sync + 'static,
    {
        Transform {
            run_fn: Box::new(f),
        }
    }

    /// Feed this transform's output into `stage`.
    pub fn then<O2, S>(self, stage: S) -> Transform<I, O2>
    where
        S: Runnable<O, O2> + Send + Sync + 'static,
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                stage.run(intermediate)
            }),
        }
    }

    /// Feed this transform's output into a pre-built static transform.
    pub fn then_transform<O2>(self, next: &'static Transform<O, O2>) -> Transform<I, O2>
    where
        I: 'static,
        O: 'static,
        O2: 'static,
    {
        let prev_run = self.run_fn;
        Transform {
            run_fn: Box::new(move |input| {
                let intermediate = prev_run(input)?;
                next.run(intermediate)
            }),
        }
    }

    pub fn run(&self, input: I) -> Result<O, TransformError> {
        (self.run_fn)(input)
    }
}

impl<I, O> Runnable<I, O> for Transform<I, O>
where
    I: 'static,
    O: 'static,
{
    fn run(&self, input: I) -> Result<O, TransformError> {
        Transform::run(self, input)
    }
}

/// The state of one file between stages once it has a tree.
#[derive(Debug)]
pub struct Compilation {
    pub session: Session,
    /// The source text, kept for diagnostics with context.
    pub source: String,
    pub root: Node,
    /// Set once a fatal error was recorded; later stages leave the compilation alone.
    pub aborted: bool,
}

impl Compilation {
    pub fn has_errors(&self) -> bool {
        !self.session.diagnostics.is_empty()
    }

    /// Record a fatal error and stop the chain for this file.
    pub fn abort(&mut self, stage: &str, error: Box<FoldError>) {
        log::warn!("{}: {} aborted: {}", self.session.file, stage, error);
        self.session.report(error);
        self.aborted = true;
    }

    /// The diagnostics, sorted by file then line, honoring the diagnostics configuration.
    pub fn render_diagnostics(&self) -> String {
        let config = &self.session.config.diagnostics;
        if !config.show_source {
            return self.session.diagnostics.render(config.max_errors);
        }
        let sorted = self.session.diagnostics.sorted();
        let shown = match config.max_errors {
            0 => sorted.len(),
            limit => limit.min(sorted.len()),
        };
        let mut out = String::new();
        for error in &sorted[..shown] {
            out.push_str(&format!("{}\n", error));
            out.push_str(&format_source_context(&self.source, error.location.line));
        }
        if shown < sorted.len() {
            out.push_str(&format!("... and {} more\n", sorted.len() - shown));
        }
        out
    }
}
