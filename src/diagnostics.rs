//! Errors and the ordered error list
//!
//!     Every failure in the core is a `FoldError`: a kind, a location and a message. The kind
//!     decides how far the error travels:
//!
//!         Scan, Structure     fatal for the file; raised before any grammar runs
//!         Parse               recorded at the nearest phase boundary; fails that sub-tree only
//!         Expansion           recorded; aborts only the macro expansion chain it came from
//!         Resource            nesting ceiling exceeded; fatal for the file
//!         Internal            a broken invariant; always fatal
//!
//!     Recoverable errors are pushed into `Diagnostics`, which accumulates them for the whole
//!     run and hands them out sorted by file, then line. The sort is stable, so errors raised on
//!     the same line keep the order they were found in.

use crate::token::Location;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Scan,
    Structure,
    Parse,
    Expansion,
    Resource,
    Internal,
}

impl ErrorKind {
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            ErrorKind::Scan | ErrorKind::Structure | ErrorKind::Resource | ErrorKind::Internal
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Scan => "scan error",
            ErrorKind::Structure => "structure error",
            ErrorKind::Parse => "parse error",
            ErrorKind::Expansion => "expansion error",
            ErrorKind::Resource => "resource error",
            ErrorKind::Internal => "internal error",
        };
        f.write_str(name)
    }
}

/// A located error raised anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldError {
    pub kind: ErrorKind,
    pub location: Location,
    pub message: String,
}

impl FoldError {
    pub fn new(kind: ErrorKind, location: Location, message: impl Into<String>) -> Self {
        FoldError {
            kind,
            location,
            message: message.into(),
        }
    }

    pub fn parse(location: Location, message: impl Into<String>) -> Box<Self> {
        Box::new(FoldError::new(ErrorKind::Parse, location, message))
    }

    pub fn expansion(location: Location, message: impl Into<String>) -> Box<Self> {
        Box::new(FoldError::new(ErrorKind::Expansion, location, message))
    }

    pub fn structure(location: Location, message: impl Into<String>) -> Box<Self> {
        Box::new(FoldError::new(ErrorKind::Structure, location, message))
    }

    pub fn internal(location: Location, message: impl Into<String>) -> Box<Self> {
        Box::new(FoldError::new(ErrorKind::Internal, location, message))
    }

    pub fn resource(location: Location, message: impl Into<String>) -> Box<Self> {
        Box::new(FoldError::new(ErrorKind::Resource, location, message))
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl fmt::Display for FoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.location, self.kind, self.message)
    }
}

impl std::error::Error for FoldError {}

/// Result type for core operations, boxed to keep the happy path small.
pub type FoldResult<T> = Result<T, Box<FoldError>>;

/// The ordered error list for a run.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<FoldError>,
    checkpoint: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, error: FoldError) {
        log::debug!("recorded {}", error);
        self.errors.push(error);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.errors.extend(other.errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(FoldError::is_fatal)
    }

    /// Errors in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &FoldError> {
        self.errors.iter()
    }

    /// Marks the end of a phase and returns how many errors it recorded.
    pub fn checkpoint(&mut self) -> usize {
        let recorded = self.errors.len() - self.checkpoint;
        self.checkpoint = self.errors.len();
        recorded
    }

    /// Errors sorted by file, then line.
    pub fn sorted(&self) -> Vec<&FoldError> {
        let mut errors: Vec<&FoldError> = self.errors.iter().collect();
        errors.sort_by(|a, b| a.location.cmp(&b.location));
        errors
    }

    /// Renders the sorted list, one error per line, truncated to `limit` when non-zero.
    pub fn render(&self, limit: usize) -> String {
        let sorted = self.sorted();
        let shown = if limit == 0 { sorted.len() } else { limit.min(sorted.len()) };
        let mut out = String::new();
        for error in &sorted[..shown] {
            out.push_str(&error.to_string());
            out.push('\n');
        }
        if shown < sorted.len() {
            out.push_str(&format!("... and {} more\n", sorted.len() - shown));
        }
        out
    }

    pub fn into_vec(self) -> Vec<FoldError> {
        self.errors
    }
}

/// Format source code context around an error line
///
/// Shows 2 lines before the error, the error line with a >> marker, and 2 lines after.
/// `line` is 1-based, as stored in locations.
pub fn format_source_context(source: &str, line: u32) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = (line as usize).saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, text) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, text));
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(file: &str, line: u32, message: &str) -> FoldError {
        FoldError::new(ErrorKind::Parse, Location::new(file, line), message)
    }

    #[test]
    fn test_sorted_by_file_then_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(err("A", 10, "ten"));
        diagnostics.report(err("A", 3, "three"));
        diagnostics.report(err("B", 1, "one"));

        let order: Vec<&str> = diagnostics
            .sorted()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(order, vec!["three", "ten", "one"]);
    }

    #[test]
    fn test_sort_is_stable_within_a_line() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(err("A", 2, "first"));
        diagnostics.report(err("A", 2, "second"));
        let sorted = diagnostics.sorted();
        assert_eq!(sorted[0].message, "first");
        assert_eq!(sorted[1].message, "second");
    }

    #[test]
    fn test_checkpoint_counts_per_phase() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(err("A", 1, "x"));
        assert_eq!(diagnostics.checkpoint(), 1);
        assert_eq!(diagnostics.checkpoint(), 0);
        diagnostics.report(err("A", 2, "y"));
        diagnostics.report(err("A", 3, "z"));
        assert_eq!(diagnostics.checkpoint(), 2);
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_fatal_kinds() {
        assert!(ErrorKind::Scan.is_fatal());
        assert!(ErrorKind::Internal.is_fatal());
        assert!(!ErrorKind::Parse.is_fatal());
        assert!(!ErrorKind::Expansion.is_fatal());
    }

    #[test]
    fn test_render_with_limit() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(err("A", 1, "x"));
        diagnostics.report(err("A", 2, "y"));
        let out = diagnostics.render(1);
        assert_eq!(out, "A:1: parse error: x\n... and 1 more\n");
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, 4);
        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
    }
}
