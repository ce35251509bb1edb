//! Per-file session
//!
//!     Everything a file's pipeline mutates besides the tree itself lives here: the error list,
//!     the context stack, the macro table and the two depth counters. A session is created when
//!     a file starts lexing and dropped once its tree has been handed off, so nothing leaks from
//!     one file into the next.

use crate::config::FoldConfig;
use crate::context::ContextStack;
use crate::diagnostics::{Diagnostics, FoldError, FoldResult};
use crate::expansion::MacroTable;
use crate::lexing::LexMode;
use crate::token::Location;
use std::sync::Arc;

#[derive(Debug)]
pub struct Session {
    pub config: Arc<FoldConfig>,
    pub file: Arc<str>,
    pub mode: LexMode,
    pub diagnostics: Diagnostics,
    pub frames: ContextStack,
    pub macros: MacroTable,
    expansion_depth: usize,
    nesting: usize,
}

impl Session {
    pub fn new(file: impl Into<Arc<str>>, mode: LexMode, config: Arc<FoldConfig>) -> Self {
        Session {
            config,
            file: file.into(),
            mode,
            diagnostics: Diagnostics::new(),
            frames: ContextStack::new(),
            macros: MacroTable::new(),
            expansion_depth: 0,
            nesting: 0,
        }
    }

    /// A session with default configuration, for tests and one-off calls.
    pub fn for_file(file: &str, mode: LexMode) -> Self {
        Session::new(file, mode, Arc::new(FoldConfig::default()))
    }

    pub fn location(&self, line: u32) -> Location {
        Location {
            file: self.file.clone(),
            line,
        }
    }

    pub fn report(&mut self, error: Box<FoldError>) {
        self.diagnostics.report(*error);
    }

    /// The phase boundary: record a recoverable error and carry on, pass a fatal one up.
    pub fn recover<T>(&mut self, result: FoldResult<T>) -> FoldResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(error) if !error.is_fatal() => {
                self.report(error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    pub fn expansion_depth(&self) -> usize {
        self.expansion_depth
    }

    /// Run `f` one macro expansion deeper, failing once the configured ceiling is reached.
    ///
    /// The counter is restored whether `f` succeeds or not.
    pub fn deeper<T>(
        &mut self,
        location: &Location,
        what: &str,
        f: impl FnOnce(&mut Session) -> FoldResult<T>,
    ) -> FoldResult<T> {
        let ceiling = self.config.expansion.max_depth;
        if self.expansion_depth >= ceiling {
            return Err(FoldError::expansion(
                location.clone(),
                format!(
                    "macro expansion depth exceeded {} while expanding {}",
                    ceiling, what
                ),
            ));
        }
        self.expansion_depth += 1;
        log::trace!("expanding {} at depth {}", what, self.expansion_depth);
        let result = f(self);
        self.expansion_depth -= 1;
        result
    }

    pub fn nesting(&self) -> usize {
        self.nesting
    }

    /// Run `f` one tree level deeper, failing with a resource error past the nesting ceiling.
    pub fn nested<T>(
        &mut self,
        location: &Location,
        f: impl FnOnce(&mut Session) -> FoldResult<T>,
    ) -> FoldResult<T> {
        let ceiling = self.config.parsing.max_nesting;
        if self.nesting >= ceiling {
            return Err(FoldError::resource(
                location.clone(),
                format!("nesting deeper than {} levels", ceiling),
            ));
        }
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    #[test]
    fn test_recover_records_parse_errors() {
        let mut session = Session::for_file("t.cf", LexMode::Extended);
        let result: FoldResult<()> = Err(FoldError::parse(session.location(3), "bad"));
        assert_eq!(session.recover(result).unwrap(), None);
        assert_eq!(session.diagnostics.len(), 1);
    }

    #[test]
    fn test_recover_passes_fatal_errors_up() {
        let mut session = Session::for_file("t.cf", LexMode::Extended);
        let result: FoldResult<()> = Err(FoldError::internal(session.location(3), "broken"));
        let err = session.recover(result).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
        assert!(session.diagnostics.is_empty());
    }

    #[test]
    fn test_deeper_restores_counter_on_error() {
        let mut session = Session::for_file("t.cf", LexMode::Extended);
        let loc = session.location(1);
        let result: FoldResult<()> = session.deeper(&loc, "`M`", |s| {
            assert_eq!(s.expansion_depth(), 1);
            Err(FoldError::expansion(loc.clone(), "inner"))
        });
        assert!(result.is_err());
        assert_eq!(session.expansion_depth(), 0);
    }

    #[test]
    fn test_deeper_stops_at_ceiling() {
        let mut config = FoldConfig::default();
        config.expansion.max_depth = 2;
        let mut session = Session::new("t.cf", LexMode::Extended, Arc::new(config));
        let loc = session.location(1);

        fn recurse(session: &mut Session, loc: &Location) -> FoldResult<()> {
            session.deeper(loc, "`R`", |s| recurse(s, loc))
        }
        let err = recurse(&mut session, &loc).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Expansion);
        assert!(err.message.contains("exceeded 2"));
        assert_eq!(session.expansion_depth(), 0);
    }

    #[test]
    fn test_nested_reports_resource_error() {
        let mut config = FoldConfig::default();
        config.parsing.max_nesting = 1;
        let mut session = Session::new("t.cf", LexMode::Extended, Arc::new(config));
        let loc = session.location(1);
        let err = session
            .nested(&loc, |s| s.nested(&loc, |_| Ok(())))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Resource);
        assert_eq!(session.nesting(), 0);
    }
}
