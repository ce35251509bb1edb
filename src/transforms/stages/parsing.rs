//! Parse family stage
//!
//! Runs the PreParse/Parse/PostParse recursion over the whole file. Parse errors are recorded
//! inside the recursion; only a fatal error (nesting ceiling, internal failure) reaches this
//! stage, which aborts the file.

use crate::parsing::parse_family;
use crate::transforms::{Compilation, Runnable, TransformError};

pub struct ParseFamily;

impl ParseFamily {
    pub fn new() -> Self {
        ParseFamily
    }
}

impl Default for ParseFamily {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Compilation, Compilation> for ParseFamily {
    fn run(&self, mut input: Compilation) -> Result<Compilation, TransformError> {
        if input.aborted {
            return Ok(input);
        }
        if let Err(error) = parse_family(&mut input.session, &mut input.root) {
            input.abort("parsing", error);
        }
        let recorded = input.session.diagnostics.checkpoint();
        log::debug!("{}: parsed, {} error(s)", input.session.file, recorded);
        Ok(input)
    }
}
