//! Macro expansion stage
//!
//! Registers the file's macros and replaces every call site with its parsed expansion.
//! Expansion errors are recorded and cost only the failing call.

use crate::expansion::expand_all;
use crate::transforms::{Compilation, Runnable, TransformError};

pub struct MacroExpansion;

impl MacroExpansion {
    pub fn new() -> Self {
        MacroExpansion
    }
}

impl Default for MacroExpansion {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Compilation, Compilation> for MacroExpansion {
    fn run(&self, mut input: Compilation) -> Result<Compilation, TransformError> {
        if input.aborted {
            return Ok(input);
        }
        match expand_all(&mut input.session, &mut input.root) {
            Ok(expanded) => log::debug!(
                "{}: {} expansion(s), {} macro(s) defined",
                input.session.file,
                expanded,
                input.session.macros.len()
            ),
            Err(error) => input.abort("expansion", error),
        }
        input.session.diagnostics.checkpoint();
        Ok(input)
    }
}
