//! Post operations
//!
//! Final consistency checks before a tree may be handed off: the ownership invariant holds
//! and no macro call site is left. Either failure is an internal error.

use crate::diagnostics::FoldError;
use crate::parsing::is_fully_expanded;
use crate::transforms::{Compilation, Runnable, TransformError};
use crate::tree::check_ownership;

pub struct PostOperations;

impl PostOperations {
    pub fn new() -> Self {
        PostOperations
    }
}

impl Default for PostOperations {
    fn default() -> Self {
        Self::new()
    }
}

impl Runnable<Compilation, Compilation> for PostOperations {
    fn run(&self, mut input: Compilation) -> Result<Compilation, TransformError> {
        if input.aborted {
            return Ok(input);
        }
        if let Err(error) = check_ownership(&input.root) {
            input.abort("post operations", error);
            return Ok(input);
        }
        if !is_fully_expanded(&input.root) {
            let location = input.root.location().clone();
            input.abort(
                "post operations",
                FoldError::internal(location, "macro call left in the tree after expansion"),
            );
        }
        Ok(input)
    }
}
