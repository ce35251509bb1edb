//! Individual transformation stages
//!
//! Each stage implements [Runnable](super::Runnable) for one step of a file's pipeline. Apart
//! from tokenization, every stage takes and returns a [Compilation](super::Compilation) and
//! skips compilations that an earlier stage aborted.

pub mod expansion;
pub mod parsing;
pub mod post_operations;
pub mod structuring;
pub mod tokenization;

pub use expansion::MacroExpansion;
pub use parsing::ParseFamily;
pub use post_operations::PostOperations;
pub use structuring::Structuring;
pub use tokenization::{SourceUnit, Tokenization, Tokenized};
