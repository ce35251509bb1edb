//! Macro expansion
//!
//! Macros are defined with `macro NAME(params) { body }` and called either in expression
//! position (`@NAME(args)`) or as a whole item, member or statement (`expand NAME(args);`).
//! Expansion runs after the parse family, on a tree whose call sites and arguments are already
//! parsed:
//!
//! 1. Every top-level MacroDef is registered in the session's [MacroTable]
//! 2. Call sites are visited in source order; each is replaced by an expansion node whose tag
//!    depends on where the call sits (see [engine::expansion_tag])
//! 3. The expansion is parsed with that tag's context, then expanded in turn
//!
//! ## Layout
//!
//! - [table]: definitions keyed by name and arity, lookup diagnostics
//! - [substitution]: binding actual arguments to formal parameters
//! - [concat]: `##` token pasting
//! - [engine]: the walk over call sites and the depth ceiling
//!
//! Once expansion finishes no MacroCall or ExpandCall node remains in the tree: each one was
//! either replaced by its expansion or removed after its failure was recorded.

pub mod concat;
pub mod engine;
pub mod substitution;
pub mod table;

pub use engine::{expand_all, expand_children};
pub use table::{register_all, MacroDefinition, MacroTable};
