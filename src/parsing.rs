//! Parsing: from a flat token list to a nested tree
//!
//! Parsing happens in two steps, both of them rewrites of a composite's children in place:
//! 1. **Structuring**: directive lines and bracket pairs are grouped (see [structure])
//! 2. **Parse family**: every composite is restructured by the context its tag maps to, then
//!    its children are (see [engine])
//!
//! ## Layout
//!
//! - [passes]: the `Pass`/`Context` types and the helpers passes are written with
//! - [contexts]: one module per family of constructs (items, statements, objects, ...)
//! - [grammar]: the table from composite tag to context
//!
//! ## Terminology
//!
//! - **pass**: one pattern-to-composite rewrite over a node's direct children
//! - **context**: the ordered passes, hooks and AllowOnly whitelist for one kind of node
//! - **survivor**: a child no pass claimed and the whitelist does not accept

pub mod contexts;
pub mod engine;
pub mod grammar;
pub mod passes;
pub mod structure;

pub use engine::{is_fully_expanded, parse_family, run_passes};
pub use passes::{Context, Pass};
pub use structure::structure;
