//! # cfold
//!
//! A source-to-source compiler core for an extended C dialect: C plus macros with arguments,
//! objects with visibility sections, state machines and user-defined constructs whose names
//! come from a dialect file.
//!
//! File Layout
//!
//! The compiler is a chain of tree rewrites over one node type:
//!
//! src/
//!   ├── lexing        logos scanner plus token transformations, per lexing mode
//!   ├── token         tags, tokens and locations
//!   ├── tree          nodes, cursor operations, scoped handles, ownership check
//!   ├── parsing       structuring, the rewrite-pass engine and the grammar contexts
//!   ├── expansion     macro table, substitution, `##` pasting, the expansion walk
//!   ├── transforms    the stages composed into per-mode pipelines
//!   ├── loader        reading sources and running pipelines on them
//!   ├── formats       treeviz, JSON/YAML snapshots, detokenizer
//!   └── consumer      handing finished trees to downstream code
//!
//! Per-file state (diagnostics, context stack, macro table, depth counters) lives in a
//! [session::Session]; configuration is [config::FoldConfig].
//!
//! Invariants that hold for every file:
//!
//! - printing the terminals of a tree reproduces its source until expansion rewrites it
//! - every node is owned by exactly one parent
//! - a tree handed off holds no macro call site and passed every context's whitelist

pub mod config;
pub mod consumer;
pub mod context;
pub mod diagnostics;
pub mod expansion;
pub mod formats;
pub mod lexing;
pub mod loader;
pub mod parsing;
pub mod registry;
pub mod session;
pub mod token;
pub mod transforms;
pub mod tree;

pub use crate::config::{ConfigError, ConfigLoader, FoldConfig};
pub use diagnostics::{Diagnostics, ErrorKind, FoldError, FoldResult};
pub use lexing::{LexMode, Lexer};
pub use loader::{LoaderError, SourceLoader};
pub use registry::{ConstructRegistry, DialectRegistry};
pub use session::Session;
pub use token::{Location, Tag, Token};
pub use transforms::Compilation;
pub use tree::Node;
