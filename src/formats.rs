//! Output formats for trees and token lists
//!
//! - [detokenizer]: prints terminals back to source text
//! - [treeviz]: one line per node, for reading trees
//! - [snapshot]: a serde view of a tree, written as JSON or YAML
//!
//! Every format that takes a whole tree is also a [Formatter] in the [FormatRegistry], which
//! is how the command line driver resolves `--format`.

pub mod detokenizer;
pub mod registry;
pub mod snapshot;
pub mod treeviz;

pub use detokenizer::{detokenize, ToSource};
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use snapshot::{snapshot, TreeSnapshot};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
