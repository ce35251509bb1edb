//! Syntax tree primitives
//!
//!     The tree is built entirely by in-place list-to-tree rewriting: the lexer's flat token
//!     list becomes the children of a root composite, and every later stage replaces runs of
//!     children with new composites that wrap them.
//!
//!     - [node]: terminals and composites, stable ids, parent back-references, the cursor and
//!       the attach/detach/clone primitives.
//!     - [stacked]: the scoped handle that owns a detached node until it is committed.
//!     - [cursor]: the consume-run family and the expect/check operations.
//!     - [ownership]: a checker for the single-owner invariant.

pub mod cursor;
pub mod node;
pub mod ownership;
pub mod stacked;

pub use cursor::describe_tags;
pub use node::{Node, NodeId, Payload};
pub use ownership::check_ownership;
pub use stacked::Stacked;
