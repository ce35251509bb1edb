//! Source locations
//!
//!     Every terminal is stamped with the logical file name it came from and the 1-based line
//!     its first byte sits on. Composites take the location of their first child, so a
//!     diagnostic raised against any node can always name a file and a line.

use std::fmt;
use std::sync::Arc;

/// A file name plus a 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub file: Arc<str>,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<Arc<str>>, line: u32) -> Self {
        Location {
            file: file.into(),
            line,
        }
    }

    /// Location used for nodes that do not come from any source text.
    pub fn synthetic() -> Self {
        Location::new("<synthetic>", 0)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Location::new("main.cf", 12).to_string(), "main.cf:12");
    }

    #[test]
    fn test_ordering_is_file_then_line() {
        let a3 = Location::new("a.cf", 3);
        let a10 = Location::new("a.cf", 10);
        let b1 = Location::new("b.cf", 1);
        assert!(a3 < a10);
        assert!(a10 < b1);
    }
}
