//! Source location tracking
//!
//! Diagnostics in the TTM front end carry a line and, when the failing stage
//! still knows it, the column of the offending byte. Scanner-level errors
//! only know the line because raw tokens are line-annotated.
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line (1-based) with an optional column (1-based).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct SourcePosition {
    pub line: u32,
    pub column: Option<u32>,
}

impl SourcePosition {
    /// Position of a specific byte
    pub fn new(line: u32, column: u32) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }

    /// Position known only to line granularity
    pub fn at_line(line: u32) -> Self {
        Self { line, column: None }
    }

    /// Line 1, column 1
    pub fn start() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}", self.line, column),
            None => write!(f, "{}", self.line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(SourcePosition::new(3, 7).to_string(), "3:7");
        assert_eq!(SourcePosition::at_line(12).to_string(), "12");
    }

    #[test]
    fn test_ordering() {
        assert!(SourcePosition::new(1, 9) < SourcePosition::new(2, 1));
        assert!(SourcePosition::start() < SourcePosition::new(1, 2));
    }
}
