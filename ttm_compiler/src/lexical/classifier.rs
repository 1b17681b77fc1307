//! Byte classification table for the preprocessor
//!
//! A `Classifier` is built once and never mutated afterwards. The
//! preprocessor borrows it for the duration of a run.

use std::ops::RangeInclusive;

/// Separates raw tokens in preprocessed text
pub const DELIMITER: u8 = 0x1F;
/// Line boundary marker kept in preprocessed text
pub const NEWLINE: u8 = b'\n';
/// Opens and closes string literals
pub const QUOTE: u8 = b'\'';
/// Two in a row start a comment that runs to end of line
pub const COMMENT: u8 = b'/';

/// Category assigned to every input byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCategory {
    /// Part of identifiers, keywords and numbers
    Text,
    /// Not allowed outside string literals
    Forbidden,
    /// Dropped without affecting token boundaries
    Ignored,
    /// Single-character operator or punctuation token
    Operator,
    /// String literal boundary
    Quote,
    /// Statement terminator, always its own token
    Separator,
    /// Replaced by the given byte unless it directly follows a delimiter
    Substitute(u8),
}

/// Immutable byte-to-category lookup table
#[derive(Debug, Clone)]
pub struct Classifier {
    table: [CharCategory; 256],
}

impl Classifier {
    /// Table where every byte is forbidden; the starting point for custom tables
    pub fn all_forbidden() -> Self {
        Self {
            table: [CharCategory::Forbidden; 256],
        }
    }

    /// The standard TTM source table
    pub fn ttm() -> Self {
        Self::all_forbidden()
            .with_range(b'a'..=b'z', CharCategory::Text)
            .with_range(b'A'..=b'Z', CharCategory::Text)
            .with_range(b'0'..=b'9', CharCategory::Text)
            .with_category(b'_', CharCategory::Text)
            .with_category(b' ', CharCategory::Substitute(DELIMITER))
            .with_category(b'\t', CharCategory::Substitute(DELIMITER))
            .with_category(NEWLINE, CharCategory::Substitute(DELIMITER))
            .with_category(b'\r', CharCategory::Ignored)
            .with_bytes(b"+-*/%=<>!(){},", CharCategory::Operator)
            .with_category(b';', CharCategory::Separator)
            .with_category(QUOTE, CharCategory::Quote)
    }

    pub fn with_category(mut self, byte: u8, category: CharCategory) -> Self {
        self.table[byte as usize] = category;
        self
    }

    pub fn with_range(mut self, range: RangeInclusive<u8>, category: CharCategory) -> Self {
        for byte in range {
            self.table[byte as usize] = category;
        }
        self
    }

    pub fn with_bytes(mut self, bytes: &[u8], category: CharCategory) -> Self {
        for &byte in bytes {
            self.table[byte as usize] = category;
        }
        self
    }

    pub fn classify(&self, byte: u8) -> CharCategory {
        self.table[byte as usize]
    }

    pub fn is_text(&self, byte: u8) -> bool {
        self.classify(byte) == CharCategory::Text
    }

    pub fn is_quote(&self, byte: u8) -> bool {
        self.classify(byte) == CharCategory::Quote
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::ttm()
    }
}
