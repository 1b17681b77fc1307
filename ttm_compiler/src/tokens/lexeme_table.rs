//! Lexeme table: the ordered, line-annotated output of the scanner

use super::kind::LexemeKind;
use crate::config::compile_time::scanner::MAX_LEXEMES;
use crate::logging::codes;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// One classified token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexemeEntry {
    pub kind: LexemeKind,
    pub line: u32,
    /// Symbol table index for identifiers, literals and `main`
    pub symbol: Option<usize>,
}

impl LexemeEntry {
    pub fn new(kind: LexemeKind, line: u32) -> Self {
        Self {
            kind,
            line,
            symbol: None,
        }
    }

    pub fn with_symbol(kind: LexemeKind, line: u32, symbol: usize) -> Self {
        Self {
            kind,
            line,
            symbol: Some(symbol),
        }
    }

    /// Filler written past the end of a shortened span
    pub fn sentinel() -> Self {
        Self::new(LexemeKind::Forbidden, 0)
    }

    pub fn is_sentinel(&self) -> bool {
        self.kind == LexemeKind::Forbidden
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexemeTableError {
    #[error("Lexeme table capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },

    #[error("Span {start}..{end} is outside the table (len {len})")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Replacement of {replacement} entries does not fit span of {span}")]
    ReplacementTooLong { replacement: usize, span: usize },
}

impl LexemeTableError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexemeTableError::CapacityExceeded { .. } => {
                codes::structural::TABLE_CAPACITY_EXCEEDED
            }
            _ => codes::system::INTERNAL_ERROR,
        }
    }
}

/// Result of overwriting a span in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpanRewrite {
    /// Entries of real content now at the start of the span
    pub new_len: usize,
    /// Sentinel entries filling the rest of the span
    pub padding: usize,
}

/// Append-only lexeme store; spans may later be overwritten but never resized
#[derive(Debug, Clone, Serialize)]
pub struct LexemeTable {
    entries: Vec<LexemeEntry>,
    #[serde(skip)]
    capacity: usize,
}

impl LexemeTable {
    pub fn new() -> Self {
        Self::with_capacity_limit(MAX_LEXEMES)
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LexemeEntry) -> Result<usize, LexemeTableError> {
        if self.entries.len() >= self.capacity {
            return Err(LexemeTableError::CapacityExceeded { max: self.capacity });
        }
        self.entries.push(entry);
        Ok(self.entries.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&LexemeEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[LexemeEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LexemeEntry> {
        self.entries.iter()
    }

    pub fn kinds(&self) -> Vec<LexemeKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn last(&self) -> Option<&LexemeEntry> {
        self.entries.last()
    }

    fn kind_from_end(&self, offset: usize) -> Option<LexemeKind> {
        self.entries
            .len()
            .checked_sub(offset)
            .map(|index| self.entries[index].kind)
    }

    /// `fn <datatype>` directly precedes the next entry
    pub fn declared_function(&self) -> bool {
        self.kind_from_end(2) == Some(LexemeKind::Fn)
    }

    /// `let <datatype>` directly precedes the next entry
    pub fn declared_variable(&self) -> bool {
        self.kind_from_end(2) == Some(LexemeKind::Let)
    }

    pub fn declared_datatype(&self) -> bool {
        self.kind_from_end(1) == Some(LexemeKind::Datatype)
    }

    pub fn has_kind(&self, kind: LexemeKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn count_kind(&self, kind: LexemeKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Index of the first `;` at or after `start`
    pub fn find_terminator(&self, start: usize) -> Option<usize> {
        self.entries
            .iter()
            .skip(start)
            .position(|e| e.kind == LexemeKind::Semicolon)
            .map(|offset| start + offset)
    }

    /// Replace `span_len` entries starting at `start` with `replacement`,
    /// padding the remainder of the span with sentinels
    pub fn overwrite_span(
        &mut self,
        start: usize,
        span_len: usize,
        replacement: &[LexemeEntry],
    ) -> Result<SpanRewrite, LexemeTableError> {
        let end = start + span_len;
        if end > self.entries.len() {
            return Err(LexemeTableError::SpanOutOfBounds {
                start,
                end,
                len: self.entries.len(),
            });
        }
        if replacement.len() > span_len {
            return Err(LexemeTableError::ReplacementTooLong {
                replacement: replacement.len(),
                span: span_len,
            });
        }

        let span = &mut self.entries[start..end];
        span[..replacement.len()].copy_from_slice(replacement);
        span[replacement.len()..].fill(LexemeEntry::sentinel());

        Ok(SpanRewrite {
            new_len: replacement.len(),
            padding: span_len - replacement.len(),
        })
    }

    /// One row per source line: zero-padded line number then the entry tags
    pub fn render_by_line(&self) -> String {
        let mut output = String::new();
        let mut current_line: Option<u32> = None;

        for entry in self.entries.iter().filter(|e| !e.is_sentinel()) {
            if current_line != Some(entry.line) {
                if current_line.is_some() {
                    output.push('\n');
                }
                let _ = write!(output, "{:04} ", entry.line);
                current_line = Some(entry.line);
            }
            output.push(entry.kind.tag());
        }

        if current_line.is_some() {
            output.push('\n');
        }
        output
    }
}

impl Default for LexemeTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn table_of(kinds: &[LexemeKind]) -> LexemeTable {
        let mut table = LexemeTable::new();
        for &kind in kinds {
            table.push(LexemeEntry::new(kind, 1)).unwrap();
        }
        table
    }

    #[test]
    fn test_declaration_context() {
        let table = table_of(&[LexemeKind::Fn, LexemeKind::Datatype]);
        assert!(table.declared_function());
        assert!(!table.declared_variable());
        assert!(table.declared_datatype());

        let table = table_of(&[LexemeKind::Let, LexemeKind::Datatype]);
        assert!(table.declared_variable());

        assert!(!LexemeTable::new().declared_function());
    }

    #[test]
    fn test_capacity() {
        let mut table = LexemeTable::with_capacity_limit(1);
        table.push(LexemeEntry::new(LexemeKind::Ret, 1)).unwrap();
        let result = table.push(LexemeEntry::new(LexemeKind::Semicolon, 1));
        assert_matches!(result, Err(LexemeTableError::CapacityExceeded { max: 1 }));
        assert_eq!(
            result.unwrap_err().error_code(),
            codes::structural::TABLE_CAPACITY_EXCEEDED
        );
    }

    #[test]
    fn test_overwrite_span_pads_with_sentinels() {
        let mut table = table_of(&[
            LexemeKind::Ret,
            LexemeKind::OpenParen,
            LexemeKind::Literal,
            LexemeKind::Minus,
            LexemeKind::Literal,
            LexemeKind::CloseParen,
            LexemeKind::Semicolon,
        ]);

        let replacement = [
            LexemeEntry::new(LexemeKind::Literal, 1),
            LexemeEntry::new(LexemeKind::Literal, 1),
            LexemeEntry::new(LexemeKind::Minus, 1),
            LexemeEntry::new(LexemeKind::Semicolon, 1),
        ];
        let rewrite = table.overwrite_span(1, 6, &replacement).unwrap();

        assert_eq!(rewrite, SpanRewrite { new_len: 4, padding: 2 });
        assert_eq!(table.len(), 7);
        assert_eq!(table.get(4).unwrap().kind, LexemeKind::Semicolon);
        assert!(table.get(5).unwrap().is_sentinel());
        assert!(table.get(6).unwrap().is_sentinel());
    }

    #[test]
    fn test_overwrite_span_rejects_growth() {
        let mut table = table_of(&[LexemeKind::Literal, LexemeKind::Semicolon]);
        let replacement = [LexemeEntry::new(LexemeKind::Literal, 1); 3];

        assert_matches!(
            table.overwrite_span(0, 2, &replacement),
            Err(LexemeTableError::ReplacementTooLong { replacement: 3, span: 2 })
        );
        assert_matches!(
            table.overwrite_span(1, 5, &[]),
            Err(LexemeTableError::SpanOutOfBounds { .. })
        );
    }

    #[test]
    fn test_find_terminator() {
        let table = table_of(&[LexemeKind::Ret, LexemeKind::Literal, LexemeKind::Semicolon]);
        assert_eq!(table.find_terminator(0), Some(2));
        assert_eq!(table.find_terminator(3), None);
    }

    #[test]
    fn test_render_by_line() {
        let mut table = LexemeTable::new();
        table.push(LexemeEntry::new(LexemeKind::Let, 1)).unwrap();
        table.push(LexemeEntry::new(LexemeKind::Datatype, 1)).unwrap();
        table.push(LexemeEntry::with_symbol(LexemeKind::Identifier, 1, 3)).unwrap();
        table.push(LexemeEntry::new(LexemeKind::Semicolon, 1)).unwrap();
        table.push(LexemeEntry::sentinel()).unwrap();
        table.push(LexemeEntry::new(LexemeKind::Ret, 3)).unwrap();

        assert_eq!(table.render_by_line(), "0001 dti;\n0003 r\n");
        assert_eq!(table.count_kind(LexemeKind::Datatype), 1);
    }
}
