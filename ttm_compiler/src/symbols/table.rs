//! Symbol table: declared names keyed by scope, literals interned by value

use super::error::{SymbolError, SymbolResult};
use crate::config::compile_time::scanner::MAX_SYMBOLS;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::{self, Write};

/// Name of the global scope
pub const GLOBAL_SCOPE: &str = "";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    I32,
    Str,
    Undefined,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::I32 => "i32",
            DataType::Str => "str",
            DataType::Undefined => "undefined",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Function,
    Variable,
    Parameter,
    Literal,
    Unknown,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Function => "function",
            SymbolKind::Variable => "variable",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Literal => "literal",
            SymbolKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub name: String,
    /// Declaring function, or empty for global
    pub scope: String,
    /// Lexeme table index of the first occurrence; `None` for built-ins
    pub lex_position: Option<usize>,
    pub data_type: DataType,
    pub kind: SymbolKind,
    /// Decoded value for literals
    pub literal_value: Option<String>,
}

impl SymbolEntry {
    pub fn declared(
        name: impl Into<String>,
        scope: impl Into<String>,
        lex_position: usize,
        data_type: DataType,
        kind: SymbolKind,
    ) -> Self {
        Self {
            name: name.into(),
            scope: scope.into(),
            lex_position: Some(lex_position),
            data_type,
            kind,
            literal_value: None,
        }
    }

    /// Literal named `L<lex_position>` in the global scope
    pub fn literal(lex_position: usize, data_type: DataType, value: impl Into<String>) -> Self {
        Self {
            name: format!("L{}", lex_position),
            scope: GLOBAL_SCOPE.to_string(),
            lex_position: Some(lex_position),
            data_type,
            kind: SymbolKind::Literal,
            literal_value: Some(value.into()),
        }
    }

    pub fn builtin(
        name: impl Into<String>,
        scope: impl Into<String>,
        data_type: DataType,
        kind: SymbolKind,
    ) -> Self {
        Self {
            name: name.into(),
            scope: scope.into(),
            lex_position: None,
            data_type,
            kind,
            literal_value: None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.kind == SymbolKind::Function
    }

    pub fn is_literal(&self) -> bool {
        self.kind == SymbolKind::Literal
    }
}

/// Append-only store of symbols
#[derive(Debug, Clone, Serialize)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    #[serde(skip)]
    by_name: HashMap<(String, String), usize>,
    #[serde(skip)]
    by_literal: HashMap<(DataType, String), usize>,
    #[serde(skip)]
    capacity: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_capacity_limit(MAX_SYMBOLS)
    }

    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
            by_literal: HashMap::new(),
            capacity,
        }
    }

    /// Append an entry and index it by value (literals) or by scope and name
    pub fn insert(&mut self, entry: SymbolEntry) -> SymbolResult<usize> {
        if self.entries.len() >= self.capacity {
            return Err(SymbolError::CapacityExceeded { max: self.capacity });
        }

        let index = self.entries.len();
        match (&entry.kind, &entry.literal_value) {
            (SymbolKind::Literal, Some(value)) => {
                self.by_literal
                    .entry((entry.data_type, value.clone()))
                    .or_insert(index);
            }
            _ => {
                let key = (entry.scope.clone(), entry.name.clone());
                if self.by_name.contains_key(&key) {
                    return Err(SymbolError::DuplicateKey {
                        scope: entry.scope,
                        name: entry.name,
                    });
                }
                self.by_name.insert(key, index);
            }
        }

        self.entries.push(entry);
        Ok(index)
    }

    pub fn lookup(&self, scope: &str, name: &str) -> Option<usize> {
        self.by_name
            .get(&(scope.to_string(), name.to_string()))
            .copied()
    }

    /// Literal entries live in separate namespaces per data type
    pub fn lookup_literal(&self, data_type: DataType, value: &str) -> Option<usize> {
        self.by_literal
            .get(&(data_type, value.to_string()))
            .copied()
    }

    /// Index of an existing literal, or a fresh entry created at `lex_position`.
    /// The flag is true when the entry was created.
    pub fn intern_literal(
        &mut self,
        data_type: DataType,
        value: &str,
        lex_position: usize,
    ) -> SymbolResult<(usize, bool)> {
        if let Some(index) = self.lookup_literal(data_type, value) {
            return Ok((index, false));
        }
        let index = self.insert(SymbolEntry::literal(lex_position, data_type, value))?;
        Ok((index, true))
    }

    pub fn get(&self, index: usize) -> Option<&SymbolEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
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

    pub fn literal_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_literal()).count()
    }

    /// Whether the entry at `index` is a function
    pub fn is_function(&self, index: Option<usize>) -> bool {
        index
            .and_then(|i| self.get(i))
            .map(|entry| entry.is_function())
            .unwrap_or(false)
    }

    /// Aligned table dump, one symbol per row
    pub fn render(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "{:>5}  {:<20} {:<20} {:>6}  {:<9} {:<9} {}",
            "index", "name", "scope", "lex", "type", "kind", "value"
        );

        for (index, entry) in self.entries.iter().enumerate() {
            let scope = if entry.scope.is_empty() {
                "<global>"
            } else {
                entry.scope.as_str()
            };
            let lex = entry
                .lex_position
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".to_string());
            let value = entry.literal_value.as_deref().unwrap_or("");

            let _ = writeln!(
                output,
                "{:>5}  {:<20} {:<20} {:>6}  {:<9} {:<9} {}",
                index, entry.name, scope, lex, entry.data_type, entry.kind, value
            );
        }

        output
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_scoped_lookup() {
        let mut table = SymbolTable::new();
        let f = table
            .insert(SymbolEntry::declared("f", GLOBAL_SCOPE, 2, DataType::I32, SymbolKind::Function))
            .unwrap();
        let a = table
            .insert(SymbolEntry::declared("a", "f", 5, DataType::I32, SymbolKind::Parameter))
            .unwrap();

        assert_eq!(table.lookup("", "f"), Some(f));
        assert_eq!(table.lookup("f", "a"), Some(a));
        assert_eq!(table.lookup("", "a"), None);
        assert!(table.is_function(Some(f)));
        assert!(!table.is_function(Some(a)));
        assert!(!table.is_function(None));
    }

    #[test]
    fn test_duplicate_key() {
        let mut table = SymbolTable::new();
        table
            .insert(SymbolEntry::declared("x", "main", 4, DataType::I32, SymbolKind::Variable))
            .unwrap();
        let result =
            table.insert(SymbolEntry::declared("x", "main", 9, DataType::Str, SymbolKind::Variable));

        assert_matches!(result, Err(SymbolError::DuplicateKey { .. }));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_literals_are_interned_per_type() {
        let mut table = SymbolTable::new();

        let (first, created) = table.intern_literal(DataType::I32, "5", 3).unwrap();
        assert!(created);
        let (again, created) = table.intern_literal(DataType::I32, "5", 8).unwrap();
        assert!(!created);
        assert_eq!(first, again);

        let (text, created) = table.intern_literal(DataType::Str, "5", 12).unwrap();
        assert!(created);
        assert_ne!(first, text);

        assert_eq!(table.get(first).unwrap().name, "L3");
        assert_eq!(table.get(text).unwrap().name, "L12");
        assert_eq!(table.literal_count(), 2);
    }

    #[test]
    fn test_capacity() {
        let mut table = SymbolTable::with_capacity_limit(1);
        table.intern_literal(DataType::I32, "1", 0).unwrap();
        assert_matches!(
            table.intern_literal(DataType::I32, "2", 1),
            Err(SymbolError::CapacityExceeded { max: 1 })
        );
    }

    #[test]
    fn test_render() {
        let mut table = SymbolTable::new();
        table
            .insert(SymbolEntry::builtin("concat", GLOBAL_SCOPE, DataType::Str, SymbolKind::Function))
            .unwrap();
        table.intern_literal(DataType::Str, "hi", 7).unwrap();

        let dump = table.render();
        let rows: Vec<&str> = dump.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].contains("concat"));
        assert!(rows[1].contains("<global>"));
        assert!(rows[2].contains("L7"));
        assert!(rows[2].trim_end().ends_with("hi"));
    }
}
