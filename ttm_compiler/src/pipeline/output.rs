use crate::symbols::SymbolTable;
use crate::tokens::LexemeTable;
use serde::Serialize;

/// The two tables handed to a downstream code generator
#[derive(Debug, Serialize)]
pub struct PipelineOutput<'a> {
    pub symbols: &'a SymbolTable,
    pub lexemes: &'a LexemeTable,
}

impl<'a> PipelineOutput<'a> {
    pub fn new(symbols: &'a SymbolTable, lexemes: &'a LexemeTable) -> Self {
        Self { symbols, lexemes }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{DataType, SymbolEntry};
    use crate::tokens::{LexemeEntry, LexemeKind};

    #[test]
    fn test_json_shape() {
        let mut symbols = SymbolTable::new();
        let literal = symbols
            .insert(SymbolEntry::literal(0, DataType::I32, "5"))
            .unwrap();
        let mut lexemes = LexemeTable::new();
        lexemes
            .push(LexemeEntry::with_symbol(LexemeKind::Literal, 1, literal))
            .unwrap();

        let json = PipelineOutput::new(&symbols, &lexemes).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["symbols"]["entries"][0]["name"], "L0");
        assert_eq!(value["lexemes"]["entries"][0]["kind"], "Literal");
        assert_eq!(value["lexemes"]["entries"][0]["symbol"], 0);
    }
}
