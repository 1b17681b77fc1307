//! Scanner stage: raw tokens to lexeme and symbol tables
//!
//! The scanner classifies every raw token, resolves identifiers against the
//! current scope, declares new names from the surrounding `fn`/`let`/datatype
//! context, interns literals and rewrites unary minus as `(0 - x)`. After the
//! last token it checks the whole program for `main` and balanced brackets.

pub mod analyzer;
pub mod error;
pub mod scope;

use crate::config::compile_time::scanner::*;
use crate::config::runtime::ScannerPreferences;
use crate::lexical::RawToken;
use crate::logging::codes;
use crate::symbols::SymbolTable;
use crate::tokens::LexemeTable;
use crate::{log_debug, log_performance};
use std::time::Instant;

pub use analyzer::{ScanMetrics, Scanner};
pub use error::ScanError;
pub use scope::{ScopeFault, ScopeStack};

/// Scan into fresh tables with default preferences
pub fn scan_tokens(tokens: &[RawToken]) -> Result<(SymbolTable, LexemeTable, ScanMetrics), ScanError> {
    scan_tokens_with_preferences(tokens, ScannerPreferences::default())
}

/// Scan into fresh tables
pub fn scan_tokens_with_preferences(
    tokens: &[RawToken],
    preferences: ScannerPreferences,
) -> Result<(SymbolTable, LexemeTable, ScanMetrics), ScanError> {
    let start = Instant::now();
    let mut symbols = SymbolTable::new();
    let mut lexemes = LexemeTable::new();

    let metrics = Scanner::with_preferences(preferences).scan(tokens, &mut symbols, &mut lexemes)?;

    log_performance!(codes::success::SCAN_COMPLETE, "Scanning completed",
        duration = start.elapsed(),
        "lexemes" => metrics.lexemes,
        "symbols" => metrics.symbols,
        "literals" => metrics.literals_interned,
        "unary_rewrites" => metrics.unary_rewrites
    );

    Ok((symbols, lexemes, metrics))
}

/// Verify scanner error codes are registered and log the compile-time limits
pub fn init_scanner_logging() -> Result<(), String> {
    codes::ensure_registered(
        "Scanner",
        &[
            codes::lexical::UNRECOGNIZED_TOKEN,
            codes::lexical::INTEGER_OUT_OF_RANGE,
            codes::declarations::MISSING_DECLARATION_KIND,
            codes::declarations::MISSING_DECLARATION_TYPE,
            codes::declarations::DUPLICATE_DECLARATION,
            codes::declarations::UNDECLARED_IDENTIFIER,
            codes::declarations::SELF_REFERENCE,
            codes::declarations::EMPTY_STRING_LITERAL,
            codes::structural::UNBALANCED_BRACKETS,
            codes::structural::MISSING_ENTRY_POINT,
            codes::structural::DUPLICATE_ENTRY_POINT,
            codes::structural::SCOPE_TOO_DEEP,
            codes::structural::TABLE_CAPACITY_EXCEEDED,
        ],
    )?;

    log_debug!("Scanner compile-time limits loaded",
        "max_scope_depth" => MAX_SCOPE_DEPTH,
        "max_symbols" => MAX_SYMBOLS,
        "max_lexemes" => MAX_LEXEMES
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_source;

    #[test]
    fn test_scan_tokens() {
        let tokens = tokenize_source(b"fn i32 main() { ret 0; }").unwrap().tokens;
        let (symbols, lexemes, metrics) = scan_tokens(&tokens).unwrap();

        assert_eq!(metrics.tokens, tokens.len());
        assert_eq!(metrics.lexemes, lexemes.len());
        assert!(symbols.lookup("", "main").is_some());
    }

    #[test]
    fn test_init_logging() {
        assert!(init_scanner_logging().is_ok());
    }
}
