//! Postfix conversion stage
//!
//! Expression statements in the lexeme table are rewritten in place from
//! infix to reverse Polish order. Parentheses disappear, call targets move
//! behind their arguments and are re-tagged as calls, and the slots left over
//! at the end of each span are filled with sentinels so later indices stay
//! valid.

pub mod converter;
pub mod error;

use crate::config::compile_time::conversion::MAX_STATEMENT_LENGTH;
use crate::config::runtime::ConversionPreferences;
use crate::logging::codes;
use crate::symbols::SymbolTable;
use crate::tokens::LexemeTable;
use crate::{log_debug, log_performance};
use std::time::Instant;

pub use converter::{
    convert_all, convert_all_with_preferences, convert_statement, try_convert_statement,
    ConversionMetrics,
};
pub use error::PolishError;

/// Run the conversion pass over a scanned program
pub fn convert_program(
    lexemes: &mut LexemeTable,
    symbols: &SymbolTable,
    preferences: &ConversionPreferences,
) -> Result<ConversionMetrics, PolishError> {
    let start = Instant::now();
    let metrics = convert_all_with_preferences(lexemes, symbols, preferences)?;

    log_performance!(codes::success::CONVERSION_COMPLETE, "Postfix conversion completed",
        duration = start.elapsed(),
        "statements" => metrics.statements,
        "calls" => metrics.calls,
        "padding" => metrics.padding
    );

    Ok(metrics)
}

pub fn init_polish_logging() -> Result<(), String> {
    codes::ensure_registered(
        "Polish",
        &[
            codes::conversion::MALFORMED_EXPRESSION,
            codes::conversion::MISSING_TERMINATOR,
        ],
    )?;

    log_debug!("Conversion limits loaded",
        "max_statement_length" => MAX_STATEMENT_LENGTH
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::tokenize_source;
    use crate::scanner::scan_tokens;
    use crate::tokens::LexemeKind;

    #[test]
    fn test_convert_program() {
        let tokens = tokenize_source(b"fn i32 main() { ret (1 + 2) * 3; }").unwrap().tokens;
        let (symbols, mut lexemes, _) = scan_tokens(&tokens).unwrap();

        let metrics =
            convert_program(&mut lexemes, &symbols, &ConversionPreferences::default()).unwrap();

        assert_eq!(metrics.statements, 1);
        assert_eq!(metrics.padding, 2);
        assert_eq!(lexemes.count_kind(LexemeKind::OpenParen), 1);
        assert_eq!(lexemes.render_by_line(), "0001 ftm(){rll+l*;}\n");
    }

    #[test]
    fn test_init_logging() {
        assert!(init_polish_logging().is_ok());
    }
}
