//! Lexical stage: byte classification, preprocessing and token splitting
//!
//! Source bytes go through the `Preprocessor`, which isolates every token
//! behind a delimiter byte, and then through the `TokenSplitter`, which
//! yields `RawToken`s annotated with their source line.

pub mod classifier;
pub mod error;
pub mod preprocessor;
pub mod splitter;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::{log_debug, log_performance, log_success};
use std::time::Instant;

pub use classifier::{CharCategory, Classifier, COMMENT, DELIMITER, NEWLINE, QUOTE};
pub use error::LexerError;
pub use preprocessor::{PreprocessMetrics, Preprocessor};
pub use splitter::{RawToken, TokenSplitter};

/// Raw tokens plus the counters from the preprocessing run
#[derive(Debug, Clone)]
pub struct LexicalOutput {
    pub tokens: Vec<RawToken>,
    pub metrics: PreprocessMetrics,
}

// ============================================================================
// MODULE API
// ============================================================================

/// Preprocess and split source bytes with default preferences
pub fn tokenize_source(bytes: &[u8]) -> Result<LexicalOutput, LexerError> {
    tokenize_source_with_preferences(bytes, &LexicalPreferences::default())
}

/// Preprocess and split source bytes
pub fn tokenize_source_with_preferences(
    bytes: &[u8],
    preferences: &LexicalPreferences,
) -> Result<LexicalOutput, LexerError> {
    let start = Instant::now();
    let mut preprocessor = Preprocessor::default();
    let text = preprocessor.preprocess(bytes)?;
    let metrics = preprocessor.metrics().clone();

    if preferences.collect_detailed_metrics {
        log_success!(codes::success::PREPROCESSING_COMPLETE, "Preprocessing completed",
            "bytes" => metrics.bytes_read,
            "lines" => metrics.lines,
            "comments" => metrics.comments,
            "strings" => metrics.string_literals,
            "ignored" => metrics.ignored_bytes
        );
    } else {
        log_success!(codes::success::PREPROCESSING_COMPLETE, "Preprocessing completed",
            "bytes" => metrics.bytes_read
        );
    }

    let tokens = TokenSplitter::new()
        .with_token_tracing(preferences.trace_tokens)
        .split(&text)?;

    log_performance!(codes::success::TOKEN_SPLIT_COMPLETE, "Token splitting completed",
        duration = start.elapsed(),
        "tokens" => tokens.len()
    );

    Ok(LexicalOutput { tokens, metrics })
}

// ============================================================================
// MODULE INITIALIZATION AND VALIDATION
// ============================================================================

/// Verify lexical error codes are registered and log the compile-time limits
pub fn init_lexical_logging() -> Result<(), String> {
    codes::ensure_registered(
        "Lexical",
        &[
            codes::lexical::FORBIDDEN_CHARACTER,
            codes::lexical::UNBALANCED_QUOTES,
            codes::lexical::TOO_MANY_TOKENS,
        ],
    )?;

    log_debug!("Lexical compile-time limits loaded",
        "max_string_length" => MAX_STRING_LENGTH,
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT
    );

    Ok(())
}
