//! Postfix conversion errors

use crate::logging::codes;
use crate::tokens::LexemeTableError;
use crate::utils::SourcePosition;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolishError {
    #[error("Malformed expression at lexeme {start} (line {line}): {reason}")]
    MalformedExpression {
        start: usize,
        line: u32,
        reason: String,
    },

    #[error("Expression starting at lexeme {start} has no terminating ';'")]
    MissingTerminator { start: usize, line: Option<u32> },

    #[error("Span rewrite failed: {0}")]
    Rewrite(#[from] LexemeTableError),
}

impl PolishError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PolishError::MalformedExpression { .. } => codes::conversion::MALFORMED_EXPRESSION,
            PolishError::MissingTerminator { .. } => codes::conversion::MISSING_TERMINATOR,
            PolishError::Rewrite(error) => error.error_code(),
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            PolishError::MalformedExpression { line, .. } => Some(*line),
            PolishError::MissingTerminator { line, .. } => *line,
            PolishError::Rewrite(_) => None,
        }
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.line().map(SourcePosition::at_line)
    }
}
