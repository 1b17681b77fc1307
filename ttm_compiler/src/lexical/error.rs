//! Preprocessing and token splitting errors

use crate::logging::codes;
use crate::utils::SourcePosition;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error("Forbidden character 0x{byte:02X} at line {line}, column {column}")]
    ForbiddenCharacter { byte: u8, line: u32, column: u32 },

    #[error("Unbalanced quotes: {count} quote characters")]
    UnbalancedQuotes { count: usize },

    #[error("Too many tokens: {count} (max {max})")]
    TooManyTokens { count: usize, max: usize, line: u32 },
}

impl LexerError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::ForbiddenCharacter { .. } => codes::lexical::FORBIDDEN_CHARACTER,
            LexerError::UnbalancedQuotes { .. } => codes::lexical::UNBALANCED_QUOTES,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            LexerError::ForbiddenCharacter { line, .. } | LexerError::TooManyTokens { line, .. } => {
                Some(*line)
            }
            LexerError::UnbalancedQuotes { .. } => None,
        }
    }

    pub fn column(&self) -> Option<u32> {
        match self {
            LexerError::ForbiddenCharacter { column, .. } => Some(*column),
            _ => None,
        }
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.line().map(|line| SourcePosition {
            line,
            column: self.column(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_positions() {
        let error = LexerError::ForbiddenCharacter {
            byte: b'#',
            line: 3,
            column: 7,
        };
        assert_eq!(error.error_code().value(), 111);
        assert_eq!(error.position(), Some(SourcePosition::new(3, 7)));
        assert_eq!(
            error.to_string(),
            "Forbidden character 0x23 at line 3, column 7"
        );

        let error = LexerError::UnbalancedQuotes { count: 3 };
        assert_eq!(error.error_code().value(), 132);
        assert_eq!(error.position(), None);
    }
}
