//! Scanner errors

use crate::logging::codes;
use crate::utils::SourcePosition;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Unrecognized token '{token}' at line {line}")]
    UnrecognizedToken { token: String, line: u32 },

    #[error("Identifier '{name}' at line {line} has no declaration keyword")]
    MissingDeclarationKind { name: String, line: u32 },

    #[error("Identifier '{name}' at line {line} has no data type")]
    MissingDeclarationType { name: String, line: u32 },

    #[error("Unbalanced brackets: {detail}")]
    UnbalancedBrackets { detail: String, line: Option<u32> },

    #[error("Duplicate declaration of '{name}' at line {line}")]
    DuplicateDeclaration { name: String, line: u32 },

    #[error("Undeclared identifier '{name}' at line {line}")]
    UndeclaredIdentifier { name: String, line: u32 },

    #[error("Function '{name}' refers to itself outside a call at line {line}")]
    SelfReference { name: String, line: u32 },

    #[error("Empty string literal at line {line}")]
    EmptyStringLiteral { line: u32 },

    #[error("Integer literal '{literal}' does not fit in i32 at line {line}")]
    IntegerOutOfRange { literal: String, line: u32 },

    #[error("Entry point 'main' is never declared")]
    MissingMain,

    #[error("Entry point 'main' declared again at line {line}")]
    DuplicateMain { line: u32 },

    #[error("Scope nesting deeper than {max} at line {line}")]
    ScopeTooDeep { max: usize, line: u32 },

    #[error("{table} table capacity exceeded (max {max}) at line {line}")]
    CapacityExceeded {
        table: &'static str,
        max: usize,
        line: u32,
    },
}

impl ScanError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ScanError::UnrecognizedToken { .. } => codes::lexical::UNRECOGNIZED_TOKEN,
            ScanError::MissingDeclarationKind { .. } => {
                codes::declarations::MISSING_DECLARATION_KIND
            }
            ScanError::MissingDeclarationType { .. } => {
                codes::declarations::MISSING_DECLARATION_TYPE
            }
            ScanError::UnbalancedBrackets { .. } => codes::structural::UNBALANCED_BRACKETS,
            ScanError::DuplicateDeclaration { .. } => codes::declarations::DUPLICATE_DECLARATION,
            ScanError::UndeclaredIdentifier { .. } => codes::declarations::UNDECLARED_IDENTIFIER,
            ScanError::SelfReference { .. } => codes::declarations::SELF_REFERENCE,
            ScanError::EmptyStringLiteral { .. } => codes::declarations::EMPTY_STRING_LITERAL,
            ScanError::IntegerOutOfRange { .. } => codes::lexical::INTEGER_OUT_OF_RANGE,
            ScanError::MissingMain => codes::structural::MISSING_ENTRY_POINT,
            ScanError::DuplicateMain { .. } => codes::structural::DUPLICATE_ENTRY_POINT,
            ScanError::ScopeTooDeep { .. } => codes::structural::SCOPE_TOO_DEEP,
            ScanError::CapacityExceeded { .. } => codes::structural::TABLE_CAPACITY_EXCEEDED,
        }
    }

    pub fn line(&self) -> Option<u32> {
        match self {
            ScanError::UnrecognizedToken { line, .. }
            | ScanError::MissingDeclarationKind { line, .. }
            | ScanError::MissingDeclarationType { line, .. }
            | ScanError::DuplicateDeclaration { line, .. }
            | ScanError::UndeclaredIdentifier { line, .. }
            | ScanError::SelfReference { line, .. }
            | ScanError::EmptyStringLiteral { line }
            | ScanError::IntegerOutOfRange { line, .. }
            | ScanError::DuplicateMain { line }
            | ScanError::ScopeTooDeep { line, .. }
            | ScanError::CapacityExceeded { line, .. } => Some(*line),
            ScanError::UnbalancedBrackets { line, .. } => *line,
            ScanError::MissingMain => None,
        }
    }

    pub fn position(&self) -> Option<SourcePosition> {
        self.line().map(SourcePosition::at_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let cases = [
            (
                ScanError::UnrecognizedToken {
                    token: "!".into(),
                    line: 1,
                },
                129,
            ),
            (
                ScanError::MissingDeclarationType {
                    name: "x".into(),
                    line: 1,
                },
                121,
            ),
            (
                ScanError::UnbalancedBrackets {
                    detail: "x".into(),
                    line: None,
                },
                122,
            ),
            (ScanError::MissingMain, 130),
            (ScanError::DuplicateMain { line: 4 }, 131),
            (ScanError::EmptyStringLiteral { line: 2 }, 126),
        ];

        for (error, code) in cases {
            assert_eq!(error.error_code().value(), code, "{}", error);
        }
    }

    #[test]
    fn test_positions() {
        assert_eq!(ScanError::MissingMain.position(), None);
        assert_eq!(
            ScanError::DuplicateMain { line: 4 }.position(),
            Some(SourcePosition::at_line(4))
        );
    }
}
