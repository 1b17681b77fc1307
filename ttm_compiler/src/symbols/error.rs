//! Symbol table errors

use crate::logging::codes;

pub type SymbolResult<T> = Result<T, SymbolError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
    #[error("Symbol table capacity exceeded (max {max})")]
    CapacityExceeded { max: usize },

    #[error("Symbol '{name}' already exists in scope '{scope}'")]
    DuplicateKey { scope: String, name: String },
}

impl SymbolError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            SymbolError::CapacityExceeded { .. } => codes::structural::TABLE_CAPACITY_EXCEEDED,
            SymbolError::DuplicateKey { .. } => codes::declarations::DUPLICATE_DECLARATION,
        }
    }
}
