use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::{codes, Code};
use crate::polish::PolishError;
use crate::scanner::ScanError;
use serde::Serialize;
use std::fmt;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),

    #[error("Scanning failed: {0}")]
    Scanning(#[from] ScanError),

    #[error("Postfix conversion failed: {0}")]
    Conversion(#[from] PolishError),

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::LexicalAnalysis(e) => e.error_code(),
            PipelineError::Scanning(e) => e.error_code(),
            PipelineError::Conversion(e) => e.error_code(),
            PipelineError::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }

    /// The failure value handed to callers: numeric code plus location
    pub fn diagnostic(&self) -> Diagnostic {
        let (line, column) = match self {
            PipelineError::LexicalAnalysis(e) => (e.line(), e.column()),
            PipelineError::Scanning(e) => (e.line(), None),
            PipelineError::Conversion(e) => (e.line(), None),
            PipelineError::FileProcessing(_) | PipelineError::Pipeline { .. } => (None, None),
        };

        Diagnostic {
            code: self.error_code().value(),
            line,
            column,
        }
    }
}

/// Numeric error code with the line and column where known
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: u16,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}", self.code)?;
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, " at line {}, column {}", line, column),
            (Some(line), None) => write!(f, " at line {}", line),
            _ => Ok(()),
        }
    }
}
