//! Consolidated error codes and classification system
//!
//! Single source of truth for the numeric diagnostic codes, their metadata,
//! and classification functions. Codes 110-141 are compiler diagnostics,
//! the 900 range marks success and progress events.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Numeric code carried by every log event and diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(u16);

impl Code {
    /// Tag for events that carry no specific code
    pub const NONE: Code = Code(0);

    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn value(&self) -> u16 {
        self.0
    }

    pub fn is_success(&self) -> bool {
        self.0 >= 900
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: Code,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: Code,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new(1);
}

/// Source input error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_OPEN_FAILURE: Code = Code::new(110);
    pub const FILE_TOO_LARGE: Code = Code::new(112);
}

/// Preprocessing and token classification error codes
pub mod lexical {
    use super::Code;

    pub const FORBIDDEN_CHARACTER: Code = Code::new(111);
    pub const INTEGER_OUT_OF_RANGE: Code = Code::new(127);
    pub const TOO_MANY_TOKENS: Code = Code::new(128);
    pub const UNRECOGNIZED_TOKEN: Code = Code::new(129);
    pub const UNBALANCED_QUOTES: Code = Code::new(132);
}

/// Declaration and identifier error codes
pub mod declarations {
    use super::Code;

    pub const MISSING_DECLARATION_KIND: Code = Code::new(120);
    pub const MISSING_DECLARATION_TYPE: Code = Code::new(121);
    pub const DUPLICATE_DECLARATION: Code = Code::new(123);
    pub const UNDECLARED_IDENTIFIER: Code = Code::new(124);
    pub const SELF_REFERENCE: Code = Code::new(125);
    pub const EMPTY_STRING_LITERAL: Code = Code::new(126);
}

/// Whole-program structural error codes
pub mod structural {
    use super::Code;

    pub const UNBALANCED_BRACKETS: Code = Code::new(122);
    pub const MISSING_ENTRY_POINT: Code = Code::new(130);
    pub const DUPLICATE_ENTRY_POINT: Code = Code::new(131);
    pub const SCOPE_TOO_DEEP: Code = Code::new(133);
    pub const TABLE_CAPACITY_EXCEEDED: Code = Code::new(134);
}

/// Postfix conversion error codes
pub mod conversion {
    use super::Code;

    pub const MALFORMED_EXPRESSION: Code = Code::new(140);
    pub const MISSING_TERMINATOR: Code = Code::new(141);
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new(900);
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new(901);
    pub const PREPROCESSING_COMPLETE: Code = Code::new(902);
    pub const TOKEN_SPLIT_COMPLETE: Code = Code::new(903);
    pub const SCAN_COMPLETE: Code = Code::new(904);
    pub const CONVERSION_COMPLETE: Code = Code::new(905);
    pub const PIPELINE_COMPLETE: Code = Code::new(906);
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<Code, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<Code, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            ErrorMetadata::new(
                system::INTERNAL_ERROR,
                "System",
                Severity::Critical,
                false,
                true,
                "Internal compiler invariant violated",
                "File a bug report with the source that triggered it",
            ),
            ErrorMetadata::new(
                file_processing::FILE_OPEN_FAILURE,
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Source file could not be opened or read",
                "Check the path and file permissions",
            ),
            ErrorMetadata::new(
                file_processing::FILE_TOO_LARGE,
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Source file exceeds the compile-time size limit",
                "Split the program or rebuild with a larger limit",
            ),
            ErrorMetadata::new(
                lexical::FORBIDDEN_CHARACTER,
                "Lexical",
                Severity::High,
                false,
                true,
                "Forbidden character in source text",
                "Remove the character or move it inside a string literal",
            ),
            ErrorMetadata::new(
                lexical::INTEGER_OUT_OF_RANGE,
                "Lexical",
                Severity::High,
                false,
                true,
                "Integer literal does not fit in i32",
                "Use a value between -2147483648 and 2147483647",
            ),
            ErrorMetadata::new(
                lexical::TOO_MANY_TOKENS,
                "Lexical",
                Severity::High,
                false,
                true,
                "Token count exceeds the compile-time limit",
                "Split the program into smaller units",
            ),
            ErrorMetadata::new(
                lexical::UNRECOGNIZED_TOKEN,
                "Lexical",
                Severity::High,
                false,
                true,
                "Token matches no lexeme family",
                "Check spelling of keywords, identifiers and literals",
            ),
            ErrorMetadata::new(
                lexical::UNBALANCED_QUOTES,
                "Lexical",
                Severity::High,
                false,
                true,
                "Odd number of quote characters",
                "Close every string literal on the line it starts",
            ),
            ErrorMetadata::new(
                declarations::MISSING_DECLARATION_KIND,
                "Declarations",
                Severity::High,
                false,
                true,
                "Declaration has no kind context",
                "Precede the name with fn, let or a parameter datatype",
            ),
            ErrorMetadata::new(
                declarations::MISSING_DECLARATION_TYPE,
                "Declarations",
                Severity::High,
                false,
                true,
                "Declaration has no datatype",
                "Add i32 or str before the declared name",
            ),
            ErrorMetadata::new(
                declarations::DUPLICATE_DECLARATION,
                "Declarations",
                Severity::High,
                false,
                true,
                "Name already declared in this scope",
                "Rename one of the declarations",
            ),
            ErrorMetadata::new(
                declarations::UNDECLARED_IDENTIFIER,
                "Declarations",
                Severity::High,
                false,
                true,
                "Identifier used before declaration",
                "Declare the identifier with let, fn or as a parameter",
            ),
            ErrorMetadata::new(
                declarations::SELF_REFERENCE,
                "Declarations",
                Severity::High,
                false,
                true,
                "Function name used as a value inside its own body",
                "Use a local variable for the result",
            ),
            ErrorMetadata::new(
                declarations::EMPTY_STRING_LITERAL,
                "Declarations",
                Severity::Medium,
                false,
                true,
                "Empty string literal",
                "Give the literal at least one character",
            ),
            ErrorMetadata::new(
                structural::UNBALANCED_BRACKETS,
                "Structural",
                Severity::High,
                false,
                true,
                "Unbalanced parentheses or braces",
                "Match every opening bracket with a closing one",
            ),
            ErrorMetadata::new(
                structural::MISSING_ENTRY_POINT,
                "Structural",
                Severity::High,
                false,
                true,
                "Entry point main is never declared",
                "Declare fn i32 main() { ... }",
            ),
            ErrorMetadata::new(
                structural::DUPLICATE_ENTRY_POINT,
                "Structural",
                Severity::High,
                false,
                true,
                "Entry point main is declared more than once",
                "Keep a single main declaration",
            ),
            ErrorMetadata::new(
                structural::SCOPE_TOO_DEEP,
                "Structural",
                Severity::High,
                false,
                true,
                "Bracket nesting exceeds the compile-time depth limit",
                "Flatten nested expressions or blocks",
            ),
            ErrorMetadata::new(
                structural::TABLE_CAPACITY_EXCEEDED,
                "Structural",
                Severity::Critical,
                false,
                true,
                "Symbol or lexeme table capacity exceeded",
                "Split the program or rebuild with larger limits",
            ),
            ErrorMetadata::new(
                conversion::MALFORMED_EXPRESSION,
                "Conversion",
                Severity::High,
                false,
                true,
                "Expression is not well formed",
                "Check operator and operand placement",
            ),
            ErrorMetadata::new(
                conversion::MISSING_TERMINATOR,
                "Conversion",
                Severity::High,
                false,
                true,
                "Expression statement has no terminating semicolon",
                "End the statement with ';'",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific error code
pub fn get_error_metadata(code: Code) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(&code)
}

/// Get error severity from error code
pub fn get_severity(code: Code) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: Code) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: Code) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: Code) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: Code) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: Code) -> &'static str {
    if code.is_success() {
        return "Success";
    }
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Verify every code in `codes` has registry metadata
pub fn ensure_registered(module: &str, codes: &[Code]) -> Result<(), String> {
    for code in codes {
        if get_error_metadata(*code).is_none() {
            return Err(format!(
                "{} error code {} not found in metadata registry",
                module, code
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_keep_their_numbers() {
        assert_eq!(file_processing::FILE_OPEN_FAILURE.value(), 110);
        assert_eq!(lexical::FORBIDDEN_CHARACTER.value(), 111);
        assert_eq!(declarations::MISSING_DECLARATION_KIND.value(), 120);
        assert_eq!(declarations::MISSING_DECLARATION_TYPE.value(), 121);
        assert_eq!(structural::UNBALANCED_BRACKETS.value(), 122);
        assert_eq!(declarations::DUPLICATE_DECLARATION.value(), 123);
        assert_eq!(declarations::UNDECLARED_IDENTIFIER.value(), 124);
        assert_eq!(declarations::SELF_REFERENCE.value(), 125);
        assert_eq!(declarations::EMPTY_STRING_LITERAL.value(), 126);
        assert_eq!(lexical::UNRECOGNIZED_TOKEN.value(), 129);
        assert_eq!(structural::MISSING_ENTRY_POINT.value(), 130);
        assert_eq!(structural::DUPLICATE_ENTRY_POINT.value(), 131);
        assert_eq!(lexical::UNBALANCED_QUOTES.value(), 132);
    }

    #[test]
    fn test_registry_lookup() {
        let metadata = get_error_metadata(lexical::FORBIDDEN_CHARACTER).unwrap();
        assert_eq!(metadata.category, "Lexical");
        assert!(metadata.requires_halt);
        assert_eq!(get_description(Code::new(999)), "Unknown error");
    }

    #[test]
    fn test_success_codes_are_not_errors() {
        assert!(success::SCAN_COMPLETE.is_success());
        assert!(!structural::MISSING_ENTRY_POINT.is_success());
        assert_eq!(get_category(success::PIPELINE_COMPLETE), "Success");
    }

    #[test]
    fn test_ensure_registered() {
        assert!(ensure_registered("test", &[conversion::MALFORMED_EXPRESSION]).is_ok());
        assert!(ensure_registered("test", &[Code::new(555)]).is_err());
    }

    #[test]
    fn test_display_is_zero_padded() {
        assert_eq!(system::INTERNAL_ERROR.to_string(), "001");
        assert_eq!(lexical::UNBALANCED_QUOTES.to_string(), "132");
    }
}
