//! Consolidated error codes and classification system
//!
//! Single source of truth for all error codes, their metadata, and classification functions.
//! The registry is immutable data built on first use; it carries no logging state.

use crate::lexical::LexerError;
use crate::tokens::TokenStreamError;
use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maps an error value onto its registered diagnostic code
pub trait ErrorCode {
    fn error_code(&self) -> Code;

    fn severity(&self) -> Severity {
        get_severity(self.error_code().as_str())
    }

    fn is_recoverable(&self) -> bool {
        is_recoverable(self.error_code().as_str())
    }

    fn requires_halt(&self) -> bool {
        requires_halt(self.error_code().as_str())
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
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
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

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const EMPTY_FILE: Code = Code::new("E008");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const PATTERN_MISMATCH: Code = Code::new("E020");
    pub const INDENTATION_ERROR: Code = Code::new("E021");
    pub const BRACKET_UNDERFLOW: Code = Code::new("E022");
    pub const UNTERMINATED_STRING: Code = Code::new("E023");
    pub const UNCLOSED_BRACKET: Code = Code::new("E024");
    pub const CURSOR_EXHAUSTED: Code = Code::new("E025");
    pub const INVALID_PATTERN: Code = Code::new("E026");
}

/// Differential comparison error codes
pub mod differential {
    use super::Code;

    pub const REFERENCE_NOT_FOUND: Code = Code::new("E060");
    pub const REFERENCE_FAILED: Code = Code::new("E061");
    pub const REFERENCE_TIMEOUT: Code = Code::new("E062");
    pub const MALFORMED_REFERENCE_OUTPUT: Code = Code::new("E063");
    pub const TOKEN_MISMATCH: Code = Code::new("E064");
    pub const REFERENCE_PERMISSION_DENIED: Code = Code::new("E065");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const REFERENCE_MATCH: Code = Code::new("I060");
}

// ============================================================================
// ERROR CODE MAPPINGS
// ============================================================================

impl ErrorCode for LexerError {
    fn error_code(&self) -> Code {
        match self {
            LexerError::PatternMismatch { .. } => lexical::PATTERN_MISMATCH,
            LexerError::IndentationError { .. } => lexical::INDENTATION_ERROR,
            LexerError::BracketUnderflow { .. } => lexical::BRACKET_UNDERFLOW,
            LexerError::UnterminatedString { .. } => lexical::UNTERMINATED_STRING,
            LexerError::UnclosedBracket { .. } => lexical::UNCLOSED_BRACKET,
            LexerError::InvalidPattern { .. } => lexical::INVALID_PATTERN,
        }
    }
}

impl ErrorCode for TokenStreamError {
    fn error_code(&self) -> Code {
        match self {
            TokenStreamError::CursorExhausted { .. } => lexical::CURSOR_EXHAUSTED,
        }
    }
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Startup initialization failed",
                "Check configuration files and log destinations",
            ),
            // File processing errors
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Input file not found",
                "Verify the file path exists and is accessible",
            ),
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Input file has an unexpected extension",
                "Use a .py file or disable the extension requirement",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Input file exceeds the maximum size",
                "Split the file or raise the profile limit",
            ),
            ErrorMetadata::new(
                "E008",
                "FileProcessing",
                Severity::Low,
                true,
                false,
                "Input file is empty",
                "Provide a non-empty file or allow empty files",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Permission denied reading input file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E010",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Input file is not valid UTF-8",
                "Re-encode the file as UTF-8",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "I/O error reading input file",
                "Check disk and filesystem state",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Invalid input path",
                "Pass a path to a regular file",
            ),
            ErrorMetadata::new(
                "E013",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Input file exceeds the maximum line count",
                "Split the file or raise the profile limit",
            ),
            // Lexical errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::High,
                false,
                true,
                "No pattern matches the remaining line text",
                "Remove or replace the unrecognized characters",
            ),
            ErrorMetadata::new(
                "E021",
                "Lexical",
                Severity::High,
                false,
                true,
                "Unindent does not match any outer indentation level",
                "Align the line with an enclosing block",
            ),
            ErrorMetadata::new(
                "E022",
                "Lexical",
                Severity::High,
                false,
                true,
                "Closing bracket without an open counterpart",
                "Remove the bracket or add the matching opener",
            ),
            ErrorMetadata::new(
                "E023",
                "Lexical",
                Severity::High,
                false,
                true,
                "End of input inside a multi-line string",
                "Close the triple-quoted string or use the lenient policy",
            ),
            ErrorMetadata::new(
                "E024",
                "Lexical",
                Severity::High,
                false,
                true,
                "End of input inside an open bracket",
                "Close the bracket or use the lenient policy",
            ),
            ErrorMetadata::new(
                "E025",
                "Lexical",
                Severity::Low,
                true,
                false,
                "Sequential retrieval past the last token",
                "Check remaining tokens before retrieving",
            ),
            ErrorMetadata::new(
                "E026",
                "Lexical",
                Severity::Critical,
                false,
                true,
                "Pattern table entry failed to compile",
                "Fix the configured operator list",
            ),
            // Differential errors
            ErrorMetadata::new(
                "E060",
                "Differential",
                Severity::High,
                false,
                true,
                "Reference tokenizer program not found",
                "Install python3 or pass --reference",
            ),
            ErrorMetadata::new(
                "E061",
                "Differential",
                Severity::High,
                false,
                true,
                "Reference tokenizer failed",
                "Inspect the reference stderr output",
            ),
            ErrorMetadata::new(
                "E062",
                "Differential",
                Severity::High,
                false,
                true,
                "Reference tokenizer timed out",
                "Raise the timeout or shrink the input",
            ),
            ErrorMetadata::new(
                "E063",
                "Differential",
                Severity::High,
                false,
                true,
                "Reference output line could not be parsed",
                "Check the reference tokenizer version",
            ),
            ErrorMetadata::new(
                "E064",
                "Differential",
                Severity::Medium,
                true,
                false,
                "Token streams differ",
                "Inspect the mismatch context",
            ),
            ErrorMetadata::new(
                "E065",
                "Differential",
                Severity::High,
                false,
                true,
                "Reference program not permitted",
                "Add the program to the executor allow-list",
            ),
            // Success codes
            ErrorMetadata::new(
                "I001",
                "Success",
                Severity::Low,
                true,
                false,
                "Operation completed successfully",
                "No action required",
            ),
            ErrorMetadata::new(
                "I006",
                "Success",
                Severity::Low,
                true,
                false,
                "File read and split into lines",
                "Continue to tokenization",
            ),
            ErrorMetadata::new(
                "I020",
                "Success",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "No action required",
            ),
            ErrorMetadata::new(
                "I060",
                "Success",
                Severity::Low,
                true,
                false,
                "Token stream matches the reference tokenizer",
                "No action required",
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
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_is_registered() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::INVALID_EXTENSION,
            file_processing::FILE_TOO_LARGE,
            file_processing::EMPTY_FILE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            file_processing::TOO_MANY_LINES,
            lexical::PATTERN_MISMATCH,
            lexical::INDENTATION_ERROR,
            lexical::BRACKET_UNDERFLOW,
            lexical::UNTERMINATED_STRING,
            lexical::UNCLOSED_BRACKET,
            lexical::CURSOR_EXHAUSTED,
            lexical::INVALID_PATTERN,
            differential::REFERENCE_NOT_FOUND,
            differential::REFERENCE_FAILED,
            differential::REFERENCE_TIMEOUT,
            differential::MALFORMED_REFERENCE_OUTPUT,
            differential::TOKEN_MISMATCH,
            differential::REFERENCE_PERMISSION_DENIED,
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            success::FILE_PROCESSING_SUCCESS,
            success::TOKENIZATION_COMPLETE,
            success::REFERENCE_MATCH,
        ];

        for code in declared {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "{} missing from registry",
                code
            );
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
        assert!(!requires_halt("X999"));
    }

    #[test]
    fn test_lexer_error_codes() {
        let err = LexerError::IndentationError { line: 3, width: 2 };
        assert_eq!(err.error_code(), lexical::INDENTATION_ERROR);
        assert!(err.requires_halt());
        assert_eq!(get_category(err.error_code().as_str()), "Lexical");

        let exhausted = TokenStreamError::CursorExhausted { len: 0 };
        assert_eq!(exhausted.error_code(), lexical::CURSOR_EXHAUSTED);
        assert!(exhausted.is_recoverable());
        assert_eq!(exhausted.severity(), Severity::Low);
    }
}
