//! Consolidated error codes and classification system
//!
//! Single source of truth for all error, warning and success codes together
//! with their behavioral metadata.

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

/// Complete metadata for a code
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
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
    pub const TOO_MANY_LINES: Code = Code::new("E013");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const INVALID_CHARACTER: Code = Code::new("E020");
    pub const IDENTIFIER_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
    pub const TOO_MANY_SYMBOLS: Code = Code::new("E028");
}

/// Token text format error codes
pub mod token_format {
    use super::Code;

    pub const MALFORMED_TOKEN_LINE: Code = Code::new("E030");
    pub const INVALID_TOKEN_NUMBER: Code = Code::new("E031");
    pub const UNKNOWN_TOKEN_CODE: Code = Code::new("W032");
    pub const SCAN_FAILURE_RECORDED: Code = Code::new("E033");
}

/// Syntax analysis codes. Mismatches are recovered, so most are warnings.
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const NO_VIABLE_ALTERNATIVE: Code = Code::new("E051");
    pub const RECOVERY_EXHAUSTED: Code = Code::new("W052");
    pub const MAX_PARSE_DEPTH_EXCEEDED: Code = Code::new("E087");
}

/// Batch processing error codes
pub mod batch {
    use super::Code;

    pub const DIRECTORY_NOT_FOUND: Code = Code::new("E090");
    pub const NO_INPUT_FILES: Code = Code::new("E091");
    pub const TOO_MANY_FILES: Code = Code::new("E092");
    pub const WORKER_FAILURE: Code = Code::new("E093");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const OPERATION_COMPLETED_SUCCESSFULLY: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TOKEN_TEXT_DECODED: Code = Code::new("I030");
    pub const PARSE_COMPLETE: Code = Code::new("I040");
    pub const CLASSIFICATION_COMPLETE: Code = Code::new("I041");
    pub const BATCH_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let mut registry = HashMap::new();
        let mut register = |code: Code,
                            category: &'static str,
                            severity: Severity,
                            recoverable: bool,
                            requires_halt: bool,
                            description: &'static str,
                            action: &'static str| {
            registry.insert(
                code.as_str(),
                ErrorMetadata::new(
                    code.as_str(),
                    category,
                    severity,
                    recoverable,
                    requires_halt,
                    description,
                    action,
                ),
            );
        };

        // System errors
        register(
            system::INTERNAL_ERROR,
            "System",
            Severity::Critical,
            false,
            true,
            "Critical internal system error",
            "File a bug report with the input that triggered it",
        );
        register(
            system::INITIALIZATION_FAILURE,
            "System",
            Severity::Critical,
            false,
            true,
            "System initialization failure",
            "Check logging configuration and environment variables",
        );
        register(
            system::CONFIGURATION_ERROR,
            "System",
            Severity::High,
            false,
            true,
            "Runtime configuration could not be loaded",
            "Fix the TOML file passed with --config",
        );

        // File processing errors
        register(
            file_processing::FILE_NOT_FOUND,
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file not found",
            "Verify the file path exists and is accessible",
        );
        register(
            file_processing::INVALID_EXTENSION,
            "FileProcessing",
            Severity::Low,
            true,
            false,
            "Input file has an unsupported extension",
            "Use a .txt, .src or .tok file or disable extension checks",
        );
        register(
            file_processing::FILE_TOO_LARGE,
            "FileProcessing",
            Severity::High,
            false,
            true,
            "Input file exceeds the compile-time size limit",
            "Split the input or rebuild with a larger max_file_size",
        );
        register(
            file_processing::PERMISSION_DENIED,
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Permission denied while reading input",
            "Check file permissions",
        );
        register(
            file_processing::INVALID_ENCODING,
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input file is not valid UTF-8",
            "Convert the file to UTF-8",
        );
        register(
            file_processing::IO_ERROR,
            "FileProcessing",
            Severity::High,
            false,
            true,
            "I/O error while reading input",
            "Check disk health and retry",
        );
        register(
            file_processing::INVALID_PATH,
            "FileProcessing",
            Severity::Medium,
            false,
            true,
            "Input path is not a regular file",
            "Pass a file, or a directory for batch mode",
        );
        register(
            file_processing::TOO_MANY_LINES,
            "FileProcessing",
            Severity::High,
            false,
            true,
            "Input file exceeds the line limit for analysis",
            "Split the input into smaller snippets",
        );

        // Lexical errors
        register(
            lexical::INVALID_CHARACTER,
            "Lexical",
            Severity::High,
            false,
            true,
            "Character has no transition in the scanner table",
            "Remove digits and punctuation other than ( ) { }",
        );
        register(
            lexical::IDENTIFIER_TOO_LONG,
            "Lexical",
            Severity::High,
            false,
            true,
            "Identifier exceeds the maximum length",
            "Shorten the identifier",
        );
        register(
            lexical::TOO_MANY_TOKENS,
            "Lexical",
            Severity::High,
            false,
            true,
            "Input produced more tokens than allowed",
            "Classify a smaller snippet",
        );
        register(
            lexical::TOO_MANY_SYMBOLS,
            "Lexical",
            Severity::High,
            false,
            true,
            "Symbol table exceeded its capacity",
            "Classify a smaller snippet",
        );

        // Token format errors
        register(
            token_format::MALFORMED_TOKEN_LINE,
            "TokenFormat",
            Severity::High,
            false,
            true,
            "Token file line is not of the form <N> or <N,M>",
            "Regenerate the token file with --tokens",
        );
        register(
            token_format::INVALID_TOKEN_NUMBER,
            "TokenFormat",
            Severity::High,
            false,
            true,
            "Token code or symbol id is not a valid number",
            "Regenerate the token file with --tokens",
        );
        register(
            token_format::UNKNOWN_TOKEN_CODE,
            "TokenFormat",
            Severity::Low,
            true,
            false,
            "Token code is not part of the grammar and was ignored",
            "No action required",
        );
        register(
            token_format::SCAN_FAILURE_RECORDED,
            "TokenFormat",
            Severity::High,
            false,
            true,
            "Token file ends with the ERROR sentinel",
            "Fix the source text and rescan it",
        );

        // Syntax diagnostics
        register(
            syntax::UNEXPECTED_TOKEN,
            "Syntax",
            Severity::Low,
            true,
            false,
            "Expected terminal not found; recovered by panic mode",
            "No action required, the classification reflects the mismatch",
        );
        register(
            syntax::NO_VIABLE_ALTERNATIVE,
            "Syntax",
            Severity::Low,
            true,
            false,
            "No production applies to the current terminal",
            "No action required, the classification reflects the mismatch",
        );
        register(
            syntax::RECOVERY_EXHAUSTED,
            "Syntax",
            Severity::Low,
            true,
            false,
            "Recovery attempt budget spent; later mismatches are ignored",
            "Expect lower confidence and coverage for this input",
        );
        register(
            syntax::MAX_PARSE_DEPTH_EXCEEDED,
            "Syntax",
            Severity::Medium,
            true,
            false,
            "Block nesting exceeds the maximum parse depth; body skipped",
            "Reduce nesting or rebuild with a larger max_parse_depth",
        );

        // Batch errors
        register(
            batch::DIRECTORY_NOT_FOUND,
            "Batch",
            Severity::Medium,
            false,
            true,
            "Batch directory not found",
            "Verify the directory path",
        );
        register(
            batch::NO_INPUT_FILES,
            "Batch",
            Severity::Low,
            true,
            false,
            "No classifiable files found in directory",
            "Check the directory contents and extensions",
        );
        register(
            batch::TOO_MANY_FILES,
            "Batch",
            Severity::Medium,
            false,
            true,
            "Directory holds more files than the batch limit",
            "Use --max-files or split the directory",
        );
        register(
            batch::WORKER_FAILURE,
            "Batch",
            Severity::High,
            false,
            true,
            "A batch worker thread panicked",
            "Rerun with --sequential to isolate the input",
        );

        // Success codes
        register(
            success::OPERATION_COMPLETED_SUCCESSFULLY,
            "Success",
            Severity::Low,
            true,
            false,
            "Operation completed successfully",
            "No action required",
        );
        register(
            success::SYSTEM_INITIALIZATION_COMPLETED,
            "Success",
            Severity::Low,
            true,
            false,
            "System initialization completed",
            "No action required",
        );
        register(
            success::FILE_PROCESSING_SUCCESS,
            "Success",
            Severity::Low,
            true,
            false,
            "Input file read and validated",
            "No action required",
        );
        register(
            success::TOKENIZATION_COMPLETE,
            "Success",
            Severity::Low,
            true,
            false,
            "Source text scanned into tokens",
            "No action required",
        );
        register(
            success::TOKEN_TEXT_DECODED,
            "Success",
            Severity::Low,
            true,
            false,
            "Token text decoded",
            "No action required",
        );
        register(
            success::PARSE_COMPLETE,
            "Success",
            Severity::Low,
            true,
            false,
            "Best-match parse completed",
            "No action required",
        );
        register(
            success::CLASSIFICATION_COMPLETE,
            "Success",
            Severity::Low,
            true,
            false,
            "Input classified",
            "No action required",
        );
        register(
            success::BATCH_COMPLETE,
            "Success",
            Severity::Low,
            true,
            false,
            "Batch classification completed",
            "No action required",
        );

        registry
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get error metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
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

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

/// Verify every code in `codes` has registry metadata
pub fn validate_codes(module: &str, codes: &[Code]) -> Result<(), String> {
    for code in codes {
        if get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "{} code {} not found in metadata registry",
                module,
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let metadata = get_error_metadata("E020").unwrap();
        assert_eq!(metadata.category, "Lexical");
        assert!(metadata.requires_halt);
        assert_eq!(get_severity("E020"), Severity::High);
    }

    #[test]
    fn test_syntax_codes_are_recoverable() {
        for code in [
            syntax::UNEXPECTED_TOKEN,
            syntax::NO_VIABLE_ALTERNATIVE,
            syntax::RECOVERY_EXHAUSTED,
            syntax::MAX_PARSE_DEPTH_EXCEEDED,
        ] {
            assert!(is_recoverable(code.as_str()), "{} should recover", code);
            assert!(!requires_halt(code.as_str()));
        }
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_action("X999"), "No specific action available");
        assert_eq!(get_category("X999"), "Unknown");
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
    }

    #[test]
    fn test_validate_codes_reports_missing() {
        assert!(validate_codes("Lexical", &[lexical::INVALID_CHARACTER]).is_ok());
        let err = validate_codes("Test", &[Code::new("Z001")]).unwrap_err();
        assert!(err.contains("Z001"));
    }
}
