//! Lexical analysis
//!
//! A single left-to-right pass driven by a fixed transition table. Each
//! character is classified into a [`CharacterCategory`], the table yields the
//! next [`ScanState`], and accepted lexemes become [`Token`]s. Identifiers are
//! interned into a per-scan [`SymbolTable`].
//!
//! [`Token`]: crate::tokens::Token

pub mod classifier;
pub mod scanner;
pub mod symbols;
pub mod transition;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;

pub use classifier::CharacterCategory;
pub use scanner::{LexicalMetrics, LexicalScanner, ScanError, ScanOutput};
pub use symbols::{SymbolId, SymbolTable};
pub use transition::{next_state, ScanState, TRANSITION_TABLE};

/// Scan with default preferences
pub fn scan(text: &str) -> Result<ScanOutput, ScanError> {
    LexicalScanner::new().scan(text)
}

pub fn scan_with_preferences(
    text: &str,
    preferences: LexicalPreferences,
) -> Result<ScanOutput, ScanError> {
    LexicalScanner::with_preferences(preferences).scan(text)
}

/// Validate lexical error codes and limits at startup
pub fn init_lexical_logging() -> Result<(), String> {
    codes::validate_codes(
        "Lexical",
        &[
            codes::lexical::INVALID_CHARACTER,
            codes::lexical::IDENTIFIER_TOO_LONG,
            codes::lexical::TOO_MANY_TOKENS,
            codes::lexical::TOO_MANY_SYMBOLS,
            codes::success::TOKENIZATION_COMPLETE,
        ],
    )?;

    validate_limits()?;

    crate::log_debug!("Lexical limits initialized",
        "max_identifier_length" => MAX_IDENTIFIER_LENGTH,
        "max_token_count" => MAX_TOKEN_COUNT,
        "max_symbol_count" => MAX_SYMBOL_COUNT
    );

    Ok(())
}

fn validate_limits() -> Result<(), String> {
    if MAX_IDENTIFIER_LENGTH == 0 {
        return Err("MAX_IDENTIFIER_LENGTH cannot be zero".to_string());
    }
    if MAX_TOKEN_COUNT == 0 {
        return Err("MAX_TOKEN_COUNT cannot be zero".to_string());
    }
    if MAX_SYMBOL_COUNT > MAX_TOKEN_COUNT {
        return Err("MAX_SYMBOL_COUNT cannot exceed MAX_TOKEN_COUNT".to_string());
    }
    Ok(())
}
