//! Syntax classification
//!
//! Runs the predictive parser over a [`TokenStream`] and returns the parse
//! counters the scorer works from. No tree is built.

mod error;
mod parser;

pub use error::SyntaxError;
pub use parser::{BestMatch, ParseProgress, ParseStatistics, SyntaxClassifier};

use crate::config::compile_time::syntax::*;
use crate::config::runtime::SyntaxPreferences;
use crate::logging::codes;
use crate::tokens::TokenStream;

/// Parse with default preferences
pub fn classify_stream(stream: TokenStream) -> ParseStatistics {
    SyntaxClassifier::new(stream).parse()
}

pub fn classify_stream_with_preferences(
    stream: TokenStream,
    preferences: SyntaxPreferences,
) -> ParseStatistics {
    SyntaxClassifier::with_preferences(stream, preferences).parse()
}

/// Validate syntax codes and limits at startup
pub fn init_syntax_logging() -> Result<(), String> {
    codes::validate_codes(
        "Syntax",
        &[
            codes::syntax::UNEXPECTED_TOKEN,
            codes::syntax::NO_VIABLE_ALTERNATIVE,
            codes::syntax::RECOVERY_EXHAUSTED,
            codes::syntax::MAX_PARSE_DEPTH_EXCEEDED,
            codes::success::PARSE_COMPLETE,
        ],
    )?;

    if MAX_PARSE_DEPTH == 0 {
        return Err("MAX_PARSE_DEPTH cannot be zero".to_string());
    }
    if MAX_ERROR_HISTORY == 0 {
        return Err("MAX_ERROR_HISTORY cannot be zero".to_string());
    }

    crate::log_debug!("Syntax limits initialized",
        "max_parse_depth" => MAX_PARSE_DEPTH,
        "max_recovery_attempts" => MAX_RECOVERY_ATTEMPTS,
        "max_error_history" => MAX_ERROR_HISTORY
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    #[test]
    fn test_init_logging() {
        assert!(init_syntax_logging().is_ok());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let tokens = [
            Token::ClassKeyword,
            Token::Identifier(1),
            Token::LBrace,
            Token::RBrace,
        ];
        let first = classify_stream(TokenStream::from_tokens(&tokens));
        let second = classify_stream_with_preferences(
            TokenStream::from_tokens(&tokens),
            SyntaxPreferences::default(),
        );
        assert_eq!(first.best, second.best);
        assert_eq!(first.progress, second.progress);
    }
}
