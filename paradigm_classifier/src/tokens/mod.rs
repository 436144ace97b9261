//! Tokens, their text format, and the parser terminal stream
//!
//! - [`Token`]: the closed set of scanner tokens with numeric wire codes
//! - [`format`]: reading and writing token text (`<N>` / `<20,M>` lines)
//! - [`TokenStream`]: scanner output normalized into parser terminals

pub mod format;
pub mod token;
pub mod token_stream;

pub use format::{
    read_token_text, write_scan_failure, write_token_text, write_token_text_with_symbols,
    DecodedTokens, TokenFormatError,
};
pub use token::{code, Token};
pub use token_stream::{Checkpoint, Terminal, TerminalKind, TokenStream};

use crate::logging::codes;

/// True when `content` looks like token text rather than source
pub fn looks_like_token_text(content: &str) -> bool {
    let trimmed = content.trim();
    trimmed.starts_with('<') && trimmed.contains('>')
}

pub fn init_token_format_logging() -> Result<(), String> {
    codes::validate_codes(
        "Token format",
        &[
            codes::token_format::MALFORMED_TOKEN_LINE,
            codes::token_format::INVALID_TOKEN_NUMBER,
            codes::token_format::UNKNOWN_TOKEN_CODE,
            codes::token_format::SCAN_FAILURE_RECORDED,
            codes::success::TOKEN_TEXT_DECODED,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_text_detection() {
        assert!(looks_like_token_text("  <1>\n<20,1>\n"));
        assert!(!looks_like_token_text("class Foo { }"));
        assert!(!looks_like_token_text("<unterminated"));
        assert!(!looks_like_token_text(""));
    }

    #[test]
    fn test_init_logging() {
        assert!(init_token_format_logging().is_ok());
    }
}
