//! Syntax errors recorded during classification
//!
//! None of these abort a parse. They are kept in a bounded history for
//! diagnostics and feed the error count used by scoring.

use crate::config::compile_time::syntax::MAX_PARSE_DEPTH;
use crate::logging::{codes, Code};
use crate::tokens::TerminalKind;
use crate::utils::Span;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Unexpected token at {position}: expected '{expected}', found '{found}'")]
    UnexpectedToken {
        expected: TerminalKind,
        found: TerminalKind,
        position: usize,
        span: Option<Span>,
    },

    #[error("No viable alternative at {position} for '{found}' in {context}")]
    NoViableAlternative {
        found: TerminalKind,
        context: String,
        position: usize,
        span: Option<Span>,
    },

    #[error("Maximum parse depth {MAX_PARSE_DEPTH} exceeded at {position}")]
    MaxParseDepth {
        position: usize,
        span: Option<Span>,
    },
}

impl SyntaxError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::NoViableAlternative { .. } => codes::syntax::NO_VIABLE_ALTERNATIVE,
            Self::MaxParseDepth { .. } => codes::syntax::MAX_PARSE_DEPTH_EXCEEDED,
        }
    }

    /// Terminal index where the error was detected
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::NoViableAlternative { position, .. }
            | Self::MaxParseDepth { position, .. } => *position,
        }
    }

    /// Source span, when the input came from the scanner
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::NoViableAlternative { span, .. }
            | Self::MaxParseDepth { span, .. } => *span,
        }
    }

    pub fn description(&self) -> &'static str {
        codes::get_description(self.error_code().as_str())
    }
}
