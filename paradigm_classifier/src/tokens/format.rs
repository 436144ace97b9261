//! Token text format
//!
//! One token per line, `<N>` or `<20,M>` for identifiers with symbol id `M`.
//! A scan failure is recorded as a lone `ERROR` line. An optional
//! `Symbol Table:` trailer lists `name: id` pairs and ends the token section.

use super::token::{code, Token};
use crate::lexical::{SymbolId, SymbolTable};
use crate::logging::codes;
use std::fmt::Write as _;

pub const SCAN_FAILURE_MARKER: &str = "ERROR";
pub const SYMBOL_TABLE_HEADER: &str = "Symbol Table:";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenFormatError {
    #[error("Malformed token on line {line}: '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("Invalid token number on line {line}: '{text}'")]
    InvalidNumber { line: usize, text: String },
}

impl TokenFormatError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            TokenFormatError::MalformedLine { .. } => codes::token_format::MALFORMED_TOKEN_LINE,
            TokenFormatError::InvalidNumber { .. } => codes::token_format::INVALID_TOKEN_NUMBER,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            TokenFormatError::MalformedLine { line, .. }
            | TokenFormatError::InvalidNumber { line, .. } => *line,
        }
    }
}

/// Tokens read back from token text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedTokens {
    pub tokens: Vec<Token>,
    /// The text recorded a scan failure; `tokens` is empty
    pub failed: bool,
}

/// Canonical token lines, no spaces
pub fn write_token_text(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            Token::Identifier(id) => {
                let _ = writeln!(out, "<{},{}>", code::IDENTIFIER, id);
            }
            other => {
                let _ = writeln!(out, "<{}>", other.code());
            }
        }
    }
    out
}

/// Token lines followed by the symbol table trailer
pub fn write_token_text_with_symbols(tokens: &[Token], symbols: &SymbolTable) -> String {
    let mut out = write_token_text(tokens);
    out.push_str(&write_symbol_table(symbols));
    out
}

/// Record of a failed scan
pub fn write_scan_failure() -> String {
    format!("{}\n{}\n", SCAN_FAILURE_MARKER, SYMBOL_TABLE_HEADER)
}

fn write_symbol_table(symbols: &SymbolTable) -> String {
    let mut out = format!("{}\n", SYMBOL_TABLE_HEADER);
    for (id, name) in symbols.iter() {
        let _ = writeln!(out, "{}: {}", name, id);
    }
    out
}

/// Read token text. Blank lines are skipped and whitespace around the comma
/// is accepted. Reading stops at the symbol table trailer or at `ERROR`.
pub fn read_token_text(text: &str) -> Result<DecodedTokens, TokenFormatError> {
    let mut decoded = DecodedTokens::default();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            continue;
        }
        if trimmed.starts_with(SYMBOL_TABLE_HEADER) {
            break;
        }
        if trimmed == SCAN_FAILURE_MARKER {
            decoded.tokens.clear();
            decoded.failed = true;
            break;
        }

        decoded.tokens.push(parse_token_line(trimmed, line)?);
    }

    Ok(decoded)
}

fn parse_token_line(text: &str, line: usize) -> Result<Token, TokenFormatError> {
    let malformed = || TokenFormatError::MalformedLine {
        line,
        text: text.to_string(),
    };

    let inner = text
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(malformed)?;

    let mut parts = inner.split(',');
    let token_code = parse_number::<u32>(parts.next().unwrap_or_default(), text, line)?;
    let payload = parts.next();

    if parts.next().is_some() {
        return Err(malformed());
    }

    match (token_code, payload) {
        (code::IDENTIFIER, Some(payload)) => {
            let id = parse_number::<SymbolId>(payload, text, line)?;
            if id == 0 {
                return Err(TokenFormatError::InvalidNumber {
                    line,
                    text: text.to_string(),
                });
            }
            Ok(Token::Identifier(id))
        }
        (code::IDENTIFIER, None) | (_, Some(_)) => Err(malformed()),
        (other, None) => Ok(Token::from_code(other)),
    }
}

fn parse_number<T: std::str::FromStr>(
    field: &str,
    text: &str,
    line: usize,
) -> Result<T, TokenFormatError> {
    field
        .trim()
        .parse()
        .map_err(|_| TokenFormatError::InvalidNumber {
            line,
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_canonical_writer() {
        let tokens = [
            Token::ClassKeyword,
            Token::Identifier(1),
            Token::LBrace,
            Token::RBrace,
        ];
        assert_eq!(write_token_text(&tokens), "<1>\n<20,1>\n<4>\n<5>\n");
    }

    #[test]
    fn test_round_trip_with_symbol_trailer() {
        let mut symbols = SymbolTable::new();
        symbols.intern("Shape");
        symbols.intern("area");
        let tokens = vec![
            Token::ClassKeyword,
            Token::Identifier(1),
            Token::LBrace,
            Token::Identifier(2),
            Token::LParen,
            Token::RParen,
            Token::RBrace,
            Token::ThisKeyword,
        ];

        let text = write_token_text_with_symbols(&tokens, &symbols);
        assert!(text.ends_with("Symbol Table:\nShape: 1\narea: 2\n"));

        let decoded = read_token_text(&text).unwrap();
        assert!(!decoded.failed);
        assert_eq!(decoded.tokens, tokens);
    }

    #[test]
    fn test_reader_accepts_spaces_and_blank_lines() {
        let decoded = read_token_text("<20, 1>\n\n  <3>  \n<20 ,2>\n").unwrap();
        assert_eq!(
            decoded.tokens,
            vec![Token::Identifier(1), Token::RParen, Token::Identifier(2)]
        );
    }

    #[test]
    fn test_scan_failure_marker() {
        let decoded = read_token_text(&write_scan_failure()).unwrap();
        assert!(decoded.failed);
        assert!(decoded.tokens.is_empty());

        let decoded = read_token_text("<1>\nERROR\n<4>\n").unwrap();
        assert!(decoded.failed);
        assert!(decoded.tokens.is_empty());
    }

    #[test]
    fn test_unknown_codes_are_preserved() {
        let decoded = read_token_text("<1>\n<99>\n").unwrap();
        assert_eq!(decoded.tokens, vec![Token::ClassKeyword, Token::Unknown(99)]);
    }

    #[test]
    fn test_malformed_lines_report_line_number() {
        assert_matches!(
            read_token_text("<1>\n\nclass\n"),
            Err(TokenFormatError::MalformedLine { line: 3, .. })
        );
        assert_matches!(
            read_token_text("<20>"),
            Err(TokenFormatError::MalformedLine { line: 1, .. })
        );
        assert_matches!(
            read_token_text("<4,2>"),
            Err(TokenFormatError::MalformedLine { line: 1, .. })
        );
        assert_matches!(
            read_token_text("<20,1,2>"),
            Err(TokenFormatError::MalformedLine { .. })
        );
    }

    #[test]
    fn test_invalid_numbers() {
        let error = read_token_text("<1>\n<x>").unwrap_err();
        assert_matches!(error, TokenFormatError::InvalidNumber { line: 2, .. });
        assert_eq!(error.error_code(), codes::token_format::INVALID_TOKEN_NUMBER);

        assert_matches!(
            read_token_text("<20,0>"),
            Err(TokenFormatError::InvalidNumber { .. })
        );
        assert_matches!(
            read_token_text("<-1>"),
            Err(TokenFormatError::InvalidNumber { .. })
        );
    }

    #[test]
    fn test_empty_text_decodes_to_nothing() {
        assert_eq!(read_token_text("").unwrap(), DecodedTokens::default());
        assert_eq!(read_token_text("Symbol Table:\n").unwrap(), DecodedTokens::default());
    }
}
