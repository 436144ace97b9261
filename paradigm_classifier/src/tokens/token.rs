//! Scanner tokens and their numeric wire codes

use crate::lexical::SymbolId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric token codes used by the token text format
pub mod code {
    pub const CLASS: u32 = 1;
    pub const LPAREN: u32 = 2;
    pub const RPAREN: u32 = 3;
    pub const LBRACE: u32 = 4;
    pub const RBRACE: u32 = 5;
    pub const THIS: u32 = 6;
    pub const NEW: u32 = 7;
    pub const IDENTIFIER: u32 = 20;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    ClassKeyword,
    ThisKeyword,
    NewKeyword,
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// Identifier, known by its symbol id
    Identifier(SymbolId),
    /// Code read from token text that no scanner emits
    Unknown(u32),
}

impl Token {
    /// Keyword for a lexeme, compared after lowercase folding
    pub fn keyword(lexeme: &str) -> Option<Self> {
        match lexeme.to_lowercase().as_str() {
            "class" => Some(Self::ClassKeyword),
            "this" => Some(Self::ThisKeyword),
            "new" => Some(Self::NewKeyword),
            _ => None,
        }
    }

    pub fn punctuation(ch: char) -> Option<Self> {
        match ch {
            '(' => Some(Self::LParen),
            ')' => Some(Self::RParen),
            '{' => Some(Self::LBrace),
            '}' => Some(Self::RBrace),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::ClassKeyword => code::CLASS,
            Self::LParen => code::LPAREN,
            Self::RParen => code::RPAREN,
            Self::LBrace => code::LBRACE,
            Self::RBrace => code::RBRACE,
            Self::ThisKeyword => code::THIS,
            Self::NewKeyword => code::NEW,
            Self::Identifier(_) => code::IDENTIFIER,
            Self::Unknown(value) => *value,
        }
    }

    /// Token for a code without payload. Identifiers need a symbol id and
    /// are built directly.
    pub fn from_code(value: u32) -> Self {
        match value {
            code::CLASS => Self::ClassKeyword,
            code::LPAREN => Self::LParen,
            code::RPAREN => Self::RParen,
            code::LBRACE => Self::LBrace,
            code::RBRACE => Self::RBrace,
            code::THIS => Self::ThisKeyword,
            code::NEW => Self::NewKeyword,
            other => Self::Unknown(other),
        }
    }

    pub fn symbol_id(&self) -> Option<SymbolId> {
        match self {
            Self::Identifier(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            Self::ClassKeyword | Self::ThisKeyword | Self::NewKeyword
        )
    }

    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            Self::LParen | Self::RParen | Self::LBrace | Self::RBrace
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassKeyword => write!(f, "class"),
            Self::ThisKeyword => write!(f, "this"),
            Self::NewKeyword => write!(f, "new"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::LBrace => write!(f, "{{"),
            Self::RBrace => write!(f, "}}"),
            Self::Identifier(id) => write!(f, "id#{}", id),
            Self::Unknown(value) => write!(f, "<unknown {}>", value),
        }
    }
}
