//! Parser terminal stream
//!
//! Normalizes scanner tokens, with or without spans, into the terminals the
//! syntax classifier consumes. `this` and `new` carry no structure and are
//! dropped, as are unknown codes read from token text. A single `$` end
//! marker is always appended.

use super::token::Token;
use crate::lexical::SymbolId;
use crate::logging::codes;
use crate::utils::{Span, Spanned};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerminalKind {
    Class,
    Id,
    LParen,
    RParen,
    LBrace,
    RBrace,
    /// `$`
    End,
}

impl TerminalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Id => "id",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::End => "$",
        }
    }
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminal {
    pub kind: TerminalKind,
    /// Symbol id carried by `id` terminals, opaque to the parser
    pub symbol: Option<SymbolId>,
    /// Source span; absent for token-text input
    pub span: Option<Span>,
}

impl Terminal {
    pub fn new(kind: TerminalKind, span: Option<Span>) -> Self {
        Self {
            kind,
            symbol: None,
            span,
        }
    }

    pub fn identifier(id: SymbolId, span: Option<Span>) -> Self {
        Self {
            kind: TerminalKind::Id,
            symbol: Some(id),
            span,
        }
    }

    pub fn end() -> Self {
        Self::new(TerminalKind::End, None)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TerminalKind::End
    }
}

/// Saved cursor position for lookahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Terminal sequence ending in `$`, with a cursor
#[derive(Debug, Clone)]
pub struct TokenStream {
    terminals: Vec<Terminal>,
    position: usize,
    dropped_keywords: usize,
    dropped_unknown: usize,
}

impl TokenStream {
    /// Build from scanner output, keeping spans
    pub fn from_spanned(tokens: &[Spanned<Token>]) -> Self {
        Self::build(tokens.iter().map(|t| (t.value, Some(t.span))))
    }

    /// Build from tokens without positions, e.g. decoded token text
    pub fn from_tokens(tokens: &[Token]) -> Self {
        Self::build(tokens.iter().map(|t| (*t, None)))
    }

    fn build(tokens: impl Iterator<Item = (Token, Option<Span>)>) -> Self {
        let mut terminals = Vec::new();
        let mut dropped_keywords = 0;
        let mut dropped_unknown = 0;

        for (token, span) in tokens {
            let terminal = match token {
                Token::ClassKeyword => Terminal::new(TerminalKind::Class, span),
                Token::LParen => Terminal::new(TerminalKind::LParen, span),
                Token::RParen => Terminal::new(TerminalKind::RParen, span),
                Token::LBrace => Terminal::new(TerminalKind::LBrace, span),
                Token::RBrace => Terminal::new(TerminalKind::RBrace, span),
                Token::Identifier(id) => Terminal::identifier(id, span),
                Token::ThisKeyword | Token::NewKeyword => {
                    dropped_keywords += 1;
                    continue;
                }
                Token::Unknown(value) => {
                    dropped_unknown += 1;
                    crate::log_warning!(code = codes::token_format::UNKNOWN_TOKEN_CODE,
                        "Dropping unknown token code",
                        "code" => value
                    );
                    continue;
                }
            };
            terminals.push(terminal);
        }

        terminals.push(Terminal::end());

        Self {
            terminals,
            position: 0,
            dropped_keywords,
            dropped_unknown,
        }
    }

    /// Current terminal; stays on `$` once reached
    pub fn current(&self) -> &Terminal {
        &self.terminals[self.position.min(self.last_index())]
    }

    pub fn current_kind(&self) -> TerminalKind {
        self.current().kind
    }

    /// Terminal after the current one, or `$`
    pub fn peek(&self) -> &Terminal {
        &self.terminals[(self.position + 1).min(self.last_index())]
    }

    /// Move past the current terminal. Never moves past `$`.
    pub fn advance(&mut self) {
        if self.position < self.last_index() {
            self.position += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current().is_end()
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0.min(self.last_index());
    }

    /// Number of terminals consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Input terminals, not counting `$`
    pub fn len(&self) -> usize {
        self.last_index()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn terminals(&self) -> &[Terminal] {
        &self.terminals[..self.last_index()]
    }

    pub fn dropped_keywords(&self) -> usize {
        self.dropped_keywords
    }

    pub fn dropped_unknown(&self) -> usize {
        self.dropped_unknown
    }

    fn last_index(&self) -> usize {
        self.terminals.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Position;

    fn kinds(stream: &TokenStream) -> Vec<TerminalKind> {
        stream.terminals().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_adapter_mapping_drops_this_and_new() {
        let stream = TokenStream::from_tokens(&[
            Token::ClassKeyword,
            Token::Identifier(1),
            Token::LBrace,
            Token::ThisKeyword,
            Token::NewKeyword,
            Token::LParen,
            Token::RParen,
            Token::RBrace,
        ]);

        assert_eq!(
            kinds(&stream),
            vec![
                TerminalKind::Class,
                TerminalKind::Id,
                TerminalKind::LBrace,
                TerminalKind::LParen,
                TerminalKind::RParen,
                TerminalKind::RBrace
            ]
        );
        assert_eq!(stream.len(), 6);
        assert_eq!(stream.dropped_keywords(), 2);
        assert_eq!(stream.terminals()[1].symbol, Some(1));
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let stream = TokenStream::from_tokens(&[Token::Unknown(99), Token::Identifier(4)]);
        assert_eq!(kinds(&stream), vec![TerminalKind::Id]);
        assert_eq!(stream.dropped_unknown(), 1);
    }

    #[test]
    fn test_empty_stream_is_only_end_marker() {
        let stream = TokenStream::from_tokens(&[]);
        assert!(stream.is_empty());
        assert!(stream.is_at_end());
        assert_eq!(stream.peek().kind, TerminalKind::End);
    }

    #[test]
    fn test_cursor_stops_at_end() {
        let mut stream = TokenStream::from_tokens(&[Token::Identifier(1)]);
        assert_eq!(stream.current_kind(), TerminalKind::Id);
        assert_eq!(stream.peek().kind, TerminalKind::End);

        stream.advance();
        stream.advance();
        assert!(stream.is_at_end());
        assert_eq!(stream.position(), 1);
    }

    #[test]
    fn test_checkpoint_and_rollback() {
        let mut stream =
            TokenStream::from_tokens(&[Token::Identifier(1), Token::LParen, Token::RParen]);
        let checkpoint = stream.checkpoint();
        stream.advance();
        stream.advance();
        assert_eq!(stream.current_kind(), TerminalKind::RParen);

        stream.rollback(checkpoint);
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.current_kind(), TerminalKind::Id);
    }

    #[test]
    fn test_spans_are_kept_from_scanner_output() {
        let span = Span::single(Position::start(), '{');
        let stream = TokenStream::from_spanned(&[Spanned::new(Token::LBrace, span)]);
        assert_eq!(stream.current().span, Some(span));
        assert_eq!(stream.peek().span, None);
    }
}
