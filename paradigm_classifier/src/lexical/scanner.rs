//! Table-driven lexical scanner

use super::classifier::CharacterCategory;
use super::symbols::SymbolTable;
use super::transition::{next_state, ScanState};
use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::tokens::Token;
use crate::utils::{Position, Span, Spanned};
use crate::{log_debug, log_error, log_success};

/// Fatal scan errors. No tokens are returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    #[error("Invalid character '{character}' at {position}")]
    InvalidCharacter { character: char, position: Position },

    #[error("Identifier too long at {position}: more than {MAX_IDENTIFIER_LENGTH} characters")]
    IdentifierTooLong { position: Position },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize, position: Position },

    #[error("Too many symbols: {count} (max {MAX_SYMBOL_COUNT})")]
    TooManySymbols { count: usize, position: Position },
}

impl ScanError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            ScanError::InvalidCharacter { .. } => codes::lexical::INVALID_CHARACTER,
            ScanError::IdentifierTooLong { .. } => codes::lexical::IDENTIFIER_TOO_LONG,
            ScanError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            ScanError::TooManySymbols { .. } => codes::lexical::TOO_MANY_SYMBOLS,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            ScanError::InvalidCharacter { position, .. }
            | ScanError::IdentifierTooLong { position }
            | ScanError::TooManyTokens { position, .. }
            | ScanError::TooManySymbols { position, .. } => *position,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ScanError::InvalidCharacter {
                character,
                position,
            } => Span::single(*position, *character),
            other => Span::new(other.position(), other.position()),
        }
    }
}

/// Counters for one scan. Per-category counts are only kept when
/// `collect_detailed_metrics` is enabled.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub chars_read: usize,
    pub total_tokens: usize,
    pub identifier_tokens: usize,
    pub keyword_tokens: usize,
    pub punctuation_tokens: usize,
    pub whitespace_skipped: usize,
    pub longest_identifier: usize,
}

impl LexicalMetrics {
    fn record_token(&mut self, token: &Token, preferences: &LexicalPreferences) {
        self.total_tokens += 1;

        if !preferences.collect_detailed_metrics {
            return;
        }

        match token {
            Token::Identifier(_) => self.identifier_tokens += 1,
            Token::ClassKeyword | Token::ThisKeyword | Token::NewKeyword => {
                self.keyword_tokens += 1
            }
            Token::LParen | Token::RParen | Token::LBrace | Token::RBrace => {
                self.punctuation_tokens += 1
            }
            Token::Unknown(_) => {}
        }
    }
}

/// Successful scan result
#[derive(Debug, Clone)]
pub struct ScanOutput {
    pub tokens: Vec<Spanned<Token>>,
    pub symbols: SymbolTable,
    pub metrics: LexicalMetrics,
}

impl ScanOutput {
    /// Token values without spans
    pub fn token_values(&self) -> Vec<Token> {
        self.tokens.iter().map(|t| t.value).collect()
    }
}

/// Identifier run being accumulated
struct PendingLexeme {
    text: String,
    chars: usize,
    start: Position,
}

/// One scanner per input; nothing is shared between scans
pub struct LexicalScanner {
    preferences: LexicalPreferences,
    tokens: Vec<Spanned<Token>>,
    symbols: SymbolTable,
    metrics: LexicalMetrics,
}

impl LexicalScanner {
    pub fn new() -> Self {
        Self::with_preferences(LexicalPreferences::default())
    }

    pub fn with_preferences(preferences: LexicalPreferences) -> Self {
        Self {
            preferences,
            tokens: Vec::new(),
            symbols: SymbolTable::new(),
            metrics: LexicalMetrics::default(),
        }
    }

    pub fn preferences(&self) -> &LexicalPreferences {
        &self.preferences
    }

    /// Scan `text` into tokens and a symbol table
    pub fn scan(mut self, text: &str) -> Result<ScanOutput, ScanError> {
        log_debug!("Starting lexical scan",
            "chars" => text.chars().count(),
            "max_tokens" => MAX_TOKEN_COUNT
        );

        match self.run(text) {
            Ok(()) => {
                log_success!(codes::success::TOKENIZATION_COMPLETE, "Lexical scan completed",
                    "tokens" => self.tokens.len(),
                    "symbols" => self.symbols.len()
                );

                if self.preferences.log_symbol_table {
                    for (id, name) in self.symbols.iter() {
                        log_debug!("Symbol", "id" => id, "name" => name);
                    }
                }

                Ok(ScanOutput {
                    tokens: self.tokens,
                    symbols: self.symbols,
                    metrics: self.metrics,
                })
            }
            Err(error) => {
                if self.preferences.include_position_in_errors {
                    log_error!(error.error_code(), &error.to_string(), span = error.span(),
                        "tokens_before_error" => self.tokens.len()
                    );
                } else {
                    log_error!(error.error_code(), &error.to_string(),
                        "tokens_before_error" => self.tokens.len()
                    );
                }
                Err(error)
            }
        }
    }

    fn run(&mut self, text: &str) -> Result<(), ScanError> {
        let mut chars = text.chars().peekable();
        let mut position = Position::start();
        let mut state = ScanState::Start;
        let mut pending: Option<PendingLexeme> = None;

        while let Some(&ch) = chars.peek() {
            let category = CharacterCategory::classify(ch);

            match next_state(state, category) {
                ScanState::InIdentifier => {
                    let lexeme = pending.get_or_insert_with(|| PendingLexeme {
                        text: String::new(),
                        chars: 0,
                        start: position,
                    });
                    lexeme.chars += 1;
                    if lexeme.chars > MAX_IDENTIFIER_LENGTH {
                        return Err(ScanError::IdentifierTooLong {
                            position: lexeme.start,
                        });
                    }
                    lexeme.text.push(ch);
                    state = ScanState::InIdentifier;
                }
                ScanState::Start => {
                    self.metrics.whitespace_skipped += 1;
                }
                ScanState::Accept => {
                    if let Some(lexeme) = pending.take() {
                        // Interrupting character is scanned again from Start
                        self.emit_lexeme(lexeme, position)?;
                        state = ScanState::Start;
                        continue;
                    }

                    let token = Token::punctuation(ch).ok_or(ScanError::InvalidCharacter {
                        character: ch,
                        position,
                    })?;
                    self.emit(token, Span::single(position, ch))?;
                }
                ScanState::Error => {
                    return Err(ScanError::InvalidCharacter {
                        character: ch,
                        position,
                    });
                }
            }

            chars.next();
            self.metrics.chars_read += 1;
            position = position.advance(ch);
        }

        if let Some(lexeme) = pending.take() {
            self.emit_lexeme(lexeme, position)?;
        }

        Ok(())
    }

    fn emit_lexeme(&mut self, lexeme: PendingLexeme, end: Position) -> Result<(), ScanError> {
        let span = Span::new(lexeme.start, end);
        self.metrics.longest_identifier = self.metrics.longest_identifier.max(lexeme.chars);

        if let Some(keyword) = Token::keyword(&lexeme.text) {
            return self.emit(keyword, span);
        }

        if !self.symbols.contains(&lexeme.text) && self.symbols.len() >= MAX_SYMBOL_COUNT {
            return Err(ScanError::TooManySymbols {
                count: self.symbols.len() + 1,
                position: lexeme.start,
            });
        }

        let id = self.symbols.intern(&lexeme.text);
        self.emit(Token::Identifier(id), span)
    }

    fn emit(&mut self, token: Token, span: Span) -> Result<(), ScanError> {
        if self.tokens.len() >= MAX_TOKEN_COUNT {
            return Err(ScanError::TooManyTokens {
                count: self.tokens.len() + 1,
                position: span.start(),
            });
        }

        self.metrics.record_token(&token, &self.preferences);
        self.tokens.push(Spanned::new(token, span));
        Ok(())
    }
}

impl Default for LexicalScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn scan(text: &str) -> Result<ScanOutput, ScanError> {
        LexicalScanner::new().scan(text)
    }

    fn values(text: &str) -> Vec<Token> {
        scan(text).unwrap().token_values()
    }

    #[test]
    fn test_empty_input_yields_no_tokens() {
        let output = scan("").unwrap();
        assert!(output.tokens.is_empty());
        assert!(output.symbols.is_empty());
    }

    #[test]
    fn test_whitespace_only_yields_no_tokens() {
        let output = scan("  \t\n \r\n").unwrap();
        assert!(output.tokens.is_empty());
        assert_eq!(output.metrics.whitespace_skipped, 7);
    }

    #[test]
    fn test_identifiers_interrupted_by_punctuation() {
        assert_eq!(
            values("foo{bar}"),
            vec![
                Token::Identifier(1),
                Token::LBrace,
                Token::Identifier(2),
                Token::RBrace
            ]
        );
    }

    #[test]
    fn test_repeated_identifier_reuses_id() {
        let output = scan("foo{foo}").unwrap();
        assert_eq!(
            output.token_values(),
            vec![
                Token::Identifier(1),
                Token::LBrace,
                Token::Identifier(1),
                Token::RBrace
            ]
        );
        assert_eq!(output.symbols.len(), 1);
    }

    #[test]
    fn test_mixed_whitespace_separates_identifiers() {
        let output = scan("foo  \tbar\nbaz").unwrap();
        assert_eq!(
            output.token_values(),
            vec![
                Token::Identifier(1),
                Token::Identifier(2),
                Token::Identifier(3)
            ]
        );
        let names: Vec<_> = output.symbols.iter().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_consecutive_punctuation() {
        assert_eq!(
            values("(){}"),
            vec![Token::LParen, Token::RParen, Token::LBrace, Token::RBrace]
        );
    }

    #[test]
    fn test_keywords_fold_case_but_symbols_do_not() {
        let output = scan("Class this NEW Foo foo").unwrap();
        assert_eq!(
            output.token_values(),
            vec![
                Token::ClassKeyword,
                Token::ThisKeyword,
                Token::NewKeyword,
                Token::Identifier(1),
                Token::Identifier(2)
            ]
        );
    }

    #[test]
    fn test_eof_inside_identifier_emits_it() {
        let output = scan("class MyClass").unwrap();
        assert_eq!(
            output.token_values(),
            vec![Token::ClassKeyword, Token::Identifier(1)]
        );
        assert_eq!(output.symbols.name(1), Some("MyClass"));
    }

    #[test]
    fn test_digit_is_a_scan_error() {
        let error = scan("class1 new_var").unwrap_err();
        assert_matches!(
            error,
            ScanError::InvalidCharacter {
                character: '1',
                position: Position {
                    line: 1,
                    column: 6,
                    ..
                }
            }
        );
        assert_eq!(error.error_code(), codes::lexical::INVALID_CHARACTER);
    }

    #[test]
    fn test_invalid_first_character() {
        for ch in "$@#%&!0123456789_".chars() {
            let text = format!("{}x", ch);
            assert_matches!(
                scan(&text),
                Err(ScanError::InvalidCharacter { character, .. }) if character == ch
            );
        }
    }

    #[test]
    fn test_error_position_tracks_lines() {
        let error = scan("class A {\n  b;\n}").unwrap_err();
        assert_eq!(error.position().line, 2);
        assert_eq!(error.position().column, 4);
    }

    #[test]
    fn test_identifier_spans() {
        let output = scan("ab (cd)").unwrap();
        let first = output.tokens[0].span;
        assert_eq!((first.start.column, first.end.column), (1, 3));
        let paren = output.tokens[1].span;
        assert_eq!((paren.start.column, paren.end.column), (4, 5));
        let second = output.tokens[2].span;
        assert_eq!((second.start.offset, second.end.offset), (4, 6));
    }

    #[test]
    fn test_identifier_length_limit() {
        let long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert_matches!(scan(&long), Err(ScanError::IdentifierTooLong { .. }));

        let exact = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(scan(&exact).is_ok());
    }

    #[test]
    fn test_detailed_metrics() {
        let output = scan("class A { f ( ) }").unwrap();
        let metrics = &output.metrics;
        assert_eq!(metrics.total_tokens, 7);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.identifier_tokens, 2);
        assert_eq!(metrics.punctuation_tokens, 4);
        assert_eq!(metrics.chars_read, 17);
    }

    #[test]
    fn test_metrics_without_detail() {
        let preferences = LexicalPreferences {
            collect_detailed_metrics: false,
            ..Default::default()
        };
        let output = LexicalScanner::with_preferences(preferences)
            .scan("class A")
            .unwrap();
        assert_eq!(output.metrics.total_tokens, 2);
        assert_eq!(output.metrics.keyword_tokens, 0);
    }

    #[test]
    fn test_scan_is_deterministic() {
        let text = "class Shape { area ( ) } draw ( shape )";
        assert_eq!(values(text), values(text));
    }
}
