//! Predictive recursive-descent classifier
//!
//! ```text
//! S    -> DCL S'
//! S'   -> S | ε
//! DCL  -> class id { S } | id ( TEXT ) | TEXT DCL2
//! DCL2 -> { S } | ( TEXT ) { S } | ε
//! TEXT -> id TEXT' | ε
//! TEXT'-> TEXT | ε
//! ```
//!
//! `S'` and `TEXT` are tail-recursive and run as loops. Terminal mismatches
//! are counted and recovered from in panic mode. A failed branch dispatch is
//! recorded and recovered from without counting. The parse never fails.

use super::error::SyntaxError;
use crate::config::compile_time::syntax::*;
use crate::config::runtime::SyntaxPreferences;
use crate::logging::codes;
use crate::tokens::{TerminalKind, TokenStream};
use crate::{log_debug, log_success, log_warning};
use serde::Serialize;
use std::collections::VecDeque;

use TerminalKind::{Class, End, Id, LBrace, LParen, RBrace, RParen};

const FIRST_S: [TerminalKind; 4] = [Class, Id, LBrace, LParen];
const FOLLOW_DCL2: [TerminalKind; 6] = [Class, Id, LBrace, LParen, RBrace, End];
const FOLLOW_TEXT: [TerminalKind; 7] = [Class, Id, LBrace, LParen, RBrace, RParen, End];
const SYNC: [TerminalKind; 7] = [Class, Id, LBrace, RBrace, LParen, RParen, End];

/// Live parse counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseProgress {
    pub position: usize,
    pub matched: usize,
    pub classes: usize,
    pub functions: usize,
    /// Programming terminals matched
    pub density: usize,
    pub errors: usize,
    pub recovery_attempts: usize,
}

/// Furthest snapshot of the parse; its position never decreases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BestMatch {
    pub position: usize,
    pub classes: usize,
    pub functions: usize,
    pub matched: usize,
}

/// Everything the scorer and diagnostics need from one parse
#[derive(Debug, Clone)]
pub struct ParseStatistics {
    /// Input terminals, not counting `$`
    pub total_tokens: usize,
    pub progress: ParseProgress,
    pub best: BestMatch,
    pub max_depth_reached: usize,
    pub skipped_tokens: usize,
    pub recovery_exhausted: bool,
    /// Most recent errors, oldest first
    pub error_history: Vec<SyntaxError>,
}

pub struct SyntaxClassifier {
    stream: TokenStream,
    preferences: SyntaxPreferences,
    progress: ParseProgress,
    best: BestMatch,
    context_stack: Vec<&'static str>,
    error_history: VecDeque<SyntaxError>,
    depth: usize,
    max_depth_reached: usize,
    skipped_tokens: usize,
    recovery_exhausted: bool,
}

impl SyntaxClassifier {
    pub fn new(stream: TokenStream) -> Self {
        Self::with_preferences(stream, SyntaxPreferences::default())
    }

    pub fn with_preferences(stream: TokenStream, preferences: SyntaxPreferences) -> Self {
        log_debug!("Creating syntax classifier", "tokens" => stream.len());

        Self {
            stream,
            preferences,
            progress: ParseProgress::default(),
            best: BestMatch::default(),
            context_stack: Vec::new(),
            error_history: VecDeque::new(),
            depth: 0,
            max_depth_reached: 0,
            skipped_tokens: 0,
            recovery_exhausted: false,
        }
    }

    /// Run one top-level `S` and return the collected statistics
    pub fn parse(mut self) -> ParseStatistics {
        self.s();

        if self.stream.is_at_end() {
            self.update_best();
        }

        let statistics = ParseStatistics {
            total_tokens: self.stream.len(),
            progress: self.progress,
            best: self.best,
            max_depth_reached: self.max_depth_reached,
            skipped_tokens: self.skipped_tokens,
            recovery_exhausted: self.recovery_exhausted,
            error_history: self.error_history.into_iter().collect(),
        };

        if self.preferences.log_parse_statistics {
            log_success!(codes::success::PARSE_COMPLETE, "Syntax classification finished",
                "tokens" => statistics.total_tokens,
                "best_position" => statistics.best.position,
                "classes" => statistics.best.classes,
                "functions" => statistics.best.functions,
                "errors" => statistics.progress.errors
            );
        }

        statistics
    }

    // ========================================================================
    // GRAMMAR PROCEDURES
    // ========================================================================

    fn s(&mut self) {
        self.push_context("S");
        loop {
            self.dcl();
            if !FIRST_S.contains(&self.stream.current_kind()) {
                break;
            }
        }
        self.pop_context();
    }

    fn dcl(&mut self) {
        self.push_context("DCL");

        match self.stream.current_kind() {
            Class => {
                self.progress.classes += 1;
                self.update_best();
                self.match_terminal(Class);
                self.match_terminal(Id);
                self.block();
            }
            Id if self.is_function_head() => {
                self.progress.functions += 1;
                self.update_best();
                self.match_terminal(Id);
                self.match_terminal(LParen);
                self.text();
                self.match_terminal(RParen);
            }
            _ => {
                self.text();
                self.dcl2();
            }
        }

        self.pop_context();
    }

    /// One-token lookahead past an `id` for `(`
    fn is_function_head(&mut self) -> bool {
        let checkpoint = self.stream.checkpoint();
        self.stream.advance();
        let is_call = self.stream.current_kind() == LParen;
        self.stream.rollback(checkpoint);
        is_call
    }

    fn dcl2(&mut self) {
        self.push_context("DCL2");

        match self.stream.current_kind() {
            LBrace => self.block(),
            LParen => {
                self.progress.functions += 1;
                self.update_best();
                self.match_terminal(LParen);
                self.text();
                self.match_terminal(RParen);
                self.block();
            }
            kind if FOLLOW_DCL2.contains(&kind) => {}
            kind => {
                self.record_error(SyntaxError::NoViableAlternative {
                    found: kind,
                    context: self.current_context(),
                    position: self.stream.position(),
                    span: self.stream.current().span,
                });
                self.recover();
            }
        }

        self.pop_context();
    }

    fn text(&mut self) {
        while self.stream.current_kind() == Id {
            self.match_terminal(Id);
        }

        let kind = self.stream.current_kind();
        if !FOLLOW_TEXT.contains(&kind) {
            self.record_error(SyntaxError::NoViableAlternative {
                found: kind,
                context: self.current_context(),
                position: self.stream.position(),
                span: self.stream.current().span,
            });
            self.recover();
        }
    }

    /// `{ S }`, with the body skipped once nesting exceeds the limit
    fn block(&mut self) {
        self.match_terminal(LBrace);

        if self.depth >= MAX_PARSE_DEPTH {
            self.progress.errors += 1;
            let error = SyntaxError::MaxParseDepth {
                position: self.stream.position(),
                span: self.stream.current().span,
            };
            log_warning!(code = error.error_code(), "Block nesting too deep, skipping body",
                "position" => error.position(),
                "max_depth" => MAX_PARSE_DEPTH
            );
            self.record_error(error);
            self.skip_balanced_body();
        } else {
            self.depth += 1;
            self.max_depth_reached = self.max_depth_reached.max(self.depth);
            self.s();
            self.depth -= 1;
        }

        self.match_terminal(RBrace);
    }

    fn skip_balanced_body(&mut self) {
        let mut nesting = 0usize;

        loop {
            match self.stream.current_kind() {
                End => break,
                RBrace if nesting == 0 => break,
                RBrace => nesting -= 1,
                LBrace => nesting += 1,
                _ => {}
            }
            self.stream.advance();
            self.skipped_tokens += 1;
        }
    }

    // ========================================================================
    // MATCHING AND RECOVERY
    // ========================================================================

    fn match_terminal(&mut self, expected: TerminalKind) {
        let found = self.stream.current_kind();

        if found == expected {
            self.stream.advance();
            self.progress.matched += 1;
            if expected != End {
                self.progress.density += 1;
            }
            self.update_best();
        } else {
            self.progress.errors += 1;
            self.record_error(SyntaxError::UnexpectedToken {
                expected,
                found,
                position: self.stream.position(),
                span: self.stream.current().span,
            });
            self.recover();
        }
    }

    /// Panic-mode recovery bounded by MAX_RECOVERY_ATTEMPTS
    fn recover(&mut self) {
        if self.progress.recovery_attempts >= MAX_RECOVERY_ATTEMPTS {
            if !self.recovery_exhausted {
                self.recovery_exhausted = true;
                log_warning!(code = codes::syntax::RECOVERY_EXHAUSTED,
                    "Recovery budget exhausted, continuing without recovery",
                    "attempts" => self.progress.recovery_attempts,
                    "position" => self.stream.position()
                );
            }
            return;
        }

        self.progress.recovery_attempts += 1;
        self.update_best();

        let start = self.stream.position();
        while !SYNC.contains(&self.stream.current_kind()) {
            self.stream.advance();
            self.skipped_tokens += 1;
        }

        if self.preferences.trace_recovery {
            log_debug!("Recovered at synchronization terminal",
                "attempt" => self.progress.recovery_attempts,
                "from" => start,
                "to" => self.stream.position(),
                "terminal" => self.stream.current_kind()
            );
        }

        self.update_best();
    }

    fn update_best(&mut self) {
        debug_assert!(
            self.stream.position() >= self.progress.position,
            "parse position moved backwards"
        );
        self.progress.position = self.stream.position();

        if self.progress.position >= self.best.position {
            self.best = BestMatch {
                position: self.progress.position,
                classes: self.progress.classes,
                functions: self.progress.functions,
                matched: self.progress.matched,
            };
        }
    }

    fn record_error(&mut self, error: SyntaxError) {
        log_debug!("Syntax mismatch", "error" => error, "context" => self.current_context());

        if self.error_history.len() >= MAX_ERROR_HISTORY {
            self.error_history.pop_front();
        }
        self.error_history.push_back(error);
    }

    // ========================================================================
    // CONTEXT
    // ========================================================================

    fn push_context(&mut self, context: &'static str) {
        self.context_stack.push(context);
    }

    fn pop_context(&mut self) {
        self.context_stack.pop();
    }

    pub fn current_context(&self) -> String {
        self.context_stack.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;
    use assert_matches::assert_matches;

    const CLASS: Token = Token::ClassKeyword;
    const LP: Token = Token::LParen;
    const RP: Token = Token::RParen;
    const LB: Token = Token::LBrace;
    const RB: Token = Token::RBrace;

    fn id(n: usize) -> Token {
        Token::Identifier(n)
    }

    fn parse(tokens: &[Token]) -> ParseStatistics {
        SyntaxClassifier::new(TokenStream::from_tokens(tokens)).parse()
    }

    #[test]
    fn test_class_declaration() {
        // class MyClass { id myVariable }
        let stats = parse(&[CLASS, id(1), LB, id(2), id(3), RB]);
        assert_eq!(stats.best.classes, 1);
        assert_eq!(stats.best.functions, 0);
        assert_eq!(stats.best.position, 6);
        assert_eq!(stats.best.matched, 6);
        assert_eq!(stats.progress.density, 6);
        assert_eq!(stats.progress.errors, 0);
        assert_eq!(stats.max_depth_reached, 1);
    }

    #[test]
    fn test_sibling_functions() {
        // f ( a ) { } g ( ) { b }
        let stats = parse(&[
            id(1),
            LP,
            id(2),
            RP,
            LB,
            RB,
            id(3),
            LP,
            RP,
            LB,
            id(4),
            RB,
        ]);
        assert_eq!(stats.best.functions, 2);
        assert_eq!(stats.best.classes, 0);
        assert_eq!(stats.best.position, 12);
        assert_eq!(stats.progress.errors, 0);
    }

    #[test]
    fn test_class_and_function_are_hybrid_shapes() {
        // class A { } main ( ) { x }
        let stats = parse(&[CLASS, id(1), LB, RB, id(2), LP, RP, LB, id(3), RB]);
        assert_eq!(stats.best.classes, 1);
        assert_eq!(stats.best.functions, 1);
        assert_eq!(stats.best.position, 10);
    }

    #[test]
    fn test_parenthesized_group_after_text_counts_function() {
        // a b ( c ) { }
        let stats = parse(&[id(1), id(2), LP, id(3), RP, LB, RB]);
        assert_eq!(stats.best.functions, 1);
        assert_eq!(stats.best.position, 7);
    }

    #[test]
    fn test_plain_identifiers_are_text() {
        let stats = parse(&[id(1), id(2), id(3), id(1)]);
        assert_eq!(stats.best.classes + stats.best.functions, 0);
        assert_eq!(stats.best.position, 4);
        assert_eq!(stats.best.matched, 4);
    }

    #[test]
    fn test_faulty_class_recovers_and_stops_early() {
        // class {} id myVariable id anotherVar }
        let stats = parse(&[CLASS, LB, RB, id(1), id(2), id(1), id(3), RB]);
        assert_eq!(stats.total_tokens, 8);
        assert_eq!(stats.progress.errors, 1);
        assert_eq!(stats.progress.recovery_attempts, 1);
        assert_eq!(stats.best.classes, 1);
        assert_eq!(stats.best.position, 7);
        assert_eq!(stats.best.matched, 7);
        assert_matches!(
            stats.error_history.as_slice(),
            [SyntaxError::UnexpectedToken {
                expected: TerminalKind::Id,
                found: TerminalKind::LBrace,
                position: 1,
                ..
            }]
        );
    }

    #[test]
    fn test_leading_close_paren_has_no_viable_alternative() {
        let stats = parse(&[RP, id(1)]);
        assert_eq!(stats.progress.errors, 0);
        assert_eq!(stats.progress.recovery_attempts, 1);
        assert_eq!(stats.best.position, 0);
        assert_matches!(
            stats.error_history.as_slice(),
            [SyntaxError::NoViableAlternative {
                found: TerminalKind::RParen,
                ..
            }]
        );
    }

    #[test]
    fn test_failed_dispatch_is_not_counted_as_error() {
        // id ) id
        let stats = parse(&[id(1), RP, id(2)]);
        assert_eq!(stats.progress.errors, 0);
        assert_eq!(stats.best.position, 1);
        assert_eq!(stats.best.matched, 1);
        assert_matches!(
            stats.error_history.as_slice(),
            [SyntaxError::NoViableAlternative {
                found: TerminalKind::RParen,
                ..
            }]
        );

        // id id )
        let stats = parse(&[id(1), id(2), RP]);
        assert_eq!(stats.progress.errors, 0);
        assert_eq!(stats.best.position, 2);
    }

    #[test]
    fn test_recovery_budget_is_bounded() {
        // Four `class` keywords without names: one mismatch each
        let stats = parse(&[CLASS, LB, RB, CLASS, LB, RB, CLASS, LB, RB, CLASS, LB, RB]);
        assert_eq!(stats.progress.errors, 4);
        assert_eq!(stats.progress.recovery_attempts, MAX_RECOVERY_ATTEMPTS);
        assert!(stats.recovery_exhausted);
        assert_eq!(stats.best.position, 12);
    }

    #[test]
    fn test_empty_stream() {
        let stats = parse(&[]);
        assert_eq!(stats.total_tokens, 0);
        assert_eq!(stats.best, BestMatch::default());
        assert_eq!(stats.progress.errors, 0);
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let depth = MAX_PARSE_DEPTH + 10;
        let mut tokens = vec![LB; depth];
        tokens.extend(vec![RB; depth]);

        let stats = parse(&tokens);
        assert_eq!(stats.max_depth_reached, MAX_PARSE_DEPTH);
        assert_eq!(stats.progress.errors, 1);
        assert!(stats.skipped_tokens > 0);
        assert_eq!(stats.best.position, tokens.len());
        assert_matches!(
            stats.error_history.last(),
            Some(SyntaxError::MaxParseDepth { .. })
        );
    }

    #[test]
    fn test_best_position_never_exceeds_total() {
        let tokens = [RB, RB, CLASS, id(1), LB];
        let stats = parse(&tokens);
        assert!(stats.best.position <= stats.total_tokens);
    }

    /// Every stream of up to `max_len` terminals, `class id { } ( )`
    fn all_streams(max_len: usize) -> Vec<Vec<Token>> {
        let alphabet = [CLASS, id(1), LB, RB, LP, RP];
        let mut streams = vec![Vec::new()];
        let mut frontier = vec![Vec::new()];

        for _ in 0..max_len {
            let mut next = Vec::with_capacity(frontier.len() * alphabet.len());
            for prefix in &frontier {
                for token in alphabet {
                    let mut stream: Vec<Token> = prefix.clone();
                    stream.push(token);
                    next.push(stream);
                }
            }
            streams.extend(next.iter().cloned());
            frontier = next;
        }

        streams
    }

    #[test]
    fn test_positions_stay_in_bounds_for_all_short_streams() {
        let streams = all_streams(6);
        assert_eq!(streams.len(), 55_987);

        for tokens in &streams {
            let stats = parse(tokens);
            assert!(stats.best.position <= stats.total_tokens, "{:?}", tokens);
            assert!(stats.progress.position <= stats.best.position, "{:?}", tokens);
            assert!(stats.best.matched <= stats.progress.matched, "{:?}", tokens);
            assert!(
                stats.progress.recovery_attempts <= MAX_RECOVERY_ATTEMPTS,
                "{:?}",
                tokens
            );
        }
    }

    #[test]
    fn test_error_history_is_bounded() {
        let tokens: Vec<Token> = std::iter::repeat([CLASS, LB, RB])
            .take(MAX_ERROR_HISTORY + 5)
            .flatten()
            .collect();
        let stats = parse(&tokens);
        assert_eq!(stats.progress.errors, MAX_ERROR_HISTORY + 5);
        assert_eq!(stats.error_history.len(), MAX_ERROR_HISTORY);
    }
}
