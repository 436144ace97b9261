use crate::file_processor::FileMetadata;
use crate::lexical::{LexicalMetrics, SymbolTable};
use crate::scoring::ClassificationResult;
use crate::syntax::ParseStatistics;
use crate::tokens::{self, Token};
use std::time::Duration;

/// Where the tokens of a classification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Raw text run through the scanner
    Source,
    /// Token lines read back with the token text reader
    TokenText,
}

/// Everything produced while classifying one input
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub classification: ClassificationResult,
    pub input_kind: InputKind,
    pub tokens: Vec<Token>,
    /// Only present for scanned source
    pub symbols: Option<SymbolTable>,
    pub lexical_metrics: Option<LexicalMetrics>,
    pub statistics: ParseStatistics,
    pub file_metadata: Option<FileMetadata>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Canonical token text, with the symbol table trailer when available
    pub fn token_text(&self) -> String {
        match &self.symbols {
            Some(symbols) => tokens::write_token_text_with_symbols(&self.tokens, symbols),
            None => tokens::write_token_text(&self.tokens),
        }
    }

    pub fn log_success(&self, source: &str) {
        crate::log_success!(
            crate::logging::codes::success::CLASSIFICATION_COMPLETE,
            "Classification finished",
            "input" => source,
            "label" => self.classification.label,
            "confidence" => self.classification.confidence,
            "coverage" => format!("{:.1}", self.classification.coverage),
            "tokens" => self.token_count(),
            "syntax_errors" => self.statistics.progress.errors,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
