//! End-to-end classification: file -> scan or token text -> token stream ->
//! syntax -> scoring

mod error;
mod info;
mod result;
mod stats;
mod validation;

pub use error::PipelineError;
pub use info::{get_pipeline_info, PipelineInfo};
pub use result::{InputKind, PipelineResult};
pub use stats::PipelineStats;
pub use validation::validate_pipeline;

use crate::config::runtime::RuntimeConfig;
use crate::lexical::LexicalScanner;
use crate::logging::{self, codes};
use crate::scoring::{ClassificationResult, ClassificationScorer};
use crate::syntax::{ParseStatistics, SyntaxClassifier};
use crate::tokens::{self, TokenStream};
use std::path::PathBuf;
use std::time::Instant;

/// Scan `text` as source and classify it
pub fn classify_text(text: &str, config: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    let scanned = LexicalScanner::with_preferences(config.lexical.clone()).scan(text)?;
    let (statistics, classification) = analyze(TokenStream::from_spanned(&scanned.tokens), config);

    Ok(PipelineResult {
        classification,
        input_kind: InputKind::Source,
        tokens: scanned.token_values(),
        symbols: Some(scanned.symbols),
        lexical_metrics: Some(scanned.metrics),
        statistics,
        file_metadata: None,
        processing_duration: start_time.elapsed(),
    })
}

/// Read `text` as token lines and classify them
pub fn classify_token_text(
    text: &str,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    let decoded = tokens::read_token_text(text).map_err(|e| {
        crate::log_error!(e.error_code(), &e.to_string(), "line" => e.line());
        PipelineError::from(e)
    })?;

    if decoded.failed {
        let error = PipelineError::ScanFailureRecorded;
        crate::log_error!(error.error_code(), "Token text carries a scan failure marker");
        return Err(error);
    }

    crate::log_success!(codes::success::TOKEN_TEXT_DECODED, "Token text decoded",
        "tokens" => decoded.tokens.len());

    let (statistics, classification) = analyze(TokenStream::from_tokens(&decoded.tokens), config);

    Ok(PipelineResult {
        classification,
        input_kind: InputKind::TokenText,
        tokens: decoded.tokens,
        symbols: None,
        lexical_metrics: None,
        statistics,
        file_metadata: None,
        processing_duration: start_time.elapsed(),
    })
}

/// Classify content, reading it as token text when it looks like token lines
pub fn classify_input(text: &str, config: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    if tokens::looks_like_token_text(text) {
        classify_token_text(text, config)
    } else {
        classify_text(text, config)
    }
}

/// Read and classify one file under its own logging context
pub fn process_file(file_path: &str, config: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    process_file_with_id(file_path, 0, config)
}

/// Same as [`process_file`], tagging log events with `file_id`
pub fn process_file_with_id(
    file_path: &str,
    file_id: usize,
    config: &RuntimeConfig,
) -> Result<PipelineResult, PipelineError> {
    logging::with_file_context(PathBuf::from(file_path), file_id, || {
        crate::log_info!("Classifying file", "file" => file_path);
        let start_time = Instant::now();

        let file_result =
            crate::file_processor::process_file_with_preferences(file_path, &config.file_processor)?;

        let mut result = if file_result.metadata.is_token_text {
            classify_token_text(&file_result.source, config)?
        } else {
            classify_input(&file_result.source, config)?
        };

        result.file_metadata = Some(file_result.metadata);
        result.processing_duration = start_time.elapsed();
        result.log_success(file_path);
        crate::log_performance!(codes::success::OPERATION_COMPLETED_SUCCESSFULLY,
            "File pipeline timing",
            duration = result.processing_duration,
            "file" => file_path,
            "bytes" => result.file_metadata.as_ref().map_or(0, |m| m.size)
        );

        Ok(result)
    })
}

fn analyze(stream: TokenStream, config: &RuntimeConfig) -> (ParseStatistics, ClassificationResult) {
    let statistics = SyntaxClassifier::with_preferences(stream, config.syntax.clone()).parse();
    let classification = ClassificationScorer::with_weights(config.scoring).score(&statistics);
    (statistics, classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Label;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    fn classify(text: &str) -> String {
        classify_text(text, &RuntimeConfig::default())
            .unwrap()
            .classification
            .to_string()
    }

    #[test]
    fn test_validate_pipeline() {
        let _ = crate::logging::init_global_logging();
        assert!(validate_pipeline().is_ok());
    }

    #[test]
    fn test_object_oriented_snippet() {
        assert_eq!(classify("class MyClass { id myVariable }"), "OOP 90 100.0");
    }

    #[test]
    fn test_faulty_snippet_stops_short() {
        assert_eq!(
            classify("class {} id myVariable id anotherVar }"),
            "OOP 90 87.5"
        );
    }

    #[test]
    fn test_procedural_snippet() {
        assert_eq!(classify("f ( a ) { } g ( ) { b }"), "PP 90 100.0");
    }

    #[test]
    fn test_hybrid_snippet() {
        assert_eq!(classify("class A { } main ( ) { x }"), "HYB 82 100.0");
    }

    #[test]
    fn test_prose_is_text() {
        let result = classify_text("hello world is text", &RuntimeConfig::default()).unwrap();
        assert_eq!(result.classification.label, Label::Text);
        assert_eq!(result.classification.coverage, 100.0);
    }

    #[test]
    fn test_keywords_this_and_new_are_ignored_by_parser() {
        let result =
            classify_text("class A { this new x }", &RuntimeConfig::default()).unwrap();
        assert_eq!(result.token_count(), 7);
        assert_eq!(result.statistics.total_tokens, 5);
        assert_eq!(result.classification.label, Label::Oop);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classify(""), "TEXT 50 100.0");
        assert_eq!(classify("   \n\t"), "TEXT 50 100.0");
    }

    #[test]
    fn test_scan_error_is_fatal() {
        let result = classify_text("value1", &RuntimeConfig::default());
        assert_matches!(result, Err(PipelineError::Scan(_)));
    }

    #[test]
    fn test_classification_is_idempotent() {
        let config = RuntimeConfig::default();
        let text = "class {} id myVariable id anotherVar }";
        let first = classify_text(text, &config).unwrap();
        let second = classify_text(text, &config).unwrap();
        assert_eq!(first.classification, second.classification);
        assert_eq!(first.tokens, second.tokens);
    }

    #[test]
    fn test_token_text_matches_source_classification() {
        let config = RuntimeConfig::default();
        let scanned = classify_text("class MyClass { id myVariable }", &config).unwrap();
        let replayed = classify_token_text(&scanned.token_text(), &config).unwrap();

        assert_eq!(replayed.input_kind, InputKind::TokenText);
        assert_eq!(replayed.tokens, scanned.tokens);
        assert_eq!(replayed.classification, scanned.classification);
    }

    #[test]
    fn test_stray_close_paren_costs_no_coherence() {
        let config = RuntimeConfig::default();
        let classify_tokens = |text: &str| {
            classify_token_text(text, &config)
                .unwrap()
                .classification
                .to_string()
        };

        // id ) id
        assert_eq!(classify_tokens("<20,1>\n<3>\n<20,2>\n"), "TEXT 57 33.3");
        // ) id
        assert_eq!(classify_tokens("<3>\n<20,1>\n"), "TEXT 50 0.0");
        // id id )
        assert_eq!(classify_tokens("<20,1>\n<20,2>\n<3>\n"), "TEXT 73 66.7");
    }

    #[test]
    fn test_token_text_failure_marker() {
        let result = classify_token_text("ERROR\nSymbol Table:\n", &RuntimeConfig::default());
        assert_matches!(result, Err(PipelineError::ScanFailureRecorded));
    }

    #[test]
    fn test_malformed_token_text() {
        let result = classify_token_text("<1>\n<20>\n", &RuntimeConfig::default());
        assert_matches!(result, Err(PipelineError::TokenFormat(e)) if e.line() == 2);
    }

    #[test]
    fn test_classify_input_detects_token_text() {
        let config = RuntimeConfig::default();
        let result = classify_input("<1>\n<20, 1>\n<4>\n<5>\n", &config).unwrap();
        assert_eq!(result.input_kind, InputKind::TokenText);
        assert_eq!(result.classification.label, Label::Oop);

        let result = classify_input("class A { }", &config).unwrap();
        assert_eq!(result.input_kind, InputKind::Source);
    }

    #[test]
    fn test_process_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shape.src");
        fs::write(&source, "class Shape { id area }\n").unwrap();

        let result = process_file(source.to_str().unwrap(), &RuntimeConfig::default()).unwrap();
        assert_eq!(result.classification.to_string(), "OOP 90 100.0");
        assert!(result.file_metadata.is_some());
        assert!(result.lexical_metrics.is_some());
    }

    #[test]
    fn test_process_token_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scan.tok");
        fs::write(&path, "<20,1>\n<2>\n<3>\n<4>\n<5>\n").unwrap();

        let result = process_file(path.to_str().unwrap(), &RuntimeConfig::default()).unwrap();
        assert_eq!(result.input_kind, InputKind::TokenText);
        assert_eq!(result.classification.label, Label::Pp);
    }

    #[test]
    fn test_process_missing_file() {
        let result = process_file("no/such/input.txt", &RuntimeConfig::default());
        assert_matches!(result, Err(PipelineError::FileProcessing(_)));
    }
}
