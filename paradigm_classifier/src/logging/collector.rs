//! Per-file event collection for batch runs with cargo-style output

use super::events::LogEvent;
use crate::config::compile_time::logging::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// File currently being classified on this thread
#[derive(Debug, Clone)]
pub struct FileProcessingContext {
    pub file_path: PathBuf,
    pub file_id: usize,
    pub start_time: Instant,
}

impl FileProcessingContext {
    pub fn new(file_path: PathBuf, file_id: usize) -> Self {
        Self {
            file_path,
            file_id,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Summary of batch processing results
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub files_with_warnings: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    pub total_processing_time: Duration,
    pub average_file_time: Duration,
}

impl ProcessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            self.successful_files as f64 / self.total_files as f64
        }
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

/// Thread-safe event collector keyed by file path
pub struct ErrorCollector {
    file_events: Mutex<BTreeMap<PathBuf, Vec<LogEvent>>>,
    file_contexts: Mutex<BTreeMap<PathBuf, FileProcessingContext>>,
    processing_start: Instant,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self {
            file_events: Mutex::new(BTreeMap::new()),
            file_contexts: Mutex::new(BTreeMap::new()),
            processing_start: Instant::now(),
        }
    }

    fn events(&self) -> MutexGuard<'_, BTreeMap<PathBuf, Vec<LogEvent>>> {
        self.file_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn contexts(&self) -> MutexGuard<'_, BTreeMap<PathBuf, FileProcessingContext>> {
        self.file_contexts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record an event for a file. Past the per-file limit a single
    /// overflow warning is appended and further events are dropped.
    pub fn record_event(&self, file_path: &Path, event: LogEvent) {
        let mut events = self.events();
        let file_events = events.entry(file_path.to_path_buf()).or_default();

        if file_events.len() < MAX_LOG_EVENTS_PER_FILE {
            file_events.push(event);
        } else if file_events.len() == MAX_LOG_EVENTS_PER_FILE {
            file_events.push(LogEvent::warning(&format!(
                "Too many events for file (limit: {})",
                MAX_LOG_EVENTS_PER_FILE
            )));
        }
    }

    pub fn record_file_context(&self, context: FileProcessingContext) {
        self.contexts().insert(context.file_path.clone(), context);
    }

    pub fn get_all_file_events(&self) -> BTreeMap<PathBuf, Vec<LogEvent>> {
        self.events().clone()
    }

    pub fn get_summary(&self) -> ProcessingSummary {
        let events = self.events();
        let contexts = self.contexts();

        let mut summary = ProcessingSummary::new();
        summary.total_files = events.len();
        summary.total_processing_time = self.processing_start.elapsed();

        let mut total_file_time = Duration::ZERO;
        let mut timed_files: u32 = 0;

        for (file_path, file_events) in events.iter() {
            let errors = file_events.iter().filter(|e| e.is_error()).count();
            let warnings = file_events.iter().filter(|e| e.is_warning()).count();

            if errors > 0 {
                summary.failed_files += 1;
            } else if warnings > 0 {
                summary.files_with_warnings += 1;
            } else {
                summary.successful_files += 1;
            }

            summary.total_errors += errors;
            summary.total_warnings += warnings;

            if let Some(context) = contexts.get(file_path) {
                total_file_time += context.elapsed();
                timed_files += 1;
            }
        }

        if timed_files > 0 {
            summary.average_file_time = total_file_time / timed_files;
        }

        summary
    }

    /// Errors whose code requires halting the file
    pub fn get_critical_errors(&self) -> Vec<(PathBuf, LogEvent)> {
        let events = self.events();
        let mut critical = Vec::new();

        for (path, file_events) in events.iter() {
            for event in file_events {
                if event.is_error() && event.requires_halt() {
                    critical.push((path.clone(), event.clone()));
                }
            }
        }

        critical
    }

    pub fn clear(&self) {
        self.events().clear();
        self.contexts().clear();
    }

    pub fn total_event_count(&self) -> usize {
        self.events().values().map(|v| v.len()).sum()
    }

    /// (current, max, fraction) against the compile-time buffer size
    pub fn get_capacity_info(&self) -> (usize, usize, f64) {
        let current = self.total_event_count();
        let percentage = if LOG_BUFFER_SIZE > 0 {
            current as f64 / LOG_BUFFER_SIZE as f64
        } else {
            0.0
        };
        (current, LOG_BUFFER_SIZE, percentage)
    }
}

impl Default for ErrorCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn location(file_path: &Path, event: &LogEvent) -> String {
    event
        .span
        .as_ref()
        .map(|s| {
            format!(
                " --> {}:{}:{}",
                file_path.display(),
                s.start().line,
                s.start().column
            )
        })
        .unwrap_or_default()
}

fn push_context(output: &mut String, event: &LogEvent) {
    for (key, value) in &event.context {
        if key != "file" && key != "file_id" {
            output.push_str(&format!("  = {}: {}\n", key, value));
        }
    }
}

/// Format errors and warnings grouped by file, cargo style
pub fn format_cargo_style_errors(collector: &ErrorCollector) -> String {
    let mut output = String::new();

    for (file_path, events) in &collector.get_all_file_events() {
        let errors: Vec<_> = events.iter().filter(|e| e.is_error()).collect();
        let warnings: Vec<_> = events.iter().filter(|e| e.is_warning()).collect();

        if errors.is_empty() && warnings.is_empty() {
            continue;
        }

        output.push_str(&format!("Checking {}...\n", file_path.display()));

        for event in errors {
            output.push_str(&format!(
                "error[{}]: {}{}\n",
                event.code.as_str(),
                event.message,
                location(file_path, event)
            ));
            output.push_str(&format!(
                "  = severity: {}, category: {}\n",
                event.severity(),
                event.category()
            ));
            push_context(&mut output, event);

            let action = event.recommended_action();
            if action != "No specific action available" {
                output.push_str(&format!("  = help: {}\n", action));
            }
        }

        for event in warnings {
            output.push_str(&format!(
                "warning[{}]: {}{}\n",
                event.code.as_str(),
                event.message,
                location(file_path, event)
            ));
            push_context(&mut output, event);
        }

        output.push('\n');
    }

    let summary = collector.get_summary();
    if summary.total_errors > 0 {
        output.push_str(&format!("Total errors: {}\n", summary.total_errors));
    }
    if summary.total_warnings > 0 {
        output.push_str(&format!("Total warnings: {}\n", summary.total_warnings));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;
    use crate::utils::{Position, Span};

    #[test]
    fn test_error_collector_basic() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("snippet.txt");

        collector.record_event(
            &file_path,
            LogEvent::error(codes::file_processing::FILE_NOT_FOUND, "Missing"),
        );

        let events = collector.get_all_file_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[&file_path].len(), 1);
        assert!(events[&file_path][0].is_error());
    }

    #[test]
    fn test_processing_summary() {
        let collector = ErrorCollector::new();
        let failing = PathBuf::from("digits.txt");
        let noisy = PathBuf::from("tokens.tok");
        let clean = PathBuf::from("class.txt");

        collector.record_event(
            &failing,
            LogEvent::error(codes::lexical::INVALID_CHARACTER, "Invalid character"),
        );
        collector.record_event(
            &noisy,
            LogEvent::warning_with_code(codes::token_format::UNKNOWN_TOKEN_CODE, "Dropped"),
        );
        collector.record_event(
            &clean,
            LogEvent::success(codes::success::CLASSIFICATION_COMPLETE, "OOP"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.failed_files, 1);
        assert_eq!(summary.files_with_warnings, 1);
        assert_eq!(summary.successful_files, 1);
        assert!(summary.has_errors());
        assert!(summary.has_warnings());
        assert!((summary.success_rate() - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_per_file_limit_appends_single_overflow_warning() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("many.txt");

        for _ in 0..MAX_LOG_EVENTS_PER_FILE + 5 {
            collector.record_event(&file_path, LogEvent::info("event"));
        }

        let events = collector.get_all_file_events()[&file_path].clone();
        assert_eq!(events.len(), MAX_LOG_EVENTS_PER_FILE + 1);
        assert!(events.last().is_some_and(|e| e.is_warning()));
    }

    #[test]
    fn test_critical_errors() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("snippet.txt");

        collector.record_event(
            &file_path,
            LogEvent::error(codes::system::INTERNAL_ERROR, "Critical"),
        );
        collector.record_event(
            &file_path,
            LogEvent::error(codes::syntax::UNEXPECTED_TOKEN, "Recovered"),
        );

        let critical = collector.get_critical_errors();
        assert_eq!(critical.len(), 1);
        assert_eq!(critical[0].1.code.as_str(), "ERR001");
    }

    #[test]
    fn test_cargo_style_output() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("digits.txt");
        let span = Span::single(Position::new(6, 1, 7), '7');

        collector.record_event(
            &file_path,
            LogEvent::error(codes::lexical::INVALID_CHARACTER, "Invalid character")
                .with_span(span)
                .with_context("character", "7")
                .with_context("file", "digits.txt"),
        );

        let output = format_cargo_style_errors(&collector);
        assert!(output.contains("Checking digits.txt..."));
        assert!(output.contains("error[E020]: Invalid character --> digits.txt:1:7"));
        assert!(output.contains("  = character: 7"));
        assert!(!output.contains("  = file:"));
        assert!(output.contains("Total errors: 1"));
    }

    #[test]
    fn test_capacity_info_and_clear() {
        let collector = ErrorCollector::new();
        let file_path = PathBuf::from("snippet.txt");
        collector.record_event(&file_path, LogEvent::info("event"));

        let (current, max, _) = collector.get_capacity_info();
        assert_eq!(current, 1);
        assert_eq!(max, LOG_BUFFER_SIZE);

        collector.clear();
        assert_eq!(collector.total_event_count(), 0);
    }
}
