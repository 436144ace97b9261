//! Batch classification of a directory
//!
//! Files with a known extension are discovered (optionally recursively),
//! sorted, and classified either sequentially or across worker threads.
//! Each file runs under its own logging context so the error collector can
//! attribute events for the cargo-style summary.

use crate::config::compile_time::batch_processing::{MAX_FILES_PER_BATCH, MAX_WORKER_THREADS};
use crate::config::runtime::RuntimeConfig;
use crate::file_processor::KNOWN_EXTENSIONS;
use crate::logging::{codes, Code};
use crate::pipeline::{self, PipelineError, PipelineResult, PipelineStats};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Batch processing configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub max_threads: usize,
    pub recursive: bool,
    /// Stop discovery after this many files
    pub max_files: Option<usize>,
    /// Per-file progress lines on stderr
    pub progress_reporting: bool,
    pub fail_fast: bool,
    /// Preferences applied to every file
    pub runtime: RuntimeConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_threads: thread::available_parallelism()
                .map(|n| n.get().min(8))
                .unwrap_or(4)
                .min(MAX_WORKER_THREADS),
            recursive: true,
            max_files: None,
            progress_reporting: true,
            fail_fast: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Thread count within `1..=MAX_WORKER_THREADS`
    pub fn effective_threads(&self) -> usize {
        self.max_threads.clamp(1, MAX_WORKER_THREADS)
    }

    /// File limit, never above `MAX_FILES_PER_BATCH`
    pub fn effective_max_files(&self) -> usize {
        self.max_files
            .map_or(MAX_FILES_PER_BATCH, |n| n.min(MAX_FILES_PER_BATCH))
    }
}

#[derive(Debug, Default)]
pub struct BatchResults {
    pub successful_files: Vec<(PathBuf, PipelineResult)>,
    pub failed_files: Vec<(PathBuf, PipelineError)>,
    pub processing_duration: Duration,
    pub files_processed: usize,
    pub files_discovered: usize,
}

impl BatchResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_count(&self) -> usize {
        self.successful_files.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_files.len()
    }

    pub fn success_rate(&self) -> f64 {
        if self.files_processed == 0 {
            0.0
        } else {
            self.successful_files.len() as f64 / self.files_processed as f64
        }
    }

    pub fn add_success(&mut self, file_path: PathBuf, result: PipelineResult) {
        self.successful_files.push((file_path, result));
        self.files_processed += 1;
    }

    pub fn add_failure(&mut self, file_path: PathBuf, error: PipelineError) {
        self.failed_files.push((file_path, error));
        self.files_processed += 1;
    }

    pub fn merge(&mut self, other: BatchResults) {
        self.successful_files.extend(other.successful_files);
        self.failed_files.extend(other.failed_files);
        self.files_processed += other.files_processed;
    }

    /// Order both lists by path so output does not depend on scheduling
    pub fn sort_by_path(&mut self) {
        self.successful_files.sort_by(|a, b| a.0.cmp(&b.0));
        self.failed_files.sort_by(|a, b| a.0.cmp(&b.0));
    }

    pub fn stats(&self) -> PipelineStats {
        let mut stats = PipelineStats::default();
        for (_, result) in &self.successful_files {
            stats.record_success(result);
        }
        for _ in &self.failed_files {
            stats.record_failure();
        }
        stats
    }

    pub fn summary(&self) -> String {
        format!(
            "Batch classification completed: {} files processed, {} successful ({:.1}%), {} failed, {:.2}s total",
            self.files_processed,
            self.success_count(),
            self.success_rate() * 100.0,
            self.failure_count(),
            self.processing_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("No input files found in directory: {path}")]
    NoFilesFound { path: String },

    #[error("Too many files found: more than {max}")]
    TooManyFiles { max: usize },

    #[error("I/O error during directory traversal: {error}")]
    IoError { error: String },

    #[error("Worker thread failure: {message}")]
    WorkerFailure { message: String },
}

impl BatchError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::DirectoryNotFound { .. } => codes::batch::DIRECTORY_NOT_FOUND,
            Self::NoFilesFound { .. } => codes::batch::NO_INPUT_FILES,
            Self::TooManyFiles { .. } => codes::batch::TOO_MANY_FILES,
            Self::IoError { .. } => codes::file_processing::IO_ERROR,
            Self::WorkerFailure { .. } => codes::batch::WORKER_FAILURE,
        }
    }

    fn logged(self) -> Self {
        crate::log_error!(self.error_code(), &self.to_string());
        self
    }
}

// ============================================================================
// FILE DISCOVERY
// ============================================================================

/// Discover classifiable files under a directory, sorted by path
pub fn discover_input_files(dir_path: &Path, config: &BatchConfig) -> Result<Vec<PathBuf>, BatchError> {
    crate::log_info!("Starting file discovery",
        "directory" => dir_path.display(),
        "recursive" => config.recursive
    );

    if !dir_path.is_dir() {
        return Err(BatchError::DirectoryNotFound {
            path: dir_path.display().to_string(),
        }
        .logged());
    }

    let limit = config.effective_max_files();
    let mut files = Vec::new();
    let truncated = visit_directory(dir_path, &mut files, config.recursive, limit)?;

    if files.is_empty() {
        return Err(BatchError::NoFilesFound {
            path: dir_path.display().to_string(),
        }
        .logged());
    }

    // Only the compile-time ceiling is an error; a user limit just truncates.
    if truncated && config.max_files.map_or(true, |n| n > MAX_FILES_PER_BATCH) {
        return Err(BatchError::TooManyFiles {
            max: MAX_FILES_PER_BATCH,
        }
        .logged());
    }

    files.sort();

    crate::log_debug!("File discovery completed",
        "files_found" => files.len(),
        "directory" => dir_path.display()
    );

    Ok(files)
}

/// Returns true when a file beyond `limit` was seen
fn visit_directory(
    dir_path: &Path,
    files: &mut Vec<PathBuf>,
    recursive: bool,
    limit: usize,
) -> Result<bool, BatchError> {
    let entries = fs::read_dir(dir_path).map_err(|e| BatchError::IoError {
        error: format!("{}: {}", dir_path.display(), e),
    })?;

    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| BatchError::IoError {
            error: e.to_string(),
        })?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if recursive && visit_directory(&path, files, recursive, limit)? {
                return Ok(true);
            }
        } else if is_input_file(&path) {
            if files.len() >= limit {
                crate::log_warning!("Reached maximum file limit",
                    "files_found" => files.len(),
                    "limit" => limit
                );
                return Ok(true);
            }
            files.push(path);
        }
    }

    Ok(false)
}

fn is_input_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                KNOWN_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
}

// ============================================================================
// BATCH PROCESSING
// ============================================================================

fn classify_one(file_path: &Path, file_id: usize, runtime: &RuntimeConfig) -> Result<PipelineResult, PipelineError> {
    pipeline::process_file_with_id(&file_path.to_string_lossy(), file_id, runtime)
}

pub fn process_directory_sequential(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();

    crate::log_info!("Starting sequential batch classification",
        "directory" => dir_path.display()
    );

    let files = discover_input_files(dir_path, config)?;
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    for (file_id, file_path) in files.iter().enumerate() {
        if config.progress_reporting {
            eprintln!(
                "Classifying file {} of {}: {}",
                file_id + 1,
                files.len(),
                file_path.display()
            );
        }

        match classify_one(file_path, file_id, &config.runtime) {
            Ok(result) => results.add_success(file_path.clone(), result),
            Err(error) => {
                results.add_failure(file_path.clone(), error);
                if config.fail_fast {
                    crate::log_warning!("Fail-fast mode enabled, stopping batch classification");
                    break;
                }
            }
        }
    }

    results.processing_duration = start_time.elapsed();
    log_batch_complete(&results, 1);

    Ok(results)
}

pub fn process_directory_parallel(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    let start_time = Instant::now();
    let threads = config.effective_threads();

    crate::log_info!("Starting parallel batch classification",
        "directory" => dir_path.display(),
        "max_threads" => threads
    );

    let files = discover_input_files(dir_path, config)?;
    let mut results = BatchResults::new();
    results.files_discovered = files.len();

    let chunk_size = calculate_chunk_size(files.len(), threads);
    let stop = Arc::new(AtomicBool::new(false));

    crate::log_debug!("Parallel processing configuration",
        "total_files" => files.len(),
        "chunk_size" => chunk_size,
        "threads" => threads
    );

    for (chunk_index, chunk) in files.chunks(chunk_size).enumerate() {
        let first_id = chunk_index * chunk_size;
        let chunk_results = process_chunk_parallel(chunk, first_id, config, threads, &stop)?;
        results.merge(chunk_results);

        if stop.load(Ordering::Relaxed) {
            crate::log_warning!("Fail-fast mode enabled, stopping batch classification");
            break;
        }
    }

    results.sort_by_path();
    results.processing_duration = start_time.elapsed();
    log_batch_complete(&results, threads);

    Ok(results)
}

fn process_chunk_parallel(
    files: &[PathBuf],
    first_id: usize,
    config: &BatchConfig,
    threads: usize,
    stop: &Arc<AtomicBool>,
) -> Result<BatchResults, BatchError> {
    let results = Arc::new(Mutex::new(BatchResults::new()));
    let runtime = Arc::new(config.runtime.clone());
    let files_per_thread = files.len().div_ceil(threads).max(1);

    let mut handles = Vec::new();

    for (thread_index, thread_files) in files.chunks(files_per_thread).enumerate() {
        let thread_files = thread_files.to_vec();
        let base_id = first_id + thread_index * files_per_thread;
        let results = Arc::clone(&results);
        let runtime = Arc::clone(&runtime);
        let stop = Arc::clone(stop);
        let fail_fast = config.fail_fast;
        let progress = config.progress_reporting;

        handles.push(thread::spawn(move || {
            for (offset, file_path) in thread_files.into_iter().enumerate() {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                if progress {
                    eprintln!("Classifying {}", file_path.display());
                }

                let outcome = classify_one(&file_path, base_id + offset, &runtime);
                let mut guard = results.lock().unwrap_or_else(|p| p.into_inner());
                match outcome {
                    Ok(result) => guard.add_success(file_path, result),
                    Err(error) => {
                        guard.add_failure(file_path, error);
                        if fail_fast {
                            stop.store(true, Ordering::Relaxed);
                        }
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().map_err(|_| {
            BatchError::WorkerFailure {
                message: "worker panicked during classification".to_string(),
            }
            .logged()
        })?;
    }

    let results = Arc::try_unwrap(results).map_err(|_| {
        BatchError::WorkerFailure {
            message: "results still shared after workers finished".to_string(),
        }
        .logged()
    })?;

    Ok(results.into_inner().unwrap_or_else(|p| p.into_inner()))
}

fn calculate_chunk_size(file_count: usize, max_threads: usize) -> usize {
    const MIN_CHUNK_SIZE: usize = 1;
    const MAX_CHUNK_SIZE: usize = 50;

    file_count
        .div_ceil(max_threads.max(1))
        .clamp(MIN_CHUNK_SIZE, MAX_CHUNK_SIZE)
}

fn log_batch_complete(results: &BatchResults, threads: usize) {
    crate::log_success!(
        codes::success::BATCH_COMPLETE,
        "Batch classification completed",
        "files_processed" => results.files_processed,
        "successful" => results.success_count(),
        "failed" => results.failure_count(),
        "threads_used" => threads,
        "duration_ms" => format!("{:.2}", results.processing_duration.as_secs_f64() * 1000.0)
    );
}

// ============================================================================
// PUBLIC API
// ============================================================================

pub fn process_directory(dir_path: &Path) -> Result<BatchResults, BatchError> {
    process_directory_with_config(dir_path, &BatchConfig::default())
}

/// Sequential when one thread is configured, parallel otherwise
pub fn process_directory_with_config(
    dir_path: &Path,
    config: &BatchConfig,
) -> Result<BatchResults, BatchError> {
    if config.effective_threads() == 1 {
        process_directory_sequential(dir_path, config)
    } else {
        process_directory_parallel(dir_path, config)
    }
}

pub fn init_batch_logging() -> Result<(), String> {
    codes::validate_codes(
        "Batch",
        &[
            codes::batch::DIRECTORY_NOT_FOUND,
            codes::batch::NO_INPUT_FILES,
            codes::batch::TOO_MANY_FILES,
            codes::batch::WORKER_FAILURE,
            codes::success::BATCH_COMPLETE,
        ],
    )?;

    if MAX_WORKER_THREADS == 0 || MAX_FILES_PER_BATCH == 0 {
        return Err("Batch limits cannot be zero".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crate::scoring::Label;
    use std::fs;
    use tempfile::tempdir;

    fn quiet(threads: usize) -> BatchConfig {
        BatchConfig {
            max_threads: threads,
            progress_reporting: false,
            ..Default::default()
        }
    }

    fn populate(dir: &Path) {
        fs::write(dir.join("a_class.txt"), "class Shape { id area }").unwrap();
        fs::write(dir.join("b_func.src"), "main ( ) { x }").unwrap();
        fs::write(dir.join("c_tokens.tok"), "<1>\n<20,1>\n<4>\n<5>\n").unwrap();
        fs::write(dir.join("d_bad.txt"), "v2 ( )").unwrap();
        fs::write(dir.join("notes.md"), "ignored").unwrap();
    }

    #[test]
    fn test_file_discovery() {
        let dir = tempdir().unwrap();
        populate(dir.path());
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("e.txt"), "hello").unwrap();

        let files = discover_input_files(dir.path(), &quiet(1)).unwrap();
        assert_eq!(files.len(), 5);
        assert!(files.windows(2).all(|w| w[0] <= w[1]));

        let flat = BatchConfig {
            recursive: false,
            ..quiet(1)
        };
        assert_eq!(discover_input_files(dir.path(), &flat).unwrap().len(), 4);
    }

    #[test]
    fn test_max_files_truncates() {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let config = BatchConfig {
            max_files: Some(2),
            ..quiet(1)
        };
        assert_eq!(discover_input_files(dir.path(), &config).unwrap().len(), 2);
    }

    #[test]
    fn test_discovery_errors() {
        let dir = tempdir().unwrap();
        assert_matches!(
            discover_input_files(dir.path(), &quiet(1)),
            Err(BatchError::NoFilesFound { .. })
        );

        let missing = dir.path().join("absent");
        let error = discover_input_files(&missing, &quiet(1)).unwrap_err();
        assert_eq!(error.error_code(), codes::batch::DIRECTORY_NOT_FOUND);
    }

    #[test]
    fn test_is_input_file() {
        let dir = tempdir().unwrap();
        let txt = dir.path().join("snippet.TXT");
        let md = dir.path().join("readme.md");
        fs::write(&txt, "x").unwrap();
        fs::write(&md, "x").unwrap();

        assert!(is_input_file(&txt));
        assert!(!is_input_file(&md));
        assert!(!is_input_file(dir.path()));
    }

    #[test]
    fn test_sequential_batch() {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let results = process_directory_with_config(dir.path(), &quiet(1)).unwrap();
        assert_eq!(results.files_discovered, 4);
        assert_eq!(results.success_count(), 3);
        assert_eq!(results.failure_count(), 1);

        let labels: Vec<Label> = results
            .successful_files
            .iter()
            .map(|(_, r)| r.classification.label)
            .collect();
        assert_eq!(labels, vec![Label::Oop, Label::Pp, Label::Oop]);

        let stats = results.stats();
        assert_eq!(stats.label_count(Label::Oop), 2);
        assert_eq!(stats.failed, 1);
    }

    #[test]
    fn test_process_directory_defaults() {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let results = process_directory(dir.path()).unwrap();
        assert_eq!(results.files_discovered, 4);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = tempdir().unwrap();
        populate(dir.path());

        let sequential = process_directory_with_config(dir.path(), &quiet(1)).unwrap();
        let parallel = process_directory_with_config(dir.path(), &quiet(3)).unwrap();

        assert_eq!(parallel.files_processed, sequential.files_processed);
        let seq: Vec<_> = sequential
            .successful_files
            .iter()
            .map(|(p, r)| (p.clone(), r.classification))
            .collect();
        let par: Vec<_> = parallel
            .successful_files
            .iter()
            .map(|(p, r)| (p.clone(), r.classification))
            .collect();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_fail_fast_stops_sequential_batch() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a_bad.txt"), "x9").unwrap();
        fs::write(dir.path().join("b_good.txt"), "class A { }").unwrap();

        let config = BatchConfig {
            fail_fast: true,
            ..quiet(1)
        };
        let results = process_directory_with_config(dir.path(), &config).unwrap();
        assert_eq!(results.files_processed, 1);
        assert_eq!(results.failure_count(), 1);
    }

    #[test]
    fn test_chunk_size_calculation() {
        assert_eq!(calculate_chunk_size(100, 4), 25);
        assert_eq!(calculate_chunk_size(10, 4), 3);
        assert_eq!(calculate_chunk_size(1, 4), 1);
        assert_eq!(calculate_chunk_size(200, 4), 50);
        assert_eq!(calculate_chunk_size(0, 4), 1);
    }

    #[test]
    fn test_batch_config_limits() {
        let config = BatchConfig {
            max_threads: 0,
            max_files: Some(usize::MAX),
            ..Default::default()
        };
        assert_eq!(config.effective_threads(), 1);
        assert_eq!(config.effective_max_files(), MAX_FILES_PER_BATCH);
        assert!(init_batch_logging().is_ok());
    }
}
