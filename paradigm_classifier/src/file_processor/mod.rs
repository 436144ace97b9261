//! File processor module with compile-time limits and global logging integration

mod processor;

use crate::config::compile_time::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, MAX_LINE_COUNT_FOR_ANALYSIS,
};
use crate::config::runtime::FileProcessorPreferences;
use crate::log_debug;
pub use processor::{
    FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError, KNOWN_EXTENSIONS,
    TOKEN_TEXT_EXTENSION,
};

/// Process a file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn process_file_with_preferences(
    file_path: &str,
    prefs: &FileProcessorPreferences,
) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::from_preferences(prefs).process_file(file_path)
}

/// Get the compile-time maximum file size limit
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

/// Initialize file processor logging validation (for system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    use crate::logging::codes;

    codes::validate_codes(
        "File processor",
        &[
            codes::file_processing::FILE_NOT_FOUND,
            codes::file_processing::INVALID_EXTENSION,
            codes::file_processing::FILE_TOO_LARGE,
            codes::file_processing::PERMISSION_DENIED,
            codes::file_processing::INVALID_ENCODING,
            codes::file_processing::IO_ERROR,
            codes::file_processing::INVALID_PATH,
            codes::file_processing::TOO_MANY_LINES,
            codes::success::FILE_PROCESSING_SUCCESS,
        ],
    )?;

    log_debug!("File processor compile-time configuration loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD,
        "max_line_count" => MAX_LINE_COUNT_FOR_ANALYSIS);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("snippet.txt");
        fs::write(&file_path, "id (id)\n").unwrap();

        assert!(process_file(file_path.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_preferences_are_applied() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("snippet.rs");
        fs::write(&file_path, "id").unwrap();

        let prefs = FileProcessorPreferences {
            require_known_extension: true,
            enable_performance_logging: false,
        };
        let result = process_file_with_preferences(file_path.to_str().unwrap(), &prefs);
        assert!(matches!(result, Err(FileProcessorError::InvalidExtension { .. })));
    }

    #[test]
    fn test_compile_time_limits() {
        assert_eq!(get_max_file_size(), MAX_FILE_SIZE);
        assert_eq!(FileProcessor::max_file_size(), MAX_FILE_SIZE);
        assert!(FileProcessor::large_file_threshold() <= get_max_file_size());
    }

    #[test]
    fn test_init_logging() {
        assert!(init_file_processor_logging().is_ok());
    }
}
