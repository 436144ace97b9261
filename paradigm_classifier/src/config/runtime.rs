// RUNTIME PREFERENCES (User Experience)
//
// Preferences default from PARADIGM_* environment variables and may be
// overridden by a TOML file passed to the CLI with --config.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProcessorPreferences {
    /// Only accept `.txt`, `.src` and `.tok` inputs
    pub require_known_extension: bool,

    /// Whether to enable detailed performance logging
    pub enable_performance_logging: bool,
}

impl Default for FileProcessorPreferences {
    fn default() -> Self {
        Self {
            require_known_extension: env_flag(env_vars::REQUIRE_KNOWN_EXTENSION, false),
            enable_performance_logging: env_flag(env_vars::ENABLE_PERFORMANCE_LOGGING, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Whether to collect per-category token metrics
    pub collect_detailed_metrics: bool,

    /// Whether to log the symbol table after a successful scan
    pub log_symbol_table: bool,

    /// Whether to show position information in error messages
    pub include_position_in_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            collect_detailed_metrics: env_flag(env_vars::LEXICAL_DETAILED_METRICS, true),
            log_symbol_table: env_flag(env_vars::LEXICAL_LOG_SYMBOL_TABLE, false),
            include_position_in_errors: env_flag(env_vars::LEXICAL_INCLUDE_POSITIONS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxPreferences {
    /// Log every recovery attempt with the tokens it discarded
    pub trace_recovery: bool,

    /// Log the final parse counters once per input
    pub log_parse_statistics: bool,
}

impl Default for SyntaxPreferences {
    fn default() -> Self {
        Self {
            trace_recovery: env_flag(env_vars::SYNTAX_TRACE_RECOVERY, false),
            log_parse_statistics: env_flag(env_vars::SYNTAX_LOG_STATISTICS, true),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Preferred minimum log level, never stricter than the compile-time floor
    pub min_log_level: LogLevel,

    /// Whether to include performance metrics in logs
    pub log_performance_events: bool,

    /// Whether to enable cargo-style error reporting
    pub enable_cargo_style_output: bool,

    /// Whether to include file context in log messages
    pub include_file_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            log_performance_events: env_flag(env_vars::LOGGING_LOG_PERFORMANCE, true),
            enable_cargo_style_output: env_flag(env_vars::LOGGING_CARGO_STYLE, true),
            include_file_context: env_flag(env_vars::LOGGING_INCLUDE_FILE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeConfigError {
    #[error("Cannot read runtime configuration {path}: {message}")]
    Io { path: String, message: String },

    #[error("Invalid runtime configuration {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid scoring weights: {0}")]
    Scoring(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub file_processor: FileProcessorPreferences,
    pub lexical: LexicalPreferences,
    pub syntax: SyntaxPreferences,
    pub logging: LoggingPreferences,
    pub scoring: crate::scoring::ScoringWeights,
}

impl RuntimeConfig {
    /// Load preferences from a TOML file. Missing sections keep their
    /// environment-derived defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, RuntimeConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| RuntimeConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            RuntimeConfigError::Parse { message, .. } => RuntimeConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RuntimeConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| RuntimeConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })?;
        config
            .scoring
            .validate()
            .map_err(RuntimeConfigError::Scoring)?;
        Ok(config)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // File Processor
    pub const REQUIRE_KNOWN_EXTENSION: &str = "PARADIGM_REQUIRE_KNOWN_EXTENSION";
    pub const ENABLE_PERFORMANCE_LOGGING: &str = "PARADIGM_ENABLE_PERFORMANCE_LOGGING";

    // Lexical
    pub const LEXICAL_DETAILED_METRICS: &str = "PARADIGM_LEXICAL_DETAILED_METRICS";
    pub const LEXICAL_LOG_SYMBOL_TABLE: &str = "PARADIGM_LEXICAL_LOG_SYMBOL_TABLE";
    pub const LEXICAL_INCLUDE_POSITIONS: &str = "PARADIGM_LEXICAL_INCLUDE_POSITIONS";

    // Syntax
    pub const SYNTAX_TRACE_RECOVERY: &str = "PARADIGM_SYNTAX_TRACE_RECOVERY";
    pub const SYNTAX_LOG_STATISTICS: &str = "PARADIGM_SYNTAX_LOG_STATISTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "PARADIGM_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "PARADIGM_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "PARADIGM_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_PERFORMANCE: &str = "PARADIGM_LOGGING_LOG_PERFORMANCE";
    pub const LOGGING_CARGO_STYLE: &str = "PARADIGM_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_FILE_CONTEXT: &str = "PARADIGM_LOGGING_INCLUDE_FILE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("1"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_sections() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [syntax]
            trace_recovery = true

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert!(config.syntax.trace_recovery);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert!(config.lexical.include_position_in_errors);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let result = RuntimeConfig::from_toml_str("[syntax\ntrace_recovery = ");
        assert_matches!(result, Err(RuntimeConfigError::Parse { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paradigm.toml");
        fs::write(&path, "[file_processor]\nrequire_known_extension = true\n").unwrap();

        let config = RuntimeConfig::load_from_file(&path).unwrap();
        assert!(config.file_processor.require_known_extension);

        let missing = RuntimeConfig::load_from_file(&dir.path().join("absent.toml"));
        assert_matches!(missing, Err(RuntimeConfigError::Io { .. }));
    }

    #[test]
    fn test_scoring_weights_override() {
        let config = RuntimeConfig::from_toml_str("[scoring]\nmax_confidence = 95\n").unwrap();
        assert_eq!(config.scoring.max_confidence, 95);
        assert_eq!(config.scoring.matched_weight, 40.0);

        let inverted = RuntimeConfig::from_toml_str("[scoring]\nmin_confidence = 95\n");
        assert_matches!(inverted, Err(RuntimeConfigError::Scoring(_)));
    }
}
