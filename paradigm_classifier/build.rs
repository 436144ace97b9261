// build.rs - TOML-driven compile-time constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    scoring: ScoringWeights,
    batch_processing: BatchProcessingLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    large_file_threshold: u64,
    max_line_count_for_analysis: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_identifier_length: usize,
    max_token_count: usize,
    max_symbol_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
    max_recovery_attempts: usize,
    max_error_history: usize,
}

#[derive(serde::Deserialize)]
struct ScoringWeights {
    matched_weight: f64,
    feature_weight: f64,
    text_feature_base: f64,
    text_feature_penalty: f64,
    coherence_weight: f64,
    coherence_error_penalty: f64,
    coherence_floor: f64,
    density_weight: f64,
    text_bonus: f64,
    text_bonus_threshold: f64,
    text_bonus_cap: f64,
    featureless_factor: f64,
    min_confidence: u8,
    max_confidence: u8,
    empty_input_confidence: u8,
}

#[derive(serde::Deserialize)]
struct BatchProcessingLimits {
    max_worker_threads: usize,
    max_files_per_batch: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_file: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PARADIGM_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=PARADIGM_CONFIG_DIR");

    let profile = env::var("PARADIGM_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("PARADIGM_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);

    println!(
        "cargo:warning=Generated constants from {}",
        config_path.display()
    );
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 10_000;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("SECURITY: max_file_size exceeds absolute maximum");
    }

    if config.file_processing.large_file_threshold > config.file_processing.max_file_size {
        panic!("CONFIG: large_file_threshold must not exceed max_file_size");
    }

    if config.syntax.max_parse_depth == 0 || config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH
    {
        panic!("SECURITY: max_parse_depth must be between 1 and {}", ABSOLUTE_MAX_PARSE_DEPTH);
    }

    if config.lexical.max_symbol_count > config.lexical.max_token_count {
        panic!("CONFIG: max_symbol_count must not exceed max_token_count");
    }

    let scoring = &config.scoring;
    if scoring.min_confidence > scoring.max_confidence || scoring.max_confidence > 100 {
        panic!("CONFIG: confidence clamp must satisfy min <= max <= 100");
    }
    if scoring.empty_input_confidence < scoring.min_confidence
        || scoring.empty_input_confidence > scoring.max_confidence
    {
        panic!("CONFIG: empty_input_confidence must lie inside the confidence clamp");
    }
    if !(0.0..=1.0).contains(&scoring.text_bonus_threshold)
        || !(0.0..=1.0).contains(&scoring.featureless_factor)
    {
        panic!("CONFIG: text_bonus_threshold and featureless_factor must be ratios");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if config.logging.max_log_events_per_file > config.logging.log_buffer_size {
        panic!("CONFIG: max_log_events_per_file must not exceed log_buffer_size");
    }

    if profile == "production" {
        if config.file_processing.max_file_size > 50_000_000 {
            panic!("PRODUCTION: max_file_size too high for production");
        }
        if config.syntax.max_parse_depth > 1_000 {
            panic!("PRODUCTION: max_parse_depth too high for production");
        }
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    // Floats use {:?} so whole numbers keep their `.0` suffix
    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const LARGE_FILE_THRESHOLD: u64 = {};
        pub const MAX_LINE_COUNT_FOR_ANALYSIS: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
        pub const MAX_SYMBOL_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
        pub const MAX_RECOVERY_ATTEMPTS: usize = {};
        pub const MAX_ERROR_HISTORY: usize = {};
    }}

    pub mod scoring {{
        pub const MATCHED_WEIGHT: f64 = {:?};
        pub const FEATURE_WEIGHT: f64 = {:?};
        pub const TEXT_FEATURE_BASE: f64 = {:?};
        pub const TEXT_FEATURE_PENALTY: f64 = {:?};
        pub const COHERENCE_WEIGHT: f64 = {:?};
        pub const COHERENCE_ERROR_PENALTY: f64 = {:?};
        pub const COHERENCE_FLOOR: f64 = {:?};
        pub const DENSITY_WEIGHT: f64 = {:?};
        pub const TEXT_BONUS: f64 = {:?};
        pub const TEXT_BONUS_THRESHOLD: f64 = {:?};
        pub const TEXT_BONUS_CAP: f64 = {:?};
        pub const FEATURELESS_FACTOR: f64 = {:?};
        pub const MIN_CONFIDENCE: u8 = {};
        pub const MAX_CONFIDENCE: u8 = {};
        pub const EMPTY_INPUT_CONFIDENCE: u8 = {};
    }}

    pub mod batch_processing {{
        pub const MAX_WORKER_THREADS: usize = {};
        pub const MAX_FILES_PER_BATCH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_FILE: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // File Processing
        config.file_processing.max_file_size,
        config.file_processing.large_file_threshold,
        config.file_processing.max_line_count_for_analysis,
        // Lexical
        config.lexical.max_identifier_length,
        config.lexical.max_token_count,
        config.lexical.max_symbol_count,
        // Syntax
        config.syntax.max_parse_depth,
        config.syntax.max_recovery_attempts,
        config.syntax.max_error_history,
        // Scoring
        config.scoring.matched_weight,
        config.scoring.feature_weight,
        config.scoring.text_feature_base,
        config.scoring.text_feature_penalty,
        config.scoring.coherence_weight,
        config.scoring.coherence_error_penalty,
        config.scoring.coherence_floor,
        config.scoring.density_weight,
        config.scoring.text_bonus,
        config.scoring.text_bonus_threshold,
        config.scoring.text_bonus_cap,
        config.scoring.featureless_factor,
        config.scoring.min_confidence,
        config.scoring.max_confidence,
        config.scoring.empty_input_confidence,
        // Batch Processing
        config.batch_processing.max_worker_threads,
        config.batch_processing.max_files_per_batch,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_file,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
