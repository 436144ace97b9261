use paradigm_classifier::config::runtime::RuntimeConfig;
use paradigm_classifier::utils::SourceMap;
use paradigm_classifier::{batch, logging, pipeline};
use std::env;
use std::fs;
use std::path::Path;

/// Options beyond the input path
#[derive(Debug, Default)]
struct CliOptions {
    batch: batch::BatchConfig,
    tokens_out: Option<String>,
    json: bool,
    config_path: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("paradigm_classifier");

    if args.len() < 2 {
        eprintln!("Usage: {} <file|directory> [options]", program);
        eprintln!("       {} --help", program);
        std::process::exit(1);
    }

    match args[1].as_str() {
        "--help" | "-h" => {
            print_help(program);
            return Ok(());
        }
        "--version" => {
            println!("paradigm_classifier {}", env!("CARGO_PKG_VERSION"));
            println!("{}", pipeline::get_pipeline_info().report());
            println!("{}", logging::get_system_diagnostics());
            return Ok(());
        }
        _ => {}
    }

    let mut options = parse_options(&args[2..]);

    if let Some(config_path) = &options.config_path {
        match RuntimeConfig::load_from_file(Path::new(config_path)) {
            Ok(runtime) => options.batch.runtime = runtime,
            Err(error) => {
                logging::safe_log_error(
                    logging::codes::system::CONFIGURATION_ERROR,
                    &format!("{}: {}", config_path, error),
                );
                std::process::exit(1);
            }
        }
    }

    let startup = logging::config::init_runtime_preferences(options.batch.runtime.logging.clone())
        .and_then(|_| logging::init_global_logging())
        .and_then(|_| pipeline::validate_pipeline());
    if let Err(error) = startup {
        logging::safe_log_error(logging::codes::system::INITIALIZATION_FAILURE, &error);
        std::process::exit(1);
    }

    let input_path = Path::new(&args[1]);

    if input_path.is_dir() {
        classify_directory(input_path, &options);
    } else {
        classify_single_file(&args[1], &options);
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("Paradigm Classifier v{}", env!("CARGO_PKG_VERSION"));
    println!("Classifies snippets as OOP, PP (procedural), HYB (hybrid) or TEXT");
    println!();
    println!("USAGE:");
    println!("    {} <file> [options]          # Classify one file", program_name);
    println!("    {} <directory> [options]     # Classify every .txt/.src/.tok file", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --version           Show version and pipeline limits");
    println!("    --config <toml>     Load runtime preferences from a TOML file");
    println!("    --tokens <out>      Write the scanner's token text to <out> (single file)");
    println!("    --json              Print results as JSON objects");
    println!("    --sequential        Classify directory files one at a time");
    println!("    --threads N         Maximum worker threads");
    println!("    --no-recursive      Don't search subdirectories");
    println!("    --max-files N       Limit the number of files classified");
    println!("    --fail-fast         Stop at the first failing file");
    println!("    --quiet             Suppress progress lines");
    println!();
    println!("OUTPUT:");
    println!("    <LABEL> <CONFIDENCE> <COVERAGE>, e.g. OOP 72 100.0");
    println!("    Directories print one `<path>: <result>` line per file.");
    println!("    Diagnostics go to stderr; exit status is 1 if any input failed.");
    println!();
    println!("EXAMPLES:");
    println!("    {} snippet.txt", program_name);
    println!("    {} snippet.txt --tokens snippet.tok", program_name);
    println!("    {} snippets/ --threads 4 --quiet", program_name);
}

fn parse_options(args: &[String]) -> CliOptions {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--sequential" => options.batch.max_threads = 1,
            "--threads" => {
                match args.get(i + 1).map(|v| v.parse::<usize>()) {
                    Some(Ok(threads)) => options.batch.max_threads = threads.max(1),
                    Some(Err(_)) => {
                        eprintln!("Warning: Invalid thread count '{}', using default", args[i + 1])
                    }
                    None => eprintln!("Warning: --threads requires a number"),
                }
                i += 1;
            }
            "--no-recursive" => options.batch.recursive = false,
            "--max-files" => {
                match args.get(i + 1).map(|v| v.parse::<usize>()) {
                    Some(Ok(max_files)) => options.batch.max_files = Some(max_files),
                    Some(Err(_)) => {
                        eprintln!("Warning: Invalid max files '{}', ignoring", args[i + 1])
                    }
                    None => eprintln!("Warning: --max-files requires a number"),
                }
                i += 1;
            }
            "--fail-fast" => options.batch.fail_fast = true,
            "--quiet" => options.batch.progress_reporting = false,
            "--json" => options.json = true,
            "--tokens" => {
                match args.get(i + 1) {
                    Some(path) => options.tokens_out = Some(path.clone()),
                    None => eprintln!("Warning: --tokens requires an output path"),
                }
                i += 1;
            }
            "--config" => {
                match args.get(i + 1) {
                    Some(path) => options.config_path = Some(path.clone()),
                    None => eprintln!("Warning: --config requires a file path"),
                }
                i += 1;
            }
            other => eprintln!("Warning: Unknown option '{}'", other),
        }
        i += 1;
    }

    options
}

fn classify_single_file(file_path: &str, options: &CliOptions) {
    let runtime = &options.batch.runtime;

    match pipeline::process_file(file_path, runtime) {
        Ok(result) => {
            if let Some(out) = &options.tokens_out {
                if let Err(error) = write_token_output(out, &result) {
                    eprintln!("error[{}]: {}", error.error_code(), error);
                    logging::print_cargo_style_summary();
                    std::process::exit(1);
                }
            }
            println!("{}", render(None, &result, options.json));
            logging::print_cargo_style_summary();
        }
        Err(error) => {
            if let pipeline::PipelineError::Scan(scan_error) = &error {
                if let Some(out) = &options.tokens_out {
                    if let Err(write_error) = write_scan_failure_output(out) {
                        eprintln!("error[{}]: {}", write_error.error_code(), write_error);
                    }
                }
                if let Ok(source) = fs::read_to_string(file_path) {
                    let map = SourceMap::new(source);
                    eprint!("{}", map.format_error(&scan_error.span(), &scan_error.to_string()));
                }
            }
            eprintln!("error[{}]: {}", error.error_code(), error);
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }
}

fn write_token_output(
    out: &str,
    result: &pipeline::PipelineResult,
) -> Result<(), pipeline::PipelineError> {
    write_output(out, &result.token_text())
}

fn write_scan_failure_output(out: &str) -> Result<(), pipeline::PipelineError> {
    write_output(out, &paradigm_classifier::tokens::write_scan_failure())
}

fn write_output(out: &str, contents: &str) -> Result<(), pipeline::PipelineError> {
    fs::write(out, contents).map_err(|e| pipeline::PipelineError::TokenOutput {
        path: out.to_string(),
        message: e.to_string(),
    })
}

fn classify_directory(dir_path: &Path, options: &CliOptions) {
    if options.tokens_out.is_some() {
        eprintln!("Warning: --tokens applies to single files and is ignored for directories");
    }

    match batch::process_directory_with_config(dir_path, &options.batch) {
        Ok(results) => {
            for (path, result) in &results.successful_files {
                println!("{}", render(Some(path), result, options.json));
            }
            for (path, error) in &results.failed_files {
                eprintln!("{}: error[{}]: {}", path.display(), error.error_code(), error);
            }

            if options.batch.progress_reporting {
                print_batch_summary(&results);
            }
            logging::print_cargo_style_summary();

            if results.failure_count() > 0 {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("error[{}]: {}", error.error_code(), error);
            logging::print_cargo_style_summary();
            std::process::exit(1);
        }
    }
}

fn render(path: Option<&Path>, result: &pipeline::PipelineResult, json: bool) -> String {
    let classification = &result.classification;
    match (path, json) {
        (None, false) => classification.to_string(),
        (Some(path), false) => format!("{}: {}", path.display(), classification),
        (path, true) => {
            let mut value = serde_json::json!({
                "label": classification.label,
                "confidence": classification.confidence,
                "coverage": classification.coverage,
                "tokens": result.token_count(),
                "syntax_errors": result.statistics.progress.errors,
            });
            if let Some(path) = path {
                value["file"] = serde_json::Value::String(path.display().to_string());
            }
            value.to_string()
        }
    }
}

fn print_batch_summary(results: &batch::BatchResults) {
    let stats = results.stats();
    eprintln!();
    eprintln!("{}", results.summary());
    eprintln!("  Files discovered: {}", results.files_discovered);
    for (label, count) in &stats.label_counts {
        eprintln!("  {}: {}", label, count);
    }
    eprintln!(
        "  Average time per file: {:.2}ms",
        stats.average_processing_time().as_secs_f64() * 1000.0
    );

    let logged = logging::get_processing_summary();
    if logged.total_warnings > 0 {
        eprintln!("  Warnings logged: {}", logged.total_warnings);
    }

    if let Some(collector) = logging::try_get_global_error_collector() {
        let critical = collector.get_critical_errors();
        if !critical.is_empty() {
            eprintln!("  Critical errors: {}", critical.len());
        }
    }
}
