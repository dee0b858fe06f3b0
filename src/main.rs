//! # JS Binding Analyzer CLI
//!
//! A command-line front-end for the binding analyzer: parses a JavaScript
//! source file and reports misuses of bindings (redeclarations, early
//! references, reassigned constants, misplaced block-scoped declarations,
//! and, optionally, unused local assignments).
//!
//! ## Usage
//!
//! ```bash
//! jsbind [OPTIONS] <FILE>
//! ```
//!
//! For more information, run `jsbind --help`.

use std::path::PathBuf;
use std::process;

use clap::{Arg, Command};
use tracing_subscriber::EnvFilter;

use js_binding_analyzer::analyzer::{self, AnalyzerConfig, Severity};
use js_binding_analyzer::parser::{self, ParserConfig};

/// Application version constant
const VERSION: &str = "0.1.0";

/// Application name constant
const APP_NAME: &str = "jsbind";

/// Configuration structure for the CLI
#[derive(Debug, Clone)]
struct CliConfig {
    /// Input file path to analyze
    input_file: Option<PathBuf>,
    /// Enable verbose tracing output
    verbose: bool,
    /// Enable `UNUSED_LOCAL_ASSIGNMENT` (R5)
    unused_locals: bool,
    /// Emit the full analysis result as JSON instead of the text report
    json: bool,
}

/// Custom error types for the CLI
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("input file not specified")]
    MissingInputFile,
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("analysis error: {0}")]
    AnalysisError(#[from] analyzer::AnalysisError),
}

/// Result type alias for CLI operations
type CliResult<T> = Result<T, CliError>;

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {}", error);
        process::exit(1);
    }
}

fn run() -> CliResult<()> {
    let config = parse_command_line_arguments();
    init_tracing(config.verbose);

    match config.input_file {
        Some(ref file_path) => analyze_file(file_path, &config),
        None => {
            print_usage();
            Err(CliError::MissingInputFile)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn parse_command_line_arguments() -> CliConfig {
    let matches = Command::new(APP_NAME)
        .version(VERSION)
        .author("jsbind maintainers")
        .about("Binding analyzer for ES5 + ES6-module JavaScript")
        .long_about(
            "Parses a JavaScript source file and runs the binding-analysis pass, \n\
             reporting redeclarations, early (pre-declaration) references, \n\
             reassignment of immutable bindings, misplaced block-scoped \n\
             declarations, and (optionally) unused local assignments.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::SetTrue)
                .help("Enable verbose tracing of the analysis pass"),
        )
        .arg(
            Arg::new("unused-locals")
                .long("unused-locals")
                .action(clap::ArgAction::SetTrue)
                .help("Enable UNUSED_LOCAL_ASSIGNMENT warnings (off by default)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Emit the full analysis result as JSON instead of the text report"),
        )
        .arg(
            Arg::new("input")
                .help("JavaScript source file to analyze")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .index(1),
        )
        .get_matches();

    CliConfig {
        input_file: matches.get_one::<PathBuf>("input").cloned(),
        verbose: matches.get_flag("verbose"),
        unused_locals: matches.get_flag("unused-locals"),
        json: matches.get_flag("json"),
    }
}

fn print_usage() {
    println!("usage: {} [OPTIONS] <FILE>", APP_NAME);
    println!("       use --help for more information");
}

fn analyze_file(file_path: &PathBuf, config: &CliConfig) -> CliResult<()> {
    if !file_path.exists() {
        return Err(CliError::FileNotFound(file_path.clone()));
    }

    let source_code = std::fs::read_to_string(file_path)
        .map_err(|_| CliError::FileNotFound(file_path.clone()))?;

    tracing::debug!(bytes = source_code.len(), "read source file");

    let parser_config = ParserConfig {
        preserve_trivia: true,
        ..ParserConfig::default()
    };
    let parse_result = parser::parse_js(&source_code, &file_path.to_string_lossy(), &parser_config);

    if !parse_result.errors.is_empty() {
        for error in &parse_result.errors {
            eprintln!("parse error: {}", error);
        }
        return Err(CliError::ParseError(format!(
            "{} parse error(s)",
            parse_result.errors.len()
        )));
    }

    let ast = parse_result.ast.ok_or_else(|| {
        CliError::ParseError("no AST produced despite no parse errors".to_string())
    })?;

    tracing::debug!(statements = ast.body.len(), "parsed program");

    let analyzer_config = AnalyzerConfig {
        unused_local_variable_check_enabled: config.unused_locals,
        verbose: config.verbose,
    };
    let analysis = analyzer::analyze_ast(&ast, &analyzer_config, parse_result.trivia.as_ref())?;

    if config.json {
        match serde_json::to_string_pretty(&analysis) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                return Err(CliError::ParseError(format!(
                    "failed to serialize analysis result: {}",
                    error
                )))
            }
        }
    } else {
        report(&analysis, file_path);
    }

    if analysis
        .diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error)
    {
        process::exit(1);
    }

    Ok(())
}

fn report(analysis: &analyzer::BindingAnalysis, file_path: &PathBuf) {
    if analysis.diagnostics.is_empty() {
        println!("{}: no issues found", file_path.display());
        return;
    }

    for diagnostic in &analysis.diagnostics {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!(
            "{}:{} {} [{}] '{}'",
            file_path.display(),
            diagnostic.position,
            level,
            diagnostic.kind.stable_id(),
            diagnostic.name,
        );
    }

    let errors = analysis
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = analysis.diagnostics.len() - errors;
    println!(
        "{} diagnostic(s): {} error(s), {} warning(s)",
        analysis.diagnostics.len(),
        errors,
        warnings
    );
}
