//! # rmmd-cli
//!
//! Command-line interface for RMMD reaction mechanism datasets.
//!
//! `rmmd validate` checks a JSON or YAML document and prints every error it
//! finds; `rmmd schema` prints the JSON Schema of the document root.

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rmmd_validation::{
    OutputFormat, ReferenceCheck, SchemaPart, ValidationConfig, ValidationEngine,
    ValidationReporter,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Exit status for a document that failed validation
const EXIT_INVALID: u8 = 1;
/// Exit status for files that could not be read or parsed
const EXIT_LOAD_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "rmmd")]
#[command(about = "RMMD reaction mechanism schema validator")]
#[command(version)]
struct Cli {
    /// Path to a validation configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log engine progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document
    Validate {
        /// Input file path (.json, .yaml or .yml)
        input: PathBuf,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Validate the file as a single entity, e.g. PesReaction
        #[arg(short, long)]
        part: Option<SchemaPart>,

        /// Skip checking that ids and citation keys resolve
        #[arg(long)]
        deferred_references: bool,

        /// Report at most this many errors (0 = unlimited)
        #[arg(long)]
        max_errors: Option<usize>,
    },

    /// Print the JSON Schema of the document root
    Schema {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_LOAD_FAILURE)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Commands::Validate {
            input,
            format,
            part,
            deferred_references,
            max_errors,
        } => {
            let mut config = load_config(cli.config.as_deref())?;
            if deferred_references {
                config.references = ReferenceCheck::Deferred;
            }
            if let Some(max_errors) = max_errors {
                config.max_errors = max_errors;
            }
            validate(&input, format, part.unwrap_or(SchemaPart::Document), config)
        }
        Commands::Schema { output } => {
            let schema = rmmd_schema::document_schema();
            let json = serde_json::to_string_pretty(&schema)?;
            match output {
                Some(path) => {
                    info!("Writing document schema to {}", path.display());
                    std::fs::write(&path, json + "\n")
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ValidationConfig> {
    let Some(path) = path else {
        return Ok(ValidationConfig::default());
    };
    info!("Using configuration: {}", path.display());
    rmmd_adapter::load_typed(path)
        .with_context(|| format!("Failed to load configuration {}", path.display()))
}

fn validate(
    input: &Path,
    format: OutputFormat,
    part: SchemaPart,
    config: ValidationConfig,
) -> anyhow::Result<ExitCode> {
    info!("Validating {} as {part}", input.display());
    let value = rmmd_adapter::load_file(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let engine = ValidationEngine::with_config(config);
    let outcome = engine.check_part(part, &value);

    let reporter = ValidationReporter::new(format);
    let source = input.display().to_string();
    print!("{}", reporter.render(&source, outcome.as_ref().err()));

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(report) => {
            info!("{} failed with {} error(s)", source, report.len());
            Ok(ExitCode::from(EXIT_INVALID))
        }
    }
}
