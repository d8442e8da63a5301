//! schema-docgen CLI - render database schema descriptions as documents

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_docgen::cli::CliError;
use schema_docgen::cli::commands::formats::handle_formats;
use schema_docgen::cli::commands::render::{RenderArgs, handle_render};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{Level, error};

#[derive(Parser)]
#[command(name = "schema-docgen")]
#[command(about = "Render database schema descriptions to JSON, Markdown, HTML or PDF")]
#[command(version)]
struct Cli {
    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a description file into a document
    Render {
        /// Description file (.json, .yaml, .yml) or - for JSON on stdin
        input: String,

        /// Path to TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: json, markdown, html, pdf
        #[arg(short, long)]
        format: Option<String>,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Label language: en, pt-BR, es
        #[arg(short, long)]
        language: Option<String>,
    },

    /// List supported output formats and languages
    Formats,
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Render {
            input,
            config,
            format,
            output,
            language,
        } => handle_render(&RenderArgs {
            input: input.clone(),
            config,
            format,
            output,
            language,
        })
        .with_context(|| format!("Failed to render {}", input)),
        Commands::Formats => Ok(handle_formats()?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.verbosity, &cli.log_format);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<CliError>()
                .map(CliError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
