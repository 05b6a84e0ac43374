//! rulebook CLI tool.
//!
//! Usage:
//! ```bash
//! rulebook validate [PATH]
//! rulebook compile [PATH] [--output FILE]
//! rulebook extract-tests [PATH] [--output FILE]
//! rulebook list-sections [PATH]
//! rulebook init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Compile and validate rule documents
#[derive(Parser)]
#[command(name = "rulebook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every rule file against the schema
    Validate {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate, then render the compiled document
    Compile {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (default: `output.document` from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format for findings
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate, then write labelled code examples as JSON
    ExtractTests {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output file (default: `output.test_cases` from config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the effective section table
    ListSections {
        /// Project directory (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for validation findings.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let explicit = cli.config.as_deref();
    match cli.command {
        Commands::Validate { path, format } => {
            let source = config_resolver::resolve(&path, explicit);
            commands::validate::run(&path, format, &source)
        }
        Commands::Compile {
            path,
            output,
            format,
        } => {
            let source = config_resolver::resolve(&path, explicit);
            commands::compile::run(&path, output.as_deref(), format, &source)
        }
        Commands::ExtractTests { path, output } => {
            let source = config_resolver::resolve(&path, explicit);
            commands::extract_tests::run(&path, output.as_deref(), &source)
        }
        Commands::ListSections { path } => {
            let source = config_resolver::resolve(&path, explicit);
            commands::list_sections::run(&path, &source)
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
