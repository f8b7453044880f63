//! # olcat CLI entry point
//!
//! Parses command-line arguments, sets up logging and configuration, and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use olcat_cli::config::OlcatConfig;
use olcat_cli::export::{run_export, ExportArgs};
use olcat_cli::schema::{run_check_schema, run_schema, CheckSchemaArgs, SchemaArgs};
use olcat_cli::validate::{run_validate, ValidateArgs};

/// Outlook category export and validation.
///
/// Normalizes collector output into validated category containers, checks
/// exported files against the published schemas, and generates the schemas
/// from the record model.
#[derive(Parser, Debug)]
#[command(name = "olcat", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: olcat.yaml at the repository root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the schema files (overrides the config).
    #[arg(long, global = true)]
    schema_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export collector output as a validated category container.
    Export(ExportArgs),

    /// Validate an exported payload against the schemas.
    Validate(ValidateArgs),

    /// Check schema files against the Draft 2020-12 meta-schema.
    CheckSchema(CheckSchemaArgs),

    /// Print generated schemas or the drift report.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "olcat starting");

    let repo_root = resolve_repo_root().unwrap_or_else(|| {
        tracing::warn!("Could not locate repository root; using current directory");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    let mut config = match OlcatConfig::discover(cli.config.as_deref(), &repo_root) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(2);
        }
    };
    if let Some(dir) = cli.schema_dir {
        config.schema_dir = dir;
    }

    let result = match cli.command {
        Commands::Export(args) => run_export(&args, &config, &repo_root),
        Commands::Validate(args) => run_validate(&args, &config, &repo_root),
        Commands::CheckSchema(args) => run_check_schema(&args, &config, &repo_root),
        Commands::Schema(args) => run_schema(&args, &config, &repo_root),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

/// Walk up from the current directory to the first directory holding
/// `schemas/` or `olcat.yaml`.
fn resolve_repo_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut dir = cwd.as_path();
    loop {
        if dir.join("schemas").is_dir() || dir.join(olcat_cli::config::CONFIG_FILE).is_file() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}
