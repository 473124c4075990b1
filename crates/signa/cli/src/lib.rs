//! Signa CLI - hand-signal distress detection from the terminal
//!
//! - `run`: live session fed by the simulated classifier or a frame script
//! - `replay`: deterministic offline run over recorded raw frames
//! - `patterns`: registered patterns and the gesture legend
//! - `check`: validate a pattern registry file

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;
mod settings;

use commands::{check, patterns, replay, run};
pub use error::{CliError, CliResult};
pub use output::OutputFormat;

/// Signa CLI application
#[derive(Parser)]
#[command(name = "signa")]
#[command(about = "Signa - real-time hand-signal distress detection", long_about = None)]
#[command(version)]
struct Cli {
    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// Session configuration file (TOML)
    #[arg(short, long, global = true, env = "SIGNA_CONFIG")]
    config: Option<PathBuf>,

    /// Pattern registry file (TOML); the built-in registry when omitted
    #[arg(short, long, global = true, env = "SIGNA_PATTERNS")]
    patterns: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "SIGNA_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run a live detection session
    Run(run::RunArgs),

    /// Replay recorded raw frames through the pipeline
    Replay(replay::ReplayArgs),

    /// List registered patterns and the gesture legend
    Patterns,

    /// Validate a pattern registry file
    Check {
        /// Registry file to validate
        path: PathBuf,
    },
}

/// Run using the current process arguments.
pub async fn run() -> CliResult<()> {
    run_with_args(std::env::args_os()).await
}

/// Run using the provided argument iterator.
pub async fn run_with_args<I, T>(args: I) -> CliResult<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose, cli.log_json);

    let config_path = cli.config.as_deref();
    let patterns_path = cli.patterns.as_deref();

    match cli.command {
        Commands::Run(args) => run::execute(args, config_path, patterns_path, cli.output).await,
        Commands::Replay(args) => replay::execute(args, config_path, patterns_path, cli.output),
        Commands::Patterns => patterns::execute(patterns_path, cli.output),
        Commands::Check { path } => check::execute(&path, config_path, cli.output),
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| filter.into());

    // A subscriber may already be installed when embedded; keep it.
    let _ = if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
}
