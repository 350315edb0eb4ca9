//! Werewolf CLI - Command-line interface for the werewolf table
//!
//! This CLI lets operators:
//! - Play one or more sessions and watch the public event log
//! - Inspect the global ranking with colour-coded win rates
//! - Reset the global standings while keeping what players learned
//!
//! Moderator state persists in a JSON file between invocations.

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod state;

use commands::{play, ranking};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
use state::StateStore;

/// Werewolf CLI application
#[derive(Parser)]
#[command(name = "werewolf")]
#[command(about = "Werewolf - nine-player social deduction table", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "WEREWOLF_CONFIG")]
    config: Option<String>,

    /// Moderator state file
    #[arg(short, long, env = "WEREWOLF_STATE")]
    state: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Play sessions and update the standings
    Play(play::PlayArgs),

    /// Show the global ranking
    Ranking,

    /// Zero the global standings
    Reset,

    /// Show the effective configuration
    Config,
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

    // Logs go to stderr so structured output on stdout stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;
    let store = StateStore::new(config.resolve_state_file(cli.state.as_deref())?);

    match cli.command {
        Commands::Play(args) => {
            play::execute(args, &store, config.game, config.sessions, cli.output).await
        }
        Commands::Ranking => ranking::show(&store, config.game, cli.output),
        Commands::Reset => ranking::reset(&store, config.game),
        Commands::Config => output::print_single(&config, cli.output),
    }
}
