//! Boardgames: Numerical Tic-Tac-Toe, Notakto and Gomoku in the terminal.
//!
//! ## Usage
//!
//! - `boardgames` - Start the interactive menu
//! - `boardgames play` - Same as above
//! - `boardgames saves` - List saved games and exit
//!
//! Saves are read from and written to `--save-dir` (default: the current
//! directory). Logs go to stderr; set `--log-level` or `RUST_LOG`.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use boardgames::persistence::JsonDirStore;
use boardgames::shell::Shell;

/// Boardgames: Numerical Tic-Tac-Toe, Notakto and Gomoku
#[derive(Parser)]
#[command(name = "boardgames")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding save files
    #[arg(long, global = true, default_value = ".")]
    save_dir: PathBuf,

    /// Log filter, e.g. `info` or `boardgames=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu
    Play,
    /// List saved games in the save directory
    Saves,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    let store = JsonDirStore::new(&cli.save_dir);
    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), store);

    match cli.command {
        Some(Commands::Saves) => shell
            .list()
            .with_context(|| format!("failed to list saves in {}", cli.save_dir.display())),
        Some(Commands::Play) | None => shell.run().context("interactive session failed"),
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
