//! `taskboard` — kanban board on the command line.
//!
//! Loads the saved board, runs one command against it, and saves it again
//! if anything changed. Configuration via CLI flags, environment variables,
//! or config file (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Show the board (seeded with demo data on first run)
//! cargo run --bin taskboard
//!
//! # Drag a task into another column, or into the trash
//! cargo run --bin taskboard -- move task-1 in-progress
//! cargo run --bin taskboard -- move task-1 trash
//! ```

use std::path::Path;
use std::process::ExitCode;

use chrono::{Local, Utc};
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use taskboard::board::Board;
use taskboard::commands::{self, CommandError};
use taskboard::config::{CliArgs, ClientConfig, Command};
use taskboard::persist::{FileKeyValueStore, load_snapshot, save_snapshot};
use taskboard::tasks::TaskStore;

fn main() -> ExitCode {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file; stdout carries command output.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    match run(cli.command.unwrap_or(Command::Board), &config) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Sends `tracing` output to a log file so stdout only carries command
/// output.
///
/// The returned [`WorkerGuard`] flushes buffered entries when dropped, so it
/// must live until `main` returns. `RUST_LOG` takes precedence over
/// `level`.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let log_path = file_path.map_or_else(
        || std::env::temp_dir().join("taskboard.log"),
        Path::to_path_buf,
    );
    let (dir, file_name) = (log_path.parent()?, log_path.file_name()?);

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Loads the board, runs `command`, and saves the result.
fn run(command: Command, config: &ClientConfig) -> Result<String, CommandError> {
    let mut kv = FileKeyValueStore::new(&config.data_dir);
    let saved = load_snapshot(&kv, &config.snapshot_key)?;
    let fresh = saved.is_none();
    let snapshot = saved.unwrap_or_else(|| commands::initial_snapshot(config, Utc::now()));

    tracing::info!(data_dir = %config.data_dir.display(), fresh, "taskboard starting");

    let store = TaskStore::from_snapshot(snapshot);
    let mut board = Board::with_cancel_policy(store, config.cancel_policy());
    let output = commands::execute(&mut board, command, Local::now().date_naive())?;

    if fresh || board.store().revision() > 0 {
        let snapshot = board.store().snapshot();
        if let Err(e) = save_snapshot(&mut kv, &config.snapshot_key, &snapshot) {
            tracing::warn!(error = %e, "failed to save board");
            return Err(e.into());
        }
    }
    Ok(output)
}
