//! Configuration for the `taskboard` command.
//!
//! Settings are merged from several layers, highest priority first:
//! 1. CLI arguments
//! 2. `TASKBOARD_*` environment variables (clap `env`)
//! 3. TOML config file (`~/.config/taskboard/config.toml`)
//! 4. Compiled defaults
//!
//! A missing default config file falls back to built-in values. An explicit
//! `--config` path must exist.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use taskboard_proto::filter::{SortBy, SortDirection};
use taskboard_proto::snapshot::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_SNAPSHOT_KEY};
use taskboard_proto::task::{Priority, TaskStatus};
use taskboard_proto::view::{ViewOptions, ViewType};

use crate::board::CancelPolicy;

/// Failure while reading or parsing the board configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// File that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// On-disk layout; every field optional so a file may set only a few keys
// ---------------------------------------------------------------------------

/// Parsed `config.toml`.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    board: BoardFileConfig,
    ui: UiFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<PathBuf>,
    snapshot_key: Option<String>,
}

/// `[board]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct BoardFileConfig {
    items_per_page: Option<usize>,
    revert_on_cancel: Option<bool>,
    seed_demo_data: Option<bool>,
}

/// `[ui]` table: display options.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
#[allow(clippy::struct_field_names)]
struct UiFileConfig {
    show_tags: Option<bool>,
    show_assignee: Option<bool>,
    show_due_date: Option<bool>,
    show_priority: Option<bool>,
}

// ---------------------------------------------------------------------------
// Effective settings after layering
// ---------------------------------------------------------------------------

/// Settings the binary runs with.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- Storage --
    /// Directory holding the file-backed key-value store.
    pub data_dir: PathBuf,
    /// Key the board snapshot is saved under.
    pub snapshot_key: String,

    // -- Board --
    /// Initial list-view page size for a fresh board.
    pub items_per_page: usize,
    /// Whether cancelling a drag puts the card back where it started.
    pub revert_on_cancel: bool,
    /// Whether a fresh board starts with demo tasks and members.
    pub seed_demo_data: bool,

    // -- UI --
    /// Initial card display options for a fresh board.
    pub view_options: ViewOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            revert_on_cancel: false,
            seed_demo_data: true,
            view_options: ViewOptions::default(),
        }
    }
}

impl ClientConfig {
    /// Builds the effective settings from flags, environment, and `config.toml`.
    ///
    /// An explicit `--config` that cannot be read is an error.
    /// If no `--config` is given, the default path
    /// (`~/.config/taskboard/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Layers `cli` over `file` over defaults.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let ui = &file.ui;

        Self {
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .unwrap_or(defaults.data_dir),
            snapshot_key: file
                .storage
                .snapshot_key
                .clone()
                .unwrap_or(defaults.snapshot_key),
            items_per_page: file
                .board
                .items_per_page
                .unwrap_or(defaults.items_per_page)
                .max(1),
            revert_on_cancel: cli.revert_on_cancel
                || file
                    .board
                    .revert_on_cancel
                    .unwrap_or(defaults.revert_on_cancel),
            seed_demo_data: file
                .board
                .seed_demo_data
                .unwrap_or(defaults.seed_demo_data),
            view_options: ViewOptions {
                show_tags: ui.show_tags.unwrap_or(defaults.view_options.show_tags),
                show_assignee: ui
                    .show_assignee
                    .unwrap_or(defaults.view_options.show_assignee),
                show_due_date: ui
                    .show_due_date
                    .unwrap_or(defaults.view_options.show_due_date),
                show_priority: ui
                    .show_priority
                    .unwrap_or(defaults.view_options.show_priority),
            },
        }
    }

    /// Drag cancel behavior selected by `revert_on_cancel`.
    #[must_use]
    pub const fn cancel_policy(&self) -> CancelPolicy {
        if self.revert_on_cancel {
            CancelPolicy::Revert
        } else {
            CancelPolicy::KeepLiveMoves
        }
    }
}

/// Command-line interface of the `taskboard` binary.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Kanban task board")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/taskboard/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for saved board state.
    #[arg(long, env = "TASKBOARD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Put dragged cards back where they started when a move is cancelled.
    #[arg(long)]
    pub revert_on_cancel: bool,

    /// Minimum log level written to the log file.
    #[arg(long, default_value = "info", env = "TASKBOARD_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskboard.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// What to do (default: print the board).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Board commands.
#[derive(clap::Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the kanban board.
    Board,
    /// Print the filtered task list, one page at a time.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Create a task.
    Add(AddArgs),
    /// Change fields of a task.
    Edit(EditArgs),
    /// Drag a task onto a column (`todo`, `in-progress`, `done`), another
    /// task, or `trash`.
    Move {
        /// Task to move.
        id: String,
        /// Drop target id.
        target: String,
    },
    /// Delete a task.
    Delete {
        /// Task to delete.
        id: String,
    },
    /// List team members.
    Members,
    /// Change filter and sort criteria.
    Filter(FilterArgs),
    /// Show only one member's tasks.
    SelectMember {
        /// Member id.
        id: String,
    },
    /// Show everyone's tasks again.
    ClearMember,
    /// Switch the active view.
    View {
        /// `kanban`, `list`, or `table`.
        view: ViewType,
    },
    /// List every tag in use.
    Tags,
}

/// Arguments for `add`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Task title.
    #[arg(long)]
    pub title: String,
    /// Longer description.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Starting column.
    #[arg(long, default_value = "todo")]
    pub status: TaskStatus,
    /// Priority.
    #[arg(long, default_value = "medium")]
    pub priority: Priority,
    /// Tag; repeat for several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Due date (`YYYY-MM-DD`).
    #[arg(long)]
    pub due: Option<NaiveDate>,
    /// Assignee member id.
    #[arg(long)]
    pub assignee: Option<String>,
}

/// Arguments for `edit`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct EditArgs {
    /// Task to edit.
    pub id: String,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New column.
    #[arg(long)]
    pub status: Option<TaskStatus>,
    /// New priority.
    #[arg(long)]
    pub priority: Option<Priority>,
    /// Replacement tags; repeat for several.
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// New due date (`YYYY-MM-DD`).
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,
    /// Remove the due date.
    #[arg(long)]
    pub clear_due: bool,
    /// New assignee member id.
    #[arg(long, conflicts_with = "unassign")]
    pub assignee: Option<String>,
    /// Remove the assignee.
    #[arg(long)]
    pub unassign: bool,
}

/// Arguments for `filter`.
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct FilterArgs {
    /// Title substring (case-insensitive).
    #[arg(long)]
    pub search: Option<String>,
    /// Tag to match; repeat for several (any matches).
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Only tasks assigned to this member id.
    #[arg(long)]
    pub assignee: Option<String>,
    /// `createdAt`, `dueDate`, or `priority`.
    #[arg(long)]
    pub sort_by: Option<SortBy>,
    /// `asc` or `desc`.
    #[arg(long)]
    pub direction: Option<SortDirection>,
    /// Reset search, tags, and sort first.
    #[arg(long)]
    pub clear: bool,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("taskboard")
}

/// Default config file location, if the platform has a config directory.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("taskboard").join("config.toml"))
}

/// Reads and parses the config file.
///
/// An explicit path must exist. The default path may be missing, in which
/// case an empty config is returned.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let (path, required) = match explicit_path {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(ConfigFile::default()),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ConfigFile::default());
        }
        Err(source) => return Err(ConfigError::ReadFile { path, source }),
    };
    Ok(toml::from_str(&contents)?)
}
