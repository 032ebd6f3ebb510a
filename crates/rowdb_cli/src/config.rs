//! Shell configuration.

use std::path::{Path, PathBuf};

/// Name of the history file kept in the data directory.
pub const HISTORY_FILE: &str = ".rowdb_history";

/// Configuration for a shell session.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `db_meta.json` and the `data/` folder.
    pub data_dir: PathBuf,

    /// Keep everything in memory and write nothing to disk.
    pub in_memory: bool,

    /// Ask before dropping tables, deleting rows, or updating every row.
    pub confirm_destructive: bool,

    /// Report how long each command took.
    pub timing: bool,

    /// Where to keep line history (`None` disables it).
    pub history_file: Option<PathBuf>,

    /// Maximum number of history entries.
    pub history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            in_memory: false,
            confirm_destructive: true,
            timing: false,
            history_file: Some(PathBuf::from(HISTORY_FILE)),
            history_size: 1000,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory; history moves along with it.
    #[must_use]
    pub fn data_dir(mut self, path: &Path) -> Self {
        self.data_dir = path.to_path_buf();
        if self.history_file.is_some() {
            self.history_file = Some(path.join(HISTORY_FILE));
        }
        self
    }

    /// Sets whether to keep data in memory only.
    #[must_use]
    pub const fn in_memory(mut self, value: bool) -> Self {
        self.in_memory = value;
        self
    }

    /// Sets whether destructive commands ask first.
    #[must_use]
    pub const fn confirm_destructive(mut self, value: bool) -> Self {
        self.confirm_destructive = value;
        self
    }

    /// Sets whether to report command timings.
    #[must_use]
    pub const fn timing(mut self, value: bool) -> Self {
        self.timing = value;
        self
    }

    /// Sets the history file, or disables history with `None`.
    #[must_use]
    pub fn history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }

    /// Sets the maximum history size.
    #[must_use]
    pub const fn history_size(mut self, size: usize) -> Self {
        self.history_size = size;
        self
    }
}
