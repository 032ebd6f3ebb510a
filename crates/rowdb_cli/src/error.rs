//! Error types for the command shell.

use rowdb_core::CoreError;
use rowdb_storage::StorageError;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Result type for shell operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors reported to the user by the shell.
///
/// None of these end the session; the REPL prints them and reads the next
/// line.
#[derive(Debug, Error)]
pub enum CliError {
    /// The engine refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Saving failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The command line does not follow the command's syntax.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// The first word is not a known command.
    #[error("unknown command '{0}', type 'help' for the list of commands")]
    UnknownCommand(String),

    /// The line editor failed.
    #[error("line editor error: {0}")]
    Readline(#[from] ReadlineError),
}

impl CliError {
    /// Creates a syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }
}
