//! Interactive shell loop.

use crate::dispatch::{Dispatcher, Outcome};
use crate::error::CliResult;
use crate::formatter;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config as EditorConfig, EditMode, Editor};
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// The prompt shown when waiting for input.
pub const PROMPT: &str = "rowdb> ";

/// Executes one line and prints its result.
///
/// Returns `true` if the line asked to leave the shell.
///
/// # Errors
///
/// Returns the command's error unprinted; the caller decides how to report it.
pub fn execute_and_print(dispatcher: &mut Dispatcher, line: &str) -> CliResult<bool> {
    let Some(reply) = dispatcher.execute_line(line)? else {
        return Ok(false);
    };
    if let Some(text) = formatter::render(&reply) {
        println!("{text}");
    }
    Ok(reply.outcome == Outcome::Exit)
}

/// Line-editing shell around a [`Dispatcher`].
pub struct Repl {
    dispatcher: Dispatcher,
    editor: Editor<(), DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl Repl {
    /// Creates the shell and loads any saved history.
    ///
    /// # Errors
    ///
    /// Returns an error if the line editor cannot be initialised.
    pub fn new(dispatcher: Dispatcher) -> CliResult<Self> {
        let config = dispatcher.config();
        let editor_config = EditorConfig::builder()
            .history_ignore_space(true)
            .auto_add_history(false)
            .edit_mode(EditMode::Emacs)
            .max_history_size(config.history_size)?
            .build();
        let history_file = config.history_file.clone();

        let mut editor = Editor::with_config(editor_config)?;
        if let Some(path) = history_file.as_deref().filter(|path| path.exists()) {
            if let Err(e) = editor.load_history(path) {
                warn!(path = %path.display(), error = %e, "could not load history");
            }
        }

        Ok(Self {
            dispatcher,
            editor,
            history_file,
        })
    }

    /// Prints the welcome banner.
    pub fn print_banner(&self) {
        println!("RowDB shell v{}", env!("CARGO_PKG_VERSION"));
        println!("Type 'help' for commands, 'exit' or Ctrl-D to quit.\n");
    }

    /// Reads and executes lines until `exit` or end of input.
    pub fn run(&mut self) {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    match execute_and_print(&mut self.dispatcher, line) {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(e) => eprintln!("Error: {e}"),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    error!("readline error: {e}");
                    break;
                }
            }
        }

        self.save_history();
        println!("Goodbye!");
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_file {
            match self.editor.save_history(path) {
                Ok(()) => debug!(path = %path.display(), "history saved"),
                Err(e) => warn!(path = %path.display(), error = %e, "could not save history"),
            }
        }
    }
}
