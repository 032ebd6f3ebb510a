//! Wrappers around engine calls: confirmation and timing.

use crate::error::CliResult;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tracing::debug;

/// Asks the user whether a destructive action should go ahead.
pub trait Confirm {
    /// Shows `prompt` and returns true if the user agreed.
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Reads a `y`/`n` answer from standard input.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{prompt} [y/n]: ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Gives the same answer every time, for scripts and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

/// Runs `action` only if confirmation is disabled or the user agrees.
///
/// Returns `Ok(None)` when the user declined.
///
/// # Errors
///
/// Returns whatever `action` returns.
pub fn confirmed<T>(
    confirm: &mut dyn Confirm,
    enabled: bool,
    prompt: &str,
    action: impl FnOnce() -> CliResult<T>,
) -> CliResult<Option<T>> {
    if enabled && !confirm.confirm(prompt) {
        debug!(prompt, "action declined");
        return Ok(None);
    }
    action().map(Some)
}

/// Runs `f` and measures how long it took.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    let elapsed = start.elapsed();
    debug!(operation = label, ?elapsed, "command finished");
    (value, elapsed)
}
