//! RowDB shell
//!
//! Interactive command shell over a schema-checked record store.
//!
//! # Commands
//!
//! - `create_table`, `list_tables`, `drop_table`, `info` - manage tables
//! - `insert`, `select`, `update`, `delete` - work with records
//! - `help`, `exit`

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod config;
mod dispatch;
mod error;
mod formatter;
mod middleware;
mod repl;

use clap::Parser;
use config::Config;
use dispatch::Dispatcher;
use middleware::{AutoConfirm, Confirm, StdinConfirm};
use repl::Repl;
use rowdb_storage::{InMemoryStore, JsonFileStore, Persistence};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// RowDB interactive shell.
#[derive(Parser)]
#[command(name = "rowdb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding db_meta.json and data/
    #[arg(short, long, env = "ROWDB_PATH", default_value = ".")]
    path: PathBuf,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    in_memory: bool,

    /// Do not ask before destructive commands
    #[arg(short, long)]
    yes: bool,

    /// Report how long each command took
    #[arg(short, long, env = "ROWDB_TIMING")]
    timing: bool,

    /// Do not read or write line history
    #[arg(long)]
    no_history: bool,

    /// Run one command and exit
    #[arg(short, long, value_name = "COMMAND")]
    command: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let config = Config::new()
            .data_dir(&self.path)
            .in_memory(self.in_memory)
            .confirm_destructive(!self.yes)
            .timing(self.timing);
        if self.no_history || self.in_memory {
            config.history_file(None)
        } else {
            config
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> error::CliResult<ExitCode> {
    let config = cli.config();

    let store: Box<dyn Persistence> = if config.in_memory {
        info!("using in-memory store");
        Box::new(InMemoryStore::new())
    } else {
        info!(path = %config.data_dir.display(), "opening store");
        Box::new(JsonFileStore::open(&config.data_dir)?)
    };
    let confirm: Box<dyn Confirm> = if config.confirm_destructive {
        Box::new(StdinConfirm)
    } else {
        Box::new(AutoConfirm(true))
    };
    let mut dispatcher = Dispatcher::new(store, config, confirm);

    if let Some(line) = &cli.command {
        return Ok(match repl::execute_and_print(&mut dispatcher, line) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        });
    }

    let mut shell = Repl::new(dispatcher)?;
    shell.print_banner();
    shell.run();
    Ok(ExitCode::SUCCESS)
}
