//! Command dispatcher.
//!
//! Each command follows the same cycle: load the snapshots it needs from
//! the store, run the pure engine operation, ask for confirmation if the
//! change is destructive, then save. Nothing is written when any step
//! before saving fails.

use crate::command::Command;
use crate::config::Config;
use crate::error::CliResult;
use crate::middleware::{self, Confirm};
use rowdb_core::{records, schema, Clause, ColumnType, QueryCache, Record};
use rowdb_storage::Persistence;
use std::time::Duration;
use tracing::{debug, info};

/// What a command produced, before formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A one-line status message.
    Message(String),
    /// Table names from `list_tables`.
    Tables(Vec<String>),
    /// Result of a `select`.
    Rows {
        /// Column names in schema order.
        columns: Vec<String>,
        /// Matching records.
        rows: Vec<Record>,
    },
    /// Result of `info`.
    Info {
        /// Table name.
        table: String,
        /// Columns in schema order.
        columns: Vec<(String, ColumnType)>,
        /// Number of stored records.
        row_count: usize,
    },
    /// The help text was requested.
    Help,
    /// The user asked to leave.
    Exit,
}

/// An outcome plus how long it took, when timing is on.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// What the command produced.
    pub outcome: Outcome,
    /// Elapsed time, present only when timing is enabled.
    pub elapsed: Option<Duration>,
}

const CANCELLED: &str = "Operation cancelled.";

/// Routes parsed commands to the engine and the store.
pub struct Dispatcher {
    store: Box<dyn Persistence>,
    config: Config,
    confirm: Box<dyn Confirm>,
    selects: QueryCache<String, Vec<Record>>,
}

impl Dispatcher {
    /// Creates a dispatcher over `store`.
    pub fn new(store: Box<dyn Persistence>, config: Config, confirm: Box<dyn Confirm>) -> Self {
        Self {
            store,
            config,
            confirm,
            selects: QueryCache::new(),
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses and executes one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns syntax, engine or storage errors; state is unchanged when
    /// an error is returned.
    pub fn execute_line(&mut self, line: &str) -> CliResult<Option<Reply>> {
        match Command::parse(line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    /// Executes a parsed command.
    ///
    /// # Errors
    ///
    /// Returns engine or storage errors; state is unchanged when an error
    /// is returned.
    pub fn execute(&mut self, command: Command) -> CliResult<Reply> {
        let name = command.name();
        let (outcome, elapsed) = middleware::timed(name, || self.run(command));
        let outcome = outcome?;

        let elapsed = self.config.timing.then(|| {
            info!(command = name, elapsed_ms = elapsed.as_secs_f64() * 1000.0, "timing");
            elapsed
        });
        Ok(Reply { outcome, elapsed })
    }

    fn run(&mut self, command: Command) -> CliResult<Outcome> {
        match command {
            Command::CreateTable { name, columns } => self.create_table(&name, &columns),
            Command::ListTables => {
                let registry = self.store.load_metadata();
                let names = schema::list_tables(&registry)
                    .into_iter()
                    .map(str::to_string)
                    .collect();
                Ok(Outcome::Tables(names))
            }
            Command::DropTable { name } => self.drop_table(&name),
            Command::Insert { table, values } => self.insert(&table, &values),
            Command::Select { table, filter } => self.select(&table, &filter),
            Command::Update { table, set, filter } => self.update(&table, &set, &filter),
            Command::Delete { table, filter } => self.delete(&table, &filter),
            Command::Info { name } => {
                let registry = self.store.load_metadata();
                let table_schema = schema::info(&registry, &name)?;
                Ok(Outcome::Info {
                    columns: table_schema
                        .columns()
                        .map(|(column, ty)| (column.to_string(), ty))
                        .collect(),
                    row_count: self.store.load_table(&name).len(),
                    table: name,
                })
            }
            Command::Help => Ok(Outcome::Help),
            Command::Exit => Ok(Outcome::Exit),
        }
    }

    fn create_table(&mut self, name: &str, columns: &[(String, String)]) -> CliResult<Outcome> {
        let registry = schema::create_table(&self.store.load_metadata(), name, columns)?;
        self.store.save_metadata(&registry)?;
        // a stale data file under the same name must not leak old IDs
        self.store.save_table(name, &[])?;
        self.selects.clear();

        let described = registry
            .get(name)
            .map(|table_schema| {
                table_schema
                    .columns()
                    .map(|(column, ty)| format!("{column}:{ty}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        Ok(Outcome::Message(format!(
            "Table \"{name}\" created with columns: {described}"
        )))
    }

    fn drop_table(&mut self, name: &str) -> CliResult<Outcome> {
        let registry = schema::drop_table(&self.store.load_metadata(), name)?;
        let prompt = format!("Drop table \"{name}\" and all of its records?");

        let store = &mut self.store;
        let done = middleware::confirmed(
            self.confirm.as_mut(),
            self.config.confirm_destructive,
            &prompt,
            || {
                store.save_metadata(&registry)?;
                store.remove_table(name)?;
                Ok(())
            },
        )?;

        Ok(match done {
            Some(()) => {
                self.selects.clear();
                Outcome::Message(format!("Table \"{name}\" dropped."))
            }
            None => Outcome::Message(CANCELLED.to_string()),
        })
    }

    fn insert(&mut self, table: &str, values: &[String]) -> CliResult<Outcome> {
        let registry = self.store.load_metadata();
        let rows = self.store.load_table(table);
        let (rows, id) = records::insert(&registry, table, values, rows)?;
        self.store.save_table(table, &rows)?;
        self.selects.clear();
        Ok(Outcome::Message(format!(
            "Record with ID={id} inserted into \"{table}\"."
        )))
    }

    fn select(&mut self, table: &str, filter: &Clause) -> CliResult<Outcome> {
        let registry = self.store.load_metadata();
        let table_schema = schema::info(&registry, table)?;
        schema::check_filter(table, table_schema, filter)?;

        let store = &self.store;
        let rows = self
            .selects
            .get_or_compute(cache_key(table, filter), || {
                records::select(&store.load_table(table), filter)
            });

        Ok(Outcome::Rows {
            columns: table_schema
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            rows,
        })
    }

    fn update(&mut self, table: &str, set: &Clause, filter: &Clause) -> CliResult<Outcome> {
        let registry = self.store.load_metadata();
        let table_schema = schema::info(&registry, table)?;
        schema::check_assignments(table, table_schema, set)?;
        schema::check_filter(table, table_schema, filter)?;

        let (rows, ids) = records::update(self.store.load_table(table), set, filter)?;
        if ids.is_empty() {
            return Ok(Outcome::Message("No records matched.".to_string()));
        }

        // updating without a filter rewrites the whole table
        let ask = self.config.confirm_destructive && filter.is_empty();
        let prompt = format!("Update all {} records of \"{table}\"?", ids.len());
        let store = &mut self.store;
        let done = middleware::confirmed(self.confirm.as_mut(), ask, &prompt, || {
            store.save_table(table, &rows)?;
            Ok(())
        })?;

        Ok(match done {
            Some(()) => {
                self.selects.clear();
                debug!(table, count = ids.len(), "update saved");
                Outcome::Message(format!(
                    "Updated {} record(s) in \"{table}\": ID {}.",
                    ids.len(),
                    join_ids(&ids)
                ))
            }
            None => Outcome::Message(CANCELLED.to_string()),
        })
    }

    fn delete(&mut self, table: &str, filter: &Clause) -> CliResult<Outcome> {
        let registry = self.store.load_metadata();
        let table_schema = schema::info(&registry, table)?;
        schema::check_filter(table, table_schema, filter)?;

        let (rows, ids) = records::delete(self.store.load_table(table), filter)?;
        if ids.is_empty() {
            return Ok(Outcome::Message("No records matched.".to_string()));
        }

        let prompt = format!("Delete {} record(s) from \"{table}\"?", ids.len());
        let store = &mut self.store;
        let done = middleware::confirmed(
            self.confirm.as_mut(),
            self.config.confirm_destructive,
            &prompt,
            || {
                store.save_table(table, &rows)?;
                Ok(())
            },
        )?;

        Ok(match done {
            Some(()) => {
                self.selects.clear();
                Outcome::Message(format!(
                    "Deleted {} record(s) from \"{table}\": ID {}.",
                    ids.len(),
                    join_ids(&ids)
                ))
            }
            None => Outcome::Message(CANCELLED.to_string()),
        })
    }
}

fn cache_key(table: &str, filter: &Clause) -> String {
    let mut key = table.to_string();
    for (column, value) in filter.iter() {
        key.push_str(&format!("\u{1f}{column}={value:?}"));
    }
    key
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
