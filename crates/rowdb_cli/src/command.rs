//! Command syntax.
//!
//! Turns one input line into a [`Command`]. Only the shape of the line is
//! checked here; whether tables and columns exist is the dispatcher's job.

use crate::error::{CliError, CliResult};
use rowdb_core::clause::{parse_clause, parse_column_pairs, parse_value_list};
use rowdb_core::Clause;

/// Text shown by the `help` command.
pub const HELP: &str = "\
Table management:
  create_table <name> <column:type> ...   create a table (types: int, str, bool)
  list_tables                             list all tables
  drop_table <name>                       delete a table and its rows
  info <name>                             show columns and record count

Records:
  insert into <name> values (<v1>, <v2>, ...)
  select from <name> [where <column=value> ...]
  update <name> set <column=value> ... [where <column=value> ...]
  delete from <name> where <column=value> ...

General:
  help                                    show this message
  exit                                    leave the shell

Quote text values that contain spaces or look like numbers or booleans:
  select from users where name=\"Ann Lee\" nickname=\"42\"";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `create_table <name> <col:type>...`
    CreateTable {
        /// Table name.
        name: String,
        /// Declared `(column, type)` pairs, types not yet checked.
        columns: Vec<(String, String)>,
    },
    /// `list_tables`
    ListTables,
    /// `drop_table <name>`
    DropTable {
        /// Table name.
        name: String,
    },
    /// `insert into <name> values (...)`
    Insert {
        /// Table name.
        table: String,
        /// Raw values, still quoted where the user quoted them.
        values: Vec<String>,
    },
    /// `select from <name> [where ...]`
    Select {
        /// Table name.
        table: String,
        /// Filter; empty selects every row.
        filter: Clause,
    },
    /// `update <name> set ... [where ...]`
    Update {
        /// Table name.
        table: String,
        /// Assignments.
        set: Clause,
        /// Filter; empty updates every row.
        filter: Clause,
    },
    /// `delete from <name> where ...`
    Delete {
        /// Table name.
        table: String,
        /// Filter; the engine refuses an empty one.
        filter: Clause,
    },
    /// `info <name>`
    Info {
        /// Table name.
        name: String,
    },
    /// `help`
    Help,
    /// `exit`
    Exit,
}

impl Command {
    /// Parses one line. Blank lines yield `None`.
    ///
    /// Command words (`insert`, `into`, `where`, ...) are case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::UnknownCommand`] for an unknown first word,
    /// [`CliError::Syntax`] for a misshapen line, and the core's
    /// `MalformedClause` error for bad `column:type` / `column=value` tokens.
    pub fn parse(line: &str) -> CliResult<Option<Self>> {
        let (keyword, args) = split_word(line);
        if keyword.is_empty() {
            return Ok(None);
        }

        let command = match keyword.to_ascii_lowercase().as_str() {
            "create_table" => {
                let (name, rest) = split_word(args);
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                if name.is_empty() || tokens.is_empty() {
                    return Err(CliError::syntax(
                        "usage: create_table <name> <column:type> ...",
                    ));
                }
                Self::CreateTable {
                    name: name.to_string(),
                    columns: parse_column_pairs(&tokens)?,
                }
            }
            "list_tables" => {
                expect_end(args, "list_tables")?;
                Self::ListTables
            }
            "drop_table" => Self::DropTable {
                name: single_name(args, "usage: drop_table <name>")?,
            },
            "info" => Self::Info {
                name: single_name(args, "usage: info <name>")?,
            },
            "insert" => {
                const USAGE: &str = "usage: insert into <name> values (<value>, ...)";
                let rest = expect_word(args, "into", USAGE)?;
                let (table, rest) = split_word(rest);
                let payload = strip_keyword_prefix(rest, "values")
                    .filter(|_| !table.is_empty())
                    .ok_or_else(|| CliError::syntax(USAGE))?;
                Self::Insert {
                    table: table.to_string(),
                    values: parse_value_list(payload)?,
                }
            }
            "select" => {
                const USAGE: &str = "usage: select from <name> [where <column=value> ...]";
                let rest = expect_word(args, "from", USAGE)?;
                let (table, rest) = split_word(rest);
                if table.is_empty() {
                    return Err(CliError::syntax(USAGE));
                }
                Self::Select {
                    table: table.to_string(),
                    filter: parse_optional_where(rest, USAGE)?,
                }
            }
            "update" => {
                const USAGE: &str =
                    "usage: update <name> set <column=value> ... [where <column=value> ...]";
                let (table, rest) = split_word(args);
                if table.is_empty() {
                    return Err(CliError::syntax(USAGE));
                }
                let rest = expect_word(rest, "set", USAGE)?;
                let (set_text, filter) = match split_keyword(rest, "where") {
                    Some((set_text, where_text)) => {
                        (set_text, parse_where_body(where_text, USAGE)?)
                    }
                    None => (rest, Clause::new()),
                };
                Self::Update {
                    table: table.to_string(),
                    set: parse_clause(set_text)?,
                    filter,
                }
            }
            "delete" => {
                const USAGE: &str = "usage: delete from <name> where <column=value> ...";
                let rest = expect_word(args, "from", USAGE)?;
                let (table, rest) = split_word(rest);
                if table.is_empty() {
                    return Err(CliError::syntax(USAGE));
                }
                Self::Delete {
                    table: table.to_string(),
                    filter: parse_optional_where(rest, USAGE)?,
                }
            }
            "help" => Self::Help,
            "exit" => Self::Exit,
            _ => return Err(CliError::UnknownCommand(keyword.to_string())),
        };
        Ok(Some(command))
    }

    /// Short name used in logs and timing output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create_table",
            Self::ListTables => "list_tables",
            Self::DropTable { .. } => "drop_table",
            Self::Insert { .. } => "insert",
            Self::Select { .. } => "select",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Info { .. } => "info",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}

/// Splits off the first whitespace-delimited word.
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    }
}

fn expect_word<'a>(text: &'a str, word: &str, usage: &str) -> CliResult<&'a str> {
    let (first, rest) = split_word(text);
    if first.eq_ignore_ascii_case(word) {
        Ok(rest)
    } else {
        Err(CliError::syntax(usage))
    }
}

fn expect_end(text: &str, command: &str) -> CliResult<()> {
    if text.trim().is_empty() {
        Ok(())
    } else {
        Err(CliError::syntax(format!("{command} takes no arguments")))
    }
}

fn single_name(text: &str, usage: &str) -> CliResult<String> {
    let (name, rest) = split_word(text);
    if name.is_empty() || !rest.is_empty() {
        return Err(CliError::syntax(usage));
    }
    Ok(name.to_string())
}

/// Returns what follows `keyword` at the start of `text`.
///
/// The keyword must be followed by whitespace, `(`, or the end of input,
/// so both `values (1)` and `values(1)` are accepted.
fn strip_keyword_prefix<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let head = text.get(..keyword.len())?;
    let rest = &text[keyword.len()..];
    let boundary = rest
        .chars()
        .next()
        .map_or(true, |c| c.is_whitespace() || c == '(');
    (head.eq_ignore_ascii_case(keyword) && boundary).then_some(rest)
}

/// Finds `keyword` as a standalone word outside quotes.
///
/// Returns the text before and after it.
fn split_keyword<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for (i, ch) in text.char_indices() {
        match quote {
            Some(q) => {
                if ch == q {
                    quote = None;
                }
            }
            None => {
                let word_start = prev.map_or(true, char::is_whitespace);
                if (ch == '"' || ch == '\'') && (word_start || prev == Some('=')) {
                    quote = Some(ch);
                } else if word_start {
                    let rest = &text[i..];
                    if let Some(after) = strip_keyword_prefix(rest, keyword) {
                        if after.is_empty() || after.starts_with(char::is_whitespace) {
                            return Some((&text[..i], after));
                        }
                    }
                }
            }
        }
        prev = Some(ch);
    }
    None
}

/// Parses `[where <conditions>]`, empty input meaning no filter.
fn parse_optional_where(text: &str, usage: &str) -> CliResult<Clause> {
    if text.trim().is_empty() {
        return Ok(Clause::new());
    }
    let body = expect_word(text, "where", usage)?;
    parse_where_body(body, usage)
}

fn parse_where_body(body: &str, usage: &str) -> CliResult<Clause> {
    if body.trim().is_empty() {
        return Err(CliError::syntax(format!(
            "'where' needs at least one condition; {usage}"
        )));
    }
    Ok(parse_clause(body)?)
}
