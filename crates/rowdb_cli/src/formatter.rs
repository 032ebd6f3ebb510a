//! Output formatting for command results.

use crate::command::HELP;
use crate::dispatch::{Outcome, Reply};
use comfy_table::{Cell, ContentArrangement, Table};
use rowdb_core::Record;
use std::fmt::Write as _;
use std::time::Duration;

/// Renders a reply as printable text.
///
/// Returns `None` for [`Outcome::Exit`], which prints nothing.
#[must_use]
pub fn render(reply: &Reply) -> Option<String> {
    let mut text = render_outcome(&reply.outcome)?;
    if let Some(elapsed) = reply.elapsed {
        text.push('\n');
        text.push_str(&format_elapsed(elapsed));
    }
    Some(text)
}

/// Renders an outcome without timing information.
#[must_use]
pub fn render_outcome(outcome: &Outcome) -> Option<String> {
    let text = match outcome {
        Outcome::Message(message) => message.clone(),
        Outcome::Tables(names) if names.is_empty() => "No tables.".to_string(),
        Outcome::Tables(names) => names.join("\n"),
        Outcome::Rows { rows, .. } if rows.is_empty() => "No rows found.".to_string(),
        Outcome::Rows { columns, rows } => format_rows(columns, rows),
        Outcome::Info {
            table,
            columns,
            row_count,
        } => {
            let mut text = format!("Table: {table}\nColumns:");
            for (column, ty) in columns {
                let _ = write!(text, "\n  {column}:{ty}");
            }
            let _ = write!(text, "\nRecords: {row_count}");
            text
        }
        Outcome::Help => HELP.to_string(),
        Outcome::Exit => return None,
    };
    Some(text)
}

/// Formats rows as a table, one column per schema column.
fn format_rows(columns: &[String], rows: &[Record]) -> String {
    let mut table = Table::new();

    table
        .set_content_arrangement(ContentArrangement::Dynamic)
        .load_preset(comfy_table::presets::UTF8_FULL)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    table.set_header(columns.iter().map(Cell::new));

    for row in rows {
        let cells: Vec<Cell> = columns
            .iter()
            .map(|column| {
                row.get(column)
                    .map_or_else(|| Cell::new(""), |value| Cell::new(value.to_string()))
            })
            .collect();
        table.add_row(cells);
    }

    let mut text = table.to_string();
    let _ = write!(
        text,
        "\n({} row{})",
        rows.len(),
        if rows.len() == 1 { "" } else { "s" }
    );
    text
}

/// Formats an elapsed time for the timing report.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("Time: {:.3}ms", elapsed.as_secs_f64() * 1000.0)
}
