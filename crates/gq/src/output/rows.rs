//! Search result output formatting.

use grid_query_rs::{Column, Record};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;

use super::helpers::{push_header, truncate_str};

/// Maximum width of a table cell.
const CELL_WIDTH: usize = 18;

/// How the rows were matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// The input built into a filter expression.
    Filter,
    /// The input was searched as plain text.
    Text,
}

/// JSON output structure for the search command.
#[derive(Serialize)]
pub struct SearchOutput<'a> {
    pub mode: SearchMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<&'a str>,
    /// Number of matching rows before the limit was applied.
    pub total: usize,
    pub rows: &'a [&'a Value],
}

/// Formats search results as JSON.
pub fn format_rows_json(
    mode: SearchMode,
    expression: Option<&str>,
    total: usize,
    rows: &[&Value],
) -> Result<String, serde_json::Error> {
    let output = SearchOutput {
        mode,
        expression,
        total,
        rows,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats search results as a table over the configured columns.
pub fn format_rows_table(
    columns: &[Column],
    total: usize,
    rows: &[&Value],
    use_colors: bool,
) -> String {
    if rows.is_empty() {
        return "No matching rows.\n".to_string();
    }

    let mut output = String::new();

    let header = columns
        .iter()
        .map(|column| format!("{:<CELL_WIDTH$}", truncate_str(&column.label, CELL_WIDTH)))
        .collect::<Vec<_>>()
        .join(" ");
    push_header(&mut output, header.trim_end(), use_colors);

    for row in rows {
        let line = columns
            .iter()
            .map(|column| {
                let text = row
                    .cell(&column.field)
                    .map(|cell| cell.as_text().into_owned())
                    .unwrap_or_default();
                format!("{:<CELL_WIDTH$}", truncate_str(&text, CELL_WIDTH))
            })
            .collect::<Vec<_>>()
            .join(" ");
        output.push_str(line.trim_end());
        output.push('\n');
    }

    if total > rows.len() {
        let more = format!("... {} more", total - rows.len());
        if use_colors {
            output.push_str(&format!("{}\n", more.dimmed()));
        } else {
            output.push_str(&more);
            output.push('\n');
        }
    }

    output
}
