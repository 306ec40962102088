//! Search command implementation.
//!
//! Filters a JSON array of rows with the search bar input. Input that does
//! not build into a filter is searched as plain text instead.

use std::fs;
use std::path::{Path, PathBuf};

use grid_query_rs::{CompositeFilter, FilterEvaluator, FilterParser, ParseError, TextSearch};
use serde_json::Value;
use tracing::{debug, warn};

use super::{CommandContext, CommandError, Result};
use crate::output::{format_rows_json, format_rows_table, SearchMode};

/// Options for the search command.
#[derive(Debug)]
pub struct SearchOptions {
    /// The search bar input.
    pub input: String,
    /// JSON file holding an array of row objects.
    pub rows: PathBuf,
    /// Limit results.
    pub limit: Option<usize>,
}

/// Rows matched by one search.
#[derive(Debug)]
pub struct SearchResult<'r> {
    /// Whether the rows came from the filter or the text fallback.
    pub mode: SearchMode,
    /// The filter, when the input built into one.
    pub filter: Option<CompositeFilter>,
    /// The matching rows, in input order.
    pub rows: Vec<&'r Value>,
}

/// Executes the search command.
pub fn execute(ctx: &CommandContext, parser: &FilterParser, opts: &SearchOptions) -> Result<()> {
    let rows = read_rows(&opts.rows)?;
    let result = search(parser, &opts.input, &rows);

    let total = result.rows.len();
    let shown = match opts.limit {
        Some(limit) => &result.rows[..total.min(limit)],
        None => &result.rows[..],
    };

    if ctx.json_output {
        let expression = result
            .filter
            .as_ref()
            .map(|filter| filter.to_expression(parser.vocabulary()));
        let output = format_rows_json(result.mode, expression.as_deref(), total, shown)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_rows_table(parser.columns(), total, shown, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Runs the input against the rows, falling back to a substring search
/// when it is not a valid filter expression.
pub fn search<'r>(parser: &FilterParser, input: &str, rows: &'r [Value]) -> SearchResult<'r> {
    match parser.build(input) {
        Ok(filter) => {
            let matched = FilterEvaluator::new(&filter).filter_rows(rows);
            debug!(filter = %filter, matched = matched.len(), "filtered rows");
            SearchResult {
                mode: SearchMode::Filter,
                filter: Some(filter),
                rows: matched,
            }
        }
        Err(error) => {
            if error != ParseError::NotAnExpression {
                warn!(kind = error.kind(), "{error}; searching as plain text");
            }
            let matched = TextSearch::new(input, parser.columns()).filter_rows(rows);
            debug!(matched = matched.len(), "text search");
            SearchResult {
                mode: SearchMode::Text,
                filter: None,
                rows: matched,
            }
        }
    }
}

/// Reads a JSON array of row objects.
fn read_rows(path: &Path) -> Result<Vec<Value>> {
    let content = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;

    let Value::Array(rows) = value else {
        return Err(CommandError::Input(format!(
            "{}: expected a JSON array of row objects",
            path.display()
        )));
    };
    if let Some(i) = rows.iter().position(|row| !row.is_object()) {
        return Err(CommandError::Input(format!(
            "{}: row {} is not an object",
            path.display(),
            i + 1
        )));
    }
    Ok(rows)
}
