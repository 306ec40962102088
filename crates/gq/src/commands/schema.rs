//! Column schema and vocabulary resolution.
//!
//! Columns come from `--columns` (a JSON array) when given, otherwise from
//! the config file. Extra operator tokens always come from the config.

use std::fs;
use std::path::Path;

use grid_query_rs::{Column, FilterParser, Vocabulary};
use tracing::debug;

use super::config::{validate_columns, Config};
use super::{CommandError, Result};

/// Builds the parser the schema commands run against.
pub fn load_parser(config: &Config, columns_override: Option<&Path>) -> Result<FilterParser> {
    let columns = match columns_override {
        Some(path) => read_columns(path)?,
        None => config.columns.clone(),
    };

    let vocabulary = config
        .operators
        .iter()
        .cloned()
        .fold(Vocabulary::default(), Vocabulary::with_operator);

    debug!(
        columns = columns.len(),
        operators = vocabulary.operators().len(),
        "loaded schema"
    );
    Ok(FilterParser::new(columns).with_vocabulary(vocabulary))
}

/// Reads a JSON array of columns.
fn read_columns(path: &Path) -> Result<Vec<Column>> {
    let content = fs::read_to_string(path)?;
    let columns: Vec<Column> = serde_json::from_str(&content).map_err(|e| {
        CommandError::Input(format!("{}: expected an array of columns: {}", path.display(), e))
    })?;
    validate_columns(&columns)?;
    Ok(columns)
}
