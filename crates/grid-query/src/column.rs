//! Column descriptors supplied by the data grid.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The declared type of a grid column.
///
/// The type decides which operators are offered for the column and how
/// the value text of a condition is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text (names, categories, suppliers).
    Text,
    /// Decimal numbers (prices, stock counts).
    Number,
    /// Calendar dates (expiry dates), written as `YYYY-MM-DD`.
    Date,
}

impl ColumnType {
    /// Returns the lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Text => "text",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ColumnType::Text),
            "number" => Ok(ColumnType::Number),
            "date" => Ok(ColumnType::Date),
            other => Err(format!(
                "unknown column type '{other}' (expected text, number or date)"
            )),
        }
    }
}

/// A column of the data grid that the search bar can filter on.
///
/// Columns are read-only configuration for the parser. Only columns with
/// `searchable` set are offered in the column selector and accepted as
/// field tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Identifier typed after `#` in the search bar (e.g. `base_price`).
    pub field: String,

    /// Human readable label shown by the column selector.
    pub label: String,

    /// Declared value type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether the column can be used in filter expressions.
    #[serde(default = "default_searchable")]
    pub searchable: bool,
}

fn default_searchable() -> bool {
    true
}

impl Column {
    /// Creates a searchable column.
    pub fn new(field: impl Into<String>, label: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            column_type,
            searchable: true,
        }
    }

    /// Creates a searchable text column.
    pub fn text(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(field, label, ColumnType::Text)
    }

    /// Creates a searchable number column.
    pub fn number(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(field, label, ColumnType::Number)
    }

    /// Creates a searchable date column.
    pub fn date(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(field, label, ColumnType::Date)
    }

    /// Marks the column as not searchable.
    pub fn hidden(mut self) -> Self {
        self.searchable = false;
        self
    }
}
