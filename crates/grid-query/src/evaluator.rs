//! Filter evaluation against data-grid rows.
//!
//! Rows are anything implementing [`Record`]: JSON objects straight from an
//! API response, or plain string maps. Each condition compiles to a
//! predicate over one cell and the join combines the one or two results.
//!
//! # Example
//!
//! ```
//! use grid_query_rs::{build, Column, FilterEvaluator};
//! use serde_json::json;
//!
//! let columns = vec![Column::number("stock", "Stock")];
//! let filter = build("#stock #lessThan 10##", &columns).unwrap();
//!
//! let rows = vec![json!({"stock": 4}), json!({"stock": 25})];
//! let evaluator = FilterEvaluator::new(&filter);
//! assert_eq!(evaluator.filter_rows(&rows).len(), 1);
//! ```

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::ast::{CompositeFilter, FilterCondition, FilterValue};
use crate::column::Column;
use crate::resolve::DATE_FORMAT;
use crate::vocabulary::{Join, Operator};

/// A single cell read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    /// A text cell.
    Text(Cow<'a, str>),
    /// A numeric cell.
    Number(f64),
    /// A boolean cell.
    Bool(bool),
}

impl Cell<'_> {
    /// Returns the text form of the cell.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Text(s) => Cow::Borrowed(&**s),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
        }
    }

    /// Reads the cell as a number. Text cells are parsed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
            Cell::Bool(_) => None,
        }
    }

    /// Reads the cell as a calendar date.
    ///
    /// Accepts `YYYY-MM-DD` and timestamps starting with one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// A row the evaluator can read cells from.
pub trait Record {
    /// Returns the cell for a column field, or `None` when the row has no
    /// value for it.
    fn cell(&self, field: &str) -> Option<Cell<'_>>;
}

fn json_cell(value: &Value) -> Option<Cell<'_>> {
    match value {
        Value::String(s) => Some(Cell::Text(Cow::Borrowed(s.as_str()))),
        Value::Number(n) => n.as_f64().map(Cell::Number),
        Value::Bool(b) => Some(Cell::Bool(*b)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl Record for Map<String, Value> {
    fn cell(&self, field: &str) -> Option<Cell<'_>> {
        self.get(field).and_then(json_cell)
    }
}

impl Record for Value {
    fn cell(&self, field: &str) -> Option<Cell<'_>> {
        self.as_object().and_then(|row| row.cell(field))
    }
}

impl Record for HashMap<String, String> {
    fn cell(&self, field: &str) -> Option<Cell<'_>> {
        self.get(field).map(|s| Cell::Text(Cow::Borrowed(s.as_str())))
    }
}

impl Record for BTreeMap<String, String> {
    fn cell(&self, field: &str) -> Option<Cell<'_>> {
        self.get(field).map(|s| Cell::Text(Cow::Borrowed(s.as_str())))
    }
}

/// Evaluates a [`CompositeFilter`] against rows.
pub struct FilterEvaluator<'a> {
    filter: &'a CompositeFilter,
}

impl<'a> FilterEvaluator<'a> {
    /// Creates a new filter evaluator.
    pub fn new(filter: &'a CompositeFilter) -> Self {
        Self { filter }
    }

    /// Returns true if the row matches the filter.
    pub fn matches<R: Record + ?Sized>(&self, row: &R) -> bool {
        let mut results = self
            .filter
            .conditions()
            .iter()
            .map(|condition| evaluate_condition(condition, row));
        match self.filter.join() {
            Some(Join::Or) => results.any(|matched| matched),
            Some(Join::And) | None => results.all(|matched| matched),
        }
    }

    /// Filters a slice of rows, returning only those that match.
    pub fn filter_rows<'b, R: Record>(&self, rows: &'b [R]) -> Vec<&'b R> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

/// Evaluates one condition against a row. A missing cell never matches.
pub fn evaluate_condition<R: Record + ?Sized>(condition: &FilterCondition, row: &R) -> bool {
    let Some(cell) = row.cell(&condition.field) else {
        return false;
    };

    match condition.operator {
        Operator::Contains => {
            let needle = condition.value.to_string().to_lowercase();
            cell.as_text().to_lowercase().contains(&needle)
        }
        Operator::Equals => compare(&cell, &condition.value) == Some(Ordering::Equal),
        Operator::GreaterThan => compare(&cell, &condition.value) == Some(Ordering::Greater),
        Operator::LessThan => compare(&cell, &condition.value) == Some(Ordering::Less),
        Operator::InRange => {
            let Some(upper) = &condition.value2 else {
                return false;
            };
            let above_low = matches!(
                compare(&cell, &condition.value),
                Some(Ordering::Greater | Ordering::Equal)
            );
            let below_high = matches!(
                compare(&cell, upper),
                Some(Ordering::Less | Ordering::Equal)
            );
            above_low && below_high
        }
    }
}

/// Orders a cell against a value of the column's type.
///
/// Returns `None` when the cell cannot be read as that type.
fn compare(cell: &Cell<'_>, value: &FilterValue) -> Option<Ordering> {
    match value {
        FilterValue::Number(n) => cell.as_number()?.partial_cmp(n),
        FilterValue::Date(d) => Some(cell.as_date()?.cmp(d)),
        FilterValue::Text(s) => Some(cell.as_text().to_lowercase().cmp(&s.to_lowercase())),
    }
}

/// Plain substring search across the searchable columns.
///
/// This is the fallback when the input is not a valid filter expression.
pub struct TextSearch<'a> {
    needle: String,
    columns: &'a [Column],
}

impl<'a> TextSearch<'a> {
    /// Creates a search for `term` (trimmed, case-insensitive).
    pub fn new(term: &str, columns: &'a [Column]) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
            columns,
        }
    }

    /// Returns true if any searchable cell contains the search term.
    pub fn matches<R: Record + ?Sized>(&self, row: &R) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        self.columns
            .iter()
            .filter(|column| column.searchable)
            .filter_map(|column| row.cell(&column.field))
            .any(|cell| cell.as_text().to_lowercase().contains(&self.needle))
    }

    /// Filters a slice of rows, returning only those that match.
    pub fn filter_rows<'b, R: Record>(&self, rows: &'b [R]) -> Vec<&'b R> {
        rows.iter().filter(|row| self.matches(*row)).collect()
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
