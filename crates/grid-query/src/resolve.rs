//! Field and operator resolution plus value coercion.
//!
//! Shared by the classifier and the builder so both report the same error
//! for the same text.

use chrono::NaiveDate;
use strsim::levenshtein;

use crate::ast::{FilterCondition, FilterValue};
use crate::column::{Column, ColumnType};
use crate::error::{FilterResult, ParseError};
use crate::vocabulary::{Join, Operator, Vocabulary};

/// Maximum Levenshtein distance for a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Date format accepted for date values.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves typed tokens against the configured columns and vocabulary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolver<'c> {
    columns: &'c [Column],
    vocabulary: &'c Vocabulary,
}

impl<'c> Resolver<'c> {
    pub(crate) fn new(columns: &'c [Column], vocabulary: &'c Vocabulary) -> Self {
        Self {
            columns,
            vocabulary,
        }
    }

    /// Finds the searchable column with exactly this field name.
    pub(crate) fn column(&self, field: &str) -> FilterResult<&'c Column> {
        self.columns
            .iter()
            .find(|c| c.searchable && c.field == field)
            .ok_or_else(|| ParseError::unknown_field(field, find_similar_field(self.columns, field)))
    }

    /// Resolves the field of a condition that may inherit a column.
    ///
    /// A word that names no column but is followed by value text was typed
    /// as an operator for the inherited column, so it is reported as one.
    pub(crate) fn condition_column(
        &self,
        field: &str,
        inherited: Option<&'c Column>,
        value_follows: bool,
    ) -> FilterResult<&'c Column> {
        self.column(field).map_err(|error| match inherited {
            Some(_) if value_follows => ParseError::invalid_operator(field, None),
            _ => error,
        })
    }

    /// Resolves an operator token for the given column.
    pub(crate) fn operator(&self, column: &Column, token: &str) -> FilterResult<Operator> {
        let spec = self
            .vocabulary
            .operator(token)
            .ok_or_else(|| ParseError::invalid_operator(token, None))?;
        if spec.operator.applies_to(column.column_type) {
            Ok(spec.operator)
        } else {
            Err(ParseError::invalid_operator(token, Some(column.column_type)))
        }
    }

    /// Returns the operator implied by the colon shorthand for the column.
    pub(crate) fn shorthand(&self, column: &Column) -> FilterResult<Operator> {
        let operator = self.vocabulary.shorthand_operator();
        if operator.applies_to(column.column_type) {
            Ok(operator)
        } else {
            Err(ParseError::invalid_operator(
                self.vocabulary.token_for(operator),
                Some(column.column_type),
            ))
        }
    }

    /// Resolves a join word.
    pub(crate) fn join(&self, word: &str) -> FilterResult<Join> {
        self.vocabulary
            .join(word)
            .ok_or_else(|| ParseError::malformed_join(word))
    }

    /// Coerces value text to the column type.
    pub(crate) fn value(&self, column: &Column, raw: &str) -> FilterResult<FilterValue> {
        coerce_value(column.column_type, raw)
            .ok_or_else(|| ParseError::invalid_value(&column.field, raw, column.column_type))
    }

    /// Builds a condition from resolved parts, coercing both bounds.
    pub(crate) fn condition(
        &self,
        column: &Column,
        operator: Operator,
        value: &str,
        value2: Option<&str>,
    ) -> FilterResult<FilterCondition> {
        let value = self.value(column, value)?;
        if !operator.is_range() {
            return Ok(FilterCondition::new(&column.field, operator, value));
        }
        let upper = value2.ok_or_else(|| ParseError::incomplete("an upper bound"))?;
        if upper.is_empty() {
            return Err(ParseError::incomplete("an upper bound"));
        }
        let upper = self.value(column, upper)?;
        Ok(FilterCondition::range(&column.field, value, upper))
    }
}

/// Coerces raw value text to a column type.
///
/// Numbers are plain decimals with `.` as separator, dates are ISO
/// `YYYY-MM-DD`, and text is kept verbatim after trimming. Returns `None`
/// when the text does not fit the type.
pub fn coerce_value(column_type: ColumnType, raw: &str) -> Option<FilterValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match column_type {
        ColumnType::Text => Some(FilterValue::Text(raw.to_string())),
        ColumnType::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(FilterValue::Number),
        ColumnType::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .ok()
            .map(FilterValue::Date),
    }
}

/// Finds the searchable column field closest to `field` by edit distance.
///
/// Returns `None` for exact matches and for candidates further than the
/// suggestion threshold.
pub fn find_similar_field(columns: &[Column], field: &str) -> Option<String> {
    let query = field.to_lowercase();

    let (best, distance) = columns
        .iter()
        .filter(|c| c.searchable)
        .map(|c| (c.field.as_str(), levenshtein(&query, &c.field.to_lowercase())))
        .min_by_key(|(_, d)| *d)?;

    if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
        Some(best.to_string())
    } else {
        None
    }
}
