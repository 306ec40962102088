//! Candidate lists for the selector the caller shows.
//!
//! Filtering is a case-insensitive substring match of the search term
//! against a candidate's label or token, in configuration order.

use crate::column::{Column, ColumnType};
use crate::vocabulary::{Join, OperatorSpec, Vocabulary};

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Returns the searchable columns whose field or label contains `term`.
pub fn column_options<'c>(columns: &'c [Column], term: &str) -> Vec<&'c Column> {
    columns
        .iter()
        .filter(|c| c.searchable)
        .filter(|c| contains_ignore_case(&c.label, term) || contains_ignore_case(&c.field, term))
        .collect()
}

/// Returns the operators valid for `column_type` whose token or label
/// contains `term`.
pub fn operator_options<'v>(
    vocabulary: &'v Vocabulary,
    column_type: ColumnType,
    term: &str,
) -> Vec<&'v OperatorSpec> {
    vocabulary
        .operators_for(column_type)
        .filter(|spec| contains_ignore_case(&spec.label, term) || contains_ignore_case(&spec.token, term))
        .collect()
}

/// Returns the joins whose word contains `term`.
pub fn join_options(vocabulary: &Vocabulary, term: &str) -> Vec<Join> {
    [Join::And, Join::Or]
        .into_iter()
        .filter(|join| contains_ignore_case(vocabulary.join_word(*join), term))
        .collect()
}
