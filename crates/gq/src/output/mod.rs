//! Output formatting utilities for the gq CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by what is printed:
//!
//! - [`state`] - Classification output (state, search term, candidates)
//! - [`filter`] - Built filter output
//! - [`rows`] - Search result output
//! - [`columns`] - Column and operator listings
//! - [`helpers`] - Common formatting utilities (truncation, headers)

mod columns;
mod filter;
pub mod helpers;
mod rows;
mod state;

// Classification
pub use state::{format_state_json, format_state_table, Candidate};

// Filters
pub use filter::{format_filter_json, format_filter_table};

// Rows
pub use rows::{format_rows_json, format_rows_table, SearchMode};

// Columns and operators
pub use columns::{
    format_columns_json, format_columns_table, format_operators_json, format_operators_table,
};
