//! Progressive filter-expression parser for data-grid search bars.
//!
//! Users type a compact mini-language into a single search input:
//!
//! ```text
//! #base_price #greaterThan 50000 #and #lessThan 100000##
//! ```
//!
//! On every keystroke the input is classified into a [`ParseState`] telling
//! the caller which selector to show (column, operator, join) and what the
//! user has typed into it so far. On confirmation the input is built into a
//! [`CompositeFilter`] of one or two conditions, which [`FilterEvaluator`]
//! runs against rows.
//!
//! # Syntax
//!
//! - `#field` names a column; `#field:value` is shorthand for `#contains`
//! - `#operator value` compares the column with a value; `inRange` takes
//!   `value #to value2`
//! - `#and` / `#or` joins a second condition, which may name its own column
//! - a trailing `##` confirms the expression
//!
//! # Example
//!
//! ```
//! use grid_query_rs::{build, classify, Column, FilterEvaluator, ParseState};
//! use serde_json::json;
//!
//! let columns = vec![
//!     Column::text("name", "Name"),
//!     Column::number("base_price", "Base Price"),
//! ];
//!
//! assert!(matches!(
//!     classify("#base_price #greaterThan 50000 #", &columns),
//!     ParseState::SelectingJoin { .. }
//! ));
//!
//! let filter = build("#base_price #greaterThan 50000 #and #lessThan 100000##", &columns).unwrap();
//! let row = json!({"name": "Amoxicillin", "base_price": 75000});
//! assert!(FilterEvaluator::new(&filter).matches(&row));
//! ```

mod ast;
mod builder;
mod classifier;
mod column;
mod error;
mod evaluator;
mod lexer;
mod matcher;
mod parser;
mod resolve;
mod selector;
mod state;
mod vocabulary;

pub use ast::{CompositeFilter, FilterCondition, FilterValue};
pub use column::{Column, ColumnType};
pub use error::{FilterResult, ParseError};
pub use evaluator::{evaluate_condition, Cell, FilterEvaluator, Record, TextSearch};
pub use lexer::{Lexer, Token, TokenKind};
pub use matcher::{ConditionMatch, PatternMatcher, Segment, Shape, ShapeMatch};
pub use parser::{build, classify, FilterParser};
pub use resolve::{coerce_value, find_similar_field};
pub use selector::{column_options, join_options, operator_options};
pub use state::{ConditionDraft, ParseState};
pub use vocabulary::{Join, Markers, Operator, OperatorSpec, Vocabulary};
