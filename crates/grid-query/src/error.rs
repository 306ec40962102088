//! Error types for the filter parser.

use thiserror::Error;

use crate::column::ColumnType;

/// A specialized Result type for filter parsing operations.
pub type FilterResult<T> = Result<T, ParseError>;

/// Errors that can occur while classifying or building a filter expression.
///
/// None of these are fatal: callers are expected to fall back to a plain
/// substring search over the raw input when building fails.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The input does not start with the field marker, so it is plain text.
    #[error("input is not a filter expression")]
    NotAnExpression,

    /// The field token does not name a searchable column.
    #[error("unknown column '{field}'{}", suggestion_suffix(.suggestion))]
    UnknownField {
        /// The field token as typed.
        field: String,
        /// A close column name, if one exists.
        suggestion: Option<String>,
    },

    /// The operator token is unknown, or not valid for the column type.
    #[error("{}", invalid_operator_message(.operator, .column_type))]
    InvalidOperator {
        /// The operator token as typed.
        operator: String,
        /// The type of the resolved column, if the token itself is known.
        column_type: Option<ColumnType>,
    },

    /// The value text cannot be coerced to the column type.
    #[error("invalid value '{value}' for {expected} column '{field}'")]
    InvalidValue {
        /// The column the value belongs to.
        field: String,
        /// The value text as typed.
        value: String,
        /// The type the value had to be coerced to.
        expected: ColumnType,
    },

    /// A join token is present but is not `and` or `or`.
    #[error("invalid join '{token}' (expected 'and' or 'or')")]
    MalformedJoin {
        /// The join token as typed.
        token: String,
    },

    /// The expression stops before a terminal state.
    #[error("incomplete expression: expected {expected}")]
    IncompleteExpression {
        /// What the expression is missing.
        expected: String,
    },

    /// Text appears where the grammar allows none.
    #[error("unexpected '{found}' at position {position}")]
    UnexpectedInput {
        /// The offending text.
        found: String,
        /// Byte offset of the offending text.
        position: usize,
    },
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(". Did you mean '{s}'?"),
        None => String::new(),
    }
}

fn invalid_operator_message(operator: &str, column_type: &Option<ColumnType>) -> String {
    match column_type {
        Some(t) => format!("operator '{operator}' is not valid for {t} columns"),
        None => format!("unknown operator '{operator}'"),
    }
}

impl ParseError {
    /// Creates an unknown field error.
    pub fn unknown_field(field: impl Into<String>, suggestion: Option<String>) -> Self {
        ParseError::UnknownField {
            field: field.into(),
            suggestion,
        }
    }

    /// Creates an invalid operator error.
    pub fn invalid_operator(operator: impl Into<String>, column_type: Option<ColumnType>) -> Self {
        ParseError::InvalidOperator {
            operator: operator.into(),
            column_type,
        }
    }

    /// Creates an invalid value error.
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: ColumnType,
    ) -> Self {
        ParseError::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected,
        }
    }

    /// Creates a malformed join error.
    pub fn malformed_join(token: impl Into<String>) -> Self {
        ParseError::MalformedJoin {
            token: token.into(),
        }
    }

    /// Creates an incomplete expression error.
    pub fn incomplete(expected: impl Into<String>) -> Self {
        ParseError::IncompleteExpression {
            expected: expected.into(),
        }
    }

    /// Creates an unexpected input error.
    pub fn unexpected(found: impl Into<String>, position: usize) -> Self {
        ParseError::UnexpectedInput {
            found: found.into(),
            position,
        }
    }

    /// Returns a stable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::NotAnExpression => "NOT_AN_EXPRESSION",
            ParseError::UnknownField { .. } => "UNKNOWN_FIELD",
            ParseError::InvalidOperator { .. } => "INVALID_OPERATOR",
            ParseError::InvalidValue { .. } => "INVALID_VALUE",
            ParseError::MalformedJoin { .. } => "MALFORMED_JOIN",
            ParseError::IncompleteExpression { .. } => "INCOMPLETE_EXPRESSION",
            ParseError::UnexpectedInput { .. } => "UNEXPECTED_INPUT",
        }
    }
}
