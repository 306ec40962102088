//! Interaction states reported while the user types.

use serde::Serialize;

use crate::ast::{CompositeFilter, FilterCondition};
use crate::error::ParseError;
use crate::vocabulary::{Join, Operator};

/// A condition whose field and operator are resolved but whose value may
/// still be partial or empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionDraft {
    /// The resolved column field.
    pub field: String,
    /// The resolved operator.
    pub operator: Operator,
    /// The value text typed so far (trimmed, may be empty).
    pub value: String,
    /// The upper bound typed so far, once the range marker is closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

/// Where the user is in building a filter expression.
///
/// The state is recomputed from the raw input on every change; nothing is
/// carried over between keystrokes.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseState {
    /// The input is not a filter expression.
    Idle,
    /// The column selector is open.
    SelectingColumn {
        /// Text typed after `#`.
        search_term: String,
    },
    /// The column is chosen and the operator selector is open.
    SelectingOperator {
        /// The resolved column field.
        field: String,
        /// Text typed after the operator `#`.
        search_term: String,
    },
    /// Field and operator are chosen, the value is being typed.
    AwaitingValue {
        /// The condition so far.
        draft: ConditionDraft,
        /// Whether the condition could be built right now.
        ready: bool,
    },
    /// The first condition is complete and the join selector is open.
    SelectingJoin {
        /// The coerced first condition.
        first: FilterCondition,
        /// Text typed after the join `#`.
        search_term: String,
    },
    /// The join is chosen and the second operator selector is open.
    SelectingSecondOperator {
        /// The coerced first condition.
        first: FilterCondition,
        /// The chosen join.
        join: Join,
        /// The field of the second condition (the first field unless the
        /// user named another column).
        field: String,
        /// Text typed after the second operator `#`.
        search_term: String,
    },
    /// The second operator is chosen, the second value is being typed.
    AwaitingSecondValue {
        /// The coerced first condition.
        first: FilterCondition,
        /// The chosen join.
        join: Join,
        /// The second condition so far.
        second: ConditionDraft,
        /// Whether the filter could be built right now.
        ready: bool,
    },
    /// The expression is confirmed and builds.
    Complete(CompositeFilter),
    /// The expression cannot become valid without deleting text.
    Invalid(ParseError),
}

impl ParseState {
    /// Returns true if confirming now would produce a filter.
    pub fn is_ready(&self) -> bool {
        match self {
            ParseState::Complete(_) => true,
            ParseState::AwaitingValue { ready, .. }
            | ParseState::AwaitingSecondValue { ready, .. } => *ready,
            _ => false,
        }
    }

    /// Returns the search term of the open selector, if one is open.
    pub fn search_term(&self) -> Option<&str> {
        match self {
            ParseState::SelectingColumn { search_term }
            | ParseState::SelectingOperator { search_term, .. }
            | ParseState::SelectingJoin { search_term, .. }
            | ParseState::SelectingSecondOperator { search_term, .. } => Some(search_term.as_str()),
            _ => None,
        }
    }

    /// Returns a stable name for the state.
    pub fn name(&self) -> &'static str {
        match self {
            ParseState::Idle => "idle",
            ParseState::SelectingColumn { .. } => "selectingColumn",
            ParseState::SelectingOperator { .. } => "selectingOperator",
            ParseState::AwaitingValue { .. } => "awaitingValue",
            ParseState::SelectingJoin { .. } => "selectingJoin",
            ParseState::SelectingSecondOperator { .. } => "selectingSecondOperator",
            ParseState::AwaitingSecondValue { .. } => "awaitingSecondValue",
            ParseState::Complete(_) => "complete",
            ParseState::Invalid(_) => "invalid",
        }
    }
}
