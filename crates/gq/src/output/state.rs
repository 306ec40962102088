//! Classification output formatting.

use grid_query_rs::{
    CompositeFilter, ConditionDraft, FilterCondition, Join, ParseError, ParseState, Vocabulary,
};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{labeled, push_header, yes_no};

/// A selector entry offered for the current search term.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// What the entry selects: `column`, `operator` or `join`.
    pub kind: &'static str,
    pub token: &'a str,
    pub label: &'a str,
}

/// JSON output structure for a parse error.
#[derive(Serialize)]
pub struct ErrorOutput {
    pub code: &'static str,
    pub message: String,
}

impl From<&ParseError> for ErrorOutput {
    fn from(error: &ParseError) -> Self {
        Self {
            code: error.kind(),
            message: error.to_string(),
        }
    }
}

/// JSON output structure for the classify command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOutput<'a> {
    pub input: &'a str,
    pub state: &'static str,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<&'a FilterCondition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<Join>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<&'a ConditionDraft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'a CompositeFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOutput>,
    #[serde(skip_serializing_if = "no_candidates")]
    pub candidates: &'a [Candidate<'a>],
}

fn no_candidates(candidates: &&[Candidate<'_>]) -> bool {
    candidates.is_empty()
}

impl<'a> StateOutput<'a> {
    fn new(
        input: &'a str,
        state: &'a ParseState,
        candidates: &'a [Candidate<'a>],
        vocabulary: &Vocabulary,
    ) -> Self {
        let mut output = Self {
            input,
            state: state.name(),
            ready: state.is_ready(),
            search_term: state.search_term(),
            field: None,
            first: None,
            join: None,
            draft: None,
            filter: None,
            expression: None,
            error: None,
            candidates,
        };
        match state {
            ParseState::Idle | ParseState::SelectingColumn { .. } => {}
            ParseState::SelectingOperator { field, .. } => output.field = Some(field.as_str()),
            ParseState::AwaitingValue { draft, .. } => output.draft = Some(draft),
            ParseState::SelectingJoin { first, .. } => output.first = Some(first),
            ParseState::SelectingSecondOperator {
                first, join, field, ..
            } => {
                output.first = Some(first);
                output.join = Some(*join);
                output.field = Some(field.as_str());
            }
            ParseState::AwaitingSecondValue {
                first, join, second, ..
            } => {
                output.first = Some(first);
                output.join = Some(*join);
                output.draft = Some(second);
            }
            ParseState::Complete(filter) => {
                output.filter = Some(filter);
                output.expression = Some(filter.to_expression(vocabulary));
            }
            ParseState::Invalid(error) => output.error = Some(error.into()),
        }
        output
    }
}

/// Formats a classification as JSON.
pub fn format_state_json(
    input: &str,
    state: &ParseState,
    candidates: &[Candidate<'_>],
    vocabulary: &Vocabulary,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&StateOutput::new(input, state, candidates, vocabulary))
}

/// Formats a classification for humans.
pub fn format_state_table(
    state: &ParseState,
    candidates: &[Candidate<'_>],
    vocabulary: &Vocabulary,
    use_colors: bool,
) -> String {
    let mut output = String::new();

    let name = if use_colors {
        state.name().cyan().to_string()
    } else {
        state.name().to_string()
    };
    output.push_str(&labeled("State", &name, use_colors));

    match state {
        ParseState::Idle => {
            output.push_str("Input is plain text; rows are searched by substring.\n");
        }
        ParseState::SelectingOperator { field, .. } => {
            output.push_str(&labeled("Field", field, use_colors));
        }
        ParseState::AwaitingValue { draft, ready } => {
            output.push_str(&labeled("Condition", &format_draft(draft), use_colors));
            output.push_str(&labeled("Ready", &yes_no(*ready, use_colors), use_colors));
        }
        ParseState::SelectingJoin { first, .. } => {
            output.push_str(&labeled("First", &format_condition(first), use_colors));
        }
        ParseState::SelectingSecondOperator {
            first, join, field, ..
        } => {
            output.push_str(&labeled("First", &format_condition(first), use_colors));
            output.push_str(&labeled("Join", join.as_str(), use_colors));
            output.push_str(&labeled("Field", field, use_colors));
        }
        ParseState::AwaitingSecondValue {
            first,
            join,
            second,
            ready,
        } => {
            output.push_str(&labeled("First", &format_condition(first), use_colors));
            output.push_str(&labeled("Join", join.as_str(), use_colors));
            output.push_str(&labeled("Second", &format_draft(second), use_colors));
            output.push_str(&labeled("Ready", &yes_no(*ready, use_colors), use_colors));
        }
        ParseState::Complete(filter) => {
            output.push_str(&labeled(
                "Filter",
                &filter.to_expression(vocabulary),
                use_colors,
            ));
        }
        ParseState::Invalid(error) => {
            let message = if use_colors {
                error.to_string().red().to_string()
            } else {
                error.to_string()
            };
            output.push_str(&labeled("Error", &message, use_colors));
        }
        ParseState::SelectingColumn { .. } => {}
    }

    if let Some(term) = state.search_term() {
        output.push_str(&labeled("Search", &format!("{term:?}"), use_colors));
        output.push('\n');
        if candidates.is_empty() {
            output.push_str("No matching options.\n");
        } else {
            push_header(
                &mut output,
                &format!("{:<10} {:<20} {}", "Kind", "Token", "Label"),
                use_colors,
            );
            for candidate in candidates {
                output.push_str(&format!(
                    "{:<10} {:<20} {}\n",
                    candidate.kind, candidate.token, candidate.label
                ));
            }
        }
    }

    output
}

fn format_condition(condition: &FilterCondition) -> String {
    match &condition.value2 {
        Some(upper) => format!(
            "{} {} {} .. {}",
            condition.field, condition.operator, condition.value, upper
        ),
        None => format!("{} {} {}", condition.field, condition.operator, condition.value),
    }
}

fn format_draft(draft: &ConditionDraft) -> String {
    match &draft.value2 {
        Some(upper) => format!(
            "{} {} {:?} .. {:?}",
            draft.field, draft.operator, draft.value, upper
        ),
        None => format!("{} {} {:?}", draft.field, draft.operator, draft.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_query_rs::{FilterValue, Operator};

    fn price_gt() -> FilterCondition {
        FilterCondition::new("base_price", Operator::GreaterThan, FilterValue::Number(50000.0))
    }

    #[test]
    fn test_json_selecting_operator() {
        let state = ParseState::SelectingOperator {
            field: "base_price".into(),
            search_term: "g".into(),
        };
        let candidates = [Candidate {
            kind: "operator",
            token: "greaterThan",
            label: "Greater Than",
        }];
        let json = format_state_json("#base_price #g", &state, &candidates, &Vocabulary::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["state"], "selectingOperator");
        assert_eq!(value["searchTerm"], "g");
        assert_eq!(value["field"], "base_price");
        assert_eq!(value["ready"], false);
        assert_eq!(value["candidates"][0]["token"], "greaterThan");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_json_complete_has_expression() {
        let state = ParseState::Complete(CompositeFilter::single(price_gt()));
        let json = format_state_json("x", &state, &[], &Vocabulary::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["state"], "complete");
        assert_eq!(value["ready"], true);
        assert_eq!(value["expression"], "#base_price #greaterThan 50000##");
        assert_eq!(value["filter"]["conditions"][0]["operator"], "greaterThan");
        assert!(value.get("candidates").is_none());
    }

    #[test]
    fn test_json_invalid_has_error_code() {
        let state = ParseState::Invalid(ParseError::malformed_join("nand"));
        let json = format_state_json("x", &state, &[], &Vocabulary::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["error"]["code"], ParseError::malformed_join("nand").kind());
        assert!(value["error"]["message"].as_str().unwrap().contains("nand"));
    }

    #[test]
    fn test_table_selecting_join() {
        let state = ParseState::SelectingJoin {
            first: price_gt(),
            search_term: "o".into(),
        };
        let candidates = [Candidate {
            kind: "join",
            token: "or",
            label: "or",
        }];
        let table = format_state_table(&state, &candidates, &Vocabulary::default(), false);

        assert!(table.contains("selectingJoin"));
        assert!(table.contains("base_price greaterThan 50000"));
        assert!(table.contains("Search:      \"o\""));
        assert!(table.contains("join       or"));
    }

    #[test]
    fn test_table_awaiting_value_shows_ready() {
        let state = ParseState::AwaitingValue {
            draft: ConditionDraft {
                field: "stock".into(),
                operator: Operator::LessThan,
                value: "5".into(),
                value2: None,
            },
            ready: true,
        };
        let table = format_state_table(&state, &[], &Vocabulary::default(), false);
        assert!(table.contains("stock lessThan \"5\""));
        assert!(table.contains("Ready:       yes"));
    }

    #[test]
    fn test_table_without_matches() {
        let state = ParseState::SelectingColumn {
            search_term: "zzz".into(),
        };
        let table = format_state_table(&state, &[], &Vocabulary::default(), false);
        assert!(table.contains("No matching options."));
    }
}
