//! Built filter output formatting.

use grid_query_rs::{CompositeFilter, FilterCondition, Vocabulary};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{labeled, push_header, truncate_str};

/// JSON output structure for the build command.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    /// The filter written back in canonical form.
    pub expression: String,
    #[serde(flatten)]
    pub filter: &'a CompositeFilter,
}

/// Formats a built filter as JSON.
pub fn format_filter_json(
    filter: &CompositeFilter,
    vocabulary: &Vocabulary,
) -> Result<String, serde_json::Error> {
    let output = FilterOutput {
        expression: filter.to_expression(vocabulary),
        filter,
    };
    serde_json::to_string_pretty(&output)
}

/// Formats a built filter as a table, one condition per line.
pub fn format_filter_table(
    filter: &CompositeFilter,
    vocabulary: &Vocabulary,
    use_colors: bool,
) -> String {
    let mut output = labeled("Expression", &filter.to_expression(vocabulary), use_colors);
    output.push('\n');

    push_header(
        &mut output,
        &format!(
            "{:<5} {:<20} {:<14} {:<20} {}",
            "Join", "Field", "Operator", "Value", "Upper"
        ),
        use_colors,
    );

    for (i, condition) in filter.conditions().iter().enumerate() {
        let join = match (i, filter.join()) {
            (0, _) | (_, None) => String::new(),
            (_, Some(join)) if use_colors => join.as_str().yellow().to_string(),
            (_, Some(join)) => join.as_str().to_string(),
        };
        output.push_str(&format_condition_row(&join, condition, vocabulary));
    }

    output
}

fn format_condition_row(join: &str, condition: &FilterCondition, vocabulary: &Vocabulary) -> String {
    let upper = condition
        .value2
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    format!(
        "{:<5} {:<20} {:<14} {:<20} {}\n",
        join,
        truncate_str(&condition.field, 20),
        vocabulary.token_for(condition.operator),
        truncate_str(&condition.value.to_string(), 20),
        upper
    )
}
