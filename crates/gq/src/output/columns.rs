//! Column and operator listing output formatting.

use grid_query_rs::{Column, ColumnType, OperatorSpec};
use owo_colors::OwoColorize;
use serde::Serialize;

use super::helpers::{push_header, truncate_str};

/// JSON output structure for the columns command.
#[derive(Serialize)]
pub struct ColumnsListOutput<'a> {
    pub columns: &'a [Column],
}

/// Formats columns as JSON.
pub fn format_columns_json(columns: &[Column]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ColumnsListOutput { columns })
}

/// Formats columns as a table. Non-searchable columns are dimmed.
pub fn format_columns_table(columns: &[Column], use_colors: bool) -> String {
    if columns.is_empty() {
        return "No columns configured.\n".to_string();
    }

    let mut output = String::new();
    push_header(
        &mut output,
        &format!("{:<20} {:<8} {:<10} {}", "Field", "Type", "Search", "Label"),
        use_colors,
    );

    for column in columns {
        let line = format!(
            "{:<20} {:<8} {:<10} {}",
            truncate_str(&column.field, 20),
            column.column_type.as_str(),
            if column.searchable { "yes" } else { "no" },
            column.label
        );
        if use_colors && !column.searchable {
            output.push_str(&format!("{}\n", line.dimmed()));
        } else {
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}

/// JSON output structure for a single operator token.
#[derive(Serialize)]
pub struct OperatorOutput<'a> {
    pub token: &'a str,
    pub label: &'a str,
    pub operator: &'static str,
    pub types: Vec<&'static str>,
}

/// JSON output structure for the operators command.
#[derive(Serialize)]
pub struct OperatorsListOutput<'a> {
    pub operators: Vec<OperatorOutput<'a>>,
}

fn operator_output(spec: &OperatorSpec) -> OperatorOutput<'_> {
    OperatorOutput {
        token: &spec.token,
        label: &spec.label,
        operator: spec.operator.token(),
        types: [ColumnType::Text, ColumnType::Number, ColumnType::Date]
            .into_iter()
            .filter(|t| spec.operator.applies_to(*t))
            .map(|t| t.as_str())
            .collect(),
    }
}

/// Formats operator tokens as JSON.
pub fn format_operators_json(operators: &[&OperatorSpec]) -> Result<String, serde_json::Error> {
    let output = OperatorsListOutput {
        operators: operators.iter().map(|spec| operator_output(spec)).collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats operator tokens as a table.
pub fn format_operators_table(operators: &[&OperatorSpec], use_colors: bool) -> String {
    if operators.is_empty() {
        return "No operators found.\n".to_string();
    }

    let mut output = String::new();
    push_header(
        &mut output,
        &format!("{:<16} {:<16} {:<20} {}", "Token", "Operator", "Types", "Label"),
        use_colors,
    );

    for spec in operators {
        let entry = operator_output(spec);
        let token = if use_colors && spec.token != spec.operator.token() {
            format!("{:<16}", entry.token).cyan().to_string()
        } else {
            format!("{:<16}", entry.token)
        };
        output.push_str(&format!(
            "{} {:<16} {:<20} {}\n",
            token,
            entry.operator,
            entry.types.join(","),
            entry.label
        ));
    }

    output
}
