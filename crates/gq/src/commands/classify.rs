//! Classify command implementation.
//!
//! Reports the interaction state for a partial expression together with
//! the options the open selector would list.

use grid_query_rs::{
    column_options, join_options, operator_options, FilterParser, ParseState,
};
use tracing::debug;

use super::{CommandContext, Result};
use crate::output::{format_state_json, format_state_table, Candidate};

/// Options for the classify command.
#[derive(Debug)]
pub struct ClassifyOptions {
    /// The search bar input.
    pub input: String,
}

/// Executes the classify command.
pub fn execute(ctx: &CommandContext, parser: &FilterParser, opts: &ClassifyOptions) -> Result<()> {
    let state = parser.classify(&opts.input);
    let candidates = candidates(parser, &state);
    debug!(
        state = state.name(),
        candidates = candidates.len(),
        "classified input"
    );

    if ctx.json_output {
        let output = format_state_json(&opts.input, &state, &candidates, parser.vocabulary())?;
        println!("{output}");
    } else if !ctx.quiet {
        let output =
            format_state_table(&state, &candidates, parser.vocabulary(), ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Lists the selector options matching the state's search term.
///
/// After a join the user may either pick an operator for the inherited
/// column or name another column, so both kinds are offered there.
pub fn candidates<'p>(parser: &'p FilterParser, state: &ParseState) -> Vec<Candidate<'p>> {
    let vocabulary = parser.vocabulary();
    let columns = parser.columns();

    let column_candidates = |term: &str| -> Vec<Candidate<'p>> {
        column_options(columns, term)
            .into_iter()
            .map(|column| Candidate {
                kind: "column",
                token: &column.field,
                label: &column.label,
            })
            .collect()
    };
    let operator_candidates = |field: &str, term: &str| -> Vec<Candidate<'p>> {
        let Some(column) = columns.iter().find(|c| c.field == field) else {
            return Vec::new();
        };
        operator_options(vocabulary, column.column_type, term)
            .into_iter()
            .map(|spec| Candidate {
                kind: "operator",
                token: &spec.token,
                label: &spec.label,
            })
            .collect()
    };

    match state {
        ParseState::SelectingColumn { search_term } => column_candidates(search_term),
        ParseState::SelectingOperator { field, search_term } => {
            operator_candidates(field, search_term)
        }
        ParseState::SelectingJoin { search_term, .. } => join_options(vocabulary, search_term)
            .into_iter()
            .map(|join| Candidate {
                kind: "join",
                token: vocabulary.join_word(join),
                label: join.as_str(),
            })
            .collect(),
        ParseState::SelectingSecondOperator {
            field, search_term, ..
        } => {
            let mut candidates = operator_candidates(field, search_term);
            candidates.extend(column_candidates(search_term));
            candidates
        }
        _ => Vec::new(),
    }
}
