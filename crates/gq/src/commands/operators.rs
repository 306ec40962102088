//! Operators command implementation.
//!
//! Lists the operator tokens the parser accepts, including aliases
//! registered in the config file.

use grid_query_rs::{ColumnType, FilterParser, OperatorSpec, Vocabulary};

use super::{CommandContext, Result};
use crate::output::{format_operators_json, format_operators_table};

/// Options for the operators command.
#[derive(Debug, Default)]
pub struct OperatorsOptions {
    /// Only list operators valid for this column type.
    pub column_type: Option<ColumnType>,
}

/// Executes the operators command.
pub fn execute(ctx: &CommandContext, parser: &FilterParser, opts: &OperatorsOptions) -> Result<()> {
    let operators = select_operators(parser.vocabulary(), opts);

    if ctx.json_output {
        let output = format_operators_json(&operators)?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_operators_table(&operators, ctx.use_colors));
    }

    Ok(())
}

fn select_operators<'v>(vocabulary: &'v Vocabulary, opts: &OperatorsOptions) -> Vec<&'v OperatorSpec> {
    match opts.column_type {
        Some(column_type) => vocabulary.operators_for(column_type).collect(),
        None => vocabulary.operators().iter().collect(),
    }
}
