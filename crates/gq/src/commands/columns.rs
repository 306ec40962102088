//! Columns command implementation.

use grid_query_rs::FilterParser;

use super::{CommandContext, Result};
use crate::output::{format_columns_json, format_columns_table};

/// Executes the columns command, listing every configured column.
pub fn execute(ctx: &CommandContext, parser: &FilterParser) -> Result<()> {
    if ctx.json_output {
        let output = format_columns_json(parser.columns())?;
        println!("{output}");
    } else if !ctx.quiet {
        print!("{}", format_columns_table(parser.columns(), ctx.use_colors));
    }

    Ok(())
}
