//! Build command implementation.
//!
//! Builds a confirmed expression into a filter and prints it.

use grid_query_rs::FilterParser;

use super::{CommandContext, Result};
use crate::output::{format_filter_json, format_filter_table};

/// Options for the build command.
#[derive(Debug)]
pub struct BuildOptions {
    /// The search bar input.
    pub input: String,
}

/// Executes the build command.
///
/// # Errors
///
/// Returns [`CommandError::Parse`](super::CommandError::Parse) if the input
/// does not build.
pub fn execute(ctx: &CommandContext, parser: &FilterParser, opts: &BuildOptions) -> Result<()> {
    let filter = parser.build(&opts.input)?;

    if ctx.json_output {
        let output = format_filter_json(&filter, parser.vocabulary())?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_filter_table(&filter, parser.vocabulary(), ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}
