//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split by whether they need the column schema: schema commands
//! run against a [`FilterParser`] built from the config file and
//! `--columns`, the rest only touch the config file or the CLI itself.

use std::path::Path;

use grid_query_rs::FilterParser;

use crate::cli::{Cli, ColumnTypeArg, Commands, ConfigCommands, Shell};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that run without a column schema.
pub trait NoSchemaCommand {
    /// Execute the command.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that run against the column schema.
pub trait SchemaCommand {
    /// Execute the command with the parser built from the schema.
    fn execute(&self, ctx: &CommandContext, parser: &FilterParser) -> Result<()>;
}

/// Commands that don't need a schema.
pub enum NoSchemaDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Help,
}

impl<'a> NoSchemaDispatch<'a> {
    /// Try to create a no-schema dispatch from the CLI command.
    /// Returns None if the command needs the schema.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl NoSchemaCommand for NoSchemaDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("gq - grid-query filter language CLI");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Init { force }) => {
            let opts = commands::config::ConfigInitOptions { force: *force };
            commands::config::execute_init(ctx, &opts)
        }
    }
}

/// Commands that run against the schema.
pub enum SchemaDispatch<'a> {
    Classify(&'a str),
    Build(&'a str),
    Search {
        input: &'a str,
        rows: &'a Path,
        limit: Option<usize>,
    },
    Columns,
    Operators(Option<ColumnTypeArg>),
}

impl<'a> SchemaDispatch<'a> {
    /// Create a schema dispatch from the CLI command.
    /// Returns None for commands handled by [`NoSchemaDispatch`].
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Classify { input }) => Some(Self::Classify(input)),
            Some(Commands::Build { input }) => Some(Self::Build(input)),
            Some(Commands::Search { input, rows, limit }) => Some(Self::Search {
                input,
                rows,
                limit: *limit,
            }),
            Some(Commands::Columns) => Some(Self::Columns),
            Some(Commands::Operators { column_type }) => Some(Self::Operators(*column_type)),
            _ => None,
        }
    }
}

impl SchemaCommand for SchemaDispatch<'_> {
    fn execute(&self, ctx: &CommandContext, parser: &FilterParser) -> Result<()> {
        match self {
            Self::Classify(input) => {
                let opts = commands::classify::ClassifyOptions {
                    input: input.to_string(),
                };
                commands::classify::execute(ctx, parser, &opts)
            }
            Self::Build(input) => {
                let opts = commands::build::BuildOptions {
                    input: input.to_string(),
                };
                commands::build::execute(ctx, parser, &opts)
            }
            Self::Search { input, rows, limit } => {
                let opts = commands::search::SearchOptions {
                    input: input.to_string(),
                    rows: rows.to_path_buf(),
                    limit: *limit,
                };
                commands::search::execute(ctx, parser, &opts)
            }
            Self::Columns => commands::columns::execute(ctx, parser),
            Self::Operators(column_type) => {
                let opts = commands::operators::OperatorsOptions {
                    column_type: column_type.map(Into::into),
                };
                commands::operators::execute(ctx, parser, &opts)
            }
        }
    }
}
