//! Command implementations for the gq CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod build;
pub mod classify;
pub mod columns;
pub mod completions;
pub mod config;
pub mod operators;
pub mod schema;
pub mod search;

use grid_query_rs::ParseError;

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter expression error.
    #[error("filter error: {0}")]
    Parse(#[from] ParseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed rows or column file.
    #[error("invalid input: {0}")]
    Input(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }

    /// Applies output preferences from the config file.
    ///
    /// `--no-color` always wins over `[output] color = true`.
    pub fn with_config(mut self, config: &Config) -> Self {
        if config.output.color == Some(false) {
            self.use_colors = false;
        }
        self
    }
}
