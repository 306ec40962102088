//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the gq CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// gq - Drive the grid-query filter language from the command line
#[derive(Parser, Debug)]
#[command(name = "gq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// JSON file with the column schema (default: from config)
    #[arg(long, global = true, env = "GQ_COLUMNS")]
    pub columns: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the interaction state for a partial expression
    #[command(alias = "c")]
    Classify {
        /// Search bar input (e.g., "#base_price #g")
        input: String,
    },

    /// Build a confirmed expression into a filter
    #[command(alias = "b")]
    Build {
        /// Search bar input (e.g., "#stock #lessThan 10##")
        input: String,
    },

    /// Filter rows with an expression or plain text
    #[command(alias = "s")]
    Search {
        /// Search bar input
        input: String,

        /// JSON file holding an array of row objects
        #[arg(short, long)]
        rows: PathBuf,

        /// Limit results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List the configured columns
    Columns,

    /// List operator tokens
    Operators {
        /// Only show operators valid for this column type
        #[arg(short = 't', long = "type", value_enum)]
        column_type: Option<ColumnTypeArg>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Column types accepted by `operators --type`
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnTypeArg {
    Text,
    Number,
    Date,
}

impl From<ColumnTypeArg> for grid_query_rs::ColumnType {
    fn from(arg: ColumnTypeArg) -> Self {
        match arg {
            ColumnTypeArg::Text => Self::Text,
            ColumnTypeArg::Number => Self::Number,
            ColumnTypeArg::Date => Self::Date,
        }
    }
}

/// Supported shells for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
