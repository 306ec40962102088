//! Config command implementation.
//!
//! View and initialize configuration settings.
//! Config file is located at ~/.config/gq/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use grid_query_rs::{Column, OperatorSpec};
use owo_colors::OwoColorize;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "GQ_CONFIG";

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# gq - grid-query CLI Configuration

# Config schema version (do not modify)
version = 1

# Output preferences
[output]
# color = true              # Enable colors

# Grid columns the search bar can filter on.
# type is one of "text", "number", "date".
[[columns]]
field = "name"
label = "Name"
type = "text"

[[columns]]
field = "category"
label = "Category"
type = "text"

[[columns]]
field = "supplier"
label = "Supplier"
type = "text"

[[columns]]
field = "base_price"
label = "Base Price"
type = "number"

[[columns]]
field = "sell_price"
label = "Sell Price"
type = "number"

[[columns]]
field = "stock"
label = "Stock"
type = "number"

[[columns]]
field = "expiry_date"
label = "Expiry Date"
type = "date"

[[columns]]
field = "batch_no"
label = "Batch No"
type = "text"
searchable = false

# Extra operator tokens, on top of the built-in ones.
# [[operators]]
# token = "gt"
# label = "Greater Than"
# operator = "greaterThan"
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Grid columns. Defaults to the pharmacy inventory schema.
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,

    /// Extra operator tokens.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operators: Vec<OperatorSpec>,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

/// The pharmacy inventory columns used when no schema is configured.
pub fn default_columns() -> Vec<Column> {
    vec![
        Column::text("name", "Name"),
        Column::text("category", "Category"),
        Column::text("supplier", "Supplier"),
        Column::number("base_price", "Base Price"),
        Column::number("sell_price", "Sell Price"),
        Column::number("stock", "Stock"),
        Column::date("expiry_date", "Expiry Date"),
        Column::text("batch_no", "Batch No").hidden(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            output: OutputConfig::default(),
            columns: default_columns(),
            operators: Vec::new(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/gq/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        let path = PathBuf::from(path);
        if let Some(parent) = path.parent() {
            return Ok(parent.to_path_buf());
        }
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("gq"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("gq"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the built-in defaults.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config = parse_config(&content)?;
    debug!(path = %path.display(), columns = config.columns.len(), "loaded config");
    Ok(config)
}

/// Parses and validates config file contents.
fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    validate_columns(&config.columns)?;
    migrate_config(config)
}

/// Rejects empty schemas and duplicate field names.
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    if columns.is_empty() {
        return Err(CommandError::Config("No columns configured".to_string()));
    }
    for (i, column) in columns.iter().enumerate() {
        if column.field.is_empty() {
            return Err(CommandError::Config(format!(
                "Column {} has an empty field name",
                i + 1
            )));
        }
        if columns[..i].iter().any(|c| c.field == column.field) {
            return Err(CommandError::Config(format!(
                "Duplicate column field '{}'",
                column.field
            )));
        }
    }
    Ok(())
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema.
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let config = load_config()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if ctx.quiet {
        return Ok(());
    }

    let header = format!("Config: {}", path.display());
    if ctx.use_colors {
        println!("{}", header.bold());
    } else {
        println!("{header}");
    }
    if !path.exists() {
        println!("(file not found, using defaults)");
    }
    println!();

    let content = toml::to_string_pretty(&config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;
    print!("{content}");

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Options for the config init command.
#[derive(Debug, Default)]
pub struct ConfigInitOptions {
    /// Overwrite an existing file.
    pub force: bool,
}

/// Executes the config init command, writing the default config file.
pub fn execute_init(ctx: &CommandContext, opts: &ConfigInitOptions) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !opts.force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_query_rs::{ColumnType, Operator};
    use serial_test::serial;
    use tempfile::TempDir;

    fn quiet_ctx() -> CommandContext {
        CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.output.color.is_none());
        assert_eq!(config.columns.len(), 8);
        assert!(config.operators.is_empty());
    }

    #[test]
    fn test_default_config_text_matches_defaults() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.columns, default_columns());
        assert!(config.operators.is_empty());
        assert!(config.output.color.is_none());
    }

    #[test]
    fn test_config_deserialization_empty() {
        let config = parse_config("").unwrap();
        // Missing version defaults to current version
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.columns, default_columns());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1

[output]
color = false

[[columns]]
field = "title"
label = "Title"
type = "text"

[[columns]]
field = "due"
label = "Due"
type = "date"
searchable = false

[[operators]]
token = "gt"
label = "Greater Than"
operator = "greaterThan"
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.columns.len(), 2);
        assert_eq!(config.columns[1].column_type, ColumnType::Date);
        assert!(!config.columns[1].searchable);
        assert_eq!(config.operators[0].token, "gt");
        assert_eq!(config.operators[0].operator, Operator::GreaterThan);
    }

    #[test]
    fn test_config_rejects_duplicate_columns() {
        let toml_str = r#"
[[columns]]
field = "name"
label = "Name"
type = "text"

[[columns]]
field = "name"
label = "Other"
type = "number"
"#;
        let err = parse_config(toml_str).unwrap_err();
        assert!(err.to_string().contains("Duplicate column field 'name'"));
    }

    #[test]
    fn test_config_rejects_unknown_type() {
        let toml_str = r#"
[[columns]]
field = "price"
label = "Price"
type = "money"
"#;
        assert!(matches!(
            parse_config(toml_str),
            Err(CommandError::Config(_))
        ));
    }

    #[test]
    fn test_config_deserialization_with_future_version() {
        let config = parse_config("version = 99").unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
    }

    #[test]
    fn test_config_serialization() {
        let toml_str = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("[[columns]]"));
        assert!(toml_str.contains("field = \"expiry_date\""));
        assert!(!toml_str.contains("[[operators]]"));
    }

    #[test]
    #[serial]
    fn test_config_path_env_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        env::set_var(CONFIG_ENV, &path);

        assert_eq!(get_config_path().unwrap(), path);
        assert_eq!(get_config_dir().unwrap(), dir.path());

        env::remove_var(CONFIG_ENV);
    }

    #[test]
    #[serial]
    fn test_load_missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        env::set_var(CONFIG_ENV, dir.path().join("missing.toml"));

        let config = load_config().unwrap();
        assert_eq!(config.columns, default_columns());

        env::remove_var(CONFIG_ENV);
    }

    #[test]
    #[serial]
    fn test_init_writes_and_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        env::set_var(CONFIG_ENV, &path);

        execute_init(&quiet_ctx(), &ConfigInitOptions::default()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        let err = execute_init(&quiet_ctx(), &ConfigInitOptions::default()).unwrap_err();
        assert!(err.to_string().contains("--force"));

        execute_init(&quiet_ctx(), &ConfigInitOptions { force: true }).unwrap();
        assert_eq!(load_config().unwrap().columns, default_columns());

        env::remove_var(CONFIG_ENV);
    }
}
