//! Binary-driven tests for the `gq` CLI.
//!
//! Every run gets its own config path inside a temp directory, so the
//! user's real config never leaks in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("gq").join("config.toml")
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_gq"))
            .args(args)
            .env("GQ_CONFIG", self.config_path())
            .env_remove("GQ_COLUMNS")
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "gq {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn inventory(&self) -> PathBuf {
        let rows = json!([
            {"name": "Amoxicillin 500mg", "category": "Antibiotic", "supplier": "Kimia Farma", "base_price": 42000, "sell_price": 50000, "stock": 3, "expiry_date": "2025-03-01"},
            {"name": "Paracetamol", "category": "Analgesic", "supplier": "Sanbe", "base_price": 8000, "sell_price": 10000, "stock": 120, "expiry_date": "2026-01-15"},
            {"name": "Vitamin C", "category": "Supplement", "supplier": "Kalbe", "base_price": 65000, "sell_price": 80000, "stock": 40, "expiry_date": "2025-11-30"}
        ]);
        self.write("rows.json", &rows.to_string())
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn names(value: &Value) -> Vec<&str> {
    value["rows"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect()
}

// ============================================================================
// classify
// ============================================================================

#[test]
fn classify_reports_state_and_candidates() {
    let sandbox = Sandbox::new();

    let value = sandbox.run_json(&["classify", "#base_price #g"]);
    assert_eq!(value["state"], "selectingOperator");
    assert_eq!(value["field"], "base_price");
    assert_eq!(value["searchTerm"], "g");
    assert_eq!(value["candidates"][0]["token"], "greaterThan");

    let value = sandbox.run_json(&["classify", "paracetamol"]);
    assert_eq!(value["state"], "idle");
}

#[test]
fn classify_never_fails_on_invalid_input() {
    let sandbox = Sandbox::new();

    let value = sandbox.run_json(&["classify", "#stock #lessThan 5 #nand "]);
    assert_eq!(value["state"], "invalid");
    assert_eq!(value["error"]["code"], "MALFORMED_JOIN");
}

#[test]
fn classify_table_output() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--no-color", "classify", "#stock #lessThan 5 #"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("selectingJoin"));
    assert!(stdout.contains("and"));
    assert!(stdout.contains("or"));
}

// ============================================================================
// build
// ============================================================================

#[test]
fn build_prints_filter_and_expression() {
    let sandbox = Sandbox::new();

    let value = sandbox.run_json(&[
        "build",
        "#base_price #greaterThan 50000 #and #lessThan 100000##",
    ]);
    assert_eq!(
        value["expression"],
        "#base_price #greaterThan 50000 #and #lessThan 100000##"
    );
    assert_eq!(value["join"], "and");
    assert_eq!(value["conditions"][0]["operator"], "greaterThan");
}

#[test]
fn build_failure_exits_with_error_code() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--json", "build", "#base_prise #greaterThan 1##"]);

    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "UNKNOWN_FIELD");
    assert!(error["error"]["message"]
        .as_str()
        .unwrap()
        .contains("base_price"));
}

// ============================================================================
// search
// ============================================================================

#[test]
fn search_with_filter_expression() {
    let sandbox = Sandbox::new();
    let rows = sandbox.inventory();

    let value = sandbox.run_json(&[
        "search",
        "#stock #lessThan 50##",
        "--rows",
        path_str(&rows),
    ]);
    assert_eq!(value["mode"], "filter");
    assert_eq!(value["expression"], "#stock #lessThan 50##");
    assert_eq!(names(&value), vec!["Amoxicillin 500mg", "Vitamin C"]);
}

#[test]
fn search_limit_keeps_total() {
    let sandbox = Sandbox::new();
    let rows = sandbox.inventory();

    let value = sandbox.run_json(&["search", "", "--rows", path_str(&rows), "--limit", "1"]);
    assert_eq!(value["mode"], "text");
    assert_eq!(value["total"], 3);
    assert_eq!(names(&value).len(), 1);
}

#[test]
fn search_falls_back_to_text_with_warning() {
    let sandbox = Sandbox::new();
    let rows = sandbox.inventory();

    let output = sandbox.run(&[
        "--json",
        "search",
        "#stock #lessThan abc##",
        "--rows",
        path_str(&rows),
    ]);
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "text");
    assert_eq!(value["total"], 0);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WARN"));
    assert!(stderr.contains("plain text"));
}

#[test]
fn search_rejects_malformed_rows() {
    let sandbox = Sandbox::new();
    let rows = sandbox.write("rows.json", r#"{"name": "not an array"}"#);

    let output = sandbox.run(&["search", "x", "--rows", path_str(&rows)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("expected a JSON array"));
}

// ============================================================================
// schema
// ============================================================================

#[test]
fn columns_lists_default_schema() {
    let sandbox = Sandbox::new();

    let value = sandbox.run_json(&["columns"]);
    let columns = value["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 8);
    assert_eq!(columns[7]["field"], "batch_no");
    assert_eq!(columns[7]["searchable"], false);
}

#[test]
fn columns_flag_overrides_config() {
    let sandbox = Sandbox::new();
    let columns = sandbox.write(
        "columns.json",
        r#"[{"field": "title", "label": "Title", "type": "text"}]"#,
    );

    let value = sandbox.run_json(&["--columns", path_str(&columns), "columns"]);
    assert_eq!(value["columns"].as_array().unwrap().len(), 1);

    let output = sandbox.run(&["--columns", path_str(&columns), "build", "#stock #equals 1##"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn config_operator_aliases_are_accepted() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.config_path().parent().unwrap()).unwrap();
    fs::write(
        sandbox.config_path(),
        r#"
[[operators]]
token = "gt"
label = "Greater Than"
operator = "greaterThan"
"#,
    )
    .unwrap();

    let value = sandbox.run_json(&["build", "#stock #gt 10##"]);
    assert_eq!(value["conditions"][0]["operator"], "greaterThan");

    let value = sandbox.run_json(&["operators", "--type", "number"]);
    let tokens: Vec<&str> = value["operators"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|op| op["token"].as_str())
        .collect();
    assert!(tokens.contains(&"gt"));
    assert!(!tokens.contains(&"contains"));
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_init_path_and_show() {
    let sandbox = Sandbox::new();

    let value = sandbox.run_json(&["config", "path"]);
    assert_eq!(value["exists"], false);

    let value = sandbox.run_json(&["config", "init"]);
    assert_eq!(value["status"], "success");
    assert!(sandbox.config_path().exists());

    let output = sandbox.run(&["config", "init"]);
    assert_eq!(output.status.code(), Some(5));

    let value = sandbox.run_json(&["config", "show"]);
    assert_eq!(value["exists"], true);
    assert_eq!(value["config"]["version"], 1);
    assert_eq!(value["config"]["columns"].as_array().unwrap().len(), 8);
}

#[test]
fn broken_config_is_a_config_error() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.config_path().parent().unwrap()).unwrap();
    fs::write(sandbox.config_path(), "[[columns]]\nfield = 3\n").unwrap();

    let output = sandbox.run(&["--json", "columns"]);
    assert_eq!(output.status.code(), Some(5));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn completions_are_generated() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["completions", "bash"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gq"));
}
