//! End-to-end tests that run the `fq` binary.
//!
//! Each test gets its own config path and metadata file, so nothing on the
//! host machine leaks in.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const METADATA: &str = r#"
[[fields]]
name = "Age"
type = "Number"
operators = ["Equal", "GreaterThan", "LessThan", "In"]

[[fields]]
name = "Status"
type = "String"
operators = ["Equal", "NotEqual", "In"]
lookups = [
    { label = "Active", value = "A" },
    { label = "Paused", value = "P" },
]

[[fields]]
name = "Name"
type = "String"
operators = ["Contain", "StartWith", "Blank", "NotBlank"]
"#;

const RECORDS: &str = r#"[
    {"Age": 30, "Status": "A", "Name": "Ann"},
    {"Age": 12, "Status": "P", "Name": "Bob"},
    {"Age": 45, "Status": "A"}
]"#;

struct Env {
    dir: TempDir,
}

impl Env {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("fields.toml"), METADATA).unwrap();
        fs::write(dir.path().join("rows.json"), RECORDS).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fq"));
        cmd.env("FQ_CONFIG", self.path("config.toml"))
            .env_remove("FQ_METADATA")
            .env_remove("RUST_LOG")
            .arg("--no-color");
        cmd
    }

    /// Runs fq with the test metadata file.
    fn run(&self, args: &[&str]) -> Output {
        self.command()
            .arg("--metadata")
            .arg(self.path("fields.toml"))
            .args(args)
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).unwrap()
}

fn json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ==================== check ====================

#[test]
fn test_check_prints_normalized_query() {
    let env = Env::new();
    let output = env.run(&["check", "age > 18 and (status = Active or status = Paused)"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "✓ Age GreaterThan 18 And (Status Equal 'A' Or Status Equal 'P')\n"
    );
}

#[test]
fn test_check_json_query_matches_text() {
    let env = Env::new();
    let text = env.run(&["--json", "check", "Age > 18 and Name contains 'n'"]);
    let json_query = env.run(&[
        "--json",
        "check",
        r#"["and", [["Age", ">", 18], ["Name", "contains", "n"]]]"#,
    ]);

    assert!(text.status.success());
    assert!(json_query.status.success());
    assert_eq!(json(&text)["expression"], json(&json_query)["expression"]);
    assert_eq!(json(&text)["filter"], json(&json_query)["filter"]);
}

#[test]
fn test_check_rejection_points_at_token() {
    let env = Env::new();
    let output = env.run(&["check", "Age = old"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("  Age = old\n        ^\n"), "{err}");
    assert!(err.contains("Error: filter error:"));
}

#[test]
fn test_check_error_as_json() {
    let env = Env::new();
    let output = env.run(&["--json", "check", "Stauts = Active"]);

    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "FILTER_ERROR");
    assert!(error["error"]["message"]
        .as_str()
        .unwrap()
        .contains("did you mean 'Status'?"));
}

// ==================== tokenize ====================

#[test]
fn test_tokenize_table() {
    let env = Env::new();
    let output = env.run(&["tokenize", "Age >= 18"]);

    // Age has no GreaterThanOrEqual operator
    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.starts_with("Pos"));
    assert!(out.contains("Rejected:"));
    assert!(stderr(&output).contains("invalid token(s)"));
}

#[test]
fn test_tokenize_json_output() {
    let env = Env::new();
    let output = env.run(&["--json", "tokenize", "Status in Active, Paused"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let tokens = json(&output);
    assert_eq!(tokens["valid"], true);
    let types: Vec<&str> = tokens["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .filter(|t| *t != "Space")
        .collect();
    assert_eq!(
        types,
        vec!["Field", "In", "Value", "Comma", "Value"]
    );
}

// ==================== filter ====================

#[test]
fn test_filter_records_file() {
    let env = Env::new();
    let rows = env.path("rows.json");
    let output = env.run(&[
        "filter",
        "Status = Active and Name blank",
        "--records",
        rows.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "{\"Age\":45,\"Status\":\"A\"}\n");
    assert!(stderr(&output).contains("1 of 3 records matched"));
}

#[test]
fn test_filter_count_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let env = Env::new();
    let mut child = env
        .command()
        .arg("--metadata")
        .arg(env.path("fields.toml"))
        .args(["filter", "Age > 18", "--count"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(RECORDS.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "2\n");
}

#[test]
fn test_filter_rejects_non_array_records() {
    let env = Env::new();
    let rows = env.path("object.json");
    fs::write(&rows, r#"{"Age": 1}"#).unwrap();
    let output = env.run(&["--json", "filter", "Age > 1", "-r", rows.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let error: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(error["error"]["code"], "RECORDS_ERROR");
}

// ==================== fields & metadata ====================

#[test]
fn test_fields_json() {
    let env = Env::new();
    let output = env.run(&["--json", "fields"]);

    assert!(output.status.success());
    let fields = json(&output);
    assert_eq!(fields["fields"][0]["name"], "Age");
    assert_eq!(fields["fields"][1]["lookups"][0]["label"], "Active");
}

#[test]
fn test_missing_metadata_is_config_error() {
    let env = Env::new();
    let output = env.command().args(["fields"]).output().unwrap();

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("no metadata file"));
}

#[test]
fn test_metadata_from_config() {
    let env = Env::new();
    let set = env
        .command()
        .args(["config", "set", "metadata"])
        .arg(env.path("fields.toml"))
        .output()
        .unwrap();
    assert!(set.status.success(), "{}", stderr(&set));

    let output = env.command().args(["check", "Age < 5"]).output().unwrap();
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "✓ Age LessThan 5\n");
}

#[test]
fn test_broken_metadata_file() {
    let env = Env::new();
    let broken = env.path("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    let output = env
        .command()
        .arg("--metadata")
        .arg(&broken)
        .arg("fields")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(5));
    assert!(stderr(&output).contains("metadata error"));
}

// ==================== config & completions ====================

#[test]
fn test_config_path_without_metadata() {
    let env = Env::new();
    let output = env.command().args(["config", "path"]).output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        Path::new(stdout(&output).trim()),
        env.path("config.toml").as_path()
    );
}

#[test]
fn test_completions() {
    let env = Env::new();
    let output = env.command().args(["completions", "bash"]).output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("fq"));
}
