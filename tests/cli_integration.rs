//! Integration tests for the `riskdesk` CLI.
//!
//! Each test creates a temp workspace, runs `riskdesk --offline` as a
//! subprocess against local sheets, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `riskdesk` binary.
fn riskdesk_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("riskdesk");
    path
}

/// Write a config with a custom manual link and the default state dir.
fn create_workspace(root: &Path) {
    fs::write(
        root.join("riskdesk.toml"),
        r#"[backend]
endpoint = ""
sheet = "work_steps"

[ui]
manual_url = "https://example.test/manual.pdf"
"#,
    )
    .unwrap();
}

/// Seed the offline sheet with explicit rows.
fn seed_sheet(root: &Path, json: &str) {
    let dir = root.join(".riskdesk/sheets");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("work_steps.json"), json).unwrap();
}

fn sheet_rows(root: &Path) -> serde_json::Value {
    let text = fs::read_to_string(root.join(".riskdesk/sheets/work_steps.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

/// Run `riskdesk` with the given args in the given directory, returning (stdout, stderr, success).
fn run_rd(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(riskdesk_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run riskdesk");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `riskdesk` expecting success, return stdout.
fn run_rd_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_rd(dir, args);
    if !success {
        panic!(
            "riskdesk {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

const TWO_GROUPS: &str = r#"[
  {"row": 2, "id": "A", "activity": "x", "position": "p"},
  {"row": 3, "id": "B", "activity": "y", "position": "q"}
]"#;

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[test]
fn test_list_offline_starts_with_sample_rows() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());

    let out = run_rd_ok(tmp.path(), &["--offline", "list"]);
    assert!(out.contains("Work step / activity"));
    assert!(out.contains("T001"));
    assert!(out.contains("T005"));
}

#[test]
fn test_list_json_with_group() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(tmp.path(), TWO_GROUPS);

    let out = run_rd_ok(tmp.path(), &["--offline", "--json", "list", "--group", "B"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["filter"], "B");
    let rows = parsed["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["row"], 1);
    assert_eq!(rows[0]["activity"], "y");
}

#[test]
fn test_groups_skip_blank_rows() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(
        tmp.path(),
        r#"[
  {"id": "A", "activity": "x", "position": "p"},
  {"id": "", "activity": "ghost", "position": ""},
  {"id": "B", "activity": "y", "position": "q"},
  {"id": "A", "activity": "z", "position": "r"}
]"#,
    );

    let out = run_rd_ok(tmp.path(), &["--offline", "--json", "groups"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"group": "A", "rows": 2},
            {"group": "B", "rows": 1}
        ])
    );
}

#[test]
fn test_malformed_sheet_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(tmp.path(), r#"{"status": "error"}"#);

    let (_, stderr, success) = run_rd(tmp.path(), &["--offline", "list"]);
    assert!(!success);
    assert!(stderr.contains("could not load work steps"));
}

#[test]
fn test_risk_departments_and_table() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());

    let out = run_rd_ok(tmp.path(), &["risk"]);
    assert_eq!(out, "Production\nAccounting\n");

    let out = run_rd_ok(tmp.path(), &["--json", "risk", "production"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["name"], "Production");
    let entries = parsed["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["score"], 10);
    assert_eq!(entries[1]["band"], "high");

    let (_, stderr, success) = run_rd(tmp.path(), &["risk", "Warehouse"]);
    assert!(!success);
    assert!(stderr.contains("unknown department"));
}

#[test]
fn test_manual_prints_configured_url() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());

    let out = run_rd_ok(tmp.path(), &["manual"]);
    assert_eq!(out.trim(), "https://example.test/manual.pdf");
}

#[test]
fn test_missing_endpoint_suggests_offline() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());

    let (_, stderr, success) = run_rd(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("no backend endpoint configured"));
    assert!(stderr.contains("--offline"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[test]
fn test_add_saves_full_table() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(tmp.path(), TWO_GROUPS);

    let out = run_rd_ok(tmp.path(), &["--offline", "add", "C", "Weld frames", "Welder"]);
    assert!(out.contains("Added: C"));

    let rows = sheet_rows(tmp.path());
    assert_eq!(
        rows,
        serde_json::json!([
            {"id": "A", "activity": "x", "position": "p"},
            {"id": "B", "activity": "y", "position": "q"},
            {"id": "C", "activity": "Weld frames", "position": "Welder"}
        ])
    );
}

#[test]
fn test_add_rejects_blank_group() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());

    let (_, stderr, success) = run_rd(tmp.path(), &["--offline", "add", " ", "x", "y"]);
    assert!(!success);
    assert!(stderr.contains("group cannot be empty"));
}

#[test]
fn test_edit_under_filter_moves_group_to_end() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(tmp.path(), TWO_GROUPS);

    run_rd_ok(
        tmp.path(),
        &["--offline", "edit", "1", "--filter", "A", "--activity", "x2"],
    );

    let rows = sheet_rows(tmp.path());
    assert_eq!(
        rows,
        serde_json::json!([
            {"id": "B", "activity": "y", "position": "q"},
            {"id": "A", "activity": "x2", "position": "p"}
        ])
    );
}

#[test]
fn test_edit_row_out_of_range() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(tmp.path(), TWO_GROUPS);

    let (_, stderr, success) = run_rd(tmp.path(), &["--offline", "edit", "3", "--group", "Z"]);
    assert!(!success);
    assert!(stderr.contains("row 3 not found"));

    let (_, stderr, success) = run_rd(tmp.path(), &["--offline", "edit", "1"]);
    assert!(!success);
    assert!(stderr.contains("nothing to change"));
}

#[test]
fn test_remove_row() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    seed_sheet(tmp.path(), TWO_GROUPS);

    let out = run_rd_ok(tmp.path(), &["--offline", "remove", "2"]);
    assert!(out.contains("Removed: B"));
    let rows = sheet_rows(tmp.path());
    assert_eq!(rows.as_array().unwrap().len(), 1);
    assert_eq!(rows[0]["id"], "A");
}

#[test]
fn test_failed_save_goes_to_recovery_log() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());
    // A file where the sheets directory should be makes every write fail
    fs::create_dir_all(tmp.path().join(".riskdesk")).unwrap();
    fs::write(tmp.path().join(".riskdesk/sheets"), "not a directory").unwrap();

    let (_, stderr, success) = run_rd(tmp.path(), &["--offline", "add", "T009", "Paint", "Painter"]);
    assert!(!success);
    assert!(stderr.contains("save failed"));

    let out = run_rd_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("[save-failed]"));
    assert!(out.contains("Paint"));

    let out = run_rd_ok(tmp.path(), &["--json", "recovery", "--limit", "1"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["category"], "save-failed");
}

#[test]
fn test_recovery_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_workspace(tmp.path());

    let out = run_rd_ok(tmp.path(), &["recovery"]);
    assert_eq!(out.trim(), "No recovery entries");
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------

#[test]
fn test_init_writes_config_once() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_rd_ok(
        tmp.path(),
        &["init", "--endpoint", "https://bridge.test/exec", "--spreadsheet-id", "sheet-1"],
    );
    assert!(out.contains("riskdesk.toml"));
    let text = fs::read_to_string(tmp.path().join("riskdesk.toml")).unwrap();
    assert!(text.contains("endpoint = \"https://bridge.test/exec\""));
    assert!(text.contains("spreadsheet_id = \"sheet-1\""));

    let (_, stderr, success) = run_rd(tmp.path(), &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));

    run_rd_ok(tmp.path(), &["init", "--force"]);
    let text = fs::read_to_string(tmp.path().join("riskdesk.toml")).unwrap();
    assert!(text.contains("endpoint = \"\""));
}

#[test]
fn test_explicit_config_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    let conf_dir = tmp.path().join("conf");
    fs::create_dir_all(&conf_dir).unwrap();
    create_workspace(&conf_dir);

    let out = run_rd_ok(tmp.path(), &["-c", "conf/riskdesk.toml", "manual"]);
    assert_eq!(out.trim(), "https://example.test/manual.pdf");
}
