//! End-to-end tests driving the `mtt` binary against real Markdown files.
//!
//! Covers the full lifecycle: insert → start → stop → continue → export → edit lock.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn mtt_binary() -> String {
    env!("CARGO_BIN_EXE_mtt").to_string()
}

/// Run `mtt` with an isolated home so no user config leaks in.
fn mtt(home: &Path, args: &[&str]) -> Output {
    Command::new(mtt_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("MTT_BLOCK_LANGUAGE")
        .env_remove("MTT_DURATION_FORMAT")
        .args(args)
        .output()
        .expect("failed to run mtt")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{what} should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_full_tracking_flow() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.md");
    std::fs::write(&notes, "# Notes\n\nSome text.\n").unwrap();
    let file = notes.to_str().unwrap();

    let output = mtt(temp.path(), &["insert", file]);
    assert_success(&output, "insert");
    let content = std::fs::read_to_string(&notes).unwrap();
    assert_eq!(content, "# Notes\n\nSome text.\n```my-time-tracker\n```\n");

    let output = mtt(temp.path(), &["start", file]);
    assert_success(&output, "start");
    assert_eq!(stdout(&output), "Started Segment 1\n");

    // A second start while running is rejected and leaves the file alone.
    let before = std::fs::read_to_string(&notes).unwrap();
    let output = mtt(temp.path(), &["start", file]);
    assert!(!output.status.success(), "start while running should fail");
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), before);

    let output = mtt(temp.path(), &["status", file]);
    assert_success(&output, "status");
    let status = stdout(&output);
    assert!(status.starts_with("Running: Segment 1 ("), "got: {status}");
    assert!(status.contains("Edit mode: on"), "got: {status}");
    assert!(status.contains("  1 Segment 1 "), "got: {status}");

    let output = mtt(temp.path(), &["stop", file]);
    assert_success(&output, "stop");
    assert!(stdout(&output).starts_with("Stopped Segment 1 after "));

    let output = mtt(temp.path(), &["continue", file, "1"]);
    assert_success(&output, "continue");
    assert_eq!(stdout(&output), "Started Part 2 under Segment 1\n");

    let output = mtt(temp.path(), &["stop", file]);
    assert_success(&output, "second stop");

    let output = mtt(temp.path(), &["status", file]);
    let status = stdout(&output);
    assert!(status.starts_with("Idle\n"), "got: {status}");
    assert!(status.contains("    1.1 Part 1 "), "got: {status}");
    assert!(status.contains("    1.2 Part 2 "), "got: {status}");

    // Header, separator, container row, two part rows, total row.
    let output = mtt(temp.path(), &["table", file]);
    assert_success(&output, "table");
    let table = stdout(&output);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 6, "got: {table}");
    assert!(lines[0].starts_with("| Segment"));
    assert!(lines[1].starts_with("| -"));
    assert!(lines[2].starts_with("| Segment 1 "));
    assert!(lines[3].starts_with("| Part 1 "));
    assert!(lines[5].starts_with("| **Total**"));

    let output = mtt(temp.path(), &["csv", file]);
    assert_success(&output, "csv");
    let csv = stdout(&output);
    assert!(csv.starts_with("Segment 1,"), "got: {csv}");
    assert_eq!(csv.lines().count(), 3, "got: {csv}");

    let output = mtt(temp.path(), &["json", file]);
    assert_success(&output, "json");
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["entries"][0]["name"], "Segment 1");
    assert_eq!(json["entries"][0]["subEntries"].as_array().unwrap().len(), 2);

    // Surrounding text is untouched by all the rewrites.
    let content = std::fs::read_to_string(&notes).unwrap();
    assert!(content.starts_with("# Notes\n\nSome text.\n```my-time-tracker\n"));
    assert!(content.ends_with("```\n"));
}

#[test]
fn test_edit_mode_locks_structure() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.md");
    let file = notes.to_str().unwrap();

    assert_success(&mtt(temp.path(), &["insert", file]), "insert");
    assert_success(&mtt(temp.path(), &["start", file, "-n", "Write"]), "start");
    assert_success(&mtt(temp.path(), &["stop", file]), "stop");

    let output = mtt(temp.path(), &["edit", file, "off", "--total", "90"]);
    assert_success(&output, "edit off");
    assert_eq!(stdout(&output), "Edit mode off\nTotal set to 90.00m\n");

    let output = mtt(temp.path(), &["remove", file, "1"]);
    assert!(!output.status.success(), "remove should fail with edit off");
    assert!(String::from_utf8_lossy(&output.stderr).contains("editing is disabled"));

    let output = mtt(temp.path(), &["rename", file, "1", "Other"]);
    assert!(!output.status.success(), "rename should fail with edit off");

    assert_success(&mtt(temp.path(), &["edit", file, "on"]), "edit on");
    let output = mtt(temp.path(), &["rename", file, "2", "Adjustment"]);
    assert_success(&output, "rename");
    assert_eq!(stdout(&output), "Renamed 2 to Adjustment\n");

    let output = mtt(temp.path(), &["remove", file, "1"]);
    assert_success(&output, "remove");
    assert_eq!(stdout(&output), "Removed 1 (Write)\n");
}

#[test]
fn test_missing_block_is_an_error() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.md");
    std::fs::write(&notes, "no tracker here\n").unwrap();
    let file = notes.to_str().unwrap();

    let output = mtt(temp.path(), &["status", file]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no tracker in"));

    let output = mtt(temp.path(), &["watch", file, "--ticks", "3"]);
    assert_success(&output, "watch");
    assert_eq!(stdout(&output), "");
}

#[test]
fn test_unreadable_tracker_is_shown_empty_and_never_overwritten() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.md");
    let original = "# Log\n```my-time-tracker\n{\"entries\": [{\"name\": \"A\",\n```\n";
    std::fs::write(&notes, original).unwrap();
    let file = notes.to_str().unwrap();

    let output = mtt(temp.path(), &["status", file]);
    assert_success(&output, "status");
    assert!(stdout(&output).ends_with("No entries.\n"));

    let output = mtt(temp.path(), &["start", file]);
    assert!(!output.status.success(), "start should refuse to overwrite");
    assert!(String::from_utf8_lossy(&output.stderr).contains("refusing to overwrite"));
    assert_eq!(std::fs::read_to_string(&notes).unwrap(), original);
}

#[test]
fn test_watch_prints_requested_ticks() {
    let temp = TempDir::new().unwrap();
    let notes = temp.path().join("notes.md");
    let file = notes.to_str().unwrap();

    assert_success(&mtt(temp.path(), &["insert", file]), "insert");
    let output = mtt(temp.path(), &["watch", file, "--ticks", "1"]);
    assert_success(&output, "watch");
    assert_eq!(stdout(&output), "total 0.00m | idle\n");
}
