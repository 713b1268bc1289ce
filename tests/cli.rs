#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cli(state: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("permanence-cli").unwrap();
    cmd.arg("--state").arg(state);
    cmd
}

#[test]
fn generate_without_staff_fails() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("snapshot.json");
    cli(&state)
        .args(["set-month", "--month", "2025-10"])
        .assert()
        .success();
    cli(&state)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no staff registered"));
}

#[test]
fn generate_and_export_pattern() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("snapshot.json");
    cli(&state).args(["set-month", "--month", "2025-10"]).assert().success();
    cli(&state)
        .args(["add-staff", "--name", "Alice", "--weekday", "6", "--holiday", "2"])
        .assert()
        .success();
    cli(&state)
        .args(["add-staff", "--name", "Bob", "--weekday", "6", "--holiday", "2"])
        .assert()
        .success();
    cli(&state)
        .args(["unavailable", "--name", "Bob", "--dates", "2025-10-01,2025-10-02"])
        .assert()
        .success();
    cli(&state).args(["add-holiday", "--date", "2025-10-13"]).assert().success();

    let csv_path = dir.path().join("pattern.csv");
    let tsv_path = dir.path().join("pattern.tsv");
    cli(&state)
        .args(["generate", "--seed", "42", "--pattern", "2", "--out-csv"])
        .arg(&csv_path)
        .arg("--out-tsv")
        .arg(&tsv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("pattern-1").and(predicate::str::contains("seed: 42")));

    let csv = fs::read(&csv_path).unwrap();
    assert!(csv.starts_with(b"\xEF\xBB\xBF"));
    let tsv = fs::read_to_string(&tsv_path).unwrap();
    assert_eq!(tsv.lines().count(), 31);
    assert!(tsv.starts_with("2025/10/01(Wed)\tAlice\t"));
}

#[test]
fn unknown_pattern_is_rejected() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("snapshot.json");
    cli(&state).args(["add-staff", "--name", "Alice"]).assert().success();
    cli(&state)
        .args(["generate", "--patterns", "2", "--pattern", "3", "--out-csv"])
        .arg(dir.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no pattern 3"));
}

#[test]
fn zero_patterns_without_export_succeeds() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("snapshot.json");
    cli(&state).args(["add-staff", "--name", "Alice"]).assert().success();
    cli(&state)
        .args(["generate", "--patterns", "0"])
        .assert()
        .success();
}

#[test]
fn preferred_and_unavailable_dates_stay_exclusive() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("snapshot.json");
    cli(&state).args(["add-staff", "--name", "Alice"]).assert().success();
    cli(&state)
        .args(["unavailable", "--name", "Alice", "--dates", "2025-10-03"])
        .assert()
        .success();
    cli(&state)
        .args(["prefer", "--name", "Alice", "--dates", "2025-10-03"])
        .assert()
        .success();

    let snap: serde_json::Value = serde_json::from_slice(&fs::read(&state).unwrap()).unwrap();
    let alice = &snap["staff"][0];
    assert_eq!(alice["preferences"], serde_json::json!(["2025-10-03"]));
    assert!(alice.get("unavailability").is_none());

    cli(&state)
        .args(["unavailable", "--name", "Alice", "--dates", "2025-10-03"])
        .assert()
        .success();
    let snap: serde_json::Value = serde_json::from_slice(&fs::read(&state).unwrap()).unwrap();
    let alice = &snap["staff"][0];
    assert_eq!(alice["unavailability"], serde_json::json!(["2025-10-03"]));
    assert!(alice.get("preferences").is_none());
}

#[test]
fn duplicate_staff_is_rejected() {
    let dir = tempdir().unwrap();
    let state = dir.path().join("snapshot.json");
    cli(&state).args(["add-staff", "--name", "Alice"]).assert().success();
    cli(&state)
        .args(["add-staff", "--name", "Alice"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}
