//! Binary-level tests for the offline commands.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn prayer() -> Command {
    let mut cmd = Command::cargo_bin("prayer").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

/// An empty config file so the user's own configuration is never read.
fn empty_config() -> NamedTempFile {
    NamedTempFile::new().unwrap()
}

#[test]
fn test_methods_lists_default() {
    prayer()
        .arg("methods")
        .assert()
        .success()
        .stdout(predicate::str::contains("Egyptian (default)"))
        .stdout(predicate::str::contains("MoonsightingCommittee"));
}

#[test]
fn test_cities_lists_table() {
    prayer()
        .arg("cities")
        .assert()
        .success()
        .stdout(predicate::str::contains("Egypt (EG)"))
        .stdout(predicate::str::contains("Cairo"));
}

#[test]
fn test_times_json_for_fixed_date() {
    let config = empty_config();
    let output = prayer()
        .args(["--config"])
        .arg(config.path())
        .args(["times", "--date", "2024-01-15", "--city", "Cairo", "--country", "EG", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["date"], "2024-01-15");
    assert_eq!(report["location"], "Cairo, Egypt");
    assert_eq!(report["method"], "Egyptian");
    let prayers = report["prayers"].as_array().unwrap();
    let names: Vec<&str> = prayers.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["fajr", "dhuhr", "asr", "maghrib", "isha"]);
}

#[test]
fn test_times_text_has_date_header() {
    let config = empty_config();
    prayer()
        .arg("--config")
        .arg(config.path())
        .args(["times", "--date", "2024-01-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monday, January 15, 2024"))
        .stdout(predicate::str::contains("Maghrib"));
}

#[test]
fn test_next_json_has_countdown() {
    let config = empty_config();
    let output = prayer()
        .arg("--config")
        .arg(config.path())
        .args(["next", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["remaining"]["totalSeconds"].as_i64().unwrap() >= 0);
    assert!(report["prayer"]["displayName"].is_string());
}

#[test]
fn test_missing_config_file_fails() {
    prayer()
        .args(["--config", "/nonexistent/prayer.toml", "next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("エラー"));
}

#[test]
fn test_invalid_date_fails() {
    prayer()
        .args(["times", "--date", "2024-13-01"])
        .assert()
        .failure();
}

#[test]
fn test_completions_generate() {
    prayer()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prayer"));
}
