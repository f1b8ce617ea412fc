//! Binary-level smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn stratus() -> Command {
    let mut cmd = Command::cargo_bin("stratus").unwrap();
    // Credentials from the calling environment must not leak in.
    cmd.env_clear();
    cmd
}

#[test]
fn help_lists_the_top_level_commands() {
    stratus()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("server"))
        .stdout(predicate::str::contains("container"));
}

#[test]
fn the_support_table_needs_no_credentials() {
    stratus()
        .args(["api", "list", "--supported"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compute"))
        .stdout(predicate::str::contains("identity"));
}

#[test]
fn the_support_table_emits_json_when_asked() {
    let output = stratus()
        .args(["--format", "json", "api", "list", "--supported"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(parsed["services"].is_array());
}

#[test]
fn listing_without_credentials_fails_cleanly() {
    stratus()
        .args(["server", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn unknown_service_is_rejected_before_any_request() {
    stratus()
        .args(["--os-token", "tok", "--os-url", "http://example.invalid/v1"])
        .args(["api", "match", "dns"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid argument"));
}
