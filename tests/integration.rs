// Integration tests for the saferoute CLI surface.
//
// These tests use assert_cmd to invoke the binary and verify
// argument handling, exit codes and help output.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to build a Command for the saferoute binary.
fn saferoute() -> Command {
    Command::cargo_bin("saferoute").expect("binary should exist")
}

#[test]
fn cli_version_flag() {
    saferoute()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("saferoute"));
}

#[test]
fn cli_help_flag() {
    saferoute()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Route risk scoring"));
}

#[test]
fn get_requires_route_id() {
    saferoute()
        .arg("get")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn compare_requires_both_endpoints() {
    saferoute()
        .args(["compare", "--source", "X"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--destination"));
}

#[test]
fn upsert_rejects_payload_mixed_with_flags() {
    saferoute()
        .args(["upsert", "--payload", "route.json", "--route-id", "r1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn quiet_conflicts_with_verbose() {
    saferoute()
        .args(["-q", "-v", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
