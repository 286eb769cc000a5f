//! Tests for error handling, exit codes, and suggestions.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

fn aiaforge(home: &Path) -> Command {
    let mut cmd = cargo::cargo_bin_cmd!("aiaforge");
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn test_error_empty_app_name() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["new", "   "])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("App name is required"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn test_error_unknown_archetype() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["new", "X", "--archetype", "spaceship"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("spaceship"));
}

#[test]
fn test_error_quiet_conflicts_with_verbose() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["-q", "-v", "list"])
        .assert()
        .code(2);
}

#[test]
fn test_error_inspect_missing_file() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["inspect", "nope.aia"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_error_inspect_not_an_archive() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bogus.aia"), b"definitely not a zip").unwrap();

    aiaforge(temp.path())
        .args(["inspect", "bogus.aia"])
        .assert()
        .code(2);
}

#[test]
fn test_error_missing_explicit_config_file() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["--config", "missing.toml", "list"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_error_bad_config_archetype() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join(".aiaforge.toml"),
        "[defaults]\narchetype = \"spaceship\"\n",
    )
    .unwrap();

    aiaforge(temp.path())
        .args(["new", "X"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("defaults.archetype"));
}

#[test]
fn test_error_config_unknown_key() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["config", "get", "ai.colour"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_error_config_set_rejects_bad_value() {
    let temp = TempDir::new().unwrap();
    aiaforge(temp.path())
        .args(["config", "set", "ai.timeout_secs", "0"])
        .assert()
        .failure();
    assert!(!temp.path().join(".aiaforge.toml").exists());
}

#[test]
fn test_error_write_failure_is_internal() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("Blocked.aia")).unwrap();

    aiaforge(temp.path())
        .args(["-v", "new", "Blocked", "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to write archive"));
}
