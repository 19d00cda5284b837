//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn screenctl() -> Command {
    Command::cargo_bin("screenctl").unwrap()
}

// === Top level ===

#[test]
fn test_help_lists_subcommands() {
    screenctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("layout"));
}

#[test]
fn test_unknown_subcommand_fails() {
    screenctl().arg("frobnicate").assert().failure();
}

// === Serve ===

#[test]
fn test_serve_help() {
    screenctl()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--access-mode"));
}

#[test]
fn test_serve_rejects_unknown_access_mode() {
    screenctl()
        .args(["serve", "--access-mode", "anonymous"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("anonymous"));
}

// === Config ===

#[test]
fn test_config_path() {
    screenctl()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();

    screenctl()
        .args(["config", "init", "--config", path])
        .assert()
        .success();

    screenctl()
        .args(["config", "init", "--config", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    screenctl()
        .args(["config", "init", "--force", "--config", path])
        .assert()
        .success();
}

#[test]
fn test_config_show_reads_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[access]\nguest_token = \"kiosk\"\n").unwrap();

    screenctl()
        .args(["config", "show", "--config", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("guest_token = \"kiosk\""));
}

// === Layout ===

#[test]
fn test_layout_inspect_summary() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "button_1", "type": "button", "x": 10, "y": 10, "width": 100, "height": 30},
            {"id": "button_2", "type": "button", "x": 10, "y": 50, "width": 100, "height": 30},
            {"id": "label_3", "type": "label", "x": 200, "y": 0, "width": 50, "height": 20}
        ]"#,
    )
    .unwrap();

    screenctl()
        .args(["layout", "inspect", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Components: 3"))
        .stdout(predicate::str::contains("Extent: 250x80"));
}

#[test]
fn test_layout_inspect_json_output() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("screen.json");
    std::fs::write(
        &path,
        r#"{"id": 1, "name": "Main", "layoutJson": "[{\"id\":\"x\",\"type\":\"image\"}]"}"#,
    )
    .unwrap();

    screenctl()
        .args(["layout", "inspect", "--json", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"image\": 1"));
}

#[test]
fn test_layout_inspect_missing_file() {
    screenctl()
        .args(["layout", "inspect", "/nonexistent/layout.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
