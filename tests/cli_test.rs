//! End-to-end tests for the `sircli` binary
//!
//! Every test points the config store at a temporary file so the user's real
//! settings are never touched.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{tempdir, TempDir};

fn sircli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sircli").unwrap();
    cmd.current_dir(dir.path())
        .env("SIRCLI_CONFIG", dir.path().join("config.json"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_set_get_list_masks_secrets() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["config", "set", "apiKeys.openai", "sk-1234567890abcdef"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-1****cdef"))
        .stdout(predicate::str::contains("sk-1234567890abcdef").not());

    sircli(&dir)
        .args(["config", "get", "apiKeys.openai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiKeys.openai = sk-1****cdef"));

    sircli(&dir)
        .args(["config", "set", "username", "alice"])
        .assert()
        .success();

    sircli(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apiKeys.openai = sk-1****cdef"))
        .stdout(predicate::str::contains("username = alice"));

    let saved = std::fs::read_to_string(dir.path().join("config.json")).unwrap();
    assert!(saved.contains("sk-1234567890abcdef"));
}

#[test]
fn test_config_delete() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["config", "set", "defaultProvider", "groq"])
        .assert()
        .success();
    sircli(&dir)
        .args(["config", "delete", "defaultProvider"])
        .assert()
        .success();
    sircli(&dir)
        .args(["config", "get", "defaultProvider"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Key not found"));
}

#[test]
fn test_config_empty_list_prints_hint() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No configuration set"));
}

#[test]
fn test_config_usage_errors_exit_one() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["config", "set", "apiKeys.openai"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));

    sircli(&dir)
        .args(["config", "frobnicate"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Available actions"));
}

#[test]
fn test_chat_without_api_key() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["chat", "hello"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No API key found for provider: openai"))
        .stderr(predicate::str::contains(
            "Run: sircli config set apiKeys.openai YOUR_API_KEY",
        ))
        .stdout(predicate::str::contains("YOUR_API_KEY").not());
}

#[test]
fn test_chat_unknown_provider() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["chat", "hello", "--provider", "not-a-real-provider"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not-a-real-provider"))
        .stderr(predicate::str::contains("Available providers"));
}

#[test]
fn test_file_create_read_list() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["file", "create", "notes/todo.txt", "buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File created"));

    sircli(&dir)
        .args(["file", "append", "notes/todo.txt", "\nwalk dog"])
        .assert()
        .success();

    sircli(&dir)
        .args(["file", "read", "notes/todo.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("buy milk\nwalk dog"));

    sircli(&dir)
        .args(["file", "ls", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("todo.txt"));
}

#[test]
fn test_file_unknown_operation() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["file", "shred", "x.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown operation: shred"))
        .stdout(predicate::str::contains(
            "Available operations: create, read, write, append, delete, mkdir, list",
        ));
}

#[test]
fn test_file_read_missing_exits_one() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["file", "read", "missing.txt"])
        .assert()
        .code(1);
}

#[cfg(unix)]
#[test]
fn test_execute_success() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["execute", "echo hello", "--shell", "sh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello"))
        .stdout(predicate::str::contains("Command completed successfully"));
}

#[cfg(unix)]
#[test]
fn test_execute_propagates_exit_code() {
    let dir = tempdir().unwrap();

    sircli(&dir)
        .args(["execute", "echo partial; exit 3", "--shell", "sh"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("partial"))
        .stderr(predicate::str::contains("Command failed with exit code 3"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let dir = tempdir().unwrap();

    sircli(&dir).assert().failure();
}
