//! # nodekit CLI Exec Integration Tests
//!
//! File: cli/tests/exec.rs
//!
//! ## Overview
//!
//! End-to-end tests of the process runner and console renderer through
//! `nodekit exec`, using only `/bin/sh` builtins.
//!

#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_stdout_is_passed_through() {
    Sandbox::new()
        .cmd()
        .args(["exec", "echo", "hello"])
        .assert()
        .success()
        .stdout(predicate::eq("hello\n"))
        .stderr(predicate::str::contains("$ echo hello").and(predicate::str::contains("[exit 0]")));
}

#[test]
fn test_exit_code_is_propagated() {
    Sandbox::new()
        .cmd()
        .args(["exec", "exit", "3"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("[exit 3]"));
}

#[test]
fn test_npm_warnings_are_prefixed_as_warnings() {
    Sandbox::new()
        .cmd()
        .args(["exec", "echo 'npm WARN deprecated foo' 1>&2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("warn: npm WARN deprecated foo"));
}

#[test]
fn test_other_stderr_is_prefixed_as_error() {
    Sandbox::new()
        .cmd()
        .args(["exec", "echo boom 1>&2; exit 1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: boom"));
}

#[test]
fn test_benign_notices_are_suppressed() {
    // The notice comes from a script so it is not part of the echoed `$ <command>` line.
    let sandbox = Sandbox::new();
    sandbox.fake_tool(
        "noisy",
        "echo 'npm warn Unknown user config \"x\"' 1>&2\necho done",
    );
    let assert = sandbox
        .cmd_with_fake_path()
        .args(["exec", "noisy"])
        .assert()
        .success()
        .stdout(predicate::eq("done\n"));
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(!stderr.contains("Unknown user config"), "stderr: {}", stderr);
    assert!(
        !stderr
            .lines()
            .any(|line| line.starts_with("warn: ") || line.starts_with("error: ")),
        "stderr: {}",
        stderr
    );
    assert!(stderr.contains("$ noisy"));
    assert!(stderr.contains("[exit 0]"));
}

#[test]
fn test_disk_space_message_precedes_exit() {
    let assert = Sandbox::new()
        .cmd()
        .args(["exec", "echo 'ENOSPC: no space left on device' 1>&2; exit 2"])
        .assert()
        .code(2);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let message = stderr
        .find("error: Error: not enough disk space")
        .expect("disk space message missing");
    let exit = stderr.find("[exit 2]").expect("exit line missing");
    assert!(message < exit);
    assert_eq!(stderr.matches("not enough disk space").count(), 1);
}

#[test]
fn test_missing_program() {
    Sandbox::new()
        .cmd()
        .args(["exec", "nodekit-definitely-missing-program"])
        .assert()
        .code(127);
}
