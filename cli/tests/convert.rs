//! # nodekit CLI Convert Integration Tests
//!
//! File: cli/tests/convert.rs
//!
//! ## Overview
//!
//! Integration tests for `nodekit convert` (`status`, `enable`, `disable`) against
//! a profile inside a temporary directory. pnpm is either absent from `PATH` or
//! a fake script that prints a version.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::fs;

const START: &str = "# ========== NPM-PNPM-AUTO-CONVERT-START ==========";
const END: &str = "# ========== NPM-PNPM-AUTO-CONVERT-END ==========";

#[cfg(unix)]
fn sandbox_with_pnpm() -> Sandbox {
    let sandbox = Sandbox::new();
    sandbox.fake_tool("pnpm", "echo 8.15.1");
    sandbox
}

#[cfg(unix)]
#[test]
fn test_enable_without_pnpm_leaves_profile_alone() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd_with_fake_path()
        .args(["convert", "enable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pnpm is not installed"));

    assert!(!sandbox.profile().exists());
}

#[cfg(unix)]
#[test]
fn test_enable_then_disable_round_trip() {
    let sandbox = sandbox_with_pnpm();
    fs::create_dir_all(sandbox.profile().parent().unwrap()).unwrap();
    fs::write(sandbox.profile(), "Set-Alias ll Get-ChildItem\n").unwrap();

    sandbox
        .cmd_with_fake_path()
        .args(["convert", "enable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled"))
        .stderr(predicate::str::contains("$ pnpm --version"));

    let enabled = read(&sandbox.profile());
    assert!(enabled.starts_with(&format!("{}Set-Alias ll Get-ChildItem\n", BOM)));
    assert!(enabled.contains(START));
    assert!(enabled.contains(END));
    assert!(enabled.contains("function npx {"));

    sandbox
        .cmd_with_fake_path()
        .args(["convert", "disable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("disabled"));

    assert_eq!(
        read(&sandbox.profile()),
        format!("{}Set-Alias ll Get-ChildItem\n", BOM)
    );
}

#[cfg(unix)]
#[test]
fn test_enable_twice_reports_already_enabled() {
    let sandbox = sandbox_with_pnpm();

    sandbox
        .cmd_with_fake_path()
        .args(["convert", "enable"])
        .assert()
        .success();
    let first = fs::read(sandbox.profile()).unwrap();

    sandbox
        .cmd_with_fake_path()
        .args(["convert", "enable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already enabled"));

    assert_eq!(fs::read(sandbox.profile()).unwrap(), first);
}

#[test]
fn test_disable_missing_profile() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["convert", "disable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    assert!(!sandbox.profile().exists());
}

#[test]
fn test_disable_when_not_enabled() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.profile().parent().unwrap()).unwrap();
    fs::write(sandbox.profile(), "Write-Host hi\n").unwrap();

    sandbox
        .cmd()
        .args(["convert", "disable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not enabled"));
    assert_eq!(read(&sandbox.profile()), "Write-Host hi\n");
}

#[test]
fn test_disable_malformed_block_is_left_unchanged() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.profile().parent().unwrap()).unwrap();
    let original = format!("Write-Host hi\n{}\nfunction npm {{}}\n", START);
    fs::write(sandbox.profile(), &original).unwrap();

    sandbox
        .cmd()
        .args(["convert", "disable"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no end marker"));
    assert_eq!(read(&sandbox.profile()), original);
}

#[cfg(unix)]
#[test]
fn test_status_json() {
    let sandbox = sandbox_with_pnpm();

    let output = sandbox
        .cmd_with_fake_path()
        .args(["convert", "status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["enabled"], false);
    assert_eq!(status["profile_exists"], false);
    assert_eq!(status["pnpm_installed"], true);
    assert_eq!(status["pnpm_version"], "8.15.1");

    sandbox
        .cmd_with_fake_path()
        .args(["convert", "enable"])
        .assert()
        .success();
    sandbox
        .cmd_with_fake_path()
        .args(["convert", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Auto-convert:   enabled"));
}
