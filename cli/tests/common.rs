//! # nodekit CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests. Each `.rs` file in `cli/tests/` is a
//! separate test crate that includes this module.
//!
//! Tests never touch the real `~/.npmrc`, profile or config: `sandbox` points
//! every path nodekit reads at a temporary directory, and `fake_tool` puts
//! small `/bin/sh` scripts on `PATH` in place of node, npm, pnpm and yarn.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// # Get nodekit Command (`nodekit_cmd`)
///
/// An `assert_cmd::Command` for the compiled `nodekit` binary.
pub fn nodekit_cmd() -> Command {
    Command::cargo_bin("nodekit").expect("Failed to find nodekit binary for testing")
}

/// A temporary home for one test: config file, `.npmrc`, profile and a `bin`
/// directory for fake tools.
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create sandbox dir");
        fs::create_dir_all(dir.path().join("bin")).expect("Failed to create bin dir");
        fs::write(dir.path().join("config.toml"), "").expect("Failed to write config");
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.path("bin")
    }

    pub fn npmrc(&self) -> PathBuf {
        self.path(".npmrc")
    }

    pub fn profile(&self) -> PathBuf {
        self.path("profile/Microsoft.PowerShell_profile.ps1")
    }

    /// `nodekit` with its config, `.npmrc` and profile inside the sandbox.
    /// `PATH` is left alone.
    pub fn cmd(&self) -> Command {
        let mut cmd = nodekit_cmd();
        cmd.env("NODEKIT_CONFIG", self.path("config.toml"))
            .env("NODEKIT_NPMRC", self.npmrc())
            .env("NODEKIT_PROFILE", self.profile())
            .env_remove("NODEKIT_MANAGER")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Like `cmd`, but `PATH` only contains the sandbox's fake tools.
    pub fn cmd_with_fake_path(&self) -> Command {
        let mut cmd = self.cmd();
        cmd.env("PATH", self.bin_dir());
        cmd
    }

    /// Writes an executable `/bin/sh` script named `name` into the fake `PATH`.
    #[cfg(unix)]
    pub fn fake_tool(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = self.bin_dir().join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("Failed to write fake tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake tool");
        path
    }
}

/// UTF-8 byte-order mark nodekit writes at the start of the profile.
pub const BOM: &str = "\u{feff}";

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}
