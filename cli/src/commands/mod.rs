//! # nodekit Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level command groups of the nodekit CLI and
//! the `Context` every handler receives.
//!
//! ## Architecture
//!
//! - Top-level modules are command groups (`env`, `pkg`, `convert`, `npmrc`) or
//!   single commands (`exec`).
//! - Each group defines its clap `Args`/`Subcommand` types and a `handle_*`
//!   dispatcher; subcommands live in their own files.
//! - Handlers return the process exit code: `0` on success, `1` when an
//!   operation reports `success == false`, or the child's own code for `exec`.
//!   Filesystem and configuration failures are `Err` and reported by `main`.
//!
//! ## Command Groups
//!
//! - `env`: Inspect the active Node.js / npm installation.
//! - `pkg`: Install, update, uninstall and list global packages.
//! - `convert`: Toggle the npm → pnpm shell integration in the PowerShell profile.
//! - `npmrc`: Show, edit, back up and restore `~/.npmrc`.
//! - `exec`: Run any command with live, classified output.
//!
use crate::common::pkgmgr::{ManagerKind, PackageManager};
use crate::common::process::ProcessRunner;
use std::path::PathBuf;

/// Convert the npm/npx commands of the shell to pnpm. Includes `status`, `enable`, `disable`.
pub mod convert;
/// Inspect the Node.js environment. Includes `info`.
pub mod env;
/// Run an arbitrary command through the process runner.
pub mod exec;
/// Manage `~/.npmrc`. Includes `show`, `path`, `set`, `write`, `backup`, `restore`.
pub mod npmrc;
/// Global package management. Includes `install`, `update`, `update-all`, `uninstall`, `list`.
pub mod pkg;

/// Everything a handler needs, resolved once in `main` from flags and config.
#[derive(Debug)]
pub struct Context {
    pub runner: ProcessRunner,
    pub manager: ManagerKind,
    pub npmrc_path: PathBuf,
    pub profile_path: PathBuf,
}

impl Context {
    /// Strategy of the selected package manager.
    pub fn package_manager(&self) -> &'static dyn PackageManager {
        self.manager.strategy()
    }
}

/// Exit code of a handler that either succeeded or not.
pub(crate) fn exit_code(success: bool) -> i32 {
    if success {
        0
    } else {
        1
    }
}
