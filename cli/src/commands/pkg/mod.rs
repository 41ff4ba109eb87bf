//! # nodekit Package Command Group
//!
//! File: cli/src/commands/pkg/mod.rs
//!
//! ## Overview
//!
//! This module serves as the entry point and router for `nodekit pkg`, which
//! manages globally installed packages with npm, pnpm or yarn. The manager comes
//! from `--manager` (or `NODEKIT_MANAGER`), then `defaults.package_manager` in
//! the config file, then npm.
//!
//! ## Architecture
//!
//! - `PkgArgs` / `PkgCommand`: clap definitions.
//! - `handle_pkg`: dispatches to the subcommand handlers.
//! - `ops`: the operations themselves (`run_operation`, `update_all`, `list_global`,
//!   `check_global`).
//!
//! ## Examples
//!
//! ```bash
//! nodekit pkg install typescript
//! nodekit --manager pnpm pkg update typescript
//! nodekit pkg update-all typescript eslint prettier
//! nodekit pkg uninstall typescript
//! nodekit pkg list --json
//! nodekit pkg check typescript
//! ```
//!
use super::Context;
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `nodekit pkg check`.
mod check;
/// Implements `nodekit pkg install`.
mod install;
/// Implements `nodekit pkg list`.
mod list;
/// Package operations shared by the handlers.
pub mod ops;
/// Implements `nodekit pkg uninstall`.
mod uninstall;
/// Implements `nodekit pkg update` and `nodekit pkg update-all`.
mod update;

/// # Package Command Group Arguments (`PkgArgs`)
#[derive(Parser, Debug)]
pub struct PkgArgs {
    #[command(subcommand)]
    pub command: PkgCommand,
}

/// # Package Subcommands (`PkgCommand`)
#[derive(Subcommand, Debug)]
pub enum PkgCommand {
    /// Install a package globally.
    #[command(alias = "i")]
    Install(install::InstallArgs),
    /// Update a globally installed package.
    #[command(alias = "up")]
    Update(update::UpdateArgs),
    /// Update several globally installed packages.
    UpdateAll(update::UpdateAllArgs),
    /// Remove a globally installed package.
    #[command(alias = "rm")]
    Uninstall(uninstall::UninstallArgs),
    /// List globally installed packages.
    #[command(alias = "ls")]
    List(list::ListArgs),
    /// Check whether a package is installed globally.
    Check(check::CheckArgs),
}

impl PkgArgs {
    /// Whether command output should be rendered live. `list` and `check` print
    /// their own results.
    pub fn renders_live_output(&self) -> bool {
        !matches!(self.command, PkgCommand::List(_) | PkgCommand::Check(_))
    }
}

/// # Handle Package Command (`handle_pkg`)
pub async fn handle_pkg(args: PkgArgs, ctx: &Context) -> Result<i32> {
    match args.command {
        PkgCommand::Install(args) => install::handle_install(args, ctx).await,
        PkgCommand::Update(args) => update::handle_update(args, ctx).await,
        PkgCommand::UpdateAll(args) => update::handle_update_all(args, ctx).await,
        PkgCommand::Uninstall(args) => uninstall::handle_uninstall(args, ctx).await,
        PkgCommand::List(args) => list::handle_list(args, ctx).await,
        PkgCommand::Check(args) => check::handle_check(args, ctx).await,
    }
}

/// Prints the one-line summary of an operation: to stdout on success, to stderr
/// (with the failure reason) otherwise.
fn report(outcome: &ops::PackageOutcome, operation: ops::Operation) {
    match &outcome.error {
        None => println!("{} {}.", operation.done(), outcome.name),
        Some(error) => eprintln!("Error: {}: {}", outcome.name, error),
    }
}
