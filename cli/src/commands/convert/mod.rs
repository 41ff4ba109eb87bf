//! # nodekit Convert Command Group
//!
//! File: cli/src/commands/convert/mod.rs
//!
//! ## Overview
//!
//! This module serves as the entry point and router for `nodekit convert`, which
//! toggles the npm → pnpm shell integration: a block of PowerShell functions in
//! the user's profile that routes `npm` to `pnpm` and `npx` to `pnpm dlx`.
//!
//! ## Architecture
//!
//! - `ConvertArgs` / `ConvertCommand`: clap definitions.
//! - `handle_convert`: dispatches to `status`, `enable` or `disable`.
//! - `pnpm_version`: the prerequisite probe shared by `status` and `enable`.
//!
//! The profile location comes from `--profile` (or `NODEKIT_PROFILE`), then
//! `paths.profile` in the config file, then the platform default.
//!
//! ## Examples
//!
//! ```bash
//! nodekit convert status
//! nodekit convert enable
//! nodekit --profile ./test-profile.ps1 convert disable
//! ```
//!
use super::Context;
use crate::common::process::ProcessRunner;
use crate::common::profile::{ConfigBlock, PatchOutcome, ProfilePatcher};
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `nodekit convert disable`.
mod disable;
/// Implements `nodekit convert enable`.
mod enable;
/// Implements `nodekit convert status`.
mod status;

/// # Convert Command Group Arguments (`ConvertArgs`)
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    #[command(subcommand)]
    pub command: ConvertCommand,
}

/// # Convert Subcommands (`ConvertCommand`)
#[derive(Subcommand, Debug)]
pub enum ConvertCommand {
    /// Show whether the integration is enabled and whether pnpm is installed.
    Status(status::StatusArgs),
    /// Add the npm → pnpm block to the profile (requires pnpm).
    Enable(enable::EnableArgs),
    /// Remove the npm → pnpm block from the profile.
    Disable(disable::DisableArgs),
}

impl ConvertArgs {
    pub fn renders_live_output(&self) -> bool {
        match &self.command {
            ConvertCommand::Status(args) => !args.json,
            _ => true,
        }
    }
}

/// # Handle Convert Command (`handle_convert`)
pub async fn handle_convert(args: ConvertArgs, ctx: &Context) -> Result<i32> {
    match args.command {
        ConvertCommand::Status(args) => status::handle_status(args, ctx).await,
        ConvertCommand::Enable(args) => enable::handle_enable(args, ctx).await,
        ConvertCommand::Disable(args) => disable::handle_disable(args, ctx).await,
    }
}

/// Patcher for the npm → pnpm block in the configured profile.
fn patcher(ctx: &Context) -> ProfilePatcher {
    ProfilePatcher::new(&ctx.profile_path, ConfigBlock::npm_to_pnpm())
}

/// `pnpm --version`, trimmed, or `None` if pnpm could not be run.
async fn pnpm_version(runner: &ProcessRunner) -> Option<String> {
    let result = runner.run("pnpm", &["--version".to_string()]).await;
    result
        .success
        .then(|| result.stdout.trim().to_string())
        .filter(|version| !version.is_empty())
}

/// Prints a patch outcome (stdout on success, stderr otherwise) and maps it to
/// an exit code.
fn report(outcome: &PatchOutcome) -> i32 {
    if outcome.success {
        println!("{}", outcome.message);
    } else {
        eprintln!("{}", outcome.message);
    }
    super::exit_code(outcome.success)
}
