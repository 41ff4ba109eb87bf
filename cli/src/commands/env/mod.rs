//! # nodekit Environment Command Group
//!
//! File: cli/src/commands/env/mod.rs
//!
//! ## Overview
//!
//! This module serves as the entry point and router for the `nodekit env`
//! command group, which answers "which Node.js and npm are active, and where
//! do they live".
//!
//! ## Architecture
//!
//! - `EnvArgs` / `EnvCommand`: clap definitions for `nodekit env <subcommand>`.
//! - `handle_env`: dispatches to the subcommand handler.
//! - `probe`: runs the diagnostic commands and assembles `EnvironmentInfo`.
//!
//! ## Examples
//!
//! ```bash
//! # Human-readable summary, with the probe commands shown as they run
//! nodekit env info
//!
//! # Machine-readable output
//! nodekit env info --json
//! ```
//!
use super::Context;
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Implements `nodekit env info`.
mod info;
/// The environment probe shared by `info`.
pub mod probe;

/// # Environment Command Group Arguments (`EnvArgs`)
#[derive(Parser, Debug)]
pub struct EnvArgs {
    #[command(subcommand)]
    pub command: EnvCommand,
}

/// # Environment Subcommands (`EnvCommand`)
#[derive(Subcommand, Debug)]
pub enum EnvCommand {
    /// Show the Node.js and npm versions and executable paths.
    Info(info::InfoArgs),
}

impl EnvArgs {
    /// Whether command output should be rendered live (off for JSON output).
    pub fn renders_live_output(&self) -> bool {
        match &self.command {
            EnvCommand::Info(args) => !args.json,
        }
    }
}

/// # Handle Environment Command (`handle_env`)
///
/// Dispatches `nodekit env <subcommand>` and returns the process exit code.
pub async fn handle_env(args: EnvArgs, ctx: &Context) -> Result<i32> {
    match args.command {
        EnvCommand::Info(args) => info::handle_info(args, ctx).await,
    }
}
