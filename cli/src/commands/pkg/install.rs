//! # nodekit Package Install Handler
//!
//! File: cli/src/commands/pkg/install.rs
//!
//! Implements `nodekit pkg install <name>`.
//!
use super::ops::{self, Operation};
use crate::commands::{exit_code, Context};
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// # Package Install Arguments (`InstallArgs`)
#[derive(Parser, Debug)]
#[command(about = "Install a package globally")]
pub struct InstallArgs {
    /// Package name, optionally with a version (`typescript@5`).
    pub name: String,
}

pub async fn handle_install(args: InstallArgs, ctx: &Context) -> Result<i32> {
    debug!("Install args: {:?}", args);
    let outcome = ops::run_operation(
        &ctx.runner,
        ctx.package_manager(),
        Operation::Install,
        &args.name,
    )
    .await;
    super::report(&outcome, Operation::Install);
    Ok(exit_code(outcome.success))
}
