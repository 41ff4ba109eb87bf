//! # nodekit Package Uninstall Handler
//!
//! File: cli/src/commands/pkg/uninstall.rs
//!
//! Implements `nodekit pkg uninstall <name>`.
//!
use super::ops::{self, Operation};
use crate::commands::{exit_code, Context};
use crate::core::error::Result;
use clap::Parser;
use tracing::debug;

/// # Package Uninstall Arguments (`UninstallArgs`)
#[derive(Parser, Debug)]
#[command(about = "Remove a globally installed package")]
pub struct UninstallArgs {
    /// Package name.
    pub name: String,
}

pub async fn handle_uninstall(args: UninstallArgs, ctx: &Context) -> Result<i32> {
    debug!("Uninstall args: {:?}", args);
    let outcome = ops::run_operation(
        &ctx.runner,
        ctx.package_manager(),
        Operation::Uninstall,
        &args.name,
    )
    .await;
    super::report(&outcome, Operation::Uninstall);
    Ok(exit_code(outcome.success))
}
