//! # nodekit Convert Disable Handler
//!
//! File: cli/src/commands/convert/disable.rs
//!
//! Implements `nodekit convert disable`.
//!
use crate::commands::Context;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// # Convert Disable Arguments (`DisableArgs`)
#[derive(Parser, Debug)]
#[command(about = "Remove the npm -> pnpm block from the PowerShell profile")]
pub struct DisableArgs {}

pub async fn handle_disable(_args: DisableArgs, ctx: &Context) -> Result<i32> {
    let patcher = super::patcher(ctx);
    info!("Disabling npm -> pnpm conversion in {:?}", patcher.path());
    let outcome = patcher.disable().await?;
    Ok(super::report(&outcome))
}
