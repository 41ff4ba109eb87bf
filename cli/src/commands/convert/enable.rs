//! # nodekit Convert Enable Handler
//!
//! File: cli/src/commands/convert/enable.rs
//!
//! Implements `nodekit convert enable`. pnpm must answer `pnpm --version`
//! before the block is written; the check only runs if the block is not already
//! in the profile.
//!
use crate::commands::Context;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// # Convert Enable Arguments (`EnableArgs`)
#[derive(Parser, Debug)]
#[command(about = "Route npm/npx to pnpm in the PowerShell profile")]
pub struct EnableArgs {}

pub async fn handle_enable(_args: EnableArgs, ctx: &Context) -> Result<i32> {
    let patcher = super::patcher(ctx);
    info!("Enabling npm -> pnpm conversion in {:?}", patcher.path());
    let outcome = patcher
        .enable(|| async { super::pnpm_version(&ctx.runner).await.is_some() })
        .await?;
    Ok(super::report(&outcome))
}
