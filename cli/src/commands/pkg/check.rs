//! # nodekit Package Check Handler
//!
//! File: cli/src/commands/pkg/check.rs
//!
//! ## Overview
//!
//! Implements `nodekit pkg check <name>`: reports whether a package is installed
//! globally with the selected manager, and its version. The answer comes from the
//! manager's global listing, so a failing list command reads as "not installed".
//! Exits 0 when the package is installed and 1 otherwise, so scripts can branch on it.
//!
use super::ops;
use crate::commands::{exit_code, Context};
use crate::core::error::Result;
use anyhow::Context as _;
use clap::Parser;
use tracing::debug;

/// # Package Check Arguments (`CheckArgs`)
#[derive(Parser, Debug)]
#[command(about = "Check whether a package is installed globally")]
pub struct CheckArgs {
    /// Package name, e.g. `typescript` or `@vue/cli`.
    pub name: String,
    /// Print `{"name": ..., "installed": ..., "version": ...}` instead of a sentence.
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_check(args: CheckArgs, ctx: &Context) -> Result<i32> {
    debug!("Check args: {:?}", args);
    let check = ops::check_global(&ctx.runner, ctx.package_manager(), &args.name).await;

    if args.json {
        let json = serde_json::to_string_pretty(&check)
            .context("Failed to serialize package check")?;
        println!("{}", json);
    } else {
        println!("{}", format_check(&check));
    }
    Ok(exit_code(check.installed))
}

fn format_check(check: &ops::PackageCheck) -> String {
    match &check.version {
        Some(version) => format!("{} {} is installed.", check.name, version),
        None => format!("{} is not installed.", check.name),
    }
}
