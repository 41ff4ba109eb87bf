//! # nodekit Package List Handler
//!
//! File: cli/src/commands/pkg/list.rs
//!
//! ## Overview
//!
//! Implements `nodekit pkg list`: prints the globally installed packages of the
//! selected manager as a table, or as a JSON array with `--json`. The raw manager
//! output is not echoed; anything it wrote to stderr (and any parse error) is
//! printed to stderr after the table.
//!
use super::ops;
use crate::commands::Context;
use crate::common::ui;
use crate::core::error::Result;
use anyhow::Context as _;
use clap::Parser;
use tracing::debug;

/// # Package List Arguments (`ListArgs`)
#[derive(Parser, Debug)]
#[command(about = "List globally installed packages")]
pub struct ListArgs {
    /// Print `[{"name": ..., "version": ...}]` instead of a table.
    #[arg(long)]
    pub json: bool,
}

pub async fn handle_list(args: ListArgs, ctx: &Context) -> Result<i32> {
    debug!("List args: {:?}", args);
    let listing = ops::list_global(&ctx.runner, ctx.package_manager()).await;

    if args.json {
        let json = serde_json::to_string_pretty(&listing.packages)
            .context("Failed to serialize package list")?;
        println!("{}", json);
    } else {
        ui::print_packages(&listing.packages);
        let stderr = listing.stderr.trim_end();
        if !stderr.is_empty() {
            eprintln!("{}", stderr);
        }
    }
    Ok(0)
}
