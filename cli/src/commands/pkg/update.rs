//! # nodekit Package Update Handlers
//!
//! File: cli/src/commands/pkg/update.rs
//!
//! ## Overview
//!
//! Implements `nodekit pkg update <name>` and `nodekit pkg update-all <names...>`.
//! With npm and pnpm, `update-all` runs one `update -g` for all names; yarn has
//! no multi-package upgrade, so each name is upgraded in turn.
//!
use super::ops::{self, Operation};
use crate::commands::{exit_code, Context};
use crate::core::error::Result;
use clap::Parser;
use tracing::{debug, info};

/// # Package Update Arguments (`UpdateArgs`)
#[derive(Parser, Debug)]
#[command(about = "Update a globally installed package")]
pub struct UpdateArgs {
    /// Package name.
    pub name: String,
}

/// # Package Batch Update Arguments (`UpdateAllArgs`)
#[derive(Parser, Debug)]
#[command(about = "Update several globally installed packages")]
pub struct UpdateAllArgs {
    /// Package names.
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,
}

pub async fn handle_update(args: UpdateArgs, ctx: &Context) -> Result<i32> {
    debug!("Update args: {:?}", args);
    let outcome = ops::run_operation(
        &ctx.runner,
        ctx.package_manager(),
        Operation::Update,
        &args.name,
    )
    .await;
    super::report(&outcome, Operation::Update);
    Ok(exit_code(outcome.success))
}

pub async fn handle_update_all(args: UpdateAllArgs, ctx: &Context) -> Result<i32> {
    info!("Updating {} packages with {}", args.names.len(), ctx.manager);
    let outcomes = ops::update_all(&ctx.runner, ctx.package_manager(), &args.names).await;
    for outcome in &outcomes {
        super::report(outcome, Operation::Update);
    }
    let failed = outcomes.iter().filter(|o| !o.success).count();
    if failed > 0 {
        eprintln!("{} of {} updates failed.", failed, outcomes.len());
    }
    Ok(exit_code(failed == 0))
}
