//! # nodekit Exec Command
//!
//! File: cli/src/commands/exec.rs
//!
//! ## Overview
//!
//! Implements `nodekit exec <program> [args...]`: runs any command through the
//! process runner, so its output is rendered live and classified like every
//! package manager command, and exits with the command's exit code.
//!
//! Arguments are joined with spaces and run by the configured shell, so shell
//! syntax in them is interpreted:
//!
//! ```bash
//! nodekit exec npm config get cache
//! nodekit exec 'npm ls -g --depth=0 | head -5'
//! ```
//!
//! ## Output delivery
//!
//! The command's stdout reaches the terminal as bus events, through the console
//! renderer. When the terminal blocks for longer than the bus buffer lasts (16384
//! events), the oldest chunks are dropped and the renderer prints
//! `warn: N output events were dropped` in their place. Redirect to a file or
//! pipe into a fast consumer when every byte matters.
//!
use super::Context;
use crate::core::error::Result;
use clap::Parser;
use tracing::{debug, info};

/// # Exec Arguments (`ExecArgs`)
#[derive(Parser, Debug)]
#[command(about = "Run a command with live, classified output")]
pub struct ExecArgs {
    /// Program to run.
    pub program: String,
    /// Arguments passed to the program.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

pub async fn handle_exec(args: ExecArgs, ctx: &Context) -> Result<i32> {
    debug!("Exec args: {:?}", args);
    let result = ctx.runner.run(&args.program, &args.args).await;
    info!("{} exited with {}", args.program, result.exit_code);
    Ok(result.exit_code)
}
