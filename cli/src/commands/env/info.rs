//! # nodekit Environment Info Handler
//!
//! File: cli/src/commands/env/info.rs
//!
//! ## Overview
//!
//! Implements `nodekit env info`: runs the environment probe and prints what it
//! found, as a short report or as JSON. Values the probe could not determine are
//! shown as `not found` (`null` in JSON).
//!
use super::probe::{self, EnvironmentInfo};
use crate::commands::Context;
use crate::core::error::Result;
use anyhow::Context as _;
use clap::Parser;
use tracing::{debug, info};

/// # Environment Info Arguments (`InfoArgs`)
#[derive(Parser, Debug)]
#[command(about = "Show the active Node.js / npm versions and paths")]
pub struct InfoArgs {
    /// Print the result as JSON instead of a report.
    #[arg(long)]
    pub json: bool,
}

/// # Handle Environment Info Command (`handle_info`)
///
/// Always exits 0: a missing `node` is a finding, not a failure.
pub async fn handle_info(args: InfoArgs, ctx: &Context) -> Result<i32> {
    info!("Handling env info command...");
    debug!("Info args: {:?}", args);

    let env_info = probe::probe(&ctx.runner).await;

    if args.json {
        let json = serde_json::to_string_pretty(&env_info)
            .context("Failed to serialize environment info")?;
        println!("{}", json);
    } else {
        print!("{}", format_report(&env_info));
    }
    Ok(0)
}

fn format_report(env_info: &EnvironmentInfo) -> String {
    let rows = [
        ("Node version", &env_info.node_version),
        ("npm version", &env_info.npm_version),
        ("Node path", &env_info.node_path),
        ("npm path", &env_info.npm_path),
    ];
    rows.iter()
        .map(|(label, value)| {
            format!(
                "{:<13} {}\n",
                format!("{}:", label),
                value.as_deref().unwrap_or("not found")
            )
        })
        .collect()
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_report() {
        let env_info = EnvironmentInfo {
            node_version: Some("v20.11.0".into()),
            npm_version: None,
            node_path: Some("/usr/bin/node".into()),
            npm_path: Some("/usr/bin/npm".into()),
        };
        assert_eq!(
            format_report(&env_info),
            "Node version: v20.11.0\n\
             npm version:  not found\n\
             Node path:    /usr/bin/node\n\
             npm path:     /usr/bin/npm\n"
        );
    }
}
