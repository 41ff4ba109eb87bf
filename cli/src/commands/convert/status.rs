//! # nodekit Convert Status Handler
//!
//! File: cli/src/commands/convert/status.rs
//!
//! ## Overview
//!
//! Implements `nodekit convert status`: reports whether the profile exists,
//! whether the npm → pnpm block is in it, and whether pnpm is installed.
//!
use crate::commands::Context;
use crate::core::error::Result;
use anyhow::Context as _;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

/// # Convert Status Arguments (`StatusArgs`)
#[derive(Parser, Debug)]
#[command(about = "Show the npm -> pnpm conversion status")]
pub struct StatusArgs {
    /// Print the status as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvertStatus {
    pub enabled: bool,
    pub profile_exists: bool,
    pub profile_path: PathBuf,
    pub pnpm_installed: bool,
    pub pnpm_version: Option<String>,
}

pub async fn handle_status(args: StatusArgs, ctx: &Context) -> Result<i32> {
    debug!("Convert status args: {:?}", args);
    let patcher = super::patcher(ctx);
    let pnpm_version = super::pnpm_version(&ctx.runner).await;
    let status = ConvertStatus {
        enabled: patcher.is_present()?,
        profile_exists: patcher.exists(),
        profile_path: patcher.path().to_path_buf(),
        pnpm_installed: pnpm_version.is_some(),
        pnpm_version,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&status)
            .context("Failed to serialize conversion status")?;
        println!("{}", json);
    } else {
        print!("{}", format_status(&status));
    }
    Ok(0)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn format_status(status: &ConvertStatus) -> String {
    let pnpm = match &status.pnpm_version {
        Some(version) => format!("yes ({})", version),
        None => "no".to_string(),
    };
    format!(
        "Auto-convert:   {}\nProfile:        {} (exists: {})\npnpm installed: {}\n",
        if status.enabled { "enabled" } else { "disabled" },
        status.profile_path.display(),
        yes_no(status.profile_exists),
        pnpm
    )
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_status() {
        let status = ConvertStatus {
            enabled: true,
            profile_exists: true,
            profile_path: PathBuf::from("/p/profile.ps1"),
            pnpm_installed: true,
            pnpm_version: Some("8.15.1".into()),
        };
        assert_eq!(
            format_status(&status),
            "Auto-convert:   enabled\nProfile:        /p/profile.ps1 (exists: yes)\npnpm installed: yes (8.15.1)\n"
        );

        let status = ConvertStatus {
            enabled: false,
            profile_exists: false,
            pnpm_installed: false,
            pnpm_version: None,
            ..status
        };
        assert!(format_status(&status).ends_with("pnpm installed: no\n"));
        assert!(format_status(&status).starts_with("Auto-convert:   disabled\n"));
    }
}
