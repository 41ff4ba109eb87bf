//! # nodekit System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//!
//! ## Overview
//!
//! Platform knowledge in one place: where the per-user files live, which
//! command locates an executable on `PATH`, and how the npm executable is named
//! next to `node`.
//!
//! | concern              | Windows                                                      | elsewhere                                               |
//! |----------------------|--------------------------------------------------------------|---------------------------------------------------------|
//! | shell profile        | `~/Documents/WindowsPowerShell/Microsoft.PowerShell_profile.ps1` | `~/.config/powershell/Microsoft.PowerShell_profile.ps1` |
//! | executable locator   | `where`                                                      | `which`                                                 |
//! | npm next to node     | `npm.cmd`                                                    | `npm`                                                   |
//!
use crate::core::error::Result;
use anyhow::Context;
use std::path::PathBuf;

/// File name of the PowerShell profile on every platform.
const PROFILE_FILE_NAME: &str = "Microsoft.PowerShell_profile.ps1";

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Could not find home directory")
}

/// `~/.npmrc`.
pub fn default_npmrc_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".npmrc"))
}

/// The current user's PowerShell profile.
pub fn default_profile_path() -> Result<PathBuf> {
    let home = home_dir()?;
    let path = if cfg!(windows) {
        home.join("Documents")
            .join("WindowsPowerShell")
            .join(PROFILE_FILE_NAME)
    } else {
        home.join(".config").join("powershell").join(PROFILE_FILE_NAME)
    };
    Ok(path)
}

/// Command that prints the full path of an executable found on `PATH`.
pub fn executable_locator() -> &'static str {
    if cfg!(windows) {
        "where"
    } else {
        "which"
    }
}

fn npm_file_name() -> &'static str {
    if cfg!(windows) {
        "npm.cmd"
    } else {
        "npm"
    }
}

/// Derives the npm executable path from the node executable path by swapping a
/// trailing `node` / `node.exe` (any case) for the platform's npm file name.
/// Paths that do not end in `node` are returned unchanged.
pub fn npm_path_from_node_path(node_path: &str) -> String {
    replace_node_suffix(node_path, npm_file_name())
}

fn replace_node_suffix(node_path: &str, npm_name: &str) -> String {
    let lower = node_path.to_ascii_lowercase();
    let suffix_len = [".exe", ""]
        .iter()
        .map(|ext| format!("node{}", ext))
        .find(|suffix| lower.ends_with(suffix.as_str()))
        .map(|suffix| suffix.len());
    match suffix_len {
        Some(len) => format!("{}{}", &node_path[..node_path.len() - len], npm_name),
        None => node_path.to_string(),
    }
}
