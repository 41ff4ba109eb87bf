//! # nodekit Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements loading, validation, and access to nodekit's own
//! configuration. Everything in it is optional: with no file present, nodekit
//! uses npm, `~/.npmrc`, the platform's PowerShell profile and the platform shell.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Global CLI flags (`--manager`, `--npmrc`, `--profile`), which clap can also
//!    read from `NODEKIT_MANAGER`, `NODEKIT_NPMRC` and `NODEKIT_PROFILE`
//! 2. The user file `config.toml` in the per-user config directory
//!    (`~/.config/nodekit/config.toml` on Linux), or the file named by `NODEKIT_CONFIG`
//! 3. Default values defined in the code
//!
//! Paths are expanded (`~` to the home directory) and the result is validated
//! before use.
//!
//! ## Example file
//!
//! ```toml
//! [defaults]
//! package_manager = "pnpm"
//!
//! [paths]
//! npmrc = "~/.npmrc"
//! profile = "~/.config/powershell/Microsoft.PowerShell_profile.ps1"
//!
//! [process]
//! shell = "/bin/bash"
//! shell_arg = "-c"
//! ```
//!
use crate::common::pkgmgr::ManagerKind;
use crate::common::process::ShellSpec;
use crate::common::system;
use crate::core::error::{NodekitError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Environment variable naming an explicit config file (bypasses the per-user location).
const CONFIG_ENV_VAR: &str = "NODEKIT_CONFIG";

/// Represents the main configuration structure, loaded from TOML.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub process: ProcessConfig,
}

/// Defaults applied when a command does not say otherwise.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Package manager used by `pkg` commands when `--manager` is absent.
    #[serde(default)]
    pub package_manager: ManagerKind,
}

/// Overrides for the two externally-owned files nodekit touches.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Location of the npm key-value config file (can use ~).
    pub npmrc: Option<String>,
    /// Location of the shell profile that receives the conversion block (can use ~).
    pub profile: Option<String>,
}

/// Overrides for how external commands are spawned.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ProcessConfig {
    /// Shell executable. Must be given together with `shell_arg`.
    pub shell: Option<String>,
    /// Flag that makes the shell run its next argument as a command line (`-c`, `/C`).
    pub shell_arg: Option<String>,
}

impl Config {
    /// Resolved `.npmrc` location: configured override or `~/.npmrc`.
    pub fn npmrc_path(&self) -> Result<PathBuf> {
        match &self.paths.npmrc {
            Some(p) => Ok(PathBuf::from(p)),
            None => system::default_npmrc_path(),
        }
    }

    /// Resolved shell profile location: configured override or the platform default.
    pub fn profile_path(&self) -> Result<PathBuf> {
        match &self.paths.profile {
            Some(p) => Ok(PathBuf::from(p)),
            None => system::default_profile_path(),
        }
    }

    /// Shell used by the process runner.
    pub fn shell_spec(&self) -> ShellSpec {
        match (&self.process.shell, &self.process.shell_arg) {
            (Some(program), Some(arg)) => ShellSpec::new(program.clone(), arg.clone()),
            _ => ShellSpec::platform_default(),
        }
    }
}

/// Loads the user configuration (if any), expands paths, and validates the result.
pub fn load_config() -> Result<Config> {
    let mut config = load_user_config()?.unwrap_or_default();
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(shellexpand::tilde(&explicit).into_owned());
        info!("Loading configuration named by {}: {}", CONFIG_ENV_VAR, path.display());
        return load_config_from_path(&path).map(Some);
    }

    let Some(proj_dirs) = ProjectDirs::from("com", "Nodekit", "nodekit") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.exists() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) {
    for path in [&mut config.paths.npmrc, &mut config.paths.profile]
        .into_iter()
        .flatten()
    {
        *path = shellexpand::tilde(path.as_str()).into_owned();
        debug!("Expanded configured path: {}", path);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if matches!(&config.paths.npmrc, Some(p) if p.trim().is_empty()) {
        return Err(anyhow!(NodekitError::Config(
            "paths.npmrc cannot be empty.".to_string()
        )));
    }
    if matches!(&config.paths.profile, Some(p) if p.trim().is_empty()) {
        return Err(anyhow!(NodekitError::Config(
            "paths.profile cannot be empty.".to_string()
        )));
    }
    match (&config.process.shell, &config.process.shell_arg) {
        (Some(_), None) | (None, Some(_)) => Err(anyhow!(NodekitError::Config(
            "process.shell and process.shell_arg must be set together.".to_string()
        ))),
        (Some(shell), Some(_)) if shell.trim().is_empty() => Err(anyhow!(
            NodekitError::Config("process.shell cannot be empty.".to_string())
        )),
        _ => Ok(()),
    }
}
