//! # nodekit Shell Profile Patcher (`common::profile`)
//!
//! File: cli/src/common/profile/mod.rs
//!
//! ## Overview
//!
//! Adds and removes a marker-delimited block (see [`ConfigBlock`]) in a user-owned
//! text file, the PowerShell profile, without disturbing anything else in it.
//! The file is rewritten with a UTF-8 byte-order mark so Windows PowerShell reads
//! it as UTF-8.
//!
//! ## Architecture
//!
//! - **Detection**: the block is present iff the start marker occurs in the file.
//! - **Enable**: appends `"\n" + block + "\n"` after checking a caller-supplied
//!   prerequisite (e.g. "pnpm is installed"). Enabling twice is a no-op.
//! - **Disable**: removes the span from the start marker to the first end marker
//!   after it, collapses runs of three or more newlines to two, trims trailing
//!   whitespace and terminates the file with a single newline.
//! - **Serialization**: every read-modify-write runs under one process-wide lock,
//!   and writes go through [`io::write_string_atomic`].
//!
//! Outcomes the user can act on (already enabled, prerequisite missing, ...) are
//! reported as a [`PatchOutcome`]; only filesystem failures are `Err`.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::profile::{ConfigBlock, ProfilePatcher};
//!
//! # async fn run_example() -> crate::core::error::Result<()> {
//! let patcher = ProfilePatcher::new("/home/me/profile.ps1", ConfigBlock::npm_to_pnpm());
//! let outcome = patcher.enable(|| async { true }).await?;
//! println!("{}", outcome.message);
//! # Ok(())
//! # }
//! ```
//!
mod block;

pub use block::{ConfigBlock, NPM_PNPM_END_MARKER, NPM_PNPM_START_MARKER};

use crate::common::fs::io;
use crate::core::error::{NodekitError, Result};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Byte-order mark written at the start of every patched profile.
pub const UTF8_BOM: &str = "\u{feff}";

/// Serializes every profile read-modify-write in this process.
fn patch_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// What an enable/disable attempt ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    Enabled,
    Disabled,
    AlreadyEnabled,
    PrerequisiteMissing,
    NotFound,
    NotEnabled,
    /// Start marker present without a matching end marker; the file is left alone.
    Malformed,
}

impl PatchStatus {
    fn message(self) -> &'static str {
        match self {
            PatchStatus::Enabled => "npm -> pnpm auto-convert enabled. Restart the terminal to apply it.",
            PatchStatus::Disabled => "npm -> pnpm auto-convert disabled. Restart the terminal to apply it.",
            PatchStatus::AlreadyEnabled => "Auto-convert is already enabled.",
            PatchStatus::PrerequisiteMissing => "pnpm is not installed. Install it first: npm install -g pnpm",
            PatchStatus::NotFound => "Profile file does not exist.",
            PatchStatus::NotEnabled => "Auto-convert is not enabled.",
            PatchStatus::Malformed => {
                "Profile contains the start marker but no end marker after it; left unchanged."
            }
        }
    }
}

/// Result of an enable/disable call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOutcome {
    pub success: bool,
    pub status: PatchStatus,
    pub message: String,
}

impl From<PatchStatus> for PatchOutcome {
    fn from(status: PatchStatus) -> Self {
        Self {
            success: matches!(status, PatchStatus::Enabled | PatchStatus::Disabled),
            status,
            message: status.message().to_string(),
        }
    }
}

/// Inserts and removes one [`ConfigBlock`] in one file.
#[derive(Debug, Clone)]
pub struct ProfilePatcher {
    path: PathBuf,
    block: ConfigBlock,
}

impl ProfilePatcher {
    pub fn new(path: impl Into<PathBuf>, block: ConfigBlock) -> Self {
        Self {
            path: path.into(),
            block,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Whether the start marker occurs in the file. A missing file is `false`.
    pub fn is_present(&self) -> Result<bool> {
        Ok(self
            .read()?
            .is_some_and(|content| content.contains(&self.block.start_marker)))
    }

    /// Creates the file (and its directories) empty if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            io::ensure_dir_exists(parent).map_err(profile_io)?;
        }
        io::write_string_atomic(&self.path, "").map_err(profile_io)?;
        info!("Created profile file {:?}", self.path);
        Ok(())
    }

    /// Appends the block unless it is already present. `prerequisite` is only
    /// consulted when the block is absent; if it resolves to `false` nothing is
    /// written.
    #[instrument(skip(self, prerequisite), fields(path = %self.path.display()))]
    pub async fn enable<F, Fut>(&self, prerequisite: F) -> Result<PatchOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        let _guard = patch_lock().lock().await;

        if self.is_present()? {
            debug!("Block already present");
            return Ok(PatchStatus::AlreadyEnabled.into());
        }
        if !prerequisite().await {
            warn!("Prerequisite missing; profile left untouched");
            return Ok(PatchStatus::PrerequisiteMissing.into());
        }

        self.ensure_exists()?;
        let current = self.read()?.unwrap_or_default();
        let updated = format!("{}\n{}\n", current, self.block.render());
        self.write(&updated)?;
        info!("Inserted block into {:?}", self.path);
        Ok(PatchStatus::Enabled.into())
    }

    /// Removes the block, leaving the rest of the file as it was.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn disable(&self) -> Result<PatchOutcome> {
        let _guard = patch_lock().lock().await;

        let Some(current) = self.read()? else {
            return Ok(PatchStatus::NotFound.into());
        };
        if !current.contains(&self.block.start_marker) {
            return Ok(PatchStatus::NotEnabled.into());
        }
        match remove_block(&current, &self.block.start_marker, &self.block.end_marker) {
            Some(updated) => {
                self.write(&updated)?;
                info!("Removed block from {:?}", self.path);
                Ok(PatchStatus::Disabled.into())
            }
            None => {
                warn!("Start marker without end marker in {:?}", self.path);
                Ok(PatchStatus::Malformed.into())
            }
        }
    }

    /// File content with any leading BOM removed, or `None` if the file is missing.
    fn read(&self) -> Result<Option<String>> {
        let content = io::read_optional(&self.path).map_err(profile_io)?;
        Ok(content.map(|c| strip_bom(&c).to_string()))
    }

    fn write(&self, content: &str) -> Result<()> {
        io::write_string_atomic(&self.path, &format!("{}{}", UTF8_BOM, content))
            .map_err(profile_io)
    }
}

fn profile_io(err: anyhow::Error) -> anyhow::Error {
    anyhow::Error::new(NodekitError::ProfileIo(format!("{:#}", err)))
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix(UTF8_BOM).unwrap_or(content)
}

/// Removes the span from `start` to the first `end` after it (inclusive) and
/// normalizes the whitespace left behind. `None` when no `end` follows `start`.
pub fn remove_block(content: &str, start: &str, end: &str) -> Option<String> {
    let start_idx = content.find(start)?;
    let end_idx = start_idx + content[start_idx..].find(end)? + end.len();
    let joined = format!("{}{}", &content[..start_idx], &content[end_idx..]);
    Some(normalize_trailing(&collapse_blank_runs(&joined)))
}

/// Replaces every run of three or more `\n` with exactly two.
fn collapse_blank_runs(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut run = 0usize;
    for ch in content.chars() {
        if ch == '\n' {
            run += 1;
            if run <= 2 {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out
}

fn normalize_trailing(content: &str) -> String {
    format!("{}\n", content.trim_end())
}
