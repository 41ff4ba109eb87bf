//! # nodekit `.npmrc` Store (`common::npmrc`)
//!
//! File: cli/src/common/npmrc.rs
//!
//! ## Overview
//!
//! Reads and writes npm's per-user key-value config file. The file belongs to the
//! user: nodekit only rewrites it on request, always as a whole-file atomic
//! replacement, and keeps lines it does not understand (comments, blank lines)
//! exactly as they were.
//!
//! ## Architecture
//!
//! - **`read` / `write`**: whole-file access; a missing file reads as `""`.
//! - **`backup`**: copies the file to `<path>.backup.<unix-millis>`; nothing to do
//!   (and `None`) when the file is absent.
//! - **`restore`**: replaces the file with the content of a backup.
//! - **`entries` / `set`**: key-level view for display and single-key edits.
//!
//! Failures are `NodekitError::Npmrc` with the cause appended.
//!
use crate::common::fs::io;
use crate::core::error::{NodekitError, Result};
use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One `key=value` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpmrcEntry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct NpmrcStore {
    path: PathBuf,
}

impl NpmrcStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whole file content, `""` if the file does not exist.
    pub fn read(&self) -> Result<String> {
        let content = io::read_optional(&self.path)
            .map_err(|e| npmrc_error("Failed to read .npmrc", e))?;
        Ok(content.unwrap_or_default())
    }

    /// Replaces the whole file.
    pub fn write(&self, content: &str) -> Result<()> {
        io::write_string_atomic(&self.path, content)
            .map_err(|e| npmrc_error("Failed to write .npmrc", e))?;
        info!("Wrote {:?}", self.path);
        Ok(())
    }

    /// Copies the file next to itself with a timestamp suffix and returns the
    /// copy's path, or `None` if there was no file to back up.
    pub fn backup(&self) -> Result<Option<PathBuf>> {
        if !self.path.is_file() {
            debug!("No {:?} to back up", self.path);
            return Ok(None);
        }
        let backup_path = self.backup_path_at(Utc::now().timestamp_millis());
        io::copy_file(&self.path, &backup_path)
            .map_err(|e| npmrc_error("Failed to back up .npmrc", e))?;
        info!("Backed up {:?} to {:?}", self.path, backup_path);
        Ok(Some(backup_path))
    }

    /// Replaces the file with the content of `backup`.
    pub fn restore(&self, backup: &Path) -> Result<()> {
        io::read_file_to_string(backup)
            .and_then(|content| io::write_string_atomic(&self.path, &content))
            .map_err(|e| npmrc_error("Failed to restore .npmrc", e))?;
        info!("Restored {:?} from {:?}", self.path, backup);
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<NpmrcEntry>> {
        Ok(parse_entries(&self.read()?))
    }

    /// Sets `key` to `value`: the first line for `key` is rewritten in place and
    /// any later duplicates are left alone; a new key is appended.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() || key.contains('=') {
            return Err(anyhow::Error::new(NodekitError::Npmrc(format!(
                "Invalid .npmrc key: {:?}",
                key
            ))));
        }
        let updated = set_entry(&self.read()?, key, value.trim());
        self.write(&updated)
    }

    fn backup_path_at(&self, millis: i64) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".backup.{}", millis));
        PathBuf::from(name)
    }
}

fn npmrc_error(action: &str, err: anyhow::Error) -> anyhow::Error {
    anyhow::Error::new(NodekitError::Npmrc(format!("{}: {:#}", action, err)))
}

fn is_comment_or_blank(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#')
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    if is_comment_or_blank(line) {
        return None;
    }
    let (key, value) = line.split_once('=')?;
    Some((key.trim(), value.trim()))
}

/// `key=value` lines in file order. Comments, blank lines and lines without `=`
/// are skipped.
pub fn parse_entries(content: &str) -> Vec<NpmrcEntry> {
    content
        .lines()
        .filter_map(|line| {
            let entry = split_entry(line);
            if entry.is_none() && !is_comment_or_blank(line) {
                debug!("Skipping .npmrc line without '=': {:?}", line);
            }
            entry
        })
        .map(|(key, value)| NpmrcEntry {
            key: key.to_string(),
            value: value.to_string(),
        })
        .collect()
}

fn set_entry(content: &str, key: &str, value: &str) -> String {
    let mut replaced = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| match split_entry(line) {
            Some((k, _)) if !replaced && k == key => {
                replaced = true;
                format!("{}={}", key, value)
            }
            _ => line.to_string(),
        })
        .collect();
    if !replaced {
        lines.push(format!("{}={}", key, value));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
