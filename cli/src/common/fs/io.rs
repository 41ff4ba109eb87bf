//! # nodekit Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! This module centralizes the filesystem operations nodekit performs on files it
//! does not own (the user's `.npmrc` and shell profile). It wraps `std::fs` with
//! consistent error context, and makes every write whole-file and atomic.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: Creates a directory (and parents) if missing; fails if the path is a file.
//! - **`read_file_to_string`**: `fs::read_to_string` with context.
//! - **`read_optional`**: Like `read_file_to_string`, but a missing file is `Ok(None)`.
//! - **`write_string_atomic`**: Writes into a temp file next to the target, flushes it
//!   to disk, then renames it over the target. Readers see either the old or the new
//!   content, never a prefix of it. A symlinked target (dotfiles setups) is written
//!   through: the link stays, the file it points to is replaced.
//! - **`copy_file`**: `fs::copy` with context.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::fs::io;
//! use std::path::Path;
//!
//! # fn run_example() -> crate::core::error::Result<()> {
//! let npmrc = Path::new("/home/me/.npmrc");
//! let current = io::read_optional(npmrc)?.unwrap_or_default();
//! io::write_string_atomic(npmrc, &format!("{}registry=https://registry.npmjs.org\n", current))?;
//! # Ok(())
//! # }
//! ```
//!
use crate::core::error::{NodekitError, Result};
use anyhow::Context;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path, creating it and any
/// missing parents. Fails if the path exists but is not a directory.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(NodekitError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Reads a file that may legitimately be absent.
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to read file {:?}", path)),
    }
}

/// Symlink hops followed before giving up, as `ELOOP` would.
const MAX_SYMLINK_HOPS: usize = 40;

/// The file a write to `path` should land in: `path` itself, or the file at the
/// end of a chain of symlinks starting at `path`. Dangling links resolve to
/// their (missing) target, relative links against the link's directory.
fn resolve_write_target(path: &Path) -> Result<PathBuf> {
    let mut current = path.to_path_buf();
    for _ in 0..MAX_SYMLINK_HOPS {
        let is_link = fs::symlink_metadata(&current)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if !is_link {
            return Ok(current);
        }
        let link = fs::read_link(&current)
            .with_context(|| format!("Failed to read symlink {:?}", current))?;
        let base = current.parent().unwrap_or_else(|| Path::new("."));
        current = base.join(link);
    }
    anyhow::bail!(NodekitError::FileSystem(format!(
        "Too many levels of symbolic links: {:?}",
        path
    )))
}

/// Replaces the file at `path` with `content` atomically.
///
/// The parent directory is created if needed. The temp file lives in the same
/// directory as the file being replaced so the final rename never crosses
/// filesystems. Symlinks at `path` are followed, not replaced.
pub fn write_string_atomic(path: &Path, content: &str) -> Result<()> {
    let target = resolve_write_target(path)?;
    if target != path {
        debug!("Writing through symlink {:?} to {:?}", path, target);
    }
    let path = target.as_path();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    ensure_dir_exists(parent)?;

    let mut temp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {:?}", parent))?;
    temp.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write temporary file for {:?}", path))?;
    // Keep the permissions of the file being replaced (temp files start out 0600).
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Failed to copy permissions of {:?}", path))?;
    }
    temp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush temporary file for {:?}", path))?;
    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace file {:?}", path))?;
    info!("Wrote content to file: {:?}", path);
    Ok(())
}

/// Copies `from` to `to`, overwriting `to`.
pub fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    debug!("Copied {:?} to {:?}", from, to);
    Ok(())
}
