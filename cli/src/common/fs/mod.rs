//! # nodekit Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers shared by the `.npmrc` store and the shell-profile patcher.
//! See `io` for the individual operations.
//!

/// Basic file I/O (`ensure_dir_exists`, `read_optional`, `write_string_atomic`, `copy_file`).
pub mod io;
