//! # nodekit Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared infrastructure used by the command handlers in `commands::`. Nothing in
//! here parses CLI arguments or prints command results directly, except `ui`.
//!
//! ## Architecture
//!
//! - **`process`**: Runs external commands and streams their classified output as events.
//! - **`pkgmgr`**: npm / pnpm / yarn argument vectors and `list` output parsers.
//! - **`profile`**: Idempotent insertion and removal of nodekit's block in the shell profile.
//! - **`npmrc`**: Read, write, back up and edit the user's `.npmrc`.
//! - **`fs`**: Whole-file, atomic filesystem primitives used by `profile` and `npmrc`.
//! - **`system`**: Per-platform paths and tool names.
//! - **`ui`**: Live rendering of command events and result tables.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::{pkgmgr::ManagerKind, process::{EventBus, ProcessRunner}};
//!
//! # async fn run_example() {
//! let runner = ProcessRunner::new(EventBus::new());
//! let pm = ManagerKind::Pnpm.strategy();
//! let result = runner.run(pm.program(), &pm.list_global_args()).await;
//! let packages = pm.parse_global_list(&result.stdout);
//! # }
//! ```
//!

/// Whole-file filesystem operations.
pub mod fs;
/// `.npmrc` store.
pub mod npmrc;
/// Package manager strategies.
pub mod pkgmgr;
/// External command execution and the event bus.
pub mod process;
/// Shell profile block patcher.
pub mod profile;
/// Platform-specific paths and tool names.
pub mod system;
/// Terminal rendering.
pub mod ui;
