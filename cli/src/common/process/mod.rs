//! # nodekit Process Execution (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//!
//! ## Overview
//!
//! This module runs external commands (`node`, `npm`, `pnpm`, `yarn`, ...) and
//! streams what they print to any number of consumers while they run.
//!
//! ## Architecture
//!
//! - **`runner`**: `ProcessRunner` spawns one command per `run` call through the
//!   platform shell, captures both output streams chunk by chunk, and returns an
//!   `ExecutionResult` once the process has exited.
//! - **`classify`**: Decides whether a stderr chunk is noise, a warning, or an error.
//! - **`events`**: `EventBus`, a fan-out publisher of `CommandEvent`s (start, log,
//!   end, announce) with an explicit contract for subscribers that attach late or
//!   fall behind.
//! - **`id`**: `CommandId`, the identity that groups one execution's events.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::process::{EventBus, ProcessRunner};
//!
//! # async fn run_example() {
//! let bus = EventBus::new();
//! let mut events = bus.subscribe(); // subscribe *before* running to see Start
//! let runner = ProcessRunner::new(bus);
//!
//! let result = runner.run("npm", &["-v".to_string()]).await;
//! if result.success {
//!     println!("npm {}", result.stdout.trim());
//! }
//! # }
//! ```
//!
pub mod classify;
pub mod events;
pub mod id;
pub mod runner;

pub use classify::{classify, Classification};
pub use events::{
    CommandEvent, EventBus, EventKind, EventSubscription, Severity, StreamKind, SubscriptionEvent,
};
pub use id::CommandId;
pub use runner::{ExecutionResult, ProcessRunner, ShellSpec};
