//! # nodekit Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components used by every
//! command group: configuration loading and error types.
//!
//! ## Architecture
//!
//! - `config`: User configuration loading, path expansion, and validation
//! - `error`: Error types and the crate-wide `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{NodekitError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
