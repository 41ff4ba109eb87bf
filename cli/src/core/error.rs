//! # nodekit Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout nodekit. It provides a
//! consistent approach to error management: a typed enum for failures that callers
//! may want to tell apart, and an `anyhow`-based `Result` alias for everything else.
//!
//! ## Architecture
//!
//! - `NodekitError`: A custom error enum using `thiserror` for the distinguishable failure kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! Not every failure becomes an `Err`. Anything that goes wrong while running an
//! external command (spawn failure, non-zero exit, disk exhaustion) is folded into
//! an `ExecutionResult` by the process runner and never crosses that boundary as an
//! error. File-system failures of the profile patcher and the `.npmrc` store, on the
//! other hand, are returned as `Err` values carrying the underlying cause.
//!
//! ## Examples
//!
//! ```rust
//! // Raise a typed error
//! return Err(anyhow!(NodekitError::Config("empty profile path".into())));
//!
//! // Add context to an I/O failure
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//!
//! // Check for a specific kind
//! if let Some(NodekitError::MalformedOutput { .. }) = err.downcast_ref::<NodekitError>() {
//!     // tolerate and continue
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for nodekit.
#[derive(Error, Debug)]
pub enum NodekitError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    /// Reading or writing the shell profile failed. The operation was aborted
    /// before anything was written.
    #[error("Shell profile error: {0}")]
    ProfileIo(String),

    #[error("{0}")]
    Npmrc(String),

    /// A package manager printed output that could not be parsed.
    #[error("Unparsable {manager} output: {reason}")]
    MalformedOutput { manager: String, reason: String },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = NodekitError::Config("Missing setting 'foo'".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: Missing setting 'foo'"
        );

        let malformed = NodekitError::MalformedOutput {
            manager: "npm".into(),
            reason: "expected value at line 1 column 1".into(),
        };
        assert_eq!(
            malformed.to_string(),
            "Unparsable npm output: expected value at line 1 column 1"
        );

        // Npmrc messages are already complete sentences and are shown verbatim.
        let npmrc = NodekitError::Npmrc("Failed to write .npmrc: denied".into());
        assert_eq!(npmrc.to_string(), "Failed to write .npmrc: denied");
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = NodekitError::ProfileIo("disk full".into()).into();
        assert!(matches!(
            err.downcast_ref::<NodekitError>(),
            Some(NodekitError::ProfileIo(_))
        ));
    }
}
