//! Severity classification of stderr chunks.
//!
//! npm and friends write progress notes, warnings and real errors to the same
//! error stream. `classify` is a cheap, stateless heuristic over one raw chunk:
//! known-benign notices are suppressed, anything mentioning `npm warn` becomes a
//! warning, and the rest is treated as an error.
//!
//! The decision is chunk-local. A chunk is whatever one pipe read returned, so a
//! logical line split across two reads is classified as two separate pieces.

use super::events::Severity;

/// Notices that npm prints for configuration keys it does not recognise.
const UNKNOWN_USER_CONFIG: &str = "Unknown user config";
/// Deprecation notice about behaviour removed in the next npm major.
const NEXT_MAJOR_DEPRECATION: &str = "This will stop working in the next major version";
/// Lower-cased warning marker (`npm WARN`, `npm warn`, ...).
const NPM_WARN_MARKER: &str = "npm warn";

/// Outcome of classifying one stderr chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Known noise: kept in the captured stderr, but no log event is emitted.
    Suppressed,
    Warning,
    Error,
}

impl Classification {
    /// Severity to tag the log event with, or `None` when the chunk is suppressed.
    pub fn severity(self) -> Option<Severity> {
        match self {
            Classification::Suppressed => None,
            Classification::Warning => Some(Severity::Warning),
            Classification::Error => Some(Severity::Error),
        }
    }
}

/// Classifies one raw chunk read from a command's error stream.
pub fn classify(text: &str) -> Classification {
    if text.contains(UNKNOWN_USER_CONFIG) || text.contains(NEXT_MAJOR_DEPRECATION) {
        Classification::Suppressed
    } else if text.to_ascii_lowercase().contains(NPM_WARN_MARKER) {
        Classification::Warning
    } else {
        Classification::Error
    }
}
