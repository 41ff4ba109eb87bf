//! Command identifiers.
//!
//! Every spawned command gets a `CommandId` before it starts so that consumers of
//! the event bus can group its start, log and end events together. Identifiers
//! combine the wall-clock time in milliseconds with a random base-36 suffix; two
//! commands started in the same millisecond collide only if they also draw the
//! same nine random characters.

use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Length of the random base-36 suffix.
const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Opaque identity of one command execution (`cmd_<millis>_<suffix>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CommandId(String);

impl CommandId {
    /// Allocates a fresh identifier.
    pub fn generate() -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("cmd_{}_{}", millis, suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_shape() {
        let id = CommandId::generate();
        let parts: Vec<&str> = id.as_str().split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "cmd");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_generate_is_unique_in_a_burst() {
        let ids: HashSet<CommandId> = (0..1000).map(|_| CommandId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
