//! Relay configuration.

use std::time::Duration;

use crate::domain::session::DEFAULT_MAX_MALFORMED;

/// Seconds of silence after which a connection is closed.
///
/// Three ping intervals of the reference client (20 s).
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 60;

/// Per-connection protocol limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayConfig {
    /// Consecutive malformed messages before the connection is closed
    pub max_malformed: u32,
    /// `None` disables idle eviction
    pub idle_timeout: Option<Duration>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            max_malformed: DEFAULT_MAX_MALFORMED,
            idle_timeout: Some(Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS)),
        }
    }
}

impl RelayConfig {
    /// Build from command-line style values; `idle_timeout_secs == 0` disables the timeout.
    pub fn new(max_malformed: u32, idle_timeout_secs: u64) -> Self {
        Self {
            max_malformed,
            idle_timeout: (idle_timeout_secs > 0).then(|| Duration::from_secs(idle_timeout_secs)),
        }
    }
}
