//! Session timing from TOML (`[timeouts]` section)
//!
//! All values are in seconds.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    /// Connect plus login
    pub handshake: u64,
    /// Wait for a command result
    pub command: u64,
    /// Interval between keep-alive pings
    pub keep_alive: u64,
    /// Silence after which the connection is dropped
    pub liveness: u64,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        Self {
            handshake: 10,
            command: 10,
            keep_alive: 20,
            liveness: 60,
        }
    }
}
