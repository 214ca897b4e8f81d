//! Supervisor timing from TOML (`[guardian]` section)

use chatbridge_application::GuardianConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGuardianConfig {
    /// Seconds between liveness checks
    pub poll_interval: u64,
    /// Seconds to wait for a previous instance during reload
    pub handoff_wait: u64,
}

impl Default for FileGuardianConfig {
    fn default() -> Self {
        Self {
            poll_interval: 60,
            handoff_wait: 30,
        }
    }
}

impl FileGuardianConfig {
    pub fn to_guardian_config(&self) -> GuardianConfig {
        GuardianConfig::default()
            .with_poll_interval(Duration::from_secs(self.poll_interval))
            .with_handoff_wait(Duration::from_secs(self.handoff_wait))
    }
}
