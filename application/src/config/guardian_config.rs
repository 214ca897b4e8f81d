//! Guardian timing.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardianConfig {
    /// Sleep between liveness checks.
    pub poll_interval: Duration,
    /// How long to wait for a previous instance to announce it has stopped.
    pub handoff_wait: Duration,
}

impl Default for GuardianConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            handoff_wait: Duration::from_secs(30),
        }
    }
}

impl GuardianConfig {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_handoff_wait(mut self, wait: Duration) -> Self {
        self.handoff_wait = wait;
        self
    }
}
