//! Runtime configuration for a bridge client.

use chatbridge_domain::{ClientIdentity, Endpoint};
use std::time::Duration;

/// Settings a session reads when it starts.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub identity: ClientIdentity,
    pub endpoint: Endpoint,
    /// Bound on connect plus authentication.
    pub handshake_timeout: Duration,
    /// How long an issued command waits for its result.
    pub command_timeout: Duration,
    /// Interval between keep-alive pings.
    pub keep_alive_interval: Duration,
    /// Silence after which the connection is considered dead.
    pub liveness_window: Duration,
    /// Consecutive undecodable frames tolerated before the session ends.
    pub max_protocol_errors: u32,
    /// Send a goodbye frame on graceful stop.
    pub farewell: bool,
}

impl ClientConfig {
    pub fn new(identity: ClientIdentity, endpoint: Endpoint) -> Self {
        Self {
            identity,
            endpoint,
            handshake_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(10),
            keep_alive_interval: Duration::from_secs(20),
            liveness_window: Duration::from_secs(60),
            max_protocol_errors: 8,
            farewell: true,
        }
    }

    pub fn with_handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_keep_alive(mut self, interval: Duration, liveness_window: Duration) -> Self {
        self.keep_alive_interval = interval;
        self.liveness_window = liveness_window;
        self
    }

    pub fn with_max_protocol_errors(mut self, max: u32) -> Self {
        self.max_protocol_errors = max;
        self
    }

    pub fn with_farewell(mut self, farewell: bool) -> Self {
        self.farewell = farewell;
        self
    }

    pub fn name(&self) -> &str {
        self.identity.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new(
            ClientIdentity::new("survival", "secret").unwrap(),
            Endpoint::new("localhost", 30001),
        )
    }

    #[test]
    fn test_defaults() {
        let config = config();
        assert_eq!(config.name(), "survival");
        assert_eq!(config.command_timeout, Duration::from_secs(10));
        assert!(config.liveness_window > config.keep_alive_interval);
        assert!(config.farewell);
    }

    #[test]
    fn test_builders() {
        let config = config()
            .with_command_timeout(Duration::from_secs(3))
            .with_keep_alive(Duration::from_secs(5), Duration::from_secs(15))
            .with_max_protocol_errors(2)
            .with_farewell(false);
        assert_eq!(config.command_timeout, Duration::from_secs(3));
        assert_eq!(config.keep_alive_interval, Duration::from_secs(5));
        assert_eq!(config.liveness_window, Duration::from_secs(15));
        assert_eq!(config.max_protocol_errors, 2);
        assert!(!config.farewell);
    }
}
