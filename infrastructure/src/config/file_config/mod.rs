//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application's
//! runtime configuration once validated.

mod client;
mod console;
mod guardian;
mod logging;
mod server;
mod timeouts;

pub use client::FileClientConfig;
pub use console::FileConsoleConfig;
pub use guardian::FileGuardianConfig;
pub use logging::FileLoggingConfig;
pub use server::FileServerConfig;
pub use timeouts::FileTimeoutsConfig;

use chatbridge_application::{ClientConfig, GuardianConfig};
use chatbridge_domain::ClientIdentity;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound for every `[timeouts]` value (one day).
pub const MAX_TIMEOUT_SECS: u64 = 86_400;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("client.name: {0}")]
    InvalidClientName(String),

    #[error("server.port cannot be 0")]
    InvalidPort,

    #[error("server.host cannot be empty")]
    EmptyHost,

    #[error("timeouts.{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("timeouts.{field} ({secs}s) exceeds the one day limit")]
    TimeoutTooLarge { field: &'static str, secs: u64 },

    #[error("timeouts.liveness ({liveness}s) must be longer than timeouts.keep_alive ({keep_alive}s)")]
    LivenessTooShort { keep_alive: u64, liveness: u64 },

    #[error("client.max_protocol_errors cannot be 0")]
    ZeroProtocolErrors,

    #[error("guardian.poll_interval cannot be 0")]
    ZeroPollInterval,

    #[error("console.chunk_limit cannot be 0")]
    ZeroChunkLimit,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub client: FileClientConfig,
    pub server: FileServerConfig,
    pub timeouts: FileTimeoutsConfig,
    pub guardian: FileGuardianConfig,
    pub console: FileConsoleConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if let Err(e) = ClientIdentity::new(self.client.name.clone(), String::new()) {
            issues.push(ConfigValidationError::InvalidClientName(e.to_string()));
        }
        if self.client.max_protocol_errors == 0 {
            issues.push(ConfigValidationError::ZeroProtocolErrors);
        }

        if self.server.host.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyHost);
        }
        if self.server.port == 0 {
            issues.push(ConfigValidationError::InvalidPort);
        }

        let timeouts = &self.timeouts;
        for (field, value) in [
            ("handshake", timeouts.handshake),
            ("command", timeouts.command),
            ("keep_alive", timeouts.keep_alive),
            ("liveness", timeouts.liveness),
        ] {
            if value == 0 {
                issues.push(ConfigValidationError::ZeroTimeout(field));
            } else if value > MAX_TIMEOUT_SECS {
                issues.push(ConfigValidationError::TimeoutTooLarge { field, secs: value });
            }
        }
        if timeouts.keep_alive > 0 && timeouts.liveness <= timeouts.keep_alive {
            issues.push(ConfigValidationError::LivenessTooShort {
                keep_alive: timeouts.keep_alive,
                liveness: timeouts.liveness,
            });
        }

        if self.guardian.poll_interval == 0 {
            issues.push(ConfigValidationError::ZeroPollInterval);
        }
        if self.console.chunk_limit == 0 {
            issues.push(ConfigValidationError::ZeroChunkLimit);
        }

        issues
    }

    /// Convert into the runtime client configuration.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigValidationError> {
        let identity = ClientIdentity::new(self.client.name.clone(), self.client.password.clone())
            .map_err(|e| ConfigValidationError::InvalidClientName(e.to_string()))?;
        let timeouts = &self.timeouts;

        Ok(ClientConfig::new(identity, self.server.to_endpoint())
            .with_handshake_timeout(Duration::from_secs(timeouts.handshake))
            .with_command_timeout(Duration::from_secs(timeouts.command))
            .with_keep_alive(
                Duration::from_secs(timeouts.keep_alive),
                Duration::from_secs(timeouts.liveness),
            )
            .with_max_protocol_errors(self.client.max_protocol_errors)
            .with_farewell(self.client.farewell))
    }

    pub fn to_guardian_config(&self) -> GuardianConfig {
        self.guardian.to_guardian_config()
    }
}
