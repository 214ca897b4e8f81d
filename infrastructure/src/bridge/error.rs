//! Error types for the hub connection

use chatbridge_application::StartError;
use chatbridge_domain::{DomainError, SessionState};
use std::time::Duration;
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while talking to the hub
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Authentication rejected: {0}")]
    Auth(String),

    /// A well-framed body that could not be decoded. Only this frame is lost.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Frame boundaries can no longer be trusted.
    #[error("Broken framing: {0}")]
    Framing(String),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("Transport closed")]
    TransportClosed,

    #[error("Handshake did not complete within {0:?}")]
    HandshakeTimeout(Duration),

    #[error("Operation not valid while {0}")]
    InvalidState(SessionState),

    #[error("Session is not running")]
    NotRunning,

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl BridgeError {
    /// Whether the connection survives this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BridgeError::Protocol(_))
    }
}

impl From<BridgeError> for StartError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::Auth(message) => StartError::Auth(message),
            BridgeError::InvalidState(state) => {
                StartError::Rejected(format!("session is {}", state))
            }
            other => StartError::Connection(other.to_string()),
        }
    }
}
