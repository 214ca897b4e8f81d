//! Domain error types

use crate::session::SessionState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),
}

impl DomainError {
    /// Check if this error was raised by the session state machine
    pub fn is_transition(&self) -> bool {
        matches!(self, DomainError::InvalidTransition { .. })
    }
}
