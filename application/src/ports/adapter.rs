//! Port for platform bindings.
//!
//! A [`BridgeAdapter`] receives what the hub routes to this client and
//! decides what it means on the local platform (a chat room, a game
//! server console, a terminal). The session calls it from its reader task,
//! so an adapter that blocks for long delays every subsequent frame.

use async_trait::async_trait;
use chatbridge_domain::{ChatPayload, CommandPayload};
use serde_json::Value;
use thiserror::Error;

/// Errors a platform binding can report back to the session.
///
/// These never tear the session down; the session logs them and moves on.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Platform rejected the message: {0}")]
    Platform(String),

    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),

    #[error("Adapter error: {0}")]
    Other(String),
}

/// Callbacks the session invokes for inbound traffic.
#[async_trait]
pub trait BridgeAdapter: Send + Sync {
    /// A chat message relayed by `sender`.
    async fn on_chat(&self, sender: &str, payload: ChatPayload) -> Result<(), AdapterError>;

    /// A command addressed to this client.
    ///
    /// For a request, `Ok(Some(value))` is sent back to `sender` as the
    /// command result and `Ok(None)` sends an empty answer. Results for
    /// commands this client issued never reach the adapter.
    async fn on_command(
        &self,
        sender: &str,
        payload: CommandPayload,
    ) -> Result<Option<Value>, AdapterError>;
}

/// Adapter that drops everything. Useful for send-only clients and tests.
pub struct NoAdapter;

#[async_trait]
impl BridgeAdapter for NoAdapter {
    async fn on_chat(&self, _sender: &str, _payload: ChatPayload) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn on_command(
        &self,
        _sender: &str,
        _payload: CommandPayload,
    ) -> Result<Option<Value>, AdapterError> {
        Ok(None)
    }
}
