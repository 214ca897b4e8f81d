//! Bridged payloads.
//!
//! A [`PayloadKind`] tags every frame on the wire so the receiver can
//! dispatch without ambiguity. Requests and results share the
//! [`CommandPayload`](command::CommandPayload) body and differ only in kind.

pub mod chat;
pub mod command;
pub mod online;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of payload carried by a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Chat,
    Command,
    CommandResult,
}

impl PayloadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Chat => "chat",
            PayloadKind::Command => "command",
            PayloadKind::CommandResult => "command_result",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
