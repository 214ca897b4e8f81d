//! `!!online` query result.

use crate::core::error::DomainError;
use crate::payload::command::CommandPayload;
use serde::{Deserialize, Serialize};

/// Command token for "who is online on server X".
pub const ONLINE_COMMAND: &str = "!!online";

/// Ordered list of names currently online on the answering endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineQueryResult {
    #[serde(default)]
    pub data: Vec<String>,
}

impl OnlineQueryResult {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            data: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Serialize into a command result blob.
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "data": self.data })
    }

    /// Read the result out of an answered `!!online` command.
    ///
    /// `None` when the command was not answered or answered empty.
    pub fn from_payload(payload: &CommandPayload) -> Option<Result<Self, DomainError>> {
        payload.result_as::<Self>()
    }
}
