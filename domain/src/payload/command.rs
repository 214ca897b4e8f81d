//! Command payload.
//!
//! A command travels twice: once as a request (`responded == false`, no
//! result) and once back as a result (`responded == true`, result
//! optional). An explicitly empty answer is `responded == true` with no
//! result, which is different from "no answer yet".

use crate::core::error::DomainError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Issuer-assigned id that disambiguates concurrent requests for the same
/// command name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A command request or its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    /// Command token, e.g. `!!online`.
    pub command: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub request_id: RequestId,
    #[serde(default)]
    pub responded: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl CommandPayload {
    /// A fresh, unanswered request.
    pub fn new(command: impl Into<String>, params: Vec<String>) -> Self {
        Self {
            command: command.into(),
            params,
            request_id: RequestId::default(),
            responded: false,
            result: None,
        }
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Attach the answer. Only the first call has any effect.
    ///
    /// Returns `false` if the payload had already been answered; the
    /// earlier result is kept.
    pub fn attach_result(&mut self, result: Option<serde_json::Value>) -> bool {
        if self.responded {
            return false;
        }
        self.responded = true;
        self.result = result;
        true
    }

    /// Consume a request and return the answered copy.
    pub fn answered(mut self, result: Option<serde_json::Value>) -> Self {
        self.attach_result(result);
        self
    }

    pub fn is_request(&self) -> bool {
        !self.responded
    }

    /// Deserialize the result blob into a typed value.
    ///
    /// `None` when unanswered or answered empty.
    pub fn result_as<T: DeserializeOwned>(&self) -> Option<Result<T, DomainError>> {
        let value = self.result.as_ref()?;
        Some(
            serde_json::from_value(value.clone())
                .map_err(|e| DomainError::InvalidPayload(format!("{}: {}", self.command, e))),
        )
    }

    /// Check the structural invariant: a result only exists once answered.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.command.is_empty() {
            return Err(DomainError::InvalidPayload(
                "command name cannot be empty".to_string(),
            ));
        }
        if !self.responded && self.result.is_some() {
            return Err(DomainError::InvalidPayload(format!(
                "{} {} carries a result but is not marked responded",
                self.command, self.request_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_request_is_unanswered() {
        let payload = CommandPayload::new("!!online", vec![]);
        assert!(payload.is_request());
        assert!(!payload.responded);
        assert!(payload.result.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_attach_result_only_once() {
        let mut payload = CommandPayload::new("!!online", vec![]);
        assert!(payload.attach_result(Some(json!({"data": ["steve"]}))));
        assert!(!payload.attach_result(Some(json!({"data": ["alex"]}))));
        assert_eq!(payload.result, Some(json!({"data": ["steve"]})));
    }

    #[test]
    fn test_empty_answer_is_still_responded() {
        let payload = CommandPayload::new("!!online", vec![]).answered(None);
        assert!(payload.responded);
        assert!(payload.result.is_none());
        assert!(payload.result_as::<Vec<String>>().is_none());
    }

    #[test]
    fn test_validate_rejects_result_without_responded() {
        let mut payload = CommandPayload::new("!!online", vec![]);
        payload.result = Some(json!(1));
        assert!(payload.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        assert!(CommandPayload::new("", vec![]).validate().is_err());
    }

    #[test]
    fn test_result_as_reports_type_mismatch() {
        let payload = CommandPayload::new("!!online", vec![]).answered(Some(json!("nope")));
        let parsed = payload.result_as::<Vec<String>>().unwrap();
        assert!(parsed.is_err());
    }

    #[test]
    fn test_request_id_defaults_on_decode() {
        let payload: CommandPayload =
            serde_json::from_str(r#"{"command":"!!online","params":["survival"]}"#).unwrap();
        assert_eq!(payload.request_id, RequestId::new(0));
        assert_eq!(payload.params, vec!["survival".to_string()]);
        assert!(!payload.responded);
    }
}
