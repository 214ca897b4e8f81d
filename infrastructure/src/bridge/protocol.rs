//! Wire protocol types for hub communication.
//!
//! Every frame body is a JSON object tagged by `"type"`:
//!
//! - **Handshake**: `login` (client → hub, first frame), `login_result`
//! - **Liveness**: `keep_alive` in both directions; `ping: true` must be
//!   answered with `ping: false`
//! - **Traffic**: `chat`, `command`, `command_result`
//! - **Farewell**: `goodbye`

use chatbridge_domain::{ChatPayload, CommandPayload, DomainError, PayloadKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    Login {
        name: String,
        password: String,
    },
    LoginResult {
        success: bool,
        #[serde(default)]
        message: String,
    },
    KeepAlive {
        ping: bool,
    },
    Chat {
        sender: String,
        payload: ChatPayload,
    },
    Command {
        sender: String,
        receiver: String,
        payload: CommandPayload,
    },
    CommandResult {
        sender: String,
        receiver: String,
        payload: CommandPayload,
    },
    Goodbye {
        #[serde(default)]
        reason: String,
    },
}

impl Frame {
    /// Wire tag of this frame.
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Login { .. } => "login",
            Frame::LoginResult { .. } => "login_result",
            Frame::KeepAlive { .. } => "keep_alive",
            Frame::Chat { .. } => "chat",
            Frame::Command { .. } => "command",
            Frame::CommandResult { .. } => "command_result",
            Frame::Goodbye { .. } => "goodbye",
        }
    }

    /// Payload kind for traffic frames, `None` for control frames.
    pub fn payload_kind(&self) -> Option<PayloadKind> {
        match self {
            Frame::Chat { .. } => Some(PayloadKind::Chat),
            Frame::Command { .. } => Some(PayloadKind::Command),
            Frame::CommandResult { .. } => Some(PayloadKind::CommandResult),
            _ => None,
        }
    }

    /// Structural checks serde cannot express.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            Frame::Command { payload, .. } | Frame::CommandResult { payload, .. } => {
                payload.validate()
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_frame_shape() {
        let frame = Frame::Chat {
            sender: "survival".into(),
            payload: ChatPayload::new("alice", "hello"),
        };
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "chat",
                "sender": "survival",
                "payload": {"author": "alice", "message": "hello"}
            })
        );
    }

    #[test]
    fn test_command_result_decodes() {
        let frame: Frame = serde_json::from_value(json!({
            "type": "command_result",
            "sender": "survival",
            "receiver": "console",
            "payload": {
                "command": "!!online",
                "params": [],
                "request_id": 7,
                "responded": true,
                "result": {"data": ["steve"]}
            }
        }))
        .unwrap();
        assert_eq!(frame.kind(), "command_result");
        assert_eq!(frame.payload_kind(), Some(PayloadKind::CommandResult));
        assert!(frame.validate().is_ok());
    }

    #[test]
    fn test_unknown_type_fails() {
        let result: Result<Frame, _> = serde_json::from_value(json!({"type": "teleport"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_unanswered_result() {
        let mut payload = CommandPayload::new("!!online", vec![]);
        payload.result = Some(json!(1));
        let frame = Frame::Command {
            sender: "a".into(),
            receiver: "b".into(),
            payload,
        };
        assert!(frame.validate().is_err());
    }

    #[test]
    fn test_control_frames_have_no_payload_kind() {
        assert_eq!(Frame::KeepAlive { ping: true }.payload_kind(), None);
        assert_eq!(
            Frame::Goodbye {
                reason: String::new()
            }
            .payload_kind(),
            None
        );
    }
}
