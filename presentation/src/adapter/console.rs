//! Console adapter
//!
//! Prints bridged chat to stdout and answers online queries with the
//! configured roster. Messages addressed to consoles with a
//! [`CONSOLE_PREFIXES`] prefix have the prefix stripped before printing.

use crate::config::ConsoleConfig;
use crate::output::console::ConsoleFormatter;
use async_trait::async_trait;
use chatbridge_application::{AdapterError, BridgeAdapter};
use chatbridge_domain::{ChatPayload, CommandPayload, ONLINE_COMMAND, OnlineQueryResult};
use serde_json::Value;
use tracing::debug;

/// Chat prefixes that address console clients.
pub const CONSOLE_PREFIXES: [&str; 2] = ["!!console", "!!cb"];

pub struct ConsoleAdapter {
    config: ConsoleConfig,
}

impl ConsoleAdapter {
    pub fn new(config: ConsoleConfig) -> Self {
        Self { config }
    }

    /// Blocks that `on_chat` prints for a message.
    pub fn render_chat(&self, sender: &str, mut payload: ChatPayload) -> Vec<String> {
        if let Some(prefix) = payload.strip_prefix(&CONSOLE_PREFIXES) {
            debug!("Stripped {} from chat by {}", prefix, sender);
        }
        ConsoleFormatter::chat(sender, &payload, self.config.chunk_limit)
    }

    /// Answer to an inbound command, if this console knows it.
    pub fn answer_command(&self, payload: &CommandPayload) -> Result<Option<Value>, AdapterError> {
        if payload.command == ONLINE_COMMAND {
            Ok(Some(
                OnlineQueryResult::new(self.config.roster.iter().cloned()).to_value(),
            ))
        } else {
            Err(AdapterError::UnsupportedCommand(payload.command.clone()))
        }
    }
}

#[async_trait]
impl BridgeAdapter for ConsoleAdapter {
    async fn on_chat(&self, sender: &str, payload: ChatPayload) -> Result<(), AdapterError> {
        for block in self.render_chat(sender, payload) {
            println!("{}", block);
        }
        Ok(())
    }

    async fn on_command(
        &self,
        sender: &str,
        payload: CommandPayload,
    ) -> Result<Option<Value>, AdapterError> {
        debug!("{} asked {} {:?}", sender, payload.command, payload.params);
        self.answer_command(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> ConsoleAdapter {
        colored::control::set_override(false);
        ConsoleAdapter::new(ConsoleConfig {
            roster: vec!["steve".to_string()],
            ..Default::default()
        })
    }

    #[test]
    fn test_render_strips_console_prefix() {
        let blocks = adapter().render_chat("lobby", ChatPayload::new("bob", "!!console restart at 5"));
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].ends_with("[lobby] [bob] restart at 5"));
    }

    #[test]
    fn test_render_keeps_unprefixed_message() {
        let blocks = adapter().render_chat("lobby", ChatPayload::new("bob", "hello"));
        assert!(blocks[0].ends_with("[bob] hello"));
    }

    #[test]
    fn test_answers_online_with_roster() {
        let payload = CommandPayload::new(ONLINE_COMMAND, vec![]);
        let answer = adapter().answer_command(&payload).unwrap().unwrap();
        let answered = payload.answered(Some(answer));
        let online = OnlineQueryResult::from_payload(&answered).unwrap().unwrap();
        assert_eq!(online.data, vec!["steve"]);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let payload = CommandPayload::new("!!teleport", vec![]);
        assert!(matches!(
            adapter().answer_command(&payload),
            Err(AdapterError::UnsupportedCommand(c)) if c == "!!teleport"
        ));
    }

    #[tokio::test]
    async fn test_on_chat_succeeds() {
        let adapter = adapter();
        assert!(adapter.on_chat("lobby", ChatPayload::new("bob", "hi")).await.is_ok());
    }
}
