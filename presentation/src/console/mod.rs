//! Interactive console driving a bridge client from stdin

mod repl;

pub use repl::{ConsoleRepl, ReplExit};

/// A line typed at the console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Ask another client who is online there
    Online(String),
    Status,
    Restart,
    Reload,
    Quit,
    Help,
    /// `!!online` without a target
    Usage(&'static str),
    /// Anything else is relayed as chat
    Chat(String),
    Empty,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ConsoleCommand::Empty;
        }

        let mut parts = trimmed.split_whitespace();
        let head = parts.next().unwrap_or_default();
        match head {
            "!!online" => match parts.next() {
                Some(client) => ConsoleCommand::Online(client.to_string()),
                None => ConsoleCommand::Usage("!!online <client>"),
            },
            "!!status" => ConsoleCommand::Status,
            "!!restart" => ConsoleCommand::Restart,
            "!!reload" => ConsoleCommand::Reload,
            "!!quit" | "!!exit" => ConsoleCommand::Quit,
            "!!help" | "!!?" => ConsoleCommand::Help,
            _ => ConsoleCommand::Chat(line.trim_end().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_online() {
        assert_eq!(
            ConsoleCommand::parse("!!online survival"),
            ConsoleCommand::Online("survival".to_string())
        );
        assert_eq!(
            ConsoleCommand::parse("  !!online   lobby  extra"),
            ConsoleCommand::Online("lobby".to_string())
        );
        assert!(matches!(
            ConsoleCommand::parse("!!online"),
            ConsoleCommand::Usage(_)
        ));
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!(ConsoleCommand::parse("!!status"), ConsoleCommand::Status);
        assert_eq!(ConsoleCommand::parse("!!restart"), ConsoleCommand::Restart);
        assert_eq!(ConsoleCommand::parse("!!reload"), ConsoleCommand::Reload);
        assert_eq!(ConsoleCommand::parse("!!quit"), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("!!exit"), ConsoleCommand::Quit);
        assert_eq!(ConsoleCommand::parse("!!help"), ConsoleCommand::Help);
    }

    #[test]
    fn test_parse_chat_keeps_leading_whitespace() {
        assert_eq!(
            ConsoleCommand::parse("  indented hello \n"),
            ConsoleCommand::Chat("  indented hello".to_string())
        );
        // Unknown !! commands go to the hub; other clients may handle them
        assert_eq!(
            ConsoleCommand::parse("!!console restart"),
            ConsoleCommand::Chat("!!console restart".to_string())
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(ConsoleCommand::parse(""), ConsoleCommand::Empty);
        assert_eq!(ConsoleCommand::parse("   \t"), ConsoleCommand::Empty);
    }
}
