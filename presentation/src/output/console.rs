//! Console output formatter for bridged traffic

use chatbridge_domain::{ChatPayload, chunk};
use chatbridge_infrastructure::ClientStatus;
use chrono::Local;
use colored::Colorize;

/// Formats bridged traffic and local notices for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    fn timestamp() -> String {
        Local::now().format("%H:%M:%S").to_string()
    }

    /// Render an inbound chat message as one block per chunk.
    ///
    /// Long messages are split on line boundaries so no printed block
    /// exceeds `limit` characters of message text.
    pub fn chat(sender: &str, payload: &ChatPayload, limit: usize) -> Vec<String> {
        let time = Self::timestamp();
        let tag = format!("[{}]", sender).cyan().bold();
        chunk(&payload.formatted(), limit)
            .into_iter()
            .map(|block| format!("{} {} {}", time.dimmed(), tag, block))
            .collect()
    }

    /// Render the answer to an online query.
    pub fn online_list(client: &str, names: &[String]) -> String {
        let header = format!("====== {} online ======", client).green().bold();
        if names.is_empty() {
            format!("{}\n(nobody)", header)
        } else {
            format!("{}\n{}", header, names.join(", "))
        }
    }

    pub fn status(status: &ClientStatus) -> String {
        let state = if status.online {
            status.state.to_string().green()
        } else {
            status.state.to_string().yellow()
        };
        format!(
            "{} {}\n  state: {}\n  online: {}\n  ping: {}\n  sessions started: {}",
            "Client".cyan().bold(),
            status.name,
            state,
            status.online,
            status.ping_text(),
            status.attempts
        )
    }

    pub fn notice(message: &str) -> String {
        format!("{} {}", Self::timestamp().dimmed(), message.yellow())
    }

    pub fn error(message: &str) -> String {
        format!("{} {}", "Error:".red().bold(), message)
    }

    pub fn help() -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", "Commands:".cyan().bold()));
        output.push_str("  !!online <client>  Ask <client> who is online\n");
        output.push_str("  !!status           Show connection status\n");
        output.push_str("  !!restart          Reconnect\n");
        output.push_str("  !!reload           Re-read configuration and reconnect\n");
        output.push_str("  !!quit             Disconnect and exit\n");
        output.push_str("  !!help             Show this help\n");
        output.push_str("Anything else is sent as chat.");
        output
    }
}
