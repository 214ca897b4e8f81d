//! Line loop reading console input

use super::ConsoleCommand;
use crate::config::ConsoleConfig;
use crate::output::console::ConsoleFormatter;
use chatbridge_domain::{ONLINE_COMMAND, OnlineQueryResult};
use chatbridge_infrastructure::ChatBridgeClient;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

/// Why the line loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplExit {
    /// `!!quit` or end of input
    Quit,
    /// Re-read configuration and hand over to a new client
    Reload,
}

/// Interactive console over any line source (stdin in the binary)
pub struct ConsoleRepl<R = BufReader<Stdin>> {
    lines: Lines<R>,
    config: ConsoleConfig,
}

impl ConsoleRepl {
    /// Console reading from stdin
    pub fn stdin(config: ConsoleConfig) -> Self {
        Self::with_input(BufReader::new(tokio::io::stdin()), config)
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleRepl<R> {
    pub fn with_input(input: R, config: ConsoleConfig) -> Self {
        Self {
            lines: input.lines(),
            config,
        }
    }

    /// Replace settings after a configuration reload
    pub fn set_console(&mut self, config: ConsoleConfig) {
        self.config = config;
    }

    /// Read and execute lines until quit, reload or end of input.
    ///
    /// Reading stdin is cancel-safe at line granularity, so the caller may
    /// race this against a shutdown signal.
    pub async fn run(&mut self, client: &Arc<ChatBridgeClient>) -> ReplExit {
        loop {
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return ReplExit::Quit,
                Err(e) => {
                    warn!("Console input failed: {}", e);
                    return ReplExit::Quit;
                }
            };

            match ConsoleCommand::parse(&line) {
                ConsoleCommand::Empty => {}
                ConsoleCommand::Quit => return ReplExit::Quit,
                ConsoleCommand::Reload => return ReplExit::Reload,
                ConsoleCommand::Help => println!("{}", ConsoleFormatter::help()),
                ConsoleCommand::Usage(usage) => {
                    println!("{}", ConsoleFormatter::error(&format!("usage: {}", usage)))
                }
                ConsoleCommand::Status => {
                    println!("{}", ConsoleFormatter::status(&client.status()))
                }
                ConsoleCommand::Restart => match client.restart("console restart").await {
                    Ok(()) => println!("{}", ConsoleFormatter::notice("Reconnected")),
                    Err(e) => println!("{}", ConsoleFormatter::error(&e.to_string())),
                },
                ConsoleCommand::Online(target) => self.query_online(client, &target).await,
                ConsoleCommand::Chat(message) => {
                    if let Err(e) = client.send_chat(&message, &self.config.author).await {
                        println!("{}", ConsoleFormatter::error(&e.to_string()));
                    }
                }
            }
        }
    }

    async fn query_online(&self, client: &Arc<ChatBridgeClient>, target: &str) {
        let handle = match client.send_command(target, ONLINE_COMMAND, Vec::new()).await {
            Ok(handle) => handle,
            Err(e) => {
                println!("{}", ConsoleFormatter::error(&e.to_string()));
                return;
            }
        };
        debug!("Waiting for online list from {}", target);

        let answer = handle.wait().await;
        match OnlineQueryResult::from_payload(&answer) {
            Some(Ok(online)) => println!("{}", ConsoleFormatter::online_list(target, &online.data)),
            Some(Err(e)) => println!(
                "{}",
                ConsoleFormatter::error(&format!("{} sent a malformed list: {}", target, e))
            ),
            None => println!(
                "{}",
                ConsoleFormatter::notice(&format!("{} is offline or did not respond", target))
            ),
        }
    }
}
