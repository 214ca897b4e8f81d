//! Presentation layer for chatbridge
//!
//! This crate contains the CLI definitions, the console adapter (a
//! reference platform binding that prints bridged traffic to a terminal)
//! and the interactive line loop driving a client from stdin.

pub mod adapter;
pub mod cli;
pub mod config;
pub mod console;
pub mod output;

// Re-export commonly used types
pub use adapter::ConsoleAdapter;
pub use cli::commands::Cli;
pub use config::ConsoleConfig;
pub use console::{ConsoleCommand, ConsoleRepl, ReplExit};
pub use output::console::ConsoleFormatter;
