//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chatbridge
#[derive(Parser, Debug)]
#[command(name = "chatbridge")]
#[command(author, version, about = "Bridge client for a chat and command relay hub")]
#[command(long_about = r#"
chatbridge connects to a relay hub, prints the chat it receives and sends
every line typed on stdin as chat. Lines starting with !! are local commands:

  !!online <client>   Ask <client> who is online
  !!status            Show connection status
  !!restart           Reconnect
  !!reload            Re-read configuration and reconnect
  !!quit              Disconnect and exit

Configuration files are loaded from (in priority order):
1. --config <path>                       Explicit config file
2. CHATBRIDGE_<SECTION>__<KEY>           Environment variables
3. ./chatbridge.toml                     Project-level config
4. ~/.config/chatbridge/config.toml      Global config

Example:
  chatbridge --name survival --host hub.example.org
  chatbridge -vv --config ./bridge.toml
"#)]
pub struct Cli {
    /// Client name to register under (overrides [client] name)
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// Hub host (overrides [server] host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Hub port (overrides [server] port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Connect over TLS (overrides [server] tls)
    #[arg(long)]
    pub tls: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write daily-rotated log files to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::parse_from([
            "chatbridge",
            "--name",
            "survival",
            "--host",
            "hub.example.org",
            "-p",
            "31000",
            "-vv",
        ]);
        assert_eq!(cli.name.as_deref(), Some("survival"));
        assert_eq!(cli.host.as_deref(), Some("hub.example.org"));
        assert_eq!(cli.port, Some(31000));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.tls);
        assert!(!cli.no_config);
    }
}
