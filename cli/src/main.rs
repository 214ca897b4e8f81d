//! CLI entrypoint for chatbridge
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, anyhow, bail};
use chatbridge_application::{Connector, Guardian, HandoffSignal, handoff_channel};
use chatbridge_infrastructure::{ChatBridgeClient, ConfigLoader, FileConfig, TcpConnector};
use chatbridge_presentation::{Cli, ConsoleAdapter, ConsoleConfig, ConsoleRepl, ReplExit};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let mut file_config = load_config(&cli)?;
    let _log_guard = init_logging(&cli, &file_config);

    if cli.no_color || !file_config.console.color {
        colored::control::set_override(false);
    }

    info!("Starting chatbridge as {}", file_config.client.name);

    // === Dependency Injection ===
    let connector: Arc<dyn Connector> = Arc::new(TcpConnector::new());
    let mut repl = ConsoleRepl::stdin(ConsoleConfig::from(&file_config.console));
    let mut handoff: Option<HandoffSignal> = None;

    loop {
        let console = ConsoleConfig::from(&file_config.console);
        let client = Arc::new(ChatBridgeClient::new(
            file_config.to_client_config()?,
            Arc::clone(&connector),
            Arc::new(ConsoleAdapter::new(console.clone())),
        ));
        repl.set_console(console);

        let alive = Arc::new(AtomicBool::new(true));
        let mut guardian = Guardian::new(Arc::clone(&client), file_config.to_guardian_config())
            .with_loop_condition({
                let alive = Arc::clone(&alive);
                move || alive.load(Ordering::SeqCst)
            });
        if let Some(signal) = handoff.take() {
            guardian = guardian.with_handoff(signal);
        }
        let guardian_task = guardian.spawn();

        let next = loop {
            let exit = tokio::select! {
                exit = repl.run(&client) => exit,
                _ = tokio::signal::ctrl_c() => ReplExit::Quit,
            };
            match exit {
                ReplExit::Quit => break None,
                ReplExit::Reload => match load_config(&cli) {
                    Ok(next) => break Some(next),
                    Err(e) => eprintln!("Reload failed, keeping current configuration: {:#}", e),
                },
            }
        };

        alive.store(false, Ordering::SeqCst);
        guardian_task.abort();

        match next {
            None => {
                client.stop("console closed").await;
                break;
            }
            Some(next) => {
                info!("Configuration reloaded; handing over to a new client");
                // The new guardian waits until the old session has said goodbye
                let (notifier, signal) = handoff_channel();
                tokio::spawn(async move {
                    client.stop("configuration reload").await;
                    notifier.notify_stopped();
                });
                handoff = Some(signal);
                file_config = next;
            }
        }
    }

    info!("chatbridge stopped");
    Ok(())
}

/// Load, override and validate configuration.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow!("{}", e))?
    };

    // CLI arguments override file configuration
    if let Some(name) = &cli.name {
        config.client.name = name.clone();
    }
    if let Some(host) = &cli.host {
        config.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if cli.tls {
        config.server.tls = true;
    }
    if let Some(dir) = &cli.log_dir {
        config.logging.directory = Some(dir.display().to_string());
    }

    let issues = config.validate();
    if !issues.is_empty() {
        let list: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", list.join("\n"));
    }
    Ok(config)
}

fn init_logging(cli: &Cli, config: &FileConfig) -> Option<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match &config.logging.directory {
        Some(dir) => {
            let appender =
                tracing_appender::rolling::daily(PathBuf::from(dir), &config.logging.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::io::stderr.and(writer))
                .init();
            Some(guard)
        }
        None => {
            // stdout carries chat; keep diagnostics off it
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}
