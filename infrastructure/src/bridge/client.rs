//! Client facade over successive sessions.
//!
//! [`ChatBridgeClient`] is what adapters and the guardian hold on to. It
//! creates a fresh [`Session`] for every start, keeps the correlator
//! across sessions, and serializes `start`/`restart` so a manual restart
//! and the guardian never bring up two sessions at once.

use crate::bridge::error::{BridgeError, Result};
use crate::bridge::session::Session;
use async_trait::async_trait;
use chatbridge_application::{
    BridgeAdapter, ClientConfig, CommandHandle, Connector, Correlator, StartError, Supervised,
};
use chatbridge_domain::{CommandPayload, SessionState};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Point-in-time view of the client, for status output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientStatus {
    pub name: String,
    pub state: SessionState,
    pub online: bool,
    pub ping: Option<Duration>,
    /// Sessions started so far, successful or not.
    pub attempts: u64,
}

impl ClientStatus {
    pub fn ping_text(&self) -> String {
        match self.ping {
            Some(rtt) => format!("{:.1}ms", rtt.as_secs_f64() * 1000.0),
            None => "N/A".to_string(),
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (online: {}, ping: {}, attempts: {})",
            self.name,
            self.state,
            self.online,
            self.ping_text(),
            self.attempts
        )
    }
}

pub struct ChatBridgeClient {
    config: Arc<ClientConfig>,
    connector: Arc<dyn Connector>,
    adapter: Arc<dyn BridgeAdapter>,
    correlator: Arc<Correlator>,
    session: RwLock<Option<Arc<Session>>>,
    lifecycle: Mutex<()>,
    attempts: AtomicU64,
}

impl ChatBridgeClient {
    pub fn new(
        config: ClientConfig,
        connector: Arc<dyn Connector>,
        adapter: Arc<dyn BridgeAdapter>,
    ) -> Self {
        let correlator = Arc::new(Correlator::new(config.command_timeout));
        Self {
            config: Arc::new(config),
            connector,
            adapter,
            correlator,
            session: RwLock::new(None),
            lifecycle: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a new session. Rejected while a session is active.
    pub async fn start(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        self.start_locked().await
    }

    async fn start_locked(&self) -> Result<()> {
        let state = self.state();
        if state.is_active() {
            return Err(BridgeError::InvalidState(state));
        }

        let session = Session::new(
            Arc::clone(&self.config),
            Arc::clone(&self.adapter),
            Arc::clone(&self.correlator),
        );
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&session));
        let attempt = self.attempts.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("Starting session attempt {} for {}", attempt, self.name());

        session.start(self.connector.as_ref()).await
    }

    /// Stop the current session, if any. Idempotent.
    pub async fn stop(&self, reason: &str) {
        if let Some(session) = self.current() {
            session.stop(reason).await;
        }
    }

    /// Stop then start, serialized against other starts.
    pub async fn restart(&self, reason: &str) -> Result<()> {
        let _guard = self.lifecycle.lock().await;
        info!("Restarting {}: {}", self.name(), reason);
        if let Some(session) = self.current() {
            session.stop(reason).await;
        }
        self.start_locked().await
    }

    pub fn state(&self) -> SessionState {
        self.current()
            .map(|session| session.state())
            .unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    pub fn is_online(&self) -> bool {
        self.current().is_some_and(|session| session.is_online())
    }

    pub fn status(&self) -> ClientStatus {
        let session = self.current();
        ClientStatus {
            name: self.name().to_string(),
            state: session
                .as_ref()
                .map(|s| s.state())
                .unwrap_or_default(),
            online: session.as_ref().is_some_and(|s| s.is_online()),
            ping: session.as_ref().and_then(|s| s.ping()),
            attempts: self.attempts.load(Ordering::Relaxed),
        }
    }

    pub async fn send_chat(&self, message: &str, author: &str) -> Result<()> {
        self.running_session()?.send_chat(message, author).await
    }

    pub async fn send_command(
        &self,
        target: &str,
        command: &str,
        params: Vec<String>,
    ) -> Result<CommandHandle> {
        self.running_session()?
            .send_command(target, command, params)
            .await
    }

    /// Answer a request outside the adapter callback, e.g. after slow work.
    pub async fn reply_command(
        &self,
        target: &str,
        request: CommandPayload,
        result: Option<Value>,
    ) -> Result<()> {
        self.running_session()?
            .reply_command(target, request, result)
            .await
    }

    fn current(&self) -> Option<Arc<Session>> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn running_session(&self) -> Result<Arc<Session>> {
        self.current()
            .filter(|session| session.is_running())
            .ok_or(BridgeError::NotRunning)
    }
}

#[async_trait]
impl Supervised for ChatBridgeClient {
    fn name(&self) -> &str {
        self.config.name()
    }

    /// Any attempt in progress counts, so the guardian never races a
    /// handshake or a teardown.
    fn is_running(&self) -> bool {
        self.state().is_active()
    }

    async fn start(&self) -> std::result::Result<(), StartError> {
        ChatBridgeClient::start(self).await.map_err(StartError::from)
    }
}
