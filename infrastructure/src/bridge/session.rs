//! One authenticated connection to the hub.
//!
//! A [`Session`] is created per connection attempt and never reused. After
//! the handshake it owns two background tasks:
//!
//! - the **receive loop**, which exclusively owns the read half, decodes
//!   frames and dispatches them to the adapter or the correlator
//! - the **keep-alive loop**, which pings the hub, sweeps expired
//!   correlation entries and drops the connection when it goes silent
//!
//! Writes from every caller go through a single `Mutex` around the write
//! half so frames never interleave on the wire. Both loops stop on the
//! session's [`CancellationToken`]; whichever side notices the connection is
//! gone runs the teardown exactly once.

use crate::bridge::codec::{FrameReader, encode_frame};
use crate::bridge::error::{BridgeError, Result};
use crate::bridge::protocol::Frame;
use chatbridge_application::{
    AdapterError, BoxedStream, BridgeAdapter, ClientConfig, CommandHandle, Connector, Correlator,
};
use chatbridge_domain::{ChatPayload, CommandPayload, SessionState};
use futures::FutureExt;
use serde_json::Value;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter, ReadHalf, WriteHalf};
use tokio::sync::{Mutex, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Bound on the farewell write and the transport shutdown during stop.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

type FrameSource = FrameReader<BufReader<ReadHalf<BoxedStream>>>;
type FrameSink = BufWriter<WriteHalf<BoxedStream>>;

#[derive(Default)]
struct PingState {
    sent_at: Option<Instant>,
    last_rtt: Option<Duration>,
}

pub struct Session {
    config: Arc<ClientConfig>,
    adapter: Arc<dyn BridgeAdapter>,
    correlator: Arc<Correlator>,
    state: watch::Sender<SessionState>,
    writer: Mutex<Option<FrameSink>>,
    cancel: CancellationToken,
    close_reason: StdMutex<Option<String>>,
    last_activity: StdMutex<Instant>,
    last_read: StdMutex<Instant>,
    ping: StdMutex<PingState>,
}

impl Session {
    pub fn new(
        config: Arc<ClientConfig>,
        adapter: Arc<dyn BridgeAdapter>,
        correlator: Arc<Correlator>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Arc::new(Self {
            config,
            adapter,
            correlator,
            state,
            writer: Mutex::new(None),
            cancel: CancellationToken::new(),
            close_reason: StdMutex::new(None),
            last_activity: StdMutex::new(Instant::now()),
            last_read: StdMutex::new(Instant::now()),
            ping: StdMutex::new(PingState::default()),
        })
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.state().accepts_traffic()
    }

    /// Running and heard from (or written to) within the liveness window.
    pub fn is_online(&self) -> bool {
        self.is_running() && self.idle_for() <= self.config.liveness_window
    }

    /// Round-trip time of the last answered keep-alive ping.
    pub fn ping(&self) -> Option<Duration> {
        lock(&self.ping).last_rtt
    }

    /// Resolves once the session is back in `Disconnected`.
    pub async fn closed(&self) {
        let mut rx = self.state.subscribe();
        let _ = rx.wait_for(|s| *s == SessionState::Disconnected).await;
    }

    /// Connect, authenticate and spawn the background loops.
    ///
    /// Only valid from `Disconnected`. On any failure the session ends up
    /// back in `Disconnected`; it never retries on its own.
    pub async fn start(self: &Arc<Self>, connector: &dyn Connector) -> Result<()> {
        self.transition(SessionState::Connecting)?;
        info!("Connecting to {} as {}", self.config.endpoint, self.name());

        let timeout = self.config.handshake_timeout;
        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => Err(BridgeError::InvalidState(SessionState::Stopping)),
            result = tokio::time::timeout(timeout, self.handshake(connector)) => {
                result.unwrap_or(Err(BridgeError::HandshakeTimeout(timeout)))
            }
        };

        let (reader, writer) = match outcome {
            Ok(parts) => parts,
            Err(e) => {
                warn!("Handshake with {} failed: {}", self.config.endpoint, e);
                self.abandon_attempt();
                return Err(e);
            }
        };

        *self.writer.lock().await = Some(writer);
        if let Err(e) = self
            .transition(SessionState::Authenticated)
            .and_then(|_| self.transition(SessionState::Running))
        {
            // Stopped while the handshake was finishing
            if let Some(mut writer) = self.writer.lock().await.take() {
                let _ = tokio::time::timeout(CLOSE_TIMEOUT, writer.shutdown()).await;
            }
            self.abandon_attempt();
            return Err(e);
        }

        self.touch_read();
        info!("Session {} running", self.name());
        tokio::spawn(Arc::clone(self).receive_loop(reader));
        tokio::spawn(Arc::clone(self).keep_alive_loop());
        Ok(())
    }

    async fn handshake(&self, connector: &dyn Connector) -> Result<(FrameSource, FrameSink)> {
        let stream = connector.connect(&self.config.endpoint).await?;
        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = FrameReader::new(BufReader::new(read_half));
        let mut writer = BufWriter::new(write_half);

        let login = Frame::Login {
            name: self.config.identity.name().to_string(),
            password: self.config.identity.secret().to_string(),
        };
        writer.write_all(&encode_frame(&login)?).await?;
        writer.flush().await?;
        debug!("Login sent for {}", self.name());

        loop {
            match reader.read_frame().await {
                Ok(Some(Frame::LoginResult { success: true, .. })) => break,
                Ok(Some(Frame::LoginResult { message, .. })) => {
                    return Err(BridgeError::Auth(if message.is_empty() {
                        "rejected by hub".to_string()
                    } else {
                        message
                    }));
                }
                Ok(Some(other)) => match other.payload_kind() {
                    Some(kind) => warn!("Dropping {} payload received before login result", kind),
                    None => debug!("Ignoring {} frame before login result", other.kind()),
                },
                Ok(None) => return Err(BridgeError::TransportClosed),
                Err(e) if e.is_recoverable() => warn!("Dropping frame during handshake: {}", e),
                Err(e) => return Err(e),
            }
        }
        Ok((reader, writer))
    }

    /// Stop the session. Idempotent; returns once `Disconnected`.
    pub async fn stop(&self, reason: &str) {
        if self.state() == SessionState::Disconnected {
            debug!("Session {} already stopped", self.name());
            return;
        }

        if self.config.farewell && self.is_running() {
            let goodbye = Frame::Goodbye {
                reason: reason.to_string(),
            };
            match tokio::time::timeout(CLOSE_TIMEOUT, self.send_frame(&goodbye)).await {
                Ok(Ok(())) => debug!("Goodbye sent"),
                Ok(Err(e)) => debug!("Goodbye not sent: {}", e),
                Err(_) => debug!("Goodbye timed out"),
            }
        }

        self.teardown(reason).await;
        self.closed().await;
    }

    pub async fn send_chat(&self, message: &str, author: &str) -> Result<()> {
        self.ensure_running()?;
        self.send_frame(&Frame::Chat {
            sender: self.name().to_string(),
            payload: ChatPayload::new(author, message),
        })
        .await
    }

    /// Send a command to `target` and return the handle tracking its result.
    pub async fn send_command(
        &self,
        target: &str,
        command: &str,
        params: Vec<String>,
    ) -> Result<CommandHandle> {
        self.ensure_running()?;
        let handle = self.correlator.issue(command, params);
        self.send_frame(&Frame::Command {
            sender: self.name().to_string(),
            receiver: target.to_string(),
            payload: handle.request().clone(),
        })
        .await?;
        Ok(handle)
    }

    /// Answer a command request received from `target`.
    pub async fn reply_command(
        &self,
        target: &str,
        request: CommandPayload,
        result: Option<Value>,
    ) -> Result<()> {
        self.ensure_running()?;
        self.send_frame(&Frame::CommandResult {
            sender: self.name().to_string(),
            receiver: target.to_string(),
            payload: request.answered(result),
        })
        .await
    }

    async fn send_frame(&self, frame: &Frame) -> Result<()> {
        let bytes = encode_frame(frame)?;
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(BridgeError::NotRunning)?;

        let written = tokio::select! {
            _ = self.cancel.cancelled() => return Err(BridgeError::TransportClosed),
            written = async {
                writer.write_all(&bytes).await?;
                writer.flush().await
            } => written,
        };
        drop(guard);

        match written {
            Ok(()) => {
                self.touch();
                Ok(())
            }
            Err(e) => {
                self.abort(format!("write failed: {}", e));
                Err(BridgeError::Transport(e))
            }
        }
    }

    async fn receive_loop(self: Arc<Self>, mut reader: FrameSource) {
        let mut malformed = 0u32;
        let reason = loop {
            let next = tokio::select! {
                _ = self.cancel.cancelled() => break self.take_close_reason(),
                next = reader.read_frame() => next,
            };

            match next {
                Ok(Some(frame)) => {
                    malformed = 0;
                    self.touch_read();
                    self.dispatch(frame).await;
                }
                Ok(None) => break "connection closed by hub".to_string(),
                Err(e) if e.is_recoverable() => {
                    malformed += 1;
                    warn!(
                        "Dropping malformed frame ({}/{}): {}",
                        malformed, self.config.max_protocol_errors, e
                    );
                    if malformed >= self.config.max_protocol_errors {
                        break format!("{} consecutive malformed frames", malformed);
                    }
                }
                Err(e) => break e.to_string(),
            }
        };
        self.teardown(&reason).await;
    }

    async fn dispatch(&self, frame: Frame) {
        match frame {
            Frame::Chat { sender, payload } => {
                trace!("Chat from {}: {}", sender, payload);
                isolate("on_chat", self.adapter.on_chat(&sender, payload)).await;
            }
            // Answers only ever go to the correlator; late or unknown ones are
            // dropped there and never reach `on_command`
            Frame::CommandResult { payload, .. } => {
                self.correlator.resolve(&payload);
            }
            Frame::Command { payload, .. } if payload.responded => {
                self.correlator.resolve(&payload);
            }
            Frame::Command {
                sender, payload, ..
            } => {
                debug!("Command {} {} from {}", payload.command, payload.request_id, sender);
                let request = payload.clone();
                if let Some(result) =
                    isolate("on_command", self.adapter.on_command(&sender, payload)).await
                    && let Err(e) = self.reply_command(&sender, request, result).await
                {
                    warn!("Failed to answer command from {}: {}", sender, e);
                }
            }
            Frame::KeepAlive { ping: true } => {
                if let Err(e) = self.send_frame(&Frame::KeepAlive { ping: false }).await {
                    debug!("Keep-alive answer failed: {}", e);
                }
            }
            Frame::KeepAlive { ping: false } => self.record_pong(),
            Frame::Goodbye { reason } => info!("Hub is closing the connection: {}", reason),
            other => debug!("Ignoring unexpected {} frame", other.kind()),
        }
    }

    async fn keep_alive_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(self.config.keep_alive_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let expired = self.correlator.purge_expired();
            if expired > 0 {
                debug!("Purged {} expired command(s)", expired);
            }

            let silent = lock(&self.last_read).elapsed();
            if silent > self.config.liveness_window {
                self.abort(format!("nothing received for {:?}", silent));
                break;
            }

            self.mark_ping_sent();
            if let Err(e) = self.send_frame(&Frame::KeepAlive { ping: true }).await {
                debug!("Keep-alive ping failed: {}", e);
            }
        }
    }

    /// Move to `Stopping`, release the transport, then `Disconnected`.
    /// Only the first caller does the work.
    async fn teardown(&self, reason: &str) {
        let claimed = self.state.send_if_modified(|state| {
            if state.can_transition_to(SessionState::Stopping) {
                *state = SessionState::Stopping;
                true
            } else {
                false
            }
        });
        if !claimed {
            return;
        }

        self.cancel.cancel();
        if let Some(mut writer) = self.writer.lock().await.take() {
            let _ = tokio::time::timeout(CLOSE_TIMEOUT, writer.shutdown()).await;
        }
        let abandoned = self.correlator.abandon_all();
        if abandoned > 0 {
            debug!("Abandoned {} in-flight command(s)", abandoned);
        }

        self.state.send_replace(SessionState::Disconnected);
        info!("Session {} disconnected: {}", self.name(), reason);
    }

    /// Ask the background loops to tear the connection down.
    fn abort(&self, reason: String) {
        if !self.cancel.is_cancelled() {
            warn!("Dropping connection: {}", reason);
            lock(&self.close_reason).get_or_insert(reason);
            self.cancel.cancel();
        }
    }

    /// Return a failed attempt to `Disconnected`.
    fn abandon_attempt(&self) {
        self.cancel.cancel();
        self.state.send_if_modified(|state| {
            if *state == SessionState::Disconnected {
                false
            } else {
                *state = SessionState::Disconnected;
                true
            }
        });
    }

    fn transition(&self, next: SessionState) -> Result<()> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| match state.transition(next) {
            Ok(next) => {
                *state = next;
                true
            }
            Err(_) => {
                result = Err(BridgeError::InvalidState(*state));
                false
            }
        });
        result
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(BridgeError::NotRunning)
        }
    }

    fn touch(&self) {
        *lock(&self.last_activity) = Instant::now();
    }

    fn touch_read(&self) {
        let now = Instant::now();
        *lock(&self.last_read) = now;
        *lock(&self.last_activity) = now;
    }

    fn mark_ping_sent(&self) {
        lock(&self.ping).sent_at = Some(Instant::now());
    }

    fn record_pong(&self) {
        let mut ping = lock(&self.ping);
        if let Some(sent_at) = ping.sent_at.take() {
            ping.last_rtt = Some(sent_at.elapsed());
        }
    }

    fn take_close_reason(&self) -> String {
        lock(&self.close_reason)
            .take()
            .unwrap_or_else(|| "stopped".to_string())
    }

    fn idle_for(&self) -> Duration {
        lock(&self.last_activity).elapsed()
    }
}

fn lock<T>(mutex: &StdMutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Run an adapter callback so that neither its error nor a panic reaches
/// the receive loop.
async fn isolate<T>(
    callback: &str,
    future: impl Future<Output = std::result::Result<T, AdapterError>>,
) -> Option<T> {
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            warn!("Adapter {} failed: {}", callback, e);
            None
        }
        Err(_) => {
            error!("Adapter {} panicked", callback);
            None
        }
    }
}
