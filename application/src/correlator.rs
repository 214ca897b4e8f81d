//! Command correlation.
//!
//! Every issued command gets a [`RequestId`] from the [`Correlator`] and a
//! pending entry with a deadline. The session feeds every inbound result
//! to [`Correlator::resolve`]; the issuer holds a [`CommandHandle`] it can
//! poll or await.
//!
//! A pending entry leaves the table exactly once: when its result arrives,
//! when its deadline passes, or when the handle is dropped. Anything that
//! arrives afterwards finds nothing to resolve and is dropped.

use chatbridge_domain::{CommandPayload, CorrelationState, RequestId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::Instant;
use tracing::{debug, warn};

struct PendingEntry {
    command: String,
    deadline: Instant,
    tx: oneshot::Sender<Option<Value>>,
}

type PendingTable = Arc<Mutex<HashMap<RequestId, PendingEntry>>>;

fn lock(table: &PendingTable) -> std::sync::MutexGuard<'_, HashMap<RequestId, PendingEntry>> {
    table.lock().unwrap_or_else(|e| e.into_inner())
}

/// What [`Correlator::resolve`] did with an inbound result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// Delivered to the waiting issuer.
    Resolved,
    /// No pending entry: late, duplicate, or never issued here.
    Unmatched,
    /// The id matched but the command name did not. The entry stays pending.
    CommandMismatch,
}

/// Table of in-flight commands for one client.
pub struct Correlator {
    pending: PendingTable,
    next_id: AtomicU64,
    timeout: Duration,
}

impl Correlator {
    pub fn new(timeout: Duration) -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Register a new request and return the handle tracking it.
    ///
    /// The outgoing payload is available from [`CommandHandle::request`].
    pub fn issue(&self, command: impl Into<String>, params: Vec<String>) -> CommandHandle {
        let request_id = RequestId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let request = CommandPayload::new(command, params).with_request_id(request_id);
        let deadline = deadline_after(self.timeout);
        let (tx, rx) = oneshot::channel();

        lock(&self.pending).insert(
            request_id,
            PendingEntry {
                command: request.command.clone(),
                deadline,
                tx,
            },
        );
        debug!("Issued command {} {}", request.command, request_id);

        CommandHandle {
            payload: request,
            rx,
            deadline,
            state: CorrelationState::Pending,
            pending: Arc::clone(&self.pending),
        }
    }

    /// Match an inbound result against the pending table.
    pub fn resolve(&self, reply: &CommandPayload) -> ResolveOutcome {
        let mut table = lock(&self.pending);
        match table.remove(&reply.request_id) {
            None => {
                warn!(
                    "Dropping result for {} {}: no pending request (late or duplicate)",
                    reply.command, reply.request_id
                );
                ResolveOutcome::Unmatched
            }
            Some(entry) if entry.deadline <= Instant::now() => {
                warn!(
                    "Dropping result for {} {}: arrived after the deadline",
                    reply.command, reply.request_id
                );
                ResolveOutcome::Unmatched
            }
            Some(entry) if entry.command != reply.command => {
                warn!(
                    "Result {} names command {} but {} was issued",
                    reply.request_id, reply.command, entry.command
                );
                table.insert(reply.request_id, entry);
                ResolveOutcome::CommandMismatch
            }
            Some(entry) => {
                drop(table);
                if entry.tx.send(reply.result.clone()).is_err() {
                    debug!("Issuer of {} went away before the result", reply.request_id);
                }
                ResolveOutcome::Resolved
            }
        }
    }

    /// Remove entries whose deadline has passed. Their handles observe
    /// [`CorrelationState::TimedOut`].
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut table = lock(&self.pending);
        let before = table.len();
        table.retain(|id, entry| {
            let alive = entry.deadline > now;
            if !alive {
                debug!("Command {} {} expired", entry.command, id);
            }
            alive
        });
        before - table.len()
    }

    /// Drop every pending entry, e.g. when the connection that would carry
    /// the results is gone.
    pub fn abandon_all(&self) -> usize {
        let mut table = lock(&self.pending);
        let count = table.len();
        table.clear();
        count
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_pending(&self, request_id: RequestId) -> bool {
        lock(&self.pending).contains_key(&request_id)
    }
}

/// Issuer's view of one in-flight command.
///
/// Dropping the handle before the result arrives discards the pending entry.
pub struct CommandHandle {
    payload: CommandPayload,
    rx: oneshot::Receiver<Option<Value>>,
    deadline: Instant,
    state: CorrelationState,
    pending: PendingTable,
}

impl CommandHandle {
    pub fn request_id(&self) -> RequestId {
        self.payload.request_id
    }

    /// The payload as it stands: the outgoing request until answered, the
    /// answered copy afterwards.
    pub fn request(&self) -> &CommandPayload {
        &self.payload
    }

    pub fn state(&self) -> CorrelationState {
        self.state
    }

    /// Non-blocking check for a result or an elapsed deadline.
    pub fn poll(&mut self) -> CorrelationState {
        if self.state.is_terminal() {
            return self.state;
        }
        match self.rx.try_recv() {
            Ok(result) => self.complete(result),
            Err(TryRecvError::Empty) => {
                if Instant::now() >= self.deadline {
                    self.expire();
                }
            }
            Err(TryRecvError::Closed) => self.expire(),
        }
        self.state
    }

    /// Wait until the result arrives or the deadline passes.
    ///
    /// The returned payload has `responded == false` on timeout.
    pub async fn wait(mut self) -> CommandPayload {
        if !self.state.is_terminal() {
            match tokio::time::timeout_at(self.deadline, &mut self.rx).await {
                Ok(Ok(result)) => self.complete(result),
                Ok(Err(_)) | Err(_) => self.expire(),
            }
        }
        self.payload.clone()
    }

    fn complete(&mut self, result: Option<Value>) {
        if self.state.respond() {
            self.payload.attach_result(result);
        }
    }

    fn expire(&mut self) {
        if self.state.expire() {
            lock(&self.pending).remove(&self.payload.request_id);
            debug!(
                "Command {} {} timed out",
                self.payload.command, self.payload.request_id
            );
        }
    }
}

impl Drop for CommandHandle {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            lock(&self.pending).remove(&self.payload.request_id);
        }
    }
}

/// Roughly thirty years; stands in for deadlines `Instant` cannot represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}
