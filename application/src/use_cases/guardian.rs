//! Guardian supervisor.
//!
//! Keeps a [`Supervised`] target running: while the loop condition holds,
//! start the target if it is not running, then sleep for the poll interval.
//! Start failures are logged and retried on the next tick; nothing the
//! target does ends the loop.
//!
//! An optional [`HandoffSignal`] makes the guardian wait for a previous
//! instance to announce it has stopped before the first start, so two
//! instances never hold a session under the same name at once.

use crate::config::GuardianConfig;
use crate::ports::supervised::Supervised;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Sender half of a stop handoff, held by the outgoing instance.
#[derive(Debug)]
pub struct HandoffNotifier(watch::Sender<bool>);

/// Receiver half of a stop handoff, handed to the incoming guardian.
#[derive(Debug, Clone)]
pub struct HandoffSignal(watch::Receiver<bool>);

pub fn handoff_channel() -> (HandoffNotifier, HandoffSignal) {
    let (tx, rx) = watch::channel(false);
    (HandoffNotifier(tx), HandoffSignal(rx))
}

impl HandoffNotifier {
    /// Announce that the outgoing instance has fully stopped.
    pub fn notify_stopped(&self) {
        self.0.send_replace(true);
    }
}

impl HandoffSignal {
    pub fn is_stopped(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolve once stop has been announced. Also resolves if the notifier
    /// was dropped, since nobody is left to announce it.
    pub async fn stopped(&mut self) {
        let _ = self.0.wait_for(|stopped| *stopped).await;
    }
}

/// Counters from one guardian run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GuardianReport {
    pub start_attempts: u64,
    pub failed_starts: u64,
    pub handoff_timed_out: bool,
}

type LoopCondition = Box<dyn Fn() -> bool + Send + Sync>;

pub struct Guardian<S: Supervised + ?Sized> {
    target: Arc<S>,
    config: GuardianConfig,
    keep_running: LoopCondition,
    handoff: Option<HandoffSignal>,
}

impl<S: Supervised + ?Sized + 'static> Guardian<S> {
    pub fn new(target: Arc<S>, config: GuardianConfig) -> Self {
        Self {
            target,
            config,
            keep_running: Box::new(|| true),
            handoff: None,
        }
    }

    /// Stop supervising once `condition` returns false. Checked every tick.
    pub fn with_loop_condition(mut self, condition: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.keep_running = Box::new(condition);
        self
    }

    pub fn with_handoff(mut self, signal: HandoffSignal) -> Self {
        self.handoff = Some(signal);
        self
    }

    pub async fn run(mut self) -> GuardianReport {
        let mut report = GuardianReport::default();
        let name = self.target.name().to_string();

        if let Some(mut signal) = self.handoff.take() {
            debug!("Waiting for previous instance of {} to stop", name);
            if tokio::time::timeout(self.config.handoff_wait, signal.stopped())
                .await
                .is_err()
            {
                warn!(
                    "Previous instance of {} did not stop within {:?}, starting anyway",
                    name, self.config.handoff_wait
                );
                report.handoff_timed_out = true;
            }
        }

        info!("Guardian started for {}", name);
        while (self.keep_running)() {
            if !self.target.is_running() {
                report.start_attempts += 1;
                match self.target.start().await {
                    Ok(()) => info!("{} started (attempt {})", name, report.start_attempts),
                    Err(e) => {
                        report.failed_starts += 1;
                        warn!(
                            "{} failed to start: {} (retrying in {:?})",
                            name, e, self.config.poll_interval
                        );
                    }
                }
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
        info!(
            "Guardian for {} stopped after {} start attempts",
            name, report.start_attempts
        );
        report
    }

    pub fn spawn(self) -> JoinHandle<GuardianReport> {
        tokio::spawn(self.run())
    }
}
