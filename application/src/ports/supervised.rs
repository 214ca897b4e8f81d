//! Port the guardian supervises.

use async_trait::async_trait;
use thiserror::Error;

/// Why a start attempt did not produce a running session.
#[derive(Error, Debug)]
pub enum StartError {
    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Start rejected: {0}")]
    Rejected(String),
}

/// Something that can be restarted after it stops.
#[async_trait]
pub trait Supervised: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Whether a session is currently active.
    fn is_running(&self) -> bool;

    /// Try to bring the target up. Returns once the attempt has settled.
    async fn start(&self) -> Result<(), StartError>;
}
