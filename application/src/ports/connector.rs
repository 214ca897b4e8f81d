//! Port for opening the byte stream to the hub.
//!
//! The session only needs something it can read from and write to; how the
//! bytes get there (plain TCP, TLS, an in-memory pipe in tests) is the
//! connector's business.

use async_trait::async_trait;
use chatbridge_domain::Endpoint;
use tokio::io::{AsyncRead, AsyncWrite};

/// A bidirectional byte stream to the hub.
pub trait BridgeStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T: AsyncRead + AsyncWrite + Send + Unpin> BridgeStream for T {}

pub type BoxedStream = Box<dyn BridgeStream>;

#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a fresh stream to `endpoint`. Called once per session start.
    async fn connect(&self, endpoint: &Endpoint) -> std::io::Result<BoxedStream>;
}
