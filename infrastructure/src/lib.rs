//! Infrastructure layer for chatbridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the wire codec, the TCP/TLS connector, the
//! hub session with its client facade, and configuration file loading.

pub mod bridge;
pub mod config;

// Re-export commonly used types
pub use bridge::{
    client::{ChatBridgeClient, ClientStatus},
    error::{BridgeError, Result},
    protocol::Frame,
    session::Session,
    transport::TcpConnector,
};
pub use config::{ConfigLoader, ConfigValidationError, FileConfig, FileConsoleConfig};
