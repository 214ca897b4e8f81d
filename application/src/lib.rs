//! Application layer for chatbridge
//!
//! This crate contains the ports platform bindings and transports plug
//! into, the command correlator shared by the session and its issuers, the
//! guardian supervisor, and the runtime configuration types.
//! It depends only on the domain layer.

pub mod config;
pub mod correlator;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ClientConfig, GuardianConfig};
pub use correlator::{CommandHandle, Correlator, ResolveOutcome};
pub use ports::{
    adapter::{AdapterError, BridgeAdapter, NoAdapter},
    connector::{BoxedStream, BridgeStream, Connector},
    supervised::{StartError, Supervised},
};
pub use use_cases::guardian::{
    Guardian, GuardianReport, HandoffNotifier, HandoffSignal, handoff_channel,
};
