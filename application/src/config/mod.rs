//! Application-level configuration.
//!
//! - [`ClientConfig`]: who the client is, where the hub lives, and the
//!   session timing knobs
//! - [`GuardianConfig`]: supervisor poll and handoff timing

pub mod client_config;
pub mod guardian_config;

pub use client_config::ClientConfig;
pub use guardian_config::GuardianConfig;
