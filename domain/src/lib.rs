//! Domain layer for chatbridge
//!
//! This crate contains the payload model, the outbound text chunker and the
//! lifecycle state machines shared by every other layer. It has no I/O and
//! no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Payloads
//!
//! Everything bridged between endpoints is one of two payloads:
//!
//! - **Chat**: an author and a message, rendered as `[author] message`
//! - **Command**: a command token with arguments, answered at most once with
//!   an opaque result blob (`responded` distinguishes "no answer yet" from
//!   an explicitly empty answer)
//!
//! ## Lifecycles
//!
//! - [`SessionState`]: `Disconnected -> Connecting -> Authenticated -> Running -> Stopping -> Disconnected`
//! - [`CorrelationState`]: `Pending -> Responded | TimedOut`

pub mod core;
pub mod correlation;
pub mod payload;
pub mod session;
pub mod text;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    identity::{ClientIdentity, Endpoint},
};
pub use correlation::CorrelationState;
pub use payload::{
    PayloadKind,
    chat::ChatPayload,
    command::{CommandPayload, RequestId},
    online::{ONLINE_COMMAND, OnlineQueryResult},
};
pub use session::SessionState;
pub use text::{chunker::chunk, preview::preview};
