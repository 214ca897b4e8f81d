//! Text helpers for outbound messages and log lines.

pub mod chunker;
pub mod preview;
