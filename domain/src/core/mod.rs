//! Core domain types shared across the bridge.

pub mod error;
pub mod identity;
