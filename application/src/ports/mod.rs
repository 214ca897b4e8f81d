//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and platform bindings
//! must implement.

pub mod adapter;
pub mod connector;
pub mod supervised;
