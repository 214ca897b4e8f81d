//! Session lifecycle.

mod state;

pub use state::SessionState;
