//! Hub connection: wire codec, transport, session and client facade.

pub mod client;
pub mod codec;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
