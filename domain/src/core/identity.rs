//! Connection identity value objects.
//!
//! [`Endpoint`] names where the hub lives; [`ClientIdentity`] is what the
//! client presents during the authentication handshake.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remote hub address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    /// Wrap the byte stream in TLS before the handshake.
    #[serde(default)]
    pub tls: bool,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            tls: false,
        }
    }

    pub fn with_tls(mut self, tls: bool) -> Self {
        self.tls = tls;
        self
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scheme = if self.tls { "tls" } else { "tcp" };
        write!(f, "{}://{}:{}", scheme, self.host, self.port)
    }
}

/// Name and shared secret a client authenticates with.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    name: String,
    secret: String,
}

impl ClientIdentity {
    /// Build an identity, rejecting names the hub could not route to.
    pub fn new(name: impl Into<String>, secret: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidIdentity(
                "client name cannot be empty".to_string(),
            ));
        }
        if name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidIdentity(format!(
                "client name cannot contain whitespace: {:?}",
                name
            )));
        }
        Ok(Self {
            name,
            secret: secret.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientIdentity")
            .field("name", &self.name)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_address_and_display() {
        let endpoint = Endpoint::new("hub.example.org", 30001);
        assert_eq!(endpoint.address(), "hub.example.org:30001");
        assert_eq!(endpoint.to_string(), "tcp://hub.example.org:30001");
        assert_eq!(
            endpoint.with_tls(true).to_string(),
            "tls://hub.example.org:30001"
        );
    }

    #[test]
    fn test_identity_rejects_empty_name() {
        assert!(ClientIdentity::new("", "secret").is_err());
        assert!(ClientIdentity::new("   ", "secret").is_err());
    }

    #[test]
    fn test_identity_rejects_whitespace_in_name() {
        let err = ClientIdentity::new("survival server", "secret").unwrap_err();
        assert!(matches!(err, DomainError::InvalidIdentity(_)));
    }

    #[test]
    fn test_identity_debug_redacts_secret() {
        let identity = ClientIdentity::new("survival", "hunter2").unwrap();
        let debug = format!("{:?}", identity);
        assert!(debug.contains("survival"));
        assert!(!debug.contains("hunter2"));
        assert_eq!(identity.secret(), "hunter2");
    }
}
