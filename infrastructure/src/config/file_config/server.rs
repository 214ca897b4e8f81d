//! Hub address from TOML (`[server]` section)

use chatbridge_domain::Endpoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
    /// Connect over TLS
    pub tls: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 30001,
            tls: false,
        }
    }
}

impl FileServerConfig {
    pub fn to_endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port).with_tls(self.tls)
    }
}
