//! Client identity from TOML (`[client]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileClientConfig {
    /// Name this client registers under at the hub
    pub name: String,
    /// Shared secret presented during login
    pub password: String,
    /// Consecutive undecodable frames tolerated before reconnecting
    pub max_protocol_errors: u32,
    /// Send a goodbye frame on graceful stop
    pub farewell: bool,
}

impl Default for FileClientConfig {
    fn default() -> Self {
        Self {
            name: "console".to_string(),
            password: String::new(),
            max_protocol_errors: 8,
            farewell: true,
        }
    }
}
