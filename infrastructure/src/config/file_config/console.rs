//! Console adapter settings from TOML (`[console]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsoleConfig {
    /// Author attached to chat typed at the console
    pub author: String,
    /// Maximum characters per printed block
    pub chunk_limit: usize,
    /// Names reported when another client asks who is online here
    pub roster: Vec<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileConsoleConfig {
    fn default() -> Self {
        Self {
            author: "console".to_string(),
            chunk_limit: 500,
            roster: Vec::new(),
            color: true,
        }
    }
}
