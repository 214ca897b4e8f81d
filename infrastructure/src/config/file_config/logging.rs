//! File logging from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for daily-rotated log files; stderr only when unset
    pub directory: Option<String>,
    /// File name prefix inside `directory`
    pub file_prefix: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: "chatbridge.log".to_string(),
        }
    }
}
