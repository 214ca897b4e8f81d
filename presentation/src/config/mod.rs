//! Presentation-level configuration

/// Console adapter and line loop settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Author attached to chat typed at the console
    pub author: String,
    /// Maximum characters per printed block
    pub chunk_limit: usize,
    /// Names reported when another client asks who is online here
    pub roster: Vec<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            author: "console".to_string(),
            chunk_limit: 500,
            roster: Vec::new(),
        }
    }
}

impl From<&chatbridge_infrastructure::FileConsoleConfig> for ConsoleConfig {
    fn from(file: &chatbridge_infrastructure::FileConsoleConfig) -> Self {
        Self {
            author: file.author.clone(),
            chunk_limit: file.chunk_limit,
            roster: file.roster.clone(),
        }
    }
}
