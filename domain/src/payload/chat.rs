//! Chat payload.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat line relayed between endpoints.
///
/// `author` is the sender identity on the originating platform (a player,
/// a bot user); it may be empty for system notices such as
/// "server started".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub author: String,
    pub message: String,
}

impl ChatPayload {
    pub fn new(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            message: message.into(),
        }
    }

    /// Platform-agnostic display string: `[author] message`, or just the
    /// message when there is no author.
    pub fn formatted(&self) -> String {
        if self.author.is_empty() {
            self.message.clone()
        } else {
            format!("[{}] {}", self.author, self.message)
        }
    }

    /// Strip a leading command prefix such as `!!mm` from the message.
    ///
    /// The prefix must be followed by a space and a non-empty remainder.
    /// On a match the message is rewritten to the remainder and the matched
    /// prefix is returned; otherwise the payload is left untouched.
    pub fn strip_prefix<'p>(&mut self, prefixes: &[&'p str]) -> Option<&'p str> {
        let (head, rest) = self.message.split_once(' ')?;
        let matched = prefixes.iter().copied().find(|p| *p == head)?;
        if rest.is_empty() {
            return None;
        }
        self.message = rest.to_string();
        Some(matched)
    }
}

impl fmt::Display for ChatPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}
