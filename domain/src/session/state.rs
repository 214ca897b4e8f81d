//! Session lifecycle state machine.
//!
//! ```text
//! Disconnected ──> Connecting ──> Authenticated ──> Running ──> Stopping ──> Disconnected
//!                      │                │                           ▲
//!                      ├────────────────┴──────> Stopping ──────────┘
//!                      └──> Disconnected (handshake failed)
//! ```
//!
//! Transitions are monotonic within one connection attempt: nothing moves
//! back from `Running` to `Authenticated`, and `Disconnected` is only
//! re-entered at the end of an attempt.

use crate::core::error::DomainError;
use std::fmt;

/// Lifecycle state of one connection to the hub.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connecting,
    Authenticated,
    Running,
    Stopping,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Authenticated => "authenticated",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
        }
    }

    /// Whether moving from `self` to `next` is a legal step.
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Authenticated)
                | (Connecting, Stopping)
                | (Connecting, Disconnected)
                | (Authenticated, Running)
                | (Authenticated, Stopping)
                | (Authenticated, Disconnected)
                | (Running, Stopping)
                | (Stopping, Disconnected)
        )
    }

    /// Validate a step, returning the new state.
    pub fn transition(self, next: SessionState) -> Result<SessionState, DomainError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Anything other than `Disconnected`: an attempt is in progress.
    pub fn is_active(self) -> bool {
        self != SessionState::Disconnected
    }

    /// Only a running session may carry chat and command traffic.
    pub fn accepts_traffic(self) -> bool {
        self == SessionState::Running
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SessionState::*;

    const ALL: [SessionState; 5] = [Disconnected, Connecting, Authenticated, Running, Stopping];

    #[test]
    fn test_happy_path() {
        let mut state = Disconnected;
        for next in [Connecting, Authenticated, Running, Stopping, Disconnected] {
            state = state.transition(next).unwrap();
        }
        assert_eq!(state, Disconnected);
    }

    #[test]
    fn test_start_only_from_disconnected() {
        for from in ALL {
            assert_eq!(from.can_transition_to(Connecting), from == Disconnected);
        }
    }

    #[test]
    fn test_running_never_reverts() {
        assert!(!Running.can_transition_to(Authenticated));
        assert!(!Running.can_transition_to(Connecting));
        assert!(!Running.can_transition_to(Disconnected));
        assert!(Running.transition(Authenticated).is_err());
    }

    #[test]
    fn test_failed_handshake_returns_to_disconnected() {
        assert!(Connecting.can_transition_to(Disconnected));
        assert!(!Connecting.can_transition_to(Running));
    }

    #[test]
    fn test_no_self_transitions() {
        for state in ALL {
            assert!(!state.can_transition_to(state));
        }
    }

    #[test]
    fn test_traffic_and_activity_flags() {
        assert!(Running.accepts_traffic());
        assert!(!Authenticated.accepts_traffic());
        assert!(!Disconnected.is_active());
        assert!(Stopping.is_active());
    }
}
