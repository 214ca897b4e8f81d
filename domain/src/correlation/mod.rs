//! Command correlation lifecycle.
//!
//! Each issued command is tracked by a [`CorrelationState`]:
//!
//! ```text
//! Pending ──> Responded
//!        └──> TimedOut
//! ```
//!
//! Both outcomes are terminal; once reached, further transitions are
//! ignored so a late reply can never overwrite a timeout and a duplicate
//! reply can never overwrite the first.

/// State of one in-flight command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CorrelationState {
    #[default]
    Pending,
    Responded,
    TimedOut,
}

impl CorrelationState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, CorrelationState::Pending)
    }

    /// Pending -> Responded. Returns whether the transition happened.
    pub fn respond(&mut self) -> bool {
        if *self == CorrelationState::Pending {
            *self = CorrelationState::Responded;
            true
        } else {
            false
        }
    }

    /// Pending -> TimedOut. Returns whether the transition happened.
    pub fn expire(&mut self) -> bool {
        if *self == CorrelationState::Pending {
            *self = CorrelationState::TimedOut;
            true
        } else {
            false
        }
    }
}
