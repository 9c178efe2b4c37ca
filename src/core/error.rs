//! Error types for the duel core.
//!
//! Invalid actions are not errors: they come back as a penalized
//! `StepOutcome`. These variants cover lifecycle misuse (acting out of turn,
//! before a round starts, after the match ended), bad configuration, and the
//! depleted-deck invariant.

use thiserror::Error;

use super::side::Side;

/// Error type for duel operations.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum DuelError {
    #[error("chamber deck is empty")]
    DeckEmpty,
    #[error("it is not {side}'s turn")]
    NotYourTurn { side: Side },
    #[error("round has not started")]
    RoundPending,
    #[error("match is over")]
    MatchOver,
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl DuelError {
    /// Errors the simulation loop must not continue past.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, DuelError::DeckEmpty)
    }
}

/// Result type for duel operations.
pub type Result<T> = std::result::Result<T, DuelError>;
