//! Rules engine trait.
//!
//! Drivers (session loop, policies, Python env) talk to the duel through
//! this trait:
//! - What actions are legal
//! - How actions modify state
//! - Win/loss conditions

use crate::core::{ActionType, DuelConfig, Result, Side};
use crate::duel::StepOutcome;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// The side still standing.
    Winner(Side),
}

impl GameResult {
    /// Check if a side won.
    #[must_use]
    pub fn is_winner(&self, side: Side) -> bool {
        match self {
            GameResult::Winner(s) => *s == side,
        }
    }

    #[must_use]
    pub fn winner(&self) -> Side {
        match self {
            GameResult::Winner(s) => *s,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_actions`: Return empty vec if the side can't act
/// - `apply_action`: Penalized invalid actions are `Ok`; only lifecycle
///   misuse and broken invariants are `Err`
/// - `is_terminal`: Return None if the match continues
pub trait RulesEngine {
    /// Get the rules configuration.
    fn config(&self) -> &DuelConfig;

    /// Legal actions for `side` in the current state.
    fn legal_actions(&self, side: Side) -> Vec<ActionType>;

    /// Resolve one action for `side`.
    fn apply_action(&mut self, side: Side, action: ActionType) -> Result<StepOutcome>;

    /// Returns `Some(result)` if the match has ended, `None` if it continues.
    fn is_terminal(&self) -> Option<GameResult>;

    /// Check whether `action` is currently legal for `side`.
    fn is_legal(&self, side: Side, action: ActionType) -> bool {
        self.legal_actions(side).contains(&action)
    }
}
