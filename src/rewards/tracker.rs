//! Escalating penalties for repeated invalid actions.

use serde::{Deserialize, Serialize};

use super::reward::invalid_action_penalty;
use crate::core::{Side, SideMap};

/// Counts consecutive invalid actions per side.
///
/// The n-th consecutive invalid attempt (0-based) costs `-50 - n`. A valid
/// action by the same side resets its counter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidActionTracker {
    streaks: SideMap<u32>,
}

impl InvalidActionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Penalty for an invalid attempt by `side`; bumps its counter.
    pub fn penalize(&mut self, side: Side) -> f32 {
        let streak = &mut self.streaks[side];
        let penalty = invalid_action_penalty() - *streak as f32;
        *streak += 1;
        penalty
    }

    /// Clear `side`'s counter after a valid action.
    pub fn reset(&mut self, side: Side) {
        self.streaks[side] = 0;
    }

    /// Clear both counters.
    pub fn clear(&mut self) {
        self.streaks = SideMap::with_default();
    }

    /// Current consecutive invalid count for `side`.
    #[must_use]
    pub fn streak(&self, side: Side) -> u32 {
        self.streaks[side]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escalation() {
        let mut tracker = InvalidActionTracker::new();
        assert_eq!(tracker.penalize(Side::A), -50.0);
        assert_eq!(tracker.streak(Side::A), 1);
        assert_eq!(tracker.penalize(Side::A), -51.0);
        assert_eq!(tracker.penalize(Side::A), -52.0);
    }

    #[test]
    fn test_reset_on_valid() {
        let mut tracker = InvalidActionTracker::new();
        tracker.penalize(Side::A);
        tracker.penalize(Side::A);
        tracker.reset(Side::A);
        assert_eq!(tracker.penalize(Side::A), -50.0);
    }

    #[test]
    fn test_sides_are_independent() {
        let mut tracker = InvalidActionTracker::new();
        tracker.penalize(Side::A);
        assert_eq!(tracker.penalize(Side::B), -50.0);
        assert_eq!(tracker.streak(Side::A), 1);
    }
}
