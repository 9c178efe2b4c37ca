//! Per-side health and handcuff status.

use serde::{Deserialize, Serialize};

/// Health and handcuff status of one side.
///
/// Lives are clamped to `[0, max_lives]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    lives: u32,
    max_lives: u32,
    handcuffed: bool,
}

impl PlayerState {
    /// Create a side at full health.
    #[must_use]
    pub fn new(max_lives: u32) -> Self {
        Self {
            lives: max_lives,
            max_lives,
            handcuffed: false,
        }
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    #[must_use]
    pub fn is_handcuffed(&self) -> bool {
        self.handcuffed
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.lives >= self.max_lives
    }

    /// Lose `damage` lives, stopping at zero.
    pub fn take_damage(&mut self, damage: u32) {
        self.lives = self.lives.saturating_sub(damage);
    }

    /// Regain `amount` lives, stopping at the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.lives = self.lives.saturating_add(amount).min(self.max_lives);
    }

    pub fn set_handcuffed(&mut self, handcuffed: bool) {
        self.handcuffed = handcuffed;
    }

    /// Back to full health, uncuffed.
    pub fn reset(&mut self) {
        self.lives = self.max_lives;
        self.handcuffed = false;
    }
}
