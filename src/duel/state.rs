//! Small state types owned by the duel: lifecycle phase, gun, step outcome.

use serde::{Deserialize, Serialize};

use crate::chamber::Shell;

/// Lifecycle phase of a match.
///
/// `AwaitingRoundStart -> InRound -> {InRound, MatchOver}`. An emptied
/// chamber regenerates inside `InRound` without leaving the phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    AwaitingRoundStart,
    InRound,
    MatchOver,
}

/// Knife state of the shared gun.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GunState {
    damage: u32,
}

impl Default for GunState {
    fn default() -> Self {
        Self { damage: 1 }
    }
}

impl GunState {
    pub const BASE_DAMAGE: u32 = 1;
    pub const KNIFE_DAMAGE: u32 = 2;

    #[must_use]
    pub fn damage(&self) -> u32 {
        self.damage
    }

    #[must_use]
    pub fn is_knife_armed(&self) -> bool {
        self.damage == Self::KNIFE_DAMAGE
    }

    /// Double the damage of the next shot.
    pub fn arm_knife(&mut self) {
        self.damage = Self::KNIFE_DAMAGE;
    }

    /// Damage for the shot being fired; reverts to base damage.
    pub fn fire(&mut self) -> u32 {
        std::mem::replace(&mut self.damage, Self::BASE_DAMAGE)
    }

    pub fn reset(&mut self) {
        self.damage = Self::BASE_DAMAGE;
    }
}

/// Result of one `Duel::execute` call.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub reward: f32,
    pub match_over: bool,
    /// False when the action was rejected and penalized.
    pub valid: bool,
    /// Shell drawn by a shot or a drink.
    pub shell: Option<Shell>,
}

impl StepOutcome {
    pub(crate) fn rejected(reward: f32) -> Self {
        Self {
            reward,
            match_over: false,
            valid: false,
            shell: None,
        }
    }

    /// The `(reward, matchOver)` pair the wire protocol reports.
    #[must_use]
    pub fn as_pair(&self) -> (f32, bool) {
        (self.reward, self.match_over)
    }
}
