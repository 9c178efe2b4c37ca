//! Reward functions.
//!
//! Every function here is pure: the result depends only on the arguments.
//! The duel evaluates them with the values observed while resolving an
//! action (lives *after* a shot, lives *before* a heal, and so on).

use crate::chamber::Knowledge;

pub const WIN_REWARD: f32 = 50.0;
pub const LOSS_PENALTY: f32 = -50.0;
pub const INVALID_ACTION_PENALTY: f32 = -50.0;

pub const HIT_OPPONENT_MULTIPLIER: f32 = 10.0;
pub const HIT_SELF_MULTIPLIER: f32 = -15.0;
pub const MISS_OPPONENT_PENALTY: f32 = -5.0;
pub const MISS_SELF_REWARD: f32 = 15.0;

pub const BEER_LIVE_REWARD: f32 = 5.0;
pub const BEER_BLANK_REWARD: f32 = 1.0;
pub const CIGAR_HEAL_REWARD: f32 = 5.0;
pub const CIGAR_WASTE_PENALTY: f32 = -2.0;
pub const HANDCUFFS_SUCCESS_REWARD: f32 = 7.0;
pub const HANDCUFFS_FAIL_PENALTY: f32 = -10.0;
pub const KNIFE_HIT_REWARD: f32 = 5.0;
pub const KNIFE_MISS_PENALTY: f32 = -5.0;
pub const MAG_GLASS_REWARD: f32 = 3.0;

/// Reward for a shot.
///
/// - live at self: `-15 * damage`, `+5` with the knife, `-50` if the shooter died
/// - live at opponent: `+10 * damage`, `+5` with the knife, `+50` if the target died
/// - blank at self: `+15`
/// - blank at opponent: `-5`, another `-5` if the knife was wasted
pub fn shoot_reward(
    is_live: bool,
    is_self: bool,
    damage: u32,
    knife_used: bool,
    shooter_lives_after: u32,
    target_lives_after: u32,
) -> f32 {
    let damage = damage as f32;
    match (is_live, is_self) {
        (true, true) => {
            let mut reward = HIT_SELF_MULTIPLIER * damage;
            if knife_used {
                reward += KNIFE_HIT_REWARD;
            }
            if shooter_lives_after == 0 {
                reward += LOSS_PENALTY;
            }
            reward
        }
        (true, false) => {
            let mut reward = HIT_OPPONENT_MULTIPLIER * damage;
            if knife_used {
                reward += KNIFE_HIT_REWARD;
            }
            if target_lives_after == 0 {
                reward += WIN_REWARD;
            }
            reward
        }
        (false, true) => MISS_SELF_REWARD,
        (false, false) => {
            if knife_used {
                MISS_OPPONENT_PENALTY + KNIFE_MISS_PENALTY
            } else {
                MISS_OPPONENT_PENALTY
            }
        }
    }
}

/// Reward for ejecting a shell with an energy drink.
pub fn beer_reward(was_live: bool) -> f32 {
    if was_live {
        BEER_LIVE_REWARD
    } else {
        BEER_BLANK_REWARD
    }
}

/// Reward for a magnifying glass peek.
///
/// Zero when the peek told nothing new: one shell left, one shell type
/// already exhausted, or no definite knowledge came out of it.
pub fn mag_glass_reward(
    remaining_depth: usize,
    remaining_blank: u32,
    remaining_live: u32,
    knowledge_after_peek: Knowledge,
) -> f32 {
    if remaining_depth == 1
        || remaining_blank == 0
        || remaining_live == 0
        || !knowledge_after_peek.is_definite()
    {
        0.0
    } else {
        MAG_GLASS_REWARD
    }
}

/// Reward for smoking a cigar, judged on lives before the heal.
pub fn cigar_reward(lives_before: u32, max_lives: u32) -> f32 {
    if lives_before >= max_lives {
        CIGAR_WASTE_PENALTY
    } else {
        CIGAR_HEAL_REWARD
    }
}

/// Reward for cuffing the opponent.
pub fn handcuffs_reward(opponent_already_cuffed: bool) -> f32 {
    if opponent_already_cuffed {
        HANDCUFFS_FAIL_PENALTY
    } else {
        HANDCUFFS_SUCCESS_REWARD
    }
}

/// Base penalty for an invalid action, before escalation.
pub fn invalid_action_penalty() -> f32 {
    INVALID_ACTION_PENALTY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_self_shot() {
        assert_eq!(shoot_reward(true, true, 1, false, 3, 4), -15.0);
        assert_eq!(shoot_reward(true, true, 2, true, 2, 4), -30.0 + 5.0);
        assert_eq!(shoot_reward(true, true, 1, false, 0, 4), -15.0 - 50.0);
    }

    #[test]
    fn test_live_other_shot() {
        assert_eq!(shoot_reward(true, false, 1, false, 4, 3), 10.0);
        assert_eq!(shoot_reward(true, false, 2, true, 4, 0), 10.0 * 2.0 + 5.0 + 50.0);
    }

    #[test]
    fn test_blank_shots() {
        assert_eq!(shoot_reward(false, true, 1, false, 4, 4), 15.0);
        // Knife is never penalized on a self-shot.
        assert_eq!(shoot_reward(false, true, 2, true, 4, 4), 15.0);
        assert_eq!(shoot_reward(false, false, 1, false, 4, 4), -5.0);
        assert_eq!(shoot_reward(false, false, 2, true, 4, 4), -10.0);
    }

    #[test]
    fn test_beer() {
        assert_eq!(beer_reward(true), 5.0);
        assert_eq!(beer_reward(false), 1.0);
    }

    #[test]
    fn test_mag_glass() {
        assert_eq!(mag_glass_reward(4, 2, 2, Knowledge::KnownLive), 3.0);
        assert_eq!(mag_glass_reward(1, 0, 1, Knowledge::KnownLive), 0.0);
        assert_eq!(mag_glass_reward(3, 0, 3, Knowledge::KnownLive), 0.0);
        assert_eq!(mag_glass_reward(3, 3, 0, Knowledge::KnownBlank), 0.0);
        assert_eq!(mag_glass_reward(4, 2, 2, Knowledge::Unknown), 0.0);
    }

    #[test]
    fn test_cigar() {
        assert_eq!(cigar_reward(4, 4), -2.0);
        assert_eq!(cigar_reward(2, 4), 5.0);
    }

    #[test]
    fn test_handcuffs() {
        assert_eq!(handcuffs_reward(true), -10.0);
        assert_eq!(handcuffs_reward(false), 7.0);
    }

    #[test]
    fn test_invalid_penalty() {
        assert_eq!(invalid_action_penalty(), -50.0);
    }
}
