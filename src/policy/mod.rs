//! Headless action policies.
//!
//! A session drives every side that is not connected to the external agent
//! with a `Policy`, standing in for the human player.
//!
//! - `RandomPolicy`: Uniform over legal actions
//! - `ScriptedPolicy`: Replays a fixed queue, then shoots the opponent

use std::collections::VecDeque;

use crate::core::{ActionType, GameRng, Side};
use crate::duel::Duel;

/// Chooses the next action for a side.
pub trait Policy: Send {
    /// Pick an action for `side`, which is the side to move in `duel`.
    fn choose(&mut self, duel: &Duel, side: Side, rng: &mut GameRng) -> ActionType;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Uniform random policy over legal actions.
#[derive(Clone, Debug, Default)]
pub struct RandomPolicy;

impl Policy for RandomPolicy {
    fn choose(&mut self, duel: &Duel, side: Side, rng: &mut GameRng) -> ActionType {
        let actions = duel.legal_actions(side);
        rng.choose(&actions).copied().unwrap_or(ActionType::ShootOther)
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Replays queued actions in order, then falls back to `ShootOther`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedPolicy {
    queue: VecDeque<ActionType>,
}

impl ScriptedPolicy {
    pub fn new(actions: impl IntoIterator<Item = ActionType>) -> Self {
        Self {
            queue: actions.into_iter().collect(),
        }
    }

    /// Actions not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl Policy for ScriptedPolicy {
    fn choose(&mut self, _duel: &Duel, _side: Side, _rng: &mut GameRng) -> ActionType {
        self.queue.pop_front().unwrap_or(ActionType::ShootOther)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duel::DuelBuilder;

    #[test]
    fn test_random_picks_legal() {
        let duel = DuelBuilder::new().seed(21).auto_start(true).build().unwrap();
        let mut policy = RandomPolicy;
        let mut rng = GameRng::new(4);
        let legal = duel.legal_actions(Side::A);
        for _ in 0..50 {
            let action = policy.choose(&duel, Side::A, &mut rng);
            assert!(legal.contains(&action));
        }
    }

    #[test]
    fn test_scripted_then_shoot() {
        let duel = DuelBuilder::new().seed(21).auto_start(true).build().unwrap();
        let mut policy = ScriptedPolicy::new([ActionType::Cigar, ActionType::ShootSelf]);
        let mut rng = GameRng::new(4);

        assert_eq!(policy.choose(&duel, Side::A, &mut rng), ActionType::Cigar);
        assert_eq!(policy.choose(&duel, Side::A, &mut rng), ActionType::ShootSelf);
        assert_eq!(policy.remaining(), 0);
        assert_eq!(policy.choose(&duel, Side::A, &mut rng), ActionType::ShootOther);
    }
}
