//! The duel state machine.
//!
//! `Duel` owns every piece of simulation state (chamber, inventories,
//! sides, gun, knowledge) and is the only thing that mutates it. Drivers
//! submit actions through [`Duel::execute`] or the [`RulesEngine`] trait and
//! observe results through the return value and the event bus.
//!
//! ## Action resolution
//!
//! 1. Reject with an escalating penalty if the side lacks the item
//! 2. Consume the item and dispatch the effect
//! 3. End the match if a side has no lives left
//! 4. Otherwise regenerate an emptied chamber, keeping turn, lives and items
//! 5. Record the action in the history

use im::Vector;
use tracing::{debug, info};

use super::state::{GunState, Phase, StepOutcome};
use crate::chamber::{ChamberDeck, DeckSnapshot, Knowledge, Shell};
use crate::core::{
    ActionRecord, ActionType, DuelConfig, DuelError, GameRng, ItemCode, Result, Side, SideMap,
};
use crate::events::{DuelEvent, EventBus};
use crate::inventory::Inventory;
use crate::player::PlayerState;
use crate::rewards::{
    beer_reward, cigar_reward, handcuffs_reward, mag_glass_reward, shoot_reward,
    InvalidActionTracker,
};
use crate::rules::{GameResult, RulesEngine};

/// A two-sided duel.
#[derive(Debug)]
pub struct Duel {
    config: DuelConfig,
    rng: GameRng,
    deck: ChamberDeck,
    inventory: Inventory,
    players: SideMap<PlayerState>,
    gun: GunState,
    knowledge: Knowledge,
    phase: Phase,
    turn: Option<Side>,
    winner: Option<Side>,
    invalid: InvalidActionTracker,
    events: EventBus,
    history: Vector<ActionRecord>,
    round: u32,
    sequence: u32,
}

impl Duel {
    /// Create a duel seeded for reproducible decks and grants.
    ///
    /// With `auto_start` the first round is loaded immediately.
    pub fn new(config: DuelConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, GameRng::new(seed))
    }

    /// Create a duel drawing from an existing RNG stream.
    pub fn with_rng(config: DuelConfig, rng: GameRng) -> Result<Self> {
        config.validate()?;
        let mut duel = Self {
            inventory: Inventory::new(config.inventory_capacity),
            players: SideMap::new(|_| PlayerState::new(config.max_lives)),
            config,
            rng,
            deck: ChamberDeck::new(),
            gun: GunState::default(),
            knowledge: Knowledge::Unknown,
            phase: Phase::AwaitingRoundStart,
            turn: None,
            winner: None,
            invalid: InvalidActionTracker::new(),
            events: EventBus::new(),
            history: Vector::new(),
            round: 0,
            sequence: 0,
        };
        if duel.config.auto_start {
            duel.begin_round();
        }
        Ok(duel)
    }

    // === Read-only state ===

    #[must_use]
    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    /// The side to move, or `None` while a round is pending or the match is over.
    #[must_use]
    pub fn current_turn(&self) -> Option<Side> {
        match self.phase {
            Phase::InRound => self.turn,
            Phase::AwaitingRoundStart | Phase::MatchOver => None,
        }
    }

    #[must_use]
    pub fn is_round_pending(&self) -> bool {
        self.phase == Phase::AwaitingRoundStart
    }

    #[must_use]
    pub fn is_match_over(&self) -> bool {
        self.phase == Phase::MatchOver
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    #[must_use]
    pub fn deck(&self) -> &ChamberDeck {
        &self.deck
    }

    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    #[must_use]
    pub fn player(&self, side: Side) -> &PlayerState {
        &self.players[side]
    }

    #[must_use]
    pub fn gun(&self) -> GunState {
        self.gun
    }

    #[must_use]
    pub fn knowledge(&self) -> Knowledge {
        self.knowledge
    }

    /// Rounds loaded since the match started.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Every executed action this match, valid or not.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Consecutive invalid attempts by `side` since its last valid action.
    #[must_use]
    pub fn invalid_streak(&self, side: Side) -> u32 {
        self.invalid.streak(side)
    }

    #[must_use]
    pub fn rng(&self) -> &GameRng {
        &self.rng
    }

    // === Events ===

    /// Subscribe or unsubscribe presentation listeners.
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Take the events published since the last drain.
    pub fn drain_events(&mut self) -> Vec<DuelEvent> {
        self.events.drain()
    }

    // === Lifecycle ===

    /// Load the first round of a match.
    ///
    /// Does nothing while a round is already in play.
    pub fn start_round(&mut self) -> Result<DeckSnapshot> {
        match self.phase {
            Phase::MatchOver => Err(DuelError::MatchOver),
            Phase::InRound => Ok(self.deck.snapshot()),
            Phase::AwaitingRoundStart => Ok(self.begin_round()),
        }
    }

    /// Restore full lives, empty boards and chamber, clear history and
    /// any undrained events.
    ///
    /// With `auto_start` the next match's first round is loaded right away.
    pub fn reset_match(&mut self) {
        for (_, player) in self.players.iter_mut() {
            player.reset();
        }
        self.inventory.clear();
        self.deck.clear();
        self.gun.reset();
        self.knowledge = Knowledge::Unknown;
        self.phase = Phase::AwaitingRoundStart;
        self.turn = None;
        self.winner = None;
        self.invalid.clear();
        self.history.clear();
        self.round = 0;
        self.sequence = 0;
        self.events.clear_pending();
        self.events.publish(DuelEvent::MatchReset);
        debug!("match reset");

        if self.config.auto_start {
            self.begin_round();
        }
    }

    // === Actions ===

    /// Resolve `action` for `side`.
    ///
    /// Unheld items are penalized, not errors. Errors are reserved for
    /// acting out of turn, before the round starts or after the match ends
    /// (all without mutation) and for a depleted-deck draw.
    pub fn execute(&mut self, side: Side, action: ActionType) -> Result<StepOutcome> {
        self.ensure_can_act(side)?;
        self.resolve(side, action)
    }

    /// Resolve a raw one-based action code. Codes outside 1..=7 are penalized.
    pub fn execute_code(&mut self, side: Side, code: u8) -> Result<StepOutcome> {
        self.ensure_can_act(side)?;
        match ActionType::from_code(code) {
            Some(action) => self.resolve(side, action),
            None => Ok(self.reject(side, code)),
        }
    }

    /// Input-handler entry point: `(reward, match_over)` for a raw action code.
    pub fn execute_human_action(&mut self, side: Side, code: u8) -> Result<(f32, bool)> {
        self.execute_code(side, code).map(|outcome| outcome.as_pair())
    }

    /// Actions `side` may take right now. Empty when it is not `side`'s turn.
    #[must_use]
    pub fn legal_actions(&self, side: Side) -> Vec<ActionType> {
        if self.current_turn() != Some(side) {
            return Vec::new();
        }
        ActionType::ALL
            .into_iter()
            .filter(|action| match action.item() {
                Some(item) => self.inventory.count(side, item) > 0,
                None => true,
            })
            .collect()
    }

    // === Scenario setup ===

    /// Replace the chamber with `shells`; the last element is drawn first.
    ///
    /// Loading an empty chamber while a round is in play makes the next
    /// shot fail with `DeckEmpty`.
    pub fn load_chamber(&mut self, shells: Vec<Shell>) -> DeckSnapshot {
        self.knowledge = Knowledge::Unknown;
        self.deck.load(shells)
    }

    /// Put `item` on `side`'s board. Returns the slot, or `None` when full.
    pub fn grant_item(&mut self, side: Side, item: ItemCode) -> Option<usize> {
        let slot = self.inventory.place(side, item)?;
        self.events.publish(DuelEvent::ItemsGranted {
            side,
            items: vec![(slot, item)],
        });
        Some(slot)
    }

    // === Internals ===

    fn ensure_can_act(&self, side: Side) -> Result<()> {
        match self.phase {
            Phase::AwaitingRoundStart => Err(DuelError::RoundPending),
            Phase::MatchOver => Err(DuelError::MatchOver),
            Phase::InRound if self.turn != Some(side) => Err(DuelError::NotYourTurn { side }),
            Phase::InRound => Ok(()),
        }
    }

    fn resolve(&mut self, side: Side, action: ActionType) -> Result<StepOutcome> {
        // Fail before anything is consumed or published.
        if action.draws_shell() && self.deck.is_empty() {
            return Err(DuelError::DeckEmpty);
        }
        if let Some(item) = action.item() {
            match self.inventory.take(side, item) {
                Some(slot) => self.events.publish(DuelEvent::ItemConsumed { side, item, slot }),
                None => return Ok(self.reject(side, action.code())),
            }
        }
        self.invalid.reset(side);

        let (reward, shell) = match action {
            ActionType::ShootSelf => self.shoot(side, side)?,
            ActionType::ShootOther => self.shoot(side, side.opponent())?,
            ActionType::Drink => self.drink(side)?,
            ActionType::MagGlass => (self.inspect(side), None),
            ActionType::Cigar => (self.smoke(side), None),
            ActionType::Knife => (self.saw_off(side), None),
            ActionType::Handcuffs => (self.cuff(side), None),
        };

        let match_over = self.check_match_over();
        if !match_over && self.deck.is_empty() {
            self.begin_round();
        }

        self.record(side, action.code(), reward, true);
        Ok(StepOutcome {
            reward,
            match_over,
            valid: true,
            shell,
        })
    }

    fn reject(&mut self, side: Side, code: u8) -> StepOutcome {
        let penalty = self.invalid.penalize(side);
        debug!(%side, code, penalty, "invalid action");
        self.record(side, code, penalty, false);
        StepOutcome::rejected(penalty)
    }

    fn record(&mut self, side: Side, action_code: u8, reward: f32, valid: bool) {
        self.history.push_back(ActionRecord {
            side,
            action_code,
            reward,
            valid,
            round: self.round,
            sequence: self.sequence,
        });
        self.sequence += 1;
    }

    fn shoot(&mut self, shooter: Side, target: Side) -> Result<(f32, Option<Shell>)> {
        let shell = self.deck.draw_next()?;
        let knife_used = self.gun.is_knife_armed();
        let damage = self.gun.fire();
        self.knowledge = Knowledge::Unknown;

        if shell.is_live() {
            self.players[target].take_damage(damage);
        }
        self.events.publish(DuelEvent::ShotFired {
            shooter,
            target,
            shell,
            damage,
        });

        let is_self = shooter == target;
        let reward = shoot_reward(
            shell.is_live(),
            is_self,
            damage,
            knife_used,
            self.players[shooter].lives(),
            self.players[target].lives(),
        );

        // A blank at yourself keeps the turn.
        if !(is_self && !shell.is_live()) {
            self.pass_turn(shooter);
        }
        Ok((reward, Some(shell)))
    }

    fn drink(&mut self, side: Side) -> Result<(f32, Option<Shell>)> {
        let shell = self.deck.draw_next()?;
        self.knowledge = Knowledge::Unknown;
        self.events.publish(DuelEvent::ShellEjected { side, shell });
        Ok((beer_reward(shell.is_live()), Some(shell)))
    }

    fn inspect(&mut self, side: Side) -> f32 {
        let Some(shell) = self.deck.peek_next() else {
            self.knowledge = Knowledge::Unknown;
            return 0.0;
        };
        self.knowledge = Knowledge::from(shell);
        self.events.publish(DuelEvent::ShellInspected { side, shell });
        mag_glass_reward(
            self.deck.len(),
            self.deck.blank_count(),
            self.deck.live_count(),
            self.knowledge,
        )
    }

    fn smoke(&mut self, side: Side) -> f32 {
        let player = &mut self.players[side];
        let reward = cigar_reward(player.lives(), player.max_lives());
        player.heal(1);
        let lives = player.lives();
        self.events.publish(DuelEvent::Healed { side, lives });
        reward
    }

    fn saw_off(&mut self, side: Side) -> f32 {
        self.gun.arm_knife();
        self.knowledge = Knowledge::Unknown;
        self.events.publish(DuelEvent::KnifeReady { side });
        0.0
    }

    fn cuff(&mut self, side: Side) -> f32 {
        let target = side.opponent();
        let already = self.players[target].is_handcuffed();
        self.players[target].set_handcuffed(true);
        self.events.publish(DuelEvent::Handcuffed { side: target });
        handcuffs_reward(already)
    }

    /// Hand the turn to the opponent, unless the opponent is cuffed: then
    /// the cuff is spent and `from` moves again.
    fn pass_turn(&mut self, from: Side) {
        let next = from.opponent();
        if self.players[next].is_handcuffed() {
            self.players[next].set_handcuffed(false);
            self.events.publish(DuelEvent::HandcuffsSkipped { side: next });
        } else {
            self.turn = Some(next);
            self.events.publish(DuelEvent::TurnChanged { side: next });
        }
    }

    fn check_match_over(&mut self) -> bool {
        let Some(loser) = Side::ALL.into_iter().find(|s| self.players[*s].is_dead()) else {
            return false;
        };
        let winner = loser.opponent();
        self.phase = Phase::MatchOver;
        self.turn = None;
        self.winner = Some(winner);
        self.deck.clear();
        self.knowledge = Knowledge::Unknown;
        self.events.publish(DuelEvent::MatchOver { winner });
        info!(%winner, rounds = self.round, "match over");
        true
    }

    fn begin_round(&mut self) -> DeckSnapshot {
        self.round += 1;
        let snapshot = self.deck.new_round(&mut self.rng, &self.config);
        self.knowledge = Knowledge::Unknown;
        self.phase = Phase::InRound;
        self.events.publish(DuelEvent::RoundStarted {
            round: self.round,
            live: snapshot.live,
            blank: snapshot.blank,
        });

        let range = self.config.grant_range;
        let grant = self.rng.gen_range(range.min..=range.max) as usize;
        for side in Side::ALL {
            let items = self.inventory.grant(side, grant, &mut self.rng);
            self.events.publish(DuelEvent::ItemsGranted { side, items });
        }

        if self.turn.is_none() {
            let first = self.config.first_turn;
            self.turn = Some(first);
            self.events.publish(DuelEvent::TurnChanged { side: first });
        }
        debug!(
            round = self.round,
            live = snapshot.live,
            blank = snapshot.blank,
            "round started"
        );
        snapshot
    }
}

impl RulesEngine for Duel {
    fn config(&self) -> &DuelConfig {
        &self.config
    }

    fn legal_actions(&self, side: Side) -> Vec<ActionType> {
        Duel::legal_actions(self, side)
    }

    fn apply_action(&mut self, side: Side, action: ActionType) -> Result<StepOutcome> {
        self.execute(side, action)
    }

    fn is_terminal(&self) -> Option<GameResult> {
        self.winner.map(GameResult::Winner)
    }
}

/// Builder for a `Duel`.
#[derive(Clone, Debug, Default)]
pub struct DuelBuilder {
    config: DuelConfig,
    seed: Option<u64>,
}

impl DuelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: DuelConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_lives(mut self, lives: u32) -> Self {
        self.config.max_lives = lives;
        self
    }

    pub fn first_turn(mut self, side: Side) -> Self {
        self.config.first_turn = side;
        self
    }

    pub fn auto_start(mut self, auto_start: bool) -> Self {
        self.config.auto_start = auto_start;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the duel. Without a seed the RNG is seeded from the OS.
    pub fn build(self) -> Result<Duel> {
        let rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        Duel::with_rng(self.config, rng)
    }
}
