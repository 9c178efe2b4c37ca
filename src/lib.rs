//! # buckshot-duel
//!
//! A two-sided, turn-based shotgun duel built for training and evaluating
//! an external agent.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: Only the simulation loop mutates the duel. Socket
//!    tasks and input handlers enqueue work; they never touch state.
//!
//! 2. **Explicit State Machine**: Round start, turn transfer, handcuff skips
//!    and match end are named transitions on `Duel`, testable without a
//!    render loop or a socket.
//!
//! 3. **Pure Rewards**: Reward functions take explicit inputs and keep no
//!    hidden state; only the invalid-action streak is tracked.
//!
//! 4. **Deterministic**: All randomness flows through a seeded `GameRng`.
//!
//! ## Modules
//!
//! - `core`: Sides, actions, RNG, configuration, errors
//! - `chamber`: Live/blank shell deck
//! - `inventory`: Per-side item boards
//! - `player`: Lives and handcuff status
//! - `rewards`: Reward functions and invalid-action escalation
//! - `events`: Published notifications for presentation layers
//! - `rules`: RulesEngine trait
//! - `duel`: The turn/match state machine
//! - `observation`: Agent-facing state vector
//! - `protocol`: Agent wire format and request handling
//! - `policy`: Headless stand-ins for the human side
//! - `session`: Agent socket link and simulation loop

pub mod core;
pub mod chamber;
pub mod inventory;
pub mod player;
pub mod rewards;
pub mod events;
pub mod rules;
pub mod duel;
pub mod observation;
pub mod protocol;
pub mod policy;
pub mod session;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Side, SideMap,
    GameRng, GameRngState,
    ActionType, ItemCode, ActionRecord,
    DuelConfig, SessionConfig, CountRange,
    DuelError, Result,
};

pub use crate::chamber::{ChamberDeck, DeckSnapshot, Knowledge, Shell};

pub use crate::inventory::{Inventory, ItemBoard};

pub use crate::player::PlayerState;

pub use crate::rewards::InvalidActionTracker;

pub use crate::events::{DuelEvent, EventBus, EventKind, SubscriberId};

pub use crate::rules::{RulesEngine, GameResult};

pub use crate::duel::{Duel, DuelBuilder, GunState, Phase, StepOutcome};

pub use crate::observation::{Observation, ObservationError, OBSERVATION_LEN};

pub use crate::protocol::{ProtocolError, Request, StepReply};

pub use crate::policy::{Policy, RandomPolicy, ScriptedPolicy};

pub use crate::session::{SessionError, SessionHandle, SessionServer};
