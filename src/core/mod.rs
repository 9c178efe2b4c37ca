//! Core duel types: sides, actions, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these.

pub mod side;
pub mod rng;
pub mod action;
pub mod config;
pub mod error;

pub use side::{Side, SideMap};
pub use rng::{GameRng, GameRngState};
pub use action::{ActionRecord, ActionType, ItemCode};
pub use config::{CountRange, DuelConfig, SessionConfig};
pub use error::{DuelError, Result};
