//! Turn and match state machine.
//!
//! - `Duel`: owns all simulation state and resolves actions
//! - `DuelBuilder`: config + seed convenience
//! - `Phase`, `GunState`, `StepOutcome`: supporting state types

pub mod game;
pub mod state;

pub use game::{Duel, DuelBuilder};
pub use state::{GunState, Phase, StepOutcome};
