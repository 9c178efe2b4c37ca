//! Player (side) state owned by the duel.

pub mod state;

pub use state::PlayerState;
