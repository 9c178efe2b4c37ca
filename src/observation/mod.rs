//! Agent-facing encodings of the duel state.

pub mod state_vector;

pub use state_vector::{Observation, ObservationError, OBSERVATION_LEN};
