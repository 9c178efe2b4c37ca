//! Rules engine trait for duel drivers.
//!
//! `Duel` implements `RulesEngine`; policies and bindings only need the
//! trait to enumerate and apply actions.

pub mod engine;

pub use engine::{GameResult, RulesEngine};
