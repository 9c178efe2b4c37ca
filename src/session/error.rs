//! Session transport errors.

use thiserror::Error;

use crate::core::DuelError;

/// Error type for the agent session.
///
/// Transport variants are recoverable (the link reconnects); `Duel` carries
/// a broken simulation invariant and ends the session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not connect to agent at {addr}")]
    Connect { addr: String },
    #[error("could not resolve agent address {0}")]
    Resolve(String),
    #[error("session is no longer running")]
    Disconnected,
    #[error("simulation failed: {0}")]
    Duel(#[from] DuelError),
}

impl SessionError {
    /// Does this error end the simulation loop?
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            SessionError::Duel(err) => err.is_fatal(),
            SessionError::Disconnected => true,
            _ => false,
        }
    }
}
