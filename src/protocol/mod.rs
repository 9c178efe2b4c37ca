//! Agent wire protocol.
//!
//! - `wire`: Message parsing, reply formatting, framing
//! - `handler`: Applying parsed requests to a duel

pub mod handler;
pub mod wire;

pub use handler::dispatch;
pub use wire::{bool_token, format_step, MessageFramer, ProtocolError, Request, StepReply};
