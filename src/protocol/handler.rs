//! Applies agent requests to a duel.
//!
//! Runs on the simulation thread only. Requests that arrive at the wrong
//! moment (not an agent side's turn, reset before the match ended) are
//! dropped without a reply.

use tracing::debug;

use super::wire::{format_step, Request};
use crate::core::{Result, SessionConfig, Side};
use crate::duel::Duel;
use crate::observation::Observation;

/// Apply `request` to `duel`. Returns the reply to send, if any.
///
/// A `play_step` reply carries the state *after* the action, so the agent
/// sees the successor observation. Agents written against the older game
/// client, which replied with the pre-action state, must not expect that.
///
/// Only a depleted-deck draw is an error.
pub fn dispatch(duel: &mut Duel, config: &SessionConfig, request: Request) -> Result<Option<String>> {
    match request {
        Request::GetState => Ok(agent_turn(duel, config, request)
            .map(|_| Observation::from_duel(duel).to_csv())),
        Request::PlayStep(index) => match agent_turn(duel, config, request) {
            Some(side) => play_step(duel, side, index).map(Some),
            None => Ok(None),
        },
        Request::Reset => {
            reset(duel)?;
            Ok(None)
        }
    }
}

/// The agent side to move, if there is one.
fn agent_turn(duel: &Duel, config: &SessionConfig, request: Request) -> Option<Side> {
    if duel.is_match_over() {
        debug!(?request, "match over, waiting for reset");
        return None;
    }
    match duel.current_turn() {
        Some(side) if config.is_agent_side(side) => Some(side),
        turn => {
            debug!(?request, ?turn, "not an agent turn");
            None
        }
    }
}

fn play_step(duel: &mut Duel, side: Side, index: usize) -> Result<String> {
    // Out-of-range indices become out-of-range codes, which are penalized.
    let code = index
        .checked_add(1)
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(u8::MAX);
    let outcome = duel.execute_code(side, code)?;
    debug!(%side, code, reward = outcome.reward, valid = outcome.valid, "agent step");
    Ok(format_step(
        &Observation::from_duel(duel),
        outcome.reward,
        outcome.match_over,
    ))
}

fn reset(duel: &mut Duel) -> Result<()> {
    if !duel.is_match_over() {
        debug!("reset ignored, match still running");
        return Ok(());
    }
    duel.reset_match();
    duel.start_round()?;
    Ok(())
}
