//! The simulation loop.
//!
//! `SessionServer` is the single writer of the duel. Each tick it:
//!
//! 1. Starts a reconnect attempt if the agent link is down
//! 2. Drains the inbound queue in FIFO order, applying each message
//! 3. Lets the opponent policy move once if a non-agent side is to move
//!
//! Link tasks and `SessionHandle`s only enqueue; nothing else touches
//! the duel. Events the duel published during the tick are delivered to
//! subscribers as they happen and dropped from its queue at the end.

use std::thread;

use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, trace, warn};

use super::error::SessionError;
use super::link::AgentLink;
use super::message::{Inbound, SessionHandle};
use crate::core::{GameRng, SessionConfig};
use crate::duel::Duel;
use crate::policy::Policy;
use crate::protocol::dispatch;

/// Owns the duel, the inbound queue and the agent link.
pub struct SessionServer {
    duel: Duel,
    config: SessionConfig,
    tx: UnboundedSender<Inbound>,
    rx: UnboundedReceiver<Inbound>,
    link: AgentLink,
    opponent: Option<Box<dyn Policy>>,
    policy_rng: GameRng,
    matches_completed: u32,
    match_counted: bool,
    stopped: bool,
}

impl SessionServer {
    /// Fails only if the link's I/O runtime can't be started.
    pub fn new(duel: Duel, config: SessionConfig) -> Result<Self, SessionError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let link = AgentLink::new(config.clone(), tx.clone())?;
        let policy_rng = duel.rng().clone().fork();
        Ok(Self {
            duel,
            config,
            tx,
            rx,
            link,
            opponent: None,
            policy_rng,
            matches_completed: 0,
            match_counted: false,
            stopped: false,
        })
    }

    /// Drive non-agent sides with `policy`.
    #[must_use]
    pub fn with_opponent(mut self, policy: Box<dyn Policy>) -> Self {
        self.opponent = Some(policy);
        self
    }

    /// A handle for submitting work from other threads.
    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(self.tx.clone())
    }

    #[must_use]
    pub fn duel(&self) -> &Duel {
        &self.duel
    }

    pub fn duel_mut(&mut self) -> &mut Duel {
        &mut self.duel
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    /// Matches that reached a winner since the session started.
    #[must_use]
    pub fn matches_completed(&self) -> u32 {
        self.matches_completed
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// One iteration of the loop. Errors are fatal.
    pub fn tick(&mut self) -> Result<(), SessionError> {
        self.link.poll_reconnect();

        loop {
            match self.rx.try_recv() {
                Ok(message) => {
                    self.handle_inbound(message)?;
                    if self.stopped {
                        self.flush_events();
                        return Ok(());
                    }
                }
                Err(TryRecvError::Empty) => break,
                // We hold a sender, so this can't happen.
                Err(TryRecvError::Disconnected) => return Err(SessionError::Disconnected),
            }
        }

        self.drive_opponent()?;
        self.flush_events();
        Ok(())
    }

    /// Tick until stopped, `max_matches` is reached, or a fatal error.
    pub fn run(&mut self) -> Result<(), SessionError> {
        info!(
            addr = %self.config.address(),
            agent_sides = ?self.config.agent_sides,
            opponent = self.opponent.as_ref().map(|p| p.name()),
            "session started"
        );

        let result = loop {
            if let Err(err) = self.tick() {
                break Err(err);
            }
            if self.stopped {
                break Ok(());
            }
            if let Some(max) = self.config.max_matches {
                if self.matches_completed >= max {
                    info!(matches = self.matches_completed, "match limit reached");
                    break Ok(());
                }
            }
            thread::sleep(self.config.tick_interval());
        };

        self.shutdown();
        result
    }

    /// Apply queued work, then close the link.
    pub fn shutdown(&mut self) {
        while let Ok(message) = self.rx.try_recv() {
            match message {
                Inbound::Connected { .. } | Inbound::ConnectFailed { .. } => {}
                other => {
                    if let Err(err) = self.handle_inbound(other) {
                        warn!(error = %err, "error while draining session queue");
                        break;
                    }
                }
            }
        }
        self.flush_events();
        self.link.shutdown();
        self.stopped = true;
        info!(matches = self.matches_completed, "session stopped");
    }

    fn handle_inbound(&mut self, message: Inbound) -> Result<(), SessionError> {
        match message {
            Inbound::Connected { generation, stream } => {
                if let Err(err) = self.link.on_connected(generation, stream) {
                    warn!(error = %err, "could not set up agent connection");
                }
            }
            Inbound::ConnectFailed { generation, error } => {
                self.link.on_connect_failed(generation, &error);
            }
            Inbound::Closed { generation } => self.link.on_closed(generation),
            Inbound::Agent {
                generation,
                request,
            } => {
                if !self.link.is_current(generation) {
                    debug!(generation, ?request, "request from stale connection");
                    return Ok(());
                }
                if let Some(reply) = dispatch(&mut self.duel, &self.config, request)? {
                    self.link.send(reply);
                }
            }
            Inbound::Human { side, code, reply } => {
                let result = self.duel.execute_human_action(side, code);
                if let Err(err) = &result {
                    if err.is_fatal() {
                        return Err(err.clone().into());
                    }
                    debug!(%side, code, error = %err, "human action refused");
                }
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            Inbound::StartRound => {
                if let Err(err) = self.duel.start_round() {
                    debug!(error = %err, "start round refused");
                }
            }
            Inbound::ResetMatch => self.duel.reset_match(),
            Inbound::Stop => self.stopped = true,
        }
        self.note_match_end();
        Ok(())
    }

    /// Let the policy move once for a non-agent side.
    fn drive_opponent(&mut self) -> Result<(), SessionError> {
        if self.config.agent_sides.is_empty() && self.duel.is_match_over() {
            // Nobody would send a reset in a policy-only session.
            self.duel.reset_match();
            self.duel.start_round()?;
            self.note_match_end();
        }

        let Some(side) = self.duel.current_turn() else {
            return Ok(());
        };
        if self.config.is_agent_side(side) {
            return Ok(());
        }
        let Some(policy) = self.opponent.as_mut() else {
            return Ok(());
        };

        let action = policy.choose(&self.duel, side, &mut self.policy_rng);
        let outcome = self.duel.execute(side, action)?;
        debug!(%side, %action, reward = outcome.reward, "opponent move");
        self.note_match_end();
        Ok(())
    }

    fn flush_events(&mut self) {
        for event in self.duel.drain_events() {
            trace!(%event, "duel event");
        }
    }

    fn note_match_end(&mut self) {
        let over = self.duel.is_match_over();
        if over && !self.match_counted {
            self.matches_completed += 1;
        }
        self.match_counted = over;
    }
}

impl std::fmt::Debug for SessionServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionServer")
            .field("link", &self.link)
            .field("matches_completed", &self.matches_completed)
            .field("stopped", &self.stopped)
            .finish()
    }
}
