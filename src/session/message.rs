//! Messages queued for the simulation thread.

use tokio::net::TcpStream;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

use super::error::SessionError;
use crate::core::{Result as DuelResult, Side};
use crate::protocol::Request;

/// Work for the simulation loop. Socket threads and session handles only
/// ever produce these; the loop consumes them in FIFO order.
#[derive(Debug)]
pub enum Inbound {
    /// The connector thread reached the agent.
    Connected { generation: u64, stream: TcpStream },
    ConnectFailed { generation: u64, error: String },
    /// A parsed request from the agent.
    Agent { generation: u64, request: Request },
    /// The reader or writer lost the connection.
    Closed { generation: u64 },
    /// An input-handler action; the result goes back on `reply` if present.
    Human {
        side: Side,
        code: u8,
        reply: Option<oneshot::Sender<DuelResult<(f32, bool)>>>,
    },
    StartRound,
    ResetMatch,
    Stop,
}

/// Cloneable handle for feeding the simulation loop from other threads.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: UnboundedSender<Inbound>,
}

impl SessionHandle {
    pub(crate) fn new(tx: UnboundedSender<Inbound>) -> Self {
        Self { tx }
    }

    /// Submit a human action and wait for the loop to apply it.
    ///
    /// Blocks the calling thread; don't call it from async code.
    pub fn execute_human(&self, side: Side, code: u8) -> Result<(f32, bool), SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Inbound::Human {
            side,
            code,
            reply: Some(reply_tx),
        })?;
        let result = reply_rx.blocking_recv().map_err(|_| SessionError::Disconnected)?;
        Ok(result?)
    }

    /// Submit a human action without waiting for its result.
    pub fn submit_human(&self, side: Side, code: u8) -> Result<(), SessionError> {
        self.send(Inbound::Human {
            side,
            code,
            reply: None,
        })
    }

    pub fn start_round(&self) -> Result<(), SessionError> {
        self.send(Inbound::StartRound)
    }

    pub fn reset_match(&self) -> Result<(), SessionError> {
        self.send(Inbound::ResetMatch)
    }

    /// Ask the loop to stop after the current tick.
    pub fn stop(&self) -> Result<(), SessionError> {
        self.send(Inbound::Stop)
    }

    fn send(&self, message: Inbound) -> Result<(), SessionError> {
        self.tx.send(message).map_err(|_| SessionError::Disconnected)
    }
}
