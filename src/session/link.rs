//! Outbound connection to the external agent.
//!
//! The link never blocks the simulation thread on the network. It owns a
//! small tokio runtime, and connecting, reading and writing each run as a
//! task on it:
//!
//! - connect: one attempt under the connect timeout, reports `Connected` or `ConnectFailed`
//! - reader: reads, frames and parses requests, reports `Agent`
//! - writer: writes queued replies
//!
//! Every connection gets a generation number; messages tagged with an old
//! generation are ignored, so a stale reader can't feed a new connection.
//!
//! The link blocks on its own runtime during teardown, so it must be driven
//! from a plain thread, not from inside another async runtime.

use std::time::{Duration, Instant};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{lookup_host, TcpStream};
use tokio::runtime::{self, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::error::SessionError;
use super::message::Inbound;
use crate::core::SessionConfig;
use crate::protocol::{MessageFramer, Request};

const READ_BUFFER: usize = 1024;

struct Connection {
    generation: u64,
    outbound: UnboundedSender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// Reconnecting agent link, owned by the simulation loop.
pub struct AgentLink {
    config: SessionConfig,
    inbound: UnboundedSender<Inbound>,
    runtime: Runtime,
    generation: u64,
    connecting: bool,
    last_attempt: Option<Instant>,
    connection: Option<Connection>,
}

impl AgentLink {
    /// Build the link and its I/O runtime. Nothing connects until `poll_reconnect`.
    pub fn new(config: SessionConfig, inbound: UnboundedSender<Inbound>) -> Result<Self, SessionError> {
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("agent-io")
            .enable_io()
            .enable_time()
            .build()?;
        Ok(Self {
            config,
            inbound,
            runtime,
            generation: 0,
            connecting: false,
            last_attempt: None,
            connection: None,
        })
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Generation of the newest connection attempt.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Is `generation` the live connection?
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.connection
            .as_ref()
            .is_some_and(|c| c.generation == generation)
    }

    /// Start a connection attempt if disconnected and the retry interval passed.
    pub fn poll_reconnect(&mut self) {
        if self.connection.is_some() || self.connecting {
            return;
        }
        let now = Instant::now();
        if let Some(last) = self.last_attempt {
            if now.duration_since(last) < self.config.reconnect_interval() {
                return;
            }
        }
        self.last_attempt = Some(now);
        self.generation += 1;
        self.connecting = true;

        let generation = self.generation;
        let addr = self.config.address();
        let limit = self.config.connect_timeout();
        let inbound = self.inbound.clone();
        debug!(%addr, generation, "connecting to agent");

        self.runtime.spawn(async move {
            let message = match connect(&addr, limit).await {
                Ok(stream) => Inbound::Connected { generation, stream },
                Err(err) => Inbound::ConnectFailed {
                    generation,
                    error: err.to_string(),
                },
            };
            let _ = inbound.send(message);
        });
    }

    /// A connect attempt succeeded; start the reader and writer.
    pub fn on_connected(&mut self, generation: u64, stream: TcpStream) -> Result<(), SessionError> {
        if generation != self.generation {
            debug!(generation, "dropping stale connection");
            return Ok(());
        }
        self.connecting = false;

        stream.set_nodelay(true)?;
        let (read_half, write_half) = stream.into_split();
        let (outbound, replies) = mpsc::unbounded_channel::<String>();
        let io_timeout = self.config.io_timeout();

        let reader = self.runtime.spawn(read_requests(
            read_half,
            generation,
            self.config.line_terminated,
            io_timeout,
            self.inbound.clone(),
        ));
        let writer = self.runtime.spawn(write_replies(
            write_half,
            generation,
            replies,
            io_timeout,
            self.inbound.clone(),
        ));

        info!(addr = %self.config.address(), generation, "agent connected");
        self.connection = Some(Connection {
            generation,
            outbound,
            reader,
            writer,
        });
        Ok(())
    }

    pub fn on_connect_failed(&mut self, generation: u64, error: &str) {
        if generation == self.generation {
            self.connecting = false;
        }
        warn!(addr = %self.config.address(), %error, "agent connect failed");
    }

    /// The reader or writer reported the connection gone.
    pub fn on_closed(&mut self, generation: u64) {
        if self.is_current(generation) {
            info!(generation, "agent disconnected");
            self.teardown();
        }
    }

    /// Queue a reply for the writer. Returns false when disconnected.
    pub fn send(&self, mut reply: String) -> bool {
        let Some(connection) = &self.connection else {
            debug!("no agent connected, reply dropped");
            return false;
        };
        if self.config.line_terminated {
            reply.push('\n');
        }
        connection.outbound.send(reply).is_ok()
    }

    /// Close the connection and wait (bounded) for its tasks.
    pub fn shutdown(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };
        let Connection {
            generation,
            outbound,
            reader,
            writer,
        } = connection;

        // The writer flushes what is queued, then drops its half of the socket.
        drop(outbound);
        reader.abort();

        let limit = self.config.join_timeout();
        let joined = self.runtime.block_on(async move {
            timeout(limit, async move {
                let _ = reader.await;
                let _ = writer.await;
            })
            .await
        });
        if joined.is_err() {
            warn!(generation, ?limit, "agent tasks did not exit in time");
        }
    }
}

impl Drop for AgentLink {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for AgentLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentLink")
            .field("addr", &self.config.address())
            .field("generation", &self.generation)
            .field("connected", &self.is_connected())
            .finish()
    }
}

async fn connect(addr: &str, limit: Duration) -> Result<TcpStream, SessionError> {
    let addrs: Vec<_> = lookup_host(addr)
        .await
        .map_err(|_| SessionError::Resolve(addr.to_string()))?
        .collect();
    for socket_addr in addrs {
        if let Ok(Ok(stream)) = timeout(limit, TcpStream::connect(socket_addr)).await {
            return Ok(stream);
        }
    }
    Err(SessionError::Connect {
        addr: addr.to_string(),
    })
}

async fn read_requests(
    mut stream: OwnedReadHalf,
    generation: u64,
    line_terminated: bool,
    limit: Duration,
    inbound: UnboundedSender<Inbound>,
) {
    let mut framer = MessageFramer::new(line_terminated);
    let mut buf = [0u8; READ_BUFFER];
    loop {
        let n = match timeout(limit, stream.read(&mut buf)).await {
            Ok(Ok(0)) => break,
            Ok(Ok(n)) => n,
            Ok(Err(err)) => {
                debug!(generation, error = %err, "agent read failed");
                break;
            }
            Err(_) => {
                debug!(generation, ?limit, "agent read timed out");
                break;
            }
        };
        let chunk = String::from_utf8_lossy(&buf[..n]);
        for message in framer.push(&chunk) {
            match Request::parse(&message) {
                Ok(request) => {
                    if inbound.send(Inbound::Agent { generation, request }).is_err() {
                        return;
                    }
                }
                Err(err) => warn!(%message, error = %err, "ignoring agent message"),
            }
        }
    }
    let _ = inbound.send(Inbound::Closed { generation });
}

async fn write_replies(
    mut stream: OwnedWriteHalf,
    generation: u64,
    mut replies: UnboundedReceiver<String>,
    limit: Duration,
    inbound: UnboundedSender<Inbound>,
) {
    while let Some(reply) = replies.recv().await {
        let written = timeout(limit, async {
            stream.write_all(reply.as_bytes()).await?;
            stream.flush().await
        })
        .await;
        let failure = match written {
            Ok(Ok(())) => continue,
            Ok(Err(err)) => err.to_string(),
            Err(_) => "timed out".to_string(),
        };
        debug!(generation, error = %failure, "agent write failed");
        let _ = inbound.send(Inbound::Closed { generation });
        return;
    }
}
