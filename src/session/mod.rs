//! Agent session: async socket tasks feeding a single-writer simulation loop.
//!
//! - [`SessionServer`]: Owns the duel and drains the inbound queue each tick
//! - [`AgentLink`]: Reconnecting TCP link with tokio reader/writer tasks
//! - [`SessionHandle`]: Cloneable sender for human input and lifecycle commands
//!
//! ## Example Usage
//!
//! ```no_run
//! use buckshot_duel::core::{DuelConfig, SessionConfig};
//! use buckshot_duel::duel::Duel;
//! use buckshot_duel::policy::RandomPolicy;
//! use buckshot_duel::session::SessionServer;
//!
//! let duel = Duel::new(DuelConfig::default().with_auto_start(true), 42).unwrap();
//! let mut server = SessionServer::new(duel, SessionConfig::default())
//!     .unwrap()
//!     .with_opponent(Box::new(RandomPolicy));
//! server.run().unwrap();
//! ```

mod error;
mod link;
mod message;
mod server;

pub use error::SessionError;
pub use link::AgentLink;
pub use message::{Inbound, SessionHandle};
pub use server::SessionServer;
