//! Duel event notifications.
//!
//! - [`DuelEvent`]: What happened (shot fired, item used, turn changed, ...)
//! - [`EventBus`]: Subscriber fan-out plus a drainable backlog
//!
//! ## Example Usage
//!
//! ```
//! use buckshot_duel::core::Side;
//! use buckshot_duel::events::{DuelEvent, EventBus, EventKind};
//!
//! let mut bus = EventBus::new();
//! bus.subscribe_kind(EventKind::Match, |event| println!("{event}"));
//! bus.publish(DuelEvent::MatchOver { winner: Side::A });
//!
//! assert_eq!(bus.drain().len(), 1);
//! ```

mod bus;
mod event;

pub use bus::{EventBus, SubscriberId};
pub use event::{DuelEvent, EventKind};
