//! Publish/subscribe for duel events.
//!
//! Subscribers are plain closures keyed by `SubscriberId`. Every published
//! event is also queued so callers without a subscription can drain the
//! backlog after each step.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::event::{DuelEvent, EventKind};

/// Handle returned by `EventBus::subscribe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(pub u32);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Subscriber({})", self.0)
    }
}

type Callback = Box<dyn FnMut(&DuelEvent) + Send>;

struct Subscriber {
    filter: Option<EventKind>,
    callback: Callback,
}

/// Event fan-out owned by the duel.
#[derive(Default)]
pub struct EventBus {
    subscribers: FxHashMap<SubscriberId, Subscriber>,
    next_id: u32,
    pending: Vec<DuelEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event.
    pub fn subscribe(&mut self, callback: impl FnMut(&DuelEvent) + Send + 'static) -> SubscriberId {
        self.insert(None, Box::new(callback))
    }

    /// Receive only events of `kind`.
    pub fn subscribe_kind(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&DuelEvent) + Send + 'static,
    ) -> SubscriberId {
        self.insert(Some(kind), Box::new(callback))
    }

    /// Remove a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Deliver `event` to matching subscribers in subscription order, then queue it.
    pub fn publish(&mut self, event: DuelEvent) {
        let kind = event.kind();
        let mut ids: Vec<SubscriberId> = self.subscribers.keys().copied().collect();
        ids.sort_unstable();
        for id in ids {
            if let Some(subscriber) = self.subscribers.get_mut(&id) {
                if subscriber.filter.map_or(true, |f| f == kind) {
                    (subscriber.callback)(&event);
                }
            }
        }
        self.pending.push(event);
    }

    /// Take all queued events.
    pub fn drain(&mut self) -> Vec<DuelEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Drop queued events without delivering them again.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    #[must_use]
    pub fn pending(&self) -> &[DuelEvent] {
        &self.pending
    }

    fn insert(&mut self, filter: Option<EventKind>, callback: Callback) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, Subscriber { filter, callback });
        id
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_publish_reaches_subscribers() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        bus.subscribe(move |e| sink.lock().unwrap().push(e.clone()));

        bus.publish(DuelEvent::TurnChanged { side: Side::B });
        bus.publish(DuelEvent::MatchReset);

        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(bus.drain().len(), 2);
        assert!(bus.pending().is_empty());
    }

    #[test]
    fn test_kind_filter() {
        let mut bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        bus.subscribe_kind(EventKind::Match, move |_| *sink.lock().unwrap() += 1);

        bus.publish(DuelEvent::TurnChanged { side: Side::A });
        bus.publish(DuelEvent::MatchOver { winner: Side::A });

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let id = bus.subscribe(move |_| *sink.lock().unwrap() += 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(DuelEvent::MatchReset);

        assert_eq!(*count.lock().unwrap(), 0);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
