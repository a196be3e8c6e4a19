//! # Event bus for suite and scenario lifecycle notifications.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`]. Publishers are the suite runner,
//! the coordinator, pool workers and the subscriber set itself; the only
//! regular receiver is the suite's listener, which fans events out to
//! subscribers.
//!
//! ```text
//! Suite ───────┐
//! Coordinator ─┼──► Bus ──► listener ──► SubscriberSet ──► sinks
//! Workers ─────┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; with no receiver the event is dropped
//! - receivers falling more than `capacity` events behind get `Lagged(n)`

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus; capacity is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all current receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver observing events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}
