//! # Event feed for broadcasting runtime events.
//!
//! [`Feed`] is a thin wrapper around [`tokio::sync::broadcast`] that
//! provides non-blocking event publishing from the dispatch worker and the
//! observer plumbing.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: a single ring buffer stores recent events for all
//!   receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip
//!   `n` oldest items.
//! - **No persistence**: events are lost if there are no active receivers at
//!   publish time.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for runtime events.
///
/// Thin wrapper over [`tokio::sync::broadcast`] that provides
/// `publish`/`subscribe` methods for working with [`Event`]s. Cheap to clone
/// (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Feed {
    tx: broadcast::Sender<Event>,
}

impl Feed {
    /// Creates a new feed with the given channel capacity.
    ///
    /// Capacity is shared across all receivers (not per-receiver); the
    /// minimum is 1 (clamped).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped; this function still
    /// returns immediately.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Publishes a borrowed event by cloning it.
    pub fn publish_ref(&self, ev: &Event) {
        let _ = self.tx.send(ev.clone());
    }

    /// Creates a new receiver that will observe subsequent events.
    ///
    /// Each call creates an independent receiver; a receiver only gets
    /// events published after it subscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_receiver_observes_published_events() {
        let feed = Feed::new(8);
        let mut rx = feed.subscribe();

        feed.publish(Event::new(EventKind::MessageProcessed));

        let ev = rx.recv().await.expect("event delivered");
        assert_eq!(ev.kind, EventKind::MessageProcessed);
    }

    #[tokio::test]
    async fn test_publish_without_receivers_is_a_noop() {
        let feed = Feed::new(1);
        feed.publish(Event::new(EventKind::MessageProcessed));
    }

    #[test]
    fn test_capacity_is_clamped_to_one() {
        // Would panic inside broadcast::channel with capacity 0.
        let _feed = Feed::new(0);
    }
}
