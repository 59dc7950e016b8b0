//! # Non-blocking event fan-out to multiple observers.
//!
//! Provides [`ObserverSet`] — distributes events to multiple observers
//! concurrently without blocking the publisher.
//!
//! ## Architecture
//! ```text
//! emit(event)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► observer1.on_event()
//!     │    (bounded)         └──────► panic → ObserverPanicked
//!     ├──► [queue 2] ──► worker 2 ──► observer2.on_event()
//!     │    (bounded)
//!     └──► [queue N] ──► worker N ──► observerN.on_event()
//!          (bounded)
//! ```
//!
//! ## Rules
//! - **No cross-observer ordering**: observer A may process event N while B
//!   processes N+5
//! - **Overflow**: event dropped for that observer only, `ObserverOverflow`
//!   published
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Isolation**: a slow or panicking observer doesn't affect others
//! - **Per-observer FIFO**: each observer sees events in order
//!
//! ## Panic handling
//! Worker tasks use `catch_unwind` to isolate panics: the panic is caught
//! and converted to an `ObserverPanicked` event, the worker continues with
//! the next event, and other observers are unaffected. `AssertUnwindSafe`
//! is used, which can leave shared state inconsistent if an observer panics
//! while holding a lock.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::{Event, Feed};
use crate::observers::Observe;

/// Per-observer channel metadata.
struct ObserverChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for multiple event observers.
///
/// Manages per-observer queues and worker tasks, providing concurrent
/// delivery, isolation, panic safety, and overflow reporting.
pub struct ObserverSet {
    channels: Vec<ObserverChannel>,
    workers: Vec<JoinHandle<()>>,
    feed: Feed,
}

impl ObserverSet {
    /// Creates a new set and spawns one worker task per observer.
    ///
    /// Per observer: a bounded mpsc queue (capacity from
    /// [`Observe::queue_capacity`], minimum 1) and a dedicated worker task
    /// that runs until the queue is closed.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observe>>, feed: Feed) -> Self {
        let mut channels = Vec::with_capacity(observers.len());
        let mut workers = Vec::with_capacity(observers.len());

        for observer in observers {
            let cap = observer.queue_capacity().max(1);
            let name = observer.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let sink = Arc::clone(&observer);
            let feed_for_worker = feed.clone();

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sink.on_event(ev.as_ref());

                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        let info = {
                            let any = &*panic_err;
                            if let Some(msg) = any.downcast_ref::<&'static str>() {
                                (*msg).to_string()
                            } else if let Some(msg) = any.downcast_ref::<String>() {
                                msg.clone()
                            } else {
                                "unknown panic".to_string()
                            }
                        };
                        feed_for_worker.publish(Event::observer_panicked(sink.name(), info));
                    }
                }
            });
            channels.push(ObserverChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            feed,
        }
    }

    /// Emits an event to all observers (clones the event).
    ///
    /// For hot paths, use [`emit_arc`](Self::emit_arc) to avoid cloning.
    pub fn emit(&self, event: &Event) {
        self.emit_arc(Arc::new(event.clone()));
    }

    /// Emits a pre-allocated `Arc<Event>` to all observers.
    ///
    /// Uses `try_send` (non-blocking). On queue full or closed, the event is
    /// dropped for that observer and an `ObserverOverflow` event is
    /// published — unless the event itself is an overflow event, which
    /// prevents an infinite republish loop.
    pub fn emit_arc(&self, event: Arc<Event>) {
        let is_overflow_evt = event.is_observer_overflow();

        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    if !is_overflow_evt {
                        self.feed
                            .publish(Event::observer_overflow(channel.name, "full"));
                    }
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    if !is_overflow_evt {
                        self.feed
                            .publish(Event::observer_overflow(channel.name, "closed"));
                    }
                }
            }
        }
    }

    /// Gracefully shuts down all observer workers.
    ///
    /// 1. Drops all channel senders (workers see the channel closed)
    /// 2. Awaits all worker tasks to finish
    pub async fn shutdown(self) {
        drop(self.channels);

        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use tokio::sync::mpsc::{self, UnboundedSender};

    struct Recorder {
        tx: UnboundedSender<EventKind>,
    }

    #[async_trait]
    impl Observe for Recorder {
        async fn on_event(&self, event: &Event) {
            let _ = self.tx.send(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Faulty;

    #[async_trait]
    impl Observe for Faulty {
        async fn on_event(&self, _event: &Event) {
            panic!("observer blew up");
        }

        fn name(&self) -> &'static str {
            "faulty"
        }
    }

    #[tokio::test]
    async fn test_observer_receives_emitted_events() {
        let feed = Feed::new(16);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(Recorder { tx })];
        let set = ObserverSet::new(observers, feed);

        set.emit(&Event::new(EventKind::MessageProcessed));

        let kind = rx.recv().await.expect("observer processed the event");
        assert_eq!(kind, EventKind::MessageProcessed);
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_observer_panic_is_reported_to_feed() {
        let feed = Feed::new(16);
        let mut feed_rx = feed.subscribe();
        let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(Faulty)];
        let set = ObserverSet::new(observers, feed);

        set.emit(&Event::new(EventKind::MessageProcessed));

        let ev = feed_rx.recv().await.expect("panic event published");
        assert_eq!(ev.kind, EventKind::ObserverPanicked);
        assert_eq!(ev.observer.as_deref(), Some("faulty"));
        set.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_joins_workers() {
        let feed = Feed::new(16);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(Recorder { tx })];
        let set = ObserverSet::new(observers, feed);

        set.emit(&Event::new(EventKind::MessageProcessed));
        set.shutdown().await;

        // Queued event was processed before the worker exited.
        assert_eq!(rx.recv().await, Some(EventKind::MessageProcessed));
    }
}
