//! # Bus: the public frontend.
//!
//! [`Bus`] accepts sends and subscription changes from any number of
//! concurrent callers without external locking: every operation only
//! enqueues onto a thread-safe queue consumed by the single
//! [`DispatchWorker`]. The frontend never touches the registry.
//!
//! ## High-level architecture
//! ```text
//! callers (many)                     worker (one)
//!   subscribe()  ──► [subscribe queue]  ──┐
//!   unsubscribe()──► [unsubscribe queue] ─┼─► DispatchWorker::run()
//!   send()       ──► [send queue]        ──┘      │
//!        │                                        ├─► Registry (exclusive)
//!        └──◄── Delivery (oneshot) ◄──────────────┤
//!                                                 └─► Feed ─► listener ─► ObserverSet
//! ```
//!
//! ## Example
//! ```rust
//! use std::any::Any;
//! use std::sync::Arc;
//! use postbus::{Bus, Message};
//!
//! struct Greeting {
//!     text: String,
//! }
//!
//! impl Message for Greeting {
//!     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
//!         self
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = Bus::new();
//!     bus.subscribe_sync(|greeting: Arc<Greeting>| {
//!         println!("got: {}", greeting.text);
//!     });
//!
//!     let delivered = bus.send(Greeting { text: "hello".into() }).await;
//!     assert!(delivered.unwrap());
//!     bus.shutdown().await;
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::{Delivery, DispatchWorker, SendRequest};
use crate::error::HandlerError;
use crate::events::{Event, Feed};
use crate::handlers::Handler;
use crate::messages::{Message, Subscribable};
use crate::observers::{Observe, ObserverSet};
use crate::subscriptions::{Subscription, SubscriptionId};

/// Builder for constructing a [`Bus`] with optional observers.
pub struct BusBuilder {
    cfg: Config,
    observers: Vec<Arc<dyn Observe>>,
}

impl BusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            observers: Vec::new(),
        }
    }

    /// Sets event observers for observability.
    ///
    /// Observers receive runtime events (subscription lifecycle, message
    /// processing, handler failures) through dedicated workers with bounded
    /// queues.
    pub fn with_observers(mut self, observers: Vec<Arc<dyn Observe>>) -> Self {
        self.observers = observers;
        self
    }

    /// Builds and returns the bus.
    ///
    /// This consumes the builder and initializes all runtime components:
    /// the event feed, the observer workers, and the dispatch worker.
    /// Must be called within a Tokio runtime.
    pub fn build(self) -> Bus {
        let feed = Feed::new(self.cfg.feed_capacity_clamped());
        let stop = CancellationToken::new();
        let listener_stop = CancellationToken::new();

        let (subscribe_tx, subscribe_rx) = mpsc::unbounded_channel();
        let (unsubscribe_tx, unsubscribe_rx) = mpsc::unbounded_channel();
        let (send_tx, send_rx) = mpsc::unbounded_channel();

        let worker = DispatchWorker::new(
            unsubscribe_rx,
            subscribe_rx,
            send_rx,
            feed.clone(),
            stop.clone(),
        );
        let worker_handle = tokio::spawn(worker.run());

        let observers = ObserverSet::new(self.observers, feed.clone());
        let listener_handle = spawn_feed_listener(&feed, observers, listener_stop.clone());

        Bus {
            subscribes: subscribe_tx,
            unsubscribes: unsubscribe_tx,
            sends: send_tx,
            feed,
            stop,
            listener_stop,
            worker: Arc::new(Mutex::new(Some(worker_handle))),
            listener: Arc::new(Mutex::new(Some(listener_handle))),
        }
    }
}

/// Forwards feed events to the observer set until stopped, then drains the
/// remaining ring and shuts the observer workers down.
fn spawn_feed_listener(
    feed: &Feed,
    observers: ObserverSet,
    stop: CancellationToken,
) -> JoinHandle<()> {
    let mut rx = feed.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => observers.emit_arc(Arc::new(ev)),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        }

        // Deliver what was already published before the stop signal won the race.
        loop {
            match rx.try_recv() {
                Ok(ev) => observers.emit_arc(Arc::new(ev)),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        observers.shutdown().await;
    })
}

/// In-process asynchronous publish/subscribe dispatcher.
///
/// Cheap to clone; all clones share the same dispatch worker, registry, and
/// event feed. Every operation is non-blocking: registration and removal
/// are applied asynchronously by the worker at the next message boundary,
/// and `send` returns a [`Delivery`] future resolved when the worker
/// finishes that message.
#[derive(Clone)]
pub struct Bus {
    subscribes: mpsc::UnboundedSender<Subscription>,
    unsubscribes: mpsc::UnboundedSender<SubscriptionId>,
    sends: mpsc::UnboundedSender<SendRequest>,
    feed: Feed,
    stop: CancellationToken,
    listener_stop: CancellationToken,
    worker: Arc<Mutex<Option<JoinHandle<()>>>>,
    listener: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Bus {
    /// Creates a bus with default configuration and no observers.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new() -> Self {
        BusBuilder::new(Config::default()).build()
    }

    /// Starts a builder for a bus with custom configuration or observers.
    pub fn builder(cfg: Config) -> BusBuilder {
        BusBuilder::new(cfg)
    }

    /// Subscribes an async handler for messages assignable to `T`.
    ///
    /// Returns the subscription id immediately; the registration itself is
    /// applied by the dispatch worker before the next message is processed.
    pub fn subscribe<T, F, Fut>(&self, handler: F) -> SubscriptionId
    where
        T: Subscribable + ?Sized,
        F: Fn(Arc<T>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        self.register(Subscription::new::<T, _, _>(handler))
    }

    /// Subscribes a synchronous handler, wrapped as an always-completing
    /// async handler.
    pub fn subscribe_sync<T, F>(&self, handler: F) -> SubscriptionId
    where
        T: Subscribable + ?Sized,
        F: Fn(Arc<T>) + Send + Sync + 'static,
    {
        self.register(Subscription::from_sync::<T, _>(handler))
    }

    /// Subscribes a shared [`Handler`] instance.
    pub fn subscribe_handler<T, H>(&self, handler: Arc<H>) -> SubscriptionId
    where
        T: Subscribable + ?Sized,
        H: Handler<T>,
    {
        self.register(Subscription::from_handler::<T, H>(handler))
    }

    /// Subscribes a handler factory.
    ///
    /// The factory runs once per dispatched message while the subscription
    /// is live — whether or not the message's type matches — producing a
    /// fresh handler instance that is discarded after the dispatch. Use it
    /// for per-message scoped state.
    pub fn subscribe_factory<T, H, F>(&self, factory: F) -> SubscriptionId
    where
        T: Subscribable + ?Sized,
        H: Handler<T>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.register(Subscription::from_factory::<T, _, _>(factory))
    }

    /// Enqueues removal of a subscription.
    ///
    /// Asynchronous and idempotent: unknown or already-removed ids are
    /// no-ops. A message already mid-dispatch may or may not still reach
    /// the handler; every later message will not.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let _ = self.unsubscribes.send(id);
    }

    /// Sends a message without a cancellation signal.
    ///
    /// See [`send_with`](Self::send_with).
    pub fn send<M: Message>(&self, message: M) -> Delivery {
        self.send_with(message, CancellationToken::new())
    }

    /// Sends a message with a per-send cancellation signal.
    ///
    /// The request is enqueued synchronously — dispatch order is fixed at
    /// call time — and the returned [`Delivery`] resolves once the worker
    /// finishes (or is cancelled during) this message's dispatch: `true`
    /// iff every applicable handler ran without the signal having fired
    /// before its turn. With zero live subscriptions it resolves `true`.
    pub fn send_with<M: Message>(&self, message: M, cancel: CancellationToken) -> Delivery {
        let (done, rx) = oneshot::channel();
        let request = SendRequest {
            payload: Arc::new(message),
            label: std::any::type_name::<M>(),
            cancel,
            done,
        };
        let _ = self.sends.send(request);
        Delivery::new(rx)
    }

    /// Creates a receiver tapping the runtime event feed directly.
    ///
    /// For richer consumption (bounded queues, isolation), attach
    /// [`Observe`] sinks via [`BusBuilder::with_observers`] instead.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.feed.subscribe()
    }

    /// Stops the dispatch worker and the observer plumbing.
    ///
    /// The in-flight message (if any) completes first; requests still
    /// queued resolve [`BusError::Closed`](crate::BusError::Closed).
    /// Idempotent; safe to call from any clone.
    pub async fn shutdown(&self) {
        self.stop.cancel();
        let worker = self.worker.lock().await.take();
        if let Some(handle) = worker {
            let _ = handle.await;
        }

        self.listener_stop.cancel();
        let listener = self.listener.lock().await.take();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
    }

    fn register(&self, subscription: Subscription) -> SubscriptionId {
        let id = subscription.id();
        let _ = self.subscribes.send(subscription);
        id
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
