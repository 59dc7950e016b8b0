//! # Runtime events emitted by the dispatch worker.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Subscription lifecycle**: registrations applied, removals applied
//! - **Dispatch**: message processed, handler failure, cancellation cut
//! - **Observer plumbing**: panicking or overflowing observer sinks
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! subscription id, the message type label, and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! consumed out of order.
//!
//! ## Example
//! ```rust
//! use postbus::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::HandlerFailed)
//!     .with_message_type("invoice::Paid")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::HandlerFailed);
//! assert_eq!(ev.message_type.as_deref(), Some("invoice::Paid"));
//! assert_eq!(ev.reason.as_deref(), Some("boom"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

use crate::subscriptions::SubscriptionId;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscription lifecycle ===
    /// A queued subscription was applied to the registry.
    ///
    /// Sets:
    /// - `subscription`: new subscription id
    /// - `message_type`: declared target type
    SubscriptionAdded,

    /// A queued removal was applied to the registry.
    ///
    /// Sets:
    /// - `subscription`: removed subscription id
    SubscriptionRemoved,

    // === Dispatch ===
    /// One message finished its trip through the dispatch loop.
    ///
    /// Sets:
    /// - `message_type`: concrete payload type
    /// - `delivered`: the send's boolean outcome
    /// - `handled`: number of handlers that ran to completion
    MessageProcessed,

    /// A handler invocation raised an error (or panicked).
    ///
    /// Sets:
    /// - `subscription`: failing subscription id
    /// - `message_type`: concrete payload type
    /// - `reason`: failure message
    HandlerFailed,

    /// The send's cancellation signal fired; remaining handlers were not
    /// started for this message.
    ///
    /// Sets:
    /// - `message_type`: concrete payload type
    DispatchCancelled,

    // === Observer plumbing ===
    /// Observer panicked during event processing.
    ///
    /// Sets:
    /// - `observer`: observer name
    /// - `reason`: panic info/message
    ObserverPanicked,

    /// Observer dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `observer`: observer name
    /// - `reason`: reason string (e.g., "full", "closed")
    ObserverOverflow,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Subscription the event refers to, if applicable.
    pub subscription: Option<SubscriptionId>,
    /// Message or declared target type label.
    pub message_type: Option<Arc<str>>,
    /// Observer name (observer plumbing events only).
    pub observer: Option<Arc<str>>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Handlers that ran to completion for this message.
    pub handled: Option<u32>,
    /// The send's boolean outcome.
    pub delivered: Option<bool>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and
    /// next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            subscription: None,
            message_type: None,
            observer: None,
            reason: None,
            handled: None,
            delivered: None,
        }
    }

    /// Attaches a subscription id.
    #[inline]
    pub fn with_subscription(mut self, id: SubscriptionId) -> Self {
        self.subscription = Some(id);
        self
    }

    /// Attaches a message or target type label.
    #[inline]
    pub fn with_message_type(mut self, label: impl Into<Arc<str>>) -> Self {
        self.message_type = Some(label.into());
        self
    }

    /// Attaches an observer name.
    #[inline]
    pub fn with_observer(mut self, name: impl Into<Arc<str>>) -> Self {
        self.observer = Some(name.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches the completed-handler count.
    #[inline]
    pub fn with_handled(mut self, n: u32) -> Self {
        self.handled = Some(n);
        self
    }

    /// Attaches the send's boolean outcome.
    #[inline]
    pub fn with_delivered(mut self, delivered: bool) -> Self {
        self.delivered = Some(delivered);
        self
    }

    /// Creates an observer overflow event.
    #[inline]
    pub fn observer_overflow(observer: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::ObserverOverflow)
            .with_observer(observer)
            .with_reason(reason)
    }

    /// Creates an observer panic event.
    #[inline]
    pub fn observer_panicked(observer: &'static str, info: String) -> Self {
        Event::new(EventKind::ObserverPanicked)
            .with_observer(observer)
            .with_reason(info)
    }

    #[inline]
    pub fn is_observer_overflow(&self) -> bool {
        matches!(self.kind, EventKind::ObserverOverflow)
    }
}
