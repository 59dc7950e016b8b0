//! # DispatchWorker: the serialized processing loop.
//!
//! A single logical worker owns the subscription registry and drains three
//! queues: unsubscribe requests, subscribe requests, and send requests.
//! Send requests are processed strictly one at a time; no two messages'
//! handler invocations ever interleave.
//!
//! ## Per-message algorithm
//! ```text
//! recv(SendRequest)
//!   ├─► drain unsubscribe queue (remove ids; unknown ids are no-ops)
//!   ├─► drain subscribe queue (append, preserving arrival order)
//!   └─► for each subscription, in registration order:
//!         ├─ cancel signal fired?  → stop; remaining handlers never start
//!         ├─ invoke handler, await completion
//!         │    ├─ Handled  → count it
//!         │    ├─ Skipped  → type did not match; no-op
//!         │    └─ Err/panic → record, keep going (failure is isolated)
//!         └─ next
//!   └─► resolve the request's receipt exactly once
//! ```
//!
//! ## Rules
//! - Registry mutations apply only at message boundaries, never mid-message;
//!   the registry needs no lock because this loop is its only reader and
//!   writer.
//! - Cancellation is checked before each handler start, not during: an
//!   already-started handler is never pre-empted.
//! - A handler failure (error return or panic) flips the send's delivered
//!   flag and is published as a `HandlerFailed` event; the loop continues.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::core::{Receipt, SendRequest};
use crate::error::HandlerError;
use crate::events::{Event, EventKind, Feed};
use crate::subscriptions::{Disposition, Registry, Subscription, SubscriptionId};

/// The single serialized worker behind a [`Bus`](crate::Bus).
pub(crate) struct DispatchWorker {
    registry: Registry,
    unsubscribes: mpsc::UnboundedReceiver<SubscriptionId>,
    subscribes: mpsc::UnboundedReceiver<Subscription>,
    sends: mpsc::UnboundedReceiver<SendRequest>,
    feed: Feed,
    stop: CancellationToken,
}

impl DispatchWorker {
    pub(crate) fn new(
        unsubscribes: mpsc::UnboundedReceiver<SubscriptionId>,
        subscribes: mpsc::UnboundedReceiver<Subscription>,
        sends: mpsc::UnboundedReceiver<SendRequest>,
        feed: Feed,
        stop: CancellationToken,
    ) -> Self {
        Self {
            registry: Registry::new(),
            unsubscribes,
            subscribes,
            sends,
            feed,
            stop,
        }
    }

    /// Runs until the stop token fires or every frontend handle is gone.
    ///
    /// Requests still queued when the worker stops are dropped; their
    /// callers observe [`BusError::Closed`](crate::BusError::Closed).
    pub(crate) async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.stop.cancelled() => break,
                request = self.sends.recv() => {
                    let Some(request) = request else { break };
                    self.absorb_mutations();
                    self.dispatch(request).await;
                }
            }
        }
    }

    /// Applies every queued registry mutation: removals first, then
    /// additions, each in FIFO arrival order.
    fn absorb_mutations(&mut self) {
        while let Ok(id) = self.unsubscribes.try_recv() {
            if self.registry.remove(id) {
                self.feed
                    .publish(Event::new(EventKind::SubscriptionRemoved).with_subscription(id));
            }
        }
        while let Ok(subscription) = self.subscribes.try_recv() {
            self.feed.publish(
                Event::new(EventKind::SubscriptionAdded)
                    .with_subscription(subscription.id())
                    .with_message_type(subscription.target()),
            );
            self.registry.insert(subscription);
        }
    }

    /// Runs one message through the handler chain and resolves its receipt.
    async fn dispatch(&mut self, request: SendRequest) {
        let mut receipt = Receipt {
            delivered: true,
            ..Receipt::default()
        };

        for subscription in self.registry.iter() {
            if request.cancel.is_cancelled() {
                receipt.delivered = false;
                receipt.cancelled = true;
                self.feed.publish(
                    Event::new(EventKind::DispatchCancelled).with_message_type(request.label),
                );
                break;
            }

            let invocation =
                subscription.invoke(Arc::clone(&request.payload), request.cancel.clone());
            match AssertUnwindSafe(invocation).catch_unwind().await {
                Ok(Ok(Disposition::Handled)) => receipt.handled += 1,
                Ok(Ok(Disposition::Skipped)) => {}
                Ok(Err(err)) => {
                    self.record_failure(&mut receipt, subscription.id(), request.label, &err);
                }
                Err(panic_err) => {
                    let err = HandlerError::from_panic(panic_err);
                    self.record_failure(&mut receipt, subscription.id(), request.label, &err);
                }
            }
        }

        self.feed.publish(
            Event::new(EventKind::MessageProcessed)
                .with_message_type(request.label)
                .with_delivered(receipt.delivered)
                .with_handled(u32::try_from(receipt.handled).unwrap_or(u32::MAX)),
        );

        // Resolved exactly once; a gone caller is not an error.
        let _ = request.done.send(receipt);
    }

    fn record_failure(
        &self,
        receipt: &mut Receipt,
        id: SubscriptionId,
        label: &'static str,
        err: &HandlerError,
    ) {
        receipt.delivered = false;
        receipt.failures.push(id);
        self.feed.publish(
            Event::new(EventKind::HandlerFailed)
                .with_subscription(id)
                .with_message_type(label)
                .with_reason(err.as_message()),
        );
    }
}
