//! # Example: basic
//!
//! Demonstrates the core send/subscribe flow.
//!
//! Shows how to:
//! - Implement [`Message`] for a payload type, including a trait-object view.
//! - Subscribe sync and async handlers, including one on the view.
//! - Await a [`Delivery`] and inspect the full [`Receipt`].
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

use postbus::{Bus, HandlerError, Message, Subscribable};
use tokio_util::sync::CancellationToken;

/// View shared by every payment-related message.
trait PaymentEvent: Send + Sync {
    fn amount_cents(&self) -> u64;
}

struct InvoicePaid {
    invoice: &'static str,
    amount_cents: u64,
}

impl PaymentEvent for InvoicePaid {
    fn amount_cents(&self) -> u64 {
        self.amount_cents
    }
}

impl Message for InvoicePaid {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn upcast(self: Arc<Self>, target: TypeId) -> Option<Box<dyn Any + Send>> {
        if target == TypeId::of::<dyn PaymentEvent>() {
            return Some(Box::new(self as Arc<dyn PaymentEvent>));
        }
        None
    }
}

impl Subscribable for dyn PaymentEvent {
    fn from_message(message: &Arc<dyn Message>) -> Option<Arc<Self>> {
        Arc::clone(message)
            .upcast(TypeId::of::<dyn PaymentEvent>())
            .and_then(|view| view.downcast::<Arc<dyn PaymentEvent>>().ok())
            .map(|view| *view)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let bus = Bus::new();

    // Exact-type subscription, synchronous handler.
    bus.subscribe_sync(|msg: Arc<InvoicePaid>| {
        println!("[exact] invoice {} paid", msg.invoice);
    });

    // View subscription: fires for every message upcasting to PaymentEvent.
    bus.subscribe_sync(|msg: Arc<dyn PaymentEvent>| {
        println!("[view]  {} cents moved", msg.amount_cents());
    });

    // Async, cancellation-aware handler.
    bus.subscribe(
        |msg: Arc<InvoicePaid>, cancel: CancellationToken| async move {
            if cancel.is_cancelled() {
                return Err(HandlerError::Canceled);
            }
            println!("[async] ledger updated for {}", msg.invoice);
            Ok(())
        },
    );

    let receipt = bus
        .send(InvoicePaid {
            invoice: "INV-1042",
            amount_cents: 125_00,
        })
        .receipt()
        .await
        .expect("bus alive");

    println!(
        "delivered={} handled={} failures={}",
        receipt.delivered,
        receipt.handled,
        receipt.failures.len()
    );

    bus.shutdown().await;
}
