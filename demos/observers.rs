//! # Example: observers
//!
//! Demonstrates how to build and attach event observers.
//!
//! Shows how to:
//! - Implement the [`Observe`] trait for a custom sink.
//! - Wire observers into [`Bus::builder`].
//! - Use the built-in [`LogWriter`] (requires the `logging` feature).
//!
//! ## Flow
//! ```text
//! send() ──► DispatchWorker
//!     ├─► publish(SubscriptionAdded / MessageProcessed / HandlerFailed)
//!     └─► Feed ──► listener ──► ObserverSet
//!                                  ├─► LogWriter.on_event()
//!                                  └─► FailureTally.on_event()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example observers --features logging
//! ```

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use postbus::{Bus, Config, Event, EventKind, HandlerError, LogWriter, Message, Observe};
use tokio_util::sync::CancellationToken;

struct Heartbeat;

impl Message for Heartbeat {
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Counts handler failures. In real life, you could export metrics, ship
/// logs, or trigger alerts.
struct FailureTally {
    failures: AtomicUsize,
}

#[async_trait]
impl Observe for FailureTally {
    async fn on_event(&self, ev: &Event) {
        if ev.kind == EventKind::HandlerFailed {
            let n = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
            println!("[tally] handler failures so far: {n}");
        }
    }

    fn name(&self) -> &'static str {
        "failure_tally"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let tally = Arc::new(FailureTally {
        failures: AtomicUsize::new(0),
    });

    let observers: Vec<Arc<dyn Observe>> = vec![Arc::new(LogWriter), tally];
    let bus = Bus::builder(Config::default()).with_observers(observers).build();

    bus.subscribe_sync(|_msg: Arc<Heartbeat>| {
        println!("[handler] beat");
    });
    bus.subscribe(
        |_msg: Arc<Heartbeat>, _cancel: CancellationToken| async move {
            Err::<(), _>(HandlerError::failed("flaky downstream"))
        },
    );

    for _ in 0..3 {
        let delivered = bus.send(Heartbeat).await.expect("bus alive");
        println!("[send] delivered={delivered}");
    }

    // Drains observer queues before exiting.
    bus.shutdown().await;
}
