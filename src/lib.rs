//! # postbus
//!
//! **Postbus** is an in-process asynchronous publish/subscribe message
//! dispatcher for Rust.
//!
//! Producers send typed messages; previously registered handlers whose
//! declared type the message is assignable to are invoked in registration
//! order, with cooperative cancellation and per-handler failure isolation.
//! The crate is designed as a building block for decoupled components that
//! share one process and one async runtime.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   caller #1  │   │   caller #2  │   │   caller #N  │
//!     │ send / (un)subscribe — non-blocking, from any task │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bus (frontend, cheap to clone)                                   │
//! │  - subscribe queue (unbounded)                                    │
//! │  - unsubscribe queue (unbounded)                                  │
//! │  - send queue (unbounded, one Delivery future per request)        │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  DispatchWorker (single serialized worker)                        │
//! │  - owns the Registry exclusively (no locks)                       │
//! │  - applies queued mutations only at message boundaries            │
//! │  - one message at a time, handlers in registration order          │
//! │  - checks the cancel signal before each handler start             │
//! │  - isolates handler failures and panics                           │
//! └──────┬──────────────────────────────────────────────────┬─────────┘
//!        │ Receipt (oneshot, exactly once)                  │ Event
//!        ▼                                                  ▼
//!   Delivery future                           ┌────────────────────────┐
//!   (resolves bool / Receipt)                 │  Feed (broadcast)      │
//!                                             └───┬────────────────┬───┘
//!                                                 ▼                ▼
//!                                          bus.events()      feed listener
//!                                          (raw taps)              │
//!                                                           ObserverSet
//!                                                        ┌─────────┼─────────┐
//!                                                        ▼         ▼         ▼
//!                                                    worker1   worker2   workerN
//!                                                        ▼         ▼         ▼
//!                                                   obs1.on   obs2.on   obsN.on
//!                                                   _event()  _event()  _event()
//! ```
//!
//! ### One message's dispatch
//! ```text
//! send(m) ──► [send queue] ──► DispatchWorker
//!
//! per request {
//!   ├─► drain unsubscribe queue (idempotent removals)
//!   ├─► drain subscribe queue (append in arrival order)
//!   ├─► for each subscription, in registration order:
//!   │     ├─ cancel signal fired?  → stop; Delivery resolves false
//!   │     ├─ type assignable?      → no: skip (no-op success)
//!   │     ├─ run handler to completion (never pre-empted)
//!   │     └─ error/panic           → record, continue with the next
//!   └─► resolve the Delivery exactly once
//! }
//! ```
//!
//! ## Features
//! | Area               | Description                                                     | Key types / traits                     |
//! |--------------------|-----------------------------------------------------------------|----------------------------------------|
//! | **Messages**       | Typed payloads with explicit trait-object views.                | [`Message`], [`Subscribable`]          |
//! | **Subscriptions**  | Closures, handler objects, and per-message factories.           | [`Handler`], [`SubscriptionId`]        |
//! | **Dispatch**       | Serialized loop, ordering guarantees, cancellation, isolation.  | [`Bus`], [`Delivery`], [`Receipt`]     |
//! | **Observability**  | Structured events, non-blocking observer fan-out.               | [`Event`], [`Observe`], [`ObserverSet`]|
//! | **Errors**         | Typed errors for the runtime and for handlers.                  | [`BusError`], [`HandlerError`]         |
//! | **Configuration**  | Centralized runtime settings.                                   | [`Config`]                             |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::any::Any;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use postbus::{Bus, HandlerError, Message};
//!
//! struct OrderPlaced {
//!     order_id: u64,
//! }
//!
//! impl Message for OrderPlaced {
//!     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
//!         self
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = Bus::new();
//!
//!     let id = bus.subscribe(|order: Arc<OrderPlaced>, _cancel: CancellationToken| async move {
//!         if order.order_id == 0 {
//!             return Err(HandlerError::failed("bad order id"));
//!         }
//!         Ok(())
//!     });
//!
//!     let delivered = bus.send(OrderPlaced { order_id: 42 }).await;
//!     assert!(delivered.unwrap());
//!
//!     bus.unsubscribe(id);
//!     bus.shutdown().await;
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod handlers;
mod messages;
mod observers;
mod subscriptions;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Bus, BusBuilder, Delivery, Receipt};
pub use error::{BusError, HandlerError};
pub use events::{Event, EventKind, Feed};
pub use handlers::Handler;
pub use messages::{Message, Subscribable};
pub use observers::{Observe, ObserverSet};
pub use subscriptions::SubscriptionId;

// Optional: expose a simple built-in logger observer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use observers::LogWriter;
