//! # Send request.
//!
//! One queued message on its way to the dispatch worker. Created per `send`
//! call, consumed exactly once by the worker; the receipt channel is
//! resolved exactly once, after all applicable handlers have been attempted
//! or cancellation has cut the loop short.

use std::sync::Arc;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::core::Receipt;
use crate::messages::Message;

/// Erased message plus its per-send context.
pub(crate) struct SendRequest {
    /// The payload, shared with every handler invocation.
    pub payload: Arc<dyn Message>,
    /// Concrete payload type name (for events).
    pub label: &'static str,
    /// Per-send cancellation signal, checked before each handler start.
    pub cancel: CancellationToken,
    /// Resolved exactly once with the dispatch outcome. Dropping it resolves
    /// the caller's [`Delivery`](crate::Delivery) as
    /// [`BusError::Closed`](crate::BusError::Closed).
    pub done: oneshot::Sender<Receipt>,
}
