//! # Typed handler contract.
//!
//! [`Handler`] is the object form of a subscription callback. Closures cover
//! most cases ([`Bus::subscribe`](crate::Bus::subscribe)); the trait exists
//! for handler structs with their own state and for factory subscriptions,
//! which construct a fresh instance per dispatched message.
//!
//! A handler receives the message and the per-send [`CancellationToken`].
//! The loop never pre-empts a handler that has already started; long-running
//! handlers that want to react to cancellation must poll or await the token
//! themselves and may return [`HandlerError::Canceled`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::messages::Subscribable;

/// # Asynchronous, cancelable message handler.
///
/// `T` is the declared target type: a concrete message struct or a
/// `dyn Trait` view the message upcasts to.
///
/// # Example
/// ```
/// use std::any::Any;
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use postbus::{Handler, HandlerError, Message};
///
/// struct Ping;
///
/// impl Message for Ping {
///     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
///         self
///     }
/// }
///
/// struct Pong;
///
/// #[async_trait]
/// impl Handler<Ping> for Pong {
///     async fn handle(
///         &self,
///         _message: Arc<Ping>,
///         _cancel: CancellationToken,
///     ) -> Result<(), HandlerError> {
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<T>: Send + Sync + 'static
where
    T: Subscribable + ?Sized,
{
    /// Processes one matching message.
    ///
    /// Returning an error marks the send as failed without stopping the
    /// dispatch loop for the remaining subscriptions.
    async fn handle(&self, message: Arc<T>, cancel: CancellationToken) -> Result<(), HandlerError>;
}
