//! # Subscription: a type-erased (target, handler) pair.
//!
//! A [`Subscription`] wraps the user's typed callback in an erased adapter
//! `Fn(Arc<dyn Message>, CancellationToken) -> BoxHandlerFuture`. The
//! adapter performs the applicability check at invocation time: a message
//! whose runtime type is not assignable to the declared target completes as
//! [`Disposition::Skipped`] without running any user code.
//!
//! All user code (closure bodies, factory construction, handler methods)
//! runs inside the returned future, so the dispatch worker can isolate
//! panics with a single `catch_unwind` around the await.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::handlers::Handler;
use crate::messages::{Message, Subscribable};
use crate::subscriptions::SubscriptionId;

/// Boxed future returned by one handler invocation.
pub(crate) type BoxHandlerFuture =
    Pin<Box<dyn Future<Output = Result<Disposition, HandlerError>> + Send>>;

type ErasedHandler =
    Box<dyn Fn(Arc<dyn Message>, CancellationToken) -> BoxHandlerFuture + Send + Sync>;

/// What one invocation did with the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Disposition {
    /// Target matched; the handler ran to completion.
    Handled,
    /// Target did not match; no-op success.
    Skipped,
}

/// A registered subscription.
///
/// Immutable after creation except for its presence in the registry.
pub(crate) struct Subscription {
    id: SubscriptionId,
    target: &'static str,
    handler: ErasedHandler,
}

impl Subscription {
    /// Wraps an async closure handler.
    pub(crate) fn new<T, F, Fut>(handler: F) -> Self
    where
        T: Subscribable + ?Sized,
        F: Fn(Arc<T>, CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        Self::erased::<T, _>(move |message, cancel| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                match T::from_message(&message) {
                    Some(typed) => (*handler)(typed, cancel)
                        .await
                        .map(|()| Disposition::Handled),
                    None => Ok(Disposition::Skipped),
                }
            })
        })
    }

    /// Wraps a synchronous closure as an always-completing async handler.
    pub(crate) fn from_sync<T, F>(handler: F) -> Self
    where
        T: Subscribable + ?Sized,
        F: Fn(Arc<T>) + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        Self::erased::<T, _>(move |message, _cancel| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                match T::from_message(&message) {
                    Some(typed) => {
                        (*handler)(typed);
                        Ok(Disposition::Handled)
                    }
                    None => Ok(Disposition::Skipped),
                }
            })
        })
    }

    /// Wraps a shared [`Handler`] instance.
    pub(crate) fn from_handler<T, H>(handler: Arc<H>) -> Self
    where
        T: Subscribable + ?Sized,
        H: Handler<T>,
    {
        Self::erased::<T, _>(move |message, cancel| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                match T::from_message(&message) {
                    Some(typed) => handler
                        .handle(typed, cancel)
                        .await
                        .map(|()| Disposition::Handled),
                    None => Ok(Disposition::Skipped),
                }
            })
        })
    }

    /// Wraps a handler factory invoked once per dispatched message.
    pub(crate) fn from_factory<T, H, F>(factory: F) -> Self
    where
        T: Subscribable + ?Sized,
        H: Handler<T>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory = Arc::new(factory);
        Self::erased::<T, _>(move |message, cancel| {
            let factory = Arc::clone(&factory);
            Box::pin(async move {
                // One instance per attempted send cycle, built before the
                // type check: per-message scoped state is constructed whether
                // or not this particular message matches.
                let instance = (*factory)();
                match T::from_message(&message) {
                    Some(typed) => instance
                        .handle(typed, cancel)
                        .await
                        .map(|()| Disposition::Handled),
                    None => Ok(Disposition::Skipped),
                }
            })
        })
    }

    fn erased<T, F>(handler: F) -> Self
    where
        T: Subscribable + ?Sized,
        F: Fn(Arc<dyn Message>, CancellationToken) -> BoxHandlerFuture + Send + Sync + 'static,
    {
        Self {
            id: SubscriptionId::next(),
            target: std::any::type_name::<T>(),
            handler: Box::new(handler),
        }
    }

    /// Unique identity of this subscription.
    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Declared target type name (for events/logs).
    pub(crate) fn target(&self) -> &'static str {
        self.target
    }

    /// Starts one invocation against an erased message.
    ///
    /// The applicability check and every piece of user code run inside the
    /// returned future.
    pub(crate) fn invoke(
        &self,
        message: Arc<dyn Message>,
        cancel: CancellationToken,
    ) -> BoxHandlerFuture {
        (self.handler)(message, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Ping;

    impl Message for Ping {
        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    struct Pong;

    impl Message for Pong {
        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[tokio::test]
    async fn test_matching_message_is_handled() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let sub = Subscription::from_sync::<Ping, _>(move |_msg| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let msg: Arc<dyn Message> = Arc::new(Ping);
        let disposition = sub
            .invoke(msg, CancellationToken::new())
            .await
            .expect("handler succeeds");

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_matching_message_is_skipped_without_running_user_code() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let sub = Subscription::from_sync::<Ping, _>(move |_msg| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let msg: Arc<dyn Message> = Arc::new(Pong);
        let disposition = sub
            .invoke(msg, CancellationToken::new())
            .await
            .expect("skip is a no-op success");

        assert_eq!(disposition, Disposition::Skipped);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_error_propagates_to_invoker() {
        let sub = Subscription::new::<Ping, _, _>(|_msg, _cancel| async {
            Err(HandlerError::failed("boom"))
        });

        let msg: Arc<dyn Message> = Arc::new(Ping);
        let err = sub
            .invoke(msg, CancellationToken::new())
            .await
            .expect_err("handler fails");
        assert_eq!(err.as_label(), "handler_failed");
    }

    #[tokio::test]
    async fn test_target_label_names_declared_type() {
        let sub = Subscription::from_sync::<Ping, _>(|_msg| {});
        assert!(sub.target().contains("Ping"));
    }
}
