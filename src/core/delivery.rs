//! # Caller-side dispatch outcome.
//!
//! [`Delivery`] is the future returned by [`Bus::send`](crate::Bus::send):
//! it resolves once the dispatch worker finishes (or is cancelled during)
//! that message's trip through the handler chain.
//!
//! Awaiting a `Delivery` yields the contract boolean: `true` iff every
//! applicable handler ran without the cancellation signal having fired
//! before its turn. [`Delivery::receipt`] exposes the richer [`Receipt`]
//! for callers that want per-handler failure detail.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::BusError;
use crate::subscriptions::SubscriptionId;

/// Result of one message's trip through the dispatch loop.
///
/// The coarse `delivered` flag is what awaiting a [`Delivery`] yields; the
/// remaining fields are a superset for observability-minded callers. Note that
/// `delivered == false` does not distinguish handler failure from
/// cancellation — inspect `failures` and `cancelled` for that.
#[derive(Debug, Clone, Default)]
pub struct Receipt {
    /// `true` iff every applicable handler ran to completion without the
    /// cancellation signal firing before its turn.
    pub delivered: bool,
    /// Handlers that matched and ran to completion.
    pub handled: usize,
    /// Subscriptions whose handler returned an error or panicked.
    pub failures: Vec<SubscriptionId>,
    /// `true` when the cancellation signal cut the dispatch short.
    pub cancelled: bool,
}

/// Future resolving to the outcome of one `send`.
///
/// Resolves [`BusError::Closed`] when the dispatch worker stopped before
/// processing the message.
#[derive(Debug)]
pub struct Delivery {
    rx: oneshot::Receiver<Receipt>,
}

impl Delivery {
    pub(crate) fn new(rx: oneshot::Receiver<Receipt>) -> Self {
        Self { rx }
    }

    /// Resolves to the full [`Receipt`] instead of the coarse boolean.
    pub async fn receipt(self) -> Result<Receipt, BusError> {
        self.rx.await.map_err(|_| BusError::Closed)
    }
}

impl Future for Delivery {
    type Output = Result<bool, BusError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let rx = &mut self.get_mut().rx;
        Pin::new(rx)
            .poll(cx)
            .map(|res| res.map(|receipt| receipt.delivered).map_err(|_| BusError::Closed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_delivered_flag() {
        let (tx, rx) = oneshot::channel();
        let delivery = Delivery::new(rx);
        tx.send(Receipt {
            delivered: true,
            handled: 2,
            ..Receipt::default()
        })
        .expect("receiver alive");

        assert!(delivery.await.expect("worker alive"));
    }

    #[tokio::test]
    async fn test_dropped_sender_maps_to_closed() {
        let (tx, rx) = oneshot::channel::<Receipt>();
        drop(tx);

        let err = Delivery::new(rx).await.expect_err("sender gone");
        assert_eq!(err.as_label(), "bus_closed");
    }

    #[tokio::test]
    async fn test_receipt_carries_failure_detail() {
        let (tx, rx) = oneshot::channel();
        let id = SubscriptionId::next();
        tx.send(Receipt {
            delivered: false,
            handled: 1,
            failures: vec![id],
            cancelled: false,
        })
        .expect("receiver alive");

        let receipt = Delivery::new(rx).receipt().await.expect("worker alive");
        assert!(!receipt.delivered);
        assert_eq!(receipt.failures, vec![id]);
        assert!(!receipt.cancelled);
    }
}
