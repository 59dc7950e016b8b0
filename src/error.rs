//! Error types used by the bus runtime and by handlers.
//!
//! This module defines two main error enums:
//!
//! - [`BusError`] — errors raised by the dispatch runtime itself.
//! - [`HandlerError`] — errors raised by individual handler invocations.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for
//! logs/metrics. A handler failure never propagates to the caller or to
//! other handlers; it only flips the per-send delivery flag to `false`.

use std::any::Any;

use thiserror::Error;

/// # Errors produced by the bus runtime.
///
/// These represent failures of the dispatch machinery, not of user handlers.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BusError {
    /// The dispatch worker is gone; the request was dropped before its
    /// receipt could be resolved.
    #[error("bus closed; dispatch worker is no longer running")]
    Closed,
}

impl BusError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use postbus::BusError;
    ///
    /// assert_eq!(BusError::Closed.as_label(), "bus_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BusError::Closed => "bus_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BusError::Closed => "bus closed; dispatch worker stopped".to_string(),
        }
    }
}

/// # Errors produced by handler invocations.
///
/// Returned by subscription handlers to signal that processing of one
/// message failed. The dispatch loop records the failure and continues with
/// the next subscription.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler execution failed.
    #[error("handler failed: {error}")]
    Failed {
        /// The underlying error message.
        error: String,
    },

    /// Handler observed the cancellation signal mid-run and bailed out.
    #[error("handler canceled")]
    Canceled,
}

impl HandlerError {
    /// Creates a [`HandlerError::Failed`] from anything displayable.
    pub fn failed(error: impl ToString) -> Self {
        HandlerError::Failed {
            error: error.to_string(),
        }
    }

    /// Converts a caught panic payload into a handler failure.
    ///
    /// Used by the dispatch worker: a panicking handler is isolated exactly
    /// like one returning an error.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let error = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        HandlerError::Failed { error }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use postbus::HandlerError;
    ///
    /// let err = HandlerError::failed("boom");
    /// assert_eq!(err.as_label(), "handler_failed");
    /// assert_eq!(HandlerError::Canceled.as_label(), "handler_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Failed { .. } => "handler_failed",
            HandlerError::Canceled => "handler_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            HandlerError::Failed { error } => format!("error: {error}"),
            HandlerError::Canceled => "canceled".to_string(),
        }
    }

    /// Indicates whether this failure came from cooperative cancellation
    /// rather than a genuine handler error.
    ///
    /// # Example
    /// ```
    /// use postbus::HandlerError;
    ///
    /// assert!(HandlerError::Canceled.is_cancellation());
    /// assert!(!HandlerError::failed("boom").is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, HandlerError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_payload_str_is_preserved() {
        let err = HandlerError::from_panic(Box::new("kaboom"));
        match err {
            HandlerError::Failed { error } => assert_eq!(error, "kaboom"),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_panic_payload_string_is_preserved() {
        let err = HandlerError::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(err.as_message(), "error: kaboom");
    }

    #[test]
    fn test_opaque_panic_payload_falls_back() {
        let err = HandlerError::from_panic(Box::new(42_u32));
        assert_eq!(err.as_message(), "error: unknown panic");
    }
}
