//! Message data model: the erased payload contract and the matcher.
//!
//! - [`message`]: the [`Message`] trait every payload type implements;
//! - [`subscribable`]: the [`Subscribable`] matcher that decides, per
//!   invocation, whether an erased message is assignable to a subscription's
//!   declared type.

mod message;
mod subscribable;

pub use message::Message;
pub use subscribable::Subscribable;
