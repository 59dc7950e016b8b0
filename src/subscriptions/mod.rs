//! Subscription data model: identity, the type-erased handler wrapper, and
//! the insertion-ordered registry owned by the dispatch worker.
//!
//! Internal modules:
//! - [`id`]: opaque unique subscription identity;
//! - [`subscription`]: the erased (target, handler) pair and its adapters;
//! - [`registry`]: the ordered set of live subscriptions.

mod id;
mod registry;
mod subscription;

pub use id::SubscriptionId;

pub(crate) use registry::Registry;
pub(crate) use subscription::{Disposition, Subscription};
