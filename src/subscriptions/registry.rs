//! # Subscription registry.
//!
//! Insertion-ordered set of live subscriptions, owned exclusively by the
//! dispatch worker. No lock protects it: external mutation requests travel
//! through queues and are applied by the worker only at message boundaries,
//! never mid-message.

use crate::subscriptions::{Subscription, SubscriptionId};

/// Ordered set of live subscriptions.
///
/// Insertion order is dispatch order.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Vec<Subscription>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a subscription, preserving arrival order.
    pub(crate) fn insert(&mut self, subscription: Subscription) {
        self.entries.push(subscription);
    }

    /// Removes the subscription with the given id.
    ///
    /// Returns `false` when the id is unknown (already removed, or never
    /// registered); removal is idempotent.
    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id() != id);
        self.entries.len() != before
    }

    /// Iterates subscriptions in registration order.
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Subscription> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Message;
    use std::any::Any;
    use std::sync::Arc;

    struct Ping;

    impl Message for Ping {
        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn noop() -> Subscription {
        Subscription::from_sync::<Ping, _>(|_msg| {})
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let (a, b, c) = (noop(), noop(), noop());
        let (ida, idb, idc) = (a.id(), b.id(), c.id());

        let mut registry = Registry::new();
        registry.insert(a);
        registry.insert(b);
        registry.insert(c);

        let order: Vec<SubscriptionId> = registry.iter().map(|s| s.id()).collect();
        assert_eq!(order, vec![ida, idb, idc]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let sub = noop();
        let id = sub.id();

        let mut registry = Registry::new();
        registry.insert(sub);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert_eq!(registry.iter().count(), 0);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut registry = Registry::new();
        registry.insert(noop());

        assert!(!registry.remove(SubscriptionId::next()));
        assert_eq!(registry.iter().count(), 1);
    }

    #[test]
    fn test_remove_keeps_relative_order_of_survivors() {
        let (a, b, c) = (noop(), noop(), noop());
        let (ida, idb, idc) = (a.id(), b.id(), c.id());

        let mut registry = Registry::new();
        registry.insert(a);
        registry.insert(b);
        registry.insert(c);
        registry.remove(idb);

        let order: Vec<SubscriptionId> = registry.iter().map(|s| s.id()).collect();
        assert_eq!(order, vec![ida, idc]);
    }
}
