//! # Subscription target matcher.
//!
//! [`Subscribable`] is implemented by every type a subscription can be
//! declared against. The blanket impl covers all concrete [`Message`] types;
//! trait object views get a hand-written impl that routes through the
//! message's upcast table.
//!
//! Matching is a per-invocation runtime check, not a pre-filter: the
//! registry holds subscriptions of unrelated declared types side by side,
//! and each decides applicability independently for every message.
//!
//! ## Example (trait object target)
//! ```
//! use std::any::TypeId;
//! use std::sync::Arc;
//! use postbus::{Message, Subscribable};
//!
//! trait Audit: Send + Sync {}
//!
//! impl Subscribable for dyn Audit {
//!     fn from_message(message: &Arc<dyn Message>) -> Option<Arc<Self>> {
//!         Arc::clone(message)
//!             .upcast(TypeId::of::<dyn Audit>())
//!             .and_then(|view| view.downcast::<Arc<dyn Audit>>().ok())
//!             .map(|view| *view)
//!     }
//! }
//! ```
//!
//! Target traits must **not** have [`Message`] as a supertrait; the blanket
//! impl below would otherwise overlap with the trait object impl.

use std::any::TypeId;
use std::sync::Arc;

use crate::messages::Message;

/// Types a subscription can be declared against.
///
/// `from_message` answers "is this message assignable to `Self`" and, when
/// it is, produces the typed shared handle the handler receives.
pub trait Subscribable: Send + Sync + 'static {
    /// Extracts a shared handle to `Self` from an erased message, if the
    /// message's runtime type is assignable to `Self`.
    fn from_message(message: &Arc<dyn Message>) -> Option<Arc<Self>>;
}

impl<M: Message> Subscribable for M {
    fn from_message(message: &Arc<dyn Message>) -> Option<Arc<M>> {
        if (**message).type_id() == TypeId::of::<M>() {
            return Arc::clone(message).as_any_arc().downcast::<M>().ok();
        }
        Arc::clone(message)
            .upcast(TypeId::of::<M>())
            .and_then(|view| view.downcast::<Arc<M>>().ok())
            .map(|view| *view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    trait Numbered: Send + Sync {
        fn number(&self) -> u32;
    }

    struct Concrete {
        number: u32,
    }

    impl Numbered for Concrete {
        fn number(&self) -> u32 {
            self.number
        }
    }

    impl Message for Concrete {
        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }

        fn upcast(self: Arc<Self>, target: TypeId) -> Option<Box<dyn Any + Send>> {
            if target == TypeId::of::<dyn Numbered>() {
                return Some(Box::new(self as Arc<dyn Numbered>));
            }
            None
        }
    }

    struct Unrelated;

    impl Message for Unrelated {
        fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    impl Subscribable for dyn Numbered {
        fn from_message(message: &Arc<dyn Message>) -> Option<Arc<Self>> {
            Arc::clone(message)
                .upcast(TypeId::of::<dyn Numbered>())
                .and_then(|view| view.downcast::<Arc<dyn Numbered>>().ok())
                .map(|view| *view)
        }
    }

    #[test]
    fn test_exact_type_matches() {
        let msg: Arc<dyn Message> = Arc::new(Concrete { number: 7 });
        let typed = <Concrete as Subscribable>::from_message(&msg).expect("exact match");
        assert_eq!(typed.number, 7);
    }

    #[test]
    fn test_trait_view_matches_via_upcast() {
        let msg: Arc<dyn Message> = Arc::new(Concrete { number: 9 });
        let view = <dyn Numbered as Subscribable>::from_message(&msg).expect("view match");
        assert_eq!(view.number(), 9);
    }

    #[test]
    fn test_unrelated_type_does_not_match() {
        let msg: Arc<dyn Message> = Arc::new(Unrelated);
        assert!(<Concrete as Subscribable>::from_message(&msg).is_none());
        assert!(<dyn Numbered as Subscribable>::from_message(&msg).is_none());
    }
}
