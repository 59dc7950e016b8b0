//! # Message payload contract.
//!
//! Every value sent through the bus implements [`Message`]. The trait erases
//! the concrete type at the frontend boundary (`Arc<dyn Message>`) and
//! restores it inside the dispatch loop at invocation time.
//!
//! ## Assignability
//! A subscription declared against type `T` fires for a message `M` when:
//! - `T` is `M` itself (exact match, via `Any` downcast), or
//! - `M` lists `T` in its upcast table (supertype/interface match).
//!
//! Rust has no runtime subtype test, so supertype relationships are declared
//! explicitly: a message type that wants to be deliverable as `dyn SomeView`
//! returns the corresponding handle from [`Message::upcast`]. Both the
//! "interface" and the "base class" of classical object systems map to trait
//! objects here.
//!
//! ## Example
//! ```
//! use std::any::{Any, TypeId};
//! use std::sync::Arc;
//! use postbus::Message;
//!
//! trait OrderEvent: Send + Sync {
//!     fn order_id(&self) -> u64;
//! }
//!
//! struct OrderShipped {
//!     order_id: u64,
//! }
//!
//! impl OrderEvent for OrderShipped {
//!     fn order_id(&self) -> u64 {
//!         self.order_id
//!     }
//! }
//!
//! impl Message for OrderShipped {
//!     fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
//!         self
//!     }
//!
//!     fn upcast(self: Arc<Self>, target: TypeId) -> Option<Box<dyn Any + Send>> {
//!         if target == TypeId::of::<dyn OrderEvent>() {
//!             return Some(Box::new(self as Arc<dyn OrderEvent>));
//!         }
//!         None
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::sync::Arc;

/// A value that can travel through the bus.
///
/// Implementations are one line of boilerplate (`as_any_arc`) plus an
/// optional upcast table for types that should also be deliverable as trait
/// object views.
pub trait Message: Any + Send + Sync + 'static {
    /// Erased shared handle used for exact-type downcasts.
    ///
    /// Implement as `{ self }`.
    fn as_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Returns the handle for `target` when this type is also deliverable as
    /// a trait object view, `None` otherwise.
    ///
    /// The returned box holds an `Arc<dyn View>` for the requested
    /// `TypeId::of::<dyn View>()`. The default covers the concrete type only.
    fn upcast(self: Arc<Self>, target: TypeId) -> Option<Box<dyn Any + Send>> {
        let _ = target;
        None
    }
}
