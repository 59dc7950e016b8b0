//! Structured runtime events and the feed that carries them.
//!
//! The dispatch worker emits events for subscription lifecycle, message
//! processing, and handler failures; the bus does not own log formatting or
//! output. Hosts consume events either through
//! [`Bus::events`](crate::Bus::events) (a raw feed receiver) or through
//! [`Observe`](crate::Observe) sinks driven by the
//! [`ObserverSet`](crate::ObserverSet).

mod event;
mod feed;

pub use event::{Event, EventKind};
pub use feed::Feed;
