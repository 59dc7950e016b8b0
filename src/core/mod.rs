//! Runtime core: the frontend, the request plumbing, and the serialized
//! dispatch worker.
//!
//! The only public API from this module is the [`Bus`] frontend (plus its
//! builder and the [`Delivery`]/[`Receipt`] result types).
//!
//! Internal modules:
//! - [`request`]: the erased send request consumed by the worker;
//! - [`delivery`]: the caller-side future and the dispatch receipt;
//! - [`worker`]: the single serialized worker that owns the registry;
//! - [`bus`]: the clonable frontend and its builder.

mod bus;
mod delivery;
mod request;
mod worker;

pub use bus::{Bus, BusBuilder};
pub use delivery::{Delivery, Receipt};

pub(crate) use request::SendRequest;
pub(crate) use worker::DispatchWorker;
