//! Observer sinks: host-provided consumers of runtime events.
//!
//! - [`observe`]: the [`Observe`] trait hosts implement;
//! - [`set`]: the [`ObserverSet`] fan-out with per-observer queues and
//!   workers;
//! - [`log`]: a simple built-in stdout writer (feature `logging`).

mod observe;
mod set;

#[cfg(feature = "logging")]
mod log;

pub use observe::Observe;
pub use set::ObserverSet;

#[cfg(feature = "logging")]
pub use log::LogWriter;
