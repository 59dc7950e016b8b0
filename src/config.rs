//! # Global bus configuration.
//!
//! Provides [`Config`], the settings consumed by [`BusBuilder`](crate::BusBuilder).
//!
//! ## Sentinel values
//! - `feed_capacity` is clamped to a minimum of 1 by the event feed.

/// Configuration for the bus runtime.
///
/// ## Field semantics
/// - `feed_capacity`: event feed ring buffer size (min 1; clamped by the feed).
///
/// Subscribe/unsubscribe/send queues are unbounded by design: the frontend
/// must never block or drop work, and backpressure on sends is expressed by
/// awaiting the returned [`Delivery`](crate::Delivery) instead.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event feed broadcast ring buffer.
    ///
    /// Observers that lag behind more than `feed_capacity` events will
    /// observe `Lagged` and skip older items.
    pub feed_capacity: usize,
}

impl Config {
    /// Returns a feed capacity clamped to a minimum of 1.
    ///
    /// The [`Feed`](crate::events::Feed) should use this value to avoid
    /// constructing an invalid channel.
    #[inline]
    pub fn feed_capacity_clamped(&self) -> usize {
        self.feed_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `feed_capacity = 1024` (good baseline)
    fn default() -> Self {
        Self {
            feed_capacity: 1024,
        }
    }
}
