//! Subscription handles returned by the bus.
//!
//! Two flavours:
//! - [`Subscription`] for callback subscribers; it is the unsubscribe handle
//! - [`SubscriptionReceiver`] for subscribers that prefer to pull messages
//!   from a queue
//!
//! # Example
//!
//! ```
//! use herald::{Bus, Playback};
//!
//! let bus: Bus<i32> = Bus::with_max_history(5);
//! bus.publish("prices", [100]);
//!
//! let rx = bus.subscribe_receiver("prices", Playback::All);
//! bus.publish("prices", [101]);
//!
//! let seen: Vec<i32> = rx.drain().iter().map(|m| m[0]).collect();
//! assert_eq!(seen, vec![100, 101]);
//! rx.unsubscribe();
//! ```

mod types;

pub use types::{Subscription, SubscriptionReceiver};
