//! # Herald
//!
//! An in-process publish/subscribe bus with bounded per-channel history.
//!
//! ## Core Concepts
//!
//! - **Channels**: Named, created on first use, never removed
//! - **Messages**: The ordered values of one `publish` call
//! - **History**: The most recent `max_history` messages of each channel,
//!   replayable to late subscribers
//! - **Subscriptions**: Handles that unsubscribe exactly one registration
//!
//! ## Example
//!
//! ```
//! use herald::{configure, Bus, Playback};
//! use serde_json::{json, Value};
//! use std::sync::{Arc, Mutex};
//!
//! let bus: Bus = configure(5)?.build();
//!
//! bus.publish("greetings", [json!("hello"), json!(1)]);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let subscription = bus.subscribe_with(
//!     "greetings",
//!     move |values: &[Value]| sink.lock().unwrap().push(values.to_vec()),
//!     Playback::All,
//! );
//!
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! subscription.unsubscribe();
//! # Ok::<(), herald::BusError>(())
//! ```

pub mod bus;
pub mod channels;
pub mod config;
pub mod error;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use bus::Bus;
pub use channels::History;
pub use config::{configure, BusConfig, BusFactory, DEFAULT_MAX_HISTORY};
pub use error::{BusError, Result};
pub use subscriptions::{Subscription, SubscriptionReceiver};
pub use types::*;
