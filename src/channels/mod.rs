//! Channels and their bounded history.
//!
//! A channel is created the first time it is named and keeps its history
//! even after every subscriber has left.

mod channel;
mod history;

pub use channel::{Callback, Channel};
pub use history::History;
