//! Core types for the bus.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Unique identifier for a subscription.
///
/// Minted from a per-bus counter starting at 1; never reused for the
/// lifetime of the bus.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(pub u64);

impl SubscriberId {
    pub fn next(self) -> Self {
        SubscriberId(self.0 + 1)
    }
}

impl fmt::Debug for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubscriberId({})", self.0)
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A published message: the ordered values of one `publish` call.
///
/// Immutable once built. Cloning is cheap, so the same allocation is shared
/// between the channel history and every delivery.
pub struct Message<V>(Arc<[V]>);

impl<V> Message<V> {
    pub fn new(values: Vec<V>) -> Self {
        Message(values.into())
    }

    /// The message's values in publish order.
    pub fn values(&self) -> &[V] {
        &self.0
    }
}

impl<V> Clone for Message<V> {
    fn clone(&self) -> Self {
        Message(Arc::clone(&self.0))
    }
}

impl<V> Deref for Message<V> {
    type Target = [V];

    fn deref(&self) -> &[V] {
        &self.0
    }
}

impl<V> From<Vec<V>> for Message<V> {
    fn from(values: Vec<V>) -> Self {
        Message::new(values)
    }
}

impl<V> FromIterator<V> for Message<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Message(iter.into_iter().collect())
    }
}

impl<V: fmt::Debug> fmt::Debug for Message<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Message").field(&self.values()).finish()
    }
}

impl<V: PartialEq> PartialEq for Message<V> {
    fn eq(&self, other: &Self) -> bool {
        self.values() == other.values()
    }
}

impl<V: Eq> Eq for Message<V> {}

impl<V: Serialize> Serialize for Message<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.values().serialize(serializer)
    }
}

/// Whether, and how much, history to replay when subscribing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Playback {
    /// Live messages only.
    #[default]
    None,
    /// Replay everything the channel still holds.
    All,
    /// Replay at most the most recent `n` messages.
    Last(usize),
}

impl Playback {
    /// Build from a `(playback, max_playback)` pair.
    ///
    /// A negative `max_playback` replays nothing; one too large for `usize`
    /// replays everything.
    pub fn from_options(playback: bool, max_playback: Option<i64>) -> Self {
        match (playback, max_playback) {
            (false, _) => Playback::None,
            (true, None) => Playback::All,
            (true, Some(n)) if n < 0 => Playback::Last(0),
            (true, Some(n)) => Playback::Last(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }

    /// Replay cap, or `None` when the whole history should be replayed.
    /// Only meaningful when [`Playback::is_enabled`] is true.
    pub fn limit(&self) -> Option<usize> {
        match self {
            Playback::Last(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Playback::None)
    }
}

/// Bus statistics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BusStats {
    /// Channels created so far (channels are never removed).
    pub channel_count: usize,
    /// Live subscriptions across all channels.
    pub subscriber_count: usize,
    /// Messages currently held in channel histories.
    pub stored_messages: usize,
    /// Total `publish` calls since the bus was built.
    pub published_messages: u64,
}
