//! A single named channel: its subscribers and its history.

use super::history::History;
use crate::types::{Message, SubscriberId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Subscriber callback, called once per delivered or replayed message.
///
/// Returns false once the subscriber can no longer receive anything; the
/// bus then drops it.
pub type Callback<V> = Arc<dyn Fn(&Message<V>) -> bool + Send + Sync>;

/// Channel state owned by the bus.
pub struct Channel<V> {
    /// Keyed by id; ids are minted in increasing order, so iteration
    /// follows subscription order.
    subscribers: BTreeMap<SubscriberId, Callback<V>>,
    history: History<V>,
}

impl<V> Channel<V> {
    pub fn new(max_history: usize) -> Self {
        Self {
            subscribers: BTreeMap::new(),
            history: History::new(max_history),
        }
    }

    pub fn add_subscriber(&mut self, id: SubscriberId, callback: Callback<V>) {
        self.subscribers.insert(id, callback);
    }

    /// Returns false if `id` was not subscribed.
    pub fn remove_subscriber(&mut self, id: SubscriberId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn callback(&self, id: SubscriberId) -> Option<Callback<V>> {
        self.subscribers.get(&id).cloned()
    }

    /// Ids of the current subscribers, in subscription order.
    ///
    /// Delivery iterates this snapshot so callbacks may subscribe or
    /// unsubscribe while a publish is in progress.
    pub fn subscriber_ids(&self) -> Vec<SubscriberId> {
        self.subscribers.keys().copied().collect()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Store a delivered message. Returns the number of evicted messages.
    pub fn record(&mut self, message: Message<V>) -> usize {
        self.history.push(message)
    }

    /// Messages a replay capped at `count` would deliver, oldest first.
    pub fn playback(&self, count: Option<usize>) -> Vec<Message<V>> {
        self.history.window(count).cloned().collect()
    }

    pub fn history(&self) -> &History<V> {
        &self.history
    }
}
