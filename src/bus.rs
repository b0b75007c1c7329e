//! Main Bus struct tying channels, subscriptions and history together.

use crate::channels::{Callback, Channel};
use crate::config::BusConfig;
use crate::subscriptions::{Subscription, SubscriptionReceiver};
use crate::types::{BusStats, Message, Playback, SubscriberId};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// Mutable bus state. Only touched while the bus lock is held.
struct BusState<V> {
    channels: HashMap<String, Channel<V>>,
    /// Next id to hand out.
    next_id: SubscriberId,
    published: u64,
}

impl<V> BusState<V> {
    fn new() -> Self {
        Self {
            channels: HashMap::new(),
            next_id: SubscriberId(1),
            published: 0,
        }
    }

    fn mint_id(&mut self) -> SubscriberId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Get a channel, creating it on first reference.
    fn channel_mut(&mut self, name: &str, max_history: usize) -> &mut Channel<V> {
        self.channels.entry(name.to_owned()).or_insert_with(|| {
            debug!(channel = name, max_history, "channel created");
            Channel::new(max_history)
        })
    }
}

/// Shared interior of a [`Bus`]. Subscriptions hold a weak reference to it.
pub(crate) struct BusInner<V> {
    config: BusConfig,
    /// One lock serialises every public operation across threads. It is
    /// re-entrant so callbacks may call back into the bus; the `RefCell`
    /// borrow is never held while a callback runs.
    state: ReentrantMutex<RefCell<BusState<V>>>,
}

impl<V> BusInner<V> {
    pub(crate) fn unsubscribe(&self, channel: &str, id: SubscriberId) -> bool {
        let guard = self.state.lock();
        let mut state = guard.borrow_mut();

        let removed = state
            .channels
            .get_mut(channel)
            .map(|c| c.remove_subscriber(id))
            .unwrap_or(false);

        if removed {
            debug!(channel, subscriber = %id, "unsubscribed");
        }
        removed
    }
}

/// In-process publish/subscribe bus with bounded per-channel history.
///
/// Cloning is cheap; clones share the same channels and subscribers.
///
/// - `publish` delivers to every current subscriber of a channel, then
///   records the message in the channel's history
/// - `subscribe_with` can replay that history to a late subscriber before
///   any live message reaches it
pub struct Bus<V = serde_json::Value> {
    inner: Arc<BusInner<V>>,
}

impl<V> Clone for Bus<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Bus<V>
where
    V: Send + Sync + 'static,
{
    /// Create a bus. Prefer [`crate::configure`] when the bound comes from
    /// the host's configuration.
    pub fn new(config: BusConfig) -> Self {
        Self {
            inner: Arc::new(BusInner {
                config,
                state: ReentrantMutex::new(RefCell::new(BusState::new())),
            }),
        }
    }

    /// Create a bus with the given history bound.
    pub fn with_max_history(max_history: usize) -> Self {
        Self::new(BusConfig { max_history })
    }

    // --- Publishing ---

    /// Publish one message made of `values` on `channel`.
    ///
    /// Every subscriber present when delivery starts is called once, in
    /// subscription order, unless an earlier callback unsubscribed it.
    /// Subscribers added during delivery wait for the next publish. The
    /// message is appended to history after delivery.
    ///
    /// Returns the number of subscribers the message reached. Queue
    /// subscribers whose receiver has been dropped are not counted and are
    /// removed.
    pub fn publish<I>(&self, channel: &str, values: I) -> usize
    where
        I: IntoIterator<Item = V>,
    {
        let message: Message<V> = values.into_iter().collect();
        let max_history = self.inner.config.max_history;
        let guard = self.inner.state.lock();

        let ids = {
            let mut state = guard.borrow_mut();
            state.published += 1;
            state.channel_mut(channel, max_history).subscriber_ids()
        };

        let mut delivered = 0;
        let mut disconnected = Vec::new();
        for id in ids {
            let callback = guard
                .borrow()
                .channels
                .get(channel)
                .and_then(|c| c.callback(id));

            if let Some(callback) = callback {
                if callback(&message) {
                    delivered += 1;
                } else {
                    disconnected.push(id);
                }
            }
        }

        let evicted = {
            let mut state = guard.borrow_mut();
            let target = state.channel_mut(channel, max_history);
            for id in disconnected {
                if target.remove_subscriber(id) {
                    debug!(channel, subscriber = %id, "dropped disconnected subscriber");
                }
            }
            target.record(message)
        };

        trace!(channel, delivered, evicted, "published");
        delivered
    }

    // --- Subscribing ---

    /// Subscribe to live messages on `channel`.
    pub fn subscribe<F>(&self, channel: &str, callback: F) -> Subscription<V>
    where
        F: Fn(&[V]) + Send + Sync + 'static,
    {
        self.subscribe_with(channel, callback, Playback::None)
    }

    /// Subscribe to `channel`, optionally replaying its history first.
    ///
    /// Replay runs synchronously, oldest message first, and finishes before
    /// this returns. No publish from another thread can interleave with it.
    pub fn subscribe_with<F>(
        &self,
        channel: &str,
        callback: F,
        playback: Playback,
    ) -> Subscription<V>
    where
        F: Fn(&[V]) + Send + Sync + 'static,
    {
        let callback: Callback<V> = Arc::new(move |m: &Message<V>| {
            callback(m.values());
            true
        });
        self.register(channel, callback, playback)
    }

    /// Subscribe with a queue instead of a callback.
    ///
    /// Replayed messages are queued before any live message.
    pub fn subscribe_receiver(
        &self,
        channel: &str,
        playback: Playback,
    ) -> SubscriptionReceiver<V> {
        let (sender, receiver) = crossbeam_channel::unbounded();

        // A dropped receiver disconnects the sender; the next publish on
        // the channel then removes this subscription.
        let callback: Callback<V> = Arc::new(move |m: &Message<V>| sender.send(m.clone()).is_ok());

        let subscription = self.register(channel, callback, playback);
        SubscriptionReceiver::new(subscription, receiver)
    }

    fn register(
        &self,
        channel: &str,
        callback: Callback<V>,
        playback: Playback,
    ) -> Subscription<V> {
        let max_history = self.inner.config.max_history;
        let guard = self.inner.state.lock();

        let (id, backlog) = {
            let mut state = guard.borrow_mut();
            let id = state.mint_id();
            let target = state.channel_mut(channel, max_history);
            target.add_subscriber(id, Arc::clone(&callback));

            let backlog = if playback.is_enabled() {
                target.playback(playback.limit())
            } else {
                Vec::new()
            };
            (id, backlog)
        };

        debug!(channel, subscriber = %id, replay = backlog.len(), "subscribed");

        for message in &backlog {
            if !callback(message) {
                break;
            }
        }

        Subscription::new(Arc::downgrade(&self.inner), channel, id)
    }

    /// Remove a subscription by id. Returns false if it was already gone.
    pub fn unsubscribe(&self, channel: &str, id: SubscriberId) -> bool {
        self.inner.unsubscribe(channel, id)
    }

    // --- Introspection ---

    /// Snapshot of a channel's stored history, oldest first.
    ///
    /// Does not create the channel.
    pub fn history(&self, channel: &str) -> Vec<Message<V>> {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state
            .channels
            .get(channel)
            .map(|c| c.playback(None))
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self, channel: &str) -> usize {
        let guard = self.inner.state.lock();
        let state = guard.borrow();
        state
            .channels
            .get(channel)
            .map(|c| c.subscriber_count())
            .unwrap_or(0)
    }

    pub fn has_channel(&self, channel: &str) -> bool {
        self.inner.state.lock().borrow().channels.contains_key(channel)
    }

    /// Names of every channel created so far, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let guard = self.inner.state.lock();
        let mut names: Vec<String> = guard.borrow().channels.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn max_history(&self) -> usize {
        self.inner.config.max_history
    }

    pub fn stats(&self) -> BusStats {
        let guard = self.inner.state.lock();
        let state = guard.borrow();

        BusStats {
            channel_count: state.channels.len(),
            subscriber_count: state.channels.values().map(|c| c.subscriber_count()).sum(),
            stored_messages: state.channels.values().map(|c| c.history().len()).sum(),
            published_messages: state.published,
        }
    }
}

impl<V> Default for Bus<V>
where
    V: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(BusConfig::default())
    }
}

impl<V> fmt::Debug for Bus<V>
where
    V: Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("max_history", &self.max_history())
            .field("stats", &self.stats())
            .finish()
    }
}
