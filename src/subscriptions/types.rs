//! Subscription handles.

use crate::bus::BusInner;
use crate::types::{Message, SubscriberId};
use std::fmt;
use std::sync::Weak;

/// Handle to one registration on one channel.
///
/// Dropping the handle does not unsubscribe. It only holds a weak
/// reference, so it stays safe to use after the bus itself is gone.
pub struct Subscription<V> {
    bus: Weak<BusInner<V>>,
    channel: String,
    id: SubscriberId,
}

impl<V> Subscription<V> {
    pub(crate) fn new(bus: Weak<BusInner<V>>, channel: &str, id: SubscriberId) -> Self {
        Self {
            bus,
            channel: channel.to_owned(),
            id,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Remove this registration from its channel.
    ///
    /// Returns false when there was nothing to remove: already
    /// unsubscribed, or the bus has been dropped.
    pub fn unsubscribe(&self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.unsubscribe(&self.channel, self.id),
            None => false,
        }
    }

    /// Turn the handle into a plain unsubscribe closure.
    pub fn into_fn(self) -> impl Fn() + Send + Sync
    where
        V: Send + Sync + 'static,
    {
        move || {
            self.unsubscribe();
        }
    }
}

impl<V> Clone for Subscription<V> {
    fn clone(&self) -> Self {
        Self {
            bus: Weak::clone(&self.bus),
            channel: self.channel.clone(),
            id: self.id,
        }
    }
}

impl<V> fmt::Debug for Subscription<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .finish()
    }
}

/// A subscription that queues messages instead of calling back.
///
/// The queue is unbounded. Once unsubscribed, `recv` drains what is left
/// and then reports disconnection. Dropping the receiver without
/// unsubscribing is also fine: the next publish on the channel removes it.
pub struct SubscriptionReceiver<V> {
    subscription: Subscription<V>,
    receiver: crossbeam_channel::Receiver<Message<V>>,
}

impl<V> SubscriptionReceiver<V> {
    pub(crate) fn new(
        subscription: Subscription<V>,
        receiver: crossbeam_channel::Receiver<Message<V>>,
    ) -> Self {
        Self {
            subscription,
            receiver,
        }
    }

    pub fn subscription(&self) -> &Subscription<V> {
        &self.subscription
    }

    pub fn unsubscribe(&self) -> bool {
        self.subscription.unsubscribe()
    }

    /// Receive the next message (blocking).
    pub fn recv(&self) -> Result<Message<V>, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message (non-blocking).
    pub fn try_recv(&self) -> Result<Message<V>, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<Message<V>, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every message queued so far.
    pub fn drain(&self) -> Vec<Message<V>> {
        self.receiver.try_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl<V> fmt::Debug for SubscriptionReceiver<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionReceiver")
            .field("subscription", &self.subscription)
            .field("queued", &self.receiver.len())
            .finish()
    }
}
