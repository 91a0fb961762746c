// src/core/pubsub/mod.rs

//! The publish-subscribe hub. Each channel is a broadcast sender created on
//! first subscription.

use bytes::Bytes;
use dashmap::DashMap;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tracing::debug;

/// The capacity of each individual broadcast channel.
const CHANNEL_CAPACITY: usize = 128;

#[derive(Debug, Default)]
pub struct PubSubManager {
    channels: DashMap<Bytes, Sender<Bytes>>,
}

impl PubSubManager {
    pub fn new() -> Self {
        Default::default()
    }

    /// Subscribes to `channel`, creating it if needed.
    pub fn subscribe(&self, channel: &Bytes) -> Receiver<Bytes> {
        self.channels
            .entry(channel.clone())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .value()
            .subscribe()
    }

    /// Publishes a message and returns how many subscribers received it.
    pub fn publish(&self, channel: &Bytes, message: Bytes) -> usize {
        self.channels
            .get(channel)
            .map_or(0, |sender| sender.send(message).unwrap_or(0))
    }

    pub fn subscriber_count(&self, channel: &Bytes) -> usize {
        self.channels
            .get(channel)
            .map_or(0, |sender| sender.receiver_count())
    }

    /// Removes channels that no longer have subscribers.
    pub fn purge_empty_channels(&self) -> usize {
        let before = self.channels.len();
        self.channels.retain(|_, sender| sender.receiver_count() > 0);
        let purged = before.saturating_sub(self.channels.len());
        if purged > 0 {
            debug!("Purged {} empty Pub/Sub channels.", purged);
        }
        purged
    }
}
