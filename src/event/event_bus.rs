// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broadcast channel for bridge events.

use tokio::sync::broadcast;

use super::BridgeEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Fans bridge events out to every subscriber.
///
/// Publishing never blocks: the driver calls into the bridge from its own
/// listener context. A subscriber that falls more than the capacity behind
/// receives `RecvError::Lagged` and skips the oldest events.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::event::{BridgeEvent, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(BridgeEvent::Disconnected);
/// assert_eq!(rx.try_recv().unwrap(), BridgeEvent::Disconnected);
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BridgeEvent>,
}

impl EventBus {
    /// Creates a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes `event`, discarding it when nobody listens.
    pub fn publish(&self, event: BridgeEvent) {
        let _ = self.sender.send(event);
    }

    /// Publishes `event` and returns how many subscribers received it.
    #[must_use]
    pub fn publish_counted(&self, event: BridgeEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
