// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker connection relaying between the bridge and MQTT.

use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use rumqttc::{AsyncClient, EventLoop, MqttOptions, QoS};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::bridge::Bridge;
use crate::command::{CommandPayload, DispatchOutcome};
use crate::config::MqttConfig;
use crate::error::{ParseError, ProtocolError, Result};
use crate::event::BridgeEvent;
use crate::transceiver::Transceiver;

use super::{CommandTopic, bridge_info_topic, command_filter, device_topic};

static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Requests buffered between the client handle and its event loop.
const REQUEST_CAPACITY: usize = 10;

/// Relays a [`Bridge`] to an MQTT broker.
///
/// Publishes every routed event on its device topic and the bridge info on
/// each transceiver status report, and dispatches JSON commands received on
/// the command topics.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use rfxmqtt_lib::mqtt::MqttPublisher;
/// use rfxmqtt_lib::{Bridge, Settings, Transceiver};
///
/// async fn run<T: Transceiver>(transceiver: T, settings: Settings) -> rfxmqtt_lib::Result<()> {
///     let bridge = Arc::new(Bridge::new(transceiver, settings.rfxcom));
///     let publisher = MqttPublisher::connect(&settings.mqtt, Arc::clone(&bridge)).await?;
///     bridge.start().await?;
///     publisher.publish_bridge_info(&bridge.bridge_info()).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    base_topic: String,
    qos: QoS,
    retain: bool,
}

impl MqttPublisher {
    /// Connects to the broker in `config` and starts relaying `bridge`.
    ///
    /// Spawns two tasks: one driving the MQTT event loop and dispatching
    /// commands until the connection fails, one forwarding bridge events
    /// until the bridge is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidAddress`] for a malformed server URL
    /// or [`ProtocolError::Mqtt`] if the command subscription cannot be
    /// queued.
    pub async fn connect<T: Transceiver>(
        config: &MqttConfig,
        bridge: Arc<Bridge<T>>,
    ) -> std::result::Result<Self, ProtocolError> {
        let (host, port) = parse_server_url(&config.server)?;

        let client_id = config.client_id.clone().unwrap_or_else(|| {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("rfxcom2mqtt_{}_{}", std::process::id(), counter)
        });

        let mut mqtt_options = MqttOptions::new(client_id, host, port);
        mqtt_options.set_keep_alive(config.keep_alive());
        mqtt_options.set_clean_session(true);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            mqtt_options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CAPACITY);
        let publisher = Self {
            client,
            base_topic: config.base_topic.trim_end_matches('/').to_string(),
            qos: qos(config.qos),
            retain: config.retain,
        };

        let filter = command_filter(&publisher.base_topic);
        publisher
            .client
            .subscribe(&filter, publisher.qos)
            .await
            .map_err(ProtocolError::Mqtt)?;
        tracing::info!(server = %config.server, filter = %filter, "MQTT command subscription queued");

        let events = bridge.subscribe();
        let relay = publisher.clone();
        let info_source = Arc::downgrade(&bridge);
        tokio::spawn(async move {
            relay.forward_events(events, info_source).await;
        });

        let base_topic = publisher.base_topic.clone();
        tokio::spawn(async move {
            handle_mqtt_events(event_loop, base_topic, bridge).await;
        });

        Ok(publisher)
    }

    /// Returns the base topic without trailing separator.
    #[must_use]
    pub fn base_topic(&self) -> &str {
        &self.base_topic
    }

    /// Publishes bridge metadata on the bridge info topic.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be queued.
    pub async fn publish_bridge_info(&self, info: &impl Serialize) -> Result<()> {
        self.publish_json(bridge_info_topic(&self.base_topic), info).await
    }

    /// Publishes `state` on the topic of device `device_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be queued.
    pub async fn publish_state(&self, device_id: &str, state: &impl Serialize) -> Result<()> {
        self.publish_json(device_topic(&self.base_topic, device_id), state).await
    }

    /// Disconnects from the broker.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be queued.
    pub async fn disconnect(&self) -> Result<()> {
        self.client.disconnect().await.map_err(ProtocolError::Mqtt)?;
        Ok(())
    }

    async fn publish_json(&self, topic: String, payload: &impl Serialize) -> Result<()> {
        let payload = serde_json::to_vec(payload).map_err(ParseError::from)?;
        tracing::debug!(topic = %topic, bytes = payload.len(), "Publishing MQTT message");

        self.client
            .publish(topic, self.qos, self.retain, payload)
            .await
            .map_err(ProtocolError::Mqtt)?;
        Ok(())
    }

    async fn forward_events<T: Transceiver>(
        &self,
        mut events: broadcast::Receiver<BridgeEvent>,
        bridge: Weak<Bridge<T>>,
    ) {
        loop {
            let bridge_event = match events.recv().await {
                Ok(bridge_event) => bridge_event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "MQTT relay fell behind, events dropped");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };

            let result = match &bridge_event {
                BridgeEvent::Received { event, .. } => self.publish_state(&event.device_id, event).await,
                BridgeEvent::Status(_) => {
                    let Some(bridge) = bridge.upgrade() else {
                        break;
                    };
                    let info = bridge.bridge_info();
                    drop(bridge);
                    self.publish_bridge_info(&info).await
                }
                BridgeEvent::Disconnected => Ok(()),
            };

            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to publish bridge event");
            }
        }
    }
}

/// Parses a command message and dispatches it on `bridge`.
///
/// Messages outside the command topics and malformed payloads are logged and
/// dropped; so are dispatch errors.
pub(crate) fn handle_command<T: Transceiver>(
    bridge: &Bridge<T>,
    base_topic: &str,
    topic: &str,
    payload: &[u8],
) -> Option<DispatchOutcome> {
    let command = match CommandTopic::parse(base_topic, topic) {
        Ok(command) => command,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring message");
            return None;
        }
    };

    let payload = match CommandPayload::from_json(payload) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(topic = %topic, error = %e, "Invalid command payload");
            return None;
        }
    };

    match bridge.dispatch(&command.device_type, &command.entity, &payload) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            tracing::error!(
                device_type = %command.device_type,
                entity = %command.entity,
                error = %e,
                "Command failed"
            );
            None
        }
    }
}

fn qos(level: u8) -> QoS {
    match level {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    }
}

fn parse_server_url(url: &str) -> std::result::Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), 1883)
    };

    if host.is_empty() {
        return Err(ProtocolError::InvalidAddress("missing host".to_string()));
    }
    Ok((host, port))
}

async fn handle_mqtt_events<T: Transceiver>(
    mut event_loop: EventLoop,
    base_topic: String,
    bridge: Arc<Bridge<T>>,
) {
    use rumqttc::{Event, Packet};

    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::info!(?connack, "MQTT connected");
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                tracing::debug!(topic = %publish.topic, "Received MQTT message");
                handle_command(&bridge, &base_topic, &publish.topic, &publish.payload);
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "MQTT event loop error");
                break;
            }
        }
    }
}
