// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT topic layout and, with the `mqtt` feature, the broker connection.
//!
//! | Topic | Direction | Payload |
//! |-------|-----------|---------|
//! | `<base>/devices/<deviceId>` | published | enriched event (JSON) |
//! | `<base>/bridge/info` | published | [`BridgeInfo`](crate::BridgeInfo) (JSON) |
//! | `<base>/cmd/<deviceType>/<entityName>` | subscribed | [`CommandPayload`](crate::CommandPayload) (JSON) |
//!
//! The entity name is everything after the device type and may itself
//! contain `/`.

#[cfg(feature = "mqtt")]
mod publisher;

#[cfg(feature = "mqtt")]
pub use publisher::MqttPublisher;

use crate::error::ParseError;

/// Segment separating the base topic from command topics.
const COMMAND_SEGMENT: &str = "cmd";

/// Returns the topic device `device_id` reports state on.
///
/// # Examples
///
/// ```
/// assert_eq!(
///     rfxmqtt_lib::mqtt::device_topic("rfxcom2mqtt", "0x0102ABCD"),
///     "rfxcom2mqtt/devices/0x0102ABCD"
/// );
/// ```
#[must_use]
pub fn device_topic(base_topic: &str, device_id: &str) -> String {
    format!("{base_topic}/devices/{device_id}")
}

/// Returns the topic bridge metadata is published on.
#[must_use]
pub fn bridge_info_topic(base_topic: &str) -> String {
    format!("{base_topic}/bridge/info")
}

/// Returns the filter matching every command topic.
#[must_use]
pub fn command_filter(base_topic: &str) -> String {
    format!("{base_topic}/{COMMAND_SEGMENT}/#")
}

/// A parsed command topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTopic {
    /// Device class, e.g. `"Lighting2"`.
    pub device_type: String,
    /// Entity name or device address.
    pub entity: String,
}

impl CommandTopic {
    /// Parses `<base>/cmd/<deviceType>/<entityName>`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidTopic`] if `topic` is not under the
    /// command prefix or lacks a device type or entity.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfxmqtt_lib::mqtt::CommandTopic;
    ///
    /// let topic = CommandTopic::parse("rfx", "rfx/cmd/Lighting2/0x0102ABCD/1").unwrap();
    /// assert_eq!(topic.device_type, "Lighting2");
    /// assert_eq!(topic.entity, "0x0102ABCD/1");
    /// ```
    pub fn parse(base_topic: &str, topic: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidTopic(topic.to_string());

        let rest = topic
            .strip_prefix(base_topic)
            .and_then(|rest| rest.strip_prefix('/'))
            .and_then(|rest| rest.strip_prefix(COMMAND_SEGMENT))
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(invalid)?;

        match rest.split_once('/') {
            Some((device_type, entity)) if !device_type.is_empty() && !entity.is_empty() => Ok(Self {
                device_type: device_type.to_string(),
                entity: entity.to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}
