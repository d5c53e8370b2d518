// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge and MQTT settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::DeviceConfigOverride;

/// Complete bridge settings document.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::config::Settings;
///
/// let settings = Settings::from_json_str(r#"{
///     "mqtt": {"server": "mqtt://broker:1883", "baseTopic": "rfx"},
///     "rfxcom": {
///         "usbport": "/dev/ttyUSB0",
///         "receive": ["lighting2", "lighting4"],
///         "devices": [{"friendlyName": "lamp1", "id": "0x01", "subtype": 1}]
///     }
/// }"#).unwrap();
///
/// assert_eq!(settings.mqtt.base_topic, "rfx");
/// assert_eq!(settings.rfxcom.receive.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// MQTT connection settings.
    pub mqtt: MqttConfig,
    /// Transceiver settings.
    pub rfxcom: BridgeConfig,
}

impl Settings {
    /// Parses a settings document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Transceiver settings: serial port, received protocols and device overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Serial port of the transceiver, e.g. `/dev/ttyUSB0`.
    pub usbport: String,
    /// Logs every transmission in full when set.
    pub debug: bool,
    /// Protocol classes to enable and subscribe to, e.g. `["lighting2"]`.
    pub receive: Vec<String>,
    /// Per-device overrides.
    pub devices: Vec<DeviceConfigOverride>,
}

impl BridgeConfig {
    /// Creates settings for the transceiver at `usbport`.
    #[must_use]
    pub fn new(usbport: impl Into<String>) -> Self {
        Self {
            usbport: usbport.into(),
            ..Self::default()
        }
    }

    /// Enables debug logging of transmissions.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Adds a protocol class to receive.
    #[must_use]
    pub fn with_receive(mut self, protocol: impl Into<String>) -> Self {
        self.receive.push(protocol.into());
        self
    }

    /// Adds a device override.
    #[must_use]
    pub fn with_device(mut self, device: DeviceConfigOverride) -> Self {
        self.devices.push(device);
        self
    }
}

/// MQTT connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MqttConfig {
    /// Broker URL, e.g. `mqtt://localhost:1883`.
    pub server: String,
    /// Prefix of every published topic, without trailing slash.
    pub base_topic: String,
    /// Broker username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Broker password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Client id; generated when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Quality of service for publications (0, 1 or 2).
    pub qos: u8,
    /// Whether device state publications are retained.
    pub retain: bool,
    /// Keep-alive interval in seconds.
    pub keepalive: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            server: "mqtt://localhost:1883".to_string(),
            base_topic: "rfxcom2mqtt".to_string(),
            username: None,
            password: None,
            client_id: None,
            qos: 0,
            retain: true,
            keepalive: 60,
        }
    }
}

impl MqttConfig {
    /// Returns the keep-alive interval.
    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keepalive)
    }
}
