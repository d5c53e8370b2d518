// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device state records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Manufacturer reported for every RF device.
pub const DEVICE_MANUFACTURER: &str = "Rfxcom";

/// Identifier of the bridge that relays every RF device.
pub const VIA_DEVICE: &str = "rfxcom2mqtt_bridge";

/// Prefix of the identifier derived from a physical device id.
pub const IDENTIFIER_PREFIX: &str = "rfxcom2mqtt_";

/// Stable identity of a physical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Keys the messaging layer uses to correlate the device across sessions.
    pub identifiers: Vec<String>,
    /// Display name.
    pub name: String,
}

impl DeviceIdentity {
    /// Creates an identity.
    #[must_use]
    pub fn new(identifiers: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            identifiers,
            name: name.into(),
        }
    }

    /// Derives the identity of the device with physical id `device_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rfxmqtt_lib::state::DeviceIdentity;
    ///
    /// let identity = DeviceIdentity::for_device("0x0102ABCD", "kitchen");
    /// assert_eq!(identity.identifiers, vec!["rfxcom2mqtt_0x0102ABCD"]);
    /// assert_eq!(identity.name, "kitchen");
    /// ```
    #[must_use]
    pub fn for_device(device_id: &str, name: impl Into<String>) -> Self {
        Self::new(vec![format!("{IDENTIFIER_PREFIX}{device_id}")], name)
    }
}

/// Identity-only projection of a device, published as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Correlation keys.
    pub identifiers: Vec<String>,
    /// Display name.
    pub name: String,
    /// Always [`DEVICE_MANUFACTURER`].
    pub manufacturer: String,
    /// Always [`VIA_DEVICE`].
    pub via_device: String,
}

impl From<&DeviceIdentity> for DeviceInfo {
    fn from(identity: &DeviceIdentity) -> Self {
        Self {
            identifiers: identity.identifiers.clone(),
            name: identity.name.clone(),
            manufacturer: DEVICE_MANUFACTURER.to_string(),
            via_device: VIA_DEVICE.to_string(),
        }
    }
}

/// A read-only measurement channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSensor {
    pub id: String,
    pub label: String,
    pub description: String,
    pub property: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
}

impl DeviceSensor {
    /// Creates a sensor labelled with its own id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = property.into();
        self
    }

    #[must_use]
    pub fn with_type(mut self, sensor_type: impl Into<String>) -> Self {
        self.sensor_type = sensor_type.into();
        self
    }
}

/// A controllable channel, addressed on its device by `unit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSwitch {
    pub id: String,
    pub label: String,
    /// Sub-address on the physical device.
    pub unit: i64,
    pub value_off: String,
    pub value_on: String,
    pub description: String,
    pub property: String,
    #[serde(rename = "type")]
    pub switch_type: String,
}

impl Default for DeviceSwitch {
    fn default() -> Self {
        Self {
            id: String::new(),
            label: String::new(),
            unit: 0,
            value_off: "Off".to_string(),
            value_on: "On".to_string(),
            description: "On/off state of the switch".to_string(),
            property: "command".to_string(),
            switch_type: "binary".to_string(),
        }
    }
}

impl DeviceSwitch {
    /// Creates a binary on/off switch on unit 0, labelled with its own id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            ..Self::default()
        }
    }

    /// Sets the unit the switch addresses.
    #[must_use]
    pub fn with_unit(mut self, unit: i64) -> Self {
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the payload values reported for off and on.
    #[must_use]
    pub fn with_values(mut self, value_off: impl Into<String>, value_on: impl Into<String>) -> Self {
        self.value_off = value_off.into();
        self.value_on = value_on.into();
        self
    }
}

/// Everything known about one physical device.
///
/// Created on the first event or configuration entry naming the device and
/// then mutated only through [`DeviceStateStore`](super::DeviceStateStore),
/// which keeps entity ids unique and registry keys equal to the ids they hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceState {
    #[serde(flatten)]
    identity: DeviceIdentity,
    id: String,
    #[serde(rename = "type")]
    device_type: String,
    subtype: u8,
    sub_type_value: String,
    entities: Vec<String>,
    sensors: BTreeMap<String, DeviceSensor>,
    switches: BTreeMap<String, DeviceSwitch>,
}

impl DeviceState {
    /// Creates the state of device `id`, of protocol class `device_type`
    /// (e.g. `"lighting2"`) and numeric `subtype`.
    #[must_use]
    pub fn new(
        identity: DeviceIdentity,
        id: impl Into<String>,
        device_type: impl Into<String>,
        subtype: u8,
    ) -> Self {
        Self {
            identity,
            id: id.into(),
            device_type: device_type.into(),
            subtype,
            sub_type_value: String::new(),
            entities: Vec::new(),
            sensors: BTreeMap::new(),
            switches: BTreeMap::new(),
        }
    }

    /// Sets the resolved subtype name.
    #[must_use]
    pub fn with_sub_type_value(mut self, name: impl Into<String>) -> Self {
        self.sub_type_value = name.into();
        self
    }

    #[must_use]
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    #[must_use]
    pub fn subtype(&self) -> u8 {
        self.subtype
    }

    #[must_use]
    pub fn sub_type_value(&self) -> &str {
        &self.sub_type_value
    }

    /// Returns the entity ids in registration order.
    #[must_use]
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    #[must_use]
    pub fn sensors(&self) -> &BTreeMap<String, DeviceSensor> {
        &self.sensors
    }

    #[must_use]
    pub fn switches(&self) -> &BTreeMap<String, DeviceSwitch> {
        &self.switches
    }

    pub(super) fn entities_mut(&mut self) -> &mut Vec<String> {
        &mut self.entities
    }

    pub(super) fn sensors_mut(&mut self) -> &mut BTreeMap<String, DeviceSensor> {
        &mut self.sensors
    }

    pub(super) fn switches_mut(&mut self) -> &mut BTreeMap<String, DeviceSwitch> {
        &mut self.switches
    }
}
