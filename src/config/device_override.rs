// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device configuration overrides.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::Subtype;

/// User-supplied customization for one physical device.
///
/// Overrides are matched by friendly name when a command is dispatched and by
/// device id when an inbound event is routed.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::config::DeviceConfigOverride;
///
/// let lamp = DeviceConfigOverride::new()
///     .with_friendly_name("lamp1")
///     .with_id("0x01")
///     .with_subtype(1)
///     .with_repetitions(3);
///
/// assert_eq!(lamp.transmit_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceConfigOverride {
    /// Low-level device identifier, used instead of the friendly name when
    /// addressing the device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name commands use to refer to this device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Device class to use instead of the one in the command request.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    /// Subtype to use instead of the one in the command payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,
    /// Class-specific device options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// Number of times each command is transmitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetitions: Option<u32>,
}

impl DeviceConfigOverride {
    /// Creates an empty override.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the low-level device identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the friendly name.
    #[must_use]
    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    /// Sets the device class.
    #[must_use]
    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Sets the subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<Subtype>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Sets the device options.
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the repetition count.
    #[must_use]
    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = Some(repetitions);
        self
    }

    /// Returns how many times a command for this device is transmitted.
    ///
    /// Unset and zero both mean once.
    #[must_use]
    pub fn transmit_count(&self) -> u32 {
        self.repetitions.filter(|&n| n > 0).unwrap_or(1)
    }

    /// Returns the friendly name, falling back to the device id.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.friendly_name.as_deref().or(self.id.as_deref())
    }
}
