// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw payloads emitted by the driver.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::types::Subtype;

/// A decoded RF packet as emitted by the driver, before enrichment.
///
/// Only the fields the bridge interprets are typed; everything else the
/// driver decodes (RSSI, battery level, temperatures, ...) is kept in
/// [`fields`](Self::fields) and passed through untouched.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::transceiver::RawEvent;
///
/// let event = RawEvent::new(0x11, 1).with_id("0x0102ABCD").with_command_number(1);
/// assert_eq!(event.id.as_deref(), Some("0x0102ABCD"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Packet type byte the event was decoded from (e.g. `0x11` for lighting2).
    pub packet_type: u8,
    /// Subtype code within the packet type.
    pub subtype: Subtype,
    /// Device identifier, for every protocol class except lighting4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw data, which carries the identifier for lighting4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Numeric command code, when the packet is a command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_number: Option<i64>,
    /// Command name, when the packet is a command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Unit (sub-channel) the command addresses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<i64>,
    /// Every other decoded field.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawEvent {
    /// Creates an event with only a packet type and subtype.
    #[must_use]
    pub fn new(packet_type: u8, subtype: impl Into<Subtype>) -> Self {
        Self {
            packet_type,
            subtype: subtype.into(),
            id: None,
            data: None,
            command_number: None,
            command: None,
            unit_code: None,
            fields: Map::new(),
        }
    }

    /// Sets the device identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the raw data field.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Sets the command number.
    #[must_use]
    pub fn with_command_number(mut self, command_number: i64) -> Self {
        self.command_number = Some(command_number);
        self
    }

    /// Sets the command name.
    #[must_use]
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Sets the unit code.
    #[must_use]
    pub fn with_unit_code(mut self, unit_code: i64) -> Self {
        self.unit_code = Some(unit_code);
        self
    }

    /// Adds a pass-through field.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Transceiver status as reported on connect or on a health check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransceiverStatus {
    /// Numeric receiver type.
    pub receiver_type_code: u8,
    /// Receiver type, e.g. `"433.92MHz transceiver"`.
    pub receiver_type: String,
    /// Hardware version.
    pub hardware_version: String,
    /// Firmware version.
    pub firmware_version: u16,
    /// Firmware type, e.g. `"Pro XL1"`.
    pub firmware_type: String,
    /// Protocols currently enabled for reception.
    pub enabled_protocols: Vec<String>,
}

impl TransceiverStatus {
    /// Parses a status event, ignoring the packet bookkeeping fields
    /// (`subtype`, `seqnbr`, `cmnd`) the driver includes.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if a known field has the wrong type.
    pub fn from_event(event: &Value) -> Result<Self, ParseError> {
        let mut event = event.clone();
        if let Some(object) = event.as_object_mut() {
            for key in ["subtype", "seqnbr", "cmnd"] {
                object.remove(key);
            }
        }
        Ok(serde_json::from_value(event)?)
    }
}
