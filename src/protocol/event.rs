// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enriched protocol events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::Subtype;

use super::SUBTYPE_NOT_FOUND;

/// A driver event with its identity resolved.
///
/// Produced from a [`RawEvent`](crate::transceiver::RawEvent) by
/// [`ProtocolEventRouter::enrich`](super::ProtocolEventRouter::enrich); the
/// raw event is left untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    /// Protocol class the event was received on, e.g. `"lighting2"`.
    #[serde(rename = "type")]
    pub protocol: String,
    /// Subtype code.
    pub subtype: Subtype,
    /// Subtype constant name, or `"notfound"`.
    pub sub_type_value: String,
    /// Product names for the packet type and subtype.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_name: Option<Vec<String>>,
    /// Physical device identifier.
    pub device_id: String,
    /// Identifier as decoded by the driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw data as decoded by the driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// Numeric command code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command_number: Option<i64>,
    /// Command name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Addressed unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_code: Option<i64>,
    /// Every other decoded field.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EnrichedEvent {
    /// Returns `true` if the subtype resolved to a named constant.
    #[must_use]
    pub fn has_sub_type_value(&self) -> bool {
        self.sub_type_value != SUBTYPE_NOT_FOUND
    }

    /// Returns `true` if this is a group command, addressing every unit of
    /// the device instead of one.
    #[must_use]
    pub fn is_group_command(&self) -> bool {
        self.command_number
            .is_some_and(|command| is_group_command(&self.protocol, command))
    }
}

/// Returns `true` if `command_number` is a group command for `protocol`.
///
/// | Protocol | Group commands |
/// |----------|----------------|
/// | `lighting1` | 5, 6 |
/// | `lighting2` | 3, 4 |
/// | `lighting6` | 2, 3 |
///
/// Every other protocol has no group commands.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::protocol::is_group_command;
///
/// assert!(is_group_command("lighting2", 3));
/// assert!(!is_group_command("lighting2", 1));
/// assert!(!is_group_command("lighting5", 3));
/// ```
#[must_use]
pub fn is_group_command(protocol: &str, command_number: i64) -> bool {
    match protocol {
        "lighting1" => matches!(command_number, 5 | 6),
        "lighting2" => matches!(command_number, 3 | 4),
        "lighting6" => matches!(command_number, 2 | 3),
        _ => false,
    }
}
