// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Abstract "set device state" requests.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ParseError;
use crate::types::Subtype;

/// A command request as received from the messaging layer.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::command::CommandPayload;
///
/// let payload = CommandPayload::from_json(br#"{"deviceFunction": "setLevel", "subtype": 0, "value": 7}"#).unwrap();
/// assert_eq!(payload.device_function, "setLevel");
///
/// let payload = CommandPayload::new("switchOn").with_subtype(1);
/// assert!(payload.value.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandPayload {
    /// The device function to invoke, e.g. `"switchOn"`.
    pub device_function: String,
    /// Subtype of the addressed device.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<Subtype>,
    /// Argument to the device function.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Device class options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_options: Option<Value>,
}

impl CommandPayload {
    /// Creates a payload invoking `device_function`.
    #[must_use]
    pub fn new(device_function: impl Into<String>) -> Self {
        Self {
            device_function: device_function.into(),
            subtype: None,
            value: None,
            device_options: None,
        }
    }

    /// Parses a JSON message body.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Json`] if the body is not a valid payload.
    pub fn from_json(body: &[u8]) -> Result<Self, ParseError> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Sets the subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<Subtype>) -> Self {
        self.subtype = Some(subtype.into());
        self
    }

    /// Sets the function argument.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the device options.
    #[must_use]
    pub fn with_device_options(mut self, options: Value) -> Self {
        self.device_options = Some(options);
        self
    }
}
