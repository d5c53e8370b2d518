// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Short-lived device handles used to address a transmitter class.

use serde::Serialize;
use serde_json::Value;

use crate::error::TransceiverError;
use crate::transceiver::Transceiver;
use crate::types::Subtype;

use super::DeviceKind;

/// One low-level device invocation handed to the driver.
///
/// A transmission is a device class (with its subtype and options) plus one
/// named function applied to one device identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmission {
    /// The device class.
    pub kind: DeviceKind,
    /// Subtype the handle was created with.
    pub subtype: Subtype,
    /// Class-specific options, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    /// The function to invoke, e.g. `"switchOn"`.
    pub function: String,
    /// Device identifier the function addresses, e.g. `"0x0102ABCD/1"`.
    pub device_id: String,
    /// Optional function argument (level, speed, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A device class bound to a transceiver, subtype and options.
///
/// Handles are created per command and not cached. [`DeviceHandle::create`]
/// is the only place a device class, subtype and options are combined.
///
/// # Examples
///
/// ```ignore
/// let handle = DeviceHandle::create(&transceiver, DeviceKind::Lighting2, Subtype::from(0), None);
/// handle.invoke("switchOn", "0x0102ABCD/1", None)?;
/// ```
#[derive(Debug)]
pub struct DeviceHandle<'a, T: Transceiver> {
    transceiver: &'a T,
    kind: DeviceKind,
    subtype: Subtype,
    options: Option<Value>,
}

impl<'a, T: Transceiver> DeviceHandle<'a, T> {
    /// Creates a handle for `kind` on the given transceiver.
    #[must_use]
    pub fn create(
        transceiver: &'a T,
        kind: DeviceKind,
        subtype: Subtype,
        options: Option<Value>,
    ) -> Self {
        Self {
            transceiver,
            kind,
            subtype,
            options,
        }
    }

    /// Returns the device class of this handle.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the subtype of this handle.
    #[must_use]
    pub fn subtype(&self) -> &Subtype {
        &self.subtype
    }

    /// Invokes `function` on `device_id`, with an optional argument.
    ///
    /// # Errors
    ///
    /// Propagates the driver's error if the transmission is refused.
    pub fn invoke(
        &self,
        function: &str,
        device_id: &str,
        value: Option<&Value>,
    ) -> Result<(), TransceiverError> {
        let transmission = Transmission {
            kind: self.kind,
            subtype: self.subtype.clone(),
            options: self.options.clone(),
            function: function.to_string(),
            device_id: device_id.to_string(),
            value: value.cloned(),
        };
        self.transceiver.transmit(&transmission)
    }
}
