// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static bridge configuration.
//!
//! Configuration is read once at startup and never mutated. It provides:
//!
//! - [`BridgeConfig`]: serial port, received protocols, device overrides
//! - [`MqttConfig`]: broker connection settings
//! - [`DeviceConfigOverride`]: per-device customization
//! - [`DeviceConfigResolver`]: override lookup by friendly name or device id

mod device_override;
mod resolver;
mod settings;

pub use device_override::DeviceConfigOverride;
pub use resolver::{CommandTarget, DeviceConfigResolver};
pub use settings::{BridgeConfig, MqttConfig, Settings};
