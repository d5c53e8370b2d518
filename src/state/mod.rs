// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory device state.
//!
//! Each physical device observed during a session gets a [`DeviceState`]
//! holding its identity and the entities, sensors and switches it exposes.
//! A [`DeviceStateStore`] wraps one state and is the only way to mutate it;
//! the [`DeviceRegistry`] holds one store per device id.
//!
//! Nothing here is persisted. The registry is rebuilt from configuration and
//! received events on every start.
//!
//! # Examples
//!
//! ```
//! use rfxmqtt_lib::state::{DeviceIdentity, DeviceState, DeviceStateStore};
//!
//! let state = DeviceState::new(DeviceIdentity::for_device("0x01", "porch"), "0x01", "lighting2", 0);
//! let mut store = DeviceStateStore::new(state);
//!
//! assert!(store.add_entity("porch"));
//! assert!(!store.add_entity("porch"));
//! ```

mod device_state;
mod registry;
mod store;

pub use device_state::{
    DEVICE_MANUFACTURER, DeviceIdentity, DeviceInfo, DeviceSensor, DeviceState, DeviceSwitch,
    IDENTIFIER_PREFIX, VIA_DEVICE,
};
pub use registry::DeviceRegistry;
pub use store::DeviceStateStore;
