// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The session-wide set of device state stores.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::config::DeviceConfigOverride;
use crate::error::StateError;
use crate::protocol::EnrichedEvent;

use super::{DeviceIdentity, DeviceInfo, DeviceState, DeviceStateStore, DeviceSwitch};

/// Protocol classes whose events address a numbered unit.
const UNIT_ADDRESSED_PREFIX: &str = "lighting";

/// One [`DeviceStateStore`] per physical device id.
///
/// Stores are created on first observation and live until the registry is
/// dropped. The registry is shared between the bridge and driver listeners,
/// so every method takes `&self`.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    stores: RwLock<BTreeMap<String, DeviceStateStore>>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `state` unless a device with the same id is known. Returns
    /// `true` if added.
    pub fn register(&self, state: DeviceState) -> bool {
        let mut stores = self.stores.write();
        if stores.contains_key(state.id()) {
            return false;
        }
        tracing::debug!(device_id = %state.id(), device_type = %state.device_type(), "Registered device");
        stores.insert(state.id().to_string(), DeviceStateStore::new(state));
        true
    }

    /// Records a routed event: creates the device on first sight, then
    /// registers its entity and, for unit-addressed lighting events that are
    /// not group commands, a switch on that unit.
    ///
    /// The entity is named after the override's friendly name when one is
    /// configured, otherwise after the device id. Either name is suffixed
    /// with `_<unit>` when the event addresses a unit, so every unit of a
    /// device gets its own switch.
    ///
    /// Returns the device's metadata.
    pub fn observe(&self, event: &EnrichedEvent, device: Option<&DeviceConfigOverride>) -> DeviceInfo {
        let friendly_name = device.and_then(|device| device.friendly_name.as_deref());
        let unit = event
            .unit_code
            .filter(|_| event.protocol.starts_with(UNIT_ADDRESSED_PREFIX) && !event.is_group_command());

        let base = friendly_name.unwrap_or(&event.device_id);
        let entity = match unit {
            Some(unit) => format!("{base}_{unit}"),
            None => base.to_string(),
        };

        let mut stores = self.stores.write();
        let store = stores.entry(event.device_id.clone()).or_insert_with(|| {
            let subtype = event.subtype.as_byte().unwrap_or_else(|| {
                tracing::debug!(subtype = %event.subtype, "Subtype does not fit a byte, stored as 0");
                0
            });
            let name = friendly_name.unwrap_or(&event.device_id);
            tracing::debug!(device_id = %event.device_id, protocol = %event.protocol, "New device observed");

            DeviceStateStore::new(
                DeviceState::new(
                    DeviceIdentity::for_device(&event.device_id, name),
                    event.device_id.clone(),
                    event.protocol.clone(),
                    subtype,
                )
                .with_sub_type_value(event.sub_type_value.clone()),
            )
        });

        if let Some(unit) = unit {
            store.add_switch(DeviceSwitch::new(entity.clone()).with_unit(unit));
        }
        store.add_entity(entity);
        store.get_info()
    }

    /// Returns a snapshot of device `device_id`.
    #[must_use]
    pub fn get(&self, device_id: &str) -> Option<DeviceState> {
        self.stores.read().get(device_id).map(|store| store.state().clone())
    }

    /// Returns the metadata of device `device_id`.
    #[must_use]
    pub fn info(&self, device_id: &str) -> Option<DeviceInfo> {
        self.stores.read().get(device_id).map(DeviceStateStore::get_info)
    }

    /// Runs `f` against the store of device `device_id`.
    pub fn with_store<R>(&self, device_id: &str, f: impl FnOnce(&mut DeviceStateStore) -> R) -> Option<R> {
        self.stores.write().get_mut(device_id).map(f)
    }

    /// Returns the command topic of switch `entity_id` on device `device_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::DeviceNotRegistered`] for an unknown device and
    /// [`StateError::SwitchNotRegistered`] for an unknown switch.
    pub fn command_topic(&self, base_topic: &str, device_id: &str, entity_id: &str) -> Result<String, StateError> {
        self.stores
            .read()
            .get(device_id)
            .ok_or_else(|| StateError::DeviceNotRegistered(device_id.to_string()))?
            .get_command_topic(base_topic, entity_id)
    }

    /// Returns the state topic of switch `entity_id` on device `device_id`.
    ///
    /// # Errors
    ///
    /// Same as [`command_topic`](Self::command_topic).
    pub fn state_topic(&self, base_topic: &str, device_id: &str, entity_id: &str) -> Result<String, StateError> {
        self.stores
            .read()
            .get(device_id)
            .ok_or_else(|| StateError::DeviceNotRegistered(device_id.to_string()))?
            .get_state_topic(base_topic, entity_id)
    }

    /// Returns the known device ids in ascending order.
    #[must_use]
    pub fn device_ids(&self) -> Vec<String> {
        self.stores.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stores.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stores.read().is_empty()
    }
}
