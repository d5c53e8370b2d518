// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registration and topic computation over a single device's state.

use crate::error::StateError;

use super::{DeviceInfo, DeviceSensor, DeviceState, DeviceSwitch};

/// Owns the [`DeviceState`] of one physical device.
///
/// Every registration is idempotent: adding an id that is already present
/// leaves the first registered value in place.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::state::{DeviceIdentity, DeviceState, DeviceStateStore, DeviceSwitch};
///
/// let state = DeviceState::new(DeviceIdentity::for_device("0x01", "porch"), "0x01", "lighting2", 0);
/// let mut store = DeviceStateStore::new(state);
///
/// store.add_switch(DeviceSwitch::new("porch").with_unit(2));
/// assert_eq!(
///     store.get_command_topic("rfxcom2mqtt/cmd/", "porch").unwrap(),
///     "rfxcom2mqtt/cmd/lighting2/0/0x01/2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStateStore {
    state: DeviceState,
}

impl DeviceStateStore {
    #[must_use]
    pub fn new(state: DeviceState) -> Self {
        Self { state }
    }

    /// Returns the wrapped state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    #[must_use]
    pub fn into_state(self) -> DeviceState {
        self.state
    }

    /// Projects the identity fields for metadata publication.
    #[must_use]
    pub fn get_info(&self) -> DeviceInfo {
        DeviceInfo::from(self.state.identity())
    }

    /// Appends `entity_id` unless already present. Returns `true` if added.
    pub fn add_entity(&mut self, entity_id: impl Into<String>) -> bool {
        let entity_id = entity_id.into();
        let entities = self.state.entities_mut();
        if entities.contains(&entity_id) {
            return false;
        }
        entities.push(entity_id);
        true
    }

    /// Registers `sensor` unless its id is taken, and returns the sensor
    /// stored under that id.
    pub fn add_sensor(&mut self, sensor: DeviceSensor) -> &DeviceSensor {
        self.state
            .sensors_mut()
            .entry(sensor.id.clone())
            .or_insert(sensor)
    }

    /// Registers a sensor labelled with its own id.
    pub fn add_sensor_id(&mut self, sensor_id: impl Into<String>) -> &DeviceSensor {
        self.add_sensor(DeviceSensor::new(sensor_id))
    }

    /// Registers `switch` unless its id is taken, and returns the switch
    /// stored under that id.
    pub fn add_switch(&mut self, switch: DeviceSwitch) -> &DeviceSwitch {
        self.state
            .switches_mut()
            .entry(switch.id.clone())
            .or_insert(switch)
    }

    /// Registers a default switch on unit 0 labelled with its own id.
    pub fn add_switch_id(&mut self, switch_id: impl Into<String>) -> &DeviceSwitch {
        self.add_switch(DeviceSwitch::new(switch_id))
    }

    /// Returns the topic commands for switch `entity_id` are addressed on:
    /// `base_topic + type + "/" + subtype + "/" + id + "/" + unit`.
    ///
    /// `base_topic` is used verbatim and must carry its own trailing
    /// separator.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::SwitchNotRegistered`] if `entity_id` is not a
    /// registered switch.
    pub fn get_command_topic(&self, base_topic: &str, entity_id: &str) -> Result<String, StateError> {
        self.switch_topic(base_topic, entity_id)
    }

    /// Returns the topic state for switch `entity_id` is reported on.
    ///
    /// Identical to [`get_command_topic`](Self::get_command_topic); the two
    /// directions are told apart by transport, not by path.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::SwitchNotRegistered`] if `entity_id` is not a
    /// registered switch.
    pub fn get_state_topic(&self, base_topic: &str, entity_id: &str) -> Result<String, StateError> {
        self.switch_topic(base_topic, entity_id)
    }

    fn switch_topic(&self, base_topic: &str, entity_id: &str) -> Result<String, StateError> {
        let state = &self.state;
        let switch = state
            .switches()
            .get(entity_id)
            .ok_or_else(|| StateError::SwitchNotRegistered {
                device_id: state.id().to_string(),
                entity_id: entity_id.to_string(),
            })?;

        Ok(format!(
            "{base_topic}{}/{}/{}/{}",
            state.device_type(),
            state.subtype(),
            state.id(),
            switch.unit
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DeviceIdentity;

    fn store() -> DeviceStateStore {
        DeviceStateStore::new(DeviceState::new(
            DeviceIdentity::for_device("0x0102ABCD", "hall"),
            "0x0102ABCD",
            "lighting2",
            1,
        ))
    }

    #[test]
    fn add_entity_is_idempotent() {
        let mut store = store();
        assert!(store.add_entity("hall"));
        assert!(!store.add_entity("hall"));
        assert!(store.add_entity("hall_2"));
        assert_eq!(store.state().entities(), ["hall", "hall_2"]);
    }

    #[test]
    fn add_sensor_keeps_first_value() {
        let mut store = store();
        store.add_sensor(DeviceSensor::new("battery").with_label("Battery"));
        let kept = store.add_sensor(DeviceSensor::new("battery").with_label("Other"));

        assert_eq!(kept.label, "Battery");
        assert_eq!(store.state().sensors().len(), 1);

        store.add_sensor_id("rssi");
        assert_eq!(store.state().sensors()["rssi"].label, "rssi");
        assert_eq!(store.state().sensors().len(), 2);
    }

    #[test]
    fn add_switch_keeps_first_value() {
        let mut store = store();
        store.add_switch(DeviceSwitch::new("hall").with_unit(3));
        store.add_switch(DeviceSwitch::new("hall").with_unit(9));
        store.add_switch_id("hall");

        assert_eq!(store.state().switches().len(), 1);
        assert_eq!(store.state().switches()["hall"].unit, 3);
    }

    #[test]
    fn registry_keys_match_ids() {
        let mut store = store();
        store.add_switch_id("a");
        store.add_sensor_id("b");
        assert!(store.state().switches().iter().all(|(key, switch)| *key == switch.id));
        assert!(store.state().sensors().iter().all(|(key, sensor)| *key == sensor.id));
    }

    // Command and state topics intentionally share one formula.
    #[test]
    fn command_and_state_topics_share_formula() {
        let mut store = store();
        store.add_switch(DeviceSwitch::new("hall").with_unit(4));

        let command = store.get_command_topic("rfxcom2mqtt/", "hall").unwrap();
        let state = store.get_state_topic("rfxcom2mqtt/", "hall").unwrap();

        assert_eq!(command, "rfxcom2mqtt/lighting2/1/0x0102ABCD/4");
        assert_eq!(command, state);
    }

    #[test]
    fn topic_for_unregistered_switch_fails() {
        let store = store();
        let err = store.get_command_topic("base/", "missing").unwrap_err();
        assert!(matches!(
            err,
            StateError::SwitchNotRegistered { ref device_id, ref entity_id }
                if device_id == "0x0102ABCD" && entity_id == "missing"
        ));
        assert!(store.get_state_topic("base/", "missing").is_err());
    }

    #[test]
    fn info_hides_registries() {
        let mut store = store();
        store.add_switch_id("hall");
        let info = serde_json::to_value(store.get_info()).unwrap();

        assert_eq!(info["name"], "hall");
        assert!(info.get("switches").is_none());
        assert!(info.get("entities").is_none());
    }
}
