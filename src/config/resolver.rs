// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolution of device overrides for commands and events.

use std::sync::Arc;

use serde_json::Value;

use crate::capabilities::CapabilityRegistry;
use crate::device::DeviceKind;
use crate::error::ConfigError;
use crate::types::Subtype;

use super::DeviceConfigOverride;

/// Where and how a command is transmitted once overrides are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTarget {
    /// Device class to instantiate.
    pub kind: DeviceKind,
    /// Identifier passed to the device function.
    pub entity: String,
    /// Subtype, if the request or an override supplied one.
    pub subtype: Option<Subtype>,
    /// Device options, if any.
    pub options: Option<Value>,
    /// Number of transmissions.
    pub repetitions: u32,
}

impl CommandTarget {
    /// Creates a target for `entity` on `kind`, transmitted once.
    #[must_use]
    pub fn new(kind: DeviceKind, entity: impl Into<String>) -> Self {
        Self {
            kind,
            entity: entity.into(),
            subtype: None,
            options: None,
            repetitions: 1,
        }
    }

    /// Sets the request subtype.
    #[must_use]
    pub fn with_subtype(mut self, subtype: Option<Subtype>) -> Self {
        self.subtype = subtype;
        self
    }

    /// Sets the request options.
    #[must_use]
    pub fn with_options(mut self, options: Option<Value>) -> Self {
        self.options = options;
        self
    }
}

/// Looks up device overrides from static configuration.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rfxmqtt_lib::CapabilityRegistry;
/// use rfxmqtt_lib::config::{CommandTarget, DeviceConfigOverride, DeviceConfigResolver};
/// use rfxmqtt_lib::device::DeviceKind;
///
/// let resolver = DeviceConfigResolver::new(
///     vec![DeviceConfigOverride::new().with_friendly_name("lamp1").with_id("0x01").with_repetitions(3)],
///     Arc::new(CapabilityRegistry::rfxcom()),
/// );
///
/// let target = resolver.apply(CommandTarget::new(DeviceKind::Lighting2, "lamp1")).unwrap();
/// assert_eq!(target.entity, "0x01");
/// assert_eq!(target.repetitions, 3);
/// ```
#[derive(Debug, Clone)]
pub struct DeviceConfigResolver {
    devices: Vec<DeviceConfigOverride>,
    capabilities: Arc<CapabilityRegistry>,
}

impl DeviceConfigResolver {
    /// Creates a resolver over the configured overrides.
    #[must_use]
    pub fn new(devices: Vec<DeviceConfigOverride>, capabilities: Arc<CapabilityRegistry>) -> Self {
        Self {
            devices,
            capabilities,
        }
    }

    /// Returns all configured overrides.
    #[must_use]
    pub fn devices(&self) -> &[DeviceConfigOverride] {
        &self.devices
    }

    /// Finds the override whose friendly name is `entity_name`.
    #[must_use]
    pub fn resolve(&self, entity_name: &str) -> Option<&DeviceConfigOverride> {
        self.devices
            .iter()
            .find(|device| device.friendly_name.as_deref() == Some(entity_name))
    }

    /// Finds the override whose device id is `device_id`.
    #[must_use]
    pub fn find_by_device_id(&self, device_id: &str) -> Option<&DeviceConfigOverride> {
        self.devices
            .iter()
            .find(|device| device.id.as_deref() == Some(device_id))
    }

    /// Applies the override matching `target.entity`, if any.
    ///
    /// - `id` replaces the entity used for addressing,
    /// - `type` replaces the device class,
    /// - `subtype` replaces the request subtype,
    /// - `options` replaces the request options when present,
    /// - `repetitions` sets the transmission count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidDeviceType`] if the override names a
    /// device class the driver does not support.
    pub fn apply(&self, mut target: CommandTarget) -> Result<CommandTarget, ConfigError> {
        let Some(device) = self.resolve(&target.entity) else {
            return Ok(target);
        };

        tracing::debug!(entity = %target.entity, "Applying device configuration override");

        if let Some(ref id) = device.id {
            target.entity.clone_from(id);
        }

        if let Some(ref device_type) = device.device_type {
            target.kind = self.capabilities.device_kind(device_type).ok_or_else(|| {
                ConfigError::InvalidDeviceType {
                    device_type: device_type.clone(),
                }
            })?;
        }

        if device.options.is_some() {
            target.options.clone_from(&device.options);
        }

        if device.subtype.is_some() {
            target.subtype.clone_from(&device.subtype);
        }

        target.repetitions = device.transmit_count();

        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver(devices: Vec<DeviceConfigOverride>) -> DeviceConfigResolver {
        DeviceConfigResolver::new(devices, Arc::new(CapabilityRegistry::rfxcom()))
    }

    #[test]
    fn resolve_matches_friendly_name_only() {
        let resolver = resolver(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("lamp1")
                .with_id("0x01"),
        ]);

        assert!(resolver.resolve("lamp1").is_some());
        assert!(resolver.resolve("0x01").is_none());
        assert!(resolver.find_by_device_id("0x01").is_some());
        assert!(resolver.find_by_device_id("lamp1").is_none());
    }

    #[test]
    fn apply_without_override_is_identity() {
        let resolver = resolver(Vec::new());
        let target = CommandTarget::new(DeviceKind::Lighting2, "lamp1")
            .with_subtype(Some(Subtype::from(0)));

        assert_eq!(resolver.apply(target.clone()).unwrap(), target);
    }

    #[test]
    fn apply_substitutes_every_field() {
        let resolver = resolver(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("fan")
                .with_id("0x0A0B0C")
                .with_type("Fan")
                .with_subtype(3)
                .with_options(json!({"speed": 2}))
                .with_repetitions(2),
        ]);

        let target = resolver
            .apply(
                CommandTarget::new(DeviceKind::Lighting2, "fan")
                    .with_subtype(Some(Subtype::from(0)))
                    .with_options(Some(json!({"ignored": true}))),
            )
            .unwrap();

        assert_eq!(target.kind, DeviceKind::Fan);
        assert_eq!(target.entity, "0x0A0B0C");
        assert_eq!(target.subtype, Some(Subtype::from(3)));
        assert_eq!(target.options, Some(json!({"speed": 2})));
        assert_eq!(target.repetitions, 2);
    }

    #[test]
    fn apply_keeps_request_options_when_override_has_none() {
        let resolver = resolver(vec![DeviceConfigOverride::new().with_friendly_name("lamp")]);
        let target = resolver
            .apply(
                CommandTarget::new(DeviceKind::Lighting5, "lamp")
                    .with_options(Some(json!({"mood": 1}))),
            )
            .unwrap();

        assert_eq!(target.options, Some(json!({"mood": 1})));
        assert_eq!(target.entity, "lamp");
    }

    #[test]
    fn apply_rejects_unknown_configured_type() {
        let resolver = resolver(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("lamp")
                .with_type("Lighting9"),
        ]);

        let err = resolver
            .apply(CommandTarget::new(DeviceKind::Lighting2, "lamp"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDeviceType { ref device_type } if device_type == "Lighting9"
        ));
    }

    #[test]
    fn apply_rejects_type_missing_from_driver() {
        let capabilities = crate::CapabilityRegistryBuilder::new()
            .with_device(DeviceKind::Lighting2)
            .build();
        let resolver = DeviceConfigResolver::new(
            vec![
                DeviceConfigOverride::new()
                    .with_friendly_name("blind")
                    .with_type("Rfy"),
            ],
            Arc::new(capabilities),
        );

        assert!(
            resolver
                .apply(CommandTarget::new(DeviceKind::Lighting2, "blind"))
                .is_err()
        );
    }
}
