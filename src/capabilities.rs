// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device class and function capabilities of the transceiver driver.
//!
//! The registry is an explicit table of device class → supported functions.
//! It is built once when the bridge is created (from
//! [`Transceiver::capabilities`](crate::transceiver::Transceiver::capabilities))
//! and consulted before every dispatch and before accepting a configuration
//! override that names a device type.
//!
//! # Full Catalogue
//!
//! [`CapabilityRegistry::rfxcom`] contains every class in [`DeviceKind::ALL`]
//! with all of its functions.
//!
//! # Manual Configuration
//!
//! Drivers that only support part of the catalogue can describe themselves
//! with [`CapabilityRegistryBuilder`] or [`CapabilityRegistry::from_catalogue`].

use std::collections::{BTreeMap, BTreeSet};

use crate::device::DeviceKind;
use crate::error::ConfigError;

/// Device classes and functions supported by a transceiver driver.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::CapabilityRegistry;
///
/// let registry = CapabilityRegistry::rfxcom();
/// assert!(registry.is_valid_device_type("Lighting2"));
/// assert!(registry.is_valid_device_function("Lighting2", "switchOn"));
/// assert!(!registry.is_valid_device_function("Lighting2", "open"));
/// assert!(!registry.is_valid_device_function("Toaster", "switchOn"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityRegistry {
    functions: BTreeMap<DeviceKind, BTreeSet<String>>,
}

impl CapabilityRegistry {
    /// Creates an empty registry that accepts nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates the full RFXCOM transmitter catalogue.
    #[must_use]
    pub fn rfxcom() -> Self {
        DeviceKind::ALL
            .into_iter()
            .fold(CapabilityRegistryBuilder::new(), CapabilityRegistryBuilder::with_device)
            .build()
    }

    /// Builds a registry from a driver's introspected catalogue of
    /// (class name, function names) pairs.
    ///
    /// Class names this crate has no [`DeviceKind`] for are skipped, since no
    /// handle could be created for them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFunction`] if a function name is empty.
    pub fn from_catalogue<I, C, F, S>(catalogue: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (C, F)>,
        C: AsRef<str>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut builder = CapabilityRegistryBuilder::new();
        for (class_name, functions) in catalogue {
            let class_name = class_name.as_ref();
            let Ok(kind) = class_name.parse::<DeviceKind>() else {
                tracing::debug!(class = %class_name, "Skipping unsupported device class");
                continue;
            };

            let functions: Vec<String> = functions.into_iter().map(Into::into).collect();
            if let Some(empty) = functions.iter().position(String::is_empty) {
                return Err(ConfigError::InvalidFunction(format!(
                    "{class_name}: function #{empty} has an empty name"
                )));
            }
            builder = builder.with_functions(kind, functions);
        }
        Ok(builder.build())
    }

    /// Returns `true` if `name` is a recognized device class.
    #[must_use]
    pub fn is_valid_device_type(&self, name: &str) -> bool {
        self.device_kind(name).is_some()
    }

    /// Returns `true` if `function` is an operation of the class `device_type`.
    ///
    /// Always `false` when the class itself is unrecognized.
    #[must_use]
    pub fn is_valid_device_function(&self, device_type: &str, function: &str) -> bool {
        self.device_kind(device_type)
            .and_then(|kind| self.functions.get(&kind))
            .is_some_and(|functions| functions.contains(function))
    }

    /// Resolves a class name to its [`DeviceKind`] if this registry supports it.
    #[must_use]
    pub fn device_kind(&self, name: &str) -> Option<DeviceKind> {
        name.parse::<DeviceKind>()
            .ok()
            .filter(|kind| self.functions.contains_key(kind))
    }

    /// Returns the supported device classes, in a stable order.
    pub fn device_kinds(&self) -> impl Iterator<Item = DeviceKind> + '_ {
        self.functions.keys().copied()
    }

    /// Returns the number of supported device classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` if no device class is supported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Builder for creating a custom capability table.
#[derive(Debug, Default)]
pub struct CapabilityRegistryBuilder {
    inner: CapabilityRegistry,
}

impl CapabilityRegistryBuilder {
    /// Creates a new builder with no device classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device class with every function it exposes.
    #[must_use]
    pub fn with_device(self, kind: DeviceKind) -> Self {
        self.with_functions(kind, kind.functions().iter().copied())
    }

    /// Adds a device class with an explicit set of functions.
    ///
    /// Calling this twice for the same class merges the function sets.
    #[must_use]
    pub fn with_functions<I, S>(mut self, kind: DeviceKind, functions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner
            .functions
            .entry(kind)
            .or_default()
            .extend(functions.into_iter().map(Into::into));
        self
    }

    /// Builds the registry.
    #[must_use]
    pub fn build(self) -> CapabilityRegistry {
        self.inner
    }
}
