// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dispatch of command requests to the transceiver.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::capabilities::CapabilityRegistry;
use crate::config::{CommandTarget, DeviceConfigResolver};
use crate::device::{DeviceHandle, DeviceKind};
use crate::error::{ConfigError, Result};
use crate::transceiver::Transceiver;
use crate::types::Subtype;

use super::CommandPayload;

/// Why a command request was dropped without transmitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The requested device class is not supported by the driver.
    UnknownDeviceType(String),
    /// The requested function is not an operation of the device class.
    UnknownFunction {
        /// The requested device class.
        device_type: String,
        /// The requested function.
        function: String,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDeviceType(device_type) => {
                write!(f, "{device_type} is not a valid device")
            }
            Self::UnknownFunction {
                device_type,
                function,
            } => write!(f, "{function} is not a valid device function on {device_type}"),
        }
    }
}

/// Result of a command request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command was transmitted.
    Sent {
        /// Device class that was instantiated.
        kind: DeviceKind,
        /// Identifier passed to the device function.
        entity: String,
        /// Number of transmissions made.
        repetitions: u32,
    },
    /// The request was dropped; nothing was transmitted.
    Rejected(Rejection),
}

impl DispatchOutcome {
    /// Returns `true` if the command was transmitted.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// Returns the rejection reason, if the request was dropped.
    #[must_use]
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            Self::Sent { .. } => None,
        }
    }
}

/// Turns abstract command requests into repeated device invocations.
///
/// # Examples
///
/// ```ignore
/// let dispatcher = CommandDispatcher::new(capabilities, resolver);
/// let outcome = dispatcher.dispatch(
///     &transceiver,
///     "Lighting2",
///     "lamp1",
///     &CommandPayload::new("switchOn").with_subtype(0),
/// )?;
/// assert!(outcome.is_sent());
/// ```
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    capabilities: Arc<CapabilityRegistry>,
    resolver: Arc<DeviceConfigResolver>,
}

impl CommandDispatcher {
    /// Creates a dispatcher.
    #[must_use]
    pub fn new(capabilities: Arc<CapabilityRegistry>, resolver: Arc<DeviceConfigResolver>) -> Self {
        Self {
            capabilities,
            resolver,
        }
    }

    /// Dispatches a command request for `entity_name` on `device_type`.
    ///
    /// Unknown device types and functions are logged and reported as
    /// [`DispatchOutcome::Rejected`]. Otherwise the configuration override for
    /// `entity_name` is applied and the function is invoked as many times as
    /// the override's repetition count (once by default).
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDeviceType`] if the override names an unknown
    ///   device class.
    /// - [`ConfigError::MissingSubtype`] if neither the payload nor the
    ///   override supplies a subtype.
    /// - [`TransceiverError`](crate::error::TransceiverError) from the first
    ///   transmission the driver refuses; later repetitions are not attempted.
    pub fn dispatch<T: Transceiver>(
        &self,
        transceiver: &T,
        device_type: &str,
        entity_name: &str,
        payload: &CommandPayload,
    ) -> Result<DispatchOutcome> {
        let kind = match self.check(device_type, &payload.device_function) {
            Ok(kind) => kind,
            Err(rejection) => return Ok(DispatchOutcome::Rejected(rejection)),
        };

        let target = self.resolver.apply(
            CommandTarget::new(kind, entity_name)
                .with_subtype(payload.subtype.clone())
                .with_options(payload.device_options.clone()),
        )?;

        self.transmit(
            transceiver,
            target,
            &payload.device_function,
            payload.value.as_ref(),
        )
    }

    /// Sends a single command without applying configuration overrides.
    ///
    /// Used for commands addressed by topic, where the device class, subtype
    /// and identifier are already known.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if the transmission is refused.
    pub fn send_command<T: Transceiver>(
        &self,
        transceiver: &T,
        device_type: &str,
        subtype: Subtype,
        function: &str,
        entity_name: &str,
    ) -> Result<DispatchOutcome> {
        let kind = match self.check(device_type, function) {
            Ok(kind) => kind,
            Err(rejection) => return Ok(DispatchOutcome::Rejected(rejection)),
        };

        let target = CommandTarget::new(kind, entity_name).with_subtype(Some(subtype));
        self.transmit(transceiver, target, function, None)
    }

    fn check(&self, device_type: &str, function: &str) -> std::result::Result<DeviceKind, Rejection> {
        let Some(kind) = self.capabilities.device_kind(device_type) else {
            let rejection = Rejection::UnknownDeviceType(device_type.to_string());
            tracing::warn!(device_type = %device_type, "{rejection}");
            return Err(rejection);
        };

        if !self
            .capabilities
            .is_valid_device_function(device_type, function)
        {
            let rejection = Rejection::UnknownFunction {
                device_type: device_type.to_string(),
                function: function.to_string(),
            };
            tracing::warn!(device_type = %device_type, function = %function, "{rejection}");
            return Err(rejection);
        }

        Ok(kind)
    }

    fn transmit<T: Transceiver>(
        &self,
        transceiver: &T,
        target: CommandTarget,
        function: &str,
        value: Option<&Value>,
    ) -> Result<DispatchOutcome> {
        let CommandTarget {
            kind,
            entity,
            subtype,
            options,
            repetitions,
        } = target;

        let subtype = subtype.ok_or_else(|| ConfigError::MissingSubtype {
            entity: entity.clone(),
        })?;

        let handle = DeviceHandle::create(transceiver, kind, subtype, options);

        for attempt in 1..=repetitions {
            handle.invoke(function, &entity, value)?;
            tracing::debug!(
                device_type = %kind,
                entity = %entity,
                function = %function,
                value = ?value,
                attempt,
                repetitions,
                "Transmitted command"
            );
        }

        Ok(DispatchOutcome::Sent {
            kind,
            entity,
            repetitions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeviceConfigOverride;
    use crate::error::{Error, TransceiverError};
    use crate::transceiver::testing::RecordingTransceiver;
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn dispatcher(devices: Vec<DeviceConfigOverride>) -> CommandDispatcher {
        let capabilities = Arc::new(CapabilityRegistry::rfxcom());
        let resolver = Arc::new(DeviceConfigResolver::new(devices, Arc::clone(&capabilities)));
        CommandDispatcher::new(capabilities, resolver)
    }

    #[test]
    fn known_type_and_function_transmits_once() {
        let transceiver = RecordingTransceiver::new();
        let outcome = dispatcher(Vec::new())
            .dispatch(
                &transceiver,
                "Lighting2",
                "0x0102ABCD/1",
                &CommandPayload::new("switchOn").with_subtype(0),
            )
            .unwrap();

        assert_eq!(
            outcome,
            DispatchOutcome::Sent {
                kind: DeviceKind::Lighting2,
                entity: "0x0102ABCD/1".to_string(),
                repetitions: 1,
            }
        );

        let sent = transceiver.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, DeviceKind::Lighting2);
        assert_eq!(sent[0].function, "switchOn");
        assert_eq!(sent[0].device_id, "0x0102ABCD/1");
        assert_eq!(sent[0].subtype, Subtype::from(0));
        assert_eq!(sent[0].value, None);
    }

    #[test]
    fn unknown_type_is_soft_rejected() {
        let transceiver = RecordingTransceiver::new();
        let outcome = dispatcher(Vec::new())
            .dispatch(
                &transceiver,
                "Toaster",
                "lamp",
                &CommandPayload::new("switchOn").with_subtype(0),
            )
            .unwrap();

        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::UnknownDeviceType("Toaster".to_string()))
        );
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn unknown_function_is_soft_rejected() {
        let transceiver = RecordingTransceiver::new();
        let outcome = dispatcher(Vec::new())
            .dispatch(
                &transceiver,
                "Lighting2",
                "lamp",
                &CommandPayload::new("open").with_subtype(0),
            )
            .unwrap();

        assert!(matches!(
            outcome,
            DispatchOutcome::Rejected(Rejection::UnknownFunction { .. })
        ));
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn rejection_is_checked_before_subtype() {
        let transceiver = RecordingTransceiver::new();
        let outcome = dispatcher(Vec::new())
            .dispatch(&transceiver, "Toaster", "lamp", &CommandPayload::new("switchOn"))
            .unwrap();
        assert!(!outcome.is_sent());
    }

    #[test]
    fn missing_subtype_is_fatal() {
        let transceiver = RecordingTransceiver::new();
        let err = dispatcher(Vec::new())
            .dispatch(&transceiver, "Lighting2", "lamp", &CommandPayload::new("switchOn"))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingSubtype { .. })
        ));
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn override_supplies_id_subtype_and_repetitions() {
        let transceiver = RecordingTransceiver::new();
        let outcome = dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("lamp1")
                .with_id("0x01")
                .with_subtype(1)
                .with_repetitions(3),
        ])
        .dispatch(
            &transceiver,
            "Lighting2",
            "lamp1",
            &CommandPayload::new("switchOn"),
        )
        .unwrap();

        assert!(outcome.is_sent());
        let sent = transceiver.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|t| t.device_id == "0x01"));
        assert!(sent.iter().all(|t| t.subtype == Subtype::from(1)));
    }

    #[test]
    fn every_known_function_transmits_configured_repetitions() {
        const REPETITIONS: u32 = 3;
        let dispatcher = dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("target")
                .with_subtype(0)
                .with_repetitions(REPETITIONS),
        ]);

        for kind in DeviceKind::ALL {
            for function in kind.functions() {
                let transceiver = RecordingTransceiver::new();
                let outcome = dispatcher
                    .dispatch(
                        &transceiver,
                        kind.class_name(),
                        "target",
                        &CommandPayload::new(*function),
                    )
                    .unwrap();

                assert_eq!(
                    outcome,
                    DispatchOutcome::Sent {
                        kind,
                        entity: "target".to_string(),
                        repetitions: REPETITIONS,
                    },
                    "{kind}.{function}"
                );
                let sent = transceiver.sent();
                assert_eq!(sent.len(), REPETITIONS as usize, "{kind}.{function}");
                assert!(sent.iter().all(|t| t.kind == kind && t.function == *function));
            }
        }
    }

    #[test]
    fn override_subtype_wins_over_payload() {
        let transceiver = RecordingTransceiver::new();
        dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("lamp")
                .with_subtype(5),
        ])
        .dispatch(
            &transceiver,
            "Lighting1",
            "lamp",
            &CommandPayload::new("switchOff").with_subtype(2),
        )
        .unwrap();

        assert_eq!(transceiver.sent()[0].subtype, Subtype::from(5));
    }

    #[test]
    fn override_type_replaces_request_type() {
        let transceiver = RecordingTransceiver::new();
        dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("porch")
                .with_type("Lighting1"),
        ])
        .dispatch(
            &transceiver,
            "Lighting2",
            "porch",
            &CommandPayload::new("switchOn").with_subtype(0),
        )
        .unwrap();

        assert_eq!(transceiver.sent()[0].kind, DeviceKind::Lighting1);
    }

    #[test]
    fn invalid_override_type_is_fatal() {
        let transceiver = RecordingTransceiver::new();
        let err = dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("porch")
                .with_type("Lighting7"),
        ])
        .dispatch(
            &transceiver,
            "Lighting2",
            "porch",
            &CommandPayload::new("switchOn").with_subtype(0),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidDeviceType { .. })
        ));
        assert!(transceiver.sent().is_empty());
    }

    #[test]
    fn value_and_options_are_passed_through() {
        let transceiver = RecordingTransceiver::new();
        dispatcher(Vec::new())
            .dispatch(
                &transceiver,
                "Lighting5",
                "0xF09AC8/1",
                &CommandPayload::new("setLevel")
                    .with_subtype(0)
                    .with_value(7)
                    .with_device_options(json!({"colour": "red"})),
            )
            .unwrap();

        let sent = transceiver.sent();
        assert_eq!(sent[0].value, Some(json!(7)));
        assert_eq!(sent[0].options, Some(json!({"colour": "red"})));
    }

    #[test]
    fn transmit_failure_stops_repetition() {
        let transceiver = RecordingTransceiver::new();
        transceiver.fail_on.store(2, Ordering::SeqCst);

        let err = dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("lamp")
                .with_subtype(0)
                .with_repetitions(4),
        ])
        .dispatch(&transceiver, "Lighting2", "lamp", &CommandPayload::new("switchOn"))
        .unwrap_err();

        assert!(matches!(
            err,
            Error::Transceiver(TransceiverError::TransmitFailed(_))
        ));
        assert_eq!(transceiver.sent().len(), 1);
    }

    #[test]
    fn send_command_ignores_overrides() {
        let transceiver = RecordingTransceiver::new();
        let outcome = dispatcher(vec![
            DeviceConfigOverride::new()
                .with_friendly_name("0x01")
                .with_repetitions(5),
        ])
        .send_command(&transceiver, "Lighting2", Subtype::from(0), "switchOff", "0x01")
        .unwrap();

        assert!(outcome.is_sent());
        assert_eq!(transceiver.sent().len(), 1);
    }

    #[test]
    fn rejection_display() {
        let rejection = Rejection::UnknownFunction {
            device_type: "Lighting2".to_string(),
            function: "open".to_string(),
        };
        assert_eq!(
            rejection.to_string(),
            "open is not a valid device function on Lighting2"
        );
    }
}
