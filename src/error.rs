// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `rfxmqtt` library.
//!
//! Soft rejections (an unknown device type or function in a command request)
//! are not errors: they are reported as
//! [`DispatchOutcome::Rejected`](crate::command::DispatchOutcome::Rejected).
//! Everything in this module is fatal for the operation that raised it and
//! must be handled by the caller.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Static configuration is invalid for the requested operation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The transceiver failed to initialise or transmit.
    #[error("transceiver error: {0}")]
    Transceiver(#[from] TransceiverError),

    /// A device state lookup failed.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Error occurred while parsing a payload or topic.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred in the messaging transport.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors raised by device configuration overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration override names a device type the driver does not know.
    #[error("{device_type} from config: not a valid device")]
    InvalidDeviceType {
        /// The configured device type.
        device_type: String,
    },

    /// Neither the command payload nor the override supplies a subtype.
    #[error("subtype not defined in payload or config for {entity}")]
    MissingSubtype {
        /// The entity the command was addressed to.
        entity: String,
    },

    /// A capability table entry is malformed.
    #[error("invalid device function: {0}")]
    InvalidFunction(String),

    /// The configuration document could not be deserialized.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by the transceiver driver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransceiverError {
    /// The transceiver could not be initialised.
    #[error("unable to initialise the RFXCOM device: {0}")]
    InitialisationFailed(String),

    /// A transmission was refused by the driver.
    #[error("transmission failed: {0}")]
    TransmitFailed(String),

    /// The transceiver did not answer a status request.
    #[error("status unavailable: {0}")]
    StatusUnavailable(String),

    /// The transceiver connection is closed.
    #[error("transceiver is closed")]
    Closed,
}

/// Errors related to per-device state lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// A topic was requested for a switch that was never registered.
    #[error("switch {entity_id} is not registered on device {device_id}")]
    SwitchNotRegistered {
        /// The physical device identifier.
        device_id: String,
        /// The requested switch entity.
        entity_id: String,
    },

    /// The device itself is not known to the registry.
    #[error("device {0} is not registered")]
    DeviceNotRegistered(String),
}

/// Errors related to parsing inbound messages.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A topic does not match the expected layout.
    #[error("invalid topic: {0}")]
    InvalidTopic(String),
}

/// Errors related to the MQTT transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Invalid broker URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
