// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `rfxmqtt_lib` - bridges an RFXCOM RF transceiver to MQTT.
//!
//! The library sits between a transceiver driver and a message broker. It
//! validates and resolves command requests into repeated low-level device
//! invocations, enriches received RF events with a resolved device identity,
//! and keeps an in-memory registry of every device heard during a session.
//!
//! # Components
//!
//! - [`CapabilityRegistry`]: which device classes the driver supports, and
//!   which functions each class exposes
//! - [`DeviceConfigResolver`](config::DeviceConfigResolver): per-device
//!   overrides from configuration (id, type, subtype, options, repetitions)
//! - [`CommandDispatcher`]: turns a command request into transmissions
//! - [`ProtocolEventRouter`](protocol::ProtocolEventRouter): subscribes to
//!   RF protocol classes and enriches their events
//! - [`DeviceRegistry`](state::DeviceRegistry): per-device entities, sensors
//!   and switches, and the topics they are addressed on
//! - [`Bridge`]: the session tying the above to one [`Transceiver`]
//! - [`mqtt::MqttPublisher`] (feature `mqtt`): relays a bridge to a broker
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use rfxmqtt_lib::mqtt::MqttPublisher;
//! use rfxmqtt_lib::{Bridge, Settings, Transceiver};
//!
//! async fn run<T: Transceiver>(transceiver: T) -> rfxmqtt_lib::Result<()> {
//!     let settings = Settings::from_json_str(r#"{
//!         "mqtt": {"server": "mqtt://localhost:1883"},
//!         "rfxcom": {
//!             "usbport": "/dev/ttyUSB0",
//!             "receive": ["lighting2"],
//!             "devices": [{"friendlyName": "lamp1", "id": "0x01", "subtype": 1, "repetitions": 3}]
//!         }
//!     }"#)?;
//!
//!     let bridge = Arc::new(Bridge::new(transceiver, settings.rfxcom));
//!     let _publisher = MqttPublisher::connect(&settings.mqtt, Arc::clone(&bridge)).await?;
//!     bridge.start().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Dispatching Commands Directly
//!
//! ```no_run
//! use rfxmqtt_lib::{Bridge, CommandPayload, DispatchOutcome, Transceiver};
//!
//! fn switch_on<T: Transceiver>(bridge: &Bridge<T>) -> rfxmqtt_lib::Result<()> {
//!     let payload = CommandPayload::new("switchOn").with_subtype(0);
//!     match bridge.dispatch("Lighting2", "0x0102ABCD/1", &payload)? {
//!         DispatchOutcome::Sent { repetitions, .. } => println!("sent {repetitions} time(s)"),
//!         DispatchOutcome::Rejected(reason) => println!("rejected: {reason}"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `mqtt` (default): the [`mqtt::MqttPublisher`] broker connection, built
//!   on `rumqttc`. Topic helpers are available without it.

mod bridge;
mod capabilities;
pub mod command;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod mqtt;
pub mod protocol;
pub mod state;
pub mod transceiver;
pub mod types;

pub use bridge::{Bridge, BridgeInfo, BridgeStatus, DeviceBridge};
pub use capabilities::{CapabilityRegistry, CapabilityRegistryBuilder};
pub use command::{CommandDispatcher, CommandPayload, DispatchOutcome, Rejection};
pub use config::{BridgeConfig, DeviceConfigOverride, MqttConfig, Settings};
pub use device::{DeviceKind, Transmission};
pub use error::{
    ConfigError, Error, ParseError, ProtocolError, Result, StateError, TransceiverError,
};
pub use event::BridgeEvent;
pub use transceiver::{RawEvent, Transceiver, TransceiverStatus};
pub use types::Subtype;
