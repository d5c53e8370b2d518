// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The bridge session.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::capabilities::CapabilityRegistry;
use crate::command::{CommandDispatcher, CommandPayload, DispatchOutcome};
use crate::config::{BridgeConfig, DeviceConfigOverride, DeviceConfigResolver};
use crate::device::DeviceKind;
use crate::error::{ConfigError, Result};
use crate::event::{BridgeEvent, EventBus};
use crate::protocol::{PacketCatalogue, ProtocolEventRouter};
use crate::state::{DeviceIdentity, DeviceRegistry, DeviceState, VIA_DEVICE};
use crate::transceiver::{Transceiver, TransceiverStatus};
use crate::types::Subtype;

/// Result of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeStatus {
    Online,
    Offline,
}

impl fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Online => f.write_str("online"),
            Self::Offline => f.write_str("offline"),
        }
    }
}

/// Bridge metadata published alongside device states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeInfo {
    /// Last status reported by the transceiver.
    pub coordinator: TransceiverStatus,
    /// Library version.
    pub version: String,
    /// Log level the host application runs at.
    pub log_level: String,
}

/// The bridge itself, as a device other RF devices are relayed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBridge {
    pub model: String,
    pub name: String,
    pub manufacturer: String,
    pub identifiers: Vec<String>,
    pub hw_version: String,
    pub sw_version: String,
}

impl DeviceBridge {
    /// Describes the bridge running on the given transceiver.
    #[must_use]
    pub fn new(coordinator: &TransceiverStatus) -> Self {
        Self {
            model: "Bridge".to_string(),
            name: "Rfxcom2Mqtt Bridge".to_string(),
            manufacturer: "Rfxcom2Mqtt".to_string(),
            identifiers: vec![VIA_DEVICE.to_string()],
            hw_version: coordinator.hardware_version.clone(),
            sw_version: coordinator.firmware_version.to_string(),
        }
    }
}

/// A session between one transceiver and the messaging layer.
///
/// Owns the driver, the device registry and the event bus for as long as the
/// session runs. Created from configuration, then [`start`](Self::start)ed
/// once; routed RF events, status reports and disconnects are published on
/// the event bus and commands enter through [`dispatch`](Self::dispatch).
///
/// # Examples
///
/// ```no_run
/// use rfxmqtt_lib::{Bridge, BridgeConfig, CommandPayload, Transceiver};
///
/// async fn run<T: Transceiver>(transceiver: T) -> rfxmqtt_lib::Result<()> {
///     let config = BridgeConfig::new("/dev/ttyUSB0").with_receive("lighting2");
///     let bridge = Bridge::new(transceiver, config);
///     bridge.start().await?;
///
///     let mut events = bridge.subscribe();
///     bridge.dispatch(
///         "Lighting2",
///         "0x0102ABCD/1",
///         &CommandPayload::new("switchOn").with_subtype(0),
///     )?;
///
///     while let Ok(event) = events.recv().await {
///         println!("{event:?}");
///     }
///     Ok(())
/// }
/// ```
pub struct Bridge<T: Transceiver> {
    transceiver: Arc<T>,
    config: BridgeConfig,
    capabilities: Arc<CapabilityRegistry>,
    dispatcher: CommandDispatcher,
    router: ProtocolEventRouter,
    registry: Arc<DeviceRegistry>,
    events: EventBus,
    coordinator: Arc<RwLock<Option<TransceiverStatus>>>,
    log_level: String,
    started: AtomicBool,
}

impl<T: Transceiver> Bridge<T> {
    /// Creates a bridge session.
    ///
    /// Devices configured with an id, a type and a subtype are registered
    /// straight away; all others are registered when first heard.
    #[must_use]
    pub fn new(transceiver: T, config: BridgeConfig) -> Self {
        let capabilities = Arc::new(transceiver.capabilities());
        let resolver = Arc::new(DeviceConfigResolver::new(
            config.devices.clone(),
            Arc::clone(&capabilities),
        ));

        let bridge = Self {
            transceiver: Arc::new(transceiver),
            dispatcher: CommandDispatcher::new(Arc::clone(&capabilities), Arc::clone(&resolver)),
            router: ProtocolEventRouter::new(resolver),
            capabilities,
            config,
            registry: Arc::new(DeviceRegistry::new()),
            events: EventBus::new(),
            coordinator: Arc::new(RwLock::new(None)),
            log_level: "info".to_string(),
            started: AtomicBool::new(false),
        };

        for device in &bridge.config.devices {
            bridge.seed(device);
        }
        bridge
    }

    /// Sets the log level reported in [`BridgeInfo`].
    #[must_use]
    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    /// Replaces the packet catalogue used to enrich events.
    #[must_use]
    pub fn with_catalogue(mut self, catalogue: PacketCatalogue) -> Self {
        self.router = self.router.with_catalogue(catalogue);
        self
    }

    fn seed(&self, device: &DeviceConfigOverride) {
        let (Some(id), Some(device_type), Some(subtype)) =
            (&device.id, &device.device_type, &device.subtype)
        else {
            return;
        };

        let Some(kind) = self.capabilities.device_kind(device_type) else {
            tracing::warn!(device_id = %id, device_type = %device_type, "Configured device has an unknown type, not registered");
            return;
        };
        let Some(code) = subtype.as_byte() else {
            tracing::warn!(device_id = %id, subtype = %subtype, "Configured device has an invalid subtype, not registered");
            return;
        };

        let name = device.display_name().unwrap_or(id);
        let sub_type_value = self.router.catalogue().sub_type_name(kind.packet_type(), subtype);
        let state = DeviceState::new(DeviceIdentity::for_device(id, name), id.clone(), kind.packet_type(), code)
            .with_sub_type_value(sub_type_value);

        self.registry.register(state);
        self.registry.with_store(id, |store| store.add_entity(name));
    }

    /// Initialises the transceiver and starts listening.
    ///
    /// Enables reception of the configured protocols, then registers the
    /// status, disconnect and protocol listeners. The bridge only counts as
    /// started once all of this succeeded, so a failed `start` can be
    /// retried. Calling `start` again after a success is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TransceiverError::InitialisationFailed`](crate::error::TransceiverError::InitialisationFailed)
    /// if the transceiver cannot be reached, or the driver's error if it
    /// rejects the protocol list. Neither is retried.
    pub async fn start(&self) -> Result<()> {
        if self.started.load(Ordering::SeqCst) {
            tracing::warn!("Bridge already started");
            return Ok(());
        }

        tracing::info!(usbport = %self.config.usbport, "Connecting to RFXCOM");
        if let Err(e) = self.transceiver.initialise().await {
            tracing::error!(error = %e, "Unable to initialise the RFXCOM device");
            return Err(e.into());
        }
        tracing::info!("RFXCOM device initialised");

        if !self.config.receive.is_empty() {
            if let Err(e) = self.transceiver.enable_protocols(&self.config.receive) {
                tracing::error!(error = %e, protocols = ?self.config.receive, "Unable to enable RFXCOM protocols");
                return Err(e.into());
            }
            tracing::info!(protocols = ?self.config.receive, "RFXCOM protocols enabled");
        }

        let coordinator = Arc::clone(&self.coordinator);
        let events = self.events.clone();
        self.transceiver.on_status(Arc::new(move |status: TransceiverStatus| {
            tracing::info!(
                receiver_type = %status.receiver_type,
                firmware_version = status.firmware_version,
                "RFXCOM status"
            );
            *coordinator.write() = Some(status.clone());
            events.publish(BridgeEvent::Status(status));
        }));

        let events = self.events.clone();
        self.transceiver.on_disconnect(Arc::new(move || {
            tracing::info!("RFXCOM disconnected");
            events.publish(BridgeEvent::Disconnected);
        }));

        let registry = Arc::clone(&self.registry);
        let events = self.events.clone();
        self.router.start(
            self.transceiver.as_ref(),
            &self.config.receive,
            move |protocol, event, device| {
                let info = registry.observe(&event, device.as_ref());
                events.publish(BridgeEvent::Received {
                    protocol: protocol.to_string(),
                    event,
                    device,
                    info,
                });
            },
        );

        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Dispatches a command request. See [`CommandDispatcher::dispatch`].
    ///
    /// # Errors
    ///
    /// Same as [`CommandDispatcher::dispatch`].
    pub fn dispatch(
        &self,
        device_type: &str,
        entity_name: &str,
        payload: &CommandPayload,
    ) -> Result<DispatchOutcome> {
        self.dispatcher
            .dispatch(self.transceiver.as_ref(), device_type, entity_name, payload)
    }

    /// Sends `command` once to `entity_name`, addressed by packet type name
    /// (`"lighting2"`) and subtype constant name (`"AC"`) or number.
    ///
    /// Returns `Ok(None)` without transmitting when `command` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSubtype`] if `sub_type_value` names no
    /// subtype of `device_type`, or the driver's error.
    pub fn send_command(
        &self,
        device_type: &str,
        sub_type_value: &str,
        command: Option<&str>,
        entity_name: &str,
    ) -> Result<Option<DispatchOutcome>> {
        let Some(command) = command else {
            return Ok(None);
        };
        tracing::debug!(command = %command, device_type = %device_type, entity = %entity_name, "Sending command");

        let subtype = self
            .router
            .catalogue()
            .subtype_code(device_type, sub_type_value)
            .map(|code| Subtype::from(i64::from(code)))
            .or_else(|| {
                let subtype = Subtype::from(sub_type_value);
                subtype.code().map(|_| subtype)
            })
            .ok_or_else(|| ConfigError::MissingSubtype {
                entity: entity_name.to_string(),
            })?;

        let class_name =
            DeviceKind::from_packet_type(device_type).map_or(device_type, |kind| kind.class_name());

        self.dispatcher
            .send_command(self.transceiver.as_ref(), class_name, subtype, command, entity_name)
            .map(Some)
    }

    /// Queries the transceiver and reports whether it answers.
    ///
    /// A successful status query also refreshes the coordinator in
    /// [`BridgeInfo`].
    pub fn health_check(&self) -> BridgeStatus {
        match self.transceiver.status() {
            Ok(status) => {
                *self.coordinator.write() = Some(status);
                BridgeStatus::Online
            }
            Err(e) => {
                tracing::error!(error = %e, "Health check: RFXCOM status error");
                BridgeStatus::Offline
            }
        }
    }

    /// Returns the bridge metadata.
    #[must_use]
    pub fn bridge_info(&self) -> BridgeInfo {
        BridgeInfo {
            coordinator: self.coordinator.read().clone().unwrap_or_default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: self.log_level.clone(),
        }
    }

    /// Returns the bridge described as a device.
    #[must_use]
    pub fn device_bridge(&self) -> DeviceBridge {
        DeviceBridge::new(&self.coordinator.read().clone().unwrap_or_default())
    }

    /// Returns a receiver for bridge events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BridgeEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    #[must_use]
    pub fn transceiver(&self) -> &T {
        &self.transceiver
    }

    /// Closes the transceiver.
    pub fn stop(&self) {
        tracing::info!("Disconnecting from RFXCOM");
        self.transceiver.close();
    }
}

impl<T: Transceiver> fmt::Debug for Bridge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("usbport", &self.config.usbport)
            .field("receive", &self.config.receive)
            .field("devices", &self.registry.len())
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}
