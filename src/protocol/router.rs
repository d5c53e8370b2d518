// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of inbound protocol events.

use std::sync::Arc;

use crate::config::{DeviceConfigOverride, DeviceConfigResolver};
use crate::transceiver::{RawEvent, Transceiver};

use super::{EnrichedEvent, PacketCatalogue, SUBTYPE_NOT_FOUND};

/// Protocol class whose device identifier is carried in `data`.
const DATA_ADDRESSED_PROTOCOL: &str = "lighting4";

/// Subscribes to protocol events and forwards them enriched.
///
/// ```text
/// RawEvent (packet 0x11, subtype 1, id "0x0102ABCD")
///                     ↓
///        enrich("lighting2", &raw)
///                     ↓
/// EnrichedEvent { type: "lighting2", subTypeValue: "HOMEEASY_EU",
///                 deviceName: ["HomeEasy EU"], deviceId: "0x0102ABCD" }
///                     ↓
///   on_event("lighting2", event, override for "0x0102ABCD")
/// ```
#[derive(Debug, Clone)]
pub struct ProtocolEventRouter {
    catalogue: PacketCatalogue,
    resolver: Arc<DeviceConfigResolver>,
}

impl ProtocolEventRouter {
    /// Creates a router using the RFXCOM catalogue.
    #[must_use]
    pub fn new(resolver: Arc<DeviceConfigResolver>) -> Self {
        Self {
            catalogue: PacketCatalogue::rfxcom(),
            resolver,
        }
    }

    /// Replaces the packet catalogue.
    #[must_use]
    pub fn with_catalogue(mut self, catalogue: PacketCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Returns the packet catalogue.
    #[must_use]
    pub fn catalogue(&self) -> &PacketCatalogue {
        &self.catalogue
    }

    /// Registers a listener for each protocol in `protocols` that enriches
    /// every received event and passes it to `on_event` together with the
    /// matching device override.
    pub fn start<T, F>(&self, transceiver: &T, protocols: &[String], on_event: F)
    where
        T: Transceiver,
        F: Fn(&str, EnrichedEvent, Option<DeviceConfigOverride>) + Send + Sync + 'static,
    {
        let on_event = Arc::new(on_event);

        for protocol in protocols {
            tracing::info!(protocol = %protocol, "Listening for protocol events");

            let router = self.clone();
            let on_event = Arc::clone(&on_event);
            let name = protocol.clone();
            transceiver.on_protocol(
                protocol,
                Arc::new(move |raw: RawEvent| {
                    tracing::debug!(protocol = %name, "Received protocol event");
                    let event = router.enrich(&name, &raw);
                    let device = router.device_config(&event);
                    on_event(&name, event, device);
                }),
            );
        }
    }

    /// Resolves identity for a raw event received on `protocol`.
    ///
    /// The device identifier is the event's `id`, except for lighting4 where
    /// it is the event's `data`.
    #[must_use]
    pub fn enrich(&self, protocol: &str, raw: &RawEvent) -> EnrichedEvent {
        let device_id = if protocol == DATA_ADDRESSED_PROTOCOL {
            raw.data.clone()
        } else {
            raw.id.clone()
        }
        .unwrap_or_default();

        if device_id.is_empty() {
            tracing::debug!(protocol = %protocol, "Event carries no device identifier");
        }

        let sub_type_value = self.catalogue.sub_type_name(protocol, &raw.subtype);
        if sub_type_value == SUBTYPE_NOT_FOUND {
            tracing::warn!(
                protocol = %protocol,
                subtype = %raw.subtype,
                device_id = %device_id,
                "Subtype has no name for this protocol"
            );
        }
        let device_name = self
            .catalogue
            .device_names(raw.packet_type, &raw.subtype)
            .map(|names| names.iter().map(ToString::to_string).collect());

        EnrichedEvent {
            protocol: protocol.to_string(),
            subtype: raw.subtype.clone(),
            sub_type_value: sub_type_value.to_string(),
            device_name,
            device_id,
            id: raw.id.clone(),
            data: raw.data.clone(),
            command_number: raw.command_number,
            command: raw.command.clone(),
            unit_code: raw.unit_code,
            fields: raw.fields.clone(),
        }
    }

    /// Returns the override configured for the event's device, if any.
    #[must_use]
    pub fn device_config(&self, event: &EnrichedEvent) -> Option<DeviceConfigOverride> {
        self.resolver.find_by_device_id(&event.device_id).cloned()
    }
}
