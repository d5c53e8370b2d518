// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events the bridge emits toward the messaging layer.

use crate::config::DeviceConfigOverride;
use crate::protocol::EnrichedEvent;
use crate::state::DeviceInfo;
use crate::transceiver::TransceiverStatus;

/// Something the messaging layer should publish.
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// An RF event was received and routed.
    Received {
        /// Protocol class the event arrived on.
        protocol: String,
        /// The enriched event.
        event: EnrichedEvent,
        /// Override configured for the device, if any.
        device: Option<DeviceConfigOverride>,
        /// Metadata of the device as registered.
        info: DeviceInfo,
    },
    /// The transceiver reported its status.
    Status(TransceiverStatus),
    /// The transceiver connection was lost.
    Disconnected,
}

impl BridgeEvent {
    /// Returns the physical device id of a received event.
    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::Received { event, .. } => Some(&event.device_id),
            Self::Status(_) | Self::Disconnected => None,
        }
    }

    /// Returns the protocol class of a received event.
    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        match self {
            Self::Received { protocol, .. } => Some(protocol),
            Self::Status(_) | Self::Disconnected => None,
        }
    }
}
