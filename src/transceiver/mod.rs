// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interface to the RFXCOM transceiver driver.
//!
//! The driver itself (serial port handling, the RFXtrx wire protocol, RF
//! decoding) lives outside this crate. The bridge only needs the driver to:
//!
//! - initialise once at startup,
//! - describe which device classes and functions it supports,
//! - accept [`Transmission`]s built by a [`DeviceHandle`](crate::device::DeviceHandle),
//! - emit decoded events per protocol class, status reports and disconnects.
//!
//! ```text
//! serial port → driver → on_protocol("lighting2", RawEvent)
//!                              ↓
//!                   ProtocolEventRouter::enrich()
//!                              ↓
//!                  DeviceRegistry + EventBus (→ MQTT)
//! ```

mod event;
#[cfg(test)]
pub(crate) mod testing;

pub use event::{RawEvent, TransceiverStatus};

use std::sync::Arc;

use crate::capabilities::CapabilityRegistry;
use crate::device::Transmission;
use crate::error::TransceiverError;

/// Listener for decoded events of one protocol class.
pub type ProtocolListener = Arc<dyn Fn(RawEvent) + Send + Sync>;

/// Listener for transceiver status reports.
pub type StatusListener = Arc<dyn Fn(TransceiverStatus) + Send + Sync>;

/// Listener for transceiver disconnects.
pub type DisconnectListener = Arc<dyn Fn() + Send + Sync>;

/// A connected RFXCOM transceiver.
///
/// Implementations wrap the serial driver. All methods except
/// [`initialise`](Self::initialise) are synchronous: transmissions are
/// fire-and-forget with no acknowledgement.
#[allow(async_fn_in_trait)]
pub trait Transceiver: Send + Sync + 'static {
    /// Opens the serial port and resets the transceiver.
    ///
    /// # Errors
    ///
    /// Returns [`TransceiverError::InitialisationFailed`] if the device
    /// cannot be reached. The bridge does not retry.
    async fn initialise(&self) -> Result<(), TransceiverError>;

    /// Describes the device classes and functions this driver supports.
    ///
    /// Called once when the bridge is created. The default is the full
    /// RFXCOM transmitter catalogue.
    fn capabilities(&self) -> CapabilityRegistry {
        CapabilityRegistry::rfxcom()
    }

    /// Enables reception of the given protocol classes.
    ///
    /// # Errors
    ///
    /// Returns an error if the transceiver rejects the protocol mask.
    fn enable_protocols(&self, protocols: &[String]) -> Result<(), TransceiverError>;

    /// Registers a listener for decoded events of one protocol class.
    fn on_protocol(&self, protocol: &str, listener: ProtocolListener);

    /// Registers a listener for status reports.
    fn on_status(&self, listener: StatusListener);

    /// Registers a listener for disconnects.
    fn on_disconnect(&self, listener: DisconnectListener);

    /// Sends one transmission.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver refuses the transmission.
    fn transmit(&self, transmission: &Transmission) -> Result<(), TransceiverError>;

    /// Queries the transceiver status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transceiver does not answer.
    fn status(&self) -> Result<TransceiverStatus, TransceiverError>;

    /// Closes the serial port.
    fn close(&self);
}
