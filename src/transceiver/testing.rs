// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transceiver for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::device::Transmission;
use crate::error::TransceiverError;

use super::{
    DisconnectListener, ProtocolListener, RawEvent, StatusListener, Transceiver, TransceiverStatus,
};

/// Records transmissions and lets tests emit driver events.
#[derive(Default)]
pub(crate) struct RecordingTransceiver {
    pub transmissions: Mutex<Vec<Transmission>>,
    pub enabled: Mutex<Vec<String>>,
    protocol_listeners: Mutex<HashMap<String, Vec<ProtocolListener>>>,
    status_listeners: Mutex<Vec<StatusListener>>,
    disconnect_listeners: Mutex<Vec<DisconnectListener>>,
    /// Fail the transmission with this (1-based) sequence number.
    pub fail_on: AtomicUsize,
    pub fail_init: AtomicBool,
    pub fail_enable: AtomicBool,
    pub offline: AtomicBool,
    pub closed: AtomicBool,
}

impl RecordingTransceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Transmission> {
        self.transmissions.lock().clone()
    }

    pub fn emit(&self, protocol: &str, event: RawEvent) {
        let listeners = self
            .protocol_listeners
            .lock()
            .get(protocol)
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn emit_status(&self, status: TransceiverStatus) {
        let listeners = self.status_listeners.lock().clone();
        for listener in listeners {
            listener(status.clone());
        }
    }

    pub fn emit_disconnect(&self) {
        let listeners = self.disconnect_listeners.lock().clone();
        for listener in listeners {
            listener();
        }
    }

    pub fn subscribed(&self, protocol: &str) -> bool {
        self.protocol_listeners.lock().contains_key(protocol)
    }
}

impl Transceiver for RecordingTransceiver {
    async fn initialise(&self) -> Result<(), TransceiverError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(TransceiverError::InitialisationFailed(
                "port not found".to_string(),
            ));
        }
        Ok(())
    }

    fn enable_protocols(&self, protocols: &[String]) -> Result<(), TransceiverError> {
        if self.fail_enable.load(Ordering::SeqCst) {
            return Err(TransceiverError::InitialisationFailed(
                "protocol list rejected".to_string(),
            ));
        }
        self.enabled.lock().extend(protocols.iter().cloned());
        Ok(())
    }

    fn on_protocol(&self, protocol: &str, listener: ProtocolListener) {
        self.protocol_listeners
            .lock()
            .entry(protocol.to_string())
            .or_default()
            .push(listener);
    }

    fn on_status(&self, listener: StatusListener) {
        self.status_listeners.lock().push(listener);
    }

    fn on_disconnect(&self, listener: DisconnectListener) {
        self.disconnect_listeners.lock().push(listener);
    }

    fn transmit(&self, transmission: &Transmission) -> Result<(), TransceiverError> {
        let mut sent = self.transmissions.lock();
        if self.fail_on.load(Ordering::SeqCst) == sent.len() + 1 {
            return Err(TransceiverError::TransmitFailed("buffer full".to_string()));
        }
        sent.push(transmission.clone());
        Ok(())
    }

    fn status(&self) -> Result<TransceiverStatus, TransceiverError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(TransceiverError::StatusUnavailable("timeout".to_string()));
        }
        Ok(TransceiverStatus {
            receiver_type: "433.92MHz transceiver".to_string(),
            ..TransceiverStatus::default()
        })
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
