// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared test transceiver.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use rfxmqtt_lib::transceiver::{DisconnectListener, ProtocolListener, StatusListener};
use rfxmqtt_lib::{RawEvent, Transceiver, TransceiverError, TransceiverStatus, Transmission};

/// Transceiver double recording every transmission.
///
/// Cloning shares the recorded state, so a test can keep a clone after
/// moving one into a bridge.
#[derive(Clone, Default)]
pub struct MockTransceiver {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    sent: Mutex<Vec<Transmission>>,
    enabled: Mutex<Vec<String>>,
    listeners: Mutex<HashMap<String, Vec<ProtocolListener>>>,
    status_listeners: Mutex<Vec<StatusListener>>,
    disconnect_listeners: Mutex<Vec<DisconnectListener>>,
    unreachable: AtomicBool,
    closed: AtomicBool,
}

impl MockTransceiver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `initialise` and `status` fail.
    pub fn unreachable() -> Self {
        let mock = Self::default();
        mock.inner.unreachable.store(true, Ordering::SeqCst);
        mock
    }

    pub fn sent(&self) -> Vec<Transmission> {
        self.inner.sent.lock().clone()
    }

    pub fn enabled(&self) -> Vec<String> {
        self.inner.enabled.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn receive(&self, protocol: &str, event: RawEvent) {
        let listeners = self.inner.listeners.lock().get(protocol).cloned().unwrap_or_default();
        for listener in listeners {
            listener(event.clone());
        }
    }

    pub fn report_status(&self, status: TransceiverStatus) {
        let listeners = self.inner.status_listeners.lock().clone();
        for listener in listeners {
            listener(status.clone());
        }
    }

    pub fn disconnect(&self) {
        let listeners = self.inner.disconnect_listeners.lock().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl Transceiver for MockTransceiver {
    async fn initialise(&self) -> Result<(), TransceiverError> {
        if self.inner.unreachable.load(Ordering::SeqCst) {
            return Err(TransceiverError::InitialisationFailed("no such device".to_string()));
        }
        Ok(())
    }

    fn enable_protocols(&self, protocols: &[String]) -> Result<(), TransceiverError> {
        self.inner.enabled.lock().extend_from_slice(protocols);
        Ok(())
    }

    fn on_protocol(&self, protocol: &str, listener: ProtocolListener) {
        self.inner
            .listeners
            .lock()
            .entry(protocol.to_string())
            .or_default()
            .push(listener);
    }

    fn on_status(&self, listener: StatusListener) {
        self.inner.status_listeners.lock().push(listener);
    }

    fn on_disconnect(&self, listener: DisconnectListener) {
        self.inner.disconnect_listeners.lock().push(listener);
    }

    fn transmit(&self, transmission: &Transmission) -> Result<(), TransceiverError> {
        self.inner.sent.lock().push(transmission.clone());
        Ok(())
    }

    fn status(&self) -> Result<TransceiverStatus, TransceiverError> {
        if self.inner.unreachable.load(Ordering::SeqCst) {
            return Err(TransceiverError::StatusUnavailable("no answer".to_string()));
        }
        Ok(TransceiverStatus::default())
    }

    fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
    }
}
