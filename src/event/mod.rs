// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound bridge events.
//!
//! Routed RF events, transceiver status reports and disconnects are published
//! as [`BridgeEvent`]s on an [`EventBus`]. The MQTT publisher is one
//! subscriber; applications may add their own.

mod bridge_event;
mod event_bus;

pub use bridge_event::BridgeEvent;
pub use event_bus::EventBus;
