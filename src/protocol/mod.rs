// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound RF protocol handling.
//!
//! The transceiver decodes radio packets into [`RawEvent`](crate::transceiver::RawEvent)s
//! per protocol class. The [`ProtocolEventRouter`] subscribes to the classes
//! selected in configuration, resolves each event's physical device
//! identifier and subtype name through the [`PacketCatalogue`], and hands the
//! resulting [`EnrichedEvent`] on together with any configured override for
//! that device.

mod catalogue;
mod event;
mod router;

pub use catalogue::{PacketCatalogue, PacketType, SUBTYPE_NOT_FOUND};
pub use event::{EnrichedEvent, is_group_command};
pub use router::ProtocolEventRouter;
