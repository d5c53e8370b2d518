// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transmitter device classes and handles.
//!
//! Command requests name their device class as a string (`"Lighting2"`).
//! That string is resolved to a [`DeviceKind`] once, and a [`DeviceHandle`]
//! is created from the kind, subtype and options. The handle turns function
//! calls into [`Transmission`]s for the driver.
//!
//! ```text
//! ("Lighting2", subtype 0, "switchOn", "0x0102ABCD/1")
//!                     ↓
//!     DeviceKind::Lighting2 → DeviceHandle::create()
//!                     ↓
//!     handle.invoke("switchOn", "0x0102ABCD/1", None)
//!                     ↓
//!         Transceiver::transmit(&Transmission)
//! ```

mod handle;
mod kind;

pub use handle::{DeviceHandle, Transmission};
pub use kind::{DeviceKind, UnknownDeviceKind};
