// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command requests and their dispatch to the transceiver.
//!
//! A command request names a device class, an entity and a
//! [`CommandPayload`]. The [`CommandDispatcher`] validates the class and
//! function against the driver's capabilities, applies the configuration
//! override for the entity, and invokes the function on a fresh
//! [`DeviceHandle`](crate::device::DeviceHandle) as many times as configured.
//!
//! # Failure Policy
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Unknown device class | `Ok(Rejected(UnknownDeviceType))`, logged |
//! | Unknown function | `Ok(Rejected(UnknownFunction))`, logged |
//! | Override names unknown class | `Err(Config(InvalidDeviceType))` |
//! | No subtype anywhere | `Err(Config(MissingSubtype))` |
//! | Driver refuses a transmission | `Err(Transceiver(..))`, remaining repetitions skipped |
//!
//! Repetition is a deliberate multi-send for unacknowledged RF links, not a
//! retry: every transmission is attempted back to back with no delay.

mod dispatcher;
mod payload;

pub use dispatcher::{CommandDispatcher, DispatchOutcome, Rejection};
pub use payload::CommandPayload;
