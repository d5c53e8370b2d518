// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device classes exported by the transceiver driver.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// A transmitter device class known to the RFXCOM driver.
///
/// Each variant corresponds to one exported driver class (for example
/// `Lighting2`), which drives one RF protocol family. The class name is the
/// string used in command requests and configuration overrides; the packet
/// type name is the lower-case name the driver uses for emitted events and
/// subtype tables.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::device::DeviceKind;
///
/// let kind: DeviceKind = "Lighting2".parse().unwrap();
/// assert_eq!(kind, DeviceKind::Lighting2);
/// assert_eq!(kind.packet_type(), "lighting2");
/// assert!(kind.functions().contains(&"switchOn"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceKind {
    /// X10, ARC, ELRO and other simple on/off lighting remotes.
    Lighting1,
    /// AC, `HomeEasy` EU, Anslut and Kambrook dimmers and switches.
    Lighting2,
    /// Ikea Koppla.
    Lighting3,
    /// PT2262 based devices addressed by raw data.
    Lighting4,
    /// `LightwaveRF` and friends.
    Lighting5,
    /// Blyss and Cuveo.
    Lighting6,
    /// Doorbell chimes.
    Chime1,
    /// Ceiling and ventilation fans.
    Fan,
    /// Blinds, protocol family 1.
    Blinds1,
    /// Blinds, protocol family 2.
    Blinds2,
    /// Harrison curtains.
    Curtain1,
    /// Somfy RTS.
    Rfy,
    /// `HomeConfort` TEL-010.
    HomeConfort,
    /// X10 security and KD101 smoke detectors.
    Security1,
    /// Mertik fireplaces.
    Thermostat3,
    /// Hunter ceiling fans.
    HunterFan,
    /// Gira/Insta Funkbus.
    Funkbus,
}

impl DeviceKind {
    /// Every device class known to this crate.
    pub const ALL: [Self; 17] = [
        Self::Lighting1,
        Self::Lighting2,
        Self::Lighting3,
        Self::Lighting4,
        Self::Lighting5,
        Self::Lighting6,
        Self::Chime1,
        Self::Fan,
        Self::Blinds1,
        Self::Blinds2,
        Self::Curtain1,
        Self::Rfy,
        Self::HomeConfort,
        Self::Security1,
        Self::Thermostat3,
        Self::HunterFan,
        Self::Funkbus,
    ];

    /// Returns the exported driver class name, e.g. `"Lighting2"`.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Lighting1 => "Lighting1",
            Self::Lighting2 => "Lighting2",
            Self::Lighting3 => "Lighting3",
            Self::Lighting4 => "Lighting4",
            Self::Lighting5 => "Lighting5",
            Self::Lighting6 => "Lighting6",
            Self::Chime1 => "Chime1",
            Self::Fan => "Fan",
            Self::Blinds1 => "Blinds1",
            Self::Blinds2 => "Blinds2",
            Self::Curtain1 => "Curtain1",
            Self::Rfy => "Rfy",
            Self::HomeConfort => "HomeConfort",
            Self::Security1 => "Security1",
            Self::Thermostat3 => "Thermostat3",
            Self::HunterFan => "HunterFan",
            Self::Funkbus => "Funkbus",
        }
    }

    /// Returns the packet type name used for events and subtype tables,
    /// e.g. `"lighting2"`.
    #[must_use]
    pub const fn packet_type(self) -> &'static str {
        match self {
            Self::Lighting1 => "lighting1",
            Self::Lighting2 => "lighting2",
            Self::Lighting3 => "lighting3",
            Self::Lighting4 => "lighting4",
            Self::Lighting5 => "lighting5",
            Self::Lighting6 => "lighting6",
            Self::Chime1 => "chime1",
            Self::Fan => "fan",
            Self::Blinds1 => "blinds1",
            Self::Blinds2 => "blinds2",
            Self::Curtain1 => "curtain1",
            Self::Rfy => "rfy",
            Self::HomeConfort => "homeConfort",
            Self::Security1 => "security1",
            Self::Thermostat3 => "thermostat3",
            Self::HunterFan => "hunterFan",
            Self::Funkbus => "funkbus",
        }
    }

    /// Returns the instance-level operations the driver class exposes.
    #[must_use]
    pub const fn functions(self) -> &'static [&'static str] {
        match self {
            Self::Lighting1 => &["switchOn", "switchOff", "chime"],
            Self::Lighting2 => &["switchOn", "switchOff", "setLevel"],
            Self::Lighting3 => &["switchOn", "switchOff", "setLevel", "program"],
            Self::Lighting4 => &["sendData"],
            Self::Lighting5 => &[
                "switchOn",
                "switchOff",
                "setLevel",
                "setMood",
                "increaseLevel",
                "decreaseLevel",
                "toggleOnOff",
                "program",
                "setColour",
                "increaseColour",
                "decreaseColour",
                "setScene",
            ],
            Self::Lighting6 | Self::HomeConfort => &["switchOn", "switchOff"],
            Self::Chime1 => &["chime"],
            Self::Fan => &[
                "buttonPress",
                "toggleOnOff",
                "setSpeed",
                "increaseSpeed",
                "decreaseSpeed",
                "startTimer",
                "switchOn",
                "switchOff",
                "toggleLightOnOff",
                "lightOn",
                "lightOff",
                "restore",
            ],
            Self::Blinds1 => &[
                "open",
                "close",
                "stop",
                "confirm",
                "setLimit",
                "lowerLimit",
                "reverse",
            ],
            Self::Blinds2 => &["open", "close", "stop", "confirm", "setPercent", "setAngle"],
            Self::Curtain1 => &["open", "close", "stop", "program"],
            Self::Rfy => &[
                "up",
                "down",
                "stop",
                "program",
                "erase",
                "venetianOpen",
                "venetianClose",
            ],
            Self::Security1 => &[
                "switchOnLight",
                "switchOffLight",
                "sendStatus",
                "sendPanic",
                "cancelPanic",
                "armAway",
                "armAwayDelayed",
                "armHome",
                "armHomeDelayed",
                "disarm",
            ],
            Self::Thermostat3 => &[
                "switchOn",
                "switchOff",
                "switchOn2",
                "switchOff2",
                "up",
                "down",
                "runUp",
                "runDown",
                "stop",
            ],
            Self::HunterFan => &["switchOff", "setSpeed", "toggleLightOnOff", "program"],
            Self::Funkbus => &[
                "channelUp",
                "channelDown",
                "allOff",
                "allOn",
                "scene",
                "masterUp",
                "masterDown",
            ],
        }
    }

    /// Looks up a device class by its lower-case packet type name.
    #[must_use]
    pub fn from_packet_type(packet_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.packet_type() == packet_type)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl Serialize for DeviceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.class_name())
    }
}

/// Error returned when a string does not name a known device class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDeviceKind(pub String);

impl fmt::Display for UnknownDeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is not a valid device", self.0)
    }
}

impl std::error::Error for UnknownDeviceKind {}

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    /// Parses an exported class name. Matching is exact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.class_name() == s)
            .ok_or_else(|| UnknownDeviceKind(s.to_string()))
    }
}
