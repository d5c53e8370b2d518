// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Packet types, named subtype constants and device names.

use crate::types::Subtype;

/// Returned by [`PacketCatalogue::sub_type_name`] when no constant matches.
///
/// This is a valid-but-unresolved value, not an error.
pub const SUBTYPE_NOT_FOUND: &str = "notfound";

/// Description of one packet type known to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketType {
    /// Packet type byte on the wire.
    pub code: u8,
    /// Packet type name, e.g. `"lighting2"`.
    pub name: &'static str,
    /// Whether the transceiver can transmit this packet type.
    pub transmitter: bool,
    /// Named subtype constants.
    pub subtypes: &'static [(&'static str, u8)],
    /// Product names per subtype.
    pub device_names: &'static [(u8, &'static [&'static str])],
}

/// Lookup tables for packet types, subtype names and product names.
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::protocol::{PacketCatalogue, SUBTYPE_NOT_FOUND};
/// use rfxmqtt_lib::types::Subtype;
///
/// let catalogue = PacketCatalogue::rfxcom();
/// assert_eq!(catalogue.sub_type_name("lighting2", &Subtype::from(1)), "HOMEEASY_EU");
/// assert_eq!(catalogue.sub_type_name("lighting2", &Subtype::from("1")), "HOMEEASY_EU");
/// assert_eq!(catalogue.sub_type_name("lighting2", &Subtype::from(42)), SUBTYPE_NOT_FOUND);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PacketCatalogue {
    packet_types: &'static [PacketType],
}

impl PacketCatalogue {
    /// Returns the RFXCOM catalogue.
    #[must_use]
    pub const fn rfxcom() -> Self {
        Self {
            packet_types: PACKET_TYPES,
        }
    }

    /// Creates a catalogue over custom tables.
    #[must_use]
    pub const fn new(packet_types: &'static [PacketType]) -> Self {
        Self { packet_types }
    }

    /// Iterates over packet types the transceiver can transmit.
    pub fn transmitter_packet_types(&self) -> impl Iterator<Item = &'static PacketType> {
        self.packet_types.iter().filter(|packet| packet.transmitter)
    }

    /// Finds a packet type by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&'static PacketType> {
        self.packet_types.iter().find(|packet| packet.name == name)
    }

    /// Finds a packet type by wire code.
    #[must_use]
    pub fn by_code(&self, code: u8) -> Option<&'static PacketType> {
        self.packet_types.iter().find(|packet| packet.code == code)
    }

    /// Returns the constant name of `subtype` within the transmitter packet
    /// type `packet_type`, or [`SUBTYPE_NOT_FOUND`].
    ///
    /// Subtypes compare as integers, so `"1"` and `1` resolve identically.
    #[must_use]
    pub fn sub_type_name(&self, packet_type: &str, subtype: &Subtype) -> &'static str {
        let Some(code) = subtype.code() else {
            return SUBTYPE_NOT_FOUND;
        };

        self.transmitter_packet_types()
            .filter(|packet| packet.name == packet_type)
            .flat_map(|packet| packet.subtypes.iter())
            .filter(|(_, value)| i64::from(*value) == code)
            .map(|(name, _)| *name)
            .last()
            .unwrap_or(SUBTYPE_NOT_FOUND)
    }

    /// Returns the numeric value of the constant `name` within `packet_type`.
    #[must_use]
    pub fn subtype_code(&self, packet_type: &str, name: &str) -> Option<u8> {
        self.by_name(packet_type)?
            .subtypes
            .iter()
            .find(|(constant, _)| *constant == name)
            .map(|(_, value)| *value)
    }

    /// Returns the product names for a packet code and subtype.
    #[must_use]
    pub fn device_names(&self, code: u8, subtype: &Subtype) -> Option<&'static [&'static str]> {
        let subtype = subtype.as_byte()?;
        self.by_code(code)?
            .device_names
            .iter()
            .find(|(value, _)| *value == subtype)
            .map(|(_, names)| *names)
    }
}

impl Default for PacketCatalogue {
    fn default() -> Self {
        Self::rfxcom()
    }
}

const PACKET_TYPES: &[PacketType] = &[
    PacketType {
        code: 0x10,
        name: "lighting1",
        transmitter: true,
        subtypes: &[
            ("X10", 0x00),
            ("ARC", 0x01),
            ("ELRO", 0x02),
            ("WAVEMAN", 0x03),
            ("CHACON", 0x04),
            ("IMPULS", 0x05),
            ("RISING_SUN", 0x06),
            ("PHILIPS_SBC", 0x07),
            ("ENERGENIE_ENER010", 0x08),
            ("ENERGENIE_5_GANG", 0x09),
            ("COCO", 0x0a),
            ("HQ_COCO20", 0x0b),
            ("OASE_INSCENIO_FM_MASTER", 0x0c),
        ],
        device_names: &[
            (0x00, &["X10 lighting"]),
            (0x01, &["ARC"]),
            (0x02, &["ELRO AB400D", "Flamingo", "Sartano"]),
            (0x03, &["Waveman"]),
            (0x04, &["Chacon EMW200"]),
            (0x05, &["IMPULS"]),
            (0x06, &["RisingSun"]),
            (0x07, &["Philips SBC"]),
            (0x08, &["Energenie ENER010"]),
            (0x09, &["Energenie 5-gang"]),
            (0x0a, &["COCO GDR2-2000R"]),
            (0x0b, &["HQ COCO-20"]),
            (0x0c, &["Oase Inscenio FM Master"]),
        ],
    },
    PacketType {
        code: 0x11,
        name: "lighting2",
        transmitter: true,
        subtypes: &[
            ("AC", 0x00),
            ("HOMEEASY_EU", 0x01),
            ("ANSLUT", 0x02),
            ("KAMBROOK", 0x03),
        ],
        device_names: &[
            (0x00, &["AC"]),
            (0x01, &["HomeEasy EU"]),
            (0x02, &["Anslut"]),
            (0x03, &["Kambrook"]),
        ],
    },
    PacketType {
        code: 0x12,
        name: "lighting3",
        transmitter: true,
        subtypes: &[("KOPPLA", 0x00)],
        device_names: &[(0x00, &["Ikea Koppla"])],
    },
    PacketType {
        code: 0x13,
        name: "lighting4",
        transmitter: true,
        subtypes: &[("PT2262", 0x00)],
        device_names: &[(0x00, &["PT2262"])],
    },
    PacketType {
        code: 0x14,
        name: "lighting5",
        transmitter: true,
        subtypes: &[
            ("LIGHTWAVERF", 0x00),
            ("EMW100", 0x01),
            ("BBSB", 0x02),
            ("MDREMOTE", 0x03),
            ("CONRAD", 0x04),
            ("LIVOLO", 0x05),
            ("TRC02", 0x06),
            ("AOKE", 0x07),
            ("TRC02_2", 0x08),
            ("EURODOMEST", 0x09),
            ("LIVOLO_APPLIANCE", 0x0a),
            ("RGB432W", 0x0b),
            ("MDREMOTE107", 0x0c),
            ("LEGRAND", 0x0d),
            ("AVANTEK", 0x0e),
            ("IT", 0x0f),
            ("MDREMOTE108", 0x10),
            ("KANGTAI", 0x11),
        ],
        device_names: &[
            (0x00, &["LightwaveRF", "Siemens"]),
            (0x01, &["EMW100 GAO/Everflourish"]),
            (0x02, &["BBSB new types"]),
            (0x03, &["MDREMOTE LED dimmer"]),
            (0x04, &["Conrad RSL2"]),
            (0x05, &["Livolo"]),
            (0x06, &["RGB TRC02"]),
            (0x07, &["Aoke Relay"]),
            (0x08, &["RGB TRC02_2"]),
            (0x09, &["Eurodomest"]),
            (0x0a, &["Livolo Appliance"]),
            (0x0b, &["RGB432W"]),
            (0x0c, &["MDREMOTE 107"]),
            (0x0d, &["Legrand CAD"]),
            (0x0e, &["Avantek"]),
            (0x0f, &["IT"]),
            (0x10, &["MDREMOTE 108"]),
            (0x11, &["Kangtai", "Cotech"]),
        ],
    },
    PacketType {
        code: 0x15,
        name: "lighting6",
        transmitter: true,
        subtypes: &[("BLYSS", 0x00), ("CUVEO", 0x01)],
        device_names: &[(0x00, &["Blyss"]), (0x01, &["Cuveo"])],
    },
    PacketType {
        code: 0x16,
        name: "chime1",
        transmitter: true,
        subtypes: &[
            ("BYRON_SX", 0x00),
            ("BYRON_MP001", 0x01),
            ("SELECT_PLUS", 0x02),
            ("RFU", 0x03),
            ("ENVIVO", 0x04),
            ("ALFAWISE", 0x05),
        ],
        device_names: &[
            (0x00, &["Byron SX"]),
            (0x01, &["Byron MP001"]),
            (0x02, &["SelectPlus"]),
            (0x03, &["RFU"]),
            (0x04, &["Envivo"]),
            (0x05, &["Alfawise", "dBell"]),
        ],
    },
    PacketType {
        code: 0x17,
        name: "fan",
        transmitter: true,
        subtypes: &[
            ("SIEMENS_SF01", 0x00),
            ("ITHO_CVE_RFT", 0x01),
            ("LUCCI_AIR", 0x02),
            ("SEAV_TXS4", 0x03),
            ("WESTINGHOUSE_7226640", 0x04),
            ("LUCCI_AIR_DC", 0x05),
            ("CASAFAN", 0x06),
            ("FT1211R", 0x07),
            ("FALMEC", 0x08),
            ("LUCCI_AIR_DCII", 0x09),
            ("ITHO_CVE_ECO_RFT", 0x0a),
            ("NOVY", 0x0b),
        ],
        device_names: &[
            (0x00, &["Siemens SF01"]),
            (0x01, &["Itho CVE RFT"]),
            (0x02, &["Lucci Air"]),
            (0x03, &["SEAV TXS4"]),
            (0x04, &["Westinghouse 7226640"]),
            (0x05, &["Lucci Air DC"]),
            (0x06, &["Casafan"]),
            (0x07, &["FT1211R"]),
            (0x08, &["Falmec"]),
            (0x09, &["Lucci Air DCII"]),
            (0x0a, &["Itho CVE ECO RFT"]),
            (0x0b, &["Novy"]),
        ],
    },
    PacketType {
        code: 0x18,
        name: "curtain1",
        transmitter: true,
        subtypes: &[("HARRISON", 0x00)],
        device_names: &[(0x00, &["Harrison Curtain"])],
    },
    PacketType {
        code: 0x19,
        name: "blinds1",
        transmitter: true,
        subtypes: &[
            ("BLINDS_T0", 0x00),
            ("BLINDS_T1", 0x01),
            ("BLINDS_T2", 0x02),
            ("BLINDS_T3", 0x03),
            ("BLINDS_T4", 0x04),
            ("BLINDS_T5", 0x05),
            ("BLINDS_T6", 0x06),
            ("BLINDS_T7", 0x07),
            ("BLINDS_T8", 0x08),
            ("BLINDS_T9", 0x09),
            ("BLINDS_T10", 0x0a),
            ("BLINDS_T11", 0x0b),
            ("BLINDS_T12", 0x0c),
            ("BLINDS_T13", 0x0d),
        ],
        device_names: &[
            (0x00, &["RollerTrol", "Hasta new"]),
            (0x01, &["Hasta old"]),
            (0x02, &["A-OK RF01"]),
            (0x03, &["A-OK AC114"]),
            (0x04, &["RAEX YR1326"]),
            (0x05, &["Media Mount"]),
            (0x06, &["DC106", "YOOHA", "Rohrmotor24 RMF"]),
            (0x07, &["Forest"]),
            (0x08, &["Chamberlain CS4330CN"]),
            (0x09, &["Sunpery", "BTX"]),
            (0x0a, &["Dolat DLM-1", "Topstar"]),
            (0x0b, &["ASP"]),
            (0x0c, &["Confexx CNF24-2435"]),
            (0x0d, &["Screenline"]),
        ],
    },
    PacketType {
        code: 0x1a,
        name: "rfy",
        transmitter: true,
        subtypes: &[
            ("RFY", 0x00),
            ("RFYEXT", 0x01),
            ("RESERVED", 0x02),
            ("ASA", 0x03),
        ],
        device_names: &[
            (0x00, &["Somfy RFY"]),
            (0x01, &["Somfy RFY ext"]),
            (0x03, &["ASA"]),
        ],
    },
    PacketType {
        code: 0x1b,
        name: "homeConfort",
        transmitter: true,
        subtypes: &[("TEL_010", 0x00)],
        device_names: &[(0x00, &["TEL-010"])],
    },
    PacketType {
        code: 0x1e,
        name: "funkbus",
        transmitter: true,
        subtypes: &[("GIRA", 0x00), ("INSTA", 0x01)],
        device_names: &[(0x00, &["Gira"]), (0x01, &["Insta"])],
    },
    PacketType {
        code: 0x1f,
        name: "hunterFan",
        transmitter: true,
        subtypes: &[("HUNTER_FAN", 0x00)],
        device_names: &[(0x00, &["Hunter Fan"])],
    },
    PacketType {
        code: 0x20,
        name: "security1",
        transmitter: true,
        subtypes: &[
            ("X10_DOOR", 0x00),
            ("X10_PIR", 0x01),
            ("X10_SECURITY", 0x02),
            ("KD101", 0x03),
            ("VISONIC_POWERCODE_SENSOR_PRIMARY", 0x04),
            ("VISONIC_POWERCODE_MOTION", 0x05),
            ("VISONIC_CODESECURE", 0x06),
            ("VISONIC_POWERCODE_SENSOR_AUX", 0x07),
            ("MEIANTECH", 0x08),
            ("SA30", 0x09),
            ("RM174RF", 0x0a),
        ],
        device_names: &[
            (0x00, &["X10 security door/window sensor"]),
            (0x01, &["X10 security motion sensor"]),
            (0x02, &["X10 security remote"]),
            (0x03, &["KD101 smoke detector"]),
            (0x04, &["Visonic PowerCode sensor - primary contact"]),
            (0x05, &["Visonic PowerCode motion detector"]),
            (0x06, &["Visonic CodeSecure"]),
            (0x07, &["Visonic PowerCode sensor - auxiliary contact"]),
            (0x08, &["Meiantech"]),
            (0x09, &["Alecto SA30 smoke detector"]),
            (0x0a, &["RM174RF smoke detector"]),
        ],
    },
    PacketType {
        code: 0x31,
        name: "blinds2",
        transmitter: true,
        subtypes: &[("BREL", 0x00), ("DOOYA", 0x01)],
        device_names: &[(0x00, &["Brel"]), (0x01, &["Dooya"])],
    },
    PacketType {
        code: 0x42,
        name: "thermostat3",
        transmitter: true,
        subtypes: &[
            ("MERTIK_G6R_H4T1", 0x00),
            ("MERTIK_G6R_H4TB", 0x01),
            ("MERTIK_G6R_H4TD", 0x02),
            ("MERTIK_G6R_H4S", 0x03),
        ],
        device_names: &[
            (0x00, &["Mertik G6R-H4T1"]),
            (0x01, &["Mertik G6R-H4TB"]),
            (0x02, &["Mertik G6R-H4TD"]),
            (0x03, &["Mertik G6R-H4S"]),
        ],
    },
    PacketType {
        code: 0x50,
        name: "temperature1",
        transmitter: false,
        subtypes: &[],
        device_names: &[
            (0x01, &["THR128/138", "THC138"]),
            (0x02, &["THC238/268", "THN132", "THWR288", "THRN122", "THN122", "AW129/131"]),
            (0x03, &["THWR800"]),
            (0x04, &["RTHN318"]),
            (0x05, &["LaCrosse TX2", "TX3", "TX4", "TX17"]),
        ],
    },
    PacketType {
        code: 0x52,
        name: "temperaturehumidity1",
        transmitter: false,
        subtypes: &[],
        device_names: &[
            (0x01, &["THGN122/123", "THGN132", "THGR122/228/238/268"]),
            (0x02, &["THGR810", "THGN800"]),
            (0x03, &["RTGR328"]),
            (0x04, &["THGR328"]),
            (0x05, &["WTGR800"]),
        ],
    },
    PacketType {
        code: 0x55,
        name: "rain1",
        transmitter: false,
        subtypes: &[],
        device_names: &[
            (0x01, &["RGR126/682/918"]),
            (0x02, &["PCR800"]),
            (0x03, &["TFA"]),
        ],
    },
    PacketType {
        code: 0x56,
        name: "wind1",
        transmitter: false,
        subtypes: &[],
        device_names: &[
            (0x01, &["WTGR800"]),
            (0x02, &["WGR800"]),
            (0x03, &["STR918", "WGR918", "WGR928"]),
            (0x04, &["TFA"]),
        ],
    },
];
