// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol subtype codes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A subtype code as it arrives from a command payload, configuration, or
/// the driver.
///
/// Subtypes are numeric codes identifying a product dialect within a device
/// type, but JSON payloads routinely carry them as text (`"1"`, `"0x0b"`).
/// Both forms compare by their integer value. Fractional JSON numbers are
/// truncated toward zero on deserialization (`1.0` and `1.9` are both `1`).
///
/// # Examples
///
/// ```
/// use rfxmqtt_lib::types::Subtype;
///
/// assert_eq!(Subtype::from(1).code(), Some(1));
/// assert_eq!(Subtype::from("1").code(), Some(1));
/// assert_eq!(Subtype::from("0x0b").code(), Some(11));
/// assert_eq!(Subtype::from("AC").code(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Subtype {
    /// Numeric form.
    Code(i64),
    /// Textual form, parsed on demand.
    Text(String),
}

impl Subtype {
    /// Returns the integer value of this subtype.
    ///
    /// Text is parsed leniently: surrounding whitespace is ignored, a `0x`
    /// prefix selects hexadecimal, and trailing non-digit characters after a
    /// decimal prefix are dropped (`"3 "` and `"3a"` are both `3`). Returns
    /// `None` if no leading digits are present.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::Code(code) => Some(*code),
            Self::Text(text) => parse_leading_int(text),
        }
    }

    /// Returns the code narrowed to a byte, as stored on device state.
    #[must_use]
    pub fn as_byte(&self) -> Option<u8> {
        self.code().and_then(|code| u8::try_from(code).ok())
    }
}

fn parse_leading_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let value = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        let end = hex
            .find(|c: char| !c.is_ascii_hexdigit())
            .unwrap_or(hex.len());
        i64::from_str_radix(&hex[..end], 16).ok()?
    } else {
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        digits[..end].parse::<i64>().ok()?
    };

    Some(if negative { -value } else { value })
}

impl<'de> Deserialize<'de> for Subtype {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Float(f64),
            Text(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Code(code) => Self::Code(code),
            #[allow(clippy::cast_possible_truncation)]
            Repr::Float(value) => Self::Code(value.trunc() as i64),
            Repr::Text(text) => Self::Text(text),
        })
    }
}

impl From<i64> for Subtype {
    fn from(code: i64) -> Self {
        Self::Code(code)
    }
}

impl From<&str> for Subtype {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Subtype {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}
