//! # Hex colors.
//!
//! Accepted forms: `#RRGGBB`, `RRGGBB`, `#AARRGGBB`, `AARRGGBB`.
//! Six-digit forms are fully opaque.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 32-bit ARGB color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const GRAY: Color = Color(0xFF88_8888);
    pub const YELLOW: Color = Color(0xFFFF_FF00);

    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Parses a hex color.
    ///
    /// # Example
    /// ```
    /// use admob_native::Color;
    ///
    /// assert_eq!(Color::from_hex("#4CBE99").unwrap().argb(), 0xFF4C_BE99);
    /// assert_eq!(Color::from_hex("804CBE99").unwrap().alpha(), 0x80);
    /// assert!(Color::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(raw: &str) -> Result<Self, ColorParseError> {
        let digits = raw.trim().trim_start_matches('#');
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError(raw.to_string()));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|_| ColorParseError(raw.to_string()))?;
        match digits.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(ColorParseError(raw.to_string())),
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08X})", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Returned when a string is not a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex color {0:?}")]
pub struct ColorParseError(String);
