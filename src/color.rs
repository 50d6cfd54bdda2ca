//! CSS-style color values.
//!
//! Colors are written the way a stylesheet writes them and parsed once at
//! configuration time:
//!
//! ```ignore
//! use sparkles::Color;
//!
//! let white: Color = "#FFFFFF".parse()?;
//! let dim: Color = "#ffffff80".parse()?;
//! let none: Color = "transparent".parse()?;
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;

/// An 8-bit RGBA color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Create a color from its four channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Whether the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Clear color for a render pass on an sRGB surface: linear channels,
    /// premultiplied by alpha.
    pub fn to_wgpu(self) -> wgpu::Color {
        let linear = |c: u8| {
            let c = c as f64 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        };
        let a = self.a as f64 / 255.0;
        wgpu::Color {
            r: linear(self.r) * a,
            g: linear(self.g) * a,
            b: linear(self.b) * a,
            a,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "transparent" => return Ok(Color::TRANSPARENT),
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            _ => {}
        }

        let invalid = || ConfigError::InvalidColor(s.to_string());
        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        // Short form repeats each nibble: "f" -> "ff".
        let short = |i: usize| channel(i..i + 1).map(|v| v * 17);

        let parsed = match hex.len() {
            3 => (short(0), short(1), short(2), Ok(255)),
            4 => (short(0), short(1), short(2), short(3)),
            6 => (channel(0..2), channel(2..4), channel(4..6), Ok(255)),
            8 => (channel(0..2), channel(2..4), channel(4..6), channel(6..8)),
            _ => return Err(invalid()),
        };

        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Color::rgba(r, g, b, a)),
            _ => Err(invalid()),
        }
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        assert_eq!("#FFFFFF".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#1a2B3c".parse::<Color>().unwrap(), Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(
            "#ffffff80".parse::<Color>().unwrap(),
            Color::rgba(255, 255, 255, 0x80)
        );
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert_eq!("#f008".parse::<Color>().unwrap(), Color::rgba(255, 0, 0, 0x88));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!("transparent".parse::<Color>().unwrap(), Color::TRANSPARENT);
        assert_eq!(" White ".parse::<Color>().unwrap(), Color::WHITE);
        assert!(Color::TRANSPARENT.is_transparent());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("ffffff".parse::<Color>().is_err());
        assert!("#ffff_f".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("purple".parse::<Color>().is_err());
    }

    #[test]
    fn test_to_wgpu_is_linear_premultiplied() {
        let white = Color::WHITE.to_wgpu();
        assert!((white.r - 1.0).abs() < 1e-9 && (white.a - 1.0).abs() < 1e-9);

        let none = Color::TRANSPARENT.to_wgpu();
        assert_eq!((none.r, none.g, none.b, none.a), (0.0, 0.0, 0.0, 0.0));

        // sRGB mid-grey is about 21% in linear light.
        let grey = Color::rgb(128, 128, 128).to_wgpu();
        assert!((grey.r - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::WHITE.to_string(), "#FFFFFF");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
    }
}
