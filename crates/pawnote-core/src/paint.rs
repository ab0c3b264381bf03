//! Paint configuration for strokes.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default brush width in logical pixels.
pub const DEFAULT_BRUSH_WIDTH: f64 = 5.0;

/// An 8-bit RGBA color.
///
/// Serializes as a CSS hex string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse a hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match hex.len() {
            3 => Some(Self::new(
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            )),
            6 => Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Paint settings read from the editor chrome at stroke start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Stroke color (ignored when erasing).
    pub color: Color,
    /// Brush width in logical pixels.
    pub width: f64,
    /// Erase to transparency instead of painting.
    pub erase: bool,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            color: Color::black(),
            width: DEFAULT_BRUSH_WIDTH,
            erase: false,
        }
    }
}

impl PaintConfig {
    pub fn new(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            erase: false,
        }
    }

    /// An eraser of the given width.
    pub fn eraser(width: f64) -> Self {
        Self {
            width,
            erase: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::from_hex("#fff"), Some(Color::white()));
        assert_eq!(Color::from_hex("#22c55e"), Some(Color::new(0x22, 0xc5, 0x5e, 255)));
        assert_eq!(Color::from_hex("#00000080"), Some(Color::new(0, 0, 0, 128)));
        assert_eq!(Color::from_hex("red"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn test_hex_roundtrip_through_serde() {
        let color = Color::new(0x12, 0xab, 0xef, 255);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#12abef\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_eraser_preset() {
        let paint = PaintConfig::eraser(12.0);
        assert!(paint.erase);
        assert!((paint.width - 12.0).abs() < f64::EPSILON);
    }
}
