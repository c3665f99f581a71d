//! RGBA colors and the fixed palettes used by the starfield and bursts.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::ColorError;

/// 8-bit RGBA color.
///
/// Serialized as a `#rrggbb` / `#rrggbbaa` hex string so palettes stay
/// readable in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(C)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    /// Parses `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || ColorError::InvalidHex(hex.to_string());

        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        let a = if digits.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?, a))
    }

    /// Formats as lowercase hex; alpha is omitted when opaque.
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Returns the same color with its alpha scaled by `factor` (clamped to 0..=1).
    #[must_use]
    pub fn scale_alpha(self, factor: f32) -> Self {
        let a = (f32::from(self.a) * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// Alpha as a 0..=1 float.
    #[must_use]
    pub fn alpha_f32(&self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

/// Page background behind the starfield (`#0a1535`).
pub const BACKGROUND: Rgba = Rgba::rgb(0x0a, 0x15, 0x35);

/// Seven star colors.
pub const STAR_PALETTE: [Rgba; 7] = [
    Rgba::rgb(0x00, 0xff, 0xf9), // Cyan
    Rgba::rgb(0xff, 0xed, 0x4e), // Yellow
    Rgba::rgb(0xff, 0x2a, 0x6d), // Pink
    Rgba::rgb(0x00, 0xff, 0x88), // Green
    Rgba::rgb(0xb9, 0x67, 0xff), // Purple
    Rgba::rgb(0xff, 0x6b, 0x35), // Orange
    Rgba::WHITE,
];

/// Six burst particle colors (the star palette without white).
pub const BURST_PALETTE: [Rgba; 6] = [
    STAR_PALETTE[0],
    STAR_PALETTE[1],
    STAR_PALETTE[2],
    STAR_PALETTE[3],
    STAR_PALETTE[4],
    STAR_PALETTE[5],
];
