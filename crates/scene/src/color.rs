//! Linear 0..1 colors and their packed 24-bit wire form.

use serde::{Deserialize, Serialize};

use crate::SceneError;

/// An RGB color with channels nominally in `0.0..=1.0`.
///
/// Serializes as a plain `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Packs the color as `(r << 16) | (g << 8) | b` with 8 bits per channel.
    ///
    /// Channels are clamped to `0..=1` and rounded to the nearest step.
    #[must_use]
    pub fn pack(self) -> u32 {
        (channel_to_byte(self.r) << 16) | (channel_to_byte(self.g) << 8) | channel_to_byte(self.b)
    }

    #[must_use]
    pub fn unpack(packed: u32) -> Self {
        let byte = |shift: u32| f32::from(((packed >> shift) & 0xff) as u8) / 255.0;
        Self::new(byte(16), byte(8), byte(0))
    }

    /// Parses `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, SceneError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(SceneError::InvalidColor(hex.to_owned()));
        }
        let packed =
            u32::from_str_radix(digits, 16).map_err(|_| SceneError::InvalidColor(hex.to_owned()))?;
        Ok(Self::unpack(packed))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.pack())
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Rgb {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(color: Rgb) -> Self {
        color.to_array()
    }
}

fn channel_to_byte(value: f32) -> u32 {
    // NaN casts to 0
    (value.clamp(0.0, 1.0) * 255.0).round() as u32
}
