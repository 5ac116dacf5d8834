//! RGBA colour values for text decorations.
//!
//! Decoration colours are stored as 8-bit channels so that two decorations
//! compare equal exactly when they would serialize identically, which is what
//! run coalescing in [`PieceTable::decoration_model_list`] relies on.
//!
//! [`PieceTable::decoration_model_list`]: crate::text::PieceTable::decoration_model_list
//!
//! # Examples
//!
//! ```
//! use richtext_core::Rgba;
//!
//! let accent = Rgba::from_hex("#6495ed").unwrap();
//! assert_eq!(accent, Rgba::rgb(100, 149, 237));
//! assert_eq!(accent.to_hex(), "#6495ed");
//! assert!(Rgba::TRANSPARENT.is_transparent());
//! ```

use std::fmt;
use std::str::FromStr;

/// RGBA colour with 8-bit channels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Create a colour from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

        match hex.len() {
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Format as lowercase `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex(self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Return the colour with a different alpha channel.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Check if fully transparent.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Check if fully opaque.
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 255
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Error returned when a colour string cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color format: {}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_hex_forms() {
        assert_eq!(Rgba::from_hex("#f00"), Some(Rgba::RED));
        assert_eq!(Rgba::from_hex("00ff00"), Some(Rgba::GREEN));
        assert_eq!(
            Rgba::from_hex("#0000ff80"),
            Some(Rgba::BLUE.with_alpha(0x80))
        );
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#gggggg"), None);
        assert_eq!(Rgba::from_hex("#ééé"), None);
    }

    #[test]
    fn test_to_hex_alpha() {
        assert_eq!(Rgba::WHITE.to_hex(), "#ffffff");
        assert_eq!(Rgba::TRANSPARENT.to_hex(), "#00000000");
        assert_eq!(Rgba::BLACK.to_string(), "#000000");
    }

    #[test]
    fn test_from_str() {
        let c: Rgba = "#102030".parse().unwrap();
        assert_eq!(c, Rgba::rgb(0x10, 0x20, 0x30));
        assert!("nope".parse::<Rgba>().is_err());
    }

    proptest! {
        #[test]
        fn hex_roundtrip(r: u8, g: u8, b: u8, a: u8) {
            let color = Rgba::new(r, g, b, a);
            prop_assert_eq!(Rgba::from_hex(&color.to_hex()), Some(color));
        }
    }
}
