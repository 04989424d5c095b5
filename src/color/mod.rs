//! Color value types and the hexadecimal lookup key.

use std::fmt;

/// 8-bit RGB color.
///
/// Alpha is intentionally absent: artifact lookup is keyed on the color
/// channels only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// Creates a new RGB color.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the lookup key for this color.
    pub fn color_key(&self) -> ColorKey {
        ColorKey::from_rgb(*self)
    }
}

/// Deterministic hexadecimal lookup key for a color.
///
/// Always exactly six lowercase hex digits, two zero-padded digits per
/// channel ("0a141e" for (10, 20, 30)). Used as the path segment when
/// requesting a tile's artifact and as the tie-break key for any artifact
/// caching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorKey(String);

impl ColorKey {
    /// Encodes a color as its lookup key.
    pub fn from_rgb(color: Rgb) -> Self {
        Self(format!("{:02x}{:02x}{:02x}", color.r, color.g, color.b))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_key_zero_pads_channels() {
        let key = Rgb::new(0, 1, 15).color_key();
        assert_eq!(key.as_str(), "00010f");
    }

    #[test]
    fn test_color_key_is_lowercase() {
        let key = Rgb::new(0xAB, 0xCD, 0xEF).color_key();
        assert_eq!(key.as_str(), "abcdef");
    }

    #[test]
    fn test_color_key_reference_value() {
        let key = Rgb::new(10, 20, 30).color_key();
        assert_eq!(key.as_str(), "0a141e");
    }

    #[test]
    fn test_color_key_display_matches_str() {
        let key = Rgb::new(255, 0, 128).color_key();
        assert_eq!(format!("{}", key), key.as_str());
        assert_eq!(key.as_str(), "ff0080");
    }

    #[test]
    fn test_equal_colors_produce_equal_keys() {
        assert_eq!(Rgb::new(1, 2, 3).color_key(), Rgb::new(1, 2, 3).color_key());
        assert_ne!(Rgb::new(1, 2, 3).color_key(), Rgb::new(3, 2, 1).color_key());
    }
}
