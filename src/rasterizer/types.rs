//! Core types for the blitter

use serde::{Deserialize, Serialize};

// =============================================================================
// RGB565 Color Type
// =============================================================================

/// 16-bit display color
///
/// Format: `RRRRRGGG GGGBBBBB`
/// - Bits 15-11: Red (0-31)
/// - Bits 10-5: Green (0-63)
/// - Bits 4-0: Blue (0-31)
///
/// The frame buffer stores these words directly. Sprites reuse the same
/// encoding, so a sprite's transparency key is just one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color(pub u16);

impl Color {
    pub const WHITE: Color = Color(0xFFFF);
    pub const GRAY: Color = Color(0xACD0);
    pub const DARK_GRAY: Color = Color(0x5268);
    pub const BLACK: Color = Color(0x0000);
    pub const PURPLE: Color = Color(0x633F);
    pub const PINK: Color = Color(0xD95E);
    pub const RED: Color = Color(0xD8E4);
    pub const ORANGE: Color = Color(0xFD42);
    pub const BROWN: Color = Color(0xCC68);
    pub const BEIGE: Color = Color(0xFEB2);
    pub const YELLOW: Color = Color(0xF720);
    pub const LIGHT_GREEN: Color = Color(0x8668);
    pub const GREEN: Color = Color(0x044A);
    pub const DARK_BLUE: Color = Color(0x0210);
    pub const BLUE: Color = Color(0x4439);
    pub const LIGHT_BLUE: Color = Color(0x7DDF);

    /// Magenta, the usual choice of transparency key in baked sprites
    pub const MAGENTA: Color = Color(0xF81F);

    /// Create from 8-bit RGB values (quantized to 5/6/5 bits)
    #[inline]
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        let r = (r as u16 >> 3) << 11;
        let g = (g as u16 >> 2) << 5;
        let b = b as u16 >> 3;
        Color(r | g | b)
    }

    /// Red channel expanded to 8 bits
    #[inline]
    pub fn r8(self) -> u8 {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        (r << 3) | (r >> 2)
    }

    /// Green channel expanded to 8 bits
    #[inline]
    pub fn g8(self) -> u8 {
        let g = ((self.0 >> 5) & 0x3F) as u8;
        (g << 2) | (g >> 4)
    }

    /// Blue channel expanded to 8 bits
    #[inline]
    pub fn b8(self) -> u8 {
        let b = (self.0 & 0x1F) as u8;
        (b << 3) | (b >> 2)
    }

    /// Convert to opaque RGBA bytes for texture upload
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r8(), self.g8(), self.b8(), 255]
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Color(raw)
    }
}
