//! Handheld button set
//!
//! The console has a d-pad, two face buttons and two system buttons.
//! Each button owns one bit of an 8-bit mask.

use serde::{Deserialize, Serialize};

/// Physical buttons of the handheld
///
/// Desktop mappings:
/// - Up/Down/Left/Right = arrows or WASD, gamepad d-pad
/// - A = J or Z, gamepad South
/// - B = K or X, gamepad East
/// - Menu = Escape or Tab, gamepad Start
/// - Home = Home or H, gamepad Mode (guide)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    A,
    B,
    Menu,
    Home,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Menu,
        Button::Home,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// Bit of this button in a button mask
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_are_distinct() {
        let combined = Button::ALL.iter().fold(0u8, |acc, b| {
            assert_eq!(acc & b.mask(), 0);
            acc | b.mask()
        });
        assert_eq!(combined, 0xFF);
    }
}
