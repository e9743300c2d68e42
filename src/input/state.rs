//! Button state
//!
//! Input is polled once per frame into a mask. [`ButtonSnapshot`] keeps the
//! current and previous masks and derives pressed/released edges from them,
//! so every query within a frame sees the same state.

use super::gamepad::Gamepad;
use super::keyboard;
use super::Button;

/// Level and edge state of one button for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    /// Held this frame
    pub down: bool,
    /// Went down this frame
    pub pressed: bool,
    /// Went up this frame
    pub released: bool,
}

/// Anything that can answer button queries for the current frame
pub trait ButtonSource {
    fn state(&self, button: Button) -> ButtonState;

    fn down(&self, button: Button) -> bool {
        self.state(button).down
    }

    fn pressed(&self, button: Button) -> bool {
        self.state(button).pressed
    }

    fn released(&self, button: Button) -> bool {
        self.state(button).released
    }
}

/// Two consecutive button masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSnapshot {
    current: u8,
    previous: u8,
}

impl ButtonSnapshot {
    /// Start a new frame with `mask` as the held buttons.
    pub fn advance(&mut self, mask: u8) {
        self.previous = self.current;
        self.current = mask;
    }

    pub fn mask(&self) -> u8 {
        self.current
    }
}

impl ButtonSource for ButtonSnapshot {
    fn state(&self, button: Button) -> ButtonState {
        let bit = button.mask();
        let down = self.current & bit != 0;
        let was_down = self.previous & bit != 0;
        ButtonState {
            down,
            pressed: down && !was_down,
            released: !down && was_down,
        }
    }
}

/// Keyboard and gamepad merged into one snapshot per frame
pub struct InputState {
    gamepad: Gamepad,
    snapshot: ButtonSnapshot,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
            snapshot: ButtonSnapshot::default(),
        }
    }

    /// Call once per frame before the runtime update
    pub fn poll(&mut self) {
        self.gamepad.poll();
        let mask = keyboard::button_mask() | self.gamepad.button_mask();
        self.snapshot.advance(mask);
    }

    pub fn snapshot(&self) -> &ButtonSnapshot {
        &self.snapshot
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
