//! Input handling
//!
//! Keyboard (macroquad) and gamepad (gilrs on native) are polled into one
//! 8-bit mask per frame. The runtime and actors only ever see the
//! [`ButtonSource`] trait, so tests can drive them with a plain
//! [`ButtonSnapshot`].

mod actions;
mod gamepad;
mod keyboard;
mod state;

pub use actions::Button;
pub use gamepad::Gamepad;
pub use state::*;
