//! Display constants
//!
//! Default screen resolution of the target handheld.

/// Screen width in the default (low-res, full color) display mode
pub const WIDTH: usize = 80;

/// Screen height in the default display mode
pub const HEIGHT: usize = 64;

/// Default frames per second
pub const DEFAULT_FRAME_RATE: u8 = 30;
