//! 16-bit sprite blitter
//!
//! Everything drawn by the runtime ends up in a [`Framebuffer`] of RGB565
//! words. Baked assets (sprite sheets, clip tables, tile grids) are
//! immutable and referenced as `&'static`; renderers only carry a cursor
//! (frame, playback state) and an origin.
//!
//! # Module Organization
//!
//! - `types` - Color (RGB565) and the palette
//! - `render` - Framebuffer and draw primitives
//! - `renderable` - Renderable trait and origin offset
//! - `sprite` - Sprite sheets and the clipped blitter
//! - `anim` - Clip tables and the animation player
//! - `tilemap` - Tile grids and the culled tile renderer
//! - `constants` - Default screen size and frame rate

pub mod anim;
pub mod constants;
pub mod render;
pub mod renderable;
pub mod sprite;
pub mod tilemap;
pub mod types;

// =============================================================================
// Convenience re-exports for commonly used items
// =============================================================================

pub use anim::{Anim, ClipTable, PlayMode};
pub use constants::{DEFAULT_FRAME_RATE, HEIGHT, WIDTH};
pub use render::Framebuffer;
pub use renderable::{Origin, Renderable};
pub use sprite::{Sprite, SpriteSheet};
pub use tilemap::{TileGrid, Tilemap};
pub use types::Color;
