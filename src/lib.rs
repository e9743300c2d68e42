//! pixelpool: a small 2D game runtime for low-res handheld-style games
//!
//! Game objects live in fixed-capacity pools, one pool per object type.
//! A scene owns the pools, orders drawing by layer and offsets everything
//! by a camera:
//! - Pixel-stepped collision that never tunnels through thin walls
//! - Sprite sheets, frame animations and tilemaps drawn with clipping
//! - RGB565 frame buffer, presented by a macroquad host

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod app;
pub mod config;
pub mod error;
pub mod game;
pub mod host;
pub mod input;
pub mod pacer;
pub mod rasterizer;
pub mod scene;
pub mod slab;

pub use app::Runtime;
pub use config::RuntimeConfig;
pub use error::{AssetError, ConfigError, SlabError};
pub use game::{Actor, Blocked, Context, Entity, EntityHandle, EntityPool, Flags, Hitbox, Rect};
pub use input::{Button, ButtonSnapshot, ButtonSource, ButtonState};
pub use pacer::{FramePacer, FrameStats};
pub use rasterizer::{Anim, ClipTable, Color, Framebuffer, Origin, PlayMode, Renderable, Sprite, SpriteSheet, TileGrid, Tilemap};
pub use scene::{Camera, RenderHandle, Scene, SceneHooks};
