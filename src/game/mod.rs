//! Pooled game objects
//!
//! Game objects are split in two halves that share a pool slot:
//! - [`Entity`]: engine-owned position, hitbox and status flags
//! - an [`Actor`]: the game's behaviour and private state
//!
//! Pools ([`EntityPool`]) are fixed-size and never allocate after
//! construction. During an update every actor gets a [`Context`] to query,
//! spawn, retire and move through the rest of the scene.

pub mod actor;
pub mod collision;
pub mod context;
pub mod entity;
pub mod pool;

pub use actor::Actor;
pub use collision::Blocked;
pub use context::Context;
pub use entity::{Entity, EntityHandle, Flags, Hitbox, Rect};
pub use pool::{AnyPool, EntityPool, Env, Slot, SlotMut};
