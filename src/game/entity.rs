//! Poolable entity state
//!
//! An [`Entity`] is the engine-owned half of a game object: position,
//! hitbox and status flags. The game-specific half is the actor stored next
//! to it in the same pool slot (see [`super::Actor`]).
//!
//! Each entity remembers which pool slot it lives in through an
//! [`EntityHandle`]. The handle is plain data (type id + slot index) and is
//! resolved against the scene only when something needs the slot again.

use serde::{Deserialize, Serialize};

/// Entity status bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Flags(pub u8);

impl Flags {
    pub const ACTIVE: Flags = Flags(0x01);
    pub const COLLIDABLE: Flags = Flags(0x02);
    pub const VISIBLE: Flags = Flags(0x04);
    pub const USER_0: Flags = Flags(0x08);
    pub const USER_1: Flags = Flags(0x10);
    pub const USER_2: Flags = Flags(0x20);
    pub const USER_3: Flags = Flags(0x40);
    pub const USER_4: Flags = Flags(0x80);

    /// Flags of a freshly spawned entity
    pub const SPAWNED: Flags = Flags(0x07);

    pub const fn empty() -> Self {
        Flags(0)
    }

    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    #[inline]
    pub fn set(&mut self, other: Flags, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }
}

impl std::ops::BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

/// Axis-aligned box relative to the entity position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hitbox {
    pub x: i8,
    pub y: i8,
    pub width: u8,
    pub height: u8,
}

impl Hitbox {
    pub const fn new(x: i8, y: i8, width: u8, height: u8) -> Self {
        Self { x, y, width, height }
    }

    /// Zero-sized hitboxes never collide.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where an entity lives: the type id of its pool and its slot index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EntityHandle {
    pub kind: u8,
    pub slot: u16,
}

impl EntityHandle {
    pub const fn new(kind: u8, slot: u16) -> Self {
        Self { kind, slot }
    }
}

/// Screen or world rectangle in widened coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Axis-aligned overlap. Touching edges and empty rectangles never overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        !(other.x >= self.x + self.w
            || other.x + other.w <= self.x
            || other.y >= self.y + self.h
            || other.y + other.h <= self.y)
    }
}

/// Position, hitbox and status of one pooled object.
///
/// A snapshot of this struct is what queries hand back, so it is `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub x: i16,
    pub y: i16,
    pub hitbox: Hitbox,
    pub flags: Flags,
    handle: EntityHandle,
}

impl Entity {
    /// A never-spawned slot
    pub(crate) fn vacant(handle: EntityHandle) -> Self {
        Self {
            x: 0,
            y: 0,
            hitbox: Hitbox::default(),
            flags: Flags::empty(),
            handle,
        }
    }

    /// Fully reset state for a slot that is being spawned.
    pub(crate) fn spawned(handle: EntityHandle, x: i16, y: i16) -> Self {
        Self {
            x,
            y,
            hitbox: Hitbox::default(),
            flags: Flags::SPAWNED,
            handle,
        }
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    /// Type id of the pool this entity lives in.
    pub fn kind(&self) -> u8 {
        self.handle.kind
    }

    pub fn is_active(&self) -> bool {
        self.flags.contains(Flags::ACTIVE)
    }

    pub fn is_collidable(&self) -> bool {
        self.flags.contains(Flags::ACTIVE | Flags::COLLIDABLE)
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(Flags::ACTIVE | Flags::VISIBLE)
    }

    pub fn set_collidable(&mut self, on: bool) {
        self.flags.set(Flags::COLLIDABLE, on);
    }

    pub fn set_visible(&mut self, on: bool) {
        self.flags.set(Flags::VISIBLE, on);
    }

    /// Give the slot back to the pool. Other fields keep their values until
    /// the slot is spawned again.
    pub fn retire(&mut self) {
        self.flags.remove(Flags::ACTIVE);
    }

    pub fn set_hitbox(&mut self, x: i8, y: i8, width: u8, height: u8) {
        self.hitbox = Hitbox::new(x, y, width, height);
    }

    /// Hitbox of the given size anchored at the entity position.
    pub fn set_hitbox_size(&mut self, width: u8, height: u8) {
        self.set_hitbox(0, 0, width, height);
    }

    pub fn left(&self) -> i32 {
        self.x as i32 + self.hitbox.x as i32
    }

    pub fn right(&self) -> i32 {
        self.left() + self.hitbox.width as i32
    }

    pub fn top(&self) -> i32 {
        self.y as i32 + self.hitbox.y as i32
    }

    pub fn bottom(&self) -> i32 {
        self.top() + self.hitbox.height as i32
    }

    /// Hitbox in world coordinates.
    pub fn hitbox_rect(&self) -> Rect {
        self.hitbox_at(self.x, self.y)
    }

    /// The hitbox as it would be with the entity at (x, y).
    pub fn hitbox_at(&self, x: i16, y: i16) -> Rect {
        Rect::new(
            x as i32 + self.hitbox.x as i32,
            y as i32 + self.hitbox.y as i32,
            self.hitbox.width as i32,
            self.hitbox.height as i32,
        )
    }

    /// Does the hitbox overlap the rectangle at (x, y) of size w x h?
    pub fn collides(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        self.collides_rect(&Rect::new(x, y, w, h))
    }

    pub fn collides_rect(&self, rect: &Rect) -> bool {
        self.hitbox_rect().overlaps(rect)
    }
}
