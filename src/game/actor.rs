//! Per-type game object behaviour

use super::context::Context;
use super::entity::Entity;
use crate::rasterizer::{Color, Framebuffer};

/// Behaviour of one kind of game object.
///
/// An actor is stored next to its [`Entity`] in a pool slot. Pools hand both
/// halves to the hooks below; every hook has a do-nothing default.
///
/// Actors must be `Default`: spawning a slot replaces the previous occupant
/// with `Default::default()` before `on_init` runs, so no state leaks from a
/// retired object into the next one.
pub trait Actor: 'static {
    /// Called right after the slot is spawned.
    fn on_init(&mut self, _entity: &mut Entity) {}

    /// Called once per frame while the entity is active.
    fn update(&mut self, _entity: &mut Entity, _ctx: &mut Context<'_>) {}

    /// Draw at screen position (x, y), the entity position already applied.
    fn draw(&mut self, _entity: &Entity, _fb: &mut Framebuffer, _x: i16, _y: i16) {}

    /// Debug overlay: hitbox outline and origin pixel.
    fn draw_debug(&mut self, entity: &Entity, fb: &mut Framebuffer, x: i16, y: i16) {
        let hb = entity.hitbox;
        fb.draw_rect(
            x as i32 + hb.x as i32,
            y as i32 + hb.y as i32,
            hb.width as i32,
            hb.height as i32,
            Color::LIGHT_BLUE,
        );
        fb.set_pixel(x as i32, y as i32, Color::RED);
    }

    /// A filtered horizontal move ran into `other`. Return `true` to stop.
    fn on_move_collide_x(&mut self, _entity: &mut Entity, _other: &Entity, _ctx: &mut Context<'_>) -> bool {
        true
    }

    /// A filtered vertical move ran into `other`. Return `true` to stop.
    fn on_move_collide_y(&mut self, _entity: &mut Entity, _other: &Entity, _ctx: &mut Context<'_>) -> bool {
        true
    }
}
