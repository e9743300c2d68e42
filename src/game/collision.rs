//! Pixel-stepped collide-and-move
//!
//! A filtered move walks one pixel at a time, x first, then y. Before each
//! step the mover's hitbox is queried at the next position against the
//! filter's type ids (in priority order). On a hit the actor's per-axis hook
//! decides: blocking stops that axis, anything else lets the step happen.
//! No axis ever jumps past an obstacle.

use super::actor::Actor;
use super::context::Context;
use super::entity::Entity;

/// Which axes were stopped by a blocking collision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blocked {
    pub x: bool,
    pub y: bool,
}

impl Blocked {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

#[derive(Clone, Copy)]
enum Axis {
    X,
    Y,
}

impl Context<'_> {
    /// Move `entity` by (dx, dy), stepping through the types in `kinds`.
    ///
    /// An empty `kinds` moves by the full delta without any checks.
    pub fn move_by<A: Actor + ?Sized>(
        &mut self,
        actor: &mut A,
        entity: &mut Entity,
        dx: i16,
        dy: i16,
        kinds: &[u8],
    ) -> Blocked {
        if kinds.is_empty() {
            entity.x = entity.x.wrapping_add(dx);
            entity.y = entity.y.wrapping_add(dy);
            return Blocked::default();
        }
        Blocked {
            x: self.step_axis(actor, entity, Axis::X, dx, kinds),
            y: self.step_axis(actor, entity, Axis::Y, dy, kinds),
        }
    }

    /// Move `entity` to (x, y) the same way as [`Context::move_by`].
    pub fn move_to<A: Actor + ?Sized>(
        &mut self,
        actor: &mut A,
        entity: &mut Entity,
        x: i16,
        y: i16,
        kinds: &[u8],
    ) -> Blocked {
        let (dx, dy) = (x.wrapping_sub(entity.x), y.wrapping_sub(entity.y));
        self.move_by(actor, entity, dx, dy, kinds)
    }

    /// Returns true when a blocking hit stopped the axis early.
    fn step_axis<A: Actor + ?Sized>(
        &mut self,
        actor: &mut A,
        entity: &mut Entity,
        axis: Axis,
        delta: i16,
        kinds: &[u8],
    ) -> bool {
        let sign = delta.signum();
        for _ in 0..delta.unsigned_abs() {
            let (nx, ny) = match axis {
                Axis::X => (entity.x.wrapping_add(sign), entity.y),
                Axis::Y => (entity.x, entity.y.wrapping_add(sign)),
            };
            if let Some(other) = self.query_hitbox(entity, nx, ny, kinds) {
                let blocking = match axis {
                    Axis::X => actor.on_move_collide_x(entity, &other, self),
                    Axis::Y => actor.on_move_collide_y(entity, &other, self),
                };
                if blocking {
                    return true;
                }
            }
            // The hook may have moved the entity; step from where it is now
            match axis {
                Axis::X => entity.x = entity.x.wrapping_add(sign),
                Axis::Y => entity.y = entity.y.wrapping_add(sign),
            }
        }
        false
    }
}
