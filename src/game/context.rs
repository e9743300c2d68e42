//! What an actor can reach while it updates
//!
//! A [`Context`] borrows the scene for the length of one actor hook. The
//! pool that is currently updating has been taken out of the scene; its
//! other slots are reachable through `local`, the updating slot itself is
//! not reachable at all.

use std::any::Any;

use super::actor::Actor;
use super::entity::{Entity, EntityHandle, Rect};
use super::pool::{AnyPool, Env, LocalPool};
use crate::input::ButtonSource;
use crate::scene::Camera;
use crate::slab::Slab;

pub struct Context<'a> {
    pools: &'a mut Slab<Box<dyn AnyPool>>,
    camera: &'a mut Camera,
    input: &'a dyn ButtonSource,
    local: Option<&'a mut dyn LocalPool>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(env: &'a mut Env<'_>, local: Option<&'a mut dyn LocalPool>) -> Self {
        Self {
            pools: &mut *env.pools,
            camera: &mut *env.camera,
            input: env.input,
            local,
        }
    }

    fn is_local(&self, kind: u8) -> bool {
        self.local.as_ref().is_some_and(|local| local.kind() == kind)
    }

    /// First collidable entity of type `kind` overlapping `rect`.
    ///
    /// Unknown type ids are a miss, not an error.
    pub fn query_rect(&self, rect: &Rect, kind: u8) -> Option<Entity> {
        if let Some(local) = self.local.as_deref().filter(|local| local.kind() == kind) {
            return local.query(rect);
        }
        self.pools.get(kind as usize)?.query(rect)
    }

    pub fn query(&self, x: i16, y: i16, w: u16, h: u16, kind: u8) -> Option<Entity> {
        self.query_rect(&Rect::new(x as i32, y as i32, w as i32, h as i32), kind)
    }

    /// Try each type id in order; the first type with a hit wins.
    pub fn query_any(&self, rect: &Rect, kinds: &[u8]) -> Option<Entity> {
        kinds.iter().find_map(|&kind| self.query_rect(rect, kind))
    }

    /// Query with `entity`'s own hitbox placed at (x, y).
    pub fn query_hitbox(&self, entity: &Entity, x: i16, y: i16, kinds: &[u8]) -> Option<Entity> {
        self.query_any(&entity.hitbox_at(x, y), kinds)
    }

    /// Live entity behind a handle.
    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        if self.is_local(handle.kind) {
            return self.local.as_deref()?.entity(handle.slot);
        }
        self.pools.get(handle.kind as usize)?.entity(handle.slot)
    }

    /// Retire another entity. The updating entity retires itself with
    /// [`Entity::retire`].
    pub fn retire(&mut self, handle: EntityHandle) -> bool {
        if self.is_local(handle.kind) {
            return self.local.as_deref_mut().is_some_and(|local| local.remove(handle.slot));
        }
        self.pools
            .get_mut(handle.kind as usize)
            .is_some_and(|pool| pool.remove(handle.slot))
    }

    /// Spawn into any pool, the updating one included.
    pub fn spawn(&mut self, kind: u8, x: i16, y: i16) -> Option<EntityHandle> {
        if self.is_local(kind) {
            return self.local.as_deref_mut()?.spawn_at(x, y);
        }
        self.pools.get_mut(kind as usize)?.spawn_at(x, y)
    }

    /// Spawn, then configure the new slot through its concrete actor type.
    pub fn spawn_with<A, F>(&mut self, kind: u8, x: i16, y: i16, setup: F) -> Option<EntityHandle>
    where
        A: Actor,
        F: FnOnce(&mut Entity, &mut A),
    {
        let handle = self.spawn(kind, x, y)?;
        if let Some((entity, actor)) = self.get_mut::<A>(handle) {
            setup(entity, actor);
        }
        Some(handle)
    }

    /// Typed access to another live entity.
    pub fn get_mut<A: Actor>(&mut self, handle: EntityHandle) -> Option<(&mut Entity, &mut A)> {
        let slot = if self.is_local(handle.kind) {
            self.local.as_deref_mut()?.slot_mut(handle.slot)
        } else {
            self.pools.get_mut(handle.kind as usize)?.slot_mut(handle.slot)
        };
        let (entity, actor) = slot?;
        downcast_actor(entity, actor, handle)
    }

    pub fn camera(&self) -> &Camera {
        &*self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut *self.camera
    }

    pub fn input(&self) -> &dyn ButtonSource {
        self.input
    }
}

pub(crate) fn downcast_actor<'e, A: Actor>(
    entity: &'e mut Entity,
    actor: &'e mut dyn Any,
    handle: EntityHandle,
) -> Option<(&'e mut Entity, &'e mut A)> {
    match actor.downcast_mut::<A>() {
        Some(actor) => Some((entity, actor)),
        None => {
            log::warn!(
                "entity {}:{} is not a {}",
                handle.kind,
                handle.slot,
                std::any::type_name::<A>()
            );
            None
        }
    }
}
