//! Fixed-capacity entity pools
//!
//! A pool is a boxed slice of slots allocated once at construction. Spawning
//! reuses the lowest inactive slot; retiring just clears the active flag.
//! Nothing here allocates after `EntityPool::new`.
//!
//! Pools of different actor types live side by side in a scene as
//! `Box<dyn AnyPool>`. Typed access goes through `as_any` downcasts.

use std::any::Any;

use super::actor::Actor;
use super::context::Context;
use super::entity::{Entity, EntityHandle, Rect};
use crate::input::ButtonSource;
use crate::rasterizer::Framebuffer;
use crate::scene::Camera;
use crate::slab::Slab;

/// One pool slot: engine state plus the actor that drives it.
#[derive(Debug, Clone)]
pub struct Slot<T> {
    pub entity: Entity,
    pub actor: T,
}

/// Mutable view of a live slot.
pub struct SlotMut<'a, T> {
    pub entity: &'a mut Entity,
    pub actor: &'a mut T,
}

impl<T> SlotMut<'_, T> {
    pub fn handle(&self) -> EntityHandle {
        self.entity.handle()
    }
}

/// Scene state visible to a pool while it updates.
///
/// The updating pool itself is taken out of `pools` for the duration.
pub struct Env<'a> {
    pub(crate) pools: &'a mut Slab<Box<dyn AnyPool>>,
    pub(crate) camera: &'a mut Camera,
    pub(crate) input: &'a dyn ButtonSource,
}

/// Reset a slot and run the actor's init hook.
fn spawn_slot<T: Actor + Default>(slot: &mut Slot<T>, handle: EntityHandle, x: i16, y: i16) {
    slot.entity = Entity::spawned(handle, x, y);
    slot.actor = T::default();
    slot.actor.on_init(&mut slot.entity);
}

/// First collidable entity overlapping `rect`, in slot order.
fn first_hit<'a, T: 'a>(slots: impl IntoIterator<Item = &'a Slot<T>>, rect: &Rect) -> Option<Entity> {
    slots
        .into_iter()
        .map(|slot| &slot.entity)
        .find(|entity| entity.is_collidable() && entity.collides_rect(rect))
        .copied()
}

/// Type-erased pool interface used by the scene.
pub trait AnyPool {
    /// Application type id, also the pool's index in the scene.
    fn kind(&self) -> u8;
    fn layer(&self) -> u8;
    fn capacity(&self) -> u16;
    fn active_count(&self) -> usize;
    fn actor_type_name(&self) -> &'static str;

    fn update(&mut self, env: &mut Env<'_>);
    /// Draw active visible entities offset by (x, y).
    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16);
    fn draw_debug(&mut self, fb: &mut Framebuffer, x: i16, y: i16);
    fn query(&self, rect: &Rect) -> Option<Entity>;

    fn spawn_at(&mut self, x: i16, y: i16) -> Option<EntityHandle>;
    /// Clear the active flag of `slot`. Returns whether it was active.
    fn remove(&mut self, slot: u16) -> bool;
    fn entity(&self, slot: u16) -> Option<&Entity>;
    fn slot_mut(&mut self, slot: u16) -> Option<(&mut Entity, &mut dyn Any)>;
    /// Retire every entity.
    fn clear(&mut self);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Homogeneous pool of `capacity` slots of actor type `T`.
pub struct EntityPool<T> {
    kind: u8,
    layer: u8,
    slots: Box<[Slot<T>]>,
}

impl<T: Actor + Default> EntityPool<T> {
    pub fn new(kind: u8, layer: u8, capacity: u16) -> Self {
        let slots = (0..capacity)
            .map(|slot| Slot {
                entity: Entity::vacant(EntityHandle::new(kind, slot)),
                actor: T::default(),
            })
            .collect();
        Self { kind, layer, slots }
    }

    /// Activate the lowest free slot at (x, y). `None` when the pool is full.
    pub fn spawn(&mut self, x: i16, y: i16) -> Option<SlotMut<'_, T>> {
        let Some(index) = self.slots.iter().position(|s| !s.entity.is_active()) else {
            log::trace!("pool {}: full, spawn refused", self.kind);
            return None;
        };
        let slot = &mut self.slots[index];
        spawn_slot(slot, EntityHandle::new(self.kind, index as u16), x, y);
        Some(SlotMut {
            entity: &mut slot.entity,
            actor: &mut slot.actor,
        })
    }

    /// Live slot by index.
    pub fn get(&self, slot: u16) -> Option<&Slot<T>> {
        self.slots.get(slot as usize).filter(|s| s.entity.is_active())
    }

    pub fn get_mut(&mut self, slot: u16) -> Option<SlotMut<'_, T>> {
        let slot = self.slots.get_mut(slot as usize)?;
        if !slot.entity.is_active() {
            return None;
        }
        Some(SlotMut {
            entity: &mut slot.entity,
            actor: &mut slot.actor,
        })
    }

    /// Live slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot<T>> {
        self.slots.iter().filter(|s| s.entity.is_active())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = SlotMut<'_, T>> {
        self.slots
            .iter_mut()
            .filter(|s| s.entity.is_active())
            .map(|s| SlotMut {
                entity: &mut s.entity,
                actor: &mut s.actor,
            })
    }
}

impl<T: Actor + Default> AnyPool for EntityPool<T> {
    fn kind(&self) -> u8 {
        self.kind
    }

    fn layer(&self) -> u8 {
        self.layer
    }

    fn capacity(&self) -> u16 {
        self.slots.len() as u16
    }

    fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.entity.is_active()).count()
    }

    fn actor_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn update(&mut self, env: &mut Env<'_>) {
        for index in 0..self.slots.len() {
            if !self.slots[index].entity.is_active() {
                continue;
            }
            // Everything but the current slot stays reachable through the context
            let (before, rest) = self.slots.split_at_mut(index);
            let Some((current, after)) = rest.split_first_mut() else { break };
            let mut local = LocalSlots {
                kind: self.kind,
                current: index,
                before,
                after,
            };
            let mut ctx = Context::new(env, Some(&mut local));
            current.actor.update(&mut current.entity, &mut ctx);
        }
    }

    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        for slot in self.slots.iter_mut().filter(|s| s.entity.is_visible()) {
            let (sx, sy) = (slot.entity.x.wrapping_add(x), slot.entity.y.wrapping_add(y));
            slot.actor.draw(&slot.entity, fb, sx, sy);
        }
    }

    fn draw_debug(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        for slot in self.slots.iter_mut().filter(|s| s.entity.is_active()) {
            let (sx, sy) = (slot.entity.x.wrapping_add(x), slot.entity.y.wrapping_add(y));
            slot.actor.draw_debug(&slot.entity, fb, sx, sy);
        }
    }

    fn query(&self, rect: &Rect) -> Option<Entity> {
        first_hit(self.slots.iter(), rect)
    }

    fn spawn_at(&mut self, x: i16, y: i16) -> Option<EntityHandle> {
        self.spawn(x, y).map(|slot| slot.handle())
    }

    fn remove(&mut self, slot: u16) -> bool {
        match self.slots.get_mut(slot as usize) {
            Some(s) if s.entity.is_active() => {
                s.entity.retire();
                true
            }
            _ => false,
        }
    }

    fn entity(&self, slot: u16) -> Option<&Entity> {
        self.get(slot).map(|s| &s.entity)
    }

    fn slot_mut(&mut self, slot: u16) -> Option<(&mut Entity, &mut dyn Any)> {
        let slot = self.get_mut(slot)?;
        Some((slot.entity, slot.actor as &mut dyn Any))
    }

    fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.entity.retire();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The updating pool's own slots, minus the one being updated.
pub(crate) trait LocalPool {
    fn kind(&self) -> u8;
    fn query(&self, rect: &Rect) -> Option<Entity>;
    fn spawn_at(&mut self, x: i16, y: i16) -> Option<EntityHandle>;
    fn remove(&mut self, slot: u16) -> bool;
    fn entity(&self, slot: u16) -> Option<&Entity>;
    fn slot_mut(&mut self, slot: u16) -> Option<(&mut Entity, &mut dyn Any)>;
}

struct LocalSlots<'s, T> {
    kind: u8,
    current: usize,
    before: &'s mut [Slot<T>],
    after: &'s mut [Slot<T>],
}

impl<T> LocalSlots<'_, T> {
    fn slot(&self, slot: u16) -> Option<&Slot<T>> {
        let slot = slot as usize;
        if slot < self.current {
            self.before.get(slot)
        } else if slot > self.current {
            self.after.get(slot - self.current - 1)
        } else {
            None
        }
    }

    fn slot_mut_raw(&mut self, slot: u16) -> Option<&mut Slot<T>> {
        let slot = slot as usize;
        if slot < self.current {
            self.before.get_mut(slot)
        } else if slot > self.current {
            self.after.get_mut(slot - self.current - 1)
        } else {
            None
        }
    }
}

impl<T: Actor + Default> LocalPool for LocalSlots<'_, T> {
    fn kind(&self) -> u8 {
        self.kind
    }

    fn query(&self, rect: &Rect) -> Option<Entity> {
        first_hit(self.before.iter().chain(self.after.iter()), rect)
    }

    /// The updating slot is never a candidate, even after it retired
    /// itself: its entity is borrowed by the running hook.
    fn spawn_at(&mut self, x: i16, y: i16) -> Option<EntityHandle> {
        let index = match self.before.iter().position(|s| !s.entity.is_active()) {
            Some(index) => index,
            None => {
                let Some(offset) = self.after.iter().position(|s| !s.entity.is_active()) else {
                    log::trace!("pool {}: full, spawn refused", self.kind);
                    return None;
                };
                self.current + 1 + offset
            }
        };
        let handle = EntityHandle::new(self.kind, index as u16);
        let slot = self.slot_mut_raw(handle.slot)?;
        spawn_slot(slot, handle, x, y);
        Some(handle)
    }

    fn remove(&mut self, slot: u16) -> bool {
        match self.slot_mut_raw(slot) {
            Some(s) if s.entity.is_active() => {
                s.entity.retire();
                true
            }
            _ => false,
        }
    }

    fn entity(&self, slot: u16) -> Option<&Entity> {
        self.slot(slot).map(|s| &s.entity).filter(|e| e.is_active())
    }

    fn slot_mut(&mut self, slot: u16) -> Option<(&mut Entity, &mut dyn Any)> {
        let slot = self.slot_mut_raw(slot)?;
        if !slot.entity.is_active() {
            return None;
        }
        Some((&mut slot.entity, &mut slot.actor as &mut dyn Any))
    }
}
