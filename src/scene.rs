//! Scene: pools, render layers and the camera for one gameplay context
//!
//! Pools are indexed by their type id, render lists by layer number. Both
//! tables are [`Slab`]s, so sparse ids work without pre-sizing and an
//! unknown type id is simply an empty slot.
//!
//! Per frame:
//! - `update` runs every pool in type-id order
//! - `draw` clears the buffer and walks layers in ascending order, drawing
//!   each entry at the negated camera offset
//!
//! `init` rebuilds the layer lists from the registered pools and then runs
//! the scene's [`SceneHooks`].

use std::any::Any;

use crate::error::SlabError;
use crate::game::{Actor, AnyPool, Entity, EntityHandle, EntityPool, Env, Rect};
use crate::input::ButtonSource;
use crate::rasterizer::{Color, Framebuffer, Renderable};
use crate::slab::Slab;

/// World-space position of the top-left corner of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Camera {
    pub x: i16,
    pub y: i16,
}

impl Camera {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Draw offset for world-space renderables.
    pub fn offset(&self) -> (i16, i16) {
        (self.x.wrapping_neg(), self.y.wrapping_neg())
    }
}

/// Where a non-pool renderable was added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle {
    pub layer: u8,
    index: usize,
}

/// Renderables stored in layers keep their concrete type reachable.
trait SceneRenderable: Renderable {
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<R: Renderable + Any> SceneRenderable for R {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

enum LayerEntry {
    /// Drawn through the pool registered under this type id
    Pool(u8),
    Renderable(Box<dyn SceneRenderable>),
}

/// Scene-specific setup, run at the end of [`Scene::init`].
pub trait SceneHooks {
    fn on_init(&mut self, scene: &mut Scene) -> Result<(), SlabError>;
}

impl<F> SceneHooks for F
where
    F: FnMut(&mut Scene) -> Result<(), SlabError>,
{
    fn on_init(&mut self, scene: &mut Scene) -> Result<(), SlabError> {
        self(scene)
    }
}

pub struct Scene {
    pools: Slab<Box<dyn AnyPool>>,
    layers: Slab<Vec<LayerEntry>>,
    pub camera: Camera,
    pub clear_color: Color,
    hooks: Option<Box<dyn SceneHooks>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            pools: Slab::new(),
            layers: Slab::new(),
            camera: Camera::default(),
            clear_color: Color::BLACK,
            hooks: None,
        }
    }

    pub fn with_hooks(hooks: impl SceneHooks + 'static) -> Self {
        let mut scene = Self::new();
        scene.set_hooks(hooks);
        scene
    }

    pub fn set_hooks(&mut self, hooks: impl SceneHooks + 'static) {
        self.hooks = Some(Box::new(hooks));
    }

    // =========================================================================
    // Pools
    // =========================================================================

    /// Register a pool under its type id, replacing any previous one.
    ///
    /// Call [`Scene::init`] afterwards to put it into its layer.
    pub fn register_pool<P: AnyPool + 'static>(&mut self, pool: P) -> Result<Option<Box<dyn AnyPool>>, SlabError> {
        self.register_boxed(Box::new(pool))
    }

    pub fn register_boxed(&mut self, pool: Box<dyn AnyPool>) -> Result<Option<Box<dyn AnyPool>>, SlabError> {
        log::debug!(
            "register pool {} ({}, layer {}, capacity {})",
            pool.kind(),
            pool.actor_type_name(),
            pool.layer(),
            pool.capacity()
        );
        let kind = pool.kind() as usize;
        self.pools.insert(kind, pool)
    }

    /// Take a pool out of the scene, e.g. to carry it into the next one.
    pub fn unregister_pool(&mut self, kind: u8) -> Option<Box<dyn AnyPool>> {
        let pool = self.pools.take(kind as usize)?;
        if let Some(entries) = self.layers.get_mut(pool.layer() as usize) {
            entries.retain(|entry| !matches!(entry, LayerEntry::Pool(k) if *k == kind));
        }
        Some(pool)
    }

    pub fn pool_dyn(&self, kind: u8) -> Option<&dyn AnyPool> {
        self.pools.get(kind as usize).map(|pool| pool.as_ref())
    }

    /// Typed access to the pool registered under `kind`.
    pub fn pool<T: Actor + Default>(&self, kind: u8) -> Option<&EntityPool<T>> {
        self.pools.get(kind as usize)?.as_any().downcast_ref()
    }

    pub fn pool_mut<T: Actor + Default>(&mut self, kind: u8) -> Option<&mut EntityPool<T>> {
        self.pools.get_mut(kind as usize)?.as_any_mut().downcast_mut()
    }

    /// Number of live entities across all pools.
    pub fn active_entities(&self) -> usize {
        self.pools.iter().map(|(_, pool)| pool.active_count()).sum()
    }

    // =========================================================================
    // Layers
    // =========================================================================

    fn push_entry(&mut self, layer: u8, entry: LayerEntry) -> Result<usize, SlabError> {
        let entries = self.layers.slot_mut(layer as usize)?.get_or_insert_with(Vec::new);
        entries.try_reserve(1).map_err(|source| SlabError::Alloc {
            requested: entries.len() + 1,
            source,
        })?;
        entries.push(entry);
        Ok(entries.len() - 1)
    }

    /// Append a renderable to `layer`, after everything already there.
    pub fn add<R: Renderable + 'static>(&mut self, renderable: R, layer: u8) -> Result<RenderHandle, SlabError> {
        let index = self.push_entry(layer, LayerEntry::Renderable(Box::new(renderable)))?;
        Ok(RenderHandle { layer, index })
    }

    /// The renderable behind `handle`, if it is an `R`.
    pub fn renderable_mut<R: Renderable + 'static>(&mut self, handle: RenderHandle) -> Option<&mut R> {
        match self.layers.get_mut(handle.layer as usize)?.get_mut(handle.index)? {
            LayerEntry::Renderable(renderable) => renderable.as_any_mut().downcast_mut(),
            LayerEntry::Pool(_) => None,
        }
    }

    /// Rebuild the layer lists from the registered pools, then run the hooks.
    pub fn init(&mut self) -> Result<(), SlabError> {
        self.layers.clear();
        for kind in 0..self.pools.len() {
            let Some(layer) = self.pools.get(kind).map(|pool| pool.layer()) else { continue };
            self.push_entry(layer, LayerEntry::Pool(kind as u8))?;
        }

        if let Some(mut hooks) = self.hooks.take() {
            let result = hooks.on_init(self);
            self.hooks = Some(hooks);
            result?;
        }

        log::debug!(
            "scene init: {} pools, {} layers",
            self.pools.iter().count(),
            self.layers.iter().count()
        );
        Ok(())
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Update every pool in type-id order.
    pub fn update(&mut self, input: &dyn ButtonSource) {
        for kind in 0..self.pools.len() {
            let Some(mut pool) = self.pools.take(kind) else { continue };
            let mut env = Env {
                pools: &mut self.pools,
                camera: &mut self.camera,
                input,
            };
            pool.update(&mut env);
            if let Some(slot) = self.pools.get_slot_mut(kind) {
                *slot = Some(pool);
            }
        }
    }

    /// Clear and draw every layer in ascending order.
    pub fn draw(&mut self, fb: &mut Framebuffer) {
        fb.clear(self.clear_color);
        let (x, y) = self.camera.offset();
        let pools = &mut self.pools;
        for (_, entries) in self.layers.iter_mut() {
            for entry in entries.iter_mut() {
                match entry {
                    LayerEntry::Pool(kind) => {
                        if let Some(pool) = pools.get_mut(*kind as usize) {
                            pool.draw(fb, x, y);
                        }
                    }
                    LayerEntry::Renderable(renderable) => renderable.draw(fb, x, y),
                }
            }
        }
    }

    /// Hitboxes and origins of every active entity, in layer order.
    pub fn draw_debug(&mut self, fb: &mut Framebuffer) {
        let (x, y) = self.camera.offset();
        let pools = &mut self.pools;
        for (_, entries) in self.layers.iter() {
            for entry in entries {
                if let LayerEntry::Pool(kind) = entry {
                    if let Some(pool) = pools.get_mut(*kind as usize) {
                        pool.draw_debug(fb, x, y);
                    }
                }
            }
        }
    }

    // =========================================================================
    // Queries and entity access
    // =========================================================================

    pub fn query_rect(&self, rect: &Rect, kind: u8) -> Option<Entity> {
        self.pools.get(kind as usize)?.query(rect)
    }

    /// First collidable entity of type `kind` overlapping the rectangle.
    pub fn query(&self, x: i16, y: i16, w: u16, h: u16, kind: u8) -> Option<Entity> {
        self.query_rect(&Rect::new(x as i32, y as i32, w as i32, h as i32), kind)
    }

    /// Try each type id in order; the first type with a hit wins.
    pub fn query_any(&self, rect: &Rect, kinds: &[u8]) -> Option<Entity> {
        kinds.iter().find_map(|&kind| self.query_rect(rect, kind))
    }

    pub fn spawn(&mut self, kind: u8, x: i16, y: i16) -> Option<EntityHandle> {
        self.pools.get_mut(kind as usize)?.spawn_at(x, y)
    }

    pub fn entity(&self, handle: EntityHandle) -> Option<&Entity> {
        self.pools.get(handle.kind as usize)?.entity(handle.slot)
    }

    pub fn get_mut<A: Actor>(&mut self, handle: EntityHandle) -> Option<(&mut Entity, &mut A)> {
        let (entity, actor) = self.pools.get_mut(handle.kind as usize)?.slot_mut(handle.slot)?;
        crate::game::context::downcast_actor(entity, actor, handle)
    }

    pub fn retire(&mut self, handle: EntityHandle) -> bool {
        self.pools
            .get_mut(handle.kind as usize)
            .is_some_and(|pool| pool.remove(handle.slot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Context;
    use crate::input::ButtonSnapshot;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Dot;

    impl Actor for Dot {
        fn on_init(&mut self, entity: &mut Entity) {
            entity.set_hitbox_size(1, 1);
        }

        fn draw(&mut self, _entity: &Entity, fb: &mut Framebuffer, x: i16, y: i16) {
            fb.set_pixel(x as i32, y as i32, Color::WHITE);
        }
    }

    /// Counts frames and reports how many dots it can see.
    #[derive(Default)]
    struct Watcher {
        frames: u8,
        seen: bool,
    }

    impl Actor for Watcher {
        fn update(&mut self, _entity: &mut Entity, ctx: &mut Context<'_>) {
            self.frames += 1;
            self.seen = ctx.query(0, 0, 100, 100, 0).is_some();
            ctx.camera_mut().x += 1;
        }
    }

    fn logger(log: &Rc<RefCell<Vec<u8>>>, tag: u8) -> impl FnMut(&mut Framebuffer, i16, i16) {
        let log = Rc::clone(log);
        move |_fb, _x, _y| log.borrow_mut().push(tag)
    }

    #[test]
    fn test_layers_draw_in_ascending_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scene = Scene::new();
        scene.add(logger(&log, 0), 0).unwrap();
        scene.add(logger(&log, 2), 2).unwrap();
        scene.add(logger(&log, 1), 1).unwrap();
        scene.add(logger(&log, 3), 1).unwrap();

        let mut fb = Framebuffer::new(4, 4);
        scene.draw(&mut fb);
        assert_eq!(*log.borrow(), vec![0, 1, 3, 2]);
    }

    #[test]
    fn test_init_rebuilds_layers_and_runs_hooks() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let hook_log = Rc::clone(&log);
        let mut scene = Scene::with_hooks(move |scene: &mut Scene| -> Result<(), SlabError> {
            scene.add(logger(&hook_log, 7), 1)?;
            scene.spawn(0, 1, 1);
            Ok(())
        });
        scene.register_pool(EntityPool::<Dot>::new(0, 0, 4)).unwrap();
        scene.add(logger(&log, 9), 0).unwrap();

        scene.init().unwrap();
        let mut fb = Framebuffer::new(4, 4);
        scene.draw(&mut fb);
        // The pre-init renderable is gone; the hook's one and the pool remain
        assert_eq!(*log.borrow(), vec![7]);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::WHITE));
        assert_eq!(scene.active_entities(), 1);

        // Running init again keeps exactly one entry per pool
        scene.init().unwrap();
        assert_eq!(scene.active_entities(), 2);
        log.borrow_mut().clear();
        scene.draw(&mut fb);
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn test_camera_offset_is_negated() {
        let mut scene = Scene::new();
        scene.register_pool(EntityPool::<Dot>::new(0, 0, 1)).unwrap();
        scene.init().unwrap();
        scene.spawn(0, 5, 5).unwrap();
        scene.camera = Camera::new(2, 1);
        scene.clear_color = Color::BLUE;

        let mut fb = Framebuffer::new(8, 8);
        scene.draw(&mut fb);
        assert_eq!(fb.get_pixel(3, 4), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(5, 5), Some(Color::BLUE));
    }

    #[test]
    fn test_queries_and_unknown_type_ids() {
        let mut scene = Scene::new();
        scene.register_pool(EntityPool::<Dot>::new(0, 0, 2)).unwrap();
        scene.register_pool(EntityPool::<Dot>::new(5, 0, 2)).unwrap();
        scene.spawn(0, 3, 3).unwrap();
        scene.spawn(5, 3, 3).unwrap();

        assert_eq!(scene.query(3, 3, 1, 1, 5).unwrap().kind(), 5);
        assert!(scene.query(3, 3, 1, 1, 2).is_none());
        assert!(scene.query(3, 3, 1, 1, 250).is_none());
        assert!(scene.spawn(250, 0, 0).is_none());

        let area = Rect::new(0, 0, 10, 10);
        assert_eq!(scene.query_any(&area, &[9, 5, 0]).unwrap().kind(), 5);
        assert_eq!(scene.query_any(&area, &[0, 5]).unwrap().kind(), 0);
    }

    #[test]
    fn test_update_sees_other_pools_and_camera() {
        let mut scene = Scene::new();
        scene.register_pool(EntityPool::<Dot>::new(0, 0, 1)).unwrap();
        scene.register_pool(EntityPool::<Watcher>::new(1, 0, 1)).unwrap();
        let watcher = scene.spawn(1, 0, 0).unwrap();

        let input = ButtonSnapshot::default();
        scene.update(&input);
        assert!(!scene.get_mut::<Watcher>(watcher).unwrap().1.seen);

        scene.spawn(0, 4, 4).unwrap();
        scene.update(&input);
        let (_, state) = scene.get_mut::<Watcher>(watcher).unwrap();
        assert!(state.seen);
        assert_eq!(state.frames, 2);
        assert_eq!(scene.camera.x, 2);
        // Pools are back in place after the update
        assert!(scene.pool::<Watcher>(1).is_some());
        assert!(scene.pool::<Dot>(1).is_none());
    }

    #[test]
    fn test_unregister_moves_pool_between_scenes() {
        let mut first = Scene::new();
        first.register_pool(EntityPool::<Dot>::new(3, 2, 4)).unwrap();
        first.init().unwrap();
        first.spawn(3, 1, 1).unwrap();

        let pool = first.unregister_pool(3).unwrap();
        assert!(first.query(1, 1, 1, 1, 3).is_none());

        let mut second = Scene::new();
        second.register_boxed(pool).unwrap();
        second.init().unwrap();
        assert!(second.query(1, 1, 1, 1, 3).is_some());
        assert_eq!(second.pool_dyn(3).map(|p| p.layer()), Some(2));
    }

    #[test]
    fn test_renderable_mut_and_retire() {
        let mut scene = Scene::new();
        let handle = scene.add(crate::rasterizer::Sprite::default(), 0).unwrap();
        scene.renderable_mut::<crate::rasterizer::Sprite>(handle).unwrap().frame = 4;
        assert_eq!(scene.renderable_mut::<crate::rasterizer::Sprite>(handle).unwrap().frame, 4);
        assert!(scene.renderable_mut::<crate::rasterizer::Anim>(handle).is_none());

        scene.register_pool(EntityPool::<Dot>::new(0, 0, 1)).unwrap();
        let dot = scene.spawn(0, 0, 0).unwrap();
        assert!(scene.retire(dot));
        assert!(scene.entity(dot).is_none());
        assert!(scene.spawn(0, 0, 0).is_some());
    }

    #[test]
    fn test_draw_debug_outlines_hitboxes() {
        let mut scene = Scene::new();
        scene.register_pool(EntityPool::<Dot>::new(0, 0, 1)).unwrap();
        scene.init().unwrap();
        let dot = scene.spawn(0, 2, 2).unwrap();
        scene.get_mut::<Dot>(dot).unwrap().0.set_hitbox(-1, -1, 3, 3);

        let mut fb = Framebuffer::new(6, 6);
        scene.draw_debug(&mut fb);
        assert_eq!(fb.get_pixel(1, 1), Some(Color::LIGHT_BLUE));
        assert_eq!(fb.get_pixel(2, 2), Some(Color::RED));
        assert_eq!(fb.get_pixel(3, 3), Some(Color::LIGHT_BLUE));
    }
}
