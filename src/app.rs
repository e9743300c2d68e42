//! Runtime state
//!
//! One [`Runtime`] owns everything a running game needs: the frame buffer,
//! the frame pacer, the debug level and the current scene. Hosts create it
//! from a [`RuntimeConfig`] and call [`Runtime::update`] once per frame.

use crate::config::RuntimeConfig;
use crate::error::SlabError;
use crate::input::ButtonSource;
use crate::pacer::{FramePacer, FrameStats};
use crate::rasterizer::{Color, Framebuffer};
use crate::scene::Scene;

/// Debug levels cycle 0 -> 1 -> 2 -> 0
const DEBUG_LEVELS: u8 = 3;

pub struct Runtime {
    config: RuntimeConfig,
    fb: Framebuffer,
    pacer: FramePacer,
    scene: Option<Scene>,
    /// 0 = off, 1 = text overlay, 2 = overlay + hitboxes
    debug: u8,
    last_stats: FrameStats,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        let (width, height) = config.screen_size();
        log::info!(
            "runtime start: {}x{} @ {}",
            width,
            height,
            match config.frame_rate {
                0 => "unlocked".to_string(),
                fps => format!("{fps} fps"),
            }
        );
        Self {
            fb: Framebuffer::new(width, height),
            pacer: FramePacer::new(config.frame_rate),
            scene: None,
            debug: 0,
            last_stats: FrameStats::default(),
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    // =========================================================================
    // Scene
    // =========================================================================

    /// Initialise `scene` and make it current. The previous scene is dropped.
    ///
    /// A scene that still has the default black clear color picks up the
    /// configured one.
    pub fn set_scene(&mut self, mut scene: Scene) -> Result<(), SlabError> {
        if scene.clear_color == Color::BLACK {
            scene.clear_color = self.config.clear_color;
        }
        scene.init()?;
        log::info!(
            "scene set ({} live entities, replacing: {})",
            scene.active_entities(),
            self.scene.is_some()
        );
        self.scene = Some(scene);
        Ok(())
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Remove the current scene, leaving the runtime with nothing to run.
    pub fn take_scene(&mut self) -> Option<Scene> {
        self.scene.take()
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// One host frame: wait for the frame slot, then [`Runtime::tick`].
    pub fn update(&mut self, input: &dyn ButtonSource) {
        self.last_stats = self.pacer.begin_frame();
        self.tick(input);
    }

    /// Everything in a frame except the wait.
    pub fn tick(&mut self, input: &dyn ButtonSource) {
        if input.pressed(self.config.debug_button) {
            self.debug = (self.debug + 1) % DEBUG_LEVELS;
        }

        let Some(scene) = self.scene.as_mut() else {
            self.fb.clear(self.config.clear_color);
            return;
        };
        scene.update(input);
        scene.draw(&mut self.fb);
        if self.debug > 1 {
            scene.draw_debug(&mut self.fb);
        }
    }

    pub fn debug_level(&self) -> u8 {
        self.debug
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Debug overlay text, empty while the overlay is off.
    pub fn overlay_lines(&self) -> Vec<String> {
        if self.debug == 0 {
            return Vec::new();
        }
        let mut lines = vec![format!("cpu {:.0}%", self.last_stats.cpu_load)];
        if let Some(usage) = memory_stats::memory_stats() {
            lines.push(format!("ram {}k", usage.physical_mem / 1024));
        }
        let live = self.scene.as_ref().map_or(0, Scene::active_entities);
        lines.push(format!("ent {live}"));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Actor, Context, Entity, EntityPool};
    use crate::input::{Button, ButtonSnapshot};

    #[derive(Default)]
    struct Faller;

    impl Actor for Faller {
        fn on_init(&mut self, entity: &mut Entity) {
            entity.set_hitbox_size(2, 2);
        }

        fn update(&mut self, entity: &mut Entity, _ctx: &mut Context<'_>) {
            entity.y += 1;
        }

        fn draw(&mut self, _entity: &Entity, fb: &mut crate::rasterizer::Framebuffer, x: i16, y: i16) {
            fb.set_pixel(x as i32, y as i32, Color::YELLOW);
        }
    }

    fn runtime() -> Runtime {
        Runtime::new(RuntimeConfig {
            frame_rate: 0,
            width: 8,
            height: 8,
            clear_color: Color::DARK_BLUE,
            ..RuntimeConfig::default()
        })
    }

    fn scene() -> Scene {
        let mut pool: EntityPool<Faller> = EntityPool::new(0, 0, 4);
        pool.spawn(1, 0).unwrap();
        let mut scene = Scene::new();
        scene.register_pool(pool).unwrap();
        scene
    }

    #[test]
    fn test_tick_updates_then_draws() {
        let mut rt = runtime();
        rt.set_scene(scene()).unwrap();
        let input = ButtonSnapshot::default();
        rt.tick(&input);

        let fb = rt.framebuffer();
        assert_eq!(fb.get_pixel(1, 1), Some(Color::YELLOW));
        assert_eq!(fb.get_pixel(1, 0), Some(Color::DARK_BLUE));
    }

    #[test]
    fn test_without_scene_only_clears() {
        let mut rt = runtime();
        rt.tick(&ButtonSnapshot::default());
        assert!(rt.framebuffer().pixels.iter().all(|&p| p == Color::DARK_BLUE.0));
        assert!(rt.take_scene().is_none());
    }

    #[test]
    fn test_debug_button_cycles() {
        let mut rt = runtime();
        rt.set_scene(scene()).unwrap();
        let mut input = ButtonSnapshot::default();
        let mut levels = Vec::new();
        for _ in 0..3 {
            input.advance(Button::Menu.mask());
            rt.tick(&input);
            levels.push(rt.debug_level());
            // Held: no new press
            input.advance(Button::Menu.mask());
            rt.tick(&input);
            input.advance(0);
            rt.tick(&input);
        }
        assert_eq!(levels, vec![1, 2, 0]);
    }

    #[test]
    fn test_debug_level_two_draws_hitboxes() {
        let mut rt = runtime();
        rt.set_scene(scene()).unwrap();
        let mut input = ButtonSnapshot::default();
        for _ in 0..2 {
            input.advance(Button::Menu.mask());
            rt.tick(&input);
            input.advance(0);
        }
        assert_eq!(rt.debug_level(), 2);
        // Origin pixel drawn over the sprite
        let fb = rt.framebuffer();
        assert!(fb.pixels.contains(&Color::RED.0));
        assert!(fb.pixels.contains(&Color::LIGHT_BLUE.0));
    }

    #[test]
    fn test_overlay_lines() {
        let mut rt = runtime();
        rt.set_scene(scene()).unwrap();
        assert!(rt.overlay_lines().is_empty());

        let mut input = ButtonSnapshot::default();
        input.advance(Button::Menu.mask());
        rt.update(&input);
        let lines = rt.overlay_lines();
        assert!(lines[0].starts_with("cpu"));
        assert_eq!(lines.last().map(String::as_str), Some("ent 1"));
    }

    #[test]
    fn test_scene_picks_up_config_color() {
        let mut rt = runtime();
        rt.set_scene(Scene::new()).unwrap();
        assert_eq!(rt.scene().map(|s| s.clear_color), Some(Color::DARK_BLUE));

        let mut custom = Scene::new();
        custom.clear_color = Color::PINK;
        rt.set_scene(custom).unwrap();
        assert_eq!(rt.scene().map(|s| s.clear_color), Some(Color::PINK));
    }
}
