//! Desktop host
//!
//! Drives a [`Runtime`] inside a macroquad window: input is polled into a
//! button snapshot, the runtime runs one frame, and the frame buffer is
//! uploaded to a nearest-filtered texture scaled to fit the window.

use macroquad::prelude::{
    clear_background, draw_text, draw_texture_ex, next_frame, screen_height, screen_width, DrawTextureParams,
    FilterMode, Texture2D, Vec2, BLACK, WHITE,
};

use crate::app::Runtime;
use crate::input::InputState;
use crate::rasterizer::Framebuffer;

/// Overlay text size in window pixels
const OVERLAY_FONT_SIZE: f32 = 16.0;

/// Uploads the frame buffer and draws it letterboxed.
pub struct Presenter {
    texture: Option<Texture2D>,
    rgba: Vec<u8>,
    size: (usize, usize),
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            texture: None,
            rgba: Vec::new(),
            size: (0, 0),
        }
    }

    /// Largest whole-pixel scale that fits, centred. Returns (x, y, w, h).
    fn dest_rect(fb_w: usize, fb_h: usize, win_w: f32, win_h: f32) -> (f32, f32, f32, f32) {
        let (fw, fh) = (fb_w.max(1) as f32, fb_h.max(1) as f32);
        let scale = (win_w / fw).min(win_h / fh).floor().max(1.0);
        let (w, h) = (fw * scale, fh * scale);
        ((win_w - w) / 2.0, (win_h - h) / 2.0, w, h)
    }

    pub fn present(&mut self, fb: &Framebuffer) {
        let size = (fb.width, fb.height);
        self.rgba.resize(fb.width * fb.height * 4, 0);
        fb.to_rgba(&mut self.rgba);

        match self.texture.as_ref() {
            Some(texture) if self.size == size => {
                texture.update_from_bytes(fb.width as u32, fb.height as u32, &self.rgba);
            }
            _ => {
                let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &self.rgba);
                texture.set_filter(FilterMode::Nearest);
                self.texture = Some(texture);
                self.size = size;
            }
        }
        let Some(texture) = self.texture.as_ref() else { return };

        clear_background(BLACK);
        let (x, y, w, h) = Self::dest_rect(fb.width, fb.height, screen_width(), screen_height());
        draw_texture_ex(
            texture,
            x,
            y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(w, h)),
                ..Default::default()
            },
        );
    }

    pub fn draw_overlay(&self, lines: &[String]) {
        for (i, line) in lines.iter().enumerate() {
            draw_text(line, 4.0, OVERLAY_FONT_SIZE * (i + 1) as f32, OVERLAY_FONT_SIZE, WHITE);
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `runtime` until the window closes.
pub async fn run(mut runtime: Runtime) {
    let mut input = InputState::new();
    let mut presenter = Presenter::new();
    log::info!("host loop started (gamepad: {})", input.has_gamepad());

    loop {
        input.poll();
        runtime.update(input.snapshot());
        presenter.present(runtime.framebuffer());
        presenter.draw_overlay(&runtime.overlay_lines());
        next_frame().await;
    }
}
