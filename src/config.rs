//! Runtime configuration
//!
//! Stored as RON. Every field has a default, so a partial file (or none at
//! all) is valid.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::input::Button;
use crate::rasterizer::{Color, DEFAULT_FRAME_RATE, HEIGHT, WIDTH};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Target frames per second, 0 = unlocked
    pub frame_rate: u8,
    /// Screen size in device pixels
    pub width: u16,
    pub height: u16,
    /// Window pixels per device pixel
    pub scale: u8,
    /// Cycles the debug overlay level
    pub debug_button: Button,
    /// Scene clear color for newly set scenes that keep the default
    pub clear_color: Color,
    pub title: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            width: WIDTH as u16,
            height: HEIGHT as u16,
            scale: 8,
            debug_button: Button::Menu,
            clear_color: Color::BLACK,
            title: "pixelpool".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        let config = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_ron_string()?)?;
        Ok(())
    }

    /// Load `path`, falling back to defaults when it is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("config {}: {err}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Screen size, never zero
    pub fn screen_size(&self) -> (usize, usize) {
        (self.width.max(1) as usize, self.height.max(1) as usize)
    }

    /// Window size in logical pixels
    pub fn window_size(&self) -> (i32, i32) {
        let (w, h) = self.screen_size();
        let scale = self.scale.max(1) as i32;
        (w as i32 * scale, h as i32 * scale)
    }

    /// Window setup for `macroquad::Window::from_config`
    pub fn window_conf(&self) -> macroquad::window::Conf {
        let (window_width, window_height) = self.window_size();
        macroquad::window::Conf {
            window_title: self.title.clone(),
            window_width,
            window_height,
            high_dpi: true,
            ..Default::default()
        }
    }
}
