//! Sprite sheets and the clipped sprite blitter
//!
//! A sheet is one or more equally sized frames stored back to back:
//! frame `n` starts at `n * width * height`. The baked layout is
//! `[width][height][transparent][pixels...]`, all 16-bit words.

use super::render::Framebuffer;
use super::renderable::{Origin, Renderable};
use crate::error::AssetError;

/// Immutable multi-frame pixel atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    width: u16,
    height: u16,
    /// 0 means "no transparency key"
    transparent: u16,
    pixels: Vec<u16>,
}

impl SpriteSheet {
    /// Build a sheet from raw frames. `pixels` must hold a whole number of
    /// `width * height` frames.
    pub fn new(width: u16, height: u16, transparent: u16, pixels: Vec<u16>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::ZeroSize { width, height });
        }
        let frame_len = width as usize * height as usize;
        if pixels.len() < frame_len {
            return Err(AssetError::Truncated {
                what: "sprite pixels",
                expected: frame_len,
                actual: pixels.len(),
            });
        }
        if pixels.len() % frame_len != 0 {
            return Err(AssetError::PartialFrame {
                width,
                height,
                pixels: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            transparent,
            pixels,
        })
    }

    /// Parse the baked word layout `[w][h][key][pixels...]`.
    pub fn from_words(words: &[u16]) -> Result<Self, AssetError> {
        let [width, height, transparent, pixels @ ..] = words else {
            return Err(AssetError::Truncated {
                what: "sprite header",
                expected: 3,
                actual: words.len(),
            });
        };
        Self::new(*width, *height, *transparent, pixels.to_vec())
    }

    /// Parse the baked layout from little-endian bytes.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        Self::from_words(&le_words(bytes)?)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Transparency key, `None` when the sheet is fully opaque.
    pub fn key(&self) -> Option<u16> {
        (self.transparent != 0).then_some(self.transparent)
    }

    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn frame_count(&self) -> usize {
        self.pixels.len() / self.frame_len()
    }

    /// Pixels of one frame, `None` past the last frame.
    pub fn frame(&self, frame: u16) -> Option<&[u16]> {
        let start = frame as usize * self.frame_len();
        self.pixels.get(start..start + self.frame_len())
    }
}

/// Split little-endian bytes into 16-bit words.
pub(crate) fn le_words(bytes: &[u8]) -> Result<Vec<u16>, AssetError> {
    if bytes.len() % 2 != 0 {
        return Err(AssetError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Draws one frame of a sheet, clipped to the frame buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sprite {
    sheet: Option<&'static SpriteSheet>,
    pub frame: u16,
    pub origin: Origin,
}

impl Sprite {
    pub fn new(sheet: &'static SpriteSheet) -> Self {
        Self {
            sheet: Some(sheet),
            frame: 0,
            origin: Origin::default(),
        }
    }

    pub fn with_origin(sheet: &'static SpriteSheet, x: i16, y: i16) -> Self {
        Self {
            origin: Origin::new(x, y),
            ..Self::new(sheet)
        }
    }

    pub fn set_sheet(&mut self, sheet: &'static SpriteSheet) {
        self.sheet = Some(sheet);
    }

    pub fn set_origin(&mut self, x: i16, y: i16) {
        self.origin = Origin::new(x, y);
    }

    pub fn sheet(&self) -> Option<&'static SpriteSheet> {
        self.sheet
    }

    pub fn width(&self) -> u16 {
        self.sheet.map_or(0, |s| s.width)
    }

    pub fn height(&self) -> u16 {
        self.sheet.map_or(0, |s| s.height)
    }

    /// Blit the current frame with its top-left corner at (x, y) + origin.
    pub fn draw(&self, fb: &mut Framebuffer, x: i16, y: i16) {
        let Some(sheet) = self.sheet else { return };
        let Some(pixels) = sheet.frame(self.frame) else { return };

        let (x, y) = self.origin.apply(x, y);
        let (x, y) = (x as i32, y as i32);
        let (width, height) = (sheet.width as i32, sheet.height as i32);
        let (screen_w, screen_h) = (fb.width as i32, fb.height as i32);

        if x > screen_w || x + width < 0 || y > screen_h || y + height < 0 {
            return;
        }

        // Horizontal cropping: left edge shifts the read, right edge shortens it
        let mut x_offset = 0;
        let mut render_w = width;
        if x < 0 {
            x_offset = -x;
            render_w = (width + x).min(screen_w);
        } else if x + width > screen_w {
            render_w = screen_w - x;
        }

        // Vertical cropping
        let mut y_offset = 0;
        let mut render_h = height;
        if y < 0 {
            y_offset = -y;
            render_h = (height + y).min(screen_h);
        } else if y + height > screen_h {
            render_h = screen_h - y;
        }

        if render_w <= 0 || render_h <= 0 {
            return;
        }

        let src_start = (y_offset * width + x_offset) as usize;
        let dest_offset = ((y + y_offset) * screen_w + x + x_offset) as usize;
        fb.blit_rect(
            &pixels[src_start..],
            dest_offset,
            render_w as usize,
            render_h as usize,
            width as usize,
            sheet.key(),
        );
    }
}

impl Renderable for Sprite {
    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        Sprite::draw(self, fb, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak(sheet: SpriteSheet) -> &'static SpriteSheet {
        Box::leak(Box::new(sheet))
    }

    /// 3x2 sheet with two frames; frame 1 pixels are frame 0 + 100.
    fn two_frame_sheet(key: u16) -> &'static SpriteSheet {
        let pixels = vec![1, 2, 3, 4, 5, 6, 101, 102, 103, 104, 105, 106];
        leak(SpriteSheet::new(3, 2, key, pixels).unwrap())
    }

    /// Reference: plot every sprite pixel individually, dropping off-screen ones.
    fn reference(sheet: &SpriteSheet, frame: u16, x: i32, y: i32, w: usize, h: usize) -> Vec<u16> {
        let mut out = vec![0u16; w * h];
        let px = sheet.frame(frame).unwrap();
        for sy in 0..sheet.height() as i32 {
            for sx in 0..sheet.width() as i32 {
                let (dx, dy) = (x + sx, y + sy);
                let value = px[(sy * sheet.width() as i32 + sx) as usize];
                if dx < 0 || dy < 0 || dx >= w as i32 || dy >= h as i32 {
                    continue;
                }
                if sheet.key() == Some(value) {
                    continue;
                }
                out[dy as usize * w + dx as usize] = value;
            }
        }
        out
    }

    #[test]
    fn test_parse_words() {
        let sheet = SpriteSheet::from_words(&[2, 1, 0, 7, 8, 9, 10]).unwrap();
        assert_eq!(sheet.width(), 2);
        assert_eq!(sheet.frame_count(), 2);
        assert_eq!(sheet.frame(1), Some(&[9u16, 10][..]));
        assert_eq!(sheet.frame(2), None);
        assert_eq!(sheet.key(), None);
    }

    #[test]
    fn test_parse_le_bytes() {
        let bytes = [1, 0, 1, 0, 0x1F, 0xF8, 0x34, 0x12];
        let sheet = SpriteSheet::from_le_bytes(&bytes).unwrap();
        assert_eq!(sheet.key(), Some(0xF81F));
        assert_eq!(sheet.frame(0), Some(&[0x1234u16][..]));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            SpriteSheet::from_words(&[1, 1]),
            Err(AssetError::Truncated { what: "sprite header", .. })
        ));
        assert_eq!(
            SpriteSheet::from_words(&[0, 4, 0]),
            Err(AssetError::ZeroSize { width: 0, height: 4 })
        );
        assert!(matches!(
            SpriteSheet::from_words(&[2, 2, 0, 1, 2, 3]),
            Err(AssetError::Truncated { .. })
        ));
        assert!(matches!(
            SpriteSheet::from_words(&[1, 2, 0, 1, 2, 3]),
            Err(AssetError::PartialFrame { .. })
        ));
        assert_eq!(SpriteSheet::from_le_bytes(&[1, 0, 1]), Err(AssetError::OddLength(3)));
    }

    #[test]
    fn test_clipping_matches_reference_on_every_edge() {
        let (w, h) = (8, 6);
        for key in [0, 5] {
            let sheet = two_frame_sheet(key);
            let sprite = Sprite::new(sheet);
            // Covers fully inside, each edge crossing and fully off-screen
            for x in -5..=10 {
                for y in -4..=8 {
                    let mut fb = Framebuffer::new(w, h);
                    sprite.draw(&mut fb, x as i16, y as i16);
                    assert_eq!(
                        fb.pixels,
                        reference(sheet, 0, x, y, w, h),
                        "mismatch at ({x}, {y}) key={key}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_frame_selects_atlas_offset() {
        let sheet = two_frame_sheet(0);
        let mut sprite = Sprite::new(sheet);
        sprite.frame = 1;
        let mut fb = Framebuffer::new(3, 2);
        sprite.draw(&mut fb, 0, 0);
        assert_eq!(fb.pixels, vec![101, 102, 103, 104, 105, 106]);
    }

    #[test]
    fn test_left_and_top_clip_shift_source() {
        let sheet = two_frame_sheet(0);
        let sprite = Sprite::new(sheet);
        let mut fb = Framebuffer::new(4, 4);
        sprite.draw(&mut fb, -1, -1);
        assert_eq!(fb.get_pixel(0, 0).map(|c| c.0), Some(5));
        assert_eq!(fb.get_pixel(1, 0).map(|c| c.0), Some(6));
        assert_eq!(fb.get_pixel(2, 0).map(|c| c.0), Some(0));
        assert_eq!(fb.get_pixel(0, 1).map(|c| c.0), Some(0));
    }

    #[test]
    fn test_fully_offscreen_draws_nothing() {
        let sheet = two_frame_sheet(0);
        let sprite = Sprite::new(sheet);
        let mut fb = Framebuffer::new(4, 4);
        for (x, y) in [(-3, 0), (5, 0), (0, -2), (0, 5), (-100, -100)] {
            sprite.draw(&mut fb, x, y);
        }
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_transparency_key_skips_pixels() {
        let sheet = leak(SpriteSheet::new(2, 1, 9, vec![9, 3]).unwrap());
        let sprite = Sprite::new(sheet);
        let mut fb = Framebuffer::new(2, 1);
        fb.pixels = vec![7, 7];
        sprite.draw(&mut fb, 0, 0);
        assert_eq!(fb.pixels, vec![7, 3]);
    }

    #[test]
    fn test_origin_offsets_draw() {
        let sheet = leak(SpriteSheet::new(1, 1, 0, vec![4]).unwrap());
        let sprite = Sprite::with_origin(sheet, 2, 1);
        let mut fb = Framebuffer::new(4, 4);
        sprite.draw(&mut fb, 1, 1);
        assert_eq!(fb.get_pixel(3, 2).map(|c| c.0), Some(4));
    }

    #[test]
    fn test_missing_frame_or_sheet_is_noop() {
        let mut fb = Framebuffer::new(4, 4);
        Sprite::default().draw(&mut fb, 0, 0);
        let mut sprite = Sprite::new(two_frame_sheet(0));
        sprite.frame = 9;
        sprite.draw(&mut fb, 0, 0);
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }
}
