//! Frame buffer and draw primitives
//!
//! A flat, row-major array of RGB565 words. Every primitive clips to the
//! buffer silently; nothing here panics on off-screen coordinates.

use super::types::Color;

pub struct Framebuffer {
    pub pixels: Vec<u16>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.0);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color.0;
        }
    }

    /// Read a pixel, `None` when off-screen.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|idx| Color(self.pixels[idx]))
    }

    /// Draw a line from (x0, y0) to (x1, y1) using Bresenham's algorithm
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Horizontal run of `w` pixels starting at (x, y)
    pub fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Color) {
        if w <= 0 || y < 0 || y >= self.height as i32 {
            return;
        }
        let x0 = x.max(0);
        let x1 = (x + w).min(self.width as i32);
        if x0 >= x1 {
            return;
        }
        let row = y as usize * self.width;
        self.pixels[row + x0 as usize..row + x1 as usize].fill(color.0);
    }

    /// Vertical run of `h` pixels starting at (x, y)
    pub fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Color) {
        if h <= 0 || x < 0 || x >= self.width as i32 {
            return;
        }
        let y0 = y.max(0);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            self.pixels[py as usize * self.width + x as usize] = color.0;
        }
    }

    /// Rectangle outline with its top-left corner at (x, y)
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        self.draw_hline(x, y, w, color);
        self.draw_hline(x, y + h - 1, w, color);
        self.draw_vline(x, y, h, color);
        self.draw_vline(x + w - 1, y, h, color);
    }

    /// Filled rectangle with its top-left corner at (x, y)
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for py in y..y + h.max(0) {
            self.draw_hline(x, py, w, color);
        }
    }

    /// Circle outline (midpoint algorithm)
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        if radius < 0 {
            return;
        }
        let mut x = radius;
        let mut y = 0;
        let mut err = 1 - radius;
        while x >= y {
            for (px, py) in [
                (cx + x, cy + y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx - x, cy + y),
                (cx - x, cy - y),
                (cx - y, cy - x),
                (cx + y, cy - x),
                (cx + x, cy - y),
            ] {
                self.set_pixel(px, py, color);
            }
            y += 1;
            if err < 0 {
                err += 2 * y + 1;
            } else {
                x -= 1;
                err += 2 * (y - x) + 1;
            }
        }
    }

    /// Draw a filled circle at (cx, cy) with given radius and color
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        let r_sq = radius * radius;
        for y in (cy - radius).max(0)..=(cy + radius).min(self.height as i32 - 1) {
            for x in (cx - radius).max(0)..=(cx + radius).min(self.width as i32 - 1) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r_sq {
                    self.pixels[y as usize * self.width + x as usize] = color.0;
                }
            }
        }
    }

    /// Stamp a `width` x `height` block of `src` (rows `stride` words apart)
    /// at linear offset `dest_offset`.
    ///
    /// The caller clips: the block is expected to lie inside the buffer.
    /// Rows that would run past the end are dropped rather than panicking.
    /// With `key` set, source pixels equal to it are skipped.
    pub fn blit_rect(
        &mut self,
        src: &[u16],
        dest_offset: usize,
        width: usize,
        height: usize,
        stride: usize,
        key: Option<u16>,
    ) {
        for row in 0..height {
            let src_start = row * stride;
            let dst_start = dest_offset + row * self.width;
            let (Some(src_row), Some(dst_row)) = (
                src.get(src_start..src_start + width),
                self.pixels.get_mut(dst_start..dst_start + width),
            ) else {
                break;
            };

            match key {
                None => dst_row.copy_from_slice(src_row),
                Some(key) => {
                    for (dst, &px) in dst_row.iter_mut().zip(src_row) {
                        if px != key {
                            *dst = px;
                        }
                    }
                }
            }
        }
    }

    /// Expand the buffer into RGBA8 bytes (`out` must hold width*height*4).
    pub fn to_rgba(&self, out: &mut [u8]) {
        for (chunk, &px) in out.chunks_exact_mut(4).zip(&self.pixels) {
            chunk.copy_from_slice(&Color(px).to_rgba8());
        }
    }
}
