//! Anything the scene can draw into a layer.

use super::render::Framebuffer;

/// A drawable placed at a screen position.
///
/// `x`/`y` is where the renderable's own origin lands; the scene passes the
/// negated camera offset so world-space renderables pan with the camera.
/// Drawing takes `&mut self` because animations advance as they draw.
pub trait Renderable {
    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16);
}

/// Offset added to the draw position of a renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Origin {
    pub x: i16,
    pub y: i16,
}

impl Origin {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    /// Apply the origin to a draw position.
    #[inline]
    pub fn apply(self, x: i16, y: i16) -> (i16, i16) {
        (x.wrapping_add(self.x), y.wrapping_add(self.y))
    }
}

impl<F> Renderable for F
where
    F: FnMut(&mut Framebuffer, i16, i16),
{
    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        self(fb, x, y)
    }
}
