//! Tile grids drawn from a shared tileset sheet

use super::render::Framebuffer;
use super::renderable::{Origin, Renderable};
use super::sprite::{le_words, Sprite, SpriteSheet};
use crate::error::AssetError;

/// Row-major grid of signed tile ids. Negative ids are empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u8,
    height: u8,
    tiles: Vec<i16>,
}

impl TileGrid {
    pub fn new(width: u8, height: u8, tiles: Vec<i16>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize;
        if tiles.len() < expected {
            return Err(AssetError::Truncated {
                what: "tile ids",
                expected,
                actual: tiles.len(),
            });
        }
        let mut tiles = tiles;
        tiles.truncate(expected);
        Ok(Self { width, height, tiles })
    }

    /// Parse `[width:8][height:8][tile id: i16 LE...]`.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let [width, height, rest @ ..] = bytes else {
            return Err(AssetError::Truncated {
                what: "tilemap header",
                expected: 2,
                actual: bytes.len(),
            });
        };
        let tiles = le_words(rest)?.into_iter().map(|w| w as i16).collect();
        Self::new(*width, *height, tiles)
    }

    /// Parse the word layout where width and height are the first two words.
    pub fn from_words(words: &[i16]) -> Result<Self, AssetError> {
        let [width, height, tiles @ ..] = words else {
            return Err(AssetError::Truncated {
                what: "tilemap header",
                expected: 2,
                actual: words.len(),
            });
        };
        let dimension = |field: &'static str, value: i16| {
            u8::try_from(value).map_err(|_| AssetError::BadDimension { field, value })
        };
        Self::new(dimension("width", *width)?, dimension("height", *height)?, tiles.to_vec())
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn get(&self, ix: usize, iy: usize) -> Option<i16> {
        if ix >= self.width as usize || iy >= self.height as usize {
            return None;
        }
        self.tiles.get(iy * self.width as usize + ix).copied()
    }
}

/// Draws the visible part of a [`TileGrid`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Tilemap {
    tileset: Sprite,
    grid: Option<&'static TileGrid>,
    pub origin: Origin,
}

impl Tilemap {
    pub fn new(grid: &'static TileGrid, tileset: &'static SpriteSheet) -> Self {
        Self {
            tileset: Sprite::new(tileset),
            grid: Some(grid),
            origin: Origin::default(),
        }
    }

    pub fn set_origin(&mut self, x: i16, y: i16) {
        self.origin = Origin::new(x, y);
    }

    pub fn tile_width(&self) -> u16 {
        self.tileset.width()
    }

    pub fn tile_height(&self) -> u16 {
        self.tileset.height()
    }

    pub fn grid(&self) -> Option<&'static TileGrid> {
        self.grid
    }

    /// Draw only the tiles that can intersect the screen. The far edge rounds
    /// up so a partly visible last column or row is still drawn.
    pub fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        let Some(grid) = self.grid else { return };
        let (tw, th) = (self.tile_width() as i32, self.tile_height() as i32);
        if tw == 0 || th == 0 {
            return;
        }
        let (x, y) = self.origin.apply(x, y);
        let (x, y) = (x as i32, y as i32);

        let start_x = (-x / tw).max(0);
        let start_y = (-y / th).max(0);
        let end_x = ((fb.width as i32 - x + tw - 1) / tw).min(grid.width as i32);
        let end_y = ((fb.height as i32 - y + th - 1) / th).min(grid.height as i32);

        for ix in start_x..end_x {
            for iy in start_y..end_y {
                let Some(tid) = grid.get(ix as usize, iy as usize) else { continue };
                if tid < 0 {
                    continue;
                }
                self.tileset.frame = tid as u16;
                self.tileset.draw(fb, (ix * tw + x) as i16, (iy * th + y) as i16);
            }
        }
    }
}

impl Renderable for Tilemap {
    fn draw(&mut self, fb: &mut Framebuffer, x: i16, y: i16) {
        Tilemap::draw(self, fb, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leak<T>(value: T) -> &'static T {
        Box::leak(Box::new(value))
    }

    /// Square tiles of `size`; frame n is filled with n + 1.
    fn square_tileset(size: u16) -> &'static SpriteSheet {
        let area = (size * size) as usize;
        let pixels = (0..4u16).flat_map(|f| vec![f + 1; area]).collect();
        leak(SpriteSheet::new(size, size, 0, pixels).unwrap())
    }

    fn tileset() -> &'static SpriteSheet {
        square_tileset(2)
    }

    /// Draw every tile with no culling.
    fn naive(grid: &TileGrid, sheet: &'static SpriteSheet, x: i16, y: i16, fb: &mut Framebuffer) {
        let (tw, th) = (sheet.width() as i16, sheet.height() as i16);
        let mut sprite = Sprite::new(sheet);
        for iy in 0..grid.height() as usize {
            for ix in 0..grid.width() as usize {
                let tid = grid.get(ix, iy).unwrap();
                if tid >= 0 {
                    sprite.frame = tid as u16;
                    sprite.draw(fb, ix as i16 * tw + x, iy as i16 * th + y);
                }
            }
        }
    }

    #[test]
    fn test_parse_layouts() {
        let grid = TileGrid::from_le_bytes(&[2, 1, 3, 0, 0xFF, 0xFF]).unwrap();
        assert_eq!(grid.get(0, 0), Some(3));
        assert_eq!(grid.get(1, 0), Some(-1));
        assert_eq!(grid.get(2, 0), None);

        let words = TileGrid::from_words(&[1, 2, 5, 6]).unwrap();
        assert_eq!(words.height(), 2);
        assert_eq!(words.get(0, 1), Some(6));

        assert!(matches!(
            TileGrid::from_words(&[3, 3, 1]),
            Err(AssetError::Truncated { what: "tile ids", .. })
        ));
        assert!(TileGrid::from_le_bytes(&[1]).is_err());
        assert_eq!(TileGrid::from_le_bytes(&[1, 1, 0]), Err(AssetError::OddLength(1)));
    }

    #[test]
    fn test_word_header_out_of_range() {
        assert_eq!(
            TileGrid::from_words(&[256, 1, 0]),
            Err(AssetError::BadDimension { field: "width", value: 256 })
        );
        assert_eq!(
            TileGrid::from_words(&[1, -1, 0]),
            Err(AssetError::BadDimension { field: "height", value: -1 })
        );
        assert_eq!(TileGrid::from_words(&[255, 0]).map(|g| g.width()), Ok(255));
    }

    #[test]
    fn test_negative_ids_are_empty() {
        let grid = leak(TileGrid::new(2, 1, vec![-1, 2]).unwrap());
        let mut map = Tilemap::new(grid, tileset());
        let mut fb = Framebuffer::new(4, 2);
        map.draw(&mut fb, 0, 0);
        assert_eq!(fb.pixels, vec![0, 0, 3, 3, 0, 0, 3, 3]);
    }

    #[test]
    fn test_culled_draw_matches_full_draw() {
        let tiles = (0..40 * 30).map(|i| (i % 5) as i16 - 1).collect();
        let grid = leak(TileGrid::new(40, 30, tiles).unwrap());
        let sheet = tileset();
        let mut map = Tilemap::new(grid, sheet);
        for (x, y) in [(0, 0), (-7, -3), (-33, -41), (5, 3), (-75, -55), (9, -1)] {
            let mut culled = Framebuffer::new(10, 8);
            let mut full = Framebuffer::new(10, 8);
            map.draw(&mut culled, x, y);
            naive(grid, sheet, x, y, &mut full);
            assert_eq!(culled.pixels, full.pixels, "mismatch at ({x}, {y})");
        }
    }

    #[test]
    fn test_partial_last_tile_is_drawn() {
        // 11px screen over 3px tiles: scrolled maps show a partial column
        let tiles = (0..10 * 6).map(|i| (i % 4) as i16).collect();
        let grid = leak(TileGrid::new(10, 6, tiles).unwrap());
        let sheet = square_tileset(3);
        let mut map = Tilemap::new(grid, sheet);
        for (x, y) in [(0, 0), (-2, 0), (-1, -2), (-5, -4), (-19, -7), (2, 1)] {
            let mut culled = Framebuffer::new(11, 7);
            let mut full = Framebuffer::new(11, 7);
            map.draw(&mut culled, x, y);
            naive(grid, sheet, x, y, &mut full);
            assert_eq!(culled.pixels, full.pixels, "mismatch at ({x}, {y})");
        }

        let row = leak(TileGrid::new(10, 1, vec![0; 10]).unwrap());
        let mut map = Tilemap::new(row, sheet);
        let mut fb = Framebuffer::new(11, 3);
        map.draw(&mut fb, -2, 0);
        assert!(fb.pixels[..11].iter().all(|&p| p == 1));
    }

    #[test]
    fn test_origin_shifts_map() {
        let grid = leak(TileGrid::new(1, 1, vec![0]).unwrap());
        let mut map = Tilemap::new(grid, tileset());
        map.set_origin(1, 1);
        let mut fb = Framebuffer::new(3, 3);
        map.draw(&mut fb, 0, 0);
        assert_eq!(fb.get_pixel(0, 0).map(|c| c.0), Some(0));
        assert_eq!(fb.get_pixel(2, 2).map(|c| c.0), Some(1));
    }
}
