//! pixelpool demo: walk around a small room and collect coins
//!
//! Arrows/WASD move, J/Z held runs, Escape/Tab cycles the debug overlay.
//! Every sprite is generated at startup from the ASCII art below.

use lazy_static::lazy_static;

use pixelpool::game::{Actor, Context, Entity, EntityPool};
use pixelpool::rasterizer::{Anim, ClipTable, Color, Framebuffer, SpriteSheet, TileGrid, Tilemap, WIDTH, HEIGHT};
use pixelpool::{host, Button, ButtonSource, Runtime, RuntimeConfig, Scene, SlabError};

const CONFIG_PATH: &str = "pixelpool.ron";

// Type ids, in update order
const WALL: u8 = 0;
const COIN: u8 = 1;
const PLAYER: u8 = 2;
const SPARKLE: u8 = 3;

const TILE: i16 = 8;

/// Transparent color key for every generated sheet
const KEY: Color = Color::MAGENTA;

const LEVEL: [&str; 12] = [
    "##############################",
    "#p...........#...............#",
    "#.....c......#.......c.......#",
    "#............#...............#",
    "#....####....#....#####......#",
    "#....#..c....c....#...#..c...#",
    "#....#............#...#......#",
    "#....######.......#...#......#",
    "#.........#...c.......#......#",
    "#..c......#...........####...#",
    "#.........#......c...........#",
    "##############################",
];

const TILE_ART: [&str; 2] = [
    // Floor
    "gggggggg\
     gkgggggg\
     gggggggg\
     gggggkgg\
     gggggggg\
     ggkggggg\
     gggggggg\
     gggggggk",
    // Wall
    "bbbbbbbk\
     bbbbbbbk\
     kkkkkkkk\
     bbbkbbbb\
     bbbkbbbb\
     kkkkkkkk\
     bbbbbbbk\
     bbbbbbbk",
];

const PLAYER_ART: [&str; 3] = [
    "..llll..\
     .llllll.\
     .lwkwkl.\
     .llllll.\
     ..BBBB..\
     .BBBBBB.\
     ..B..B..\
     ..k..k..",
    "..llll..\
     .llllll.\
     .lwkwkl.\
     .llllll.\
     ..BBBB..\
     .BBBBBB.\
     .B....B.\
     .k....k.",
    "..llll..\
     .llllll.\
     .lwkwkl.\
     .llllll.\
     ..BBBB..\
     .BBBBBB.\
     ...BB...\
     ...kk...",
];

const COIN_ART: [&str; 3] = [".yy.\
     yooy\
     yooy\
     .yy.", ".yy.\
     .yo.\
     .yo.\
     .yy.", "..y.\
     ..y.\
     ..y.\
     ..y."];

const SPARKLE_ART: [&str; 3] = ["....\
     .ww.\
     .ww.\
     ....", "w..w\
     .ww.\
     .ww.\
     w..w", "w..w\
     ....\
     ....\
     w..w"];

fn palette(c: char) -> Color {
    match c {
        'k' => Color::BLACK,
        'w' => Color::WHITE,
        'g' => Color::DARK_GRAY,
        'b' => Color::BROWN,
        'y' => Color::YELLOW,
        'o' => Color::ORANGE,
        'l' => Color::BEIGE,
        'B' => Color::BLUE,
        _ => KEY,
    }
}

/// Build a sheet from equally sized ASCII frames, whitespace ignored.
fn sheet(width: u16, height: u16, frames: &[&str]) -> SpriteSheet {
    let pixels = frames
        .iter()
        .flat_map(|art| art.chars().filter(|c| !c.is_whitespace()))
        .map(|c| palette(c).0)
        .collect();
    SpriteSheet::new(width, height, KEY.0, pixels).expect("demo sprite art")
}

/// Cells of `LEVEL` holding `c`, in world pixels.
fn cells(c: char) -> impl Iterator<Item = (i16, i16)> {
    LEVEL.iter().enumerate().flat_map(move |(iy, row)| {
        row.chars()
            .enumerate()
            .filter(move |&(_, cell)| cell == c)
            .map(move |(ix, _)| (ix as i16 * TILE, iy as i16 * TILE))
    })
}

lazy_static! {
    static ref TILES: SpriteSheet = sheet(8, 8, &TILE_ART);
    static ref PLAYER_SHEET: SpriteSheet = sheet(8, 8, &PLAYER_ART);
    static ref COIN_SHEET: SpriteSheet = sheet(4, 4, &COIN_ART);
    static ref SPARKLE_SHEET: SpriteSheet = sheet(4, 4, &SPARKLE_ART);

    static ref GRID: TileGrid = {
        let tiles = LEVEL
            .iter()
            .flat_map(|row| row.chars().map(|c| if c == '#' { 1 } else { 0 }))
            .collect();
        TileGrid::new(LEVEL[0].len() as u8, LEVEL.len() as u8, tiles).expect("demo level")
    };

    // 0: idle, 1: walk
    static ref PLAYER_CLIPS: ClipTable =
        ClipTable::from_bytes(vec![1, 0, 0, 0, 4, 0, 4, 1, 0, 2, 0]).expect("player clips");
    // 0: spin
    static ref COIN_CLIPS: ClipTable =
        ClipTable::from_bytes(vec![4, 0, 5, 0, 1, 2, 1]).expect("coin clips");
    // 0: burst, once
    static ref SPARKLE_CLIPS: ClipTable =
        ClipTable::from_bytes(vec![3, 1, 3, 0, 1, 2]).expect("sparkle clips");
}

fn map_size() -> (i16, i16) {
    (LEVEL[0].len() as i16 * TILE, LEVEL.len() as i16 * TILE)
}

// =============================================================================
// Actors
// =============================================================================

/// Invisible blocker, the tilemap draws the bricks
#[derive(Default)]
struct Wall;

impl Actor for Wall {
    fn on_init(&mut self, entity: &mut Entity) {
        entity.set_hitbox_size(TILE as u8, TILE as u8);
    }
}

struct Coin {
    anim: Anim,
}

impl Default for Coin {
    fn default() -> Self {
        let mut anim = Anim::new(&COIN_SHEET, &COIN_CLIPS);
        anim.set_origin(2, 2);
        anim.play(0);
        Self { anim }
    }
}

impl Actor for Coin {
    fn on_init(&mut self, entity: &mut Entity) {
        entity.set_hitbox(2, 2, 4, 4);
    }

    fn draw(&mut self, _entity: &Entity, fb: &mut Framebuffer, x: i16, y: i16) {
        self.anim.draw(fb, x, y);
    }
}

struct Sparkle {
    anim: Anim,
}

impl Default for Sparkle {
    fn default() -> Self {
        let mut anim = Anim::new(&SPARKLE_SHEET, &SPARKLE_CLIPS);
        anim.set_origin(2, 2);
        anim.play(0);
        Self { anim }
    }
}

impl Actor for Sparkle {
    fn on_init(&mut self, entity: &mut Entity) {
        entity.set_collidable(false);
    }

    fn update(&mut self, entity: &mut Entity, _ctx: &mut Context<'_>) {
        if !self.anim.is_playing() {
            entity.retire();
        }
    }

    fn draw(&mut self, _entity: &Entity, fb: &mut Framebuffer, x: i16, y: i16) {
        self.anim.draw(fb, x, y);
    }
}

struct Player {
    anim: Anim,
    coins: u16,
}

impl Default for Player {
    fn default() -> Self {
        let mut anim = Anim::new(&PLAYER_SHEET, &PLAYER_CLIPS);
        anim.play(0);
        Self { anim, coins: 0 }
    }
}

impl Player {
    /// Coins are picked up on contact, everything else blocks.
    fn touch(&mut self, other: &Entity, ctx: &mut Context<'_>) -> bool {
        if other.kind() != COIN {
            return true;
        }
        if ctx.retire(other.handle()) {
            self.coins += 1;
            ctx.spawn(SPARKLE, other.x, other.y);
            log::info!("coin {} collected", self.coins);
        }
        false
    }
}

impl Actor for Player {
    fn on_init(&mut self, entity: &mut Entity) {
        entity.set_hitbox(1, 1, 6, 7);
    }

    fn update(&mut self, entity: &mut Entity, ctx: &mut Context<'_>) {
        let input = ctx.input();
        let speed = if input.down(Button::A) { 2 } else { 1 };
        let axis = |neg: Button, pos: Button| (input.down(pos) as i16 - input.down(neg) as i16) * speed;
        let (dx, dy) = (axis(Button::Left, Button::Right), axis(Button::Up, Button::Down));

        ctx.move_by(self, entity, dx, dy, &[WALL, COIN]);
        self.anim.play_if_changed(if dx != 0 || dy != 0 { 1 } else { 0 });

        let (map_w, map_h) = map_size();
        let camera = ctx.camera_mut();
        camera.x = (entity.x + TILE / 2 - WIDTH as i16 / 2).clamp(0, map_w - WIDTH as i16);
        camera.y = (entity.y + TILE / 2 - HEIGHT as i16 / 2).clamp(0, map_h - HEIGHT as i16);
    }

    fn draw(&mut self, _entity: &Entity, fb: &mut Framebuffer, x: i16, y: i16) {
        self.anim.draw(fb, x, y);
    }

    fn on_move_collide_x(&mut self, _entity: &mut Entity, other: &Entity, ctx: &mut Context<'_>) -> bool {
        self.touch(other, ctx)
    }

    fn on_move_collide_y(&mut self, _entity: &mut Entity, other: &Entity, ctx: &mut Context<'_>) -> bool {
        self.touch(other, ctx)
    }
}

// =============================================================================
// Scene
// =============================================================================

fn build_scene() -> Result<Scene, SlabError> {
    let walls: Vec<_> = cells('#').collect();
    let coins: Vec<_> = cells('c').collect();

    let mut wall_pool: EntityPool<Wall> = EntityPool::new(WALL, 0, walls.len() as u16);
    for &(x, y) in &walls {
        wall_pool.spawn(x, y);
    }
    let mut coin_pool: EntityPool<Coin> = EntityPool::new(COIN, 1, coins.len() as u16);
    for &(x, y) in &coins {
        coin_pool.spawn(x, y);
    }
    let mut player_pool: EntityPool<Player> = EntityPool::new(PLAYER, 2, 1);
    if let Some((x, y)) = cells('p').next() {
        player_pool.spawn(x, y);
    }

    let mut scene = Scene::with_hooks(|scene: &mut Scene| -> Result<(), SlabError> {
        // Under everything, walls included
        scene.add(Tilemap::new(&GRID, &TILES), 0)?;
        Ok(())
    });
    scene.clear_color = Color::DARK_BLUE;
    scene.register_pool(wall_pool)?;
    scene.register_pool(coin_pool)?;
    scene.register_pool(player_pool)?;
    scene.register_pool(EntityPool::<Sparkle>::new(SPARKLE, 3, 8))?;
    Ok(scene)
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();

    let config = RuntimeConfig::load_or_default(CONFIG_PATH);
    log::info!("pixelpool v{}", pixelpool::VERSION);

    macroquad::Window::from_config(config.window_conf(), async move {
        let mut runtime = Runtime::new(config);
        let scene = match build_scene() {
            Ok(scene) => scene,
            Err(err) => {
                log::error!("building scene: {err}");
                return;
            }
        };
        if let Err(err) = runtime.set_scene(scene) {
            log::error!("starting scene: {err}");
            return;
        }
        host::run(runtime).await;
    });
}
