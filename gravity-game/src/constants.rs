pub const GRAVITY: f32 = 6_000_000.0;
// added to the squared distance so the pull stays finite at a planet's center
pub const GRAVITY_SOFTENING: f32 = 5000.0;
pub const ANGULAR_VELOCITY: f32 = 3.0;
pub const MAX_ACCELERATION: f32 = 200.0;
pub const SHIP_SCALE: f32 = 0.25;
pub const MAX_EXPLOSION_SPEED: f32 = 20.0;
pub const GAME_OVER_DELAY: f32 = 1.0;

pub const WORLD_WIDTH: f32 = 3000.0;
pub const WORLD_HEIGHT: f32 = 600.0;
pub const SHIP_START: (f32, f32) = (60.0, 60.0);

pub const SHIP_SPRITE: &str = "ship";
pub const SHIP_SPRITE_WIDTH: u32 = 160;
pub const SHIP_SPRITE_HEIGHT: u32 = 280;

pub const MOON_SPRITE: &str = "moon";
pub const MOON_SCALE: f32 = 0.25;
pub const MOON_SPRITE_DIAMETER: u32 = 250;

pub const GAME_OVER_SPRITE: &str = "game_over";
pub const GAME_OVER_SPRITE_WIDTH: u32 = 400;
pub const GAME_OVER_SPRITE_HEIGHT: u32 = 100;

// the ship sheet cut into a grid of debris pieces
pub const FRAGMENTS_ATLAS: &str = "fragments";
pub const FRAGMENT_GRID_WIDTH: u32 = 3;
pub const FRAGMENT_GRID_HEIGHT: u32 = 3;
pub const FRAGMENT_PREFIX: &str = "fragment_";
pub const FRAGMENT_SUFFIX: &str = ".png";

pub const PLANET_LAYOUT: &[(f32, f32, f32)] = &[
    (800.0, 400.0, 1.0),
    (400.0, 300.0, 2.0)
];
