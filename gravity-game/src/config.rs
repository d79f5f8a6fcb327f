use std::path::{Path, PathBuf};
use gravity_well::assets::{AssetManifest, AtlasSource, SpriteSource};
use gravity_well::host::KeyCode;
use maplit::btreemap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::constants::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("failed to parse config")]
    Parse(#[from] ron::error::SpannedError)
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanetPlacement {
    pub x: f32,
    pub y: f32,
    pub size: f32
}

/// Holds `key` down for frames `from_frame..to_frame` of a headless run.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedKey {
    pub key: KeyCode,
    pub from_frame: u64,
    pub to_frame: u64
}

impl ScriptedKey {
    pub fn is_held_at(&self, frame: u64) -> bool {
        (self.from_frame..self.to_frame).contains(&frame)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub gravity: f32,
    pub gravity_softening: f32,
    pub angular_velocity: f32,
    pub max_acceleration: f32,
    pub ship_scale: f32,
    pub max_explosion_speed: f32,
    pub game_over_delay: f32,
    pub world_width: f32,
    pub world_height: f32,
    pub ship_start: (f32, f32),
    pub planet_scale: f32,
    pub planets: Vec<PlanetPlacement>,
    pub assets: AssetManifest,
    pub input_script: Vec<ScriptedKey>
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            gravity_softening: GRAVITY_SOFTENING,
            angular_velocity: ANGULAR_VELOCITY,
            max_acceleration: MAX_ACCELERATION,
            ship_scale: SHIP_SCALE,
            max_explosion_speed: MAX_EXPLOSION_SPEED,
            game_over_delay: GAME_OVER_DELAY,
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ship_start: SHIP_START,
            planet_scale: MOON_SCALE,
            planets: PLANET_LAYOUT
                .iter()
                .map(|&(x, y, size)| PlanetPlacement { x, y, size })
                .collect(),
            assets: default_asset_manifest(),
            input_script: vec![
                ScriptedKey { key: KeyCode::Right, from_frame: 0, to_frame: 20 },
                ScriptedKey { key: KeyCode::Up, from_frame: 20, to_frame: 80 }
            ]
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_ron_str(&source)
    }
}

pub fn default_asset_manifest() -> AssetManifest {
    AssetManifest {
        root: PathBuf::from("assets"),
        sprites: btreemap! {
            SHIP_SPRITE.to_string() => SpriteSource::Sized {
                width: SHIP_SPRITE_WIDTH,
                height: SHIP_SPRITE_HEIGHT
            },
            MOON_SPRITE.to_string() => SpriteSource::Sized {
                width: MOON_SPRITE_DIAMETER,
                height: MOON_SPRITE_DIAMETER
            },
            GAME_OVER_SPRITE.to_string() => SpriteSource::Sized {
                width: GAME_OVER_SPRITE_WIDTH,
                height: GAME_OVER_SPRITE_HEIGHT
            }
        },
        atlases: btreemap! {
            FRAGMENTS_ATLAS.to_string() => AtlasSource::Grid {
                width: SHIP_SPRITE_WIDTH,
                height: SHIP_SPRITE_HEIGHT,
                columns: FRAGMENT_GRID_WIDTH,
                rows: FRAGMENT_GRID_HEIGHT,
                prefix: FRAGMENT_PREFIX.to_string(),
                suffix: FRAGMENT_SUFFIX.to_string()
            }
        }
    }
}
