//! Asset manifest and the loaded asset store.
//!
//! Only what the simulation needs is kept: sprite dimensions and atlas frame
//! rectangles. Every asset named in a manifest is resolved up front by
//! [`AssetStore::load`], so a missing or broken file stops the game before the
//! first frame.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read asset '{key}' from {path}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: std::io::Error
    },
    #[error("failed to decode image '{key}' at {path}")]
    Image {
        key: String,
        path: PathBuf,
        #[source]
        source: image::ImageError
    },
    #[error("malformed atlas data for '{key}'")]
    Atlas {
        key: String,
        #[source]
        source: serde_json::Error
    },
    #[error("atlas grid for '{0}' must have non-zero size and cell counts")]
    EmptyGrid(String),
    #[error("no sprite is registered under '{0}'")]
    UnknownSprite(String),
    #[error("no atlas is registered under '{0}'")]
    UnknownAtlas(String),
    #[error("atlas '{atlas}' has no frame named '{frame}'")]
    UnknownFrame {
        atlas: String,
        frame: String
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpriteSource {
    /// Image file, relative to the manifest root. Only its header is read.
    Image(PathBuf),
    /// Dimensions known ahead of time, no file involved.
    Sized { width: u32, height: u32 }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum AtlasSource {
    /// TexturePacker "JSON hash" data file, relative to the manifest root.
    JsonHash(PathBuf),
    /// Image cut into `columns × rows` equal cells named
    /// `{prefix}{row * columns + column}{suffix}`.
    Grid {
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
        prefix: String,
        suffix: String
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub root: PathBuf,
    pub sprites: BTreeMap<String, SpriteSource>,
    pub atlases: BTreeMap<String, AtlasSource>
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpriteInfo {
    pub width: u32,
    pub height: u32
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FrameRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32
}

#[derive(Clone, Debug, Default)]
pub struct Atlas {
    frames: BTreeMap<String, FrameRect>
}

#[derive(Deserialize)]
struct JsonHashFrame {
    frame: FrameRect
}

#[derive(Deserialize)]
struct JsonHashAtlas {
    frames: BTreeMap<String, JsonHashFrame>
}

impl Atlas {
    pub fn from_json_hash(key: &str, data: &str) -> Result<Self, AssetError> {
        let parsed: JsonHashAtlas = serde_json::from_str(data)
            .map_err(|source| AssetError::Atlas { key: key.to_string(), source })?;
        Ok(Self {
            frames: parsed.frames
                .into_iter()
                .map(|(name, entry)| (name, entry.frame))
                .collect()
        })
    }

    pub fn from_grid(
        key: &str,
        width: u32,
        height: u32,
        columns: u32,
        rows: u32,
        prefix: &str,
        suffix: &str
    ) -> Result<Self, AssetError> {
        if width == 0 || height == 0 || columns == 0 || rows == 0 {
            return Err(AssetError::EmptyGrid(key.to_string()));
        }
        let (w, h) = (width / columns, height / rows);
        let mut frames = BTreeMap::new();
        for row in 0..rows {
            for column in 0..columns {
                let idx = row * columns + column;
                frames.insert(
                    format!("{}{}{}", prefix, idx, suffix),
                    FrameRect { x: column * w, y: row * h, w, h }
                );
            }
        }
        Ok(Self { frames })
    }

    pub fn len(&self) -> usize { self.frames.len() }

    pub fn is_empty(&self) -> bool { self.frames.is_empty() }

    pub fn get(&self, name: &str) -> Option<&FrameRect> {
        self.frames.get(name)
    }

    pub fn frame_names(&self) -> impl Iterator<Item = &str> {
        self.frames.keys().map(|it| it.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    sprites: HashMap<String, SpriteInfo>,
    atlases: HashMap<String, Atlas>
}

impl AssetStore {
    pub fn load(manifest: &AssetManifest) -> Result<Self, AssetError> {
        let mut store = Self::default();

        for (key, source) in manifest.sprites.iter() {
            let info = match source {
                SpriteSource::Sized { width, height } => SpriteInfo { width: *width, height: *height },
                SpriteSource::Image(path) => {
                    let path = resolve(&manifest.root, path);
                    let (width, height) = image::image_dimensions(&path)
                        .map_err(|source| AssetError::Image { key: key.clone(), path, source })?;
                    SpriteInfo { width, height }
                }
            };
            tracing::debug!(sprite = %key, width = info.width, height = info.height, "sprite loaded");
            store.sprites.insert(key.clone(), info);
        }

        for (key, source) in manifest.atlases.iter() {
            let atlas = match source {
                AtlasSource::Grid { width, height, columns, rows, prefix, suffix } =>
                    Atlas::from_grid(key, *width, *height, *columns, *rows, prefix, suffix)?,
                AtlasSource::JsonHash(path) => {
                    let path = resolve(&manifest.root, path);
                    let data = std::fs::read_to_string(&path)
                        .map_err(|source| AssetError::Io { key: key.clone(), path, source })?;
                    Atlas::from_json_hash(key, &data)?
                }
            };
            tracing::debug!(atlas = %key, frames = atlas.len(), "atlas loaded");
            store.atlases.insert(key.clone(), atlas);
        }

        Ok(store)
    }

    pub fn sprite(&self, key: &str) -> Result<SpriteInfo, AssetError> {
        self.sprites
            .get(key)
            .copied()
            .ok_or_else(|| AssetError::UnknownSprite(key.to_string()))
    }

    pub fn atlas(&self, key: &str) -> Result<&Atlas, AssetError> {
        self.atlases
            .get(key)
            .ok_or_else(|| AssetError::UnknownAtlas(key.to_string()))
    }

    pub fn atlas_frame(&self, atlas: &str, frame: &str) -> Result<FrameRect, AssetError> {
        self.atlas(atlas)?
            .get(frame)
            .copied()
            .ok_or_else(|| AssetError::UnknownFrame {
                atlas: atlas.to_string(),
                frame: frame.to_string()
            })
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
