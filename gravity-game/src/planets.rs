use gravity_well::assets::{AssetError, AssetStore};
use thiserror::Error;
use crate::constants::*;

#[derive(Error, Debug, PartialEq)]
pub enum PlanetError {
    #[error("planet size must be a positive number, got {0}")]
    InvalidSize(f32)
}

/// Immutable description of a planet: which sprite it uses, how much the
/// sprite is scaled, the collision radius that scale gives and the mass the
/// ship is pulled by.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetaryBody {
    name: String,
    scale: f32,
    radius: f32,
    mass: f32
}

impl PlanetaryBody {
    pub fn new(sprite_name: &str, scale: f32, sprite_diameter: f32, mass: f32) -> Self {
        Self {
            name: sprite_name.to_string(),
            scale,
            radius: sprite_diameter * scale * 0.5,
            mass
        }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn scale(&self) -> f32 { self.scale }

    pub fn radius(&self) -> f32 { self.radius }

    pub fn mass(&self) -> f32 { self.mass }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlanetFactory {
    name: String,
    scale: f32,
    sprite_diameter: f32
}

impl PlanetFactory {
    pub fn new(sprite_name: &str, scale: f32, sprite_diameter: f32) -> Self {
        Self {
            name: sprite_name.to_string(),
            scale,
            sprite_diameter
        }
    }

    pub fn moon() -> Self {
        Self::new(MOON_SPRITE, MOON_SCALE, MOON_SPRITE_DIAMETER as f32)
    }

    /// Takes the diameter from the loaded sprite's width.
    pub fn from_sprite(sprite_name: &str, scale: f32, assets: &AssetStore) -> Result<Self, AssetError> {
        let sprite = assets.sprite(sprite_name)?;
        Ok(Self::new(sprite_name, scale, sprite.width as f32))
    }

    pub fn sprite_diameter(&self) -> f32 { self.sprite_diameter }

    /// A planet `size` times the base one: scale grows linearly, mass with the square.
    pub fn make_planet(&self, size: f32) -> Result<PlanetaryBody, PlanetError> {
        if !(size > 0.0) || !size.is_finite() {
            return Err(PlanetError::InvalidSize(size));
        }
        Ok(PlanetaryBody::new(
            &self.name,
            self.scale * size,
            self.sprite_diameter,
            size * size
        ))
    }
}
