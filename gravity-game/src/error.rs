use gravity_well::assets::AssetError;
use thiserror::Error;
use crate::config::ConfigError;
use crate::planets::PlanetError;

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Planet(#[from] PlanetError)
}
