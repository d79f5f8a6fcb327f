use gravity_well::physics::BodyHandle;
use crate::planets::PlanetaryBody;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Body(pub BodyHandle);

#[derive(Copy, Clone)]
pub struct Player;

#[derive(Clone, Debug)]
pub struct Planet(pub PlanetaryBody);

#[derive(Clone, Debug)]
pub struct Fragment {
    pub frame: String
}

/// Anchored to the middle of the view once the session is lost.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GameOverOverlay {
    pub sprite: &'static str,
    pub shown_at: f64
}
