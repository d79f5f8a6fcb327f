use glam::Vec2;
use gravity_well::host::GameContext;
use gravity_well::math_utils::{direction_from_angle, AngleTo};
use crate::{
    components::*,
    GameTimer,
    GravityGame
};

/// Pull collected from every planet during one update. Handed to the ship's
/// body once and then zeroed, the physics step does the integration.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ForceAccumulator {
    pub x: f32,
    pub y: f32
}

impl ForceAccumulator {
    pub fn add(&mut self, force: Vec2) {
        self.x += force.x;
        self.y += force.y;
    }

    pub fn accelerate_to_object(&mut self, ship: Vec2, planet: Vec2, mass: f32, gravity: f32, softening: f32) {
        self.add(gravitational_force(ship, planet, mass, gravity, softening));
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

/// Force a planet of `mass` at `planet` exerts on a ship at `ship`:
/// `mass * gravity / (distance² + softening)`, pointing at the planet.
///
/// Planets without a positive finite mass pull with zero force, and so does a
/// planet whose center the ship sits exactly on.
pub fn gravitational_force(ship: Vec2, planet: Vec2, mass: f32, gravity: f32, softening: f32) -> Vec2 {
    if !(mass > 0.0) || !mass.is_finite() {
        return Vec2::ZERO;
    }
    let dist_sq = ship.distance_squared(planet);
    let denominator = dist_sq + softening;
    if dist_sq == 0.0 || !(denominator > 0.0) {
        return Vec2::ZERO;
    }
    let magnitude = mass * gravity / denominator;
    direction_from_angle(ship.angle_to(planet)) * magnitude
}

impl GravityGame {
    pub fn update_gravity(&mut self, ctx: &mut GameContext<GameTimer>) {
        let ship_handle = match self.player_body() {
            Some(handle) => handle,
            None => return
        };
        let ship_position = match ctx.physics().body(ship_handle) {
            Some(ship) => ship.position,
            None => return
        };

        for (_, (Planet(planet), Body(planet_handle))) in self.ecs_world
            .query::<(&Planet, &Body)>()
            .iter() {
            if let Some(planet_body) = ctx.physics().body(*planet_handle) {
                self.force_accumulator.accelerate_to_object(
                    ship_position,
                    planet_body.position,
                    planet.mass(),
                    self.config.gravity,
                    self.config.gravity_softening
                );
            }
        }

        if let Some(ship) = ctx.physics_mut().body_mut(ship_handle) {
            ship.apply_force(self.force_accumulator.as_vec2());
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;
    use crate::constants::*;
    use super::*;

    fn assert_close(actual: Vec2, expected: Vec2) {
        assert!(
            (actual - expected).length() <= expected.length() * 1e-5 + 1e-4,
            "{:?} != {:?}", actual, expected
        );
    }

    #[test]
    fn worked_example_pulls_along_x() {
        let force = gravitational_force(
            Vec2::ZERO,
            vec2(100.0, 0.0),
            4.0,
            GRAVITY,
            GRAVITY_SOFTENING
        );
        assert_close(force, vec2(1600.0, 0.0));
    }

    #[test]
    fn force_points_from_ship_to_planet() {
        let ship = vec2(250.0, 120.0);
        for planet in [vec2(400.0, 300.0), vec2(10.0, 500.0), vec2(-30.0, -40.0), vec2(250.0, 0.0)] {
            let force = gravitational_force(ship, planet, 2.0, GRAVITY, GRAVITY_SOFTENING);
            let dist_sq = ship.distance_squared(planet);
            let expected_magnitude = 2.0 * GRAVITY / (dist_sq + GRAVITY_SOFTENING);
            assert!((force.length() - expected_magnitude).abs() <= expected_magnitude * 1e-5);

            let towards = (planet - ship).normalize();
            assert!(force.normalize().dot(towards) > 0.99999);
        }
    }

    #[test]
    fn softening_keeps_close_range_pull_finite() {
        let force = gravitational_force(Vec2::ZERO, vec2(0.001, 0.0), 1.0, GRAVITY, GRAVITY_SOFTENING);
        assert!(force.x.is_finite());
        assert!((force.x - GRAVITY / GRAVITY_SOFTENING).abs() < 1.0);
    }

    #[test]
    fn degenerate_inputs_pull_with_zero_force() {
        let planet = vec2(100.0, 0.0);
        assert_eq!(gravitational_force(Vec2::ZERO, planet, 0.0, GRAVITY, GRAVITY_SOFTENING), Vec2::ZERO);
        assert_eq!(gravitational_force(Vec2::ZERO, planet, -4.0, GRAVITY, GRAVITY_SOFTENING), Vec2::ZERO);
        assert_eq!(gravitational_force(Vec2::ZERO, planet, f32::NAN, GRAVITY, GRAVITY_SOFTENING), Vec2::ZERO);
        assert_eq!(gravitational_force(planet, planet, 4.0, GRAVITY, GRAVITY_SOFTENING), Vec2::ZERO);
        assert_eq!(gravitational_force(Vec2::ZERO, planet, 4.0, GRAVITY, -10_000.0), Vec2::ZERO);
    }

    #[test]
    fn accumulator_sums_then_resets() {
        let mut accumulator = ForceAccumulator::default();
        accumulator.accelerate_to_object(Vec2::ZERO, vec2(100.0, 0.0), 4.0, GRAVITY, GRAVITY_SOFTENING);
        accumulator.accelerate_to_object(Vec2::ZERO, vec2(-100.0, 0.0), 4.0, GRAVITY, GRAVITY_SOFTENING);
        accumulator.accelerate_to_object(Vec2::ZERO, vec2(0.0, 100.0), 1.0, GRAVITY, GRAVITY_SOFTENING);
        assert!(accumulator.x.abs() < 1e-2);
        assert!((accumulator.y - 400.0).abs() < 1e-2);

        accumulator.reset();
        assert!(accumulator.is_zero());
        assert_eq!(accumulator, ForceAccumulator::default());
    }
}
