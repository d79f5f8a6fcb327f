use gravity_well::host::{GameContext, KeyCode};
use crate::{GameTimer, GravityGame};

impl GravityGame {
    pub fn update_player_controls(&mut self, ctx: &mut GameContext<GameTimer>) {
        if let Some(ship_handle) = self.player_body() {
            let angular_velocity = if ctx.is_key_pressed(KeyCode::Left) {
                -self.config.angular_velocity
            } else if ctx.is_key_pressed(KeyCode::Right) {
                self.config.angular_velocity
            } else {
                0.0
            };
            let thrust = ctx.is_key_pressed(KeyCode::Up);

            if let Some(ship) = ctx.physics_mut().body_mut(ship_handle) {
                ship.angular_velocity = angular_velocity;
                if thrust {
                    ship.thrust(self.config.max_acceleration);
                }
            }
        }
    }
}
