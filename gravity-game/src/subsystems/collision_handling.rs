use glam::{vec2, Vec2};
use gravity_well::host::GameContext;
use gravity_well::physics::{BodyHandle, ImpactEvent};
use rand::Rng;
use crate::{
    GameTimer,
    GravityGame
};

impl GravityGame {
    /// Blows the ship up when it touches a planet. Impacts reported after the
    /// ship is gone are ignored.
    pub fn update_player_collisions(&mut self, ctx: &mut GameContext<GameTimer>, impact: ImpactEvent) {
        let (player_entity, ship_handle) = match (self.player_entity, self.player_body()) {
            (Some(entity), Some(handle)) => (entity, handle),
            _ => return
        };
        if impact.body != ship_handle {
            return;
        }
        let planet_group = match self.collision_groups {
            Some(groups) => groups.planet,
            None => return
        };
        let hit_planet = ctx.physics()
            .body(impact.other)
            .map_or(false, |other| other.collision_group() == planet_group);
        if hit_planet {
            self.explode(ctx, player_entity, ship_handle, impact.approach_velocity);
        }
    }

    fn explode(
        &mut self,
        ctx: &mut GameContext<GameTimer>,
        player_entity: hecs::Entity,
        ship_handle: BodyHandle,
        ship_velocity: Vec2
    ) {
        let ship = match ctx.physics_mut().remove_body(ship_handle) {
            Some(ship) => ship,
            None => return
        };
        if self.ecs_world.despawn(player_entity).is_err() {
            tracing::warn!("ship entity was already gone when it exploded");
        }
        self.player_entity = None;
        self.game_over.exploded_at = Some(ctx.elapsed());
        tracing::info!(
            x = ship.position.x,
            y = ship.position.y,
            vx = ship_velocity.x,
            vy = ship_velocity.y,
            "ship destroyed"
        );

        // every piece scatters backwards, each axis with its own random speed
        let fragment_templates = std::mem::take(&mut self.fragment_templates);
        for template in fragment_templates.iter() {
            let velocity = vec2(
                -ship_velocity.x * self.random_explosion_speed(),
                -ship_velocity.y * self.random_explosion_speed()
            );
            self.spawn_fragment(ctx, ship.position, ship.angle, velocity, template);
        }
        self.fragment_templates = fragment_templates;

        if !self.game_over.scheduled {
            self.game_over.scheduled = true;
            ctx.schedule_once(self.config.game_over_delay, GameTimer::ShowGameOver);
        }
    }

    fn random_explosion_speed(&mut self) -> f32 {
        let speed = self.rng.gen::<f32>() * self.config.max_explosion_speed;
        tracing::debug!(speed, "fragment speed");
        speed
    }
}
