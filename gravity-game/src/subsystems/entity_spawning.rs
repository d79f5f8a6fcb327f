use glam::{vec2, Vec2};
use gravity_well::host::GameContext;
use gravity_well::physics::RigidBody;
use crate::{
    components::*,
    planets::PlanetaryBody,
    FragmentTemplate,
    GameTimer,
    GravityGame
};

impl GravityGame {
    pub fn spawn_new_player(&mut self, ctx: &mut GameContext<GameTimer>) {
        let groups = match self.collision_groups {
            Some(groups) => groups,
            None => return
        };
        let (x, y) = self.config.ship_start;

        let mut ship = RigidBody::dynamic(vec2(x, y), self.ship_radius);
        ship.set_collision_group(groups.player);
        ship.collides_with_impacts(groups.planet);
        ship.collide_world_bounds = true;

        let handle = ctx.physics_mut().add_body(ship);
        self.player_entity = Some(self.ecs_world.spawn((Player, Body(handle))));
    }

    pub fn spawn_planets(&mut self, ctx: &mut GameContext<GameTimer>) {
        let planet_layout = self.planet_layout.clone();
        for (position, planet) in planet_layout {
            self.spawn_planet(ctx, position, planet);
        }
    }

    pub fn spawn_planet(&mut self, ctx: &mut GameContext<GameTimer>, position: Vec2, planet: PlanetaryBody) {
        let groups = match self.collision_groups {
            Some(groups) => groups,
            None => return
        };

        let mut body = RigidBody::fixed(position, planet.radius());
        body.set_mass(planet.mass());
        body.set_collision_group(groups.planet);
        body.collides(groups.player | groups.fragment);

        let handle = ctx.physics_mut().add_body(body);
        self.ecs_world.spawn((Planet(planet), Body(handle)));
    }

    pub fn spawn_fragment(
        &mut self,
        ctx: &mut GameContext<GameTimer>,
        position: Vec2,
        angle: f32,
        velocity: Vec2,
        template: &FragmentTemplate
    ) {
        let groups = match self.collision_groups {
            Some(groups) => groups,
            None => return
        };

        let mut body = RigidBody::dynamic(position, template.radius);
        body.angle = angle;
        body.velocity = velocity;
        body.set_collision_group(groups.fragment);
        body.collides(groups.planet);
        body.collide_world_bounds = true;

        let handle = ctx.physics_mut().add_body(body);
        self.ecs_world.spawn((
            Fragment { frame: template.frame.clone() },
            Body(handle)
        ));
    }
}
