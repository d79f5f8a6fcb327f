use std::collections::HashSet;
use std::path::PathBuf;
use clap::Parser;
use glam::{vec2, Vec2};
use gravity_well::{
    assets::AssetStore,
    host::{ContextHandler, GameContext, KeyCode, Stage},
    physics::{BodyHandle, CollisionGroup, ImpactEvent, PhysicsError, PhysicsWorld, WorldBounds},
    utility::StopWatch
};
use rand::{rngs::StdRng, SeedableRng};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use crate::components::{Body, Fragment, GameOverOverlay};
use crate::config::{GameConfig, ScriptedKey};
use crate::constants::*;
use crate::error::GameError;
use crate::planets::{PlanetFactory, PlanetaryBody};
use crate::subsystems::gravity::ForceAccumulator;

mod components;
mod config;
mod constants;
mod error;
mod planets;
mod subsystems;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameTimer {
    ShowGameOver
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollisionGroups {
    pub player: CollisionGroup,
    pub planet: CollisionGroup,
    pub fragment: CollisionGroup
}

impl CollisionGroups {
    pub fn create(physics: &mut PhysicsWorld) -> Result<Self, PhysicsError> {
        Ok(Self {
            player: physics.create_collision_group()?,
            planet: physics.create_collision_group()?,
            fragment: physics.create_collision_group()?
        })
    }
}

#[derive(Clone, Debug)]
pub struct FragmentTemplate {
    pub frame: String,
    pub radius: f32
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GameOverState {
    pub scheduled: bool,
    pub exploded_at: Option<f64>,
    pub shown_at: Option<f64>
}

pub struct GravityGame {
    pub config: GameConfig,
    pub ecs_world: hecs::World,
    pub player_entity: Option<hecs::Entity>,
    pub collision_groups: Option<CollisionGroups>,
    pub force_accumulator: ForceAccumulator,
    pub planet_layout: Vec<(Vec2, PlanetaryBody)>,
    pub ship_radius: f32,
    pub fragment_templates: Vec<FragmentTemplate>,
    pub game_over: GameOverState,
    rng: StdRng
}

impl ContextHandler for GravityGame {
    type TimerEvent = GameTimer;

    fn get_title(&self) -> &'static str { "gravity" }

    fn init(&mut self, ctx: &mut GameContext<GameTimer>) {
        ctx.physics_mut().set_bounds(WorldBounds::from_origin_size(
            0.0,
            0.0,
            self.config.world_width,
            self.config.world_height
        ));

        match CollisionGroups::create(ctx.physics_mut()) {
            Ok(groups) => self.collision_groups = Some(groups),
            Err(error) => {
                tracing::error!(%error, "failed to create collision groups");
                return;
            }
        }

        self.spawn_new_player(ctx);
        self.spawn_planets(ctx);
        tracing::info!(planets = self.planet_layout.len(), "world ready");
    }

    fn on_impact(&mut self, ctx: &mut GameContext<GameTimer>, impact: ImpactEvent) {
        self.update_player_collisions(ctx, impact);
    }

    fn on_timer(&mut self, ctx: &mut GameContext<GameTimer>, timer: GameTimer) {
        self.handle_timer(ctx, timer);
    }

    fn update(&mut self, ctx: &mut GameContext<GameTimer>, _dt: f32) {
        self.update_gravity(ctx);
        self.update_player_controls(ctx);
        self.force_accumulator.reset();
    }
}

impl GravityGame {
    /// Resolves every asset and planet the session needs, so that a bad
    /// config is reported before the first frame.
    pub fn new(config: GameConfig, assets: &AssetStore, rng: StdRng) -> Result<Self, GameError> {
        let factory = PlanetFactory::from_sprite(MOON_SPRITE, config.planet_scale, assets)?;
        let mut planet_layout = Vec::with_capacity(config.planets.len());
        for placement in config.planets.iter() {
            let planet = factory.make_planet(placement.size)?;
            planet_layout.push((vec2(placement.x, placement.y), planet));
        }

        let ship_sprite = assets.sprite(SHIP_SPRITE)?;
        let ship_radius = body_radius(ship_sprite.width, ship_sprite.height, config.ship_scale);

        let mut fragment_templates = Vec::new();
        for row in 0..FRAGMENT_GRID_HEIGHT {
            for column in 0..FRAGMENT_GRID_WIDTH {
                let frame = fragment_frame_name(row, column);
                let rect = assets.atlas_frame(FRAGMENTS_ATLAS, &frame)?;
                fragment_templates.push(FragmentTemplate {
                    radius: body_radius(rect.w, rect.h, config.ship_scale),
                    frame
                });
            }
        }

        assets.sprite(GAME_OVER_SPRITE)?;

        Ok(Self {
            config,
            ecs_world: hecs::World::new(),
            player_entity: None,
            collision_groups: None,
            force_accumulator: ForceAccumulator::default(),
            planet_layout,
            ship_radius,
            fragment_templates,
            game_over: GameOverState::default(),
            rng
        })
    }

    pub fn player_body(&self) -> Option<BodyHandle> {
        self.player_entity
            .and_then(|entity| self.ecs_world.get::<Body>(entity).ok().map(|body| body.0))
    }

    pub fn fragment_count(&self) -> usize {
        self.ecs_world.query::<(&Fragment,)>().iter().count()
    }

    pub fn overlay_count(&self) -> usize {
        self.ecs_world.query::<(&GameOverOverlay,)>().iter().count()
    }
}

fn fragment_frame_name(row: u32, column: u32) -> String {
    format!("{}{}{}", FRAGMENT_PREFIX, row * FRAGMENT_GRID_WIDTH + column, FRAGMENT_SUFFIX)
}

/// Collision circle for a scaled sprite: the mean of its half extents.
fn body_radius(width: u32, height: u32, scale: f32) -> f32 {
    (width + height) as f32 * 0.25 * scale
}

#[derive(Parser)]
#[command(name = "gravity-game")]
#[command(about = "Flies the ship through a headless session and logs what happens")]
struct Args {
    /// Game configuration file (RON), built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed for the explosion randomness
    #[arg(long)]
    seed: Option<u64>
}

fn apply_input_script(stage: &mut Stage<GravityGame>, script: &[ScriptedKey], frame: u64) {
    let keys: HashSet<KeyCode> = script.iter().map(|it| it.key).collect();
    for key in keys {
        if script.iter().any(|it| it.key == key && it.is_held_at(frame)) {
            stage.key_down(key);
        } else {
            stage.key_up(key);
        }
    }
}

fn run_session(stage: &mut Stage<GravityGame>, script: &[ScriptedKey], frames: u64, dt: f32) {
    let _stop_watch = StopWatch::named("session");
    stage.initialize();
    for frame in 0..frames {
        apply_input_script(stage, script, frame);
        stage.tick(dt);
    }
}

fn main() -> Result<(), GameError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default()
    };
    let assets = AssetStore::load(&config.assets)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, frames = args.frames, dt = args.dt, "starting session");

    let script = config.input_script.clone();
    let game = GravityGame::new(config, &assets, StdRng::seed_from_u64(seed))?;
    let mut stage = Stage::new(game, assets);
    run_session(&mut stage, &script, args.frames, args.dt);

    let game = stage.handler();
    tracing::info!(
        elapsed = stage.context().elapsed(),
        ship_alive = game.player_entity.is_some(),
        fragments = game.fragment_count(),
        game_over = game.game_over.shown_at.is_some(),
        "session finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use gravity_well::physics::{CollisionMask, RigidBody};
    use crate::components::Planet;
    use crate::config::PlanetPlacement;
    use crate::planets::PlanetError;
    use crate::subsystems::gravity::gravitational_force;
    use super::*;

    fn make_game(config: GameConfig, seed: u64) -> (GravityGame, AssetStore) {
        let assets = AssetStore::load(&config.assets).unwrap();
        let game = GravityGame::new(config, &assets, StdRng::seed_from_u64(seed)).unwrap();
        (game, assets)
    }

    fn planet_handles(game: &GravityGame) -> Vec<(BodyHandle, f32)> {
        game.ecs_world
            .query::<(&Planet, &Body)>()
            .iter()
            .map(|(_, (Planet(planet), Body(handle)))| (*handle, planet.mass()))
            .collect()
    }

    #[test]
    fn init_builds_ship_and_planets() {
        let (mut game, assets) = make_game(GameConfig::default(), 1);
        let mut ctx = GameContext::new(assets);
        game.init(&mut ctx);

        let groups = game.collision_groups.unwrap();
        let ship = ctx.physics().body(game.player_body().unwrap()).unwrap();
        assert_eq!(ship.position, vec2(60.0, 60.0));
        assert_eq!(ship.collision_group(), groups.player);
        assert_eq!(ship.radius(), 27.5);
        assert!(ship.collide_world_bounds);

        let planets: Vec<&RigidBody> = ctx.physics().bodies_in_group(groups.planet).map(|(_, b)| b).collect();
        assert_eq!(planets.len(), 2);
        assert_eq!(planets[0].position, vec2(800.0, 400.0));
        assert_eq!(planets[0].radius(), 31.25);
        assert_eq!(planets[1].radius(), 62.5);
        assert!(planets.iter().all(|planet| planet.is_static()));
        assert!(planets[1].collision_mask().contains(groups.player));
        assert!(planets[1].collision_mask().contains(groups.fragment));

        let bounds = ctx.physics().bounds().unwrap();
        assert_eq!((bounds.width(), bounds.height()), (3000.0, 600.0));
    }

    #[test]
    fn update_applies_summed_gravity_and_clears_the_accumulator() {
        let (mut game, assets) = make_game(GameConfig::default(), 1);
        let mut ctx = GameContext::new(assets);
        game.init(&mut ctx);

        game.update(&mut ctx, 1.0 / 60.0);
        assert!(game.force_accumulator.is_zero());

        let ship_position = vec2(60.0, 60.0);
        let expected = planet_handles(&game)
            .into_iter()
            .map(|(handle, mass)| gravitational_force(
                ship_position,
                ctx.physics().body(handle).unwrap().position,
                mass,
                GRAVITY,
                GRAVITY_SOFTENING
            ))
            .fold(Vec2::ZERO, |sum, force| sum + force);
        let applied = ctx.physics().body(game.player_body().unwrap()).unwrap().force;
        assert!((applied - expected).length() < 1e-3);
    }

    #[test]
    fn accumulator_is_zero_after_every_tick() {
        let (game, assets) = make_game(GameConfig::default(), 1);
        let mut stage = Stage::new(game, assets);
        stage.key_down(KeyCode::Up);
        for _ in 0..120 {
            stage.tick(1.0 / 60.0);
            assert!(stage.handler().force_accumulator.is_zero());
        }
    }

    #[test]
    fn controls_turn_and_thrust_the_ship() {
        let config = GameConfig {
            planets: Vec::new(),
            ship_start: (1000.0, 300.0),
            ..GameConfig::default()
        };
        let (game, assets) = make_game(config, 1);
        let mut stage = Stage::new(game, assets);

        stage.key_down(KeyCode::Up);
        stage.tick(0.5);
        let ship_handle = stage.handler().player_body().unwrap();
        let ship = stage.context().physics().body(ship_handle).unwrap();
        assert!((ship.velocity - vec2(0.0, -100.0)).length() < 1e-3);
        assert_eq!(ship.angular_velocity, 0.0);

        stage.key_up(KeyCode::Up);
        stage.key_down(KeyCode::Left);
        stage.key_down(KeyCode::Right);
        stage.tick(0.5);
        let ship = stage.context().physics().body(ship_handle).unwrap();
        assert_eq!(ship.angular_velocity, -ANGULAR_VELOCITY);
        assert_eq!(ship.angle, -1.5);

        stage.key_up(KeyCode::Left);
        stage.tick(0.5);
        assert_eq!(stage.context().physics().body(ship_handle).unwrap().angular_velocity, ANGULAR_VELOCITY);

        stage.key_up(KeyCode::Right);
        stage.tick(0.5);
        assert_eq!(stage.context().physics().body(ship_handle).unwrap().angular_velocity, 0.0);
    }

    #[test]
    fn planet_impact_breaks_the_ship_into_nine_fragments() {
        let (mut game, assets) = make_game(GameConfig::default(), 7);
        let mut ctx = GameContext::new(assets);
        game.init(&mut ctx);

        let groups = game.collision_groups.unwrap();
        let ship_handle = game.player_body().unwrap();
        ctx.physics_mut().body_mut(ship_handle).unwrap().angle = 0.75;
        let (planet_handle, _) = planet_handles(&game)[0];
        let impact = ImpactEvent {
            body: ship_handle,
            other: planet_handle,
            approach_velocity: vec2(30.0, -10.0)
        };

        game.on_impact(&mut ctx, impact);

        assert!(game.player_entity.is_none());
        assert!(!ctx.physics().contains(ship_handle));
        assert_eq!(game.fragment_count(), 9);
        assert_eq!(ctx.pending_timers(), 1);

        let mut frames = Vec::new();
        for (_, (fragment, Body(handle))) in game.ecs_world.query::<(&Fragment, &Body)>().iter() {
            frames.push(fragment.frame.clone());
            let body = ctx.physics().body(*handle).unwrap();
            assert_eq!(body.collision_group(), groups.fragment);
            assert_eq!(body.collision_mask(), CollisionMask::from(groups.planet));
            assert_eq!(body.position, vec2(60.0, 60.0));
            assert_eq!(body.angle, 0.75);
            assert!(body.collide_world_bounds);

            let speed_x = body.velocity.x / -30.0;
            let speed_y = body.velocity.y / 10.0;
            assert!((0.0..MAX_EXPLOSION_SPEED).contains(&speed_x));
            assert!((0.0..MAX_EXPLOSION_SPEED).contains(&speed_y));
        }
        frames.sort();
        let expected: Vec<String> = (0..9).map(|i| format!("fragment_{}.png", i)).collect();
        assert_eq!(frames, expected);

        // a second report of the same contact changes nothing
        game.on_impact(&mut ctx, impact);
        assert_eq!(game.fragment_count(), 9);
        assert_eq!(ctx.pending_timers(), 1);
    }

    #[test]
    fn impacts_with_other_bodies_are_ignored() {
        let (mut game, assets) = make_game(GameConfig::default(), 7);
        let mut ctx = GameContext::new(assets);
        game.init(&mut ctx);

        let ship_handle = game.player_body().unwrap();
        let stray = ctx.physics_mut().add_body(RigidBody::dynamic(vec2(60.0, 60.0), 1.0));
        game.on_impact(&mut ctx, ImpactEvent {
            body: ship_handle,
            other: stray,
            approach_velocity: vec2(1.0, 1.0)
        });
        assert!(game.player_entity.is_some());
        assert_eq!(game.fragment_count(), 0);
    }

    #[test]
    fn same_seed_scatters_fragments_the_same_way() {
        let velocities = |seed: u64| {
            let (mut game, assets) = make_game(GameConfig::default(), seed);
            let mut ctx = GameContext::new(assets);
            game.init(&mut ctx);
            let ship_handle = game.player_body().unwrap();
            let (planet_handle, _) = planet_handles(&game)[0];
            game.on_impact(&mut ctx, ImpactEvent {
                body: ship_handle,
                other: planet_handle,
                approach_velocity: vec2(5.0, 5.0)
            });
            let mut out: Vec<(String, Vec2)> = game.ecs_world
                .query::<(&Fragment, &Body)>()
                .iter()
                .map(|(_, (fragment, Body(handle)))| {
                    (fragment.frame.clone(), ctx.physics().body(*handle).unwrap().velocity)
                })
                .collect();
            out.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));
            out
        };
        assert_eq!(velocities(42), velocities(42));
    }

    #[test]
    fn game_over_shows_once_a_second_after_the_crash() {
        let config = GameConfig {
            planets: vec![PlanetPlacement { x: 400.0, y: 300.0, size: 2.0 }],
            ship_start: (400.0, 180.0),
            ..GameConfig::default()
        };
        let (game, assets) = make_game(config, 3);
        let mut stage = Stage::new(game, assets);

        let dt = 0.0625;
        let mut ticks = 0;
        while stage.handler().game_over.exploded_at.is_none() {
            stage.tick(dt);
            ticks += 1;
            assert!(ticks < 200, "ship never reached the planet");
        }
        assert_eq!(stage.handler().fragment_count(), 9);
        assert!(stage.handler().game_over.shown_at.is_none());

        for _ in 0..15 {
            stage.tick(dt);
        }
        assert!(stage.handler().game_over.shown_at.is_none());
        stage.tick(dt);

        let game_over = stage.handler().game_over;
        assert_eq!(game_over.shown_at.unwrap() - game_over.exploded_at.unwrap(), 1.0);
        assert_eq!(stage.handler().overlay_count(), 1);

        for _ in 0..64 {
            stage.tick(dt);
        }
        assert_eq!(stage.handler().game_over.shown_at, game_over.shown_at);
        assert_eq!(stage.handler().overlay_count(), 1);
    }

    #[test]
    fn bad_sessions_fail_before_the_first_frame() {
        let config = GameConfig {
            planets: vec![PlanetPlacement { x: 0.0, y: 0.0, size: -1.0 }],
            ..GameConfig::default()
        };
        let assets = AssetStore::load(&config.assets).unwrap();
        assert!(matches!(
            GravityGame::new(config, &assets, StdRng::seed_from_u64(0)),
            Err(GameError::Planet(PlanetError::InvalidSize(_)))
        ));

        assert!(matches!(
            GravityGame::new(GameConfig::default(), &AssetStore::default(), StdRng::seed_from_u64(0)),
            Err(GameError::Asset(_))
        ));
    }

    #[test]
    fn input_script_holds_keys_for_their_frames() {
        let (game, assets) = make_game(GameConfig::default(), 1);
        let mut stage = Stage::new(game, assets);
        let script = [
            ScriptedKey { key: KeyCode::Up, from_frame: 1, to_frame: 3 },
            ScriptedKey { key: KeyCode::Up, from_frame: 5, to_frame: 6 }
        ];
        let held: Vec<bool> = (0..7)
            .map(|frame| {
                apply_input_script(&mut stage, &script, frame);
                stage.context().is_key_pressed(KeyCode::Up)
            })
            .collect();
        assert_eq!(held, vec![false, true, true, false, false, true, false]);
    }
}
