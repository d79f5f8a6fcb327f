use std::collections::HashSet;
use serde::{Deserialize, Serialize};
use crate::assets::AssetStore;
use crate::physics::{ImpactEvent, PhysicsWorld};
use crate::timers::{TimerHandle, TimerQueue};

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCode {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape
}

/// Everything a game can reach from its hooks: held keys, the physics world,
/// one-shot timers and loaded assets.
pub struct GameContext<TimerEvent> {
    keys_pressed: HashSet<KeyCode>,
    physics: PhysicsWorld,
    timers: TimerQueue<TimerEvent>,
    assets: AssetStore,
    frame: u64
}

impl<TimerEvent> GameContext<TimerEvent> {
    pub fn new(assets: AssetStore) -> Self {
        Self {
            keys_pressed: HashSet::new(),
            physics: PhysicsWorld::new(),
            timers: TimerQueue::new(),
            assets,
            frame: 0
        }
    }

    pub fn is_key_pressed(&self, key_code: KeyCode) -> bool {
        self.keys_pressed.contains(&key_code)
    }

    pub fn physics(&self) -> &PhysicsWorld { &self.physics }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld { &mut self.physics }

    pub fn assets(&self) -> &AssetStore { &self.assets }

    /// Seconds of simulated time since the stage started.
    pub fn elapsed(&self) -> f64 { self.timers.now() }

    /// Number of completed ticks.
    pub fn frame(&self) -> u64 { self.frame }

    /// Schedules `event` to be handed to [`ContextHandler::on_timer`] once,
    /// `delay_secs` from now. There is no way to cancel it.
    pub fn schedule_once(&mut self, delay_secs: f32, event: TimerEvent) -> TimerHandle {
        self.timers.schedule_once(delay_secs, event)
    }

    pub fn pending_timers(&self) -> usize { self.timers.pending_count() }
}

pub trait ContextHandler {
    type TimerEvent;

    fn get_title(&self) -> &'static str;
    fn on_key_down(&mut self, _ctx: &mut GameContext<Self::TimerEvent>, _key_code: KeyCode){}
    fn on_key_up(&mut self, _ctx: &mut GameContext<Self::TimerEvent>, _key_code: KeyCode){}
    fn on_impact(&mut self, _ctx: &mut GameContext<Self::TimerEvent>, _impact: ImpactEvent){}
    fn on_timer(&mut self, _ctx: &mut GameContext<Self::TimerEvent>, _event: Self::TimerEvent){}
    fn init(&mut self, ctx: &mut GameContext<Self::TimerEvent>);
    fn update(&mut self, ctx: &mut GameContext<Self::TimerEvent>, dt: f32);
}

/// Drives a [`ContextHandler`] one frame at a time.
///
/// A tick runs `update`, steps physics, then hands out impacts and expired
/// timers. Timers advance before impacts are dispatched, so a timer scheduled
/// from `on_impact` counts its delay from the end of the step that produced
/// the impact.
pub struct Stage<CtxHandler: ContextHandler> {
    context: GameContext<CtxHandler::TimerEvent>,
    handler: CtxHandler,
    initialized: bool
}

impl<CtxHandler: ContextHandler> Stage<CtxHandler> {
    pub fn new(handler: CtxHandler, assets: AssetStore) -> Self {
        Self {
            context: GameContext::new(assets),
            handler,
            initialized: false
        }
    }

    /// Runs the handler's `init` hook. Only the first call has any effect.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        tracing::info!(title = self.handler.get_title(), "initializing stage");
        self.handler.init(&mut self.context);
    }

    pub fn tick(&mut self, dt: f32) {
        self.initialize();

        self.handler.update(&mut self.context, dt);
        let impacts = self.context.physics.step(dt);
        let expired = self.context.timers.advance(dt);

        for impact in impacts {
            self.handler.on_impact(&mut self.context, impact);
        }
        for (_, event) in expired {
            self.handler.on_timer(&mut self.context, event);
        }

        self.context.frame += 1;
    }

    pub fn key_down(&mut self, key_code: KeyCode) {
        if self.context.keys_pressed.insert(key_code) {
            self.handler.on_key_down(&mut self.context, key_code);
        }
    }

    pub fn key_up(&mut self, key_code: KeyCode) {
        if self.context.keys_pressed.remove(&key_code) {
            self.handler.on_key_up(&mut self.context, key_code);
        }
    }

    pub fn handler(&self) -> &CtxHandler { &self.handler }

    pub fn handler_mut(&mut self) -> &mut CtxHandler { &mut self.handler }

    pub fn context(&self) -> &GameContext<CtxHandler::TimerEvent> { &self.context }
}
