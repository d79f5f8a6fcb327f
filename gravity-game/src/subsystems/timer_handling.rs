use gravity_well::host::GameContext;
use crate::{
    components::*,
    constants::*,
    GameTimer,
    GravityGame
};

impl GravityGame {
    pub fn handle_timer(&mut self, ctx: &mut GameContext<GameTimer>, timer: GameTimer) {
        match timer {
            GameTimer::ShowGameOver => self.display_game_over_text(ctx)
        }
    }

    fn display_game_over_text(&mut self, ctx: &mut GameContext<GameTimer>) {
        if self.game_over.shown_at.is_some() {
            return;
        }
        let shown_at = ctx.elapsed();
        self.game_over.shown_at = Some(shown_at);
        self.ecs_world.spawn((GameOverOverlay { sprite: GAME_OVER_SPRITE, shown_at },));
        tracing::info!(at = shown_at, "game over");
    }
}
