//! The level being played
//!
//! Gameplay configures the shared world on the way in and restores the menu
//! environment on the way out. Reaching the goal ends the run: a test loop
//! returns to whoever pushed it, a normal run is replaced by the level
//! finished screen.

use super::base::{Activity, State, StateContext, StateKind, StateResult, Transition};
use super::exit_value::{ExitData, StateExitValue};
use super::level_finished::LevelFinished;
use crate::error::StateError;
use crate::game::{CameraMode, GameContext, MusicCue, SleepTimeout};
use crate::services::remote_config::{PHYSICS_GRAVITY_DEFAULT, PHYSICS_GRAVITY_KEY};
use crate::ui::views::GameplayHud;
use crate::ui::{Anchor, GuiOverlay, Rgba, StateUi, UiEvent, ViewId};

/// Seconds simulated by one fixed update
pub const FIXED_TIMESTEP_SECS: f64 = 0.02;

/// Converts a fixed update count to elapsed seconds
pub fn elapsed_secs(fixed_updates: u64) -> f64 {
    fixed_updates as f64 * FIXED_TIMESTEP_SECS
}

/// Why gameplay was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameplayMode {
    Gameplay,
    Editor,
    TestLoop,
}

pub struct Gameplay {
    mode: GameplayMode,
    /// Fixed updates since the run started
    fixed_update_timestamp: u64,
    hud: StateUi<GameplayHud>,
}

impl Gameplay {
    pub fn new(mode: GameplayMode) -> Self {
        Gameplay {
            mode,
            fixed_update_timestamp: 0,
            hud: StateUi::new(),
        }
    }

    pub fn mode(&self) -> GameplayMode {
        self.mode
    }

    pub fn fixed_update_timestamp(&self) -> u64 {
        self.fixed_update_timestamp
    }

    fn exit_gameplay(&self, ctx: &mut StateContext<'_>) -> Transition {
        tracing::info!(mode = ?self.mode, "leaving gameplay");
        ctx.game.reset_map();
        Transition::Pop
    }
}

impl State for Gameplay {
    fn kind(&self) -> StateKind {
        StateKind::Gameplay
    }

    fn activity(&self) -> Activity {
        Activity::Gameplay
    }

    fn view(&self) -> Option<ViewId> {
        self.hud.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        ctx.game.music.play(MusicCue::Game, true);
        self.fixed_update_timestamp = 0;
        ctx.game.time_scale = 1.0;

        let gravity = ctx
            .game
            .remote_config
            .get_f64(PHYSICS_GRAVITY_KEY)
            .unwrap_or(PHYSICS_GRAVITY_DEFAULT);
        ctx.game.gravity = gravity as f32;

        ctx.game.reset_map();
        ctx.game.spawn_player();
        ctx.game.world.set_menu_scenery_hidden(true);
        ctx.game.camera = CameraMode::Gameplay;
        ctx.game.sleep_timeout = SleepTimeout::NeverSleep;
        ctx.game.world.merge_meshes();

        self.hud.spawn(ctx.ui)?;
        self.hud.show(ctx.ui);
        tracing::info!(mode = ?self.mode, gravity, "gameplay started");
        Ok(())
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        _exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        self.hud.show(ctx.ui);
        ctx.game.music.play(MusicCue::Game, true);
        ctx.game.time_scale = 1.0;
        ctx.game.camera = CameraMode::Gameplay;
        ctx.game.sleep_timeout = SleepTimeout::NeverSleep;
        Ok(())
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.hud.hide(ctx.ui);
        ctx.game.time_scale = 0.0;
        ctx.game.camera = CameraMode::Menu;
        ctx.game.sleep_timeout = SleepTimeout::NeverSleep;
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.hud.destroy(ctx.ui);
        ctx.game.camera = CameraMode::Menu;
        ctx.game.world.set_menu_scenery_hidden(false);
        ctx.game.time_scale = 0.0;
        ctx.game.sleep_timeout = SleepTimeout::SystemSetting;

        Some(StateExitValue::with_data(
            StateKind::Gameplay,
            ExitData::Gameplay {
                fixed_updates: self.fixed_update_timestamp,
                reached_goal: ctx.game.player_reached_goal(),
            },
        ))
    }

    fn fixed_update(&mut self, ctx: &mut StateContext<'_>) -> StateResult {
        if ctx.game.input.escape_pressed {
            return Ok(self.exit_gameplay(ctx));
        }

        if ctx.game.player_reached_goal() {
            tracing::info!(
                fixed_updates = self.fixed_update_timestamp,
                "goal reached"
            );
            return Ok(match self.mode {
                GameplayMode::TestLoop => {
                    ctx.game.music.play(MusicCue::Menu, true);
                    Transition::Pop
                }
                mode => {
                    ctx.game.music.play(MusicCue::Win, false);
                    Transition::swap(LevelFinished::new(mode, self.fixed_update_timestamp))
                }
            });
        }

        self.fixed_update_timestamp += 1;
        Ok(Transition::None)
    }

    fn handle_ui_event(&mut self, ctx: &mut StateContext<'_>, _event: &UiEvent) -> StateResult {
        Ok(self.exit_gameplay(ctx))
    }

    fn on_gui(&self, _game: &GameContext, overlay: &mut GuiOverlay) {
        overlay.label(
            format!("TIME: {:.2}", elapsed_secs(self.fixed_update_timestamp)),
            20,
            Rgba::WHITE,
            Anchor::TopCenter,
        );
    }
}
