//! Level picker between the main menu and gameplay

use super::base::{State, StateContext, StateKind, StateResult, Transition};
use super::exit_value::{ExitData, LevelFinishedChoice, StateExitValue};
use super::gameplay::{Gameplay, GameplayMode};
use super::main_menu::MainMenu;
use crate::error::StateError;
use crate::game::MusicCue;
use crate::ui::views::LevelSelectView;
use crate::ui::{StateUi, UiEvent, ViewId};

#[derive(Default)]
pub struct LevelSelect {
    ui: StateUi<LevelSelectView>,
    /// Set when a finished level asked to go all the way back
    return_to_main_menu: bool,
}

impl LevelSelect {
    pub fn new() -> Self {
        Self::default()
    }
}

impl State for LevelSelect {
    fn kind(&self) -> StateKind {
        StateKind::LevelSelect
    }

    fn view(&self) -> Option<ViewId> {
        self.ui.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        ctx.game.music.play(MusicCue::Menu, true);
        self.ui.spawn(ctx.ui)?;
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        ctx.game.music.play(MusicCue::Menu, true);
        let back_to_main = ExitData::LevelFinished(LevelFinishedChoice::MainMenu);
        if exit_value.is_some_and(|value| *value.data() == back_to_main) {
            self.return_to_main_menu = true;
        }
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.ui.hide(ctx.ui);
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.ui.destroy(ctx.ui);
        None
    }

    fn update(&mut self, _ctx: &mut StateContext<'_>) -> StateResult {
        if self.return_to_main_menu {
            self.return_to_main_menu = false;
            return Ok(Transition::swap(MainMenu::new()));
        }
        Ok(Transition::None)
    }

    fn handle_ui_event(&mut self, ctx: &mut StateContext<'_>, event: &UiEvent) -> StateResult {
        let Some(menu) = self.ui.get() else {
            return Ok(Transition::None);
        };

        if event.source == menu.back {
            return Ok(Transition::swap(MainMenu::new()));
        }

        match menu.levels.iter().find(|(widget, _)| *widget == event.source) {
            Some(&(_, level)) => {
                tracing::info!(level, "level selected");
                ctx.game.world.select_level(level);
                Ok(Transition::push(Gameplay::new(GameplayMode::Gameplay)))
            }
            None => Ok(Transition::None),
        }
    }
}
