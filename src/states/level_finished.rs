//! Shown over the level after the goal is reached

use super::base::{Activity, State, StateContext, StateKind, StateResult, Transition};
use super::exit_value::{ExitData, LevelFinishedChoice, StateExitValue};
use super::gameplay::{Gameplay, GameplayMode, elapsed_secs};
use crate::error::StateError;
use crate::ui::views::LevelFinishedView;
use crate::ui::{StateUi, UiEvent, ViewId};

pub struct LevelFinished {
    mode: GameplayMode,
    /// Fixed updates the finished run took
    fixed_updates: u64,
    choice: Option<LevelFinishedChoice>,
    ui: StateUi<LevelFinishedView>,
}

impl LevelFinished {
    pub fn new(mode: GameplayMode, fixed_updates: u64) -> Self {
        LevelFinished {
            mode,
            fixed_updates,
            choice: None,
            ui: StateUi::new(),
        }
    }

    fn leave(&mut self, choice: LevelFinishedChoice) -> Transition {
        self.choice = Some(choice);
        Transition::Pop
    }
}

impl State for LevelFinished {
    fn kind(&self) -> StateKind {
        StateKind::LevelFinished
    }

    fn activity(&self) -> Activity {
        Activity::GameplayBackdrop
    }

    fn view(&self) -> Option<ViewId> {
        self.ui.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        self.ui.spawn(ctx.ui)?;
        if let Some(id) = self.ui.id() {
            let text = format!("TIME: {:.2}", elapsed_secs(self.fixed_updates));
            ctx.ui.set_label_text(id, "elapsed_time", &text);
        }
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        _exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.ui.hide(ctx.ui);
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.ui.destroy(ctx.ui);
        self.choice.map(|choice| {
            StateExitValue::with_data(StateKind::LevelFinished, ExitData::LevelFinished(choice))
        })
    }

    fn handle_ui_event(&mut self, _ctx: &mut StateContext<'_>, event: &UiEvent) -> StateResult {
        let Some(&LevelFinishedView {
            retry,
            main,
            levels,
        }) = self.ui.get()
        else {
            return Ok(Transition::None);
        };

        let transition = if event.source == retry {
            Transition::swap(Gameplay::new(self.mode))
        } else if event.source == main {
            self.leave(LevelFinishedChoice::MainMenu)
        } else if event.source == levels {
            self.leave(LevelFinishedChoice::LevelSelect)
        } else {
            Transition::None
        };
        Ok(transition)
    }
}
