//! Volume settings
//!
//! Both sliders run from 0 to [`MAX_VOLUME`]. Every change is written to the
//! settings store straight away.

use super::base::{State, StateContext, StateKind, StateResult, Transition};
use super::exit_value::{ExitData, StateExitValue};
use crate::error::StateError;
use crate::game::MAX_VOLUME;
use crate::game::audio::step_volume;
use crate::ui::views::SettingsMenuView;
use crate::ui::{StateUi, UiEvent, UiPayload, ViewId};

#[derive(Default)]
pub struct SettingsMenu {
    ui: StateUi<SettingsMenuView>,
}

impl SettingsMenu {
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh_labels(&self, ctx: &mut StateContext<'_>) {
        let Some(id) = self.ui.id() else {
            return;
        };
        let music = volume_text(ctx.game.audio.music_volume());
        let sound_fx = volume_text(ctx.game.audio.sound_fx_volume());
        ctx.ui.set_label_text(id, "music_value", &music);
        ctx.ui.set_label_text(id, "sound_fx_value", &sound_fx);
    }
}

fn volume_text(volume: u8) -> String {
    format!("{}/{}", volume, MAX_VOLUME)
}

impl State for SettingsMenu {
    fn kind(&self) -> StateKind {
        StateKind::SettingsMenu
    }

    fn view(&self) -> Option<ViewId> {
        self.ui.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        self.ui.spawn(ctx.ui)?;
        self.refresh_labels(ctx);
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        _exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        self.refresh_labels(ctx);
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.ui.hide(ctx.ui);
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.ui.destroy(ctx.ui);
        let volumes = ctx.game.audio.snapshot();
        Some(StateExitValue::with_data(
            StateKind::SettingsMenu,
            ExitData::Settings {
                music_volume: volumes.music_volume,
                sound_fx_volume: volumes.sound_fx_volume,
            },
        ))
    }

    fn handle_ui_event(&mut self, ctx: &mut StateContext<'_>, event: &UiEvent) -> StateResult {
        let Some(menu) = self.ui.get() else {
            return Ok(Transition::None);
        };
        if event.source == menu.back {
            return Ok(Transition::Pop);
        }

        let UiPayload::Step(step) = event.payload else {
            return Ok(Transition::None);
        };
        let audio = &mut ctx.game.audio;
        let saved = if event.source == menu.music_volume {
            let volume = step_volume(audio.music_volume(), step);
            audio.set_music_volume(volume)
        } else if event.source == menu.sound_fx_volume {
            let volume = step_volume(audio.sound_fx_volume(), step);
            audio.set_sound_fx_volume(volume)
        } else {
            Ok(())
        };
        if let Err(err) = saved {
            tracing::warn!(%err, "volume changed but could not be saved");
        }

        self.refresh_labels(ctx);
        Ok(Transition::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::StateManager;
    use crate::states::main_menu::MainMenu;
    use crate::states::test_support::{click, fixture, widget};

    fn label(manager: &StateManager, ctx: &StateContext<'_>, name: &str) -> String {
        let view = manager.current_state().and_then(|s| s.view()).unwrap();
        ctx.ui.view(view).unwrap().label(name).unwrap().text.clone()
    }

    #[test]
    fn test_sliders_step_and_clamp() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut manager = StateManager::new();
        manager.push_state(Box::new(MainMenu::new()), &mut ctx).unwrap();
        manager.push_state(Box::new(SettingsMenu::new()), &mut ctx).unwrap();
        assert_eq!(label(&manager, &ctx, "music_value"), "6/6");

        let music = widget(&manager, ctx.ui, "music_volume");
        manager.handle_ui_event(&mut ctx, &UiEvent::step(music, -2)).unwrap();
        assert_eq!(ctx.game.audio.music_volume(), 4);
        assert_eq!(label(&manager, &ctx, "music_value"), "4/6");

        manager.handle_ui_event(&mut ctx, &UiEvent::step(music, 10)).unwrap();
        assert_eq!(ctx.game.audio.music_volume(), MAX_VOLUME);

        let sound_fx = widget(&manager, ctx.ui, "sound_fx_volume");
        manager.handle_ui_event(&mut ctx, &UiEvent::step(sound_fx, -10)).unwrap();
        assert_eq!(ctx.game.audio.sound_fx_volume(), 0);
        assert_eq!(label(&manager, &ctx, "sound_fx_value"), "0/6");
    }

    #[test]
    fn test_back_pops_with_both_volumes() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut settings = SettingsMenu::new();
        settings.initialize(&mut ctx).unwrap();

        let music = settings.ui.get().unwrap().music_volume;
        settings.handle_ui_event(&mut ctx, &UiEvent::step(music, -1)).unwrap();

        let back = settings.ui.get().unwrap().back;
        let transition = settings
            .handle_ui_event(&mut ctx, &UiEvent::activated(back))
            .unwrap();
        assert!(matches!(transition, Transition::Pop));

        let value = settings.cleanup(&mut ctx).unwrap();
        assert_eq!(
            *value.data(),
            ExitData::Settings {
                music_volume: 5,
                sound_fx_volume: 6
            }
        );
    }

    #[test]
    fn test_back_returns_to_the_caller() {
        let (mut game, mut ui) = fixture();
        let mut ctx = StateContext::new(&mut game, &mut ui);
        let mut manager = StateManager::new();
        manager.push_state(Box::new(MainMenu::new()), &mut ctx).unwrap();
        manager.push_state(Box::new(SettingsMenu::new()), &mut ctx).unwrap();

        let event = click(&manager, ctx.ui, "back");
        manager.handle_ui_event(&mut ctx, &event).unwrap();
        assert_eq!(manager.kinds(), vec![StateKind::MainMenu]);
        assert_eq!(ctx.ui.live_count(), 1);
    }
}
