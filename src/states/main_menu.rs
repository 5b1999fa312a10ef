//! Title screen and root of the stack
//!
//! Besides the four menu buttons, the main menu owns a queue other threads
//! can push states into (invitation and link handlers in a networked build).
//! One queued state is pushed per frame.

use super::base::{State, StateContext, StateKind, StateResult, Transition};
use super::debug_menu::DebugMenu;
use super::exit_value::StateExitValue;
use super::level_select::LevelSelect;
use super::license_dialog::LicenseDialog;
use super::settings_menu::SettingsMenu;
use crate::error::StateError;
use crate::game::MusicCue;
use crate::services::remote_config::SUBTITLE_OVERRIDE_KEY;
use crate::ui::views::{MainMenuView, SubtitleOverride};
use crate::ui::{StateUi, UiEvent, ViewId};
use std::sync::{Arc, Mutex};

/// States waiting to be pushed over the main menu
///
/// Cloning shares the queue. Entries are taken most-recent first.
#[derive(Clone, Default)]
pub struct PendingStates {
    queue: Arc<Mutex<Vec<Box<dyn State + Send>>>>,
}

impl PendingStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, state: impl State + Send + 'static) {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        tracing::debug!(state = %state.kind(), "queued state for the main menu");
        queue.push(Box::new(state));
    }

    pub fn take_next(&self) -> Option<Box<dyn State + Send>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).pop()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Default)]
pub struct MainMenu {
    ui: StateUi<MainMenuView>,
    pending: PendingStates,
    /// Remote config generation the subtitle was last applied from
    applied_generation: Option<u64>,
}

impl MainMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for queueing states from other threads
    pub fn pending_states(&self) -> PendingStates {
        self.pending.clone()
    }

    fn initialize_ui(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        self.ui.spawn(ctx.ui)?;
        self.apply_subtitle_override(ctx);
        self.ui.show(ctx.ui);
        Ok(())
    }

    fn apply_subtitle_override(&mut self, ctx: &mut StateContext<'_>) {
        self.applied_generation = Some(ctx.game.remote_config.generation());
        let Some(id) = self.ui.id() else {
            return;
        };

        let Some(raw) = ctx.game.remote_config.get_string(SUBTITLE_OVERRIDE_KEY) else {
            tracing::warn!(key = SUBTITLE_OVERRIDE_KEY, "remote config value missing");
            return;
        };
        let subtitle: SubtitleOverride = match serde_json::from_str(&raw) {
            Ok(subtitle) => subtitle,
            Err(err) => {
                tracing::warn!(%err, "ignoring malformed subtitle override");
                return;
            }
        };
        if !subtitle.is_valid_override() {
            return;
        }

        if let Some(label) = ctx.ui.view_mut(id).and_then(|v| v.label_mut("subtitle")) {
            label.text = subtitle.text;
            label.font_size = subtitle.font_size;
            label.color = subtitle.text_color;
        }
    }
}

impl State for MainMenu {
    fn kind(&self) -> StateKind {
        StateKind::MainMenu
    }

    fn view(&self) -> Option<ViewId> {
        self.ui.id()
    }

    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError> {
        ctx.game.music.play(MusicCue::Menu, true);
        self.initialize_ui(ctx)
    }

    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        _exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError> {
        ctx.game.music.play(MusicCue::Menu, true);
        ctx.game.remote_config.request_fetch();
        self.initialize_ui(ctx)
    }

    fn suspend(&mut self, ctx: &mut StateContext<'_>) {
        self.ui.hide(ctx.ui);
    }

    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue> {
        self.ui.destroy(ctx.ui);
        None
    }

    fn update(&mut self, ctx: &mut StateContext<'_>) -> StateResult {
        if self.applied_generation != Some(ctx.game.remote_config.generation()) {
            self.apply_subtitle_override(ctx);
        }

        match self.pending.take_next() {
            Some(next) => {
                let next: Box<dyn State> = next;
                Ok(Transition::Push(next))
            }
            None => Ok(Transition::None),
        }
    }

    fn handle_ui_event(&mut self, _ctx: &mut StateContext<'_>, event: &UiEvent) -> StateResult {
        let Some(menu) = self.ui.get() else {
            return Ok(Transition::None);
        };

        let transition = if event.source == menu.play {
            Transition::swap(LevelSelect::new())
        } else if event.source == menu.settings {
            Transition::push(SettingsMenu::new())
        } else if event.source == menu.license {
            Transition::push(LicenseDialog::new())
        } else if event.source == menu.debug_menu {
            Transition::push(DebugMenu::new(&menu.debug_menu_prefab))
        } else {
            Transition::None
        };
        Ok(transition)
    }
}
