// Host loop - owns the game context, the UI registry and the state stack
//
// A front-end calls `frame` once per tick. Each frame:
// 1. queued UI events are routed through the state manager
// 2. the top state gets `update`, then `fixed_update`
// 3. a pending remote config fetch is serviced
// 4. the GUI overlay is rebuilt from the top state
//
// Fatal errors are returned to the caller. Anything else is logged and the
// session carries on.

use crate::error::StateError;
use crate::game::{FrameInput, GameContext};
use crate::services::{ConfigSource, StaticConfigSource};
use crate::states::{State, StateContext, StateManager};
use crate::ui::{GuiOverlay, UiEvent, ViewRegistry, WidgetId, builtin_prefabs};
use std::collections::VecDeque;

pub struct HostLoop {
    manager: StateManager,
    game: GameContext,
    ui: ViewRegistry,
    pending_events: VecDeque<UiEvent>,
    config_source: Box<dyn ConfigSource>,
    overlay: GuiOverlay,
}

impl HostLoop {
    pub fn new(game: GameContext, ui: ViewRegistry, config_source: Box<dyn ConfigSource>) -> Self {
        HostLoop {
            manager: StateManager::new(),
            game,
            ui,
            pending_events: VecDeque::new(),
            config_source,
            overlay: GuiOverlay::new(),
        }
    }

    /// Built-in prefabs, in-memory settings and no remote config backend
    pub fn headless() -> Self {
        Self::new(
            GameContext::headless(),
            ViewRegistry::new(builtin_prefabs()),
            Box::new(StaticConfigSource::offline()),
        )
    }

    /// Fetches remote config once, then pushes the root state
    pub fn start(&mut self, root: Box<dyn State>) -> Result<(), StateError> {
        self.game.remote_config.request_fetch();
        self.service_remote_config();
        self.push(root)
    }

    pub fn push(&mut self, state: Box<dyn State>) -> Result<(), StateError> {
        let mut ctx = StateContext::new(&mut self.game, &mut self.ui);
        let result = self.manager.push_state(state, &mut ctx);
        report(result)
    }

    pub fn queue_ui_event(&mut self, event: UiEvent) {
        self.pending_events.push_back(event);
    }

    /// Widget of the active state's view, by name
    pub fn find_widget(&self, name: &str) -> Option<WidgetId> {
        let view = self.manager.current_state()?.view()?;
        self.ui.view(view)?.widget(name)
    }

    /// Queues a press of the named widget on the active view. Returns false
    /// when no such widget is showing.
    pub fn click(&mut self, name: &str) -> bool {
        match self.find_widget(name) {
            Some(widget) => {
                self.queue_ui_event(UiEvent::activated(widget));
                true
            }
            None => false,
        }
    }

    /// Queues a slider step on the named widget of the active view
    pub fn step(&mut self, name: &str, amount: i32) -> bool {
        match self.find_widget(name) {
            Some(widget) => {
                self.queue_ui_event(UiEvent::step(widget, amount));
                true
            }
            None => false,
        }
    }

    pub fn frame(&mut self, input: FrameInput) -> Result<(), StateError> {
        self.game.input = input;

        while let Some(event) = self.pending_events.pop_front() {
            let mut ctx = StateContext::new(&mut self.game, &mut self.ui);
            let result = self.manager.handle_ui_event(&mut ctx, &event);
            report(result)?;
        }

        let mut ctx = StateContext::new(&mut self.game, &mut self.ui);
        let result = self.manager.update(&mut ctx);
        report(result)?;
        let result = self.manager.fixed_update(&mut ctx);
        report(result)?;

        self.service_remote_config();

        self.overlay.clear();
        self.manager.on_gui(&self.game, &mut self.overlay);
        Ok(())
    }

    fn service_remote_config(&mut self) {
        if !self.game.remote_config.take_fetch_request() {
            return;
        }
        tracing::debug!("fetching remote config");
        match self.config_source.fetch() {
            Ok(values) => {
                self.game.remote_config.complete_fetch(values);
                self.game.remote_config.activate();
            }
            Err(err) => self.game.remote_config.fail_fetch(&err),
        }
    }

    pub fn manager(&self) -> &StateManager {
        &self.manager
    }

    pub fn game(&self) -> &GameContext {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameContext {
        &mut self.game
    }

    pub fn ui(&self) -> &ViewRegistry {
        &self.ui
    }

    pub fn overlay(&self) -> &GuiOverlay {
        &self.overlay
    }

    pub fn is_running(&self) -> bool {
        !self.manager.is_empty()
    }
}

/// Passes fatal errors through and logs the rest
fn report(result: Result<(), StateError>) -> Result<(), StateError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_fatal() => {
            tracing::error!(%err, "fatal state stack error");
            Err(err)
        }
        Err(err) => {
            tracing::warn!(%err, "state error, continuing");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::remote_config::{FetchStatus, SUBTITLE_OVERRIDE_KEY};
    use crate::states::{Gameplay, GameplayMode, MainMenu, StateKind};
    use crate::ui::Rgba;
    use crate::ui::views::{MAIN_MENU_PREFAB, SubtitleOverride};
    use serde_json::Value;
    use std::collections::HashMap;

    fn started() -> HostLoop {
        let mut host = HostLoop::headless();
        host.start(Box::new(MainMenu::new())).unwrap();
        host
    }

    fn idle(host: &mut HostLoop) {
        host.frame(FrameInput::default()).unwrap();
    }

    #[test]
    fn test_play_through_a_level_and_back_to_the_main_menu() {
        let mut host = started();
        assert_eq!(host.manager().kinds(), vec![StateKind::MainMenu]);

        assert!(host.click("play"));
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::LevelSelect]);

        assert!(host.click("level_1"));
        idle(&mut host);
        assert_eq!(
            host.manager().kinds(),
            vec![StateKind::LevelSelect, StateKind::Gameplay]
        );
        assert!(host.manager().is_game_running());

        host.game_mut().spawn_player().reached_goal = true;
        idle(&mut host);
        assert_eq!(
            host.manager().kinds(),
            vec![StateKind::LevelSelect, StateKind::LevelFinished]
        );

        assert!(host.click("main"));
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::MainMenu]);
        assert_eq!(host.ui().live_count(), 1);
        assert!(!host.manager().is_game_running());
    }

    #[test]
    fn test_stale_event_from_a_swapped_out_state_is_ignored() {
        let mut host = started();
        host.click("play");
        idle(&mut host);
        host.click("level_1");
        idle(&mut host);

        // Both presses target the same HUD button; the first ends gameplay
        assert!(host.click("exit"));
        assert!(host.click("exit"));
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::LevelSelect]);
    }

    #[test]
    fn test_escape_leaves_gameplay() {
        let mut host = started();
        host.push(Box::new(Gameplay::new(GameplayMode::Gameplay))).unwrap();

        host.frame(FrameInput {
            escape_pressed: true,
        })
        .unwrap();
        assert_eq!(host.manager().kinds(), vec![StateKind::MainMenu]);
    }

    #[test]
    fn test_non_fatal_errors_do_not_stop_the_loop() {
        let mut host = started();
        host.click("debug_menu");
        idle(&mut host);
        assert_eq!(host.manager().current_kind(), Some(StateKind::DebugMenu));

        assert!(host.click("set_user_bored_of_subtitle"));
        idle(&mut host);
        assert_eq!(host.manager().current_kind(), Some(StateKind::DebugMenu));

        host.click("back");
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::MainMenu]);
    }

    #[test]
    fn test_popping_the_root_is_fatal() {
        let mut host = HostLoop::headless();
        host.start(Box::new(Gameplay::new(GameplayMode::TestLoop))).unwrap();

        host.game_mut().spawn_player().reached_goal = true;
        let err = host.frame(FrameInput::default()).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(host.manager().depth(), 1);
    }

    #[test]
    fn test_empty_host_reports_empty_stack() {
        let mut host = HostLoop::headless();
        assert!(!host.is_running());
        assert!(matches!(
            host.frame(FrameInput::default()),
            Err(StateError::EmptyStack)
        ));
    }

    #[test]
    fn test_test_loop_returns_to_main_menu_on_goal() {
        let mut host = started();
        host.push(Box::new(Gameplay::new(GameplayMode::TestLoop))).unwrap();
        idle(&mut host);
        assert_eq!(host.overlay().labels()[0].text, "TIME: 0.02");

        host.game_mut().spawn_player().reached_goal = true;
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::MainMenu]);
        assert!(host.overlay().is_empty());
    }

    #[test]
    fn test_resumed_main_menu_picks_up_fetched_subtitle() {
        let subtitle = SubtitleOverride::new("FRESH FROM THE SERVER", 30, Rgba::new(255, 200, 0, 255));
        let mut values = HashMap::new();
        values.insert(
            SUBTITLE_OVERRIDE_KEY.to_string(),
            Value::String(serde_json::to_string(&subtitle).unwrap()),
        );

        let mut host = HostLoop::new(
            GameContext::headless(),
            ViewRegistry::new(builtin_prefabs()),
            Box::new(StaticConfigSource::new(values)),
        );
        host.start(Box::new(MainMenu::new())).unwrap();
        assert_eq!(host.game().remote_config.info().status, FetchStatus::Success);
        assert_eq!(host.game().remote_config.generation(), 1);

        let subtitle_text = |host: &HostLoop| {
            let view = host.manager().current_state().and_then(|s| s.view()).unwrap();
            host.ui().view(view).unwrap().label("subtitle").unwrap().text.clone()
        };
        assert_eq!(subtitle_text(&host), "FRESH FROM THE SERVER");

        host.click("license");
        idle(&mut host);
        host.click("back");
        // Pop requests a fetch, serviced at the end of the same frame
        idle(&mut host);
        assert_eq!(host.game().remote_config.generation(), 2);
        idle(&mut host);
        assert_eq!(subtitle_text(&host), "FRESH FROM THE SERVER");
    }

    #[test]
    fn test_missing_debug_menu_prefab_keeps_the_main_menu_usable() {
        let mut prefabs = builtin_prefabs();
        let main_menu = prefabs
            .get(MAIN_MENU_PREFAB)
            .cloned()
            .unwrap()
            .with_property("debug_menu_prefab", "NoSuchPrefab");
        prefabs.insert(MAIN_MENU_PREFAB, main_menu);

        let mut host = HostLoop::new(
            GameContext::headless(),
            ViewRegistry::new(prefabs),
            Box::new(StaticConfigSource::offline()),
        );
        host.start(Box::new(MainMenu::new())).unwrap();

        assert!(host.click("debug_menu"));
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::MainMenu]);
        assert_eq!(host.ui().visible_views().count(), 1);

        assert!(host.click("play"));
        idle(&mut host);
        assert_eq!(host.manager().kinds(), vec![StateKind::LevelSelect]);
    }

    #[test]
    fn test_offline_fetch_keeps_defaults() {
        let host = started();
        assert_eq!(host.game().remote_config.info().status, FetchStatus::Failure);
        assert_eq!(host.game().remote_config.generation(), 0);
        assert_eq!(host.manager().current_kind(), Some(StateKind::MainMenu));
    }
}
