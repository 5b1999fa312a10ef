use hamster::HostLoop;
use hamster::config::{AppConfig, DEFAULT_CONFIG_PATH};
use hamster::game::audio::JsonSettingsStore;
use hamster::game::{AudioSettings, FrameInput, GameContext};
use hamster::logging::init_logging;
use hamster::services::{FileConfigSource, RemoteConfig, Services};
use hamster::states::gameplay::FIXED_TIMESTEP_SECS;
use hamster::states::{Gameplay, GameplayMode, MainMenu};
use hamster::ui::{PrefabList, SpawnedView, UiEvent, ViewRegistry, builtin_prefabs};
use std::time::{Duration, Instant};

mod gui;
mod input_system;
mod render;
mod text;

use gui::{MenuSelection, MenuStyle, layout_view, render_view};
use input_system::{HostAction, InputSystem};
use render::{render_overlay, render_scene};

fn main() -> Result<(), String> {
    let config = AppConfig::load_or_default(DEFAULT_CONFIG_PATH);
    init_logging(&config.logging).map_err(|e| e.to_string())?;

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;

    let window = video_subsystem
        .window(&config.window_title, config.window_width, config.window_height)
        .position_centered()
        .resizable()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window.into_canvas().present_vsync().build().map_err(|e| e.to_string())?;
    canvas
        .set_logical_size(config.window_width, config.window_height)
        .map_err(|e| e.to_string())?;
    let screen = (config.window_width, config.window_height);

    let mut event_pump = sdl_context.event_pump()?;

    let mut host = build_host(&config);
    host.start(Box::new(MainMenu::new())).map_err(|e| e.to_string())?;
    if config.start_test_loop {
        host.push(Box::new(Gameplay::new(GameplayMode::TestLoop)))
            .map_err(|e| e.to_string())?;
    }

    let mut input = InputSystem::new();
    let mut selection = MenuSelection::new();
    let style = MenuStyle::default();
    let frame_duration = Duration::from_secs_f64(FIXED_TIMESTEP_SECS);

    tracing::info!(
        width = config.window_width,
        height = config.window_height,
        "window opened"
    );

    'running: loop {
        let frame_start = Instant::now();

        input.update_context(host.manager().is_game_running());
        selection.sync(active_view(&host));

        let mut frame_input = FrameInput::default();

        // Input → host events
        for action in input.poll_events(&mut event_pump) {
            match action {
                HostAction::Quit => break 'running,
                HostAction::SelectPrevious => {
                    if let Some(view) = active_view(&host) {
                        selection.select_previous(view.widgets.len());
                    }
                }
                HostAction::SelectNext => {
                    if let Some(view) = active_view(&host) {
                        selection.select_next(view.widgets.len());
                    }
                }
                HostAction::Step(amount) => {
                    if let Some(widget) = active_view(&host).and_then(|v| selection.selected_widget(v)) {
                        host.queue_ui_event(UiEvent::step(widget, amount));
                    }
                }
                HostAction::Confirm => {
                    if let Some(widget) = active_view(&host).and_then(|v| selection.selected_widget(v)) {
                        host.queue_ui_event(UiEvent::activated(widget));
                    }
                }
                HostAction::Back => {
                    host.click("back");
                }
                HostAction::Escape => frame_input.escape_pressed = true,
                HostAction::ReachGoal => {
                    if let Some(player) = host.game_mut().player.as_mut() {
                        player.reached_goal = true;
                    }
                }
                HostAction::LeftClick(x, y) => {
                    let hit = active_view(&host)
                        .and_then(|v| layout_view(v, &style, screen).widget_at(x, y));
                    if let Some(widget) = hit {
                        host.queue_ui_event(UiEvent::activated(widget));
                    }
                }
                HostAction::MouseMove(x, y) => {
                    if let Some(view) = active_view(&host) {
                        if let Some(widget) = layout_view(view, &style, screen).widget_at(x, y) {
                            selection.select_widget(view, widget);
                        }
                    }
                }
            }
        }

        // Stack → update → fixed update → remote config → overlay
        host.frame(frame_input).map_err(|e| e.to_string())?;
        if !host.is_running() {
            tracing::info!("state stack emptied, exiting");
            break 'running;
        }

        // Render: scene, view panels, overlay
        render_scene(&mut canvas, host.game(), screen)?;

        let active_id = active_view(&host).map(|v| v.id);
        let stacked = host.manager().depth() > 1;
        for view in host.ui().visible_views() {
            let is_active = Some(view.id) == active_id;
            let layout = layout_view(view, &style, screen);
            let selected = if is_active { selection.selected_widget(view) } else { None };
            render_view(&mut canvas, view, &layout, &style, selected, is_active && stacked)?;
        }

        render_overlay(&mut canvas, host.overlay(), screen)?;
        canvas.present();

        if let Some(rest) = frame_duration.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

fn build_host(config: &AppConfig) -> HostLoop {
    let mut prefabs = builtin_prefabs();
    if config.prefab_path.exists() {
        match PrefabList::load_from_file(&config.prefab_path) {
            Ok(loaded) => {
                tracing::info!(path = %config.prefab_path.display(), count = loaded.len(), "loaded prefabs");
                prefabs.merge(loaded);
            }
            Err(err) => tracing::warn!(%err, "could not load prefab file, using built-in prefabs"),
        }
    }

    let settings_path = config
        .settings_path
        .clone()
        .unwrap_or_else(JsonSettingsStore::default_path);
    let audio = AudioSettings::load(Box::new(JsonSettingsStore::new(settings_path)));

    let game = GameContext::new(audio, RemoteConfig::with_game_defaults(), Services::default());
    HostLoop::new(
        game,
        ViewRegistry::new(prefabs),
        Box::new(FileConfigSource::new(&config.remote_config_path)),
    )
}

/// View owned by the state on top of the stack
fn active_view(host: &HostLoop) -> Option<&SpawnedView> {
    let id = host.manager().current_state()?.view()?;
    host.ui().view(id)
}
