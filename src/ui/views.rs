//! Typed bindings for the game's menu prefabs
//!
//! Each struct gives a state code access to the widgets of one prefab.
//! [`builtin_prefabs`] provides templates for all of them so the game runs
//! without a prefab file on disk.

use super::registry::{PrefabList, Rgba, SpawnedView, ViewTemplate, WidgetId, WidgetTemplate};
use super::view::{MenuView, require_widget};
use crate::error::UiError;
use serde::{Deserialize, Serialize};

pub const MAIN_MENU_PREFAB: &str = "MainMenu";
pub const DEBUG_MENU_PREFAB: &str = "DebugMenu";
pub const SETTINGS_MENU_PREFAB: &str = "SettingsMenu";
pub const LICENSE_DIALOG_PREFAB: &str = "LicenseDialog";
pub const LEVEL_SELECT_PREFAB: &str = "LevelSelect";
pub const LEVEL_FINISHED_PREFAB: &str = "LevelFinished";
pub const GAMEPLAY_HUD_PREFAB: &str = "GameplayHud";

/// Number of levels offered by the built-in level select prefab
pub const BUILTIN_LEVEL_COUNT: usize = 3;

pub struct MainMenuView {
    pub play: WidgetId,
    pub settings: WidgetId,
    pub license: WidgetId,
    pub debug_menu: WidgetId,
    /// Prefab the debug menu state spawns
    pub debug_menu_prefab: String,
}

impl MenuView for MainMenuView {
    const PREFAB: &'static str = MAIN_MENU_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        Ok(MainMenuView {
            play: require_widget(view, "play")?,
            settings: require_widget(view, "settings")?,
            license: require_widget(view, "license")?,
            debug_menu: require_widget(view, "debug_menu")?,
            debug_menu_prefab: view
                .property("debug_menu_prefab")
                .unwrap_or(DEBUG_MENU_PREFAB)
                .to_string(),
        })
    }
}

/// Remote-config override for the main menu subtitle
///
/// Only applied when every field holds a non-default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleOverride {
    pub text: String,
    pub font_size: u32,
    pub text_color: Rgba,
}

impl SubtitleOverride {
    pub fn new(text: &str, font_size: u32, text_color: Rgba) -> Self {
        SubtitleOverride {
            text: text.to_string(),
            font_size,
            text_color,
        }
    }

    pub fn is_valid_override(&self) -> bool {
        self.text_color != Rgba::default() && self.font_size != 0 && !self.text.is_empty()
    }

    /// JSON published as the remote-config default; never a valid override
    pub fn default_json() -> String {
        let placeholder = SubtitleOverride::new("", 8, Rgba::new(255, 0, 0, 255));
        serde_json::to_string(&placeholder).unwrap_or_default()
    }
}

pub struct DebugMenuView {
    pub back: WidgetId,
    pub crash_now: WidgetId,
    pub log_nonfatal_error: WidgetId,
    pub log_strings_and_crash_now: WidgetId,
    pub set_custom_key_and_crash_now: WidgetId,
    pub set_logs_and_keys_before_anr: WidgetId,
    pub log_progress_event: WidgetId,
    pub log_int_score: WidgetId,
    pub set_user_bored_of_subtitle: WidgetId,
    pub set_user_enjoys_subtitle: WidgetId,
}

impl MenuView for DebugMenuView {
    const PREFAB: &'static str = DEBUG_MENU_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        Ok(DebugMenuView {
            back: require_widget(view, "back")?,
            crash_now: require_widget(view, "crash_now")?,
            log_nonfatal_error: require_widget(view, "log_nonfatal_error")?,
            log_strings_and_crash_now: require_widget(view, "log_strings_and_crash_now")?,
            set_custom_key_and_crash_now: require_widget(view, "set_custom_key_and_crash_now")?,
            set_logs_and_keys_before_anr: require_widget(view, "set_logs_and_keys_before_anr")?,
            log_progress_event: require_widget(view, "log_progress_event")?,
            log_int_score: require_widget(view, "log_int_score")?,
            set_user_bored_of_subtitle: require_widget(view, "set_user_bored_of_subtitle")?,
            set_user_enjoys_subtitle: require_widget(view, "set_user_enjoys_subtitle")?,
        })
    }
}

pub struct SettingsMenuView {
    pub music_volume: WidgetId,
    pub sound_fx_volume: WidgetId,
    pub back: WidgetId,
}

impl MenuView for SettingsMenuView {
    const PREFAB: &'static str = SETTINGS_MENU_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        Ok(SettingsMenuView {
            music_volume: require_widget(view, "music_volume")?,
            sound_fx_volume: require_widget(view, "sound_fx_volume")?,
            back: require_widget(view, "back")?,
        })
    }
}

pub struct LicenseDialogView {
    pub back: WidgetId,
}

impl MenuView for LicenseDialogView {
    const PREFAB: &'static str = LICENSE_DIALOG_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        Ok(LicenseDialogView {
            back: require_widget(view, "back")?,
        })
    }
}

pub struct LevelSelectView {
    /// Level buttons paired with their zero-based level index
    pub levels: Vec<(WidgetId, usize)>,
    pub back: WidgetId,
}

impl MenuView for LevelSelectView {
    const PREFAB: &'static str = LEVEL_SELECT_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        // Level buttons are named level_1, level_2, ...
        let mut levels: Vec<(WidgetId, usize)> = view
            .widgets
            .iter()
            .filter_map(|w| {
                let number: usize = w.name.strip_prefix("level_")?.parse().ok()?;
                Some((w.id, number.checked_sub(1)?))
            })
            .collect();
        levels.sort_by_key(|(_, index)| *index);

        Ok(LevelSelectView {
            levels,
            back: require_widget(view, "back")?,
        })
    }
}

pub struct LevelFinishedView {
    pub retry: WidgetId,
    pub main: WidgetId,
    pub levels: WidgetId,
}

impl MenuView for LevelFinishedView {
    const PREFAB: &'static str = LEVEL_FINISHED_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        Ok(LevelFinishedView {
            retry: require_widget(view, "retry")?,
            main: require_widget(view, "main")?,
            levels: require_widget(view, "levels")?,
        })
    }
}

/// Floating button shown during gameplay
pub struct GameplayHud {
    pub exit: WidgetId,
}

impl MenuView for GameplayHud {
    const PREFAB: &'static str = GAMEPLAY_HUD_PREFAB;

    fn bind(view: &SpawnedView) -> Result<Self, UiError> {
        Ok(GameplayHud {
            exit: require_widget(view, "exit")?,
        })
    }
}

/// Templates for every prefab the built-in states spawn
pub fn builtin_prefabs() -> PrefabList {
    let mut prefabs = PrefabList::new();

    prefabs.insert(
        MAIN_MENU_PREFAB,
        ViewTemplate::new(
            "HAMSTER",
            vec![
                WidgetTemplate::new("play", "PLAY"),
                WidgetTemplate::new("settings", "SETTINGS"),
                WidgetTemplate::new("license", "LICENSE"),
                WidgetTemplate::new("debug_menu", "DEBUG"),
            ],
        )
        .with_label("subtitle", "ROLL TO THE GOAL", 20)
        .with_property("debug_menu_prefab", DEBUG_MENU_PREFAB),
    );

    prefabs.insert(
        DEBUG_MENU_PREFAB,
        ViewTemplate::new(
            "DEBUG",
            vec![
                WidgetTemplate::new("back", "BACK"),
                WidgetTemplate::new("crash_now", "CRASH NOW"),
                WidgetTemplate::new("log_nonfatal_error", "LOG NONFATAL ERROR"),
                WidgetTemplate::new("log_strings_and_crash_now", "LOG STRINGS AND CRASH"),
                WidgetTemplate::new("set_custom_key_and_crash_now", "SET KEY AND CRASH"),
                WidgetTemplate::new("set_logs_and_keys_before_anr", "LOGS AND KEYS BEFORE ANR"),
                WidgetTemplate::new("log_progress_event", "LOG PROGRESS EVENT"),
                WidgetTemplate::new("log_int_score", "LOG SCORE EVENT"),
                WidgetTemplate::new("set_user_bored_of_subtitle", "BORED OF SUBTITLE"),
                WidgetTemplate::new("set_user_enjoys_subtitle", "ENJOYS SUBTITLE"),
            ],
        ),
    );

    prefabs.insert(
        SETTINGS_MENU_PREFAB,
        ViewTemplate::new(
            "SETTINGS",
            vec![
                WidgetTemplate::new("music_volume", "MUSIC"),
                WidgetTemplate::new("sound_fx_volume", "SOUND FX"),
                WidgetTemplate::new("back", "BACK"),
            ],
        )
        .with_label("music_value", "", 16)
        .with_label("sound_fx_value", "", 16),
    );

    prefabs.insert(
        LICENSE_DIALOG_PREFAB,
        ViewTemplate::new("LICENSE", vec![WidgetTemplate::new("back", "BACK")]).with_label(
            "license",
            "LICENSED UNDER THE APACHE LICENSE, VERSION 2.0",
            12,
        ),
    );

    let mut level_widgets: Vec<WidgetTemplate> = (1..=BUILTIN_LEVEL_COUNT)
        .map(|n| WidgetTemplate::new(&format!("level_{}", n), &format!("LEVEL {}", n)))
        .collect();
    level_widgets.push(WidgetTemplate::new("back", "BACK"));
    prefabs.insert(LEVEL_SELECT_PREFAB, ViewTemplate::new("LEVELS", level_widgets));

    prefabs.insert(
        LEVEL_FINISHED_PREFAB,
        ViewTemplate::new(
            "LEVEL COMPLETE",
            vec![
                WidgetTemplate::new("retry", "RETRY"),
                WidgetTemplate::new("main", "MAIN MENU"),
                WidgetTemplate::new("levels", "LEVELS"),
            ],
        )
        .with_label("elapsed_time", "", 20),
    );

    prefabs.insert(
        GAMEPLAY_HUD_PREFAB,
        ViewTemplate::new("", vec![WidgetTemplate::new("exit", "EXIT")]),
    );

    prefabs
}
