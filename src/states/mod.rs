// States module - the state stack and every screen of the game
//
// This module contains:
// - base.rs: the State trait, lifecycle phases and transitions
// - exit_value.rs: the payload a finishing state hands to the one beneath
// - manager.rs: StateManager, the stack itself
// - one file per concrete state
//
// The main menu is the root of the stack. Everything else is pushed on top
// of it or swapped in for a sibling.

pub mod base;
pub mod debug_menu;
pub mod exit_value;
pub mod gameplay;
pub mod level_finished;
pub mod level_select;
pub mod license_dialog;
pub mod main_menu;
pub mod manager;
pub mod settings_menu;

pub use base::{Activity, LifecyclePhase, State, StateContext, StateKind, StateResult, Transition};
pub use debug_menu::{DayPhase, DebugMenu, ThreadSleepSimulator, WorkSimulator};
pub use exit_value::{ExitData, LevelFinishedChoice, StateExitValue};
pub use gameplay::{Gameplay, GameplayMode};
pub use level_finished::LevelFinished;
pub use level_select::LevelSelect;
pub use license_dialog::LicenseDialog;
pub use main_menu::{MainMenu, PendingStates};
pub use manager::StateManager;
pub use settings_menu::SettingsMenu;
