//! Result payload a terminating state hands to the state beneath it.

use super::base::StateKind;

/// What the player chose on the level finished screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFinishedChoice {
    MainMenu,
    LevelSelect,
}

/// State-specific result data
#[derive(Debug, Clone, PartialEq)]
pub enum ExitData {
    None,
    Gameplay {
        fixed_updates: u64,
        reached_goal: bool,
    },
    Settings {
        music_volume: u8,
        sound_fx_volume: u8,
    },
    LevelFinished(LevelFinishedChoice),
}

/// Produced only by `cleanup`, consumed only by the next `resume`
#[derive(Debug, Clone, PartialEq)]
pub struct StateExitValue {
    origin: StateKind,
    data: ExitData,
}

impl StateExitValue {
    pub fn new(origin: StateKind) -> Self {
        StateExitValue {
            origin,
            data: ExitData::None,
        }
    }

    pub fn with_data(origin: StateKind, data: ExitData) -> Self {
        StateExitValue { origin, data }
    }

    pub fn origin(&self) -> StateKind {
        self.origin
    }

    pub fn data(&self) -> &ExitData {
        &self.data
    }

    pub fn into_data(self) -> ExitData {
        self.data
    }
}
