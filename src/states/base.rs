//! The state contract
//!
//! Every screen implements [`State`]. The manager drives the lifecycle:
//!
//! ```text
//! Uninitialized --initialize--> Active --suspend--> Suspended
//!                                 ^                    |
//!                                 +------resume--------+
//! Active | Suspended --cleanup--> (dropped)
//! ```
//!
//! Hooks that want to change the stack return a [`Transition`]; the manager
//! applies it before the call that invoked the hook returns.

use super::exit_value::StateExitValue;
use crate::error::StateError;
use crate::game::GameContext;
use crate::ui::{GuiOverlay, UiEvent, ViewId, ViewRegistry};
use std::fmt;

/// Identity tag of a state, carried by exit values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    MainMenu,
    LevelSelect,
    Gameplay,
    LevelFinished,
    DebugMenu,
    SettingsMenu,
    LicenseDialog,
    /// States defined outside this crate
    Custom(&'static str),
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Custom(name) => write!(f, "{}", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// What the world is doing while a state is on top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    /// A menu owns the screen
    #[default]
    Menu,
    /// The simulation is running
    Gameplay,
    /// A menu over a world that keeps its gameplay look
    GameplayBackdrop,
}

impl Activity {
    pub fn is_game_running(self) -> bool {
        matches!(self, Activity::Gameplay | Activity::GameplayBackdrop)
    }
}

/// Where a stack entry is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    Uninitialized,
    Active,
    Suspended,
}

/// Everything a hook may touch besides its own fields
pub struct StateContext<'a> {
    pub game: &'a mut GameContext,
    pub ui: &'a mut ViewRegistry,
}

impl<'a> StateContext<'a> {
    pub fn new(game: &'a mut GameContext, ui: &'a mut ViewRegistry) -> Self {
        StateContext { game, ui }
    }
}

/// A stack change requested by a hook
pub enum Transition {
    None,
    Push(Box<dyn State>),
    Pop,
    Swap(Box<dyn State>),
}

impl Transition {
    pub fn push(state: impl State + 'static) -> Self {
        Transition::Push(Box::new(state))
    }

    pub fn swap(state: impl State + 'static) -> Self {
        Transition::Swap(Box::new(state))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Transition::None)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "None"),
            Transition::Push(state) => write!(f, "Push({})", state.kind()),
            Transition::Pop => write!(f, "Pop"),
            Transition::Swap(state) => write!(f, "Swap({})", state.kind()),
        }
    }
}

pub type StateResult = Result<Transition, StateError>;

/// One screen or mode of the game
pub trait State {
    fn kind(&self) -> StateKind;

    fn activity(&self) -> Activity {
        Activity::Menu
    }

    /// The view this state currently owns, used to reject stale UI events
    fn view(&self) -> Option<ViewId> {
        None
    }

    /// First activation, right after the state lands on the stack
    fn initialize(&mut self, ctx: &mut StateContext<'_>) -> Result<(), StateError>;

    /// Re-activation after the state above was popped
    fn resume(
        &mut self,
        ctx: &mut StateContext<'_>,
        exit_value: Option<StateExitValue>,
    ) -> Result<(), StateError>;

    /// Another state was pushed on top. Keep resources, stop acting.
    fn suspend(&mut self, ctx: &mut StateContext<'_>);

    /// The state leaves the stack. Release everything it owns.
    fn cleanup(&mut self, ctx: &mut StateContext<'_>) -> Option<StateExitValue>;

    fn update(&mut self, _ctx: &mut StateContext<'_>) -> StateResult {
        Ok(Transition::None)
    }

    fn fixed_update(&mut self, _ctx: &mut StateContext<'_>) -> StateResult {
        Ok(Transition::None)
    }

    fn handle_ui_event(&mut self, _ctx: &mut StateContext<'_>, _event: &UiEvent) -> StateResult {
        Ok(Transition::None)
    }

    /// Immediate-mode drawing, independent of the spawned view
    fn on_gui(&self, _game: &GameContext, _overlay: &mut GuiOverlay) {}
}
