//! UI Layer
//!
//! This module is the boundary between states and whatever draws the screen.
//! States never touch pixels; they spawn views from prefabs, toggle their
//! visibility and react to [`UiEvent`]s the front-end reports back.
//!
//! # Architecture
//!
//! - `registry`: prefab templates and the live view registry
//! - `view`: typed view bindings and the [`StateUi`] ownership helper
//! - `views`: bindings for the game's own prefabs
//! - `overlay`: immediate-mode labels drawn by `on_gui`
//!
//! # Example Usage
//!
//! ```ignore
//! let mut ui = ViewRegistry::new(builtin_prefabs());
//! let mut menu: StateUi<MainMenuView> = StateUi::new();
//!
//! let play = menu.spawn(&mut ui)?.play;
//! menu.show(&mut ui);
//!
//! // Later, when the player clicks
//! let event = UiEvent::activated(play);
//! ```

pub mod overlay;
pub mod registry;
pub mod view;
pub mod views;

pub use overlay::{Anchor, GuiOverlay, OverlayLabel};
pub use registry::{
    Label, PrefabList, Rgba, SpawnedView, ViewId, ViewRegistry, ViewTemplate, Widget, WidgetId,
    WidgetTemplate,
};
pub use view::{MenuView, StateUi, UiEvent, UiPayload};
pub use views::builtin_prefabs;
