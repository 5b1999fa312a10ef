//! Hamster
//!
//! A hierarchical state stack for a small rolling-ball game. Every screen is
//! a [`states::State`]; the [`states::StateManager`] owns them, routes ticks
//! and UI events to the one on top and applies the transitions they ask for.
//!
//! # Modules
//!
//! - `states`: the state contract, the manager and the game's screens
//! - `ui`: prefab templates, live views and typed view bindings
//! - `game`: the shared game context lent to every state
//! - `services`: remote config, crash reporting and analytics
//! - `host`: the frame loop a front-end drives
//! - `config`, `logging`: application configuration and tracing setup
//!
//! # Example Usage
//!
//! ```ignore
//! let mut host = HostLoop::headless();
//! host.start(Box::new(MainMenu::new()))?;
//!
//! host.click("play");
//! host.frame(FrameInput::default())?;
//! assert_eq!(host.manager().current_kind(), Some(StateKind::LevelSelect));
//! ```

pub mod config;
pub mod error;
pub mod game;
pub mod host;
pub mod logging;
pub mod services;
pub mod states;
pub mod ui;

pub use error::{ConfigError, StateError, UiError};
pub use host::HostLoop;
