//! Screen-Space GUI
//!
//! Renders the views the state stack spawned. States never draw; this module
//! reads the [`hamster::ui::ViewRegistry`] every frame and turns visible
//! views into panels.
//!
//! # Available Components
//!
//! - [`MenuSelection`] - keyboard selection within the active view
//! - [`layout_view`] / [`render_view`] - panel layout and drawing

pub mod menu;

pub use menu::{MenuSelection, MenuStyle, layout_view, render_view};
