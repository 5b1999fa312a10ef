//! Typed views and the per-state view helper
//!
//! A state owns at most one view. [`StateUi`] wraps that ownership and
//! provides the spawn/show/hide/destroy helpers every state uses:
//!
//! - `spawn` is idempotent and returns the existing binding if already spawned
//! - `show`/`hide` toggle visibility without releasing anything
//! - `destroy` is the only path that releases the view instance

use super::registry::{SpawnedView, ViewId, ViewRegistry, WidgetId};
use crate::error::UiError;

/// Payload attached to a UI event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiPayload {
    /// Button press
    Activated,
    /// Slider nudged by a signed amount
    Step(i32),
}

/// A widget interaction reported by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiEvent {
    pub source: WidgetId,
    pub payload: UiPayload,
}

impl UiEvent {
    pub fn activated(source: WidgetId) -> Self {
        UiEvent {
            source,
            payload: UiPayload::Activated,
        }
    }

    pub fn step(source: WidgetId, amount: i32) -> Self {
        UiEvent {
            source,
            payload: UiPayload::Step(amount),
        }
    }
}

/// Code access to the widgets of a specific prefab
pub trait MenuView: Sized {
    /// Prefab spawned when no explicit identifier is given
    const PREFAB: &'static str;

    /// Resolves widget handles from a freshly spawned view
    fn bind(view: &SpawnedView) -> Result<Self, UiError>;
}

/// Looks up a required widget, naming the prefab in the error
pub fn require_widget(view: &SpawnedView, name: &str) -> Result<WidgetId, UiError> {
    view.widget(name).ok_or_else(|| UiError::MissingWidget {
        prefab: view.prefab.clone(),
        widget: name.to_string(),
    })
}

/// The zero-or-one view owned by a state
pub struct StateUi<T> {
    spawned: Option<(ViewId, T)>,
}

impl<T: MenuView> StateUi<T> {
    pub fn new() -> Self {
        StateUi { spawned: None }
    }

    /// Spawns `T::PREFAB`, or returns the existing binding
    pub fn spawn(&mut self, ui: &mut ViewRegistry) -> Result<&T, UiError> {
        self.spawn_from(ui, T::PREFAB)
    }

    /// Spawns an explicit prefab, or returns the existing binding
    pub fn spawn_from(&mut self, ui: &mut ViewRegistry, prefab: &str) -> Result<&T, UiError> {
        let spawned = match self.spawned.take() {
            Some(existing) => existing,
            None => {
                let id = ui.spawn(prefab)?;
                let bound = match ui.view(id) {
                    Some(view) => T::bind(view),
                    None => Err(UiError::UnknownView(id.0)),
                };
                match bound {
                    Ok(binding) => (id, binding),
                    Err(err) => {
                        ui.destroy(id);
                        return Err(err);
                    }
                }
            }
        };
        Ok(&self.spawned.insert(spawned).1)
    }

    pub fn show(&self, ui: &mut ViewRegistry) {
        self.set_visible(ui, true);
    }

    pub fn hide(&self, ui: &mut ViewRegistry) {
        self.set_visible(ui, false);
    }

    fn set_visible(&self, ui: &mut ViewRegistry, visible: bool) {
        if let Some((id, _)) = &self.spawned {
            if let Err(err) = ui.set_visible(*id, visible) {
                tracing::warn!(%err, "view vanished underneath its state");
            }
        }
    }

    pub fn destroy(&mut self, ui: &mut ViewRegistry) {
        if let Some((id, _)) = self.spawned.take() {
            ui.destroy(id);
        }
    }

    pub fn id(&self) -> Option<ViewId> {
        self.spawned.as_ref().map(|(id, _)| *id)
    }

    pub fn get(&self) -> Option<&T> {
        self.spawned.as_ref().map(|(_, binding)| binding)
    }

    pub fn is_spawned(&self) -> bool {
        self.spawned.is_some()
    }
}

impl<T: MenuView> Default for StateUi<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::registry::{PrefabList, ViewTemplate, WidgetTemplate};

    struct OkDialog {
        ok: WidgetId,
    }

    impl MenuView for OkDialog {
        const PREFAB: &'static str = "OkDialog";

        fn bind(view: &SpawnedView) -> Result<Self, UiError> {
            Ok(OkDialog {
                ok: require_widget(view, "ok")?,
            })
        }
    }

    fn registry() -> ViewRegistry {
        let mut prefabs = PrefabList::new();
        prefabs.insert(
            "OkDialog",
            ViewTemplate::new("OK", vec![WidgetTemplate::new("ok", "OK")]),
        );
        prefabs.insert("Broken", ViewTemplate::new("BROKEN", Vec::new()));
        ViewRegistry::new(prefabs)
    }

    #[test]
    fn test_spawn_is_idempotent() {
        let mut ui = registry();
        let mut state_ui: StateUi<OkDialog> = StateUi::new();

        let first = state_ui.spawn(&mut ui).unwrap().ok;
        let second = state_ui.spawn(&mut ui).unwrap().ok;
        assert_eq!(first, second);
        assert_eq!(ui.live_count(), 1);
    }

    #[test]
    fn test_show_hide_keep_the_view() {
        let mut ui = registry();
        let mut state_ui: StateUi<OkDialog> = StateUi::new();
        state_ui.spawn(&mut ui).unwrap();
        let id = state_ui.id().unwrap();

        state_ui.show(&mut ui);
        assert!(ui.view(id).unwrap().visible);
        state_ui.hide(&mut ui);
        assert!(!ui.view(id).unwrap().visible);
        assert!(ui.is_alive(id));
    }

    #[test]
    fn test_destroy_releases_the_view() {
        let mut ui = registry();
        let mut state_ui: StateUi<OkDialog> = StateUi::new();
        state_ui.spawn(&mut ui).unwrap();
        let id = state_ui.id().unwrap();

        state_ui.destroy(&mut ui);
        assert!(!ui.is_alive(id));
        assert!(!state_ui.is_spawned());

        // Destroying twice is harmless
        state_ui.destroy(&mut ui);
    }

    #[test]
    fn test_failed_bind_leaves_nothing_behind() {
        let mut ui = registry();
        let mut state_ui: StateUi<OkDialog> = StateUi::new();

        let err = state_ui.spawn_from(&mut ui, "Broken").err().unwrap();
        assert!(matches!(err, UiError::MissingWidget { .. }));
        assert_eq!(ui.live_count(), 0);
        assert!(!state_ui.is_spawned());
    }
}
