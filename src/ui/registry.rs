//! Prefab list and live view registry
//!
//! The prefab list maps an identifier to a [`ViewTemplate`]. Spawning a
//! template produces a [`SpawnedView`] whose widgets receive globally unique
//! [`WidgetId`]s. The registry remembers which view owns each widget so the
//! state manager can tell whether an incoming UI event still belongs to the
//! active state.

use crate::error::UiError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

/// RGBA colour used by labels and overlay text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }
}

/// Identifier of a spawned view instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(pub u64);

/// Identifier of a widget inside a spawned view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub u64);

/// Text element of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelTemplate {
    pub name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_label_color")]
    pub color: Rgba,
}

fn default_font_size() -> u32 {
    20
}

fn default_label_color() -> Rgba {
    Rgba::WHITE
}

/// Interactive element of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetTemplate {
    pub name: String,
    pub label: String,
}

impl WidgetTemplate {
    pub fn new(name: &str, label: &str) -> Self {
        WidgetTemplate {
            name: name.to_string(),
            label: label.to_string(),
        }
    }
}

/// Blueprint for a view, the equivalent of a UI prefab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewTemplate {
    pub title: String,
    #[serde(default)]
    pub labels: Vec<LabelTemplate>,
    #[serde(default)]
    pub widgets: Vec<WidgetTemplate>,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl ViewTemplate {
    pub fn new(title: &str, widgets: Vec<WidgetTemplate>) -> Self {
        ViewTemplate {
            title: title.to_string(),
            labels: Vec::new(),
            widgets,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, name: &str, text: &str, font_size: u32) -> Self {
        self.labels.push(LabelTemplate {
            name: name.to_string(),
            text: text.to_string(),
            font_size,
            color: Rgba::WHITE,
        });
        self
    }

    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }
}

/// Registry of view templates keyed by prefab identifier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrefabList {
    #[serde(flatten)]
    templates: HashMap<String, ViewTemplate>,
}

impl PrefabList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads templates from a JSON object of `{ "PrefabId": { ...template } }`
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, UiError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| UiError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| UiError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn insert(&mut self, id: &str, template: ViewTemplate) {
        self.templates.insert(id.to_string(), template);
    }

    pub fn get(&self, id: &str) -> Option<&ViewTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Adds every template from `other`, replacing same-named entries
    pub fn merge(&mut self, other: PrefabList) {
        self.templates.extend(other.templates);
    }
}

/// A label inside a spawned view
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub name: String,
    pub text: String,
    pub font_size: u32,
    pub color: Rgba,
    pub visible: bool,
}

/// A widget inside a spawned view
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub id: WidgetId,
    pub name: String,
    pub label: String,
}

/// A live view instance owned by at most one state
#[derive(Debug, Clone)]
pub struct SpawnedView {
    pub id: ViewId,
    pub prefab: String,
    pub title: String,
    pub visible: bool,
    pub labels: Vec<Label>,
    pub widgets: Vec<Widget>,
    pub properties: BTreeMap<String, String>,
}

impl SpawnedView {
    pub fn widget(&self, name: &str) -> Option<WidgetId> {
        self.widgets.iter().find(|w| w.name == name).map(|w| w.id)
    }

    pub fn widget_by_id(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }

    pub fn label(&self, name: &str) -> Option<&Label> {
        self.labels.iter().find(|l| l.name == name)
    }

    pub fn label_mut(&mut self, name: &str) -> Option<&mut Label> {
        self.labels.iter_mut().find(|l| l.name == name)
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// Live views plus the prefab list they are spawned from
pub struct ViewRegistry {
    prefabs: PrefabList,
    views: BTreeMap<ViewId, SpawnedView>,
    widget_owners: HashMap<WidgetId, ViewId>,
    next_id: u64,
}

impl ViewRegistry {
    pub fn new(prefabs: PrefabList) -> Self {
        ViewRegistry {
            prefabs,
            views: BTreeMap::new(),
            widget_owners: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn prefabs(&self) -> &PrefabList {
        &self.prefabs
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Instantiates a template. Spawned views start hidden.
    pub fn spawn(&mut self, prefab: &str) -> Result<ViewId, UiError> {
        let template = self
            .prefabs
            .get(prefab)
            .cloned()
            .ok_or_else(|| UiError::PrefabMissing {
                prefab: prefab.to_string(),
            })?;

        let view_id = ViewId(self.allocate_id());
        let mut widgets = Vec::with_capacity(template.widgets.len());
        for widget in &template.widgets {
            let widget_id = WidgetId(self.allocate_id());
            self.widget_owners.insert(widget_id, view_id);
            widgets.push(Widget {
                id: widget_id,
                name: widget.name.clone(),
                label: widget.label.clone(),
            });
        }

        let labels = template
            .labels
            .iter()
            .map(|l| Label {
                name: l.name.clone(),
                text: l.text.clone(),
                font_size: l.font_size,
                color: l.color,
                visible: true,
            })
            .collect();

        self.views.insert(
            view_id,
            SpawnedView {
                id: view_id,
                prefab: prefab.to_string(),
                title: template.title,
                visible: false,
                labels,
                widgets,
                properties: template.properties,
            },
        );

        tracing::debug!(prefab, view = view_id.0, "spawned view");
        Ok(view_id)
    }

    pub fn set_visible(&mut self, id: ViewId, visible: bool) -> Result<(), UiError> {
        let view = self.views.get_mut(&id).ok_or(UiError::UnknownView(id.0))?;
        view.visible = visible;
        Ok(())
    }

    /// Releases a view and all its widgets. Returns false if it was already gone.
    pub fn destroy(&mut self, id: ViewId) -> bool {
        match self.views.remove(&id) {
            Some(view) => {
                for widget in &view.widgets {
                    self.widget_owners.remove(&widget.id);
                }
                tracing::debug!(prefab = %view.prefab, view = id.0, "destroyed view");
                true
            }
            None => false,
        }
    }

    pub fn view(&self, id: ViewId) -> Option<&SpawnedView> {
        self.views.get(&id)
    }

    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut SpawnedView> {
        self.views.get_mut(&id)
    }

    /// The view a widget belongs to, or `None` once that view is destroyed
    pub fn owner_of(&self, widget: WidgetId) -> Option<ViewId> {
        self.widget_owners.get(&widget).copied()
    }

    pub fn is_alive(&self, id: ViewId) -> bool {
        self.views.contains_key(&id)
    }

    pub fn live_count(&self) -> usize {
        self.views.len()
    }

    pub fn visible_views(&self) -> impl Iterator<Item = &SpawnedView> {
        self.views.values().filter(|v| v.visible)
    }

    /// Updates a label's text if the view and label exist
    pub fn set_label_text(&mut self, id: ViewId, label: &str, text: &str) {
        if let Some(l) = self.views.get_mut(&id).and_then(|v| v.label_mut(label)) {
            l.text = text.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ViewRegistry {
        let mut prefabs = PrefabList::new();
        prefabs.insert(
            "Dialog",
            ViewTemplate::new(
                "DIALOG",
                vec![
                    WidgetTemplate::new("ok", "OK"),
                    WidgetTemplate::new("cancel", "CANCEL"),
                ],
            )
            .with_label("body", "hello", 12),
        );
        ViewRegistry::new(prefabs)
    }

    #[test]
    fn test_spawn_assigns_unique_widget_ids() {
        let mut ui = registry();
        let a = ui.spawn("Dialog").unwrap();
        let b = ui.spawn("Dialog").unwrap();
        assert_ne!(a, b);

        let ok_a = ui.view(a).unwrap().widget("ok").unwrap();
        let ok_b = ui.view(b).unwrap().widget("ok").unwrap();
        assert_ne!(ok_a, ok_b);
        assert_eq!(ui.owner_of(ok_a), Some(a));
        assert_eq!(ui.owner_of(ok_b), Some(b));
    }

    #[test]
    fn test_spawned_views_start_hidden() {
        let mut ui = registry();
        let id = ui.spawn("Dialog").unwrap();
        assert!(!ui.view(id).unwrap().visible);
        ui.set_visible(id, true).unwrap();
        assert_eq!(ui.visible_views().count(), 1);
    }

    #[test]
    fn test_missing_prefab() {
        let mut ui = registry();
        let err = ui.spawn("Nope").unwrap_err();
        assert!(matches!(err, UiError::PrefabMissing { .. }));
    }

    #[test]
    fn test_destroy_forgets_widgets() {
        let mut ui = registry();
        let id = ui.spawn("Dialog").unwrap();
        let ok = ui.view(id).unwrap().widget("ok").unwrap();

        assert!(ui.destroy(id));
        assert!(!ui.destroy(id));
        assert_eq!(ui.owner_of(ok), None);
        assert_eq!(ui.live_count(), 0);
        assert!(ui.set_visible(id, true).is_err());
    }

    #[test]
    fn test_set_label_text() {
        let mut ui = registry();
        let id = ui.spawn("Dialog").unwrap();
        ui.set_label_text(id, "body", "changed");
        assert_eq!(ui.view(id).unwrap().label("body").unwrap().text, "changed");
    }

    #[test]
    fn test_prefab_list_from_json() {
        let json = r#"{
            "Pause": {
                "title": "PAUSED",
                "widgets": [{ "name": "resume", "label": "RESUME" }],
                "properties": { "music": "menu" }
            }
        }"#;
        let prefabs: PrefabList = serde_json::from_str(json).unwrap();
        let template = prefabs.get("Pause").unwrap();
        assert_eq!(template.title, "PAUSED");
        assert_eq!(template.widgets.len(), 1);
        assert!(template.labels.is_empty());
        assert_eq!(template.properties.get("music").map(String::as_str), Some("menu"));
    }
}
