//! View Panel
//!
//! Draws a spawned view as a centered panel: title, labels, then one row per
//! widget. The active view gets a selection highlight driven by the keyboard;
//! views without a title (the gameplay HUD) collapse to a strip of buttons
//! in the top-right corner.

use crate::text::{draw_text, text_width};
use hamster::ui::{Rgba, SpawnedView, ViewId, WidgetId};
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

/// Configuration for panel appearance
#[derive(Debug, Clone)]
pub struct MenuStyle {
    pub width: u32,
    pub background_color: Color,
    pub border_color: Color,
    /// Overlay darkness (0-255, higher = darker)
    pub overlay_alpha: u8,
    pub title_color: Color,
    pub item_color: Color,
    pub selected_item_color: Color,
    pub highlight_color: Color,
    pub title_scale: u32,
    pub item_scale: u32,
    pub row_height: u32,
    pub padding: u32,
}

impl Default for MenuStyle {
    fn default() -> Self {
        MenuStyle {
            width: 520,
            background_color: Color::RGB(34, 30, 44),
            border_color: Color::RGB(120, 104, 150),
            overlay_alpha: 150,
            title_color: Color::RGB(250, 226, 160),
            item_color: Color::RGB(170, 164, 182),
            selected_item_color: Color::RGB(255, 255, 255),
            highlight_color: Color::RGB(92, 76, 128),
            title_scale: 6,
            item_scale: 3,
            row_height: 34,
            padding: 20,
        }
    }
}

/// Keyboard selection within the active view
///
/// Resets to the first widget whenever a different view becomes active.
#[derive(Debug, Default)]
pub struct MenuSelection {
    view: Option<ViewId>,
    index: usize,
}

impl MenuSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the active view, clamping the index to its widget count
    pub fn sync(&mut self, view: Option<&SpawnedView>) {
        let id = view.map(|v| v.id);
        if id != self.view {
            self.view = id;
            self.index = 0;
        }
        if let Some(view) = view {
            self.index = self.index.min(view.widgets.len().saturating_sub(1));
        }
    }

    /// Move selection up (wraps to bottom)
    pub fn select_previous(&mut self, widget_count: usize) {
        if widget_count == 0 {
            return;
        }
        self.index = if self.index == 0 {
            widget_count - 1
        } else {
            self.index - 1
        };
    }

    /// Move selection down (wraps to top)
    pub fn select_next(&mut self, widget_count: usize) {
        if widget_count == 0 {
            return;
        }
        self.index = (self.index + 1) % widget_count;
    }

    pub fn selected_index(&self) -> usize {
        self.index
    }

    pub fn selected_widget(&self, view: &SpawnedView) -> Option<WidgetId> {
        (self.view == Some(view.id))
            .then(|| view.widgets.get(self.index))
            .flatten()
            .map(|w| w.id)
    }

    /// Points the selection at a widget, e.g. under the mouse
    pub fn select_widget(&mut self, view: &SpawnedView, widget: WidgetId) {
        if let Some(index) = view.widgets.iter().position(|w| w.id == widget) {
            self.view = Some(view.id);
            self.index = index;
        }
    }
}

/// Screen rectangles of one view's parts
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub frame: Rect,
    pub title: Option<(i32, i32)>,
    pub labels: Vec<(usize, i32, i32)>,
    pub rows: Vec<(WidgetId, Rect)>,
}

impl PanelLayout {
    pub fn widget_at(&self, x: i32, y: i32) -> Option<WidgetId> {
        self.rows
            .iter()
            .find(|(_, rect)| rect.contains_point((x, y)))
            .map(|(id, _)| *id)
    }
}

/// Font scale for a label's nominal font size
pub fn label_scale(font_size: u32) -> u32 {
    (font_size / 5).max(1)
}

pub fn to_color(rgba: Rgba) -> Color {
    Color::RGBA(rgba.r, rgba.g, rgba.b, rgba.a)
}

pub fn layout_view(view: &SpawnedView, style: &MenuStyle, screen: (u32, u32)) -> PanelLayout {
    let (screen_width, screen_height) = screen;

    if view.title.is_empty() {
        return layout_strip(view, style, screen_width);
    }

    let visible_labels: Vec<(usize, u32)> = view
        .labels
        .iter()
        .enumerate()
        .filter(|(_, l)| l.visible && !l.text.is_empty())
        .map(|(i, l)| (i, label_scale(l.font_size) * 5 + 8))
        .collect();

    let title_height = style.title_scale * 5 + style.padding;
    let labels_height: u32 = visible_labels.iter().map(|(_, h)| h).sum();
    let rows_height = view.widgets.len() as u32 * style.row_height;
    let height = (style.padding * 2 + title_height + labels_height + rows_height).min(screen_height);

    let x = (screen_width.saturating_sub(style.width) / 2) as i32;
    let y = (screen_height.saturating_sub(height) / 2) as i32;
    let frame = Rect::new(x, y, style.width, height);

    let title_x = x + (style.width.saturating_sub(text_width(&view.title, style.title_scale)) / 2) as i32;
    let mut cursor = y + style.padding as i32;
    let title = Some((title_x, cursor));
    cursor += title_height as i32;

    let mut labels = Vec::with_capacity(visible_labels.len());
    for (index, h) in visible_labels {
        labels.push((index, x + style.padding as i32, cursor));
        cursor += h as i32;
    }

    let rows = view
        .widgets
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let row_y = cursor + (i as u32 * style.row_height) as i32;
            let rect = Rect::new(
                x + style.padding as i32,
                row_y,
                style.width - style.padding * 2,
                style.row_height - 4,
            );
            (w.id, rect)
        })
        .collect();

    PanelLayout {
        frame,
        title,
        labels,
        rows,
    }
}

fn layout_strip(view: &SpawnedView, style: &MenuStyle, screen_width: u32) -> PanelLayout {
    let button_width = 120;
    let count = view.widgets.len() as u32;
    let width = count * (button_width + 8);
    let x = screen_width.saturating_sub(width + 8) as i32;
    let rows = view
        .widgets
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let rect = Rect::new(x + (i as u32 * (button_width + 8)) as i32, 8, button_width, style.row_height - 4);
            (w.id, rect)
        })
        .collect();

    PanelLayout {
        frame: Rect::new(x, 8, width.max(1), style.row_height),
        title: None,
        labels: Vec::new(),
        rows,
    }
}

/// Draws one view; `selected` highlights a widget row
pub fn render_view(
    canvas: &mut Canvas<Window>,
    view: &SpawnedView,
    layout: &PanelLayout,
    style: &MenuStyle,
    selected: Option<WidgetId>,
    dim_background: bool,
) -> Result<(), String> {
    if dim_background {
        canvas.set_blend_mode(BlendMode::Blend);
        canvas.set_draw_color(Color::RGBA(0, 0, 0, style.overlay_alpha));
        canvas.fill_rect(None)?;
        canvas.set_blend_mode(BlendMode::None);
    }

    if layout.title.is_some() {
        canvas.set_draw_color(style.background_color);
        canvas.fill_rect(layout.frame)?;
        canvas.set_draw_color(style.border_color);
        canvas.draw_rect(layout.frame)?;
    }

    if let Some((x, y)) = layout.title {
        draw_text(canvas, &view.title, x, y, style.title_color, style.title_scale)?;
    }

    for &(index, x, y) in &layout.labels {
        if let Some(label) = view.labels.get(index) {
            draw_text(canvas, &label.text, x, y, to_color(label.color), label_scale(label.font_size))?;
        }
    }

    for (id, rect) in &layout.rows {
        let Some(widget) = view.widget_by_id(*id) else {
            continue;
        };
        let is_selected = selected == Some(*id);

        if is_selected {
            canvas.set_draw_color(style.highlight_color);
            canvas.fill_rect(*rect)?;
        } else if layout.title.is_none() {
            canvas.set_draw_color(style.background_color);
            canvas.fill_rect(*rect)?;
        }

        let color = if is_selected {
            style.selected_item_color
        } else {
            style.item_color
        };
        let text_y = rect.y() + (rect.height().saturating_sub(style.item_scale * 5) / 2) as i32;
        draw_text(canvas, &widget.label, rect.x() + 12, text_y, color, style.item_scale)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamster::ui::{ViewRegistry, builtin_prefabs};

    fn spawned(prefab: &str) -> (ViewRegistry, ViewId) {
        let mut ui = ViewRegistry::new(builtin_prefabs());
        let id = ui.spawn(prefab).unwrap();
        (ui, id)
    }

    #[test]
    fn test_selection_wraps() {
        let mut selection = MenuSelection::new();
        selection.select_previous(3);
        assert_eq!(selection.selected_index(), 2);
        selection.select_next(3);
        assert_eq!(selection.selected_index(), 0);
        selection.select_next(0);
        assert_eq!(selection.selected_index(), 0);
    }

    #[test]
    fn test_selection_resets_when_view_changes() {
        let (mut ui, first) = spawned("MainMenu");
        let second = ui.spawn("LicenseDialog").unwrap();

        let mut selection = MenuSelection::new();
        selection.sync(ui.view(first));
        selection.select_next(4);
        selection.select_next(4);
        assert_eq!(selection.selected_index(), 2);

        selection.sync(ui.view(second));
        assert_eq!(selection.selected_index(), 0);
        let license = ui.view(second).unwrap();
        assert_eq!(selection.selected_widget(license), license.widget("back"));
    }

    #[test]
    fn test_selected_widget_requires_matching_view() {
        let (mut ui, first) = spawned("MainMenu");
        let second = ui.spawn("LicenseDialog").unwrap();

        let mut selection = MenuSelection::new();
        selection.sync(ui.view(first));
        assert!(selection.selected_widget(ui.view(second).unwrap()).is_none());
    }

    #[test]
    fn test_layout_hit_testing() {
        let (ui, id) = spawned("MainMenu");
        let view = ui.view(id).unwrap();
        let layout = layout_view(view, &MenuStyle::default(), (800, 600));

        assert_eq!(layout.rows.len(), view.widgets.len());
        let (play, rect) = layout.rows[0];
        assert_eq!(layout.widget_at(rect.x() + 1, rect.y() + 1), Some(play));
        assert_eq!(layout.widget_at(0, 0), None);
    }

    #[test]
    fn test_untitled_view_is_a_corner_strip() {
        let (ui, id) = spawned("GameplayHud");
        let view = ui.view(id).unwrap();
        let layout = layout_view(view, &MenuStyle::default(), (800, 600));

        assert!(layout.title.is_none());
        assert!(layout.rows[0].1.right() <= 800);
        assert_eq!(layout.rows[0].1.y(), 8);
    }
}
