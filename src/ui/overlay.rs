//! Immediate-mode overlay
//!
//! States draw here from `on_gui`. The overlay is rebuilt every frame and is
//! independent of spawned views.

use super::registry::Rgba;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLabel {
    pub text: String,
    pub font_size: u32,
    pub color: Rgba,
    pub anchor: Anchor,
}

/// Where an overlay label is placed on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    BottomLeft,
}

#[derive(Debug, Default)]
pub struct GuiOverlay {
    labels: Vec<OverlayLabel>,
}

impl GuiOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&mut self, text: impl Into<String>, font_size: u32, color: Rgba, anchor: Anchor) {
        self.labels.push(OverlayLabel {
            text: text.into(),
            font_size,
            color,
            anchor,
        });
    }

    pub fn labels(&self) -> &[OverlayLabel] {
        &self.labels
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
