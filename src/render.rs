/// Scene and overlay rendering
///
/// The scene is a flat backdrop chosen from the camera mode, with the level
/// floor, goal and ball drawn while a player exists. Overlay labels from
/// `on_gui` are drawn last, above every view panel.
use crate::gui::menu::{label_scale, to_color};
use crate::text::{draw_text, text_width};
use hamster::game::{CameraMode, GameContext};
use hamster::ui::{Anchor, GuiOverlay};
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::Canvas;
use sdl2::video::Window;

const OVERLAY_MARGIN: i32 = 12;
const BALL_RADIUS: i32 = 14;

pub fn background_color(camera: CameraMode) -> Color {
    match camera {
        CameraMode::Menu => Color::RGB(24, 20, 36),
        CameraMode::Gameplay => Color::RGB(118, 170, 220),
        CameraMode::Editor => Color::RGB(60, 64, 72),
    }
}

pub fn render_scene(canvas: &mut Canvas<Window>, game: &GameContext, screen: (u32, u32)) -> Result<(), String> {
    let (width, height) = screen;
    canvas.set_draw_color(background_color(game.camera));
    canvas.clear();

    let floor_y = (height * 3 / 4) as i32;

    if !game.world.menu_scenery_hidden() {
        // Rolling hills behind the menus
        canvas.set_draw_color(Color::RGB(46, 38, 66));
        for i in 0..4 {
            let x = i * (width as i32 / 3) - 60;
            canvas.fill_rect(Rect::new(x, floor_y - 40 - (i % 2) * 30, width / 3 + 120, height))?;
        }
    }

    let Some(player) = game.player.as_ref() else {
        return Ok(());
    };

    canvas.set_draw_color(Color::RGB(84, 140, 72));
    canvas.fill_rect(Rect::new(0, floor_y, width, height - floor_y as u32))?;

    let goal_x = width as i32 - 120;
    canvas.set_draw_color(Color::RGB(240, 240, 240));
    canvas.fill_rect(Rect::new(goal_x, floor_y - 80, 4, 80))?;
    canvas.set_draw_color(Color::RGB(230, 70, 70));
    canvas.fill_rect(Rect::new(goal_x + 4, floor_y - 80, 32, 20))?;

    let ball_x = if player.reached_goal { goal_x - BALL_RADIUS } else { 120 };
    fill_circle(canvas, Point::new(ball_x, floor_y - BALL_RADIUS), BALL_RADIUS, Color::RGB(214, 160, 90))
}

fn fill_circle(canvas: &mut Canvas<Window>, center: Point, radius: i32, color: Color) -> Result<(), String> {
    canvas.set_draw_color(color);
    for dy in -radius..=radius {
        let half = ((radius * radius - dy * dy) as f64).sqrt() as i32;
        canvas.draw_line(
            Point::new(center.x() - half, center.y() + dy),
            Point::new(center.x() + half, center.y() + dy),
        )?;
    }
    Ok(())
}

/// Top-left corner for an overlay label of the given pixel size
pub fn overlay_position(anchor: Anchor, text_size: (u32, u32), screen: (u32, u32)) -> (i32, i32) {
    let (text_w, text_h) = text_size;
    let (width, height) = screen;
    match anchor {
        Anchor::TopLeft => (OVERLAY_MARGIN, OVERLAY_MARGIN),
        Anchor::TopCenter => ((width.saturating_sub(text_w) / 2) as i32, OVERLAY_MARGIN),
        Anchor::BottomLeft => (OVERLAY_MARGIN, height as i32 - text_h as i32 - OVERLAY_MARGIN),
    }
}

pub fn render_overlay(canvas: &mut Canvas<Window>, overlay: &GuiOverlay, screen: (u32, u32)) -> Result<(), String> {
    for label in overlay.labels() {
        let scale = label_scale(label.font_size);
        let size = (text_width(&label.text, scale), scale * 5);
        let (x, y) = overlay_position(label.anchor, size, screen);
        draw_text(canvas, &label.text, x, y, to_color(label.color), scale)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_anchors() {
        let screen = (800, 600);
        assert_eq!(overlay_position(Anchor::TopLeft, (100, 20), screen), (12, 12));
        assert_eq!(overlay_position(Anchor::TopCenter, (100, 20), screen), (350, 12));
        assert_eq!(overlay_position(Anchor::BottomLeft, (100, 20), screen), (12, 568));
    }

    #[test]
    fn test_each_camera_mode_has_its_own_backdrop() {
        let menu = background_color(CameraMode::Menu);
        assert_ne!(menu, background_color(CameraMode::Gameplay));
        assert_ne!(menu, background_color(CameraMode::Editor));
    }
}
