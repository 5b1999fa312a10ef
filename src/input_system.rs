use sdl2::EventPump;
use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::MouseButton;

/// What the front-end should do with a key press or click
///
/// Raw SDL events are translated into these before the host loop sees them,
/// so the main loop never matches on keycodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    // === Menu Navigation ===
    SelectPrevious,
    SelectNext,
    /// Slider step on the selected widget
    Step(i32),
    /// Press the selected widget
    Confirm,
    /// Press the view's back button, if it has one
    Back,

    // === Gameplay ===
    /// Leave the level through the escape key path
    Escape,
    /// Debug shortcut that puts the ball in the goal
    ReachGoal,

    // === Pointer ===
    LeftClick(i32, i32),
    MouseMove(i32, i32),

    // === System ===
    Quit,
}

/// Which key map applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    /// A menu view is on top of the stack
    Menu,
    /// A level is being played
    Gameplay,
}

/// Slider step with shift held; large enough to cross the whole volume range
pub const LARGE_STEP: i32 = hamster::game::MAX_VOLUME as i32;

/// Translates SDL2 events into [`HostAction`]s for the current context
pub struct InputSystem {
    pub context: InputContext,
}

impl InputSystem {
    pub fn new() -> Self {
        InputSystem {
            context: InputContext::Menu,
        }
    }

    /// Gameplay keys apply while a level is running, menu keys otherwise
    pub fn update_context(&mut self, game_running: bool) {
        self.context = if game_running {
            InputContext::Gameplay
        } else {
            InputContext::Menu
        };
    }

    pub fn poll_events(&self, event_pump: &mut EventPump) -> Vec<HostAction> {
        let mut actions = Vec::new();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => actions.push(HostAction::Quit),
                Event::KeyDown {
                    keycode: Some(key),
                    keymod,
                    repeat: false,
                    ..
                } => {
                    let shift_held = keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD);
                    actions.extend(self.handle_keydown(key, shift_held));
                }
                Event::MouseButtonDown {
                    mouse_btn: MouseButton::Left,
                    x,
                    y,
                    ..
                } => actions.push(HostAction::LeftClick(x, y)),
                Event::MouseMotion { x, y, .. } => actions.push(HostAction::MouseMove(x, y)),
                _ => {}
            }
        }

        actions
    }

    fn handle_keydown(&self, key: Keycode, shift_held: bool) -> Option<HostAction> {
        match self.context {
            InputContext::Menu => handle_menu_keys(key, shift_held),
            InputContext::Gameplay => handle_gameplay_keys(key),
        }
    }
}

fn handle_menu_keys(key: Keycode, shift_held: bool) -> Option<HostAction> {
    let step = if shift_held { LARGE_STEP } else { 1 };
    match key {
        Keycode::Up | Keycode::W => Some(HostAction::SelectPrevious),
        Keycode::Down | Keycode::S => Some(HostAction::SelectNext),
        Keycode::Left | Keycode::A => Some(HostAction::Step(-step)),
        Keycode::Right | Keycode::D => Some(HostAction::Step(step)),
        Keycode::Return | Keycode::Space => Some(HostAction::Confirm),
        Keycode::Escape | Keycode::Backspace => Some(HostAction::Back),
        _ => None,
    }
}

fn handle_gameplay_keys(key: Keycode) -> Option<HostAction> {
    match key {
        Keycode::Escape => Some(HostAction::Escape),
        Keycode::G => Some(HostAction::ReachGoal),
        // The HUD exit button is the only widget while playing
        Keycode::Return | Keycode::Space => Some(HostAction::Confirm),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_follows_game_running() {
        let mut input = InputSystem::new();
        assert_eq!(input.context, InputContext::Menu);

        input.update_context(true);
        assert_eq!(input.context, InputContext::Gameplay);

        input.update_context(false);
        assert_eq!(input.context, InputContext::Menu);
    }

    #[test]
    fn test_escape_depends_on_context() {
        let mut input = InputSystem::new();
        assert_eq!(input.handle_keydown(Keycode::Escape, false), Some(HostAction::Back));

        input.update_context(true);
        assert_eq!(input.handle_keydown(Keycode::Escape, false), Some(HostAction::Escape));
    }

    #[test]
    fn test_shift_widens_slider_steps() {
        assert_eq!(handle_menu_keys(Keycode::Right, false), Some(HostAction::Step(1)));
        assert_eq!(handle_menu_keys(Keycode::Left, true), Some(HostAction::Step(-LARGE_STEP)));
    }

    #[test]
    fn test_menu_keys_do_nothing_in_gameplay() {
        assert_eq!(handle_gameplay_keys(Keycode::Up), None);
        assert_eq!(handle_gameplay_keys(Keycode::Left), None);
        assert_eq!(handle_gameplay_keys(Keycode::G), Some(HostAction::ReachGoal));
        assert_eq!(handle_menu_keys(Keycode::G, false), None);
    }
}
