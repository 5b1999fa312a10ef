// GameWorld and Player
//
// The world is the shared level every gameplay state works against. Physics
// and meshes live outside this crate; the world only records what states
// asked of it.

/// The player object, present between spawn and map reset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Player {
    pub reached_goal: bool,
}

/// Shared level state
#[derive(Debug, Default)]
pub struct GameWorld {
    current_level: Option<usize>,
    reset_count: u32,
    meshes_merged: bool,
    menu_scenery_hidden: bool,
}

impl GameWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_level(&mut self, index: usize) {
        self.current_level = Some(index);
    }

    pub fn current_level(&self) -> Option<usize> {
        self.current_level
    }

    /// Restores every map object to its starting position
    pub fn reset_map(&mut self) {
        self.reset_count += 1;
        self.meshes_merged = false;
    }

    pub fn reset_count(&self) -> u32 {
        self.reset_count
    }

    pub fn merge_meshes(&mut self) {
        self.meshes_merged = true;
    }

    pub fn meshes_merged(&self) -> bool {
        self.meshes_merged
    }

    /// Hides or restores scenery that only makes sense behind the menus
    pub fn set_menu_scenery_hidden(&mut self, hidden: bool) {
        self.menu_scenery_hidden = hidden;
    }

    pub fn menu_scenery_hidden(&self) -> bool {
        self.menu_scenery_hidden
    }
}
