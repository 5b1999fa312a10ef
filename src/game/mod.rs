// Game module - shared data every state reads and writes
//
// This module contains:
// - types.rs: camera/sleep/music enums and per-frame input
// - world.rs: GameWorld and Player
// - audio.rs: volume settings and their persistence
//
// GameContext is owned by the host loop for the whole session and lent to
// states through StateContext; nothing here is global.

pub mod audio;
pub mod types;
pub mod world;

pub use audio::{AudioSettings, MAX_VOLUME};
pub use types::*;
pub use world::{GameWorld, Player};

use crate::services::{RemoteConfig, Services};

/// Shared singletons of the running game
pub struct GameContext {
    pub camera: CameraMode,
    pub time_scale: f32,
    pub gravity: f32,
    pub sleep_timeout: SleepTimeout,
    pub music: MusicPlayer,
    pub world: GameWorld,
    pub player: Option<Player>,
    pub audio: AudioSettings,
    pub remote_config: RemoteConfig,
    pub services: Services,
    pub input: FrameInput,
}

impl GameContext {
    pub fn new(audio: AudioSettings, remote_config: RemoteConfig, services: Services) -> Self {
        GameContext {
            camera: CameraMode::Menu,
            time_scale: 0.0,
            gravity: crate::services::remote_config::PHYSICS_GRAVITY_DEFAULT as f32,
            sleep_timeout: SleepTimeout::SystemSetting,
            music: MusicPlayer::new(),
            world: GameWorld::new(),
            player: None,
            audio,
            remote_config,
            services,
            input: FrameInput::default(),
        }
    }

    /// Context with in-memory settings, game config defaults and logging services
    pub fn headless() -> Self {
        Self::new(
            AudioSettings::in_memory(),
            RemoteConfig::with_game_defaults(),
            Services::default(),
        )
    }

    /// Spawns the player if none exists and returns it
    pub fn spawn_player(&mut self) -> &mut Player {
        self.player.get_or_insert_with(|| {
            tracing::debug!("player spawned");
            Player::default()
        })
    }

    pub fn destroy_player(&mut self) {
        self.player = None;
    }

    /// Resets the map; the player is removed along with every other map object
    pub fn reset_map(&mut self) {
        self.world.reset_map();
        self.destroy_player();
    }

    pub fn player_reached_goal(&self) -> bool {
        self.player.as_ref().is_some_and(|p| p.reached_goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_player_is_idempotent() {
        let mut game = GameContext::headless();
        game.spawn_player().reached_goal = true;
        assert!(game.spawn_player().reached_goal);
        assert!(game.player_reached_goal());
    }

    #[test]
    fn test_reset_map_removes_player() {
        let mut game = GameContext::headless();
        game.spawn_player().reached_goal = true;
        game.reset_map();
        assert!(game.player.is_none());
        assert!(!game.player_reached_goal());
        assert_eq!(game.world.reset_count(), 1);
    }
}
