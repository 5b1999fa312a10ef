// Shared enums used by states to configure the environment

/// Camera behaviour requested by the active state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    Menu,
    Gameplay,
    Editor,
}

/// Whether the screen may dim while a state is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepTimeout {
    #[default]
    SystemSetting,
    NeverSleep,
}

/// Music selections states can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicCue {
    Menu,
    Game,
    Win,
}

/// Input sampled by the host for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    /// Escape went down this frame
    pub escape_pressed: bool,
}

/// Tracks the track currently playing
#[derive(Debug, Default)]
pub struct MusicPlayer {
    current: Option<MusicCue>,
    looping: bool,
    restarts: u32,
}

impl MusicPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays `cue`. A cue that is already playing keeps going without a restart.
    pub fn play(&mut self, cue: MusicCue, looping: bool) {
        if self.current != Some(cue) {
            tracing::debug!(?cue, looping, "switching music");
            self.current = Some(cue);
            self.restarts += 1;
        }
        self.looping = looping;
    }

    pub fn current(&self) -> Option<MusicCue> {
        self.current
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Number of times a new track has been started
    pub fn restarts(&self) -> u32 {
        self.restarts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_cue_does_not_restart() {
        let mut music = MusicPlayer::new();
        music.play(MusicCue::Menu, true);
        music.play(MusicCue::Menu, true);
        assert_eq!(music.restarts(), 1);

        music.play(MusicCue::Win, false);
        assert_eq!(music.current(), Some(MusicCue::Win));
        assert!(!music.is_looping());
        assert_eq!(music.restarts(), 2);
    }
}
