//! Adhan audio playback.
//!
//! Playback is delegated to the host's native audio player:
//!
//! ```text
//! ┌────────────────────┐
//! │    AudioPlayer     │ ← Trait used by the tracker
//! └─────────┬──────────┘
//!           │
//!           ▼
//! ┌────────────────────┐     ┌────────────────────┐
//! │ CommandAudioPlayer │────▶│ powershell/afplay/ │
//! │                    │     │ paplay → aplay     │
//! └────────────────────┘     └────────────────────┘
//! ```
//!
//! Launching is synchronous so that asset and platform problems surface
//! immediately. The player process itself runs in the background and its
//! exit status is reported through the notifier.

mod command;
mod error;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

pub use command::{
    classify_exit, report_outcome, run_playback, CommandAudioPlayer, PlaybackCommand,
    PlaybackOutcome, DEFAULT_PLAYBACK_TIMEOUT, PLAYBACK_FAILED_SENTINEL,
};
pub use error::AudioError;

/// Trait for adhan playback implementations.
pub trait AudioPlayer: Send + Sync {
    /// Starts playing the file at `path` without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, the platform has no known
    /// player, or the player could not be launched.
    fn play(&self, path: &Path) -> Result<(), AudioError>;
}

/// Mock audio player for testing.
#[derive(Debug, Default)]
pub struct MockAudioPlayer {
    play_calls: Mutex<Vec<PathBuf>>,
    should_fail: AtomicBool,
}

impl MockAudioPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<PathBuf> {
        self.play_calls.lock().unwrap().clone()
    }
}

impl AudioPlayer for MockAudioPlayer {
    fn play(&self, path: &Path) -> Result<(), AudioError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AudioError::AssetNotFound(path.to_path_buf()));
        }
        self.play_calls.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_paths() {
        let player = MockAudioPlayer::new();
        player.play(Path::new("/tmp/a.mp3")).unwrap();
        player.play(Path::new("/tmp/b.mp3")).unwrap();
        assert_eq!(player.play_count(), 2);
        assert_eq!(player.get_play_calls()[1], PathBuf::from("/tmp/b.mp3"));
    }

    #[test]
    fn test_mock_failure_reports_missing_asset() {
        let player = MockAudioPlayer::new();
        player.set_should_fail(true);
        let err = player.play(Path::new("/tmp/a.mp3")).unwrap_err();
        assert!(err.is_asset_error());
        assert_eq!(player.play_count(), 0);
    }
}
