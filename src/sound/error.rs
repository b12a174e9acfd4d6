//! Audio playback error types.
//!
//! Every error here is recoverable: a failed adhan never stops the tracker.

use std::path::PathBuf;

use thiserror::Error;

/// Errors detected before an audio player process is launched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The adhan audio asset does not exist.
    #[error("アザーン音声ファイルが見つかりません: {}", .0.display())]
    AssetNotFound(PathBuf),

    /// No player command is known for this operating system.
    #[error("このプラットフォームでは音声再生に対応していません: {0}")]
    UnsupportedPlatform(String),

    /// The player could not be started.
    #[error("音声プレイヤーの起動に失敗しました: {0}")]
    LaunchFailed(String),
}

impl AudioError {
    /// Returns true if the error is about the audio file itself.
    #[must_use]
    pub fn is_asset_error(&self) -> bool {
        matches!(self, Self::AssetNotFound(_))
    }

    /// Returns the warning shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AssetNotFound(path) => format!(
                "Adhan audio file not found at: {}. Please ensure the audio file exists or set adhan_path in the config.",
                path.display()
            ),
            Self::UnsupportedPlatform(os) => {
                format!("Adhan playback not supported on platform: {}", os)
            }
            Self::LaunchFailed(e) => format!(
                "Failed to play Adhan. Please check if audio player is installed. Error: {}",
                e
            ),
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AssetNotFound(_) => "設定ファイルの adhan_path を確認してください",
            Self::UnsupportedPlatform(_) => "enable_adhan を false に設定してください",
            Self::LaunchFailed(_) => "音声プレイヤー (paplay / aplay / afplay) をインストールしてください",
        }
    }
}
