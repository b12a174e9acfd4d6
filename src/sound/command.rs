//! OS-native audio player invocation.
//!
//! The adhan is played by shelling out to whichever player the host provides:
//!
//! - Windows: PowerShell `Media.SoundPlayer`
//! - macOS: `afplay`
//! - Linux: `paplay`, then `aplay`, then a sentinel `echo` if both fail
//!
//! Playback is fire-and-forget. The tracker only learns whether the player
//! could be launched; the exit status is classified and reported from a
//! background task bounded by a hard timeout.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::error::AudioError;
use super::AudioPlayer;
use crate::notification::Notifier;

/// Text echoed by the Linux fallback chain when no player succeeded.
pub const PLAYBACK_FAILED_SENTINEL: &str = "Audio playback failed";

/// Default hard limit on how long a player process may run.
pub const DEFAULT_PLAYBACK_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// PlaybackCommand
// ============================================================================

/// A fully resolved player command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlaybackCommand {
    /// Builds the player command for an OS identifier (as in
    /// `std::env::consts::OS`). Returns `None` for unsupported platforms.
    pub fn for_platform(os: &str, path: &Path) -> Option<Self> {
        let path = path.display().to_string();
        match os {
            "windows" => {
                let escaped = path.replace('\'', "''");
                Some(Self {
                    program: "powershell".to_string(),
                    args: vec![
                        "-Command".to_string(),
                        format!("(New-Object Media.SoundPlayer '{}').PlaySync();", escaped),
                    ],
                })
            }
            "macos" => Some(Self {
                program: "afplay".to_string(),
                args: vec![path],
            }),
            "linux" => Some(Self {
                program: "sh".to_string(),
                args: vec![
                    "-c".to_string(),
                    format!(
                        "paplay \"$1\" 2>/dev/null || aplay \"$1\" 2>/dev/null || echo \"{}\"",
                        PLAYBACK_FAILED_SENTINEL
                    ),
                    "sh".to_string(),
                    path,
                ],
            }),
            _ => None,
        }
    }
}

// ============================================================================
// PlaybackOutcome
// ============================================================================

/// How a player process ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Exit code 0
    Completed,
    /// Non-zero exit after the fallback chain already reported failure
    PlayerUnavailable,
    /// Exit code 1, which some players return on benign conditions
    BenignFailure,
    /// Any other non-zero exit code
    Failed(i32),
    /// Ended by a signal, no exit code
    Terminated,
    /// Killed after exceeding the playback timeout
    TimedOut,
    /// The process could not be started
    SpawnFailed(String),
}

impl PlaybackOutcome {
    /// Returns true if the user should see a warning for this outcome.
    ///
    /// Exit code 1 and the sentinel failure are deliberately not surfaced.
    #[must_use]
    pub fn should_warn_user(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::SpawnFailed(_))
    }
}

/// Classifies a finished player process from its exit code and stdout.
pub fn classify_exit(code: Option<i32>, stdout: &str) -> PlaybackOutcome {
    match code {
        Some(0) => PlaybackOutcome::Completed,
        Some(_) if stdout.contains(PLAYBACK_FAILED_SENTINEL) => PlaybackOutcome::PlayerUnavailable,
        Some(1) => PlaybackOutcome::BenignFailure,
        Some(code) => PlaybackOutcome::Failed(code),
        None => PlaybackOutcome::Terminated,
    }
}

/// Logs an outcome and forwards the user-facing subset to the notifier.
pub fn report_outcome(outcome: &PlaybackOutcome, notifier: &dyn Notifier) {
    match outcome {
        PlaybackOutcome::Completed => debug!("アザーンの再生が完了しました"),
        PlaybackOutcome::PlayerUnavailable => {
            debug!("音声プレイヤーが利用できません（フォールバックで報告済み）")
        }
        PlaybackOutcome::BenignFailure => error!("アザーンの再生に失敗しました: 終了コード 1"),
        PlaybackOutcome::Failed(code) => error!("アザーンの再生に失敗しました: 終了コード {}", code),
        PlaybackOutcome::Terminated => warn!("音声プレイヤーがシグナルで終了しました"),
        PlaybackOutcome::TimedOut => warn!("音声再生がタイムアウトしたためプロセスを終了しました"),
        PlaybackOutcome::SpawnFailed(e) => error!("音声プレイヤーを起動できませんでした: {}", e),
    }

    if outcome.should_warn_user() {
        let detail = match outcome {
            PlaybackOutcome::Failed(code) => format!("exit code {}", code),
            PlaybackOutcome::SpawnFailed(e) => e.clone(),
            _ => String::new(),
        };
        notifier.warning(&AudioError::LaunchFailed(detail).user_message());
    }
}

/// Runs a player command to completion, bounded by `limit`.
///
/// On Unix the player runs in its own process group, so a timeout kills the
/// shell together with any player it started.
pub async fn run_playback(command: PlaybackCommand, limit: Duration) -> PlaybackOutcome {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return PlaybackOutcome::SpawnFailed(format!("{}: {}", command.program, e)),
    };
    let pid = child.id();

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            classify_exit(output.status.code(), &stdout)
        }
        Ok(Err(e)) => PlaybackOutcome::SpawnFailed(e.to_string()),
        Err(_) => {
            kill_process_group(pid);
            PlaybackOutcome::TimedOut
        }
    }
}

#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pgid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        debug!("プレイヤーのプロセスグループを終了できませんでした: {}", e);
    }
}

// The child itself is killed on drop; players there do not fork.
#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

// ============================================================================
// CommandAudioPlayer
// ============================================================================

/// Plays audio files through the host's native player.
pub struct CommandAudioPlayer {
    os: String,
    timeout: Duration,
    notifier: Arc<dyn Notifier>,
}

impl CommandAudioPlayer {
    /// Creates a player for the current operating system.
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            timeout: DEFAULT_PLAYBACK_TIMEOUT,
            notifier,
        }
    }

    /// Overrides the OS identifier used to pick the player command.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Overrides the hard playback timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn os(&self) -> &str {
        &self.os
    }
}

impl AudioPlayer for CommandAudioPlayer {
    fn play(&self, path: &Path) -> Result<(), AudioError> {
        if !path.exists() {
            return Err(AudioError::AssetNotFound(path.to_path_buf()));
        }

        let command = PlaybackCommand::for_platform(&self.os, path)
            .ok_or_else(|| AudioError::UnsupportedPlatform(self.os.clone()))?;

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| AudioError::LaunchFailed(e.to_string()))?;

        info!("アザーンを再生します: {}", path.display());
        let notifier = Arc::clone(&self.notifier);
        let limit = self.timeout;
        runtime.spawn(async move {
            let outcome = run_playback(command, limit).await;
            report_outcome(&outcome, notifier.as_ref());
        });

        Ok(())
    }
}

impl std::fmt::Debug for CommandAudioPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandAudioPlayer")
            .field("os", &self.os)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
