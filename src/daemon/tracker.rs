//! Prayer countdown and reminder tracker.
//!
//! The tracker samples the next prayer on a fixed cadence and turns each
//! sample into three effects:
//!
//! - a status line (`"⏰ Asr in 1h 5m"`) refreshed on every poll
//! - a one-shot reminder at the configured lead time
//! - a one-shot arrival notification plus adhan playback at prayer time
//!
//! Duplicate suppression uses two flags (reminder and adhan), each holding
//! the prayer occurrence it last fired for. A flag is cleared once that
//! occurrence lies a full minute in the past, re-arming the same prayer for
//! the next day.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::clock::{Clock, SystemClock};
use super::status::{LogStatusDisplay, StatusDisplay, PLACEHOLDER_STATUS};
use crate::notification::Notifier;
use crate::provider::{remaining_time, PrayerTimeProvider, ProviderError};
use crate::sound::AudioPlayer;
use crate::types::{PrayerInfo, PrayerName, RemainingTime};

// ============================================================================
// Transition guards
// ============================================================================

/// Returns true while the countdown sits inside the reminder minute.
#[must_use]
pub fn reminder_due(remaining: &RemainingTime, threshold_minutes: u32) -> bool {
    remaining.minutes == i64::from(threshold_minutes) && remaining.seconds < 60
}

/// Returns true when the prayer instant falls within the next `window_secs`
/// seconds. A window below one second is treated as one second, which makes
/// the guard fire only when `total_seconds == 0`.
#[must_use]
pub fn adhan_due(remaining: &RemainingTime, window_secs: u64) -> bool {
    let window = i64::try_from(window_secs.max(1)).unwrap_or(i64::MAX);
    remaining.total_seconds >= 0 && remaining.total_seconds < window
}

/// Returns true once an occurrence lies at least one full minute in the past.
///
/// Uses whole elapsed minutes (truncated), not the floored `minutes` field.
#[must_use]
pub fn occurrence_passed(remaining: &RemainingTime) -> bool {
    remaining.total_seconds < 0 && (remaining.total_seconds / 60).abs() >= 1
}

/// Returns true if `flag` already holds the prayer `upcoming` refers to.
#[must_use]
pub fn already_notified(flag: Option<&LastNotified>, upcoming: &PrayerInfo) -> bool {
    flag.is_some_and(|last| last.prayer == upcoming.name)
}

// ============================================================================
// Tracker state
// ============================================================================

/// The prayer occurrence a flag last fired for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastNotified {
    pub prayer: PrayerName,
    pub time: DateTime<Utc>,
}

impl LastNotified {
    fn of(prayer: &PrayerInfo) -> Self {
        Self {
            prayer: prayer.name,
            time: prayer.time,
        }
    }

    /// Returns true once this occurrence is over a minute in the past.
    #[must_use]
    pub fn has_passed(&self, now: DateTime<Utc>) -> bool {
        occurrence_passed(&remaining_time(self.time, now))
    }
}

/// Tunables of a running tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    /// Reminder lead time in minutes
    pub reminder_minutes: u32,
    /// Whether the adhan is played when a prayer time arrives
    pub enable_adhan: bool,
    /// Adhan audio asset
    pub adhan_path: PathBuf,
    /// Poll cadence
    pub poll_interval: Duration,
}

impl TrackerSettings {
    /// Width of the arrival window in seconds (one poll interval).
    #[must_use]
    pub fn adhan_window_secs(&self) -> u64 {
        self.poll_interval.as_secs().max(1)
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            reminder_minutes: 10,
            enable_adhan: true,
            adhan_path: PathBuf::from("azan.mp3"),
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// What a single reminder check fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderEvents {
    /// Prayer a reminder was sent for
    pub reminder: Option<PrayerName>,
    /// Prayer whose arrival was announced
    pub arrival: Option<PrayerName>,
}

impl ReminderEvents {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reminder.is_none() && self.arrival.is_none()
    }
}

// ============================================================================
// ReminderTracker
// ============================================================================

/// Tracks the next prayer and fires deduplicated reminders.
pub struct ReminderTracker {
    provider: PrayerTimeProvider,
    settings: TrackerSettings,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    audio: Arc<dyn AudioPlayer>,
    display: Arc<dyn StatusDisplay>,
    status: String,
    last_reminder: Option<LastNotified>,
    last_adhan: Option<LastNotified>,
}

impl ReminderTracker {
    /// Creates a tracker on the system clock that logs its status line.
    pub fn new(
        provider: PrayerTimeProvider,
        settings: TrackerSettings,
        notifier: Arc<dyn Notifier>,
        audio: Arc<dyn AudioPlayer>,
    ) -> Self {
        Self {
            provider,
            settings,
            clock: Arc::new(SystemClock),
            notifier,
            audio,
            display: Arc::new(LogStatusDisplay),
            status: PLACEHOLDER_STATUS.to_string(),
            last_reminder: None,
            last_adhan: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_display(mut self, display: Arc<dyn StatusDisplay>) -> Self {
        self.display = display;
        self
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn provider(&self) -> &PrayerTimeProvider {
        &self.provider
    }

    /// Returns the status text from the last refresh.
    pub fn status_text(&self) -> &str {
        &self.status
    }

    pub fn last_reminder(&self) -> Option<LastNotified> {
        self.last_reminder
    }

    pub fn last_adhan(&self) -> Option<LastNotified> {
        self.last_adhan
    }

    /// Samples the next prayer and its countdown at the current clock time.
    fn sample(&self) -> Result<(PrayerInfo, DateTime<Utc>, RemainingTime), ProviderError> {
        let now = self.clock.now();
        let next = self.provider.next_prayer(&now)?;
        let now = now.with_timezone(&Utc);
        let remaining = remaining_time(next.time, now);
        Ok((next, now, remaining))
    }

    /// Recomputes the status line and pushes it to the display.
    ///
    /// Failures degrade the line to a static placeholder.
    pub fn refresh_display(&mut self) -> &str {
        self.status = match self.sample() {
            Ok((next, _, remaining)) if remaining.total_seconds > 0 => {
                format!("⏰ {} in {}", next.display_name, remaining.formatted)
            }
            Ok((next, _, _)) => format!("🕌 {} now", next.display_name),
            Err(e) => {
                error!("ステータスの更新に失敗しました: {}", e);
                PLACEHOLDER_STATUS.to_string()
            }
        };
        self.display.show(&self.status);
        &self.status
    }

    /// Fires any due reminder or arrival alert.
    ///
    /// Failures are logged and reported as no events.
    pub fn check_reminders(&mut self) -> ReminderEvents {
        match self.try_check_reminders() {
            Ok(events) => events,
            Err(e) => {
                error!("リマインダーの確認に失敗しました: {}", e);
                ReminderEvents::default()
            }
        }
    }

    fn try_check_reminders(&mut self) -> Result<ReminderEvents, ProviderError> {
        let (next, now, remaining) = self.sample()?;
        let mut events = ReminderEvents::default();

        if reminder_due(&remaining, self.settings.reminder_minutes)
            && !already_notified(self.last_reminder.as_ref(), &next)
        {
            let minutes = self.settings.reminder_minutes;
            let message = format!(
                "🕌 Prayer Reminder: {} in {} minute{}",
                next.display_name,
                minutes,
                if minutes != 1 { "s" } else { "" }
            );
            info!("リマインダーを送信します: {}", next.name);
            self.notifier.info(&message);
            self.last_reminder = Some(LastNotified::of(&next));
            events.reminder = Some(next.name);
        }

        if adhan_due(&remaining, self.settings.adhan_window_secs())
            && !already_notified(self.last_adhan.as_ref(), &next)
        {
            info!("礼拝の時間になりました: {}", next.name);
            self.notifier
                .info(&format!("🕌 {} time has arrived!", next.display_name));
            if self.settings.enable_adhan {
                self.play_adhan();
            }
            self.last_adhan = Some(LastNotified::of(&next));
            events.arrival = Some(next.name);
        }

        self.last_reminder = self.last_reminder.filter(|last| !last.has_passed(now));
        self.last_adhan = self.last_adhan.filter(|last| !last.has_passed(now));

        Ok(events)
    }

    fn play_adhan(&self) {
        match self.audio.play(&self.settings.adhan_path) {
            Ok(()) => debug!("アザーンの再生を開始しました"),
            Err(e) => {
                warn!("アザーンを再生できません: {} ({})", e, e.suggestion());
                self.notifier.warning(&e.user_message());
            }
        }
    }

    /// Runs one poll: refresh the status line, then check reminders.
    pub fn tick(&mut self) -> ReminderEvents {
        self.refresh_display();
        self.check_reminders()
    }

    /// Replaces both tunables and refreshes the display.
    ///
    /// Only the reminder flag is reset, so a reminder can fire again under
    /// the new lead time. The adhan flag is kept.
    pub fn update_config(&mut self, reminder_minutes: u32, enable_adhan: bool) {
        info!(
            "設定を更新しました: リマインダー {}分前, アザーン {}",
            reminder_minutes, enable_adhan
        );
        self.settings.reminder_minutes = reminder_minutes;
        self.settings.enable_adhan = enable_adhan;
        self.last_reminder = None;
        self.refresh_display();
    }

    /// Returns today's five prayers in canonical order.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub fn all_prayer_times(&self) -> Result<Vec<PrayerInfo>, ProviderError> {
        self.provider.all_prayer_times(&self.clock.now())
    }

    /// Returns the next prayer after the current clock time.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub fn next_prayer(&self) -> Result<PrayerInfo, ProviderError> {
        self.provider.next_prayer(&self.clock.now())
    }

    /// Returns the countdown to the next prayer.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub fn remaining_time(&self) -> Result<RemainingTime, ProviderError> {
        self.sample().map(|(_, _, remaining)| remaining)
    }

    /// Starts the polling loop on the current tokio runtime.
    ///
    /// The status line is refreshed immediately; reminders are first checked
    /// one poll interval later. Missed ticks are skipped, never replayed.
    pub fn spawn(self) -> TrackerHandle {
        let period = self.settings.poll_interval.max(Duration::from_millis(1));
        let tracker = Arc::new(Mutex::new(self));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let worker = Arc::clone(&tracker);
        let task = tokio::spawn(async move {
            worker.lock().await.refresh_display();

            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        worker.lock().await.tick();
                    }
                }
            }
            debug!("トラッカーのループを終了しました");
        });

        TrackerHandle {
            tracker,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

impl std::fmt::Debug for ReminderTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderTracker")
            .field("provider", &self.provider)
            .field("settings", &self.settings)
            .field("status", &self.status)
            .field("last_reminder", &self.last_reminder)
            .field("last_adhan", &self.last_adhan)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// TrackerHandle
// ============================================================================

/// Handle to a running tracker loop.
///
/// Dropping the handle aborts the loop; [`TrackerHandle::dispose`] stops it
/// and waits until no further tick can run.
#[derive(Debug)]
pub struct TrackerHandle {
    tracker: Arc<Mutex<ReminderTracker>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    /// Returns the shared tracker.
    pub fn tracker(&self) -> Arc<Mutex<ReminderTracker>> {
        Arc::clone(&self.tracker)
    }

    pub async fn update_config(&self, reminder_minutes: u32, enable_adhan: bool) {
        self.tracker
            .lock()
            .await
            .update_config(reminder_minutes, enable_adhan);
    }

    pub async fn status_text(&self) -> String {
        self.tracker.lock().await.status_text().to_string()
    }

    /// Returns true while the polling loop is alive.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the polling loop and waits for it to exit.
    pub async fn dispose(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("トラッカーの停止中にエラーが発生しました: {}", e);
            }
        }
        info!("トラッカーを停止しました");
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
