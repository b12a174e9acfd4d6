//! Integration tests for the reminder tracker.
//!
//! These tests drive the tracker through whole days with a manual clock and
//! the mock collaborators:
//! - Exactly one reminder and one arrival per prayer occurrence
//! - Re-arming on the following day
//! - Recovery after provider failures
//! - The spawned polling loop and its disposal

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};

use prayer_reminder::daemon::{FixedClock, MockStatusDisplay, PLACEHOLDER_STATUS};
use prayer_reminder::notification::{MockNotifier, NotificationLevel};
use prayer_reminder::sound::MockAudioPlayer;
use prayer_reminder::{
    CalculationMethod, Coordinates, MockAstronomicalEngine, PrayerName, PrayerTimeProvider,
    ReminderTracker, TrackerSettings,
};

// ============================================================================
// Test Helpers
// ============================================================================

struct Harness {
    tracker: ReminderTracker,
    clock: Arc<FixedClock>,
    engine: Arc<MockAstronomicalEngine>,
    notifier: Arc<MockNotifier>,
    audio: Arc<MockAudioPlayer>,
    display: Arc<MockStatusDisplay>,
}

impl Harness {
    fn count_info(&self, needle: &str) -> usize {
        self.notifier
            .messages(NotificationLevel::Info)
            .iter()
            .filter(|m| m.contains(needle))
            .count()
    }

    /// Polls once per `step` for `polls` iterations.
    fn poll(&mut self, polls: usize, step: chrono::Duration) {
        for _ in 0..polls {
            self.tracker.tick();
            self.clock.advance(step);
        }
    }
}

fn utc_plus(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).unwrap()
}

fn start_at(offset: FixedOffset, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
    offset.with_ymd_and_hms(2024, 1, d, h, mi, s).unwrap()
}

fn create_harness(now: DateTime<FixedOffset>, reminder_minutes: u32) -> Harness {
    let clock = Arc::new(FixedClock::new(now));
    let engine = Arc::new(MockAstronomicalEngine::new());
    let notifier = Arc::new(MockNotifier::new());
    let audio = Arc::new(MockAudioPlayer::new());
    let display = Arc::new(MockStatusDisplay::new());

    let provider = PrayerTimeProvider::with_engine(
        Coordinates::new(30.0444, 31.2357).unwrap(),
        CalculationMethod::Egyptian,
        engine.clone(),
    );
    let settings = TrackerSettings {
        reminder_minutes,
        enable_adhan: true,
        adhan_path: PathBuf::from("/usr/share/prayer/azan.mp3"),
        poll_interval: Duration::from_secs(60),
    };
    let tracker = ReminderTracker::new(provider, settings, notifier.clone(), audio.clone())
        .with_clock(clock.clone())
        .with_display(display.clone());

    Harness {
        tracker,
        clock,
        engine,
        notifier,
        audio,
        display,
    }
}

// ============================================================================
// Whole-day polling
// ============================================================================

#[test]
fn test_one_reminder_and_arrival_per_prayer_per_day() {
    let mut h = create_harness(start_at(utc_plus(0), 15, 0, 0, 30), 10);

    h.poll(24 * 60, chrono::Duration::minutes(1));

    assert_eq!(h.count_info("Prayer Reminder"), 5);
    assert_eq!(h.count_info("time has arrived!"), 5);
    assert_eq!(h.audio.play_count(), 5);
    for name in ["Fajr", "Dhuhr", "Asr", "Maghrib", "Isha"] {
        assert_eq!(
            h.count_info(&format!("Prayer Reminder: {} in 10 minutes", name)),
            1,
            "{} reminder",
            name
        );
    }
}

#[test]
fn test_reminders_rearm_on_following_days() {
    let mut h = create_harness(start_at(utc_plus(0), 15, 0, 0, 30), 10);

    h.poll(3 * 24 * 60, chrono::Duration::minutes(1));

    assert_eq!(h.count_info("Prayer Reminder"), 15);
    assert_eq!(h.count_info("time has arrived!"), 15);
}

#[test]
fn test_fast_polling_still_fires_once() {
    let mut h = create_harness(start_at(utc_plus(0), 15, 4, 15, 0), 10);

    h.poll(20 * 60, chrono::Duration::seconds(1));

    assert_eq!(h.count_info("Prayer Reminder: Fajr"), 1);
    assert_eq!(h.count_info("Fajr time has arrived!"), 1);
}

#[test]
fn test_local_offset_does_not_change_instants() {
    let mut h = create_harness(start_at(utc_plus(3), 15, 7, 19, 30), 10);

    h.tracker.tick();

    assert_eq!(h.count_info("Prayer Reminder: Fajr in 10 minutes"), 1);
    assert_eq!(h.display.last().as_deref(), Some("⏰ Fajr in 10 min"));
}

#[test]
fn test_provider_failure_recovers_on_next_poll() {
    let mut h = create_harness(start_at(utc_plus(0), 15, 4, 18, 30), 10);

    h.engine.set_should_fail(true);
    h.poll(2, chrono::Duration::seconds(30));
    assert_eq!(h.display.last().as_deref(), Some(PLACEHOLDER_STATUS));
    assert_eq!(h.notifier.notification_count(), 0);

    h.engine.set_should_fail(false);
    h.poll(2, chrono::Duration::seconds(30));
    assert_eq!(h.count_info("Prayer Reminder: Fajr"), 1);
    assert_ne!(h.display.last().as_deref(), Some(PLACEHOLDER_STATUS));
}

#[test]
fn test_missing_audio_warns_every_occurrence() {
    let mut h = create_harness(start_at(utc_plus(0), 15, 0, 0, 30), 10);
    h.audio.set_should_fail(true);

    h.poll(24 * 60, chrono::Duration::minutes(1));

    let warnings = h.notifier.messages(NotificationLevel::Warning);
    assert_eq!(warnings.len(), 5);
    assert!(warnings
        .iter()
        .all(|w| w.contains("/usr/share/prayer/azan.mp3")));
    assert_eq!(h.count_info("time has arrived!"), 5);
}

// ============================================================================
// Polling loop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_spawned_loop_reminds_and_disposes() {
    let h = create_harness(start_at(utc_plus(2), 15, 6, 19, 0), 10);
    let clock = h.clock.clone();
    let notifier = h.notifier.clone();
    let display = h.display.clone();

    let handle = h.tracker.spawn();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(display.last().as_deref(), Some("⏰ Fajr in 11 min"));

    clock.advance(chrono::Duration::seconds(30));
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(
        notifier.messages(NotificationLevel::Info),
        vec!["🕌 Prayer Reminder: Fajr in 10 minutes".to_string()]
    );

    handle.dispose().await;
    let updates = display.update_count();
    clock.advance(chrono::Duration::minutes(10));
    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(display.update_count(), updates);
    assert_eq!(notifier.notification_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_update_config_through_handle() {
    let h = create_harness(start_at(utc_plus(0), 15, 11, 45, 0), 10);
    let notifier = h.notifier.clone();

    let handle = h.tracker.spawn();
    handle.update_config(15, false).await;

    let tracker = handle.tracker();
    {
        let tracker = tracker.lock().await;
        assert_eq!(tracker.settings().reminder_minutes, 15);
        assert!(!tracker.settings().enable_adhan);
        assert_eq!(tracker.next_prayer().unwrap().name, PrayerName::Dhuhr);
    }

    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(
        notifier.messages(NotificationLevel::Info),
        vec!["🕌 Prayer Reminder: Dhuhr in 15 minutes".to_string()]
    );

    handle.dispose().await;
}
