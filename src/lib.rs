//! Prayer Reminder Library
//!
//! This library provides the core functionality for the prayer reminder CLI.
//! It includes:
//! - Prayer time provider wrapping an astronomical engine
//! - Reminder tracker with deduplicated notifications and adhan playback
//! - Static city table for coordinate lookup
//! - Desktop notifications with log fallback
//! - OS-native audio playback
//! - TOML configuration
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod daemon;
pub mod location;
pub mod notification;
pub mod provider;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    CalculationMethod, Coordinates, Madhab, PrayerInfo, PrayerName, RemainingTime, TimeFormat,
};

pub use config::{ConfigError, PrayerConfig};

pub use provider::{
    remaining_time, AstronomicalEngine, DailyPrayerTimes, MockAstronomicalEngine,
    PrayerTimeProvider, ProviderError, SalahEngine,
};

pub use daemon::{
    Clock, FixedClock, MockStatusDisplay, ReminderEvents, ReminderTracker, StatusDisplay,
    SystemClock, TrackerHandle, TrackerSettings,
};

pub use notification::{DesktopNotifier, LogNotifier, MockNotifier, NotificationLevel, Notifier};

pub use sound::{AudioError, AudioPlayer, CommandAudioPlayer, MockAudioPlayer};
