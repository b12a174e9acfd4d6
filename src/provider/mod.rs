//! Prayer time provider.
//!
//! Translates (coordinates, method, date) into concrete prayer instants and
//! answers "what's next" and "how long until":
//!
//! ```text
//! ┌──────────────────────┐     ┌──────────────────────┐
//! │  PrayerTimeProvider  │────▶│  AstronomicalEngine  │
//! │  - next_prayer       │     │  (salah, or a mock)  │
//! │  - all_prayer_times  │     └──────────────────────┘
//! └──────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use prayer_reminder::provider::PrayerTimeProvider;
//! use prayer_reminder::types::{CalculationMethod, Coordinates};
//!
//! let cairo = Coordinates::new(30.0444, 31.2357).unwrap();
//! let provider = PrayerTimeProvider::new(cairo, CalculationMethod::from_name("Egyptian"));
//!
//! let now = Utc::now();
//! let next = provider.next_prayer(&now).unwrap();
//! let remaining = provider.remaining_time(next.time, now);
//! println!("{} in {}", next.display_name, remaining.formatted);
//! ```

mod engine;
mod error;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::debug;

pub use engine::{AstronomicalEngine, DailyPrayerTimes, MockAstronomicalEngine, SalahEngine};
pub use error::ProviderError;

use crate::types::{CalculationMethod, Coordinates, Madhab, PrayerInfo, PrayerName, RemainingTime};

/// Computes prayer times for a fixed location and calculation method.
///
/// Location and method are immutable; build a new provider when they change.
#[derive(Clone)]
pub struct PrayerTimeProvider {
    coordinates: Coordinates,
    method: CalculationMethod,
    madhab: Madhab,
    engine: Arc<dyn AstronomicalEngine>,
}

impl PrayerTimeProvider {
    /// Creates a provider backed by the `salah` engine with the Shafi madhab.
    pub fn new(coordinates: Coordinates, method: CalculationMethod) -> Self {
        Self::with_engine(coordinates, method, Arc::new(SalahEngine::new()))
    }

    /// Creates a provider backed by a custom engine.
    pub fn with_engine(
        coordinates: Coordinates,
        method: CalculationMethod,
        engine: Arc<dyn AstronomicalEngine>,
    ) -> Self {
        Self {
            coordinates,
            method,
            madhab: Madhab::default(),
            engine,
        }
    }

    /// Returns a provider using the given madhab for Asr.
    pub fn with_madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = madhab;
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    pub fn madhab(&self) -> Madhab {
        self.madhab
    }

    /// Returns the raw prayer instants for a calendar day.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Engine`] if the astronomical engine fails.
    pub fn prayer_times(&self, date: NaiveDate) -> Result<DailyPrayerTimes, ProviderError> {
        self.engine
            .compute(self.coordinates, date, self.method, self.madhab)
            .map_err(|message| ProviderError::Engine { date, message })
    }

    /// Returns the five prayers of the calendar day containing `at`, in
    /// canonical order.
    ///
    /// The calendar day is taken in `at`'s own time zone.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn all_prayer_times<Tz: TimeZone>(
        &self,
        at: &DateTime<Tz>,
    ) -> Result<Vec<PrayerInfo>, ProviderError> {
        self.prayers_on(at.date_naive())
    }

    fn prayers_on(&self, date: NaiveDate) -> Result<Vec<PrayerInfo>, ProviderError> {
        let times = self.prayer_times(date)?;
        Ok(PrayerName::ALL
            .iter()
            .map(|&name| PrayerInfo::new(name, times.time(name)))
            .collect())
    }

    /// Returns the first prayer strictly after `now`.
    ///
    /// A prayer whose instant equals `now` has already occurred. When all of
    /// today's prayers have passed, tomorrow's fajr is returned.
    ///
    /// # Errors
    ///
    /// Propagates engine failures.
    pub fn next_prayer<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<PrayerInfo, ProviderError> {
        let instant = now.with_timezone(&Utc);
        let today = now.date_naive();

        if let Some(prayer) = self
            .prayers_on(today)?
            .into_iter()
            .find(|prayer| prayer.time > instant)
        {
            return Ok(prayer);
        }

        let tomorrow = today
            .succ_opt()
            .ok_or(ProviderError::DateOutOfRange(today))?;
        debug!("本日の礼拝はすべて終了しました。翌日のファジュルを計算します: {}", tomorrow);
        let times = self.prayer_times(tomorrow)?;
        Ok(PrayerInfo::new(PrayerName::Fajr, times.fajr))
    }

    /// Returns the countdown from `current` to `target`.
    pub fn remaining_time(&self, target: DateTime<Utc>, current: DateTime<Utc>) -> RemainingTime {
        remaining_time(target, current)
    }
}

impl std::fmt::Debug for PrayerTimeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrayerTimeProvider")
            .field("coordinates", &self.coordinates)
            .field("method", &self.method)
            .field("madhab", &self.madhab)
            .finish_non_exhaustive()
    }
}

/// Computes the countdown from `current` to `target`.
///
/// `total_seconds` is floored toward negative infinity, and so is the
/// `minutes` total derived from it. Formatting:
/// - negative: `"N min ago"`
/// - at least one hour: `"Hh Mm"`
/// - otherwise: `"M min"`
pub fn remaining_time(target: DateTime<Utc>, current: DateTime<Utc>) -> RemainingTime {
    let diff_ms = (target - current).num_milliseconds();
    let total_seconds = diff_ms.div_euclid(1000);
    let total_minutes = total_seconds.div_euclid(60);
    let hours = total_minutes.div_euclid(60);
    let minutes_of_hour = total_minutes % 60;
    let seconds = (total_seconds % 60).abs();

    let formatted = if total_seconds < 0 {
        format!("{} min ago", total_minutes.abs())
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes_of_hour)
    } else {
        format!("{} min", minutes_of_hour)
    };

    RemainingTime {
        total_seconds,
        minutes: total_minutes,
        seconds,
        formatted,
    }
}

// ============================================================================
// Tests
// ============================================================================
