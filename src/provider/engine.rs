//! Astronomical engine abstraction.
//!
//! The provider never computes solar positions itself. It asks an
//! [`AstronomicalEngine`] for the five prayer instants of a calendar day and
//! treats the answer as ground truth. [`SalahEngine`] is the production
//! implementation backed by the `salah` crate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use salah::prelude as salah_api;

use crate::types::{CalculationMethod, Coordinates, Madhab, PrayerName};

/// The five prayer instants of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyPrayerTimes {
    pub fajr: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
}

impl DailyPrayerTimes {
    /// Returns the instant of the given prayer.
    pub fn time(&self, name: PrayerName) -> DateTime<Utc> {
        match name {
            PrayerName::Fajr => self.fajr,
            PrayerName::Dhuhr => self.dhuhr,
            PrayerName::Asr => self.asr,
            PrayerName::Maghrib => self.maghrib,
            PrayerName::Isha => self.isha,
        }
    }
}

/// Maps (coordinates, date, calculation parameters) to five prayer instants.
pub trait AstronomicalEngine: Send + Sync {
    /// Computes the prayer times for `date`.
    ///
    /// # Errors
    ///
    /// Returns the engine's own failure message; callers propagate it unchanged.
    fn compute(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        method: CalculationMethod,
        madhab: Madhab,
    ) -> Result<DailyPrayerTimes, String>;
}

// ============================================================================
// SalahEngine
// ============================================================================

/// Engine backed by the `salah` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalahEngine;

impl SalahEngine {
    pub fn new() -> Self {
        Self
    }

    fn method(method: CalculationMethod) -> salah_api::Method {
        match method {
            CalculationMethod::MuslimWorldLeague => salah_api::Method::MuslimWorldLeague,
            CalculationMethod::Egyptian => salah_api::Method::Egyptian,
            CalculationMethod::Karachi => salah_api::Method::Karachi,
            CalculationMethod::UmmAlQura => salah_api::Method::UmmAlQura,
            CalculationMethod::Dubai => salah_api::Method::Dubai,
            CalculationMethod::MoonsightingCommittee => {
                salah_api::Method::MoonsightingCommittee
            }
            CalculationMethod::NorthAmerica => salah_api::Method::NorthAmerica,
            CalculationMethod::Kuwait => salah_api::Method::Kuwait,
            CalculationMethod::Qatar => salah_api::Method::Qatar,
            CalculationMethod::Singapore => salah_api::Method::Singapore,
            CalculationMethod::Tehran => salah_api::Method::Tehran,
            CalculationMethod::Turkey => salah_api::Method::Turkey,
        }
    }

    fn madhab(madhab: Madhab) -> salah_api::Madhab {
        match madhab {
            Madhab::Shafi => salah_api::Madhab::Shafi,
            Madhab::Hanafi => salah_api::Madhab::Hanafi,
        }
    }
}

impl AstronomicalEngine for SalahEngine {
    fn compute(
        &self,
        coordinates: Coordinates,
        date: NaiveDate,
        method: CalculationMethod,
        madhab: Madhab,
    ) -> Result<DailyPrayerTimes, String> {
        let location =
            salah_api::Coordinates::new(coordinates.latitude(), coordinates.longitude());
        let params = salah_api::Configuration::with(Self::method(method), Self::madhab(madhab));

        let times = salah_api::PrayerSchedule::new()
            .on(date)
            .for_location(location)
            .with_configuration(params)
            .calculate()?;

        Ok(DailyPrayerTimes {
            fajr: times.time(salah_api::Prayer::Fajr),
            dhuhr: times.time(salah_api::Prayer::Dhuhr),
            asr: times.time(salah_api::Prayer::Asr),
            maghrib: times.time(salah_api::Prayer::Maghrib),
            isha: times.time(salah_api::Prayer::Isha),
        })
    }
}

// ============================================================================
// MockAstronomicalEngine
// ============================================================================

/// Mock engine for testing.
///
/// Produces the same UTC time of day for every calendar date, so tests can
/// reason about exact instants without any astronomy.
#[derive(Debug)]
pub struct MockAstronomicalEngine {
    times_of_day: Mutex<[NaiveTime; 5]>,
    should_fail: AtomicBool,
    calls: AtomicUsize,
}

impl Default for MockAstronomicalEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAstronomicalEngine {
    /// Creates a mock with fajr 04:30, dhuhr 12:00, asr 15:30, maghrib 18:00
    /// and isha 19:30 UTC.
    #[must_use]
    pub fn new() -> Self {
        Self::with_times([(4, 30), (12, 0), (15, 30), (18, 0), (19, 30)])
    }

    /// Creates a mock with the given (hour, minute) per prayer in canonical order.
    ///
    /// # Panics
    ///
    /// Panics if any pair is not a valid time of day.
    #[must_use]
    pub fn with_times(times: [(u32, u32); 5]) -> Self {
        let times_of_day = times.map(|(h, m)| {
            NaiveTime::from_hms_opt(h, m, 0).expect("mock prayer time must be valid")
        });
        Self {
            times_of_day: Mutex::new(times_of_day),
            should_fail: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AstronomicalEngine for MockAstronomicalEngine {
    fn compute(
        &self,
        _coordinates: Coordinates,
        date: NaiveDate,
        _method: CalculationMethod,
        _madhab: Madhab,
    ) -> Result<DailyPrayerTimes, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err("Mock failure".to_string());
        }
        let t = *self
            .times_of_day
            .lock()
            .map_err(|_| "mock state poisoned".to_string())?;
        let at = |time: NaiveTime| date.and_time(time).and_utc();
        Ok(DailyPrayerTimes {
            fajr: at(t[0]),
            dhuhr: at(t[1]),
            asr: at(t[2]),
            maghrib: at(t[3]),
            isha: at(t[4]),
        })
    }
}
