//! Display utilities for the prayer reminder CLI.
//!
//! This module provides formatted output for:
//! - Prayer time tables and the next-prayer countdown
//! - The city and calculation method listings
//! - JSON reports
//! - Error messages

use std::io::Write;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;

use crate::daemon::StatusDisplay;
use crate::location::{self, CITIES};
use crate::provider::{PrayerTimeProvider, ProviderError};
use crate::types::{CalculationMethod, PrayerInfo, PrayerName, RemainingTime, TimeFormat};

// ============================================================================
// Formatting helpers
// ============================================================================

/// Formats a date as `"Monday, January 15, 2024"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Formats a time as `"05:21 AM"` (12h) or `"05:21"` (24h).
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>, format: TimeFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match format {
        TimeFormat::TwelveHour => time.format("%I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
    }
}

// ============================================================================
// Reports
// ============================================================================

/// One prayer as printed in reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerEntry {
    pub name: PrayerName,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub time: DateTime<FixedOffset>,
    pub formatted: String,
}

impl PrayerEntry {
    pub fn new(prayer: &PrayerInfo, offset: &FixedOffset, format: TimeFormat) -> Self {
        let time = prayer.time.with_timezone(offset);
        Self {
            name: prayer.name,
            display_name: prayer.display_name.clone(),
            formatted: format_time(&time, format),
            time,
        }
    }
}

/// A day's prayer table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimesReport {
    pub date: NaiveDate,
    pub location: String,
    pub method: &'static str,
    pub madhab: &'static str,
    pub prayers: Vec<PrayerEntry>,
}

impl TimesReport {
    /// Computes the table for `date` as seen from `offset`.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub fn build(
        provider: &PrayerTimeProvider,
        date: NaiveDate,
        offset: &FixedOffset,
        location: String,
        format: TimeFormat,
    ) -> Result<Self, ProviderError> {
        let prayers = provider.all_prayer_times(&noon_on(date, offset))?;
        Ok(Self {
            date,
            location,
            method: provider.method().as_str(),
            madhab: provider.madhab().as_str(),
            prayers: prayers
                .iter()
                .map(|prayer| PrayerEntry::new(prayer, offset, format))
                .collect(),
        })
    }
}

/// The next prayer and its countdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextReport {
    pub prayer: PrayerEntry,
    pub remaining: RemainingTime,
}

impl NextReport {
    /// Finds the next prayer after `now`.
    ///
    /// # Errors
    ///
    /// Propagates provider failures.
    pub fn build(
        provider: &PrayerTimeProvider,
        now: &DateTime<FixedOffset>,
        format: TimeFormat,
    ) -> Result<Self, ProviderError> {
        let next = provider.next_prayer(now)?;
        let remaining = provider.remaining_time(next.time, now.with_timezone(&Utc));
        Ok(Self {
            prayer: PrayerEntry::new(&next, now.offset(), format),
            remaining,
        })
    }
}

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Renders a day's prayer table. The `next` prayer is marked.
    pub fn render_times(report: &TimesReport, next: Option<PrayerName>) -> String {
        let mut out = String::new();
        out.push_str(&format!("🕌 {}\n", format_date(report.date)));
        out.push_str(&format!(
            "   {} ({}, {})\n",
            report.location, report.method, report.madhab
        ));
        out.push_str("─────────────────────────────\n");
        for entry in &report.prayers {
            let marker = if Some(entry.name) == next { "▶" } else { " " };
            out.push_str(&format!(
                "{} {:<8} {}\n",
                marker, entry.display_name, entry.formatted
            ));
        }
        out
    }

    /// Renders the next prayer and its countdown.
    pub fn render_next(report: &NextReport) -> String {
        format!(
            "⏰ {} at {} (in {})",
            report.prayer.display_name, report.prayer.formatted, report.remaining.formatted
        )
    }

    /// Renders the built-in city table grouped by country.
    pub fn render_cities() -> String {
        let mut out = String::new();
        let mut current_country = "";
        for entry in CITIES {
            if entry.country != current_country {
                current_country = entry.country;
                let name = location::country_name(current_country).unwrap_or(current_country);
                out.push_str(&format!("{} ({})\n", name, current_country));
            }
            out.push_str(&format!(
                "  {:<16} {:>9.4} {:>9.4}\n",
                entry.city, entry.latitude, entry.longitude
            ));
        }
        out
    }

    /// Renders the accepted calculation method names.
    pub fn render_methods() -> String {
        let mut out = String::new();
        for name in CalculationMethod::ACCEPTED_NAMES {
            let marker = if name == CalculationMethod::DEFAULT.as_str() {
                " (default)"
            } else {
                ""
            };
            out.push_str(&format!("{}{}\n", name, marker));
        }
        out
    }

    pub fn show_times(report: &TimesReport, next: Option<PrayerName>) {
        print!("{}", Self::render_times(report, next));
    }

    pub fn show_next(report: &NextReport) {
        println!("{}", Self::render_next(report));
    }

    pub fn show_cities() {
        print!("{}", Self::render_cities());
    }

    pub fn show_methods() {
        print!("{}", Self::render_methods());
    }

    /// Prints a report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn show_json<T: Serialize>(report: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(report)?);
        Ok(())
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }
}

/// Status display that rewrites a single terminal line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalStatus;

impl StatusDisplay for TerminalStatus {
    fn show(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\r\x1b[2K{}", text);
        let _ = stdout.flush();
    }
}

/// Returns the current UTC offset of the host time zone.
pub fn local_offset() -> FixedOffset {
    *chrono::Local::now().offset()
}

/// Returns noon of `date` in `offset`, used to pick that calendar day.
pub fn noon_on(date: NaiveDate, offset: &FixedOffset) -> DateTime<FixedOffset> {
    let noon = date.and_time(NaiveTime::MIN) + chrono::Duration::hours(12);
    offset
        .from_local_datetime(&noon)
        .single()
        .unwrap_or_else(|| offset.from_utc_datetime(&noon))
}

/// Returns the current instant in `offset`.
pub fn now_in(offset: &FixedOffset) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(offset)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cairo() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn prayer(name: PrayerName, h: u32, m: u32) -> PrayerInfo {
        PrayerInfo::new(name, Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap())
    }

    fn sample_report() -> TimesReport {
        let prayers = [
            prayer(PrayerName::Fajr, 3, 21),
            prayer(PrayerName::Dhuhr, 10, 5),
            prayer(PrayerName::Asr, 12, 58),
            prayer(PrayerName::Maghrib, 15, 17),
            prayer(PrayerName::Isha, 16, 39),
        ];
        TimesReport {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            location: "Cairo, Egypt".to_string(),
            method: "Egyptian",
            madhab: "shafi",
            prayers: prayers
                .iter()
                .map(|p| PrayerEntry::new(p, &cairo(), TimeFormat::TwelveHour))
                .collect(),
        }
    }

    // ------------------------------------------------------------------------
    // Formatting helper Tests
    // ------------------------------------------------------------------------

    mod format_tests {
        use super::*;

        #[test]
        fn test_format_date() {
            let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
            assert_eq!(format_date(date), "Monday, January 15, 2024");
            let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            assert_eq!(format_date(date), "Friday, March 1, 2024");
        }

        #[test]
        fn test_format_time_twelve_hour() {
            let time = cairo().with_ymd_and_hms(2024, 1, 15, 5, 21, 0).unwrap();
            assert_eq!(format_time(&time, TimeFormat::TwelveHour), "05:21 AM");
            let time = cairo().with_ymd_and_hms(2024, 1, 15, 17, 17, 0).unwrap();
            assert_eq!(format_time(&time, TimeFormat::TwelveHour), "05:17 PM");
        }

        #[test]
        fn test_format_time_twenty_four_hour() {
            let time = cairo().with_ymd_and_hms(2024, 1, 15, 17, 17, 0).unwrap();
            assert_eq!(format_time(&time, TimeFormat::TwentyFourHour), "17:17");
        }

        #[test]
        fn test_noon_on_keeps_calendar_day() {
            let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
            let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
            let noon = noon_on(date, &tokyo);
            assert_eq!(noon.date_naive(), date);
            assert_eq!(noon.format("%H:%M").to_string(), "12:00");
        }
    }

    // ------------------------------------------------------------------------
    // Render Tests
    // ------------------------------------------------------------------------

    mod render_tests {
        use super::*;

        #[test]
        fn test_prayer_entry_uses_local_offset() {
            let entry = PrayerEntry::new(
                &prayer(PrayerName::Fajr, 3, 21),
                &cairo(),
                TimeFormat::TwentyFourHour,
            );
            assert_eq!(entry.formatted, "05:21");
        }

        #[test]
        fn test_render_times() {
            let out = Display::render_times(&sample_report(), Some(PrayerName::Asr));
            assert!(out.starts_with("🕌 Monday, January 15, 2024\n"));
            assert!(out.contains("Cairo, Egypt (Egyptian, shafi)"));
            assert!(out.contains("▶ Asr      02:58 PM"));
            assert!(out.contains("  Isha     06:39 PM"));
            assert_eq!(out.lines().count(), 8);
        }

        #[test]
        fn test_render_next() {
            let report = NextReport {
                prayer: sample_report().prayers[2].clone(),
                remaining: RemainingTime {
                    total_seconds: 3900,
                    minutes: 65,
                    seconds: 0,
                    formatted: "1h 5m".to_string(),
                },
            };
            assert_eq!(Display::render_next(&report), "⏰ Asr at 02:58 PM (in 1h 5m)");
        }

        #[test]
        fn test_render_cities_lists_every_city() {
            let out = Display::render_cities();
            assert!(out.contains("Egypt (EG)"));
            for entry in CITIES {
                assert!(out.contains(entry.city), "{} missing", entry.city);
            }
        }

        #[test]
        fn test_render_methods_marks_default_once() {
            let out = Display::render_methods();
            assert_eq!(out.lines().count(), 14);
            assert_eq!(out.matches("(default)").count(), 1);
            assert!(out.contains("Egyptian (default)"));
        }

        #[test]
        fn test_build_reports_from_provider() {
            use crate::provider::MockAstronomicalEngine;
            use crate::types::Coordinates;
            use std::sync::Arc;

            let provider = PrayerTimeProvider::with_engine(
                Coordinates::new(30.0444, 31.2357).unwrap(),
                CalculationMethod::Egyptian,
                Arc::new(MockAstronomicalEngine::new()),
            );
            let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

            let times = TimesReport::build(
                &provider,
                date,
                &cairo(),
                "Cairo, Egypt".to_string(),
                TimeFormat::TwentyFourHour,
            )
            .unwrap();
            assert_eq!(times.prayers.len(), 5);
            assert_eq!(times.prayers[0].formatted, "06:30");
            assert_eq!(times.method, "Egyptian");

            let now = cairo().with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap();
            let next = NextReport::build(&provider, &now, TimeFormat::TwentyFourHour).unwrap();
            assert_eq!(next.prayer.name, PrayerName::Dhuhr);
            assert_eq!(next.prayer.formatted, "14:00");
            assert_eq!(next.remaining.formatted, "1h 0m");
        }

        #[test]
        fn test_json_report_shape() {
            let value = serde_json::to_value(sample_report()).unwrap();
            assert_eq!(value["date"], "2024-01-15");
            assert_eq!(value["prayers"][0]["name"], "fajr");
            assert_eq!(value["prayers"][0]["displayName"], "Fajr");
            assert_eq!(value["prayers"][0]["time"], "2024-01-15T05:21:00+02:00");
        }
    }
}
