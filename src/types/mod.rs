//! Core data types for the prayer reminder.
//!
//! This module defines the data structures used for:
//! - Prayer identities and computed prayer instants
//! - Geographic coordinates with range validation
//! - Calculation method / madhab selection with documented fallbacks
//! - Countdown values derived from two instants

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// PrayerName
// ============================================================================

/// The five daily prayers, in their canonical chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrayerName {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// All prayers in canonical order. Downstream logic relies on this order.
    pub const ALL: [PrayerName; 5] = [
        PrayerName::Fajr,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
    ];

    /// Returns the lowercase identifier of the prayer.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "fajr",
            PrayerName::Dhuhr => "dhuhr",
            PrayerName::Asr => "asr",
            PrayerName::Maghrib => "maghrib",
            PrayerName::Isha => "isha",
        }
    }

    /// Returns the human readable name of the prayer.
    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }
}

impl fmt::Display for PrayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PrayerInfo
// ============================================================================

/// A single computed prayer occurrence.
///
/// Produced fresh for every query and never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerInfo {
    /// Which prayer this is
    pub name: PrayerName,
    /// The instant the prayer time begins
    pub time: DateTime<Utc>,
    /// Name shown to the user
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl PrayerInfo {
    /// Creates a prayer occurrence with the default display name.
    pub fn new(name: PrayerName, time: DateTime<Utc>) -> Self {
        Self {
            name,
            time,
            display_name: name.display_name().to_string(),
        }
    }
}

// ============================================================================
// Coordinates
// ============================================================================

/// A geographic location.
///
/// Latitude is kept in `[-90, 90]` and longitude in `[-180, 180]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Creates validated coordinates.
    ///
    /// Returns an error message if either component is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!(
                "緯度は-90から90の範囲で指定してください: {}",
                latitude
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!(
                "経度は-180から180の範囲で指定してください: {}",
                longitude
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Builds coordinates from trusted static table data.
    pub(crate) const fn from_table(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

// ============================================================================
// CalculationMethod
// ============================================================================

/// Named parameter sets for deriving prayer times.
///
/// Fourteen names are accepted on input (two pairs are aliases), and any
/// unrecognised name resolves to [`CalculationMethod::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CalculationMethod {
    MuslimWorldLeague,
    Egyptian,
    Karachi,
    UmmAlQura,
    Dubai,
    MoonsightingCommittee,
    NorthAmerica,
    Kuwait,
    Qatar,
    Singapore,
    Tehran,
    Turkey,
}

impl CalculationMethod {
    /// Method used when the configured name is not recognised.
    pub const DEFAULT: CalculationMethod = CalculationMethod::Egyptian;

    /// Every accepted configuration name.
    pub const ACCEPTED_NAMES: [&'static str; 14] = [
        "Egyptian",
        "UmmAlQura",
        "MWL",
        "MuslimWorldLeague",
        "ISNA",
        "NorthAmerica",
        "Karachi",
        "Tehran",
        "Dubai",
        "Kuwait",
        "Qatar",
        "Singapore",
        "Turkey",
        "MoonsightingCommittee",
    ];

    /// Parses an exact configuration name, returning `None` when unknown.
    pub fn parse_name(name: &str) -> Option<Self> {
        let method = match name {
            "Egyptian" => CalculationMethod::Egyptian,
            "UmmAlQura" => CalculationMethod::UmmAlQura,
            "MWL" | "MuslimWorldLeague" => CalculationMethod::MuslimWorldLeague,
            "ISNA" | "NorthAmerica" => CalculationMethod::NorthAmerica,
            "Karachi" => CalculationMethod::Karachi,
            "Tehran" => CalculationMethod::Tehran,
            "Dubai" => CalculationMethod::Dubai,
            "Kuwait" => CalculationMethod::Kuwait,
            "Qatar" => CalculationMethod::Qatar,
            "Singapore" => CalculationMethod::Singapore,
            "Turkey" => CalculationMethod::Turkey,
            "MoonsightingCommittee" => CalculationMethod::MoonsightingCommittee,
            _ => return None,
        };
        Some(method)
    }

    /// Resolves a configuration name, falling back to the default method.
    pub fn from_name(name: &str) -> Self {
        Self::parse_name(name).unwrap_or(Self::DEFAULT)
    }

    /// Returns the canonical name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationMethod::MuslimWorldLeague => "MuslimWorldLeague",
            CalculationMethod::Egyptian => "Egyptian",
            CalculationMethod::Karachi => "Karachi",
            CalculationMethod::UmmAlQura => "UmmAlQura",
            CalculationMethod::Dubai => "Dubai",
            CalculationMethod::MoonsightingCommittee => "MoonsightingCommittee",
            CalculationMethod::NorthAmerica => "NorthAmerica",
            CalculationMethod::Kuwait => "Kuwait",
            CalculationMethod::Qatar => "Qatar",
            CalculationMethod::Singapore => "Singapore",
            CalculationMethod::Tehran => "Tehran",
            CalculationMethod::Turkey => "Turkey",
        }
    }
}

impl Default for CalculationMethod {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// Madhab
// ============================================================================

/// Juristic school, which only affects the Asr shadow length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Madhab {
    Shafi,
    Hanafi,
}

impl Madhab {
    /// Resolves a name case-insensitively, falling back to `Shafi`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "hanafi" => Madhab::Hanafi,
            _ => Madhab::Shafi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Madhab::Shafi => "shafi",
            Madhab::Hanafi => "hanafi",
        }
    }
}

impl Default for Madhab {
    fn default() -> Self {
        Madhab::Shafi
    }
}

// ============================================================================
// RemainingTime
// ============================================================================

/// Countdown from one instant to another. Always recomputed, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingTime {
    /// Whole seconds until the target, floored toward negative infinity
    #[serde(rename = "totalSeconds")]
    pub total_seconds: i64,
    /// Whole minutes until the target (`floor(total_seconds / 60)`)
    pub minutes: i64,
    /// Seconds component, always non-negative
    pub seconds: i64,
    /// Countdown text, e.g. `"2h 24m"`, `"23 min"` or `"5 min ago"`
    pub formatted: String,
}

// ============================================================================
// TimeFormat
// ============================================================================

/// Clock style used when printing prayer times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

// ============================================================================
// Tests
// ============================================================================
