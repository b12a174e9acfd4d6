//! User configuration.
//!
//! Settings are read from a TOML file, by default
//! `<config dir>/prayer-reminder/config.toml`. Every key is optional:
//!
//! ```toml
//! city = "Istanbul"
//! country = "TR"
//! method = "Turkey"
//! madhab = "hanafi"
//! reminder_minutes = 15
//! enable_adhan = true
//! time_format = "24h"
//! ```
//!
//! Explicit `latitude`/`longitude` take precedence over the city lookup.

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use error::ConfigError;

use crate::daemon::TrackerSettings;
use crate::location;
use crate::provider::PrayerTimeProvider;
use crate::types::{CalculationMethod, Coordinates, Madhab, TimeFormat};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "prayer-reminder";

/// Default adhan audio file name.
pub const ADHAN_FILE_NAME: &str = "azan.mp3";

/// Maximum reminder lead time in minutes.
pub const MAX_REMINDER_MINUTES: u32 = 120;

// ============================================================================
// PrayerConfig
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrayerConfig {
    /// City name looked up in the built-in table
    #[serde(default = "default_city")]
    pub city: String,

    /// ISO country code of the city
    #[serde(default = "default_country")]
    pub country: String,

    /// Explicit latitude (requires `longitude`)
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Explicit longitude (requires `latitude`)
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Calculation method name
    #[serde(default = "default_method")]
    pub method: String,

    /// Juristic school for Asr (`shafi` or `hanafi`)
    #[serde(default = "default_madhab")]
    pub madhab: String,

    /// Reminder lead time in minutes (0-120)
    #[serde(default = "default_reminder_minutes")]
    pub reminder_minutes: u32,

    /// Play the adhan when a prayer time arrives
    #[serde(default = "default_enable_adhan")]
    pub enable_adhan: bool,

    /// Adhan audio file (defaults to the data directory)
    #[serde(default)]
    pub adhan_path: Option<PathBuf>,

    /// Poll cadence in seconds (1-3600)
    #[serde(default = "default_poll_interval_seconds")]
    pub poll_interval_seconds: u64,

    /// Hard limit on adhan playback in seconds (1-600)
    #[serde(default = "default_playback_timeout_seconds")]
    pub playback_timeout_seconds: u64,

    /// Clock style for printed times
    #[serde(default)]
    pub time_format: TimeFormat,
}

fn default_city() -> String {
    "Cairo".to_string()
}

fn default_country() -> String {
    "EG".to_string()
}

fn default_method() -> String {
    CalculationMethod::DEFAULT.as_str().to_string()
}

fn default_madhab() -> String {
    Madhab::Shafi.as_str().to_string()
}

fn default_reminder_minutes() -> u32 {
    10
}

fn default_enable_adhan() -> bool {
    true
}

fn default_poll_interval_seconds() -> u64 {
    60
}

fn default_playback_timeout_seconds() -> u64 {
    60
}

impl Default for PrayerConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            country: default_country(),
            latitude: None,
            longitude: None,
            method: default_method(),
            madhab: default_madhab(),
            reminder_minutes: default_reminder_minutes(),
            enable_adhan: default_enable_adhan(),
            adhan_path: None,
            poll_interval_seconds: default_poll_interval_seconds(),
            playback_timeout_seconds: default_playback_timeout_seconds(),
            time_format: TimeFormat::default(),
        }
    }
}

impl PrayerConfig {
    /// Returns the default configuration file path, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Returns the default adhan asset path.
    pub fn default_adhan_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(ADHAN_FILE_NAME)
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// when present and the built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("設定ファイルがないためデフォルト設定を使用します");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file without validating it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        debug!("設定ファイルを読み込みました: {}", path.display());
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Validates ranges and the latitude/longitude pairing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reminder_minutes > MAX_REMINDER_MINUTES {
            return Err(ConfigError::Invalid(format!(
                "reminder_minutes は0-{}分の範囲で指定してください",
                MAX_REMINDER_MINUTES
            )));
        }
        if !(1..=3600).contains(&self.poll_interval_seconds) {
            return Err(ConfigError::Invalid(
                "poll_interval_seconds は1-3600秒の範囲で指定してください".to_string(),
            ));
        }
        if !(1..=600).contains(&self.playback_timeout_seconds) {
            return Err(ConfigError::Invalid(
                "playback_timeout_seconds は1-600秒の範囲で指定してください".to_string(),
            ));
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => {
                Coordinates::new(lat, lon).map_err(ConfigError::Invalid)?;
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Invalid(
                    "latitude と longitude は両方指定してください".to_string(),
                ))
            }
        }
        Ok(())
    }

    /// Resolves the location: explicit coordinates first, then the city table.
    ///
    /// Unknown cities resolve to the fallback location.
    ///
    /// # Errors
    ///
    /// Returns an error if explicit coordinates are out of range.
    pub fn coordinates(&self) -> Result<Coordinates, ConfigError> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).map_err(ConfigError::Invalid),
            _ => {
                if location::find(&self.city, &self.country).is_none() {
                    warn!(
                        "都市が見つかりません ({}, {})。既定の位置を使用します",
                        self.city, self.country
                    );
                }
                Ok(location::lookup(&self.city, &self.country))
            }
        }
    }

    /// Returns a short human-readable description of the location.
    pub fn location_label(&self) -> String {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => format!("{:.4}, {:.4}", lat, lon),
            _ => {
                let country = location::country_name(&self.country)
                    .map(str::to_string)
                    .unwrap_or_else(|| self.country.trim().to_uppercase());
                format!("{}, {}", self.city.trim(), country)
            }
        }
    }

    /// Returns the configured calculation method, falling back to the default.
    pub fn calculation_method(&self) -> CalculationMethod {
        if CalculationMethod::parse_name(&self.method).is_none() {
            warn!(
                "不明な計算方法です: {}。{} を使用します",
                self.method,
                CalculationMethod::DEFAULT.as_str()
            );
        }
        CalculationMethod::from_name(&self.method)
    }

    pub fn madhab(&self) -> Madhab {
        Madhab::from_name(&self.madhab)
    }

    /// Returns the adhan asset path, applying the default when unset.
    pub fn adhan_path(&self) -> PathBuf {
        self.adhan_path
            .clone()
            .unwrap_or_else(Self::default_adhan_path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn playback_timeout(&self) -> Duration {
        Duration::from_secs(self.playback_timeout_seconds)
    }

    /// Builds a provider for the configured location and method.
    ///
    /// # Errors
    ///
    /// Returns an error if explicit coordinates are out of range.
    pub fn provider(&self) -> Result<PrayerTimeProvider, ConfigError> {
        Ok(
            PrayerTimeProvider::new(self.coordinates()?, self.calculation_method())
                .with_madhab(self.madhab()),
        )
    }

    /// Returns the tracker tunables.
    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            reminder_minutes: self.reminder_minutes,
            enable_adhan: self.enable_adhan,
            adhan_path: self.adhan_path(),
            poll_interval: self.poll_interval(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
