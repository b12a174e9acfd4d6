//! Command definitions for the prayer reminder CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigError, PrayerConfig, MAX_REMINDER_MINUTES};

// ============================================================================
// CLI Structure
// ============================================================================

/// Prayer time countdown and reminder CLI
#[derive(Parser, Debug)]
#[command(
    name = "prayer",
    version,
    about = "礼拝時刻のカウントダウンとリマインダー",
    long_about = "5つの礼拝時刻を計算し、次の礼拝までのカウントダウンを表示します。\n\
                  設定した時間前にリマインダーを通知し、礼拝時刻にアザーンを再生します。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `next`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub location: LocationArgs,
}

impl Cli {
    /// Loads the configuration file and applies the location overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the merged values are invalid.
    pub fn load_config(&self) -> Result<PrayerConfig, ConfigError> {
        let mut config = PrayerConfig::load(self.config.as_deref())?;
        self.location.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

/// Location and calculation overrides applied on top of the config file.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct LocationArgs {
    /// City name from the built-in table
    #[arg(long, global = true)]
    pub city: Option<String>,

    /// Country code of the city (e.g. EG)
    #[arg(long, global = true)]
    pub country: Option<String>,

    /// Latitude in degrees (requires --lon)
    #[arg(long, global = true, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in degrees (requires --lat)
    #[arg(long, global = true, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Calculation method name (see `prayer methods`)
    #[arg(long, global = true)]
    pub method: Option<String>,

    /// Juristic school for Asr (shafi or hanafi)
    #[arg(long, global = true)]
    pub madhab: Option<String>,
}

impl LocationArgs {
    /// Writes the given overrides into `config`.
    ///
    /// Naming a city clears explicit coordinates from the file.
    pub fn apply(&self, config: &mut PrayerConfig) {
        if let Some(city) = &self.city {
            config.city = city.clone();
            config.latitude = None;
            config.longitude = None;
        }
        if let Some(country) = &self.country {
            config.country = country.clone();
        }
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.latitude = Some(lat);
            config.longitude = Some(lon);
        }
        if let Some(method) = &self.method {
            config.method = method.clone();
        }
        if let Some(madhab) = &self.madhab {
            config.madhab = madhab.clone();
        }
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the reminder loop in the foreground
    Run(RunArgs),

    /// Show all prayer times for a day
    Times(TimesArgs),

    /// Show the next prayer and the time remaining
    Next {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List the built-in cities
    Cities,

    /// List the accepted calculation methods
    Methods,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct RunArgs {
    /// Reminder lead time in minutes (0-120)
    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(0..=MAX_REMINDER_MINUTES as i64)
    )]
    pub reminder: Option<u32>,

    /// Do not play the adhan at prayer time
    #[arg(long)]
    pub no_adhan: bool,
}

impl RunArgs {
    /// Writes the given overrides into `config`.
    pub fn apply(&self, config: &mut PrayerConfig) {
        if let Some(minutes) = self.reminder {
            config.reminder_minutes = minutes;
        }
        if self.no_adhan {
            config.enable_adhan = false;
        }
    }
}

/// Arguments for the times command
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct TimesArgs {
    /// Day to show (YYYY-MM-DD, defaults to today)
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Parses a `YYYY-MM-DD` date.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("日付は YYYY-MM-DD 形式で指定してください: {}", s))
}

// ============================================================================
// Tests
// ============================================================================
