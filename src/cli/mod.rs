//! CLI module for the prayer reminder.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting, reports and the terminal status line

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, LocationArgs, RunArgs, TimesArgs};
pub use display::{
    format_date, format_time, Display, NextReport, PrayerEntry, TerminalStatus, TimesReport,
};
