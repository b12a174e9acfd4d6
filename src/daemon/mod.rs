//! Background reminder daemon.
//!
//! - `tracker`: polling loop, duplicate suppression and reconfiguration
//! - `clock`: injectable time source
//! - `status`: status line sink

pub mod clock;
pub mod status;
pub mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use status::{LogStatusDisplay, MockStatusDisplay, StatusDisplay, PLACEHOLDER_STATUS};
pub use tracker::{
    adhan_due, already_notified, occurrence_passed, reminder_due, LastNotified, ReminderEvents,
    ReminderTracker, TrackerHandle, TrackerSettings,
};
