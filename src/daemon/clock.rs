//! Time source for the tracker.

use std::sync::Mutex;

use chrono::{DateTime, Duration, FixedOffset, Local};

/// Supplies the current wall-clock time in the host's local offset.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Clock backed by the host's system time and time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Manually driven clock for testing.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now = *now + by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cairo_offset() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    #[test]
    fn test_fixed_clock_advance() {
        let start = cairo_offset()
            .with_ymd_and_hms(2024, 1, 15, 5, 0, 0)
            .unwrap();
        let clock = FixedClock::new(start);
        assert_eq!(clock.now(), start);

        clock.advance(Duration::seconds(90));
        assert_eq!(clock.now(), start + Duration::seconds(90));
    }

    #[test]
    fn test_fixed_clock_set() {
        let clock = FixedClock::new(cairo_offset().with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap());
        let later = cairo_offset().with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        clock.set(later);
        assert_eq!(clock.now(), later);
    }

    #[test]
    fn test_system_clock_is_close_to_utc_now() {
        let now = SystemClock.now();
        let diff = (chrono::Utc::now() - now.with_timezone(&chrono::Utc)).num_seconds();
        assert!(diff.abs() < 5);
    }
}
