//! Status line sink.
//!
//! The tracker rewrites a short countdown string on every poll. Where it ends
//! up (terminal line, log, test recorder) is up to the [`StatusDisplay`].

use std::sync::Mutex;

use tracing::debug;

/// Placeholder shown when the next prayer cannot be determined.
pub const PLACEHOLDER_STATUS: &str = "⏰ Prayer Times";

/// Receives the tracker's status text.
pub trait StatusDisplay: Send + Sync {
    fn show(&self, text: &str);
}

/// Status display that writes to the debug log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatusDisplay;

impl StatusDisplay for LogStatusDisplay {
    fn show(&self, text: &str) {
        debug!("ステータス: {}", text);
    }
}

/// Mock status display for testing.
#[derive(Debug, Default)]
pub struct MockStatusDisplay {
    history: Mutex<Vec<String>>,
}

impl MockStatusDisplay {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently shown text.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.history.lock().unwrap().last().cloned()
    }

    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.history.lock().unwrap().clone()
    }

    #[must_use]
    pub fn update_count(&self) -> usize {
        self.history.lock().unwrap().len()
    }
}

impl StatusDisplay for MockStatusDisplay {
    fn show(&self, text: &str) {
        self.history.lock().unwrap().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_status_display_records_history() {
        let display = MockStatusDisplay::new();
        assert!(display.last().is_none());

        display.show("⏰ Fajr in 10 min");
        display.show(PLACEHOLDER_STATUS);

        assert_eq!(display.update_count(), 2);
        assert_eq!(display.last().as_deref(), Some(PLACEHOLDER_STATUS));
        assert_eq!(display.history()[0], "⏰ Fajr in 10 min");
    }
}
